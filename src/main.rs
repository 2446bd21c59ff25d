use std::fs::File;
use std::io::{self, BufReader};
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use fbgpu::cli::Cli;
use fbgpu::config::Config;
use fbgpu::core::Font;
use fbgpu::script::ScriptHost;
use fbgpu::FbGpu;

fn main() {
    env_logger::init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    }
    .with_cli(&cli);

    let font = match &config.font {
        Some(path) => Font::load(path)?,
        None => {
            warn!("No font configured, every character will draw as nothing");
            Font::empty()
        }
    };

    let mut gpu = start(&config, font)?;
    for (index, rgb) in config.palette.iter().enumerate() {
        gpu.set_palette(index as i64, rgb.0 as i64);
    }

    let mut host = ScriptHost::new();
    gpu.publish(&mut host);

    if let Some(text) = &cli.text {
        draw_text(&mut gpu, cli.col, cli.row, cli.bg, cli.fg, text);
    }

    if let Some(script) = &cli.script {
        let stdout = io::stdout();
        if script.as_os_str() == "-" {
            host.run(&mut gpu, io::stdin().lock(), stdout.lock())?;
        } else {
            let file = File::open(script).context(format!("Failed to open script: {:?}", script))?;
            host.run(&mut gpu, BufReader::new(file), stdout.lock())?;
        }
    }

    Ok(())
}

#[cfg(unix)]
fn start(config: &Config, font: Font) -> Result<FbGpu> {
    info!("Opening framebuffer {:?}", config.device);
    Ok(FbGpu::open(&config.device, font)?)
}

#[cfg(not(unix))]
fn start(_config: &Config, _font: Font) -> Result<FbGpu> {
    anyhow::bail!("framebuffer devices are only supported on unix")
}

/// Draw a string left to right, wide glyphs taking two cells
fn draw_text(gpu: &mut FbGpu, col: i64, row: i64, bg: i64, fg: i64, text: &str) {
    let mut x = col;
    for c in text.chars() {
        let code = c as u32 as i64;
        gpu.put(x, row, bg, fg, code);
        let cells = u16::try_from(code)
            .map(|code| gpu.font().glyph(code).width() / 8)
            .unwrap_or(0);
        x += cells.max(1) as i64;
    }
}
