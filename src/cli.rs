// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "fbgpu")]
#[command(about = "Character-cell display on a Linux framebuffer", long_about = None)]
pub struct Cli {
    /// Framebuffer device node (overrides the config file)
    #[arg(short, long)]
    pub device: Option<PathBuf>,

    /// Font table: binary 33-byte records, or GNU Unifont .hex
    #[arg(short, long)]
    pub font: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Script of capability calls to run, one per line ("-" for stdin)
    #[arg(short, long)]
    pub script: Option<PathBuf>,

    /// Text to draw after startup
    #[arg(short, long)]
    pub text: Option<String>,

    /// Cell column for --text
    #[arg(long, default_value_t = 0)]
    pub col: i64,

    /// Cell row for --text
    #[arg(long, default_value_t = 0)]
    pub row: i64,

    /// Foreground palette index for --text
    #[arg(long, default_value_t = 15)]
    pub fg: i64,

    /// Background palette index for --text
    #[arg(long, default_value_t = 0)]
    pub bg: i64,
}
