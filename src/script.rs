use std::collections::HashMap;
use std::io::{BufRead, Write};

use anyhow::{anyhow, bail, Context, Result};

use crate::capability::{CapabilityTable, HostValue};
use crate::gpu::FbGpu;
use crate::traits::Host;

/// Line-oriented host that dispatches `table.operation arg ...` calls.
///
/// Unqualified names resolve when exactly one table is published. Numbers may
/// be decimal, `0x` hex, or a quoted character such as `'A'`. A `#` that
/// starts a word begins a comment.
#[derive(Debug, Default)]
pub struct ScriptHost {
    tables: HashMap<String, CapabilityTable>,
}

impl Host for ScriptHost {
    fn publish(&mut self, name: &str, table: CapabilityTable) {
        log::debug!("Published capability table '{}'", name);
        self.tables.insert(name.to_string(), table);
    }
}

impl ScriptHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(&self, name: &str) -> Option<&CapabilityTable> {
        self.tables.get(name)
    }

    /// Run one line. Blank and comment lines return `None`
    pub fn run_line(&self, gpu: &mut FbGpu, line: &str) -> Result<Option<HostValue>> {
        let mut words = tokenize(line).into_iter();
        let Some(target) = words.next() else {
            return Ok(None);
        };

        let (table, operation) = match target.split_once('.') {
            Some((table_name, operation)) => {
                let table = self
                    .tables
                    .get(table_name)
                    .ok_or_else(|| anyhow!("no table named '{}'", table_name))?;
                (table, operation)
            }
            None => {
                let mut tables = self.tables.values();
                match (tables.next(), tables.next()) {
                    (Some(table), None) => (table, target),
                    _ => bail!("ambiguous call '{}': qualify it with a table name", target),
                }
            }
        };

        let args = words
            .map(|word| parse_number(word).ok_or_else(|| anyhow!("bad argument '{}'", word)))
            .collect::<Result<Vec<f64>>>()?;

        Ok(Some(table.call(gpu, operation, &args)?))
    }

    /// Run every line of `input`, writing non-nil results to `output`
    pub fn run<R: BufRead, W: Write>(&self, gpu: &mut FbGpu, input: R, mut output: W) -> Result<()> {
        for (index, line) in input.lines().enumerate() {
            let line = line.context("Failed to read script")?;
            let value = self
                .run_line(gpu, &line)
                .with_context(|| format!("script line {}", index + 1))?;
            if let Some(value) = value.filter(|v| *v != HostValue::Nil) {
                writeln!(output, "{}", value)?;
            }
        }
        Ok(())
    }
}

/// Split a line into words. A quoted character such as `' '` or `'#'` is one
/// word; a `#` starting a word begins a comment
fn tokenize(line: &str) -> Vec<&str> {
    let mut words = Vec::new();
    let mut rest = line.trim_start();
    while let Some(first) = rest.chars().next() {
        if first == '#' {
            break;
        }
        let end = quoted_len(rest)
            .unwrap_or_else(|| rest.find(char::is_whitespace).unwrap_or(rest.len()));
        words.push(&rest[..end]);
        rest = rest[end..].trim_start();
    }
    words
}

/// Byte length of a leading `'c'` token, if `line` starts with one
fn quoted_len(line: &str) -> Option<usize> {
    let mut chars = line.char_indices();
    let (_, '\'') = chars.next()? else {
        return None;
    };
    chars.next()?;
    let (close, '\'') = chars.next()? else {
        return None;
    };
    let end = close + 1;
    // Must be a whole word
    match line[end..].chars().next() {
        None => Some(end),
        Some(c) if c.is_whitespace() => Some(end),
        _ => None,
    }
}

fn parse_number(word: &str) -> Option<f64> {
    if let Some(quoted) = word.strip_prefix('\'').and_then(|w| w.strip_suffix('\'')) {
        let mut chars = quoted.chars();
        return match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c as u32 as f64),
            _ => None,
        };
    }
    let (negative, digits) = match word.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, word),
    };
    let value = match digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        Some(hex) => i64::from_str_radix(hex, 16).ok()? as f64,
        None => digits.parse::<f64>().ok()?,
    };
    Some(if negative { -value } else { value })
}
