//! Output formatting: text, JSON, YAML.
//!
//! Renders data in the format selected by `--output`. Text uses `tabled`
//! for lists and raw device output for transcripts; structured formats
//! use serde.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::{ColorMode, OutputFormat};

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

// ── Device transcripts ───────────────────────────────────────────────

/// One line sent to the OLT and what came back before the channel went quiet.
#[derive(Debug, Clone, Serialize)]
pub struct Exchange {
    pub command: String,
    pub output: String,
}

/// Render the exchanges of one device run.
///
/// Text mode prints each command as a `>> command` header followed by the
/// raw device output, unmodified.
pub fn render_transcript(format: &OutputFormat, exchanges: &[Exchange], color: bool) -> String {
    match format {
        OutputFormat::Text => {
            let mut out = String::new();
            for ex in exchanges {
                let header = format!(">> {}", ex.command.trim_end());
                if color {
                    out.push_str(&header.cyan().bold().to_string());
                } else {
                    out.push_str(&header);
                }
                out.push('\n');
                out.push_str(ex.output.trim_end_matches(['\r', '\n']));
                out.push('\n');
            }
            out.trim_end().to_owned()
        }
        OutputFormat::Json => render_json(exchanges),
        OutputFormat::Yaml => render_yaml(exchanges),
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
pub fn render_list<T, R>(format: &OutputFormat, data: &[T], to_row: impl Fn(&T) -> R) -> String
where
    T: Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Text => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            Table::new(rows).with(Style::rounded()).to_string()
        }
        OutputFormat::Json => render_json(data),
        OutputFormat::Yaml => render_yaml(data),
    }
}

/// Render a single serde-serializable item in the chosen format.
///
/// Text rendering uses `detail_fn`, since detail views don't use `Tabled`.
pub fn render_single<T>(format: &OutputFormat, data: &T, detail_fn: impl Fn(&T) -> String) -> String
where
    T: Serialize,
{
    match format {
        OutputFormat::Text => detail_fn(data),
        OutputFormat::Json => render_json(data),
        OutputFormat::Yaml => render_yaml(data),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_json<T: Serialize + ?Sized>(data: &T) -> String {
    serde_json::to_string_pretty(data).unwrap_or_default()
}

fn render_yaml<T: Serialize + ?Sized>(data: &T) -> String {
    serde_yaml::to_string(data).unwrap_or_default()
}
