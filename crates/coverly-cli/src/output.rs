//! Output formatting: table, JSON, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one identifier per line.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::{ColorMode, OutputFormat};

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stderr().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// A controller reply line for stderr: `✓ msg` or `✗ msg`.
pub fn status_line(success: bool, message: &str, color: bool) -> String {
    match (success, color) {
        (true, true) => format!("{} {message}", "✓".green()),
        (false, true) => format!("{} {message}", "✗".red()),
        (true, false) => format!("✓ {message}"),
        (false, false) => format!("✗ {message}"),
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of rows that are both `Tabled` and serializable.
///
/// - `table`: uses the `Tabled` derive to build a pretty table, or
///   `empty` when there are no rows
/// - `json` / `json-compact`: serializes the rows via serde
/// - `plain`: calls `id_fn` on each row to emit one identifier per line
pub fn render_list<R>(
    format: &OutputFormat,
    rows: &[R],
    empty: &str,
    id_fn: impl Fn(&R) -> String,
) -> String
where
    R: serde::Serialize + Tabled,
{
    match format {
        OutputFormat::Table if rows.is_empty() => empty.to_owned(),
        OutputFormat::Table => render_table(rows),
        OutputFormat::Json => render_json(rows, false),
        OutputFormat::JsonCompact => render_json(rows, true),
        OutputFormat::Plain => rows.iter().map(id_fn).collect::<Vec<_>>().join("\n"),
    }
}

/// Render a single serializable item in the chosen format.
///
/// Table rendering uses a custom `detail_fn` that returns a pre-formatted
/// string, since single-item views don't use the `Tabled` derive.
pub fn render_single<T>(
    format: &OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize + ?Sized,
{
    match format {
        OutputFormat::Table => detail_fn(data),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Plain => id_fn(data),
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

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> String {
    let rendered = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    rendered.unwrap_or_else(|e| format!("{{\"error\":\"serialization failed: {e}\"}}"))
}
