//! Colors and styles.
//!
//! Amber marks focus, teal marks data, everything else sits on slate.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders};

use coverly_core::LogLevel;

// ── Palette ───────────────────────────────────────────────────────────

pub const AMBER: Color = Color::Rgb(255, 183, 77); // #ffb74d
pub const TEAL: Color = Color::Rgb(77, 208, 225); // #4dd0e1
pub const ROSE: Color = Color::Rgb(240, 98, 146); // #f06292
pub const OK_GREEN: Color = Color::Rgb(129, 199, 132); // #81c784
pub const WARN_YELLOW: Color = Color::Rgb(255, 241, 118); // #fff176
pub const FAULT_RED: Color = Color::Rgb(239, 83, 80); // #ef5350

pub const TEXT: Color = Color::Rgb(207, 216, 220); // #cfd8dc
pub const MUTED: Color = Color::Rgb(120, 144, 156); // #78909c
pub const SURFACE: Color = Color::Rgb(38, 50, 56); // #263238
pub const SURFACE_DEEP: Color = Color::Rgb(28, 37, 41); // #1c2529

/// Open share of a shutter.
pub const FILL_OPEN: Color = Color::Rgb(129, 212, 250); // #81d4fa
/// Closed share of a shutter.
pub const FILL_CLOSED: Color = Color::Rgb(69, 90, 100); // #455a64

// ── Styles ────────────────────────────────────────────────────────────

pub fn title() -> Style {
    Style::default().fg(TEAL).add_modifier(Modifier::BOLD)
}

pub fn border(focused: bool) -> Style {
    Style::default().fg(if focused { AMBER } else { MUTED })
}

pub fn header() -> Style {
    Style::default()
        .fg(TEAL)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

pub fn row() -> Style {
    Style::default().fg(TEXT)
}

pub fn row_selected() -> Style {
    Style::default()
        .fg(AMBER)
        .bg(SURFACE)
        .add_modifier(Modifier::BOLD)
}

pub fn tab(active: bool) -> Style {
    if active {
        Style::default().fg(AMBER).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(TEXT)
    }
}

pub fn hint() -> Style {
    Style::default().fg(MUTED)
}

pub fn hint_key() -> Style {
    Style::default().fg(TEAL).add_modifier(Modifier::BOLD)
}

/// Dialog button; `focused` inverts it, disabled buttons are dimmed.
pub fn button(focused: bool, enabled: bool) -> Style {
    let base = if enabled {
        Style::default().fg(TEAL)
    } else {
        Style::default().fg(MUTED).add_modifier(Modifier::DIM)
    };
    if focused {
        base.bg(SURFACE).add_modifier(Modifier::BOLD | Modifier::REVERSED)
    } else {
        base
    }
}

pub fn log_level(level: LogLevel) -> Style {
    match level {
        LogLevel::Info => Style::default().fg(TEXT),
        LogLevel::Error => Style::default().fg(FAULT_RED),
    }
}

// ── Building blocks ───────────────────────────────────────────────────

/// Rounded panel frame with a title.
pub fn panel(title_text: impl Into<Line<'static>>, focused: bool) -> Block<'static> {
    Block::default()
        .title(title_text)
        .title_style(title())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border(focused))
}

/// Key hint line from `(key, label)` pairs: `  j/k navigate  o open`.
pub fn hints(pairs: &[(&'static str, &'static str)]) -> Line<'static> {
    let mut spans = vec![Span::raw(" ")];
    for (key, label) in pairs {
        spans.push(Span::styled(format!(" {key} "), hint_key()));
        spans.push(Span::styled(*label, hint()));
    }
    Line::from(spans)
}
