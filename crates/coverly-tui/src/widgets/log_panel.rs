//! Operator log panel: newest line at the bottom, errors in red.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use coverly_core::{LogLine, OperatorLog};

use crate::theme;

fn render_line(line: &LogLine) -> Line<'_> {
    Line::from(vec![
        Span::styled(format!(" {} ", line.at.format("%H:%M:%S")), theme::hint()),
        Span::styled(line.message.as_str(), theme::log_level(line.level)),
    ])
}

/// Lines that fit in `rows`, oldest first.
pub fn visible(log: &OperatorLog, rows: usize) -> Vec<Line<'_>> {
    let skip = log.len().saturating_sub(rows);
    log.lines().skip(skip).map(render_line).collect()
}

pub fn render(frame: &mut Frame, area: Rect, log: &OperatorLog) {
    let block = theme::panel(" Log ", false);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(
        Paragraph::new(visible(log, usize::from(inner.height))),
        inner,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_newest_lines_when_short_on_rows() {
        let mut log = OperatorLog::with_capacity(20);
        log.info("System started");
        log.info("Loading devices...");
        log.error("Error deleting: busy");

        let lines = visible(&log, 2);
        assert_eq!(lines.len(), 2);
        let last: String = lines[1].spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(last.ends_with("Error deleting: busy"));
        assert_eq!(lines[1].spans[1].style, theme::log_level(coverly_core::LogLevel::Error));
    }
}
