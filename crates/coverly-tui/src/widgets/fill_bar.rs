//! Horizontal position bar: the open share of a shutter against the rest.

use ratatui::style::Style;
use ratatui::text::{Line, Span};

use coverly_core::FillSplit;

use crate::theme;

const FILLED: char = '█';
const UNFILLED: char = '░';

/// Bar of `width` cells followed by the percentage, e.g. `██████░░░░  60%`.
pub fn line(split: FillSplit, width: u16) -> Line<'static> {
    let (filled, unfilled) = split.cells(width);
    Line::from(vec![
        Span::styled(
            FILLED.to_string().repeat(usize::from(filled)),
            Style::default().fg(theme::FILL_OPEN),
        ),
        Span::styled(
            UNFILLED.to_string().repeat(usize::from(unfilled)),
            Style::default().fg(theme::FILL_CLOSED),
        ),
        Span::styled(
            format!(" {:>3}%", split.filled_percent()),
            theme::row(),
        ),
    ])
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn splits_cells_at_position() {
        assert_eq!(text(&line(FillSplit::new(40), 10)), "████░░░░░░  40%");
    }

    #[test]
    fn clamps_out_of_range_positions() {
        assert_eq!(text(&line(FillSplit::new(140), 4)), "████ 100%");
        assert_eq!(text(&line(FillSplit::new(-5), 4)), "░░░░   0%");
    }
}
