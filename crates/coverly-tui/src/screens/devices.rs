//! Devices screen: one row per shutter with its position bar.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::{Cell, Paragraph, Row, Table, TableState};

use coverly_core::view::NO_DEVICES;
use coverly_core::{DeviceAction, DeviceRow, HelpTopic, Intent, Panel, ReloadKind};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::fill_bar;

const BAR_WIDTH: u16 = 20;

const HINTS: &[(&str, &str)] = &[
    ("j/k", "navigate "),
    ("o", "open "),
    ("s", "stop "),
    ("c", "close "),
    ("e", "edit "),
    ("a", "add "),
    ("r", "reload "),
    ("?", "help"),
];

pub struct DevicesScreen {
    focused: bool,
    selected: usize,
}

impl DevicesScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            selected: 0,
        }
    }

    fn selected_row<'a>(&self, rows: &'a [DeviceRow]) -> Option<&'a DeviceRow> {
        rows.get(self.selected.min(rows.len().saturating_sub(1)))
    }

    fn act(&self, rows: &[DeviceRow], action: DeviceAction) -> Option<Action> {
        self.selected_row(rows).map(|row| {
            Action::Panel(Intent::DeviceAction {
                device: row.id.clone(),
                action,
            })
        })
    }
}

fn yes_no(value: bool) -> Span<'static> {
    if value {
        Span::styled("yes", Style::default().fg(theme::OK_GREEN))
    } else {
        Span::styled("no", theme::hint())
    }
}

impl Component for DevicesScreen {
    fn handle_key_event(&mut self, key: KeyEvent, panel: &Panel) -> Result<Option<Action>> {
        let rows = panel.device_rows();
        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.selected = super::step_selection(self.selected, 1, rows.len());
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.selected = super::step_selection(self.selected, -1, rows.len());
                None
            }
            KeyCode::Char('g') => {
                self.selected = 0;
                None
            }
            KeyCode::Char('G') => {
                self.selected = rows.len().saturating_sub(1);
                None
            }
            KeyCode::Char('o') => self.act(&rows, DeviceAction::Open),
            KeyCode::Char('s') => self.act(&rows, DeviceAction::Stop),
            KeyCode::Char('c') => self.act(&rows, DeviceAction::Close),
            KeyCode::Char('e') | KeyCode::Enter => self
                .selected_row(&rows)
                .map(|row| Action::Panel(Intent::OpenEditDevice(row.id.clone()))),
            KeyCode::Char('a') => Some(Action::Panel(Intent::OpenAddDevice)),
            KeyCode::Char('?') => Some(Action::Panel(Intent::OpenHelp(HelpTopic::Devices))),
            KeyCode::Char('r') => Some(Action::Panel(Intent::Reload(ReloadKind::Devices))),
            _ => None,
        };
        Ok(action)
    }

    fn render(&self, frame: &mut Frame, area: Rect, panel: &Panel) {
        let rows = panel.device_rows();
        let loading = panel.registry().is_loading(ReloadKind::Devices);

        let title = if loading {
            format!(" Devices ({}) · loading… ", rows.len())
        } else {
            format!(" Devices ({}) ", rows.len())
        };
        let block = theme::panel(title, self.focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::vertical([
            Constraint::Min(1),    // table
            Constraint::Length(1), // hints
        ])
        .split(inner);

        if rows.is_empty() {
            let text = if panel.registry().has_loaded(ReloadKind::Devices) {
                NO_DEVICES
            } else {
                "Loading devices..."
            };
            frame.render_widget(
                Paragraph::new(Span::styled(text, theme::hint())),
                layout[0],
            );
        } else {
            let header = Row::new([
                Cell::from("Name").style(theme::header()),
                Cell::from("Position").style(theme::header()),
                Cell::from("Travel").style(theme::header()),
                Cell::from("Paired").style(theme::header()),
                Cell::from("Active").style(theme::header()),
            ]);
            let table_rows: Vec<Row> = rows
                .iter()
                .map(|row| {
                    let travel = if row.travel_time == 0 {
                        "-".to_owned()
                    } else {
                        format!("{}s", row.travel_time)
                    };
                    Row::new([
                        Cell::from(row.name.as_str()),
                        Cell::from(fill_bar::line(row.fill, BAR_WIDTH)),
                        Cell::from(travel),
                        Cell::from(yes_no(row.paired)),
                        Cell::from(yes_no(row.active)),
                    ])
                    .style(theme::row())
                })
                .collect();
            let widths = [
                Constraint::Min(16),
                Constraint::Length(BAR_WIDTH + 5),
                Constraint::Length(7),
                Constraint::Length(7),
                Constraint::Length(7),
            ];
            let table = Table::new(table_rows, widths)
                .header(header)
                .row_highlight_style(theme::row_selected())
                .highlight_symbol("▸ ");

            let mut state =
                TableState::default().with_selected(Some(self.selected.min(rows.len() - 1)));
            frame.render_stateful_widget(table, layout[0], &mut state);
        }

        frame.render_widget(Paragraph::new(theme::hints(HINTS)), layout[1]);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}
