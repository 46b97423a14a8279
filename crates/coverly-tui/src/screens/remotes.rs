//! Remotes screen: physical remotes and the devices they drive.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::{Cell, Paragraph, Row, Table, TableState};

use coverly_core::view::NO_REMOTES;
use coverly_core::{HelpTopic, Intent, Panel, ReloadKind};

use crate::action::Action;
use crate::component::Component;
use crate::theme;

const HINTS: &[(&str, &str)] = &[
    ("j/k", "navigate "),
    ("e", "edit / link "),
    ("a", "add "),
    ("r", "reload "),
    ("?", "help"),
];

pub struct RemotesScreen {
    focused: bool,
    selected: usize,
}

impl RemotesScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            selected: 0,
        }
    }
}

impl Component for RemotesScreen {
    fn handle_key_event(&mut self, key: KeyEvent, panel: &Panel) -> Result<Option<Action>> {
        let rows = panel.remote_rows();
        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.selected = super::step_selection(self.selected, 1, rows.len());
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.selected = super::step_selection(self.selected, -1, rows.len());
                None
            }
            KeyCode::Char('e') | KeyCode::Enter => rows
                .get(self.selected.min(rows.len().saturating_sub(1)))
                .map(|row| Action::Panel(Intent::OpenEditRemote(row.id.clone()))),
            KeyCode::Char('a') => Some(Action::Panel(Intent::OpenAddRemote)),
            KeyCode::Char('?') => Some(Action::Panel(Intent::OpenHelp(HelpTopic::Remotes))),
            KeyCode::Char('r') => Some(Action::Panel(Intent::Reload(ReloadKind::Remotes))),
            _ => None,
        };
        Ok(action)
    }

    fn render(&self, frame: &mut Frame, area: Rect, panel: &Panel) {
        let rows = panel.remote_rows();
        let last = panel.registry().last_address();

        let mut title = format!(" Remotes ({}) ", rows.len());
        if !last.is_empty() {
            title.push_str(&format!("· last heard {last} "));
        }
        let block = theme::panel(title, self.focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(inner);

        if rows.is_empty() {
            let text = if panel.registry().has_loaded(ReloadKind::Remotes) {
                NO_REMOTES
            } else {
                "Loading remotes..."
            };
            frame.render_widget(
                Paragraph::new(Span::styled(text, theme::hint())),
                layout[0],
            );
        } else {
            let header = Row::new([
                Cell::from("ID").style(theme::header()),
                Cell::from("Name").style(theme::header()),
                Cell::from("Devices").style(theme::header()),
            ]);
            let table_rows: Vec<Row> = rows
                .iter()
                .map(|row| {
                    let linked = if row.linked.is_empty() {
                        Span::styled(row.linked_label(), theme::hint())
                    } else {
                        Span::styled(row.linked_label(), Style::default().fg(theme::ROSE))
                    };
                    Row::new([
                        Cell::from(row.id.as_str().to_owned()),
                        Cell::from(row.name.clone()),
                        Cell::from(linked),
                    ])
                    .style(theme::row())
                })
                .collect();
            let widths = [
                Constraint::Length(10),
                Constraint::Length(20),
                Constraint::Min(20),
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

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use crossterm::event::KeyModifiers;

    use coverly_core::{DeviceLink, Effect, Remote, RemoteId};

    use super::*;

    fn panel() -> Panel {
        let mut panel = Panel::default();
        let effects = panel.update(Intent::Reload(ReloadKind::Remotes));
        let Some(Effect::FetchRemotes(ticket)) = effects.into_iter().next() else {
            panic!("expected a remote fetch");
        };
        panel.update(Intent::RemotesLoaded {
            ticket,
            result: Ok(vec![Remote {
                id: RemoteId::new("0A1B2C"),
                name: "Hall".into(),
                devices: vec![DeviceLink {
                    key: "d1".into(),
                    name_hint: None,
                }],
            }]),
        });
        panel
    }

    #[test]
    fn enter_opens_remote_editor() {
        let panel = panel();
        let mut screen = RemotesScreen::new();
        let action = screen
            .handle_key_event(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE), &panel)
            .unwrap();
        let Some(Action::Panel(Intent::OpenEditRemote(id))) = action else {
            panic!("expected an edit dialog");
        };
        assert_eq!(id, RemoteId::new("0A1B2C"));
    }

    #[test]
    fn help_key_opens_remote_help() {
        let mut screen = RemotesScreen::new();
        let action = screen
            .handle_key_event(
                KeyEvent::new(KeyCode::Char('?'), KeyModifiers::NONE),
                &Panel::default(),
            )
            .unwrap();
        assert!(matches!(
            action,
            Some(Action::Panel(Intent::OpenHelp(HelpTopic::Remotes)))
        ));
    }
}
