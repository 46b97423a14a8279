//! Console screen: send a raw command, optionally aimed at one device.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use tui_input::Input;

use coverly_core::{DeviceId, Intent, Panel, SelectOption};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::text_input;

const PROMPT: &str = " › ";

const HINTS: &[(&str, &str)] = &[
    ("↑/↓", "device "),
    ("Enter", "send "),
    ("Esc", "clear "),
    ("Tab", "next screen"),
];

pub struct ConsoleScreen {
    focused: bool,
    input: Input,
    /// 0 is "no device"; `n` is the `n - 1`th device option.
    target: usize,
}

impl ConsoleScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            input: Input::default(),
            target: 0,
        }
    }

    fn target_device<'a>(&self, options: &'a [SelectOption]) -> Option<&'a SelectOption> {
        self.target.checked_sub(1).and_then(|i| options.get(i))
    }

    fn cycle_target(&mut self, options: &[SelectOption], forward: bool) {
        let slots = options.len() + 1;
        let current = self.target.min(slots - 1);
        self.target = if forward {
            (current + 1) % slots
        } else {
            (current + slots - 1) % slots
        };
    }
}

impl Component for ConsoleScreen {
    fn handle_key_event(&mut self, key: KeyEvent, panel: &Panel) -> Result<Option<Action>> {
        let options = panel.device_options();
        let action = match key.code {
            KeyCode::Up => {
                self.cycle_target(&options, false);
                None
            }
            KeyCode::Down => {
                self.cycle_target(&options, true);
                None
            }
            KeyCode::Esc => {
                self.input.reset();
                None
            }
            KeyCode::Enter => {
                let command = self.input.value().to_owned();
                self.input.reset();
                let device: Option<DeviceId> =
                    self.target_device(&options).map(|o| o.value.clone());
                Some(Action::Panel(Intent::ConsoleSend { device, command }))
            }
            _ => {
                if let Some(request) = text_input::request(key) {
                    self.input.handle(request);
                }
                None
            }
        };
        Ok(action)
    }

    fn render(&self, frame: &mut Frame, area: Rect, panel: &Panel) {
        let options = panel.device_options();

        let block = theme::panel(" Console ", self.focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::vertical([
            Constraint::Length(1), // target
            Constraint::Length(1), // spacer
            Constraint::Length(1), // command line
            Constraint::Min(0),
            Constraint::Length(1), // hints
        ])
        .split(inner);

        let target = self
            .target_device(&options)
            .map_or("(none)", |o| o.label.as_str());
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(" Device: ", Style::default().fg(theme::TEXT)),
                Span::styled(target, Style::default().fg(theme::ROSE)),
            ])),
            layout[0],
        );

        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(PROMPT, theme::hint_key()),
                Span::styled(self.input.value(), Style::default().fg(theme::TEAL)),
            ])),
            layout[2],
        );
        if self.focused {
            let prefix = u16::try_from(PROMPT.chars().count()).unwrap_or(0);
            let col = u16::try_from(self.input.visual_cursor()).unwrap_or(u16::MAX);
            let x = layout[2].x.saturating_add(prefix).saturating_add(col);
            if x < layout[2].right() {
                frame.set_cursor_position((x, layout[2].y));
            }
        }

        frame.render_widget(Paragraph::new(theme::hints(HINTS)), layout[4]);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn capturing_input(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;

    use coverly_core::{Device, Effect, ReloadKind};

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn panel() -> Panel {
        let mut panel = Panel::default();
        let effects = panel.update(Intent::Reload(ReloadKind::Devices));
        let Some(Effect::FetchDevices(ticket)) = effects.into_iter().next() else {
            panic!("expected a device fetch");
        };
        panel.update(Intent::DevicesLoaded {
            ticket,
            result: Ok(vec![Device {
                id: DeviceId::new("d1"),
                name: "Lounge".into(),
                position: 0,
                travel_time: 0,
                paired: true,
                active: true,
                description: None,
            }]),
        });
        panel
    }

    fn type_text(screen: &mut ConsoleScreen, panel: &Panel, text: &str) {
        for c in text.chars() {
            screen.handle_key_event(key(KeyCode::Char(c)), panel).unwrap();
        }
    }

    #[test]
    fn enter_sends_to_picked_device_and_clears() {
        let panel = panel();
        let mut screen = ConsoleScreen::new();
        screen.handle_key_event(key(KeyCode::Down), &panel).unwrap();
        type_text(&mut screen, &panel, "up");

        let action = screen.handle_key_event(key(KeyCode::Enter), &panel).unwrap();
        let Some(Action::Panel(Intent::ConsoleSend { device, command })) = action else {
            panic!("expected a console send");
        };
        assert_eq!(device, Some(DeviceId::new("d1")));
        assert_eq!(command, "up");
        assert_eq!(screen.input.value(), "");
    }

    #[test]
    fn device_choice_wraps_through_none() {
        let panel = panel();
        let mut screen = ConsoleScreen::new();
        screen.handle_key_event(key(KeyCode::Down), &panel).unwrap();
        screen.handle_key_event(key(KeyCode::Down), &panel).unwrap();
        type_text(&mut screen, &panel, "ping");

        let action = screen.handle_key_event(key(KeyCode::Enter), &panel).unwrap();
        let Some(Action::Panel(Intent::ConsoleSend { device, .. })) = action else {
            panic!("expected a console send");
        };
        assert_eq!(device, None);
    }

    #[test]
    fn letters_go_to_the_command_line() {
        let panel = Panel::default();
        let mut screen = ConsoleScreen::new();
        type_text(&mut screen, &panel, "q1");
        assert_eq!(screen.input.value(), "q1");
        assert!(screen.capturing_input());
    }
}
