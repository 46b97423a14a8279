//! Dialog overlay: renders the panel's open dialog session and turns keys
//! into [`DialogEvent`]s.
//!
//! The session in `coverly-core` owns every value. This view only keeps
//! the cursor state of the two text fields and which control has focus,
//! and it resynchronizes from the session whenever they disagree.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Wrap};
use tui_input::{Input, InputRequest};

use coverly_core::dialog::{Controls, DialogSession};
use coverly_core::{Button, DialogEvent, Effect, Intent, Mode, SessionId};

use super::text_input;
use crate::theme;

type Session = DialogSession<Effect>;

const DIALOG_WIDTH: u16 = 64;
const FIELD_PREFIX: &str = "  > ";

/// A focusable control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Text,
    Timing,
    Boolean,
    Picker,
    Button(Button),
}

/// Focus order for the visible controls. `Dismiss` is always last.
pub fn targets(controls: &Controls) -> Vec<Target> {
    let mut out = Vec::new();
    if controls.input {
        out.push(Target::Text);
    }
    if controls.timing {
        out.push(Target::Timing);
    }
    if controls.boolean {
        out.push(Target::Boolean);
    }
    if controls.picker {
        out.push(Target::Picker);
    }
    let buttons = [
        (controls.save, Button::Save),
        (controls.pair, Button::Pair),
        (controls.unpair, Button::Unpair),
        (controls.delete_entry, Button::Delete),
        (controls.confirm, Button::Confirm),
        (controls.cancel, Button::Cancel),
        (true, Button::Dismiss),
    ];
    out.extend(
        buttons
            .into_iter()
            .filter(|(shown, _)| *shown)
            .map(|(_, b)| Target::Button(b)),
    );
    out
}

fn caption(session: &Session, button: Button) -> &str {
    match button {
        Button::Save => "Save",
        Button::Pair => session.options().pair_caption(),
        Button::Unpair => session.options().unpair_caption(),
        Button::Delete => "Delete",
        Button::Confirm => "Confirm delete",
        Button::Cancel => "Cancel",
        Button::Dismiss => "Close",
    }
}

#[derive(Debug, Default)]
pub struct DialogView {
    session: Option<SessionId>,
    text: Input,
    timing: Input,
    focus: Option<Target>,
}

impl DialogView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Follow the open session: reset on a new session, and take the
    /// session's values when an edit was refused.
    pub fn sync(&mut self, session: Option<&Session>) {
        let Some(session) = session else {
            *self = Self::default();
            return;
        };
        if self.session != Some(session.id()) {
            self.session = Some(session.id());
            self.text = Input::new(session.text().to_owned());
            self.timing = Input::new(session.timing().to_owned());
            self.focus = None;
        }
        if self.text.value() != session.text() {
            self.text = Input::new(session.text().to_owned());
        }
        if self.timing.value() != session.timing() {
            self.timing = Input::new(session.timing().to_owned());
        }
    }

    /// Focused control, falling back to the first one shown.
    pub fn focus(&self, session: &Session) -> Option<Target> {
        let order = targets(&session.controls());
        self.focus
            .filter(|f| order.contains(f))
            .or_else(|| order.first().copied())
    }

    fn move_focus(&mut self, session: &Session, forward: bool) {
        let order = targets(&session.controls());
        if order.is_empty() {
            return;
        }
        let current = self
            .focus(session)
            .and_then(|f| order.iter().position(|t| *t == f))
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % order.len()
        } else {
            (current + order.len() - 1) % order.len()
        };
        self.focus = Some(order[next]);
    }

    fn press(session: &Session, button: Button) -> Option<Intent> {
        session
            .controls()
            .clickable(button)
            .then_some(Intent::Dialog(DialogEvent::Press(button)))
    }

    /// Map a key to the intent it triggers, if any.
    pub fn handle_key(&mut self, key: KeyEvent, session: &Session) -> Option<Intent> {
        match key.code {
            KeyCode::Esc => return Some(Intent::Dialog(DialogEvent::Press(Button::Dismiss))),
            KeyCode::Tab => {
                self.move_focus(session, true);
                return None;
            }
            KeyCode::BackTab => {
                self.move_focus(session, false);
                return None;
            }
            _ => {}
        }

        match self.focus(session)? {
            Target::Text => match key.code {
                KeyCode::Enter => Self::press(session, Button::Save),
                _ => {
                    let request = text_input::request(key)?;
                    self.text.handle(request)?;
                    Some(Intent::Dialog(DialogEvent::SetText(
                        self.text.value().to_owned(),
                    )))
                }
            },
            Target::Timing => match key.code {
                KeyCode::Enter => Self::press(session, Button::Save),
                _ => {
                    let request = text_input::request(key)?;
                    let numeric = session.options().numeric_timing;
                    if numeric
                        && matches!(request, InputRequest::InsertChar(c) if !c.is_ascii_digit())
                    {
                        return None;
                    }
                    self.timing.handle(request)?;
                    Some(Intent::Dialog(DialogEvent::SetTiming(
                        self.timing.value().to_owned(),
                    )))
                }
            },
            Target::Boolean => match key.code {
                KeyCode::Char(' ') | KeyCode::Enter => {
                    Some(Intent::Dialog(DialogEvent::ToggleBoolean))
                }
                _ => None,
            },
            Target::Picker => match key.code {
                KeyCode::Up | KeyCode::Char('k') => {
                    Some(Intent::Dialog(DialogEvent::MoveSelection(-1)))
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    Some(Intent::Dialog(DialogEvent::MoveSelection(1)))
                }
                _ => None,
            },
            Target::Button(button) => match key.code {
                KeyCode::Enter | KeyCode::Char(' ') => Self::press(session, button),
                KeyCode::Right => {
                    self.move_focus(session, true);
                    None
                }
                KeyCode::Left => {
                    self.move_focus(session, false);
                    None
                }
                _ => None,
            },
        }
    }

    // ── Rendering ───────────────────────────────────────────────────

    #[allow(clippy::too_many_lines)]
    pub fn render(&self, frame: &mut Frame, area: Rect, session: &Session) {
        let options = session.options();
        let controls = session.controls();
        let focus = self.focus(session);
        let focused = |t: Target| focus == Some(t);

        let mut lines: Vec<Line> = Vec::new();
        let mut cursor: Option<(usize, u16)> = None;

        if !options.label.is_empty() {
            lines.push(Line::from(Span::styled(
                options.label.as_str(),
                Style::default().fg(theme::TEXT),
            )));
        }
        for item in &options.items {
            lines.push(Line::from(Span::styled(
                format!("  {item}"),
                theme::row(),
            )));
        }
        for paragraph in &options.content {
            lines.push(Line::from(Span::styled(
                paragraph.as_str(),
                Style::default().fg(theme::TEXT),
            )));
        }
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }

        let field_style = |t: Target| {
            if focused(t) {
                Style::default().fg(theme::TEAL).bg(theme::SURFACE)
            } else {
                Style::default().fg(theme::TEAL)
            }
        };

        if controls.input {
            if focused(Target::Text) {
                cursor = Some((lines.len(), prefix_width() + cursor_col(&self.text)));
            }
            lines.push(Line::from(vec![
                Span::styled(FIELD_PREFIX, theme::hint()),
                Span::styled(self.text.value(), field_style(Target::Text)),
            ]));
        }
        if controls.timing {
            lines.push(Line::from(Span::styled(
                options.timing_caption(),
                Style::default().fg(theme::TEXT),
            )));
            if focused(Target::Timing) {
                cursor = Some((lines.len(), prefix_width() + cursor_col(&self.timing)));
            }
            lines.push(Line::from(vec![
                Span::styled(FIELD_PREFIX, theme::hint()),
                Span::styled(self.timing.value(), field_style(Target::Timing)),
            ]));
        }
        if controls.boolean {
            let mark = if session.boolean() { "[x]" } else { "[ ]" };
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(
                    format!("{mark} {}", options.boolean_label),
                    field_style(Target::Boolean),
                ),
            ]));
        }
        if controls.picker {
            lines.push(Line::from(Span::styled(
                "Device:",
                Style::default().fg(theme::TEXT),
            )));
            if session.picker().is_empty() {
                lines.push(Line::from(Span::styled(
                    "  (no devices)",
                    theme::hint(),
                )));
            }
            for (i, option) in session.picker().iter().enumerate() {
                let picked = i == session.picked_index();
                let style = if picked {
                    field_style(Target::Picker).add_modifier(Modifier::BOLD)
                } else {
                    theme::row()
                };
                let marker = if picked { "  ▸ " } else { "    " };
                lines.push(Line::from(Span::styled(
                    format!("{marker}{}", option.label),
                    style,
                )));
            }
        }
        if controls.pair_label {
            if let Some(label) = options.pair_label.as_deref() {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    label,
                    Style::default().fg(theme::ROSE),
                )));
            }
        }
        if controls.delete_info {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                options.delete_warning(),
                Style::default().fg(theme::WARN_YELLOW),
            )));
        }
        if controls.busy {
            lines.push(Line::from(Span::styled(
                "Deleting...",
                Style::default().fg(theme::WARN_YELLOW),
            )));
        }

        lines.push(Line::from(""));
        let mut buttons = Vec::new();
        for target in targets(&controls) {
            if let Target::Button(button) = target {
                let enabled = controls.clickable(button);
                buttons.push(Span::styled(
                    format!(" {} ", caption(session, button)),
                    theme::button(focused(target), enabled),
                ));
                buttons.push(Span::raw(" "));
            }
        }
        lines.push(Line::from(buttons));

        // ── Frame ───────────────────────────────────────────────────
        let width = DIALOG_WIDTH.min(area.width.saturating_sub(4));
        let wanted = u16::try_from(lines.len()).unwrap_or(u16::MAX).saturating_add(2);
        let height = wanted.min(area.height.saturating_sub(2));
        let x = area.x + area.width.saturating_sub(width) / 2;
        let y = area.y + area.height.saturating_sub(height) / 2;
        let popup = Rect::new(x, y, width, height);

        frame.render_widget(Clear, popup);
        frame.render_widget(
            Block::default().style(Style::default().bg(theme::SURFACE_DEEP)),
            popup,
        );

        let border = if matches!(session.mode(), Mode::DeleteConfirm { .. }) {
            Style::default().fg(theme::FAULT_RED)
        } else {
            theme::border(true)
        };
        let block = theme::panel(format!(" {} ", options.title), true).border_style(border);
        let inner = block.inner(popup);
        frame.render_widget(block, popup);
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);

        if let Some((row, col)) = cursor {
            let row = u16::try_from(row).unwrap_or(u16::MAX);
            if row < inner.height && col < inner.width {
                frame.set_cursor_position((inner.x + col, inner.y + row));
            }
        }
    }
}

fn prefix_width() -> u16 {
    u16::try_from(FIELD_PREFIX.chars().count()).unwrap_or(0)
}

fn cursor_col(input: &Input) -> u16 {
    u16::try_from(input.visual_cursor()).unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;
    use ratatui::{Terminal, backend::TestBackend};

    use coverly_core::{Device, DeviceId, Panel, ReloadKind};

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn lounge() -> Device {
        Device {
            id: DeviceId::new("d1"),
            name: "Lounge".into(),
            position: 40,
            travel_time: 20,
            paired: false,
            active: true,
            description: None,
        }
    }

    fn panel_with_device() -> Panel {
        let mut panel = Panel::default();
        let effects = panel.update(Intent::Reload(ReloadKind::Devices));
        let Some(Effect::FetchDevices(ticket)) = effects.into_iter().next() else {
            panic!("expected a device fetch");
        };
        panel.update(Intent::DevicesLoaded {
            ticket,
            result: Ok(vec![lounge()]),
        });
        panel
    }

    fn apply(panel: &mut Panel, view: &mut DialogView, intent: Option<Intent>) {
        if let Some(intent) = intent {
            panel.update(intent);
        }
        view.sync(panel.dialog().current());
    }

    #[test]
    fn edit_device_focus_order() {
        let mut panel = panel_with_device();
        panel.update(Intent::OpenEditDevice(DeviceId::new("d1")));
        let session = panel.dialog().current().unwrap();
        let order = targets(&session.controls());
        assert_eq!(order.first(), Some(&Target::Text));
        assert!(order.contains(&Target::Button(Button::Pair)));
        assert!(order.contains(&Target::Button(Button::Delete)));
        assert_eq!(order.last(), Some(&Target::Button(Button::Dismiss)));
    }

    #[test]
    fn typing_updates_session_text() {
        let mut panel = panel_with_device();
        let mut view = DialogView::new();
        apply(&mut panel, &mut view, Some(Intent::OpenEditDevice(DeviceId::new("d1"))));

        let intent = view.handle_key(key(KeyCode::Char('!')), panel.dialog().current().unwrap());
        apply(&mut panel, &mut view, intent);
        assert_eq!(panel.dialog().current().unwrap().text(), "Lounge!");
    }

    #[test]
    fn timing_field_accepts_digits_only() {
        let mut panel = panel_with_device();
        let mut view = DialogView::new();
        apply(&mut panel, &mut view, Some(Intent::OpenEditDevice(DeviceId::new("d1"))));
        view.handle_key(key(KeyCode::Tab), panel.dialog().current().unwrap());

        let session = panel.dialog().current().unwrap();
        assert_eq!(view.focus(session), Some(Target::Timing));
        assert!(view.handle_key(key(KeyCode::Char('x')), session).is_none());

        let intent = view.handle_key(key(KeyCode::Char('5')), session);
        apply(&mut panel, &mut view, intent);
        assert_eq!(panel.dialog().current().unwrap().timing(), "205");
    }

    #[test]
    fn add_remote_name_takes_letters_and_saves() {
        let mut panel = Panel::default();
        let mut view = DialogView::new();
        apply(&mut panel, &mut view, Some(Intent::OpenAddRemote));

        for c in "0A1B".chars() {
            let intent = view.handle_key(key(KeyCode::Char(c)), panel.dialog().current().unwrap());
            apply(&mut panel, &mut view, intent);
        }
        view.handle_key(key(KeyCode::Tab), panel.dialog().current().unwrap());
        assert_eq!(view.focus(panel.dialog().current().unwrap()), Some(Target::Timing));
        for c in "Hall".chars() {
            let intent = view.handle_key(key(KeyCode::Char(c)), panel.dialog().current().unwrap());
            apply(&mut panel, &mut view, intent);
        }
        assert_eq!(panel.dialog().current().unwrap().timing(), "Hall");

        let save = view.handle_key(key(KeyCode::Enter), panel.dialog().current().unwrap());
        let effects = panel.update(save.unwrap());
        let [Effect::Commands { steps, .. }] = effects.as_slice() else {
            panic!("expected the newRemote command, got {effects:?}");
        };
        assert_eq!(steps[0].command.to_string(), "newRemote 0A1B Hall");
        assert!(panel.log().lines().all(|l| !l.message.starts_with("Please provide")));
    }

    #[test]
    fn delete_then_cancel_returns_to_normal() {
        let mut panel = panel_with_device();
        let mut view = DialogView::new();
        apply(&mut panel, &mut view, Some(Intent::OpenEditDevice(DeviceId::new("d1"))));

        let press = |b| Some(Intent::Dialog(DialogEvent::Press(b)));
        apply(&mut panel, &mut view, press(Button::Delete));
        let session = panel.dialog().current().unwrap();
        assert_eq!(session.mode(), Mode::DeleteConfirm { awaiting: false });
        assert!(targets(&session.controls()).contains(&Target::Button(Button::Confirm)));

        apply(&mut panel, &mut view, press(Button::Cancel));
        assert_eq!(panel.dialog().current().unwrap().mode(), Mode::Normal);
    }

    #[test]
    fn escape_dismisses() {
        let mut panel = panel_with_device();
        let mut view = DialogView::new();
        apply(&mut panel, &mut view, Some(Intent::OpenAddDevice));
        let intent = view.handle_key(key(KeyCode::Esc), panel.dialog().current().unwrap());
        apply(&mut panel, &mut view, intent);
        assert!(!panel.dialog().is_open());
    }

    #[test]
    fn renders_title_and_buttons() {
        let mut panel = panel_with_device();
        let mut view = DialogView::new();
        apply(&mut panel, &mut view, Some(Intent::OpenEditDevice(DeviceId::new("d1"))));
        let session = panel.dialog().current().unwrap();

        let mut terminal = Terminal::new(TestBackend::new(80, 40)).unwrap();
        terminal
            .draw(|frame| view.render(frame, frame.area(), session))
            .unwrap();
        let screen: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect();
        assert!(screen.contains("Edit Device"));
        assert!(screen.contains("Save"));
        assert!(screen.contains("Close"));
    }
}
