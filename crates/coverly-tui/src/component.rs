//! What every screen implements.

use color_eyre::eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;

use coverly_core::Panel;

use crate::action::Action;

/// A screen holds view state only: its selection and any text it is
/// editing. Rows come from the [`Panel`] on every call.
pub trait Component: Send {
    fn handle_key_event(&mut self, _key: KeyEvent, _panel: &Panel) -> Result<Option<Action>> {
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect, panel: &Panel);

    fn set_focused(&mut self, _focused: bool) {}

    /// True while the screen wants every printable key, `q` and the
    /// number keys included.
    fn capturing_input(&self) -> bool {
        false
    }
}
