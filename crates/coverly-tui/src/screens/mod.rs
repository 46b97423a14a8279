//! Screen implementations. Each screen is a top-level Component.

pub mod console;
pub mod devices;
pub mod remotes;

use crate::component::Component;
use crate::screen::ScreenId;

/// Create screen components for the tab bar.
pub fn create_screens() -> Vec<(ScreenId, Box<dyn Component>)> {
    vec![
        (ScreenId::Devices, Box::new(devices::DevicesScreen::new())),
        (ScreenId::Remotes, Box::new(remotes::RemotesScreen::new())),
        (ScreenId::Console, Box::new(console::ConsoleScreen::new())),
    ]
}

/// Clamp a table selection after moving it by `delta`.
#[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss, clippy::as_conversions)]
pub(crate) fn step_selection(current: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let next = (current.min(len - 1) as isize + delta).clamp(0, len as isize - 1);
    next as usize
}
