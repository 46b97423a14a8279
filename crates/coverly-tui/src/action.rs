//! What a key press can ask the app loop to do.
//!
//! Screen and dialog work is wrapped as [`Action::Panel`] and handed to
//! the reducer unchanged.

use coverly_core::Intent;

use crate::screen::ScreenId;

#[derive(Debug)]
pub enum Action {
    Quit,
    SwitchScreen(ScreenId),
    NextScreen,
    PrevScreen,
    /// Hand an intent to the panel reducer.
    Panel(Intent),
}
