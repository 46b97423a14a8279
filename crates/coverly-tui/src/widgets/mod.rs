//! Reusable rendering pieces shared by the screens and the dialog overlay.

pub mod dialog;
pub mod fill_bar;
pub mod log_panel;
pub mod text_input;
