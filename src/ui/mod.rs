//! UI module - HUD status line and event flash messages

mod hud;

pub use hud::*;
