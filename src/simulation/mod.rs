//! Simulation module - headless app construction and tick stepping
//!
//! Lets the replay runner and tests drive the game without rendering,
//! one fixed tick at a time.

pub mod app_builder;

pub use app_builder::{HeadlessAppBuilder, step_ticks};
