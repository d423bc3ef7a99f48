//! Game event plumbing
//!
//! The EventBus enables decoupled cross-module communication: ghost playback
//! and lap tracking emit events, the HUD and headless tools consume them.

mod bus;
mod types;

pub use bus::{BusEvent, EventBus, update_event_bus_time};
pub use types::{GameEvent, GhostId};
