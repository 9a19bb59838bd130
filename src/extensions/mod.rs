//! Host-facing extension points.
//!
//! Keep these decoupled from core paths: listeners only observe.

mod events;

pub use events::{ChartEvent, ChartEventListener, EventContext};
