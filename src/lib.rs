//! chart-geometry: chart layout and interaction engine.
//!
//! The crate turns tabular data plus settings into positioned geometry
//! (bars, dumbbells, lines, circles, map shapes, heatmap cells, donut arcs,
//! unit dots), tracks hover, click and legend state, and steps a time
//! playback over the dates found in the data. Drawing is delegated to a
//! [`render::Renderer`] that receives backend-agnostic frames.

pub mod animation;
pub mod api;
pub mod core;
pub mod error;
pub mod extensions;
pub mod interaction;
pub mod presentation;
pub mod render;
pub mod telemetry;

pub use api::{ChartEngine, ChartFamily, ChartScene, ChartSettings};
pub use error::{ChartError, ChartResult};
