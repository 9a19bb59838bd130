mod chart_model;
mod chart_runtime;
mod data_controller;
mod engine;
mod engine_config;
mod engine_core;
mod engine_init;
mod engine_snapshot;
mod event_dispatch;
mod interaction_controller;
mod json_contract;
mod listener_registry;
mod playback_controller;
mod render_frame_builder;
mod scene_builder;
mod validation;

pub use engine::ChartEngine;
pub use engine_config::{ChartFamily, ChartSettings};
pub use engine_snapshot::EngineSnapshot;
pub use json_contract::{
    CHART_SETTINGS_JSON_SCHEMA_V1, ChartSettingsJsonContractV1, ENGINE_SNAPSHOT_JSON_SCHEMA_V1,
    EngineSnapshotJsonContractV1,
};
pub use scene_builder::{
    AxisPlacement, AxisTick, ChartScene, DrawnScene, SceneAxis, SceneGeometry,
};
