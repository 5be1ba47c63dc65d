//! Sift Services Layer
//!
//! Host-facing configuration: loading settings from disk and turning them
//! into validated core types.

pub mod settings;

pub use settings::{
    BuilderSettings, GridSettings, QuerySettings, Settings, SettingsError, SimulationSettings,
};
