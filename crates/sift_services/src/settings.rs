//! Settings management

use serde::{Deserialize, Serialize};
use sift_core::glam::{IVec2, Vec2};
use sift_core::{BuilderOptions, GridConfig, GridConfigError, NearestQuery, QueryError};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid grid settings: {0}")]
    Grid(#[from] GridConfigError),

    #[error("invalid query settings: {0}")]
    Query(#[from] QueryError),
}

/// Top-level settings file. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub grid: GridSettings,
    pub builder: BuilderSettings,
    pub query: QuerySettings,
    pub simulation: SimulationSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    pub cell_size: [f32; 2],
    pub dimensions: [i32; 2],
    /// World position of cell (0,0). Absent: grid centred on the world origin.
    pub origin: Option<[f32; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderSettings {
    pub parallel_threshold: usize,
    pub diagnostics: bool,
    /// Rayon worker count; 0 keeps rayon's default.
    pub worker_threads: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuerySettings {
    pub max_search_radius: f32,
}

/// Parameters of the headless demo loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    pub enemy_count: u32,
    pub ticks: u64,
    pub seed: u64,
    pub enemy_speed: f32,
    pub report_every: u64,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            cell_size: [4.0, 4.0],
            dimensions: [64, 64],
            origin: None,
        }
    }
}

impl Default for BuilderSettings {
    fn default() -> Self {
        let defaults = BuilderOptions::default();
        Self {
            parallel_threshold: defaults.parallel_threshold,
            diagnostics: defaults.diagnostics,
            worker_threads: 0,
        }
    }
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            max_search_radius: sift_core::grid::DEFAULT_MAX_SEARCH_RADIUS,
        }
    }
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            enemy_count: 2_000,
            ticks: 600,
            seed: 0x51f7,
            enemy_speed: 6.0,
            report_every: 60,
        }
    }
}

impl Settings {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&text)?;
        tracing::info!(path = %path.display(), "settings loaded");
        Ok(settings)
    }

    pub fn from_json(text: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(text)?;
        // Surface grid and query mistakes at load time rather than at first use.
        settings.grid_config()?;
        settings.nearest_query()?;
        Ok(settings)
    }

    pub fn to_json_pretty(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn grid_config(&self) -> Result<GridConfig, GridConfigError> {
        let cell_size = Vec2::from_array(self.grid.cell_size);
        let dimensions = IVec2::from_array(self.grid.dimensions);
        match self.grid.origin {
            Some(origin) => GridConfig::new(cell_size, dimensions, Vec2::from_array(origin)),
            None => GridConfig::centered(cell_size, dimensions),
        }
    }

    pub fn builder_options(&self) -> BuilderOptions {
        BuilderOptions {
            parallel_threshold: self.builder.parallel_threshold,
            diagnostics: self.builder.diagnostics,
        }
    }

    pub fn nearest_query(&self) -> Result<NearestQuery, QueryError> {
        NearestQuery::new(self.query.max_search_radius)
    }
}
