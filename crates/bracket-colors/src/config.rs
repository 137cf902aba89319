//! Persistent configuration.
//!
//! Stored as JSON under the host's configuration directory:
//!
//! ```json
//! {
//!   "use_default_colors": false,
//!   "custom_colors": ["#0080ff", "#c000c0", "#009000"],
//!   "enabled": { "paren": true, "square": true, "brace": true, "angle": false },
//!   "iteration_limit": 50,
//!   "compute_interval_ms": 20,
//!   "redraw_interval_ms": 100
//! }
//! ```
//!
//! Missing keys take their default. A file that cannot be used at all, or that names a color
//! that does not parse, falls back to the built-in palettes.

use crate::driver::{
    DEFAULT_COMPUTE_INTERVAL_MS, DEFAULT_ITERATION_LIMIT, DEFAULT_REDRAW_INTERVAL_MS,
};
use crate::kind::BracketKindSet;
use crate::palette::{Color, ColorParseError, NUM_COLORS, Palette};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Directory name used under the host's plugin configuration directory.
pub const CONFIG_DIR_NAME: &str = "bracketcolors";

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "bracketcolors.json";

#[derive(Debug, Error)]
/// Errors produced while loading or saving the configuration.
pub enum ConfigError {
    #[error("I/O error on '{}': {source}", .path.display())]
    /// Reading, writing or creating the directory failed.
    Io {
        /// The file or directory involved.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },

    #[error("JSON error: {0}")]
    /// The file is not valid configuration JSON.
    Json(#[from] serde_json::Error),

    #[error("invalid color '{value}' for '{key}': {source}")]
    /// A custom color does not parse.
    InvalidColor {
        /// Setting name, e.g. `order_1`.
        key: String,
        /// The rejected value.
        value: String,
        /// Why it failed.
        source: ColorParseError,
    },
}

/// Bracket coloring settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BracketColorsConfig {
    /// Use the built-in light/dark palettes instead of `custom_colors`.
    pub use_default_colors: bool,
    /// User colors, one per color slot, as `#rrggbb`.
    pub custom_colors: [String; NUM_COLORS],
    /// Tracked bracket kinds.
    pub enabled: BracketKindSet,
    /// Positions rescanned per tick.
    pub iteration_limit: usize,
    /// Delay between recompute ticks.
    pub compute_interval_ms: u64,
    /// Delay between redraw passes.
    pub redraw_interval_ms: u64,
}

impl Default for BracketColorsConfig {
    fn default() -> Self {
        Self {
            use_default_colors: true,
            custom_colors: Palette::light_background().to_hex(),
            enabled: BracketKindSet::default(),
            iteration_limit: DEFAULT_ITERATION_LIMIT,
            compute_interval_ms: DEFAULT_COMPUTE_INTERVAL_MS,
            redraw_interval_ms: DEFAULT_REDRAW_INTERVAL_MS,
        }
    }
}

/// `<base>/plugins/bracketcolors/bracketcolors.json`.
pub fn config_path(base_dir: impl AsRef<Path>) -> PathBuf {
    base_dir
        .as_ref()
        .join("plugins")
        .join(CONFIG_DIR_NAME)
        .join(CONFIG_FILE_NAME)
}

impl BracketColorsConfig {
    /// Parse configuration JSON and validate the custom colors.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.custom_palette()?;
        Ok(config)
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load and validate the configuration at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Load the configuration at `path`, never failing.
    ///
    /// A missing file gives the defaults. Any other failure gives the defaults too, with
    /// `use_default_colors` forced on, and is logged.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => config,
            Err(ConfigError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                Self::default()
            }
            Err(err) => {
                tracing::debug!(path = %path.display(), error = %err, "using default bracket colors");
                Self {
                    use_default_colors: true,
                    ..Self::default()
                }
            }
        }
    }

    /// Write the configuration to `path`, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        let json = self.to_json()?;
        fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The custom colors as a palette.
    pub fn custom_palette(&self) -> Result<Palette, ConfigError> {
        let mut colors = Palette::light_background().0;
        for (slot, spec) in self.custom_colors.iter().enumerate() {
            colors[slot] = Color::parse(spec).map_err(|source| ConfigError::InvalidColor {
                key: format!("order_{slot}"),
                value: spec.clone(),
                source,
            })?;
        }
        Ok(Palette(colors))
    }

    /// The palette to paint with on `background`.
    ///
    /// Custom colors that fail to parse fall back to the defaults.
    pub fn palette_for(&self, background: Color) -> Palette {
        if self.use_default_colors {
            return Palette::default_for(background);
        }
        match self.custom_palette() {
            Ok(palette) => palette,
            Err(err) => {
                tracing::debug!(error = %err, "invalid custom bracket colors");
                Palette::default_for(background)
            }
        }
    }
}
