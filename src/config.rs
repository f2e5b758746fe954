//! Editor configuration module.
//!
//! Handles loading and validating an `avnac.toml` file. Every section and
//! key is optional; a file overrides only the keys it names.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [export]
//! file_name = "edited-image.png"  # Suggested name for exported files
//!
//! [render]
//! resample = "triangle"   # nearest | triangle | catmull-rom | gaussian | lanczos3
//!
//! [resize]
//! live = false            # true: width/height edits re-render immediately
//!
//! [panel]
//! visible = true          # Adjustment panel shown at startup
//!
//! [processing]
//! max_threads = 4         # Max render worker threads (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::Resample;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the config file looked up by [`load_config`].
pub const CONFIG_FILENAME: &str = "avnac.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Editor configuration loaded from `avnac.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    /// Export naming.
    pub export: ExportConfig,
    /// Resampling used when the output size differs from the source.
    pub render: RenderConfig,
    /// Whether resize edits commit immediately.
    pub resize: ResizeConfig,
    /// Initial adjustment panel state.
    pub panel: PanelConfig,
    /// Render worker threads.
    pub processing: ProcessingConfig,
}

impl EditorConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let name = self.export.file_name.trim();
        if name.is_empty() {
            return Err(ConfigError::Validation(
                "export.file_name must not be empty".into(),
            ));
        }
        if name.contains(['/', '\\']) {
            return Err(ConfigError::Validation(
                "export.file_name must be a bare file name, not a path".into(),
            ));
        }
        if self.processing.max_threads == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_threads must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// File name suggested to the delivery sink.
    pub file_name: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_name: "edited-image.png".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    pub resample: Resample,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResizeConfig {
    /// Commit and re-render on every width/height edit instead of waiting
    /// for an explicit apply.
    pub live: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PanelConfig {
    pub visible: bool,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self { visible: true }
    }
}

/// Parallel rendering settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of render worker threads.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_threads: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_threads.map(|n| n.min(cores)).unwrap_or(cores)
}

// =============================================================================
// Config loading
// =============================================================================

/// Parse config text and validate it. Missing keys take their defaults.
pub fn parse_config(content: &str) -> Result<EditorConfig, ConfigError> {
    let config: EditorConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Load `avnac.toml` from the given directory, falling back to defaults
/// when it is absent.
pub fn load_config(dir: &Path) -> Result<EditorConfig, ConfigError> {
    let path = dir.join(CONFIG_FILENAME);
    if !path.exists() {
        return Ok(EditorConfig::default());
    }
    load_config_file(&path)
}

/// Load an explicitly named config file. A missing file is an error.
pub fn load_config_file(path: &Path) -> Result<EditorConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Returns a fully-commented stock `avnac.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# avnac Configuration
# ===================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Export
# ---------------------------------------------------------------------------
[export]
# File name suggested for exported PNGs.
file_name = "edited-image.png"

# ---------------------------------------------------------------------------
# Rendering
# ---------------------------------------------------------------------------
[render]
# Resampling filter used when the output size differs from the source.
# One of: nearest, triangle, catmull-rom, gaussian, lanczos3.
resample = "triangle"

# ---------------------------------------------------------------------------
# Resize
# ---------------------------------------------------------------------------
[resize]
# false: width/height edits wait for an explicit apply.
# true: every edit commits and re-renders immediately.
live = false

# ---------------------------------------------------------------------------
# Adjustment panel
# ---------------------------------------------------------------------------
[panel]
# Whether the adjustment panel starts open.
visible = true

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum render worker threads.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_threads = 4
"##
}
