use serde::Deserialize;

use crate::error::MaskError;
use crate::mask::MaskPattern;

/// Serde-driven mask job matching the TOML format.
#[derive(Debug, Clone, Deserialize)]
struct MaskJobConfig {
    pattern: u8,
    #[serde(default)]
    render: RenderConfig,
}

/// Output rendering options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RenderConfig {
    /// Pixels per module.
    #[serde(default = "default_scale")]
    pub scale: usize,
    /// Quiet zone width in modules.
    #[serde(default = "default_border")]
    pub border: usize,
}

fn default_scale() -> usize {
    10
}

fn default_border() -> usize {
    4
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            scale: default_scale(),
            border: default_border(),
        }
    }
}

/// A validated mask job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskJob {
    pub pattern: MaskPattern,
    pub render: RenderConfig,
}

impl MaskJob {
    /// Parse and validate a TOML job description.
    pub fn from_toml(toml_str: &str) -> Result<MaskJob, ConfigError> {
        let config: MaskJobConfig =
            toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))?;
        let pattern = MaskPattern::try_from(config.pattern)?;
        Ok(MaskJob {
            pattern,
            render: config.render,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config error: {0}")]
    Parse(String),
    #[error("mask error: {0}")]
    Mask(#[from] MaskError),
}
