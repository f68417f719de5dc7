//! Engine configuration.
//!
//! Every field has a default, so a config file only needs the keys it
//! changes:
//!
//! ```json
//! { "smoothing_strength": 0.35, "output_format": "oklch" }
//! ```

use std::fs;
use std::path::Path;

use n_color::OutputFormat;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::optical::ViabilityThresholds;
use crate::smooth::DEFAULT_SMOOTHING_STRENGTH;

/// Default number of batch pairs generated at once.
pub const DEFAULT_MAX_CONCURRENCY: usize = 4;

/// Upper bound on batch workers, whatever the config says.
pub const MAX_CONCURRENCY_LIMIT: usize = 8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Neighbor weight of the smoothing pass, `0.0..=1.0`.
    pub smoothing_strength: f32,
    /// Batch workers; clamped to `1..=8`.
    pub max_concurrency: usize,
    pub viable_lightness_min: f32,
    pub viable_lightness_max: f32,
    /// Fraction of reference chroma gamut clamping may remove before an
    /// optical transfer is flagged.
    pub max_chroma_loss: f32,
    pub output_format: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        let viability = ViabilityThresholds::default();
        Self {
            smoothing_strength: DEFAULT_SMOOTHING_STRENGTH,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            viable_lightness_min: viability.lightness_min,
            viable_lightness_max: viability.lightness_max,
            max_chroma_loss: viability.max_chroma_loss,
            output_format: OutputFormat::default(),
        }
    }
}

impl Config {
    /// Read a JSON config file. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// [`Error::Io`](crate::Error::Io) if the file cannot be read,
    /// [`Error::Json`](crate::Error::Json) if it is not a valid config.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Parse a JSON config document.
    ///
    /// # Errors
    ///
    /// [`Error::Json`](crate::Error::Json) on malformed input or unknown
    /// output format names.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Thresholds for the optical transfer viability check.
    #[must_use]
    pub const fn viability(&self) -> ViabilityThresholds {
        ViabilityThresholds {
            lightness_min: self.viable_lightness_min,
            lightness_max: self.viable_lightness_max,
            max_chroma_loss: self.max_chroma_loss,
        }
    }

    /// Batch worker count actually used.
    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.max_concurrency.clamp(1, MAX_CONCURRENCY_LIMIT)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
