//! Single-palette and transform entry points.
//!
//! These take caller strings, parse them, run the engine, and render the
//! result. Parsing failures surface immediately; nothing is retried.

use n_color::{Oklch, OutputFormat, format_color, parse_color};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::generate::generate_palette_from_stop;
use crate::optical::{ViabilityThresholds, apply_optical_appearance};
use crate::smooth::SmoothedPattern;
use crate::stop::StopPosition;

/// What to generate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteRequest {
    /// Any notation `parse_color` accepts.
    pub input_color: String,
    pub anchor_stop: StopPosition,
    pub output_format: OutputFormat,
    pub palette_name: String,
}

impl PaletteRequest {
    #[must_use]
    pub fn new(
        input_color: impl Into<String>,
        anchor_stop: StopPosition,
        output_format: OutputFormat,
        palette_name: impl Into<String>,
    ) -> Self {
        Self {
            input_color: input_color.into(),
            anchor_stop,
            output_format,
            palette_name: palette_name.into(),
        }
    }
}

/// One rendered stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedStop {
    pub position: StopPosition,
    /// The color rendered in the palette's output format.
    pub value: String,
    pub color: Oklch,
}

/// A generated palette together with the request that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedPalette {
    pub name: String,
    pub anchor_stop: StopPosition,
    pub input_color: String,
    pub output_format: OutputFormat,
    pub stops: Vec<GeneratedStop>,
}

/// Parse, generate and render one palette.
///
/// # Errors
///
/// The first failure: an unreadable input color, a generation invariant
/// violation, or a conversion failure while rendering.
pub fn generate_palette(request: &PaletteRequest, pattern: &SmoothedPattern) -> Result<GeneratedPalette> {
    let anchor = parse_color(&request.input_color)?;
    let palette = generate_palette_from_stop(anchor, request.anchor_stop, pattern, &request.palette_name)?;

    let format = request.output_format;
    let stops = palette
        .stops
        .par_iter()
        .map(|stop| -> Result<GeneratedStop> {
            Ok(GeneratedStop {
                position: stop.position,
                value: format_color(stop.color, format)?,
                color: stop.color,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(GeneratedPalette {
        name: palette.name,
        anchor_stop: request.anchor_stop,
        input_color: request.input_color.clone(),
        output_format: format,
        stops,
    })
}

/// Result of [`transform`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformOutcome {
    pub color: Oklch,
    /// Whether the transfer is trustworthy; see [`ViabilityThresholds::check`].
    pub viable: bool,
}

/// Parse both colors and transfer `reference`'s lightness and chroma onto
/// `target`'s hue.
///
/// # Errors
///
/// Fails if either string is not a color.
pub fn transform(reference: &str, target: &str, thresholds: &ViabilityThresholds) -> Result<TransformOutcome> {
    let reference = parse_color(reference)?;
    let target = parse_color(target)?;
    Ok(TransformOutcome {
        color: apply_optical_appearance(reference, target),
        viable: thresholds.check(reference, target),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
