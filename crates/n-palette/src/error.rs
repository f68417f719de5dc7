//! Palette engine errors.
//!
//! Color problems come from `n_color` and are wrapped as-is. Gamut issues
//! never show up here: they are corrected by clamping.

use n_color::ColorError;
use thiserror::Error;

use crate::stop::StopPosition;

/// Problems learning a pattern from example palettes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    /// No example palettes at all.
    #[error("no example palettes to learn from")]
    Empty,

    /// None of the examples has the reference stop.
    #[error("no example palette has the reference stop {reference}")]
    MissingReferenceStop { reference: StopPosition },

    /// One palette lists the same stop twice.
    #[error("palette {palette:?} lists stop {position} more than once")]
    DuplicateStop { palette: String, position: StopPosition },

    /// A stop value outside `100, 200, …, 1000`.
    #[error("invalid stop position {position}: expected a multiple of 100 from 100 to 1000")]
    InvalidStop { position: u16 },

    /// The palette source could not be read or understood.
    #[error("cannot load palettes from {source_id}: {reason}")]
    Source { source_id: String, reason: String },
}

/// Any failure of the palette engine.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Color(#[from] ColorError),

    #[error(transparent)]
    Pattern(#[from] PatternError),

    /// The generator produced something other than ten unique, sorted
    /// stops. Indicates a bug, not bad input.
    #[error("palette generation invariant violated: {detail}")]
    GenerationInvariant { detail: String },

    #[error("unknown output format {0:?} (expected hex, rgb, oklch or oklab)")]
    UnknownFormat(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
