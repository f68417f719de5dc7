//! # n-palette — Pattern-Learning Palette Engine
//!
//! Generates a complete 10-stop palette (100 lightest … 1000 darkest) from a
//! single anchor color. The "shape" of a palette, how lightness, chroma and
//! hue move from stop to stop, is learned from example palettes and then
//! replayed around any anchor at any stop.
//!
//! # Architecture
//!
//! ```text
//! PatternSource (JSON file / builtins / in-memory)
//!     │
//!     ▼
//! pattern.rs:  per-stop multipliers relative to stop 500, averaged
//!     │
//!     ▼
//! smooth.rs:   fill gaps, regularize, monotone lightness, renormalize
//!     │
//!     ▼
//! generate.rs: anchor color + anchor stop → ten gamut-safe stops
//!     │
//!     ▼
//! request.rs:  parse input, render each stop (hex / rgb / oklch / oklab)
//!     │
//!     ▼
//! batch.rs:    many anchors on a bounded pool, failures isolated
//! ```
//!
//! `optical.rs` sits beside the pipeline: it transfers one color's lightness
//! and chroma onto another's hue, typically to derive a new anchor.
//!
//! # Color Space
//!
//! All math happens in OKLCH via `n_color`. Any stop that leaves sRGB is
//! gamut-mapped by reducing chroma only; hue and lightness are kept.

// Lightness/chroma/hue names are inherently similar.
#![allow(clippy::similar_names)]
// Stop indices are tiny; index-to-float casts are exact.
#![allow(clippy::cast_precision_loss)]
// Exact float comparisons are intentional where identity must hold.
#![allow(clippy::float_cmp)]

pub mod batch;
pub mod builtin;
pub mod config;
pub mod error;
pub mod export;
pub mod generate;
pub mod optical;
pub mod pattern;
pub mod request;
pub mod smooth;
pub mod source;
pub mod stop;

pub use batch::{BatchFailure, BatchOptions, BatchOutput, BatchPair, generate_batch};
pub use builtin::{builtin_names, builtin_palette, builtin_palettes};
pub use config::Config;
pub use error::{Error, PatternError, Result};
pub use export::{Exporter, JsonExporter, MemoryExporter};
pub use generate::{Palette, generate_palette_from_stop};
pub use optical::{ViabilityThresholds, apply_optical_appearance, is_transformation_viable};
pub use pattern::{AnalyzedPalette, PaletteStop, StopTransform, TransformationPattern, extract_patterns};
pub use request::{GeneratedPalette, GeneratedStop, PaletteRequest, TransformOutcome, generate_palette, transform};
pub use smooth::{SmoothedPattern, smooth_pattern};
pub use source::{
    BuiltinPalettes, InMemoryPalettes, JsonPaletteFile, PatternCache, PatternSource, load_pattern,
    parse_palette_json,
};
pub use stop::{REFERENCE_STOP, STOP_COUNT, StopPosition};
