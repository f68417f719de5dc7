//! Pattern sources — where example palettes come from.
//!
//! The engine never reaches for files or globals on its own. Callers hand it
//! a [`PatternSource`]: a JSON file, the compiled-in builtins, or a list
//! built in memory. [`load_pattern`] turns any source into a ready-to-use
//! [`SmoothedPattern`]; [`PatternCache`] keeps the result around for callers
//! that generate many palettes from the same source.
//!
//! JSON files hold one palette or an array of them:
//!
//! ```json
//! { "name": "brand", "stops": [{ "position": 500, "hex": "#2d72d2" }] }
//! ```
//!
//! A stop's color may be given as `"hex"`, `"color"` or `"value"`, in any
//! notation `parse_color` reads. `"color"` may also hold OKLCH channels
//! (`{"l": .., "c": .., "h": ..}`), so exported palettes load back as
//! examples.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fs;
use std::path::{Path, PathBuf};

use n_color::{Oklch, parse_color};
use serde::Deserialize;

use crate::builtin::{builtin_names, builtin_palette};
use crate::config::Config;
use crate::error::{Error, PatternError, Result};
use crate::pattern::{AnalyzedPalette, PaletteStop, extract_patterns};
use crate::smooth::{SmoothedPattern, smooth_pattern};
use crate::stop::StopPosition;

/// Anything that can supply example palettes.
pub trait PatternSource: Send + Sync {
    /// Stable identity, used as the cache key.
    fn id(&self) -> String;

    /// Read the example palettes.
    ///
    /// # Errors
    ///
    /// Source-specific: unreadable files, malformed documents, bad colors.
    fn load(&self) -> Result<Vec<AnalyzedPalette>>;
}

/// Learn and smooth a pattern from `source`.
///
/// # Errors
///
/// Whatever the source fails with, or a [`PatternError`] if the palettes
/// cannot produce a pattern.
pub fn load_pattern(source: &dyn PatternSource, config: &Config) -> Result<SmoothedPattern> {
    let palettes = source.load()?;
    tracing::debug!(source = %source.id(), palettes = palettes.len(), "loaded example palettes");
    let pattern = extract_patterns(&palettes)?;
    Ok(smooth_pattern(&pattern, config.smoothing_strength))
}

// ---------------------------------------------------------------------------
// JSON files
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(untagged)]
enum PaletteDocument {
    One(PaletteRecord),
    Many(Vec<PaletteRecord>),
}

#[derive(Deserialize)]
struct PaletteRecord {
    name: String,
    stops: Vec<StopRecord>,
}

#[derive(Deserialize)]
struct StopRecord {
    position: u16,
    hex: Option<String>,
    color: Option<ColorField>,
    value: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ColorField {
    Text(String),
    Channels(Oklch),
}

impl StopRecord {
    fn into_stop(self, palette: &str, source_id: &str) -> Result<PaletteStop> {
        let position = StopPosition::try_from(self.position)?;
        let color = match (&self.hex, &self.color, &self.value) {
            (Some(text), _, _) | (None, Some(ColorField::Text(text)), _) | (None, None, Some(text)) => {
                parse_color(text)?
            }
            (None, Some(ColorField::Channels(color)), _) => *color,
            (None, None, None) => {
                return Err(PatternError::Source {
                    source_id: source_id.to_owned(),
                    reason: format!("stop {position} of palette {palette:?} has no color"),
                }
                .into());
            }
        };
        Ok(PaletteStop { position, color })
    }
}

impl PaletteRecord {
    fn into_palette(self, source_id: &str) -> Result<AnalyzedPalette> {
        let stops = self
            .stops
            .into_iter()
            .map(|stop| stop.into_stop(&self.name, source_id))
            .collect::<Result<Vec<_>>>()?;
        Ok(AnalyzedPalette::new(self.name, stops))
    }
}

/// Parse a palette document. `source_id` names the document in errors.
///
/// # Errors
///
/// [`PatternError::Source`] if the text is not a palette document; stop and
/// color errors as they occur.
pub fn parse_palette_json(text: &str, source_id: &str) -> Result<Vec<AnalyzedPalette>> {
    let document: PaletteDocument = serde_json::from_str(text).map_err(|err| PatternError::Source {
        source_id: source_id.to_owned(),
        reason: err.to_string(),
    })?;
    let records = match document {
        PaletteDocument::One(record) => vec![record],
        PaletteDocument::Many(records) => records,
    };
    records.into_iter().map(|record| record.into_palette(source_id)).collect()
}

/// Example palettes stored in a JSON file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonPaletteFile {
    path: PathBuf,
}

impl JsonPaletteFile {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PatternSource for JsonPaletteFile {
    fn id(&self) -> String {
        format!("file:{}", self.path.display())
    }

    fn load(&self) -> Result<Vec<AnalyzedPalette>> {
        let text = fs::read_to_string(&self.path).map_err(|err| PatternError::Source {
            source_id: self.id(),
            reason: err.to_string(),
        })?;
        parse_palette_json(&text, &self.id())
    }
}

// ---------------------------------------------------------------------------
// Builtins and in-memory palettes
// ---------------------------------------------------------------------------

/// Compiled-in example palettes, all of them or a named subset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltinPalettes {
    names: Vec<String>,
}

impl BuiltinPalettes {
    /// Every builtin palette.
    #[must_use]
    pub fn all() -> Self {
        Self::named(builtin_names().iter().copied())
    }

    /// Only the named builtins.
    #[must_use]
    pub fn named<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}

impl Default for BuiltinPalettes {
    fn default() -> Self {
        Self::all()
    }
}

impl PatternSource for BuiltinPalettes {
    fn id(&self) -> String {
        format!("builtin:{}", self.names.join(","))
    }

    fn load(&self) -> Result<Vec<AnalyzedPalette>> {
        self.names
            .iter()
            .map(|name| {
                builtin_palette(name).ok_or_else(|| {
                    Error::from(PatternError::Source {
                        source_id: self.id(),
                        reason: format!("unknown builtin palette {name:?} (available: {})", builtin_names().join(", ")),
                    })
                })
            })
            .collect()
    }
}

/// Palettes the caller already has in hand.
#[derive(Debug, Clone, PartialEq)]
pub struct InMemoryPalettes {
    id: String,
    palettes: Vec<AnalyzedPalette>,
}

impl InMemoryPalettes {
    #[must_use]
    pub fn new(id: impl Into<String>, palettes: Vec<AnalyzedPalette>) -> Self {
        Self {
            id: id.into(),
            palettes,
        }
    }
}

impl PatternSource for InMemoryPalettes {
    fn id(&self) -> String {
        format!("memory:{}", self.id)
    }

    fn load(&self) -> Result<Vec<AnalyzedPalette>> {
        Ok(self.palettes.clone())
    }
}

// ---------------------------------------------------------------------------
// Cache
// ---------------------------------------------------------------------------

/// Smoothed patterns keyed by source id and smoothing strength.
///
/// Owned by the caller; nothing is cached implicitly.
#[derive(Debug, Default)]
pub struct PatternCache {
    patterns: HashMap<(String, u32), SmoothedPattern>,
}

impl PatternCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached pattern for `source`, loading it on first use.
    ///
    /// # Errors
    ///
    /// Loading errors, see [`load_pattern`]. Failures are not cached.
    pub fn get_or_load(&mut self, source: &dyn PatternSource, config: &Config) -> Result<&SmoothedPattern> {
        let key = (source.id(), config.smoothing_strength.to_bits());
        match self.patterns.entry(key) {
            Entry::Occupied(entry) => {
                tracing::trace!(source = %entry.key().0, "pattern cache hit");
                Ok(entry.into_mut())
            }
            Entry::Vacant(entry) => {
                let pattern = load_pattern(source, config)?;
                Ok(entry.insert(pattern))
            }
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn clear(&mut self) {
        self.patterns.clear();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
