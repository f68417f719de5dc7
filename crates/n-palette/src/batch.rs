//! Batch generation — many anchors, one pattern, failures isolated.
//!
//! Pairs run on a dedicated rayon pool so a large batch cannot take over
//! the global pool. A bad pair is recorded and skipped; its siblings still
//! generate. Output keeps input order.

use std::fmt;

use n_color::OutputFormat;
use rayon::prelude::*;

use crate::config::{DEFAULT_MAX_CONCURRENCY, MAX_CONCURRENCY_LIMIT};
use crate::error::{Error, Result};
use crate::request::{GeneratedPalette, PaletteRequest, generate_palette};
use crate::smooth::SmoothedPattern;
use crate::stop::StopPosition;

/// One anchor of a batch.
///
/// The stop is kept as given and validated with the rest of the pair, so a
/// stop like `550` fails only its own pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchPair {
    pub color: String,
    pub stop: u16,
}

impl BatchPair {
    /// `stop` may be a [`StopPosition`] or a raw number.
    #[must_use]
    pub fn new(color: impl Into<String>, stop: impl Into<u16>) -> Self {
        Self {
            color: color.into(),
            stop: stop.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOptions {
    /// Base name; each palette is named `"{group_name}-{n}"`, or just
    /// `group_name` when the batch has a single pair.
    pub group_name: String,
    /// Pairs generated at once, clamped to `1..=8`.
    pub max_concurrency: usize,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            group_name: "palette".to_owned(),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }
}

/// A pair that did not produce a palette.
#[derive(Debug)]
pub struct BatchFailure {
    /// Position of the pair in the input, 0-based.
    pub index: usize,
    pub input: String,
    pub stop: u16,
    pub reason: Error,
}

impl fmt::Display for BatchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pair {} ({:?} @ {}): {}", self.index + 1, self.input, self.stop, self.reason)
    }
}

#[derive(Debug, Default)]
pub struct BatchOutput {
    /// Successful palettes, in input order.
    pub palettes: Vec<GeneratedPalette>,
    /// Whether any pair failed.
    pub partial: bool,
    pub failures: Vec<BatchFailure>,
}

/// Name of the `index`-th (0-based) palette of a batch of `len`.
fn palette_name(group: &str, index: usize, len: usize) -> String {
    if len == 1 { group.to_owned() } else { format!("{group}-{}", index + 1) }
}

/// Generate one palette per pair.
///
/// Never fails as a whole: each pair's error is collected into
/// [`BatchOutput::failures`] and `partial` is set.
#[must_use]
pub fn generate_batch(
    pairs: &[BatchPair],
    format: OutputFormat,
    pattern: &SmoothedPattern,
    options: &BatchOptions,
) -> BatchOutput {
    let run = |index: usize, pair: &BatchPair| -> Result<GeneratedPalette> {
        let request = PaletteRequest::new(
            pair.color.clone(),
            StopPosition::try_from(pair.stop)?,
            format,
            palette_name(&options.group_name, index, pairs.len()),
        );
        generate_palette(&request, pattern)
    };

    let threads = options.max_concurrency.clamp(1, MAX_CONCURRENCY_LIMIT);
    let results: Vec<_> = match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
        Ok(pool) => pool.install(|| pairs.par_iter().enumerate().map(|(i, pair)| run(i, pair)).collect::<Vec<_>>()),
        Err(err) => {
            tracing::warn!(%err, "batch thread pool unavailable, generating sequentially");
            pairs.iter().enumerate().map(|(i, pair)| run(i, pair)).collect::<Vec<_>>()
        }
    };

    let mut output = BatchOutput::default();
    for ((index, pair), result) in pairs.iter().enumerate().zip(results) {
        match result {
            Ok(palette) => output.palettes.push(palette),
            Err(reason) => {
                tracing::warn!(index, input = %pair.color, stop = %pair.stop, %reason, "batch pair failed");
                output.failures.push(BatchFailure {
                    index,
                    input: pair.color.clone(),
                    stop: pair.stop,
                    reason,
                });
            }
        }
    }
    output.partial = !output.failures.is_empty();
    output
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
