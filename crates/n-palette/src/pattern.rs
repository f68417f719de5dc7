//! Pattern extraction — learn how each stop relates to the reference stop.
//!
//! For every stop of every example palette we measure three numbers against
//! that palette's own stop 500:
//!
//! - lightness multiplier `stop.l / ref.l`
//! - chroma multiplier `stop.c / ref.c`
//! - hue shift, the signed shortest rotation from `ref.h` to `stop.h`
//!
//! Several examples are averaged stop by stop. Stops that no example covers
//! stay empty here and are filled in by [`crate::smooth`].

use n_color::{Oklch, parse_color, signed_hue_delta};
use serde::{Deserialize, Serialize};

use crate::error::{PatternError, Result};
use crate::stop::{STOP_COUNT, StopPosition};

/// Stand-in for the reference chroma when the reference stop is gray.
/// A gray example then contributes absolute chroma measured in tenths.
pub const NOTIONAL_REFERENCE_CHROMA: f32 = 0.1;

/// Floor for the reference lightness before dividing by it.
const MIN_REFERENCE_LIGHTNESS: f32 = 1e-3;

// ---------------------------------------------------------------------------
// Palettes
// ---------------------------------------------------------------------------

/// One stop of a palette.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaletteStop {
    pub position: StopPosition,
    pub color: Oklch,
}

/// An example palette to learn from. Ideally covers all ten stops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedPalette {
    pub name: String,
    pub stops: Vec<PaletteStop>,
}

impl AnalyzedPalette {
    #[must_use]
    pub fn new(name: impl Into<String>, stops: Vec<PaletteStop>) -> Self {
        Self {
            name: name.into(),
            stops,
        }
    }

    /// Build a palette from `(stop value, color string)` pairs.
    ///
    /// # Errors
    ///
    /// Fails on a stop value off the 100..1000 grid or an unreadable color.
    pub fn from_strings(name: impl Into<String>, entries: &[(u16, &str)]) -> Result<Self> {
        let stops = entries
            .iter()
            .map(|&(position, color)| -> Result<PaletteStop> {
                Ok(PaletteStop {
                    position: StopPosition::try_from(position)?,
                    color: parse_color(color)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(name, stops))
    }

    /// The color at `stop`, if the palette has one.
    #[must_use]
    pub fn color_at(&self, stop: StopPosition) -> Option<Oklch> {
        self.stops.iter().find(|s| s.position == stop).map(|s| s.color)
    }

    fn check_unique(&self) -> std::result::Result<(), PatternError> {
        let mut seen = [false; STOP_COUNT];
        for stop in &self.stops {
            let slot = &mut seen[stop.position.index()];
            if *slot {
                return Err(PatternError::DuplicateStop {
                    palette: self.name.clone(),
                    position: stop.position,
                });
            }
            *slot = true;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// StopTransform
// ---------------------------------------------------------------------------

/// How one stop's color relates to the reference stop's color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopTransform {
    pub lightness_multiplier: f32,
    pub chroma_multiplier: f32,
    pub hue_shift_degrees: f32,
}

impl StopTransform {
    /// The reference stop's own transform.
    pub const IDENTITY: Self = Self {
        lightness_multiplier: 1.0,
        chroma_multiplier: 1.0,
        hue_shift_degrees: 0.0,
    };

    #[must_use]
    pub const fn new(lightness_multiplier: f32, chroma_multiplier: f32, hue_shift_degrees: f32) -> Self {
        Self {
            lightness_multiplier,
            chroma_multiplier,
            hue_shift_degrees,
        }
    }

    /// Measure `color` against `reference`.
    #[must_use]
    pub fn between(color: Oklch, reference: Oklch) -> Self {
        let lightness_multiplier = color.l / reference.l.max(MIN_REFERENCE_LIGHTNESS);
        let chroma_multiplier = if reference.is_achromatic() {
            color.c / NOTIONAL_REFERENCE_CHROMA
        } else {
            color.c / reference.c
        };
        // A gray has no hue to shift from or to.
        let hue_shift_degrees = if color.is_achromatic() || reference.is_achromatic() {
            0.0
        } else {
            signed_hue_delta(reference.h, color.h)
        };
        Self {
            lightness_multiplier,
            chroma_multiplier,
            hue_shift_degrees,
        }
    }
}

// ---------------------------------------------------------------------------
// TransformationPattern
// ---------------------------------------------------------------------------

/// Per-stop transforms as learned, possibly with gaps.
///
/// The reference stop is always present and always the identity.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformationPattern {
    transforms: [Option<StopTransform>; STOP_COUNT],
}

impl TransformationPattern {
    /// Build a pattern from raw per-stop transforms. The reference entry is
    /// overwritten with the identity.
    #[must_use]
    pub const fn from_transforms(mut transforms: [Option<StopTransform>; STOP_COUNT]) -> Self {
        transforms[StopPosition::REFERENCE.index()] = Some(StopTransform::IDENTITY);
        Self { transforms }
    }

    /// The stop every transform is measured against.
    #[must_use]
    pub const fn reference(&self) -> StopPosition {
        StopPosition::REFERENCE
    }

    /// Transform for `stop`, if any example covered it.
    #[must_use]
    pub const fn get(&self, stop: StopPosition) -> Option<StopTransform> {
        self.transforms[stop.index()]
    }

    /// Raw per-stop slots, indexed by stop index.
    #[must_use]
    pub const fn slots(&self) -> &[Option<StopTransform>; STOP_COUNT] {
        &self.transforms
    }

    /// How many of the ten stops have a transform.
    #[must_use]
    pub fn known_count(&self) -> usize {
        self.transforms.iter().filter(|t| t.is_some()).count()
    }

    /// Whether every stop has a transform.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.known_count() == STOP_COUNT
    }
}

/// Running per-stop sums. Hue shifts are angles, so they are summed as unit
/// vectors: +179 and -179 average to 180, not 0.
#[derive(Clone, Copy, Default)]
struct Accumulator {
    lightness: f32,
    chroma: f32,
    hue_x: f32,
    hue_y: f32,
    count: u32,
}

impl Accumulator {
    fn add(&mut self, t: StopTransform) {
        self.lightness += t.lightness_multiplier;
        self.chroma += t.chroma_multiplier;
        let (sin, cos) = t.hue_shift_degrees.to_radians().sin_cos();
        self.hue_x += cos;
        self.hue_y += sin;
        self.count += 1;
    }

    #[allow(clippy::cast_precision_loss)]
    fn mean(self) -> Option<StopTransform> {
        (self.count > 0).then(|| {
            let n = self.count as f32;
            // Opposite shifts cancel to a zero vector; atan2(0, 0) is 0.
            let hue = signed_hue_delta(0.0, self.hue_y.atan2(self.hue_x).to_degrees());
            StopTransform::new(self.lightness / n, self.chroma / n, hue)
        })
    }
}

/// Learn a pattern from one or more example palettes.
///
/// Palettes without stop 500 are skipped (with a warning). When several
/// palettes cover a stop, their transforms are averaged.
///
/// # Errors
///
/// - [`PatternError::Empty`] for an empty list.
/// - [`PatternError::DuplicateStop`] if a palette lists a stop twice.
/// - [`PatternError::MissingReferenceStop`] if no palette has stop 500.
pub fn extract_patterns(
    palettes: &[AnalyzedPalette],
) -> std::result::Result<TransformationPattern, PatternError> {
    if palettes.is_empty() {
        return Err(PatternError::Empty);
    }

    let reference_stop = StopPosition::REFERENCE;
    let mut sums = [Accumulator::default(); STOP_COUNT];
    let mut contributing = 0usize;

    for palette in palettes {
        palette.check_unique()?;

        let Some(reference) = palette.color_at(reference_stop) else {
            tracing::warn!(palette = %palette.name, "skipping example without stop {reference_stop}");
            continue;
        };
        contributing += 1;

        for stop in &palette.stops {
            let transform = if stop.position == reference_stop {
                StopTransform::IDENTITY
            } else {
                StopTransform::between(stop.color, reference)
            };
            sums[stop.position.index()].add(transform);
        }
    }

    if contributing == 0 {
        return Err(PatternError::MissingReferenceStop {
            reference: reference_stop,
        });
    }

    let pattern = TransformationPattern::from_transforms(sums.map(Accumulator::mean));
    tracing::debug!(
        palettes = contributing,
        known_stops = pattern.known_count(),
        "extracted transformation pattern"
    );
    Ok(pattern)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
