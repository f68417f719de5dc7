//! Palette generation — apply a smoothed pattern around an anchor color.
//!
//! The anchor may sit at any stop, not just the reference. Each target stop
//! is derived from the anchor through the ratio of the two stops'
//! transforms, so the anchor's own stop always gets the identity.

use n_color::{Oklch, clamp, normalize_hue};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::pattern::{PaletteStop, StopTransform};
use crate::smooth::SmoothedPattern;
use crate::stop::{STOP_COUNT, StopPosition};

/// Anchor multipliers smaller than this divide as if they were 1.
const MIN_ANCHOR_MULTIPLIER: f32 = 1e-6;

/// A generated palette: exactly ten stops, ascending, one per position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub name: String,
    pub stops: Vec<PaletteStop>,
}

impl Palette {
    /// The color at `stop`.
    #[must_use]
    pub fn color_at(&self, stop: StopPosition) -> Option<Oklch> {
        self.stops.iter().find(|s| s.position == stop).map(|s| s.color)
    }
}

/// Generate all ten stops around `anchor`, which is asserted to sit at
/// `anchor_stop`.
///
/// An anchor that is already displayable comes back unchanged at its own
/// stop. Every stop is gamut-clamped if needed, so every returned color is
/// displayable.
///
/// # Errors
///
/// [`Error::GenerationInvariant`] if the result is not exactly the ten
/// stops in ascending order. This indicates a bug, not bad input.
pub fn generate_palette_from_stop(
    anchor: Oklch,
    anchor_stop: StopPosition,
    pattern: &SmoothedPattern,
    name: &str,
) -> Result<Palette> {
    let anchor_transform = pattern.transform(anchor_stop);

    let stops: Vec<PaletteStop> = StopPosition::ALL
        .as_slice()
        .par_iter()
        .map(|&position| {
            let relative = if position == anchor_stop {
                StopTransform::IDENTITY
            } else {
                relative_transform(anchor_transform, pattern.transform(position))
            };
            PaletteStop {
                position,
                color: apply_relative(anchor, relative),
            }
        })
        .collect();

    verify_stops(&stops)?;
    Ok(Palette {
        name: name.to_owned(),
        stops,
    })
}

/// How `target` relates to `anchor` rather than to the reference stop.
fn relative_transform(anchor: StopTransform, target: StopTransform) -> StopTransform {
    StopTransform::new(
        ratio(target.lightness_multiplier, anchor.lightness_multiplier),
        ratio(target.chroma_multiplier, anchor.chroma_multiplier),
        target.hue_shift_degrees - anchor.hue_shift_degrees,
    )
}

fn ratio(target: f32, anchor: f32) -> f32 {
    if anchor.is_finite() && anchor.abs() >= MIN_ANCHOR_MULTIPLIER {
        target / anchor
    } else {
        target
    }
}

fn apply_relative(anchor: Oklch, relative: StopTransform) -> Oklch {
    let color = Oklch::oklcha(
        clamp(anchor.l * relative.lightness_multiplier, 0.0, 1.0),
        (anchor.c * relative.chroma_multiplier).max(0.0),
        normalize_hue(anchor.h + relative.hue_shift_degrees),
        anchor.alpha,
    );
    if color.is_displayable() { color } else { color.clamp_to_gamut() }
}

/// Exactly [`StopPosition::ALL`], in order.
fn verify_stops(stops: &[PaletteStop]) -> Result<()> {
    if stops.len() != STOP_COUNT {
        return Err(Error::GenerationInvariant {
            detail: format!("expected {STOP_COUNT} stops, got {}", stops.len()),
        });
    }
    for (stop, expected) in stops.iter().zip(StopPosition::ALL) {
        if stop.position != expected {
            return Err(Error::GenerationInvariant {
                detail: format!("expected stop {expected}, found {}", stop.position),
            });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f32, b: f32, eps: f32) -> bool {
        (a - b).abs() < eps
    }

    fn stop(value: u16) -> StopPosition {
        StopPosition::new(value).unwrap()
    }

    /// Lightness falls 10% of the reference per stop, chroma rises 5%, hue
    /// drifts 2 degrees.
    fn linear_pattern() -> SmoothedPattern {
        SmoothedPattern::from_transforms(std::array::from_fn(|i| {
            let d = i as f32 - 4.0;
            StopTransform::new(1.0 - 0.1 * d, 1.0 + 0.05 * d, 2.0 * d)
        }))
    }

    #[test]
    fn ten_sorted_stops() {
        let palette = generate_palette_from_stop(Oklch::rgb8(45, 114, 210), stop(500), &linear_pattern(), "blue").unwrap();
        assert_eq!(palette.name, "blue");
        let positions: Vec<_> = palette.stops.iter().map(|s| s.position).collect();
        assert_eq!(positions, StopPosition::ALL.to_vec());
    }

    #[test]
    fn anchor_identity_at_any_stop() {
        let anchor = Oklch::oklch(0.6, 0.1, 250.0);
        assert!(anchor.is_displayable());
        for &at in &StopPosition::ALL {
            let palette = generate_palette_from_stop(anchor, at, &linear_pattern(), "p").unwrap();
            let got = palette.color_at(at).unwrap();
            assert_eq!((got.l, got.c, got.h, got.alpha), (anchor.l, anchor.c, anchor.h, anchor.alpha));
        }
    }

    #[test]
    fn relative_to_anchor_stop() {
        let anchor = Oklch::oklch(0.5, 0.03, 100.0);
        let palette = generate_palette_from_stop(anchor, stop(300), &linear_pattern(), "p").unwrap();
        // Stop 500 relative to stop 300: L ratio 1.0 / 1.2, hue +4.
        let at_500 = palette.color_at(stop(500)).unwrap();
        assert!(approx_eq(at_500.l, 0.5 / 1.2, 1e-5));
        assert!(approx_eq(at_500.c, 0.03 / 0.9, 1e-5));
        assert!(approx_eq(at_500.h, 104.0, 1e-3));
    }

    #[test]
    fn alpha_is_carried_to_every_stop() {
        let anchor = Oklch::oklcha(0.6, 0.1, 30.0, 0.4);
        let palette = generate_palette_from_stop(anchor, stop(500), &linear_pattern(), "p").unwrap();
        assert!(palette.stops.iter().all(|s| approx_eq(s.color.alpha, 0.4, 1e-6)));
    }

    #[test]
    fn every_stop_is_displayable() {
        let anchor = Oklch::oklch(0.7, 0.3, 145.0);
        let palette = generate_palette_from_stop(anchor, stop(600), &linear_pattern(), "p").unwrap();
        for s in &palette.stops {
            assert!(s.color.is_displayable(), "{:?} at {}", s.color, s.position);
        }
    }

    #[test]
    fn out_of_gamut_anchor_is_clamped_at_its_own_stop() {
        let anchor = Oklch::oklch(0.6, 0.4, 145.0);
        assert!(!anchor.is_displayable());
        let palette = generate_palette_from_stop(anchor, stop(500), &linear_pattern(), "p").unwrap();
        let got = palette.color_at(stop(500)).unwrap();
        assert!(got.c < anchor.c);
        assert!(approx_eq(got.l, anchor.l, 1e-6));
        assert!(approx_eq(got.h, anchor.h, 1e-6));
    }

    #[test]
    fn degenerate_anchor_multiplier_is_treated_as_one() {
        let mut transforms = [StopTransform::IDENTITY; STOP_COUNT];
        transforms[0] = StopTransform::new(0.0, 0.0, 0.0);
        transforms[9] = StopTransform::new(0.5, 0.5, 0.0);
        let pattern = SmoothedPattern::from_transforms(transforms);
        let anchor = Oklch::oklch(0.6, 0.1, 30.0);
        let palette = generate_palette_from_stop(anchor, stop(100), &pattern, "p").unwrap();
        assert!(palette.stops.iter().all(|s| s.color.l.is_finite() && s.color.c.is_finite()));
        assert_eq!(palette.color_at(stop(100)), Some(anchor));
        assert!(approx_eq(palette.color_at(stop(1000)).unwrap().l, 0.3, 1e-6));
    }

    #[test]
    fn gray_anchor_stays_gray() {
        let palette = generate_palette_from_stop(Oklch::oklch(0.5, 0.0, 0.0), stop(500), &linear_pattern(), "g").unwrap();
        assert!(palette.stops.iter().all(|s| s.color.is_achromatic()));
    }

    #[test]
    fn verify_rejects_bad_stop_lists() {
        let c = Oklch::BLACK;
        let short: Vec<_> = StopPosition::ALL[..9].iter().map(|&position| PaletteStop { position, color: c }).collect();
        assert!(matches!(verify_stops(&short), Err(Error::GenerationInvariant { .. })));

        let mut reversed: Vec<_> = StopPosition::ALL.iter().map(|&position| PaletteStop { position, color: c }).collect();
        reversed.reverse();
        assert!(matches!(verify_stops(&reversed), Err(Error::GenerationInvariant { .. })));
    }
}
