//! Pattern smoothing — turn a learned, possibly gappy pattern into a total
//! one with a well-behaved lightness curve.
//!
//! Four passes, in order:
//!
//! 1. **Gap fill.** Missing stops are interpolated linearly in stop-index
//!    space, or extrapolated from the two nearest known stops at the ends.
//! 2. **Regularize.** A 3-tap pass pulls each interior stop toward the mean
//!    of its neighbors by `strength`.
//! 3. **Monotone lightness.** An isotonic (pool-adjacent-violators) fit
//!    makes lightness multipliers non-increasing from 100 to 1000. Curves
//!    that are already monotone pass through unchanged.
//! 4. **Renormalize.** Everything is rescaled so the reference stop is
//!    exactly the identity again.

use serde::{Deserialize, Serialize};

use crate::pattern::{StopTransform, TransformationPattern};
use crate::stop::{STOP_COUNT, StopPosition};

/// Default neighbor weight for the regularization pass.
pub const DEFAULT_SMOOTHING_STRENGTH: f32 = 0.2;

/// Reference values below this are not divided by during renormalization.
const RENORMALIZE_EPSILON: f32 = 1e-6;

/// A pattern with a transform for every stop.
///
/// Produced by [`smooth_pattern`]. The reference stop's transform is always
/// exactly [`StopTransform::IDENTITY`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmoothedPattern {
    reference_stop: StopPosition,
    transforms: [StopTransform; STOP_COUNT],
}

impl SmoothedPattern {
    /// Build directly from per-stop transforms, indexed by stop index. The
    /// reference entry is overwritten with the identity.
    #[must_use]
    pub const fn from_transforms(mut transforms: [StopTransform; STOP_COUNT]) -> Self {
        transforms[StopPosition::REFERENCE.index()] = StopTransform::IDENTITY;
        Self {
            reference_stop: StopPosition::REFERENCE,
            transforms,
        }
    }

    /// Every stop maps to the identity: a flat palette.
    #[must_use]
    pub const fn identity() -> Self {
        Self::from_transforms([StopTransform::IDENTITY; STOP_COUNT])
    }

    #[must_use]
    pub const fn reference(&self) -> StopPosition {
        self.reference_stop
    }

    /// Transform for `stop`.
    #[must_use]
    pub const fn transform(&self, stop: StopPosition) -> StopTransform {
        self.transforms[stop.index()]
    }

    #[must_use]
    pub const fn transforms(&self) -> &[StopTransform; STOP_COUNT] {
        &self.transforms
    }
}

/// Fill, regularize and monotonize `pattern`.
///
/// `strength` is clamped to `[0, 1]`; 0 disables the regularization pass.
/// Never fails. A pattern with no known stops at all smooths to
/// [`SmoothedPattern::identity`].
#[must_use]
pub fn smooth_pattern(pattern: &TransformationPattern, strength: f32) -> SmoothedPattern {
    let slots = *pattern.slots();
    let known: Vec<usize> = (0..STOP_COUNT).filter(|&i| slots[i].is_some()).collect();
    if known.is_empty() {
        return SmoothedPattern::identity();
    }

    let channel = |f: fn(&StopTransform) -> f32| -> [Option<f32>; STOP_COUNT] {
        slots.map(|slot| slot.as_ref().map(f))
    };

    let mut lightness = fill_gaps(&channel(|t| t.lightness_multiplier), &known);
    let mut chroma = fill_gaps(&channel(|t| t.chroma_multiplier), &known);
    let mut hue = fill_gaps(&channel(|t| t.hue_shift_degrees), &known);
    for v in lightness.iter_mut().chain(chroma.iter_mut()) {
        *v = v.max(0.0);
    }

    let strength = if strength.is_finite() { strength.clamp(0.0, 1.0) } else { 0.0 };
    regularize(&mut lightness, strength);
    regularize(&mut chroma, strength);
    regularize(&mut hue, strength);

    let lightness = monotone_non_increasing(&lightness);

    let r = StopPosition::REFERENCE.index();
    let (ref_l, ref_c, ref_h) = (lightness[r], chroma[r], hue[r]);
    let transforms = std::array::from_fn(|i| {
        StopTransform::new(
            rescale(lightness[i], ref_l),
            rescale(chroma[i], ref_c),
            hue[i] - ref_h,
        )
    });

    SmoothedPattern::from_transforms(transforms)
}

fn rescale(value: f32, reference: f32) -> f32 {
    if reference > RENORMALIZE_EPSILON { value / reference } else { value }
}

// ---------------------------------------------------------------------------
// Passes
// ---------------------------------------------------------------------------

/// Fill `None` slots. `known` lists the filled indices in ascending order
/// and is never empty.
#[allow(clippy::cast_precision_loss)]
fn fill_gaps(values: &[Option<f32>; STOP_COUNT], known: &[usize]) -> [f32; STOP_COUNT] {
    let at = |i: usize| values[i].unwrap_or_default();
    let line = |a: usize, b: usize, i: usize| {
        let t = (i as f32 - a as f32) / (b as f32 - a as f32);
        at(a) + (at(b) - at(a)) * t
    };

    std::array::from_fn(|i| {
        if let Some(v) = values[i] {
            return v;
        }
        let after = known.partition_point(|&k| k < i);
        match (after.checked_sub(1).map(|p| known[p]), known.get(after).copied()) {
            (Some(prev), Some(next)) => line(prev, next, i),
            // Beyond the last known stop: extend the last segment.
            (Some(prev), None) => match after.checked_sub(2).map(|p| known[p]) {
                Some(before) => line(before, prev, i),
                None => at(prev),
            },
            // Before the first known stop.
            (None, Some(next)) => match known.get(after + 1).copied() {
                Some(beyond) => line(next, beyond, i),
                None => at(next),
            },
            (None, None) => 0.0,
        }
    })
}

/// `v[i] = (1 - s)·v[i] + s·(v[i-1] + v[i+1]) / 2` for interior stops,
/// computed from the unsmoothed values.
fn regularize(values: &mut [f32; STOP_COUNT], strength: f32) {
    if strength == 0.0 {
        return;
    }
    let original = *values;
    for i in 1..STOP_COUNT - 1 {
        let neighbors = (original[i - 1] + original[i + 1]) * 0.5;
        values[i] = (1.0 - strength).mul_add(original[i], strength * neighbors);
    }
}

/// Least-squares closest non-increasing sequence (pool adjacent violators).
#[allow(clippy::cast_precision_loss)]
fn monotone_non_increasing(values: &[f32; STOP_COUNT]) -> [f32; STOP_COUNT] {
    // Each block is (sum, len); its fitted value is the mean.
    let mut blocks: Vec<(f32, usize)> = Vec::with_capacity(STOP_COUNT);
    for &v in values {
        blocks.push((v, 1));
        while let [.., (s1, n1), (s2, n2)] = blocks[..] {
            if s1 / n1 as f32 >= s2 / n2 as f32 {
                break;
            }
            blocks.pop();
            blocks.pop();
            blocks.push((s1 + s2, n1 + n2));
        }
    }

    let mut out = [0.0; STOP_COUNT];
    let mut i = 0;
    for (sum, len) in blocks {
        let mean = sum / len as f32;
        out[i..i + len].fill(mean);
        i += len;
    }
    out
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

    fn lightness(p: &SmoothedPattern) -> Vec<f32> {
        p.transforms().iter().map(|t| t.lightness_multiplier).collect()
    }

    fn pattern_from(ls: [Option<f32>; STOP_COUNT]) -> TransformationPattern {
        let ref_l = ls[StopPosition::REFERENCE.index()].unwrap_or(1.0);
        TransformationPattern::from_transforms(
            ls.map(|l| l.map(|l| StopTransform::new(l / ref_l, 1.0, 0.0))),
        )
    }

    fn assert_non_increasing(values: &[f32]) {
        for w in values.windows(2) {
            assert!(w[0] >= w[1] - 1e-6, "not monotone: {values:?}");
        }
    }

    #[test]
    fn reference_is_exact_identity() {
        let p = pattern_from([
            Some(1.5), Some(1.4), Some(1.3), Some(1.1), Some(1.0),
            Some(0.9), Some(0.7), Some(0.6), Some(0.4), Some(0.3),
        ]);
        let s = smooth_pattern(&p, 0.5);
        assert_eq!(s.transform(StopPosition::REFERENCE), StopTransform::IDENTITY);
    }

    #[test]
    fn zero_strength_keeps_monotone_curve() {
        let ls = [1.5, 1.4, 1.3, 1.1, 1.0, 0.9, 0.7, 0.6, 0.4, 0.3];
        let s = smooth_pattern(&pattern_from(ls.map(Some)), 0.0);
        for (got, want) in lightness(&s).iter().zip(ls) {
            assert!(approx_eq(*got, want, 1e-6), "{got} != {want}");
        }
    }

    #[test]
    fn interior_gaps_are_interpolated() {
        let s = smooth_pattern(
            &pattern_from([
                Some(1.8), None, None, Some(1.2), Some(1.0),
                None, Some(0.6), None, None, Some(0.3),
            ]),
            0.0,
        );
        let ls = lightness(&s);
        assert!(approx_eq(ls[1], 1.6, 1e-5));
        assert!(approx_eq(ls[2], 1.4, 1e-5));
        assert!(approx_eq(ls[5], 0.8, 1e-5));
        assert!(approx_eq(ls[7], 0.5, 1e-5));
        assert!(approx_eq(ls[8], 0.4, 1e-5));
    }

    #[test]
    fn ends_are_extrapolated() {
        let s = smooth_pattern(
            &pattern_from([
                None, None, Some(1.2), Some(1.1), Some(1.0),
                Some(0.9), Some(0.8), None, None, None,
            ]),
            0.0,
        );
        let ls = lightness(&s);
        assert!(approx_eq(ls[0], 1.4, 1e-5));
        assert!(approx_eq(ls[9], 0.5, 1e-5));
    }

    #[test]
    fn extrapolation_floors_at_zero() {
        let s = smooth_pattern(
            &pattern_from([
                None, None, None, Some(1.6), Some(1.0),
                None, None, None, None, None,
            ]),
            0.0,
        );
        let ls = lightness(&s);
        assert!(ls.iter().all(|&l| l >= 0.0), "{ls:?}");
        assert!(approx_eq(ls[9], 0.0, 1e-6));
    }

    #[test]
    fn single_known_stop_extends_flat() {
        let s = smooth_pattern(
            &pattern_from([None, None, None, None, Some(1.0), None, None, None, None, None]),
            0.3,
        );
        for t in s.transforms() {
            assert!(approx_eq(t.lightness_multiplier, 1.0, 1e-6));
            assert!(approx_eq(t.chroma_multiplier, 1.0, 1e-6));
            assert!(approx_eq(t.hue_shift_degrees, 0.0, 1e-6));
        }
    }

    #[test]
    fn noisy_curve_becomes_monotone() {
        let s = smooth_pattern(
            &pattern_from([
                Some(1.5), Some(1.6), Some(1.2), Some(1.3), Some(1.0),
                Some(1.05), Some(0.7), Some(0.75), Some(0.4), Some(0.45),
            ]),
            0.2,
        );
        let ls = lightness(&s);
        assert_non_increasing(&ls);
        // The overall shape survives.
        assert!(ls[0] > 1.2 && ls[9] < 0.6, "{ls:?}");
    }

    #[test]
    fn hue_is_rebased_on_reference() {
        let mut slots = [Some(StopTransform::new(1.0, 1.0, 6.0)); STOP_COUNT];
        slots[0] = Some(StopTransform::new(1.0, 1.0, -4.0));
        // The reference starts at 0 and its neighbors pull it off zero.
        let s = smooth_pattern(&TransformationPattern::from_transforms(slots), 0.5);
        assert_eq!(s.transform(StopPosition::REFERENCE), StopTransform::IDENTITY);
        assert!(s.transforms().iter().all(|t| t.hue_shift_degrees.is_finite()));
    }

    #[test]
    fn non_finite_strength_is_ignored() {
        let ls = [1.5, 1.4, 1.3, 1.1, 1.0, 0.9, 0.7, 0.6, 0.4, 0.3];
        let p = pattern_from(ls.map(Some));
        assert_eq!(smooth_pattern(&p, f32::NAN), smooth_pattern(&p, 0.0));
    }

    #[test]
    fn pav_pools_violators() {
        let out = monotone_non_increasing(&[1.0, 2.0, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5]);
        assert!(approx_eq(out[0], 1.5, 1e-6));
        assert!(approx_eq(out[1], 1.5, 1e-6));
        assert_non_increasing(&out);
    }

    #[test]
    fn regularize_leaves_ends() {
        let mut v = [0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0];
        regularize(&mut v, 1.0);
        assert!(approx_eq(v[0], 0.0, 1e-6));
        assert!(approx_eq(v[9], 1.0, 1e-6));
        assert!(approx_eq(v[1], 0.0, 1e-6));
        assert!(approx_eq(v[2], 1.0, 1e-6));
    }
}
