//! Optical appearance transfer — keep one color's lightness and chroma,
//! take another color's hue.
//!
//! Useful for deriving a new anchor: "as light and as saturated as this
//! brand blue, but green". The result is always displayable; chroma is only
//! ever reduced to get there, never increased.

use n_color::Oklch;

/// Thresholds for [`ViabilityThresholds::check`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViabilityThresholds {
    /// References darker than this are too close to black to transfer.
    pub lightness_min: f32,
    /// References lighter than this are too close to white to transfer.
    pub lightness_max: f32,
    /// Largest acceptable fraction of the reference chroma lost to gamut
    /// clamping.
    pub max_chroma_loss: f32,
}

impl Default for ViabilityThresholds {
    fn default() -> Self {
        Self {
            lightness_min: 0.05,
            lightness_max: 0.95,
            max_chroma_loss: 0.5,
        }
    }
}

impl ViabilityThresholds {
    /// Whether transferring `reference` onto `target`'s hue gives a
    /// trustworthy result.
    ///
    /// Gray references and gray targets always do. Otherwise the reference
    /// must not be near black or white, and gamut clamping must not eat more
    /// than `max_chroma_loss` of its chroma.
    #[must_use]
    pub fn check(&self, reference: Oklch, target: Oklch) -> bool {
        if reference.is_achromatic() || target.is_achromatic() {
            return true;
        }
        if !(self.lightness_min..=self.lightness_max).contains(&reference.l) {
            return false;
        }
        let result = apply_optical_appearance(reference, target);
        let loss = 1.0 - result.c / reference.c;
        loss <= self.max_chroma_loss
    }
}

/// `reference`'s lightness, chroma and alpha on `target`'s hue.
///
/// A gray target has no hue to give, so the reference hue is kept. A gray
/// reference gives a gray result. The result is gamut-clamped.
#[must_use]
pub fn apply_optical_appearance(reference: Oklch, target: Oklch) -> Oklch {
    let h = if target.is_achromatic() { reference.h } else { target.h };
    let c = if reference.is_achromatic() { 0.0 } else { reference.c };
    Oklch::oklcha(reference.l, c, h, reference.alpha).clamp_to_gamut()
}

/// [`ViabilityThresholds::check`] with the default thresholds.
#[must_use]
pub fn is_transformation_viable(reference: Oklch, target: Oklch) -> bool {
    ViabilityThresholds::default().check(reference, target)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
