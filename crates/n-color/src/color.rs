// SPDX-License-Identifier: MIT
//
// Typed colors: OKLCH (the canonical representation), its rectangular
// Oklab form, and 8-bit sRGB for output.
//
// Every palette operation happens on `Oklch`. The other two types exist
// only as conversion targets on the way to a formatted string.
//
// Gamut mapping reduces chroma at fixed lightness and hue until the color
// fits inside sRGB. It never fails and never touches hue.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ColorError;
use crate::parse::parse_hex;
use crate::space::{
    ACHROMATIC_CHROMA, clamp, hue_diff, normalize_hue, oklab_ab_to_oklch, oklch_to_oklab_ab,
    oklch_to_srgb, srgb_to_oklch, to_u8,
};

/// Slack allowed on each sRGB channel before a color counts as out of gamut.
/// Absorbs f32 round-off at the boundary (pure white lands at 1.00000004).
pub const GAMUT_EPSILON: f32 = 1e-4;

/// Lightness this close to 0 or 1 has no room for chroma; gamut mapping
/// returns the gray at that lightness.
const EXTREME_LIGHTNESS: f32 = 1e-3;

/// Binary search steps used by gamut mapping.
const GAMUT_SEARCH_STEPS: usize = 20;

// ─── Oklch ───────────────────────────────────────────────────────────────────

/// A perceptual color in OKLCH space with alpha.
///
/// # Examples
///
/// ```
/// use n_color::Oklch;
///
/// let blue = Oklch::oklch(0.55, 0.16, 255.0);
/// let vivid = Oklch::oklch(0.55, 0.40, 255.0);
///
/// assert!(blue.is_displayable());
/// assert!(!vivid.is_displayable());
/// assert!(vivid.clamp_to_gamut().is_displayable());
/// ```
#[derive(Clone, Copy, Serialize, Deserialize)]
pub struct Oklch {
    /// Lightness: 0.0 (black) to 1.0 (white).
    pub l: f32,

    /// Chroma: 0.0 (gray) upward. sRGB tops out around 0.37.
    pub c: f32,

    /// Hue angle in degrees, [0, 360). 0 for grays.
    pub h: f32,

    /// Opacity: 0.0 (transparent) to 1.0 (opaque).
    #[serde(default = "opaque")]
    pub alpha: f32,
}

const fn opaque() -> f32 {
    1.0
}

impl Oklch {
    // ─── Constructors ────────────────────────────────────────────────────

    /// Create a color from OKLCH values.
    #[inline]
    #[must_use]
    pub const fn oklch(l: f32, c: f32, h: f32) -> Self {
        Self { l, c, h, alpha: 1.0 }
    }

    /// Create a color from OKLCH values with alpha.
    #[inline]
    #[must_use]
    pub const fn oklcha(l: f32, c: f32, h: f32, alpha: f32) -> Self {
        Self { l, c, h, alpha }
    }

    /// Create a color from sRGB values (0.0 to 1.0 range).
    #[must_use]
    pub fn srgb(r: f32, g: f32, b: f32) -> Self {
        Self::srgba(r, g, b, 1.0)
    }

    /// Create a color from sRGB values with alpha.
    #[must_use]
    pub fn srgba(r: f32, g: f32, b: f32, alpha: f32) -> Self {
        let (l, c, h) = srgb_to_oklch(r, g, b);
        Self { l, c, h, alpha }
    }

    /// Create a color from 8-bit sRGB values.
    #[must_use]
    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::srgb(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
        )
    }

    /// Create a color from 8-bit sRGB values with alpha.
    #[must_use]
    pub fn rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::srgba(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            f32::from(a) / 255.0,
        )
    }

    /// Create a color from a hex string (`#RGB`, `#RGBA`, `#RRGGBB`,
    /// `#RRGGBBAA`, `#` optional). Returns `None` for anything else.
    #[must_use]
    pub fn hex(s: &str) -> Option<Self> {
        parse_hex(s)
    }

    /// Pure black.
    pub const BLACK: Self = Self::oklch(0.0, 0.0, 0.0);

    /// Pure white.
    pub const WHITE: Self = Self::oklch(1.0, 0.0, 0.0);

    // ─── Queries ─────────────────────────────────────────────────────────

    /// Whether this color is fully opaque.
    #[inline]
    #[must_use]
    pub fn is_opaque(self) -> bool {
        self.alpha >= 1.0
    }

    /// Whether this color has no visible chroma.
    #[inline]
    #[must_use]
    pub fn is_achromatic(self) -> bool {
        self.c.abs() < ACHROMATIC_CHROMA
    }

    /// Whether all four channels are finite numbers.
    #[inline]
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.l.is_finite() && self.c.is_finite() && self.h.is_finite() && self.alpha.is_finite()
    }

    // ─── Adjustments ─────────────────────────────────────────────────────

    /// Return a copy with the given chroma (floored at 0).
    #[inline]
    #[must_use]
    pub const fn with_chroma(self, c: f32) -> Self {
        Self {
            c: c.max(0.0),
            ..self
        }
    }

    /// Return a copy with the given hue (normalized to [0, 360)).
    #[inline]
    #[must_use]
    pub fn with_hue(self, h: f32) -> Self {
        Self {
            h: normalize_hue(h),
            ..self
        }
    }

    // ─── Gamut ───────────────────────────────────────────────────────────

    /// Whether this color survives the sRGB round-trip without any channel
    /// being clamped.
    #[must_use]
    pub fn is_displayable(self) -> bool {
        if !self.is_finite() {
            return false;
        }
        let lo = -GAMUT_EPSILON;
        let hi = 1.0 + GAMUT_EPSILON;
        let (r, g, b) = oklch_to_srgb(self.l, self.c, self.h);
        (lo..=hi).contains(&r) && (lo..=hi).contains(&g) && (lo..=hi).contains(&b)
    }

    /// Reduce chroma until this color is displayable.
    ///
    /// Lightness is clamped to [0, 1] and hue normalized first. Lightness
    /// and hue are then held fixed while a bounded binary search finds the
    /// largest chroma that stays in gamut. Always returns a displayable
    /// color.
    #[must_use]
    pub fn clamp_to_gamut(self) -> Self {
        let color = Self {
            l: clamp(self.l, 0.0, 1.0),
            c: if self.c.is_finite() { self.c.max(0.0) } else { 0.0 },
            h: normalize_hue(self.h),
            alpha: clamp(self.alpha, 0.0, 1.0),
        };
        if color.is_displayable() {
            return color;
        }

        if color.l < EXTREME_LIGHTNESS || color.l > 1.0 - EXTREME_LIGHTNESS {
            return Self { c: 0.0, ..color };
        }

        // Binary search for maximum in-gamut chroma. `lo` is always
        // displayable: the gray at any lightness in [0, 1] is.
        let mut lo: f32 = 0.0;
        let mut hi: f32 = color.c;
        for _ in 0..GAMUT_SEARCH_STEPS {
            let mid = (lo + hi) * 0.5;
            if (Self { c: mid, ..color }).is_displayable() {
                lo = mid;
            } else {
                hi = mid;
            }
        }

        tracing::trace!(from = color.c, to = lo, l = color.l, h = color.h, "gamut clamp");
        Self { c: lo, ..color }
    }

    // ─── Conversions ─────────────────────────────────────────────────────

    pub(crate) fn ensure_finite(self, to_space: &'static str) -> Result<(), ColorError> {
        if self.is_finite() {
            Ok(())
        } else {
            Err(ColorError::conversion(
                "oklch",
                to_space,
                format!("{self:?}"),
                "non-finite channel",
            ))
        }
    }

    /// Rectangular form of this color.
    ///
    /// # Errors
    ///
    /// Returns [`ColorError::Conversion`] if any channel is not finite.
    pub fn to_oklab(self) -> Result<Oklab, ColorError> {
        self.ensure_finite("oklab")?;
        let (a, b) = oklch_to_oklab_ab(self.c, self.h);
        Ok(Oklab {
            l: self.l,
            a,
            b,
            alpha: self.alpha,
        })
    }

    /// 8-bit sRGB form of this color. Out-of-gamut channels are clamped, so
    /// callers that care should gamut-map first.
    ///
    /// # Errors
    ///
    /// Returns [`ColorError::Conversion`] if any channel is not finite.
    pub fn to_rgb(self) -> Result<Rgb, ColorError> {
        self.ensure_finite("srgb")?;
        let (r, g, b) = oklch_to_srgb(self.l, self.c, self.h);
        Ok(Rgb {
            r: to_u8(r.clamp(0.0, 1.0)),
            g: to_u8(g.clamp(0.0, 1.0)),
            b: to_u8(b.clamp(0.0, 1.0)),
            alpha: self.alpha.clamp(0.0, 1.0),
        })
    }

    /// Hex string: `#rrggbb`, or `#rrggbbaa` when not opaque.
    ///
    /// # Errors
    ///
    /// Returns [`ColorError::Conversion`] if any channel is not finite.
    pub fn to_hex(self) -> Result<String, ColorError> {
        Ok(self.to_rgb()?.to_hex())
    }
}

impl fmt::Debug for Oklch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_opaque() {
            write!(f, "Oklch({:.4}, {:.4}, {:.1})", self.l, self.c, self.h)
        } else {
            write!(
                f,
                "Oklch({:.4}, {:.4}, {:.1}, {:.2})",
                self.l, self.c, self.h, self.alpha
            )
        }
    }
}

impl fmt::Display for Oklch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::format::format_oklch(*self))
    }
}

impl PartialEq for Oklch {
    fn eq(&self, other: &Self) -> bool {
        const EPS: f32 = 1e-5;
        (self.l - other.l).abs() < EPS
            && (self.c - other.c).abs() < EPS
            && (self.alpha - other.alpha).abs() < EPS
            && (self.is_achromatic()
                || other.is_achromatic()
                || hue_diff(self.h, other.h) < EPS)
    }
}

impl Default for Oklch {
    /// Default is fully opaque black.
    fn default() -> Self {
        Self::BLACK
    }
}

// ─── Oklab ───────────────────────────────────────────────────────────────────

/// Rectangular Oklab: `a = c·cos(h)`, `b = c·sin(h)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Oklab {
    pub l: f32,
    pub a: f32,
    pub b: f32,
    pub alpha: f32,
}

impl Oklab {
    /// Back to the cylindrical form. Grays come back with hue 0.
    #[must_use]
    pub fn to_oklch(self) -> Oklch {
        let (c, h) = oklab_ab_to_oklch(self.a, self.b);
        Oklch::oklcha(self.l, c, h, self.alpha)
    }
}

// ─── Rgb ─────────────────────────────────────────────────────────────────────

/// 8-bit sRGB with a float alpha.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub alpha: f32,
}

impl Rgb {
    /// Hex string: `#rrggbb`, or `#rrggbbaa` when not opaque.
    #[must_use]
    pub fn to_hex(self) -> String {
        let Self { r, g, b, alpha } = self;
        if alpha >= 1.0 {
            format!("#{r:02x}{g:02x}{b:02x}")
        } else {
            let a = to_u8(alpha.clamp(0.0, 1.0));
            format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f32, b: f32, epsilon: f32) -> bool {
        (a - b).abs() < epsilon
    }

    // ── Gamut ────────────────────────────────────────────────────────────

    #[test]
    fn primaries_are_displayable() {
        for (r, g, b) in [(255, 0, 0), (0, 255, 0), (0, 0, 255), (255, 255, 255), (0, 0, 0)] {
            let color = Oklch::rgb8(r, g, b);
            assert!(color.is_displayable(), "({r}, {g}, {b}) -> {color:?}");
        }
    }

    #[test]
    fn black_and_white_constants_are_displayable() {
        assert!(Oklch::BLACK.is_displayable());
        assert!(Oklch::WHITE.is_displayable());
    }

    #[test]
    fn high_chroma_is_not_displayable() {
        assert!(!Oklch::oklch(0.5, 0.4, 140.0).is_displayable());
    }

    #[test]
    fn nan_is_not_displayable() {
        assert!(!Oklch::oklch(f32::NAN, 0.1, 10.0).is_displayable());
    }

    #[test]
    fn clamp_keeps_displayable_color_unchanged() {
        let color = Oklch::oklch(0.6, 0.1, 250.0);
        let clamped = color.clamp_to_gamut();
        assert_eq!(clamped.l.to_bits(), color.l.to_bits());
        assert_eq!(clamped.c.to_bits(), color.c.to_bits());
        assert_eq!(clamped.h.to_bits(), color.h.to_bits());
    }

    #[test]
    fn clamp_reduces_only_chroma() {
        let color = Oklch::oklcha(0.7, 0.35, 145.0, 0.5);
        let clamped = color.clamp_to_gamut();
        assert!(clamped.is_displayable());
        assert!(clamped.c < color.c);
        assert!(clamped.c > 0.05, "too aggressive: {}", clamped.c);
        assert!(approx_eq(clamped.l, 0.7, 1e-6));
        assert!(approx_eq(clamped.h, 145.0, 1e-4));
        assert!(approx_eq(clamped.alpha, 0.5, 1e-6));
    }

    #[test]
    fn clamp_extreme_lightness_goes_gray() {
        let near_white = Oklch::oklch(0.9995, 0.2, 30.0).clamp_to_gamut();
        assert!(near_white.is_displayable());
        assert!(approx_eq(near_white.c, 0.0, 1e-6));

        let over_white = Oklch::oklch(1.4, 0.2, 30.0).clamp_to_gamut();
        assert!(approx_eq(over_white.l, 1.0, 1e-6));
        assert!(over_white.is_displayable());
    }

    #[test]
    fn clamp_handles_garbage() {
        let weird = Oklch::oklcha(-0.3, f32::NAN, -720.5, 3.0).clamp_to_gamut();
        assert!(weird.is_displayable());
        assert!(approx_eq(weird.alpha, 1.0, 1e-6));
    }

    #[test]
    fn clamp_is_tight() {
        // One step up from the found chroma should leave the gamut.
        let clamped = Oklch::oklch(0.5, 0.4, 30.0).clamp_to_gamut();
        assert!(!clamped.with_chroma(clamped.c + 0.001).is_displayable());
    }

    // ── Conversions ──────────────────────────────────────────────────────

    #[test]
    fn oklab_roundtrip() {
        let color = Oklch::oklch(0.62, 0.15, 254.0);
        let back = color.to_oklab().unwrap().to_oklch();
        assert!(approx_eq(back.l, color.l, 1e-6));
        assert!(approx_eq(back.c, color.c, 1e-5));
        assert!(hue_diff(back.h, color.h) < 1e-3, "hue drifted: {}", back.h);
    }

    #[test]
    fn oklab_axes() {
        let lab = Oklch::oklch(0.5, 0.1, 90.0).to_oklab().unwrap();
        assert!(approx_eq(lab.a, 0.0, 1e-6));
        assert!(approx_eq(lab.b, 0.1, 1e-6));
    }

    #[test]
    fn to_rgb_known_value() {
        let rgb = Oklch::rgb8(45, 114, 210).to_rgb().unwrap();
        assert_eq!((rgb.r, rgb.g, rgb.b), (45, 114, 210));
    }

    #[test]
    fn to_hex_opaque_and_translucent() {
        assert_eq!(Oklch::rgb8(200, 100, 50).to_hex().unwrap(), "#c86432");
        let translucent = Oklch::rgba8(200, 100, 50, 128);
        assert_eq!(translucent.to_hex().unwrap(), "#c8643280");
    }

    #[test]
    fn conversion_rejects_non_finite() {
        let bad = Oklch::oklch(0.5, f32::INFINITY, 0.0);
        assert!(matches!(bad.to_rgb(), Err(ColorError::Conversion { .. })));
        assert!(matches!(bad.to_oklab(), Err(ColorError::Conversion { .. })));
    }

    #[test]
    fn achromatic_equality_ignores_hue() {
        assert_eq!(Oklch::oklch(0.5, 0.0, 0.0), Oklch::oklch(0.5, 0.0, 200.0));
        assert_ne!(Oklch::oklch(0.5, 0.1, 0.0), Oklch::oklch(0.5, 0.1, 200.0));
    }

    #[test]
    fn with_hue_normalizes() {
        assert!(approx_eq(Oklch::BLACK.with_hue(-90.0).h, 270.0, 1e-4));
    }
}
