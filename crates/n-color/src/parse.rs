// SPDX-License-Identifier: MIT
//
// Color string parsing.
//
// Three layers, tried in order:
//
//   oklch()/oklab()  → parsed here, so everything `format.rs` emits reads back
//   #hex             → parsed here, byte-exact
//   everything else  → csscolorparser (named colors, rgb(), hsl(), hwb(), …)

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::color::{Oklab, Oklch};
use crate::error::ColorError;
use crate::space::normalize_hue;

/// Chroma (and Oklab a/b) that `100%` stands for in CSS Color 4.
const PERCENT_CHROMA: f32 = 0.4;

static FUNCTIONAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(oklch|oklab)\(\s*([^\s,/()]+)[\s,]+([^\s,/()]+)[\s,]+([^\s,/()]+)\s*(?:/\s*([^\s,/()]+)\s*)?\)$",
    )
    .expect("functional color pattern is a valid regex")
});

/// Parse any supported color notation into OKLCH.
///
/// # Errors
///
/// - [`ColorError::Parse`] if no notation matches.
/// - [`ColorError::Conversion`] if the notation matched but produced a
///   non-finite channel (e.g. `oklch(NaN 0.1 20)`).
///
/// # Examples
///
/// ```
/// use n_color::parse_color;
///
/// let a = parse_color("#2D72D2").unwrap();
/// let b = parse_color("oklch(55.6% 0.12 256.2)").unwrap();
/// let c = parse_color("rebeccapurple").unwrap();
/// assert!(a.is_displayable() && b.is_displayable() && c.is_displayable());
/// ```
pub fn parse_color(input: &str) -> Result<Oklch, ColorError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ColorError::parse(input, "empty input"));
    }

    let color = if let Some(caps) = FUNCTIONAL.captures(trimmed) {
        let space = caps[1].to_ascii_lowercase();
        let alpha = match caps.get(5) {
            Some(m) => parse_alpha(input, m.as_str())?,
            None => 1.0,
        };
        if space == "oklch" {
            parse_oklch_channels(input, &caps[2], &caps[3], &caps[4], alpha)?
        } else {
            parse_oklab_channels(input, &caps[2], &caps[3], &caps[4], alpha)?
        }
    } else if let Some(color) = parse_hex(trimmed) {
        color
    } else {
        let parsed = csscolorparser::parse(trimmed)
            .map_err(|e| ColorError::parse(input, e.to_string()))?;
        Oklch::srgba(parsed.r, parsed.g, parsed.b, parsed.a)
    };

    if color.is_finite() {
        Ok(color)
    } else {
        Err(ColorError::conversion(
            "input",
            "oklch",
            input.trim(),
            "notation produced a non-finite channel",
        ))
    }
}

fn parse_oklch_channels(
    input: &str,
    l: &str,
    c: &str,
    h: &str,
    alpha: f32,
) -> Result<Oklch, ColorError> {
    let l = parse_lightness(input, l)?;
    // Keep NaN visible for the finiteness check; `max` and `normalize_hue`
    // would both turn it into a valid number.
    let c = parse_scaled(input, c, PERCENT_CHROMA)?;
    let c = if c.is_finite() { c.max(0.0) } else { c };
    let h = parse_hue(input, h)?;
    let h = if h.is_finite() { normalize_hue(h) } else { h };
    Ok(Oklch::oklcha(l, c, h, alpha))
}

fn parse_oklab_channels(
    input: &str,
    l: &str,
    a: &str,
    b: &str,
    alpha: f32,
) -> Result<Oklch, ColorError> {
    let lab = Oklab {
        l: parse_lightness(input, l)?,
        a: parse_scaled(input, a, PERCENT_CHROMA)?,
        b: parse_scaled(input, b, PERCENT_CHROMA)?,
        alpha,
    };
    if !(lab.a.is_finite() && lab.b.is_finite()) {
        // atan2 would hide the NaN.
        return Ok(Oklch::oklcha(lab.l, f32::NAN, 0.0, alpha));
    }
    Ok(lab.to_oklch())
}

/// Parse a number, accepting `none` as 0.
fn parse_number(input: &str, token: &str) -> Result<f32, ColorError> {
    if token.eq_ignore_ascii_case("none") {
        return Ok(0.0);
    }
    f32::from_str(token).map_err(|_| ColorError::parse(input, format!("invalid number {token:?}")))
}

/// A number, or a percentage where `100%` means `full`.
fn parse_scaled(input: &str, token: &str, full: f32) -> Result<f32, ColorError> {
    match token.strip_suffix('%') {
        Some(pct) => Ok(parse_number(input, pct)? / 100.0 * full),
        None => parse_number(input, token),
    }
}

fn parse_lightness(input: &str, token: &str) -> Result<f32, ColorError> {
    parse_scaled(input, token, 1.0).map(|l| if l.is_finite() { l.clamp(0.0, 1.0) } else { l })
}

fn parse_alpha(input: &str, token: &str) -> Result<f32, ColorError> {
    parse_scaled(input, token, 1.0).map(|a| if a.is_finite() { a.clamp(0.0, 1.0) } else { a })
}

/// Hue in degrees; `deg`, `rad`, `grad` and `turn` units are converted.
fn parse_hue(input: &str, token: &str) -> Result<f32, ColorError> {
    let lower = token.to_ascii_lowercase();
    if let Some(v) = lower.strip_suffix("deg") {
        parse_number(input, v)
    } else if let Some(v) = lower.strip_suffix("grad") {
        Ok(parse_number(input, v)? * 0.9)
    } else if let Some(v) = lower.strip_suffix("rad") {
        Ok(parse_number(input, v)?.to_degrees())
    } else if let Some(v) = lower.strip_suffix("turn") {
        Ok(parse_number(input, v)? * 360.0)
    } else {
        parse_number(input, &lower)
    }
}

// ─── Hex Parsing ─────────────────────────────────────────────────────────────

/// Parse a hex color string into a color.
pub(crate) fn parse_hex(s: &str) -> Option<Oklch> {
    let s = s.strip_prefix('#').unwrap_or(s);
    let bytes = s.as_bytes();

    match bytes.len() {
        // #RGB
        3 => {
            let r = parse_hex_digit(bytes[0])?;
            let g = parse_hex_digit(bytes[1])?;
            let b = parse_hex_digit(bytes[2])?;
            Some(Oklch::rgb8(r << 4 | r, g << 4 | g, b << 4 | b))
        }
        // #RGBA
        4 => {
            let r = parse_hex_digit(bytes[0])?;
            let g = parse_hex_digit(bytes[1])?;
            let b = parse_hex_digit(bytes[2])?;
            let a = parse_hex_digit(bytes[3])?;
            Some(Oklch::rgba8(r << 4 | r, g << 4 | g, b << 4 | b, a << 4 | a))
        }
        // #RRGGBB
        6 => {
            let r = parse_hex_byte(&bytes[0..2])?;
            let g = parse_hex_byte(&bytes[2..4])?;
            let b = parse_hex_byte(&bytes[4..6])?;
            Some(Oklch::rgb8(r, g, b))
        }
        // #RRGGBBAA
        8 => {
            let r = parse_hex_byte(&bytes[0..2])?;
            let g = parse_hex_byte(&bytes[2..4])?;
            let b = parse_hex_byte(&bytes[4..6])?;
            let a = parse_hex_byte(&bytes[6..8])?;
            Some(Oklch::rgba8(r, g, b, a))
        }
        _ => None,
    }
}

#[inline]
const fn parse_hex_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

#[inline]
fn parse_hex_byte(bytes: &[u8]) -> Option<u8> {
    let hi = parse_hex_digit(bytes[0])?;
    let lo = parse_hex_digit(bytes[1])?;
    Some(hi << 4 | lo)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f32, b: f32, epsilon: f32) -> bool {
        (a - b).abs() < epsilon
    }

    fn assert_rgb8(color: Oklch, expected: (u8, u8, u8)) {
        let rgb = color.to_rgb().unwrap();
        let close = |a: u8, b: u8| (i16::from(a) - i16::from(b)).unsigned_abs() <= 1;
        assert!(
            close(rgb.r, expected.0) && close(rgb.g, expected.1) && close(rgb.b, expected.2),
            "RGB mismatch: got ({}, {}, {}), expected {expected:?}",
            rgb.r,
            rgb.g,
            rgb.b
        );
    }

    // ── Hex ──────────────────────────────────────────────────────────────

    #[test]
    fn hex_rrggbb() {
        assert_rgb8(parse_color("#2D72D2").unwrap(), (45, 114, 210));
    }

    #[test]
    fn hex_short_and_no_hash() {
        assert_rgb8(parse_color("#f80").unwrap(), (255, 136, 0));
        assert_rgb8(parse_color("00ff00").unwrap(), (0, 255, 0));
    }

    #[test]
    fn hex_with_alpha() {
        let color = parse_color("#ff000080").unwrap();
        assert!(approx_eq(color.alpha, 128.0 / 255.0, 0.01));
    }

    #[test]
    fn hex_invalid_lengths() {
        assert!(parse_hex("#12345").is_none());
        assert!(parse_hex("").is_none());
        assert!(parse_hex("#ggg").is_none());
    }

    // ── Functional OKLCH / Oklab ─────────────────────────────────────────

    #[test]
    fn oklch_percent_lightness() {
        let color = parse_color("oklch(62.35% 0.154 254.3)").unwrap();
        assert!(approx_eq(color.l, 0.6235, 1e-5));
        assert!(approx_eq(color.c, 0.154, 1e-5));
        assert!(approx_eq(color.h, 254.3, 1e-3));
        assert!(approx_eq(color.alpha, 1.0, 1e-6));
    }

    #[test]
    fn oklch_number_lightness_with_alpha_and_units() {
        let color = parse_color("OKLCH(0.5 0.1 0.5turn / 50%)").unwrap();
        assert!(approx_eq(color.l, 0.5, 1e-6));
        assert!(approx_eq(color.h, 180.0, 1e-3));
        assert!(approx_eq(color.alpha, 0.5, 1e-6));
    }

    #[test]
    fn oklch_none_and_deg() {
        let color = parse_color("oklch(40% none 30deg)").unwrap();
        assert!(color.is_achromatic());
        assert!(approx_eq(color.h, 30.0, 1e-4));
    }

    #[test]
    fn oklch_negative_hue_wraps() {
        let color = parse_color("oklch(50% 0.1 -90)").unwrap();
        assert!(approx_eq(color.h, 270.0, 1e-3));
    }

    #[test]
    fn oklab_axes() {
        let color = parse_color("oklab(50% 0 0.100 / 0.25)").unwrap();
        assert!(approx_eq(color.c, 0.1, 1e-5));
        assert!(approx_eq(color.h, 90.0, 1e-3));
        assert!(approx_eq(color.alpha, 0.25, 1e-6));
    }

    #[test]
    fn nan_channel_is_conversion_error() {
        let err = parse_color("oklch(50% NaN 30)").unwrap_err();
        assert!(matches!(err, ColorError::Conversion { .. }), "{err:?}");
        let err = parse_color("oklab(50% NaN 0)").unwrap_err();
        assert!(matches!(err, ColorError::Conversion { .. }), "{err:?}");
    }

    #[test]
    fn non_finite_chroma_is_not_a_gray() {
        for input in ["oklch(50% nan 30)", "oklch(0.5 inf 30)", "oklch(0.5 -inf 30)"] {
            let err = parse_color(input).unwrap_err();
            assert!(matches!(err, ColorError::Conversion { .. }), "{input}: {err:?}");
        }
    }

    #[test]
    fn negative_chroma_floors_at_zero() {
        let color = parse_color("oklch(50% -0.1 30)").unwrap();
        assert!(color.c.abs() < f32::EPSILON);
    }

    #[test]
    fn oklch_garbage_channel_is_parse_error() {
        let err = parse_color("oklch(50% zz 30)").unwrap_err();
        assert!(matches!(err, ColorError::Parse { .. }), "{err:?}");
    }

    // ── Delegated CSS notations ──────────────────────────────────────────

    #[test]
    fn named_colors() {
        assert_rgb8(parse_color("red").unwrap(), (255, 0, 0));
        assert_rgb8(parse_color("rebeccapurple").unwrap(), (102, 51, 153));
    }

    #[test]
    fn rgb_and_hsl() {
        assert_rgb8(parse_color("rgb(45, 114, 210)").unwrap(), (45, 114, 210));
        assert_rgb8(parse_color("hsl(0, 100%, 50%)").unwrap(), (255, 0, 0));
    }

    #[test]
    fn gray_has_zero_hue() {
        let gray = parse_color("hsl(200, 0%, 50%)").unwrap();
        assert!(gray.is_achromatic());
        assert!(approx_eq(gray.h, 0.0, 1e-6));
    }

    #[test]
    fn garbage_is_parse_error() {
        for bad in ["not-a-color", "", "   ", "#12", "rgb(1, 2)"] {
            let err = parse_color(bad).unwrap_err();
            assert!(matches!(err, ColorError::Parse { .. }), "{bad:?} gave {err:?}");
        }
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert_rgb8(parse_color("  #2d72d2\n").unwrap(), (45, 114, 210));
    }
}
