// SPDX-License-Identifier: MIT
//
// Rendering colors as CSS-style strings.
//
// Precision is fixed per channel: lightness as a percentage with 2 decimals,
// chroma and Oklab axes with 3, hue with 1. Alpha is omitted when opaque.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::Oklch;
use crate::error::ColorError;

/// The notation a color is rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `#rrggbb` / `#rrggbbaa`.
    #[default]
    Hex,
    /// `rgb(r, g, b)` / `rgb(r, g, b, a)`.
    Rgb,
    /// `oklch(L% C H)` / `oklch(L% C H / a)`.
    Oklch,
    /// `oklab(L% a b)` / `oklab(L% a b / a)`.
    Oklab,
}

impl OutputFormat {
    /// Lowercase name, as accepted by [`FromStr`].
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Hex => "hex",
            Self::Rgb => "rgb",
            Self::Oklch => "oklch",
            Self::Oklab => "oklab",
        }
    }

    /// All formats.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Hex, Self::Rgb, Self::Oklch, Self::Oklab]
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    /// Case-insensitive. The error carries the rejected name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::all()
            .iter()
            .find(|f| f.name() == lower)
            .copied()
            .ok_or_else(|| s.to_owned())
    }
}

/// Render `color` in `format`.
///
/// # Errors
///
/// Returns [`ColorError::Conversion`] if the color has a non-finite channel.
///
/// # Examples
///
/// ```
/// use n_color::{Oklch, OutputFormat, format_color};
///
/// let color = Oklch::oklcha(0.6235, 0.154, 254.3, 0.5);
/// assert_eq!(
///     format_color(color, OutputFormat::Oklch).unwrap(),
///     "oklch(62.35% 0.154 254.3 / 0.5)"
/// );
/// ```
pub fn format_color(color: Oklch, format: OutputFormat) -> Result<String, ColorError> {
    match format {
        OutputFormat::Hex => color.to_hex(),
        OutputFormat::Rgb => {
            let rgb = color.to_rgb()?;
            Ok(if color.is_opaque() {
                format!("rgb({}, {}, {})", rgb.r, rgb.g, rgb.b)
            } else {
                format!("rgb({}, {}, {}, {})", rgb.r, rgb.g, rgb.b, format_alpha(rgb.alpha))
            })
        }
        OutputFormat::Oklch => {
            color.ensure_finite("css")?;
            Ok(format_oklch(color))
        }
        OutputFormat::Oklab => {
            let lab = color.to_oklab()?;
            Ok(format!(
                "oklab({:.2}% {:.3} {:.3}{})",
                lab.l * 100.0,
                lab.a,
                lab.b,
                alpha_suffix(color)
            ))
        }
    }
}

/// OKLCH notation. Infallible; non-finite channels print as `NaN`/`inf`.
#[must_use]
pub fn format_oklch(color: Oklch) -> String {
    // 359.96 would print as 360.0.
    let h = if (color.h * 10.0).round() >= 3600.0 { 0.0 } else { color.h };
    format!(
        "oklch({:.2}% {:.3} {:.1}{})",
        color.l * 100.0,
        color.c,
        h,
        alpha_suffix(color)
    )
}

fn alpha_suffix(color: Oklch) -> String {
    if color.is_opaque() {
        String::new()
    } else {
        format!(" / {}", format_alpha(color.alpha))
    }
}

/// Up to 3 decimals, trailing zeros trimmed.
fn format_alpha(alpha: f32) -> String {
    let s = format!("{:.3}", alpha.clamp(0.0, 1.0));
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s.is_empty() { "0".to_owned() } else { s.to_owned() }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
