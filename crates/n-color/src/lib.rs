// SPDX-License-Identifier: MIT
//
// n-color — OKLCH-native color math for n-shade.
//
// Everything a palette engine needs from a color library and nothing more:
// OKLCH as the one internal representation, conversions out to Oklab and
// sRGB, sRGB gamut checks with chroma-only gamut mapping, a parser that
// reads any CSS color notation, and fixed-precision string rendering.
//
//   parse_color ──► Oklch ──► clamp_to_gamut ──► format_color
//                     │
//                     └──► Oklab / Rgb

// Single-char math variables are standard in color science.
#![allow(clippy::many_single_char_names)]
// Test loops cast small integers to floats.
#![allow(clippy::cast_precision_loss)]
// Lightness/chroma/hue names are inherently similar.
#![allow(clippy::similar_names)]

pub mod color;
pub mod error;
pub mod format;
pub mod parse;
pub mod space;

pub use color::{GAMUT_EPSILON, Oklab, Oklch, Rgb};
pub use error::ColorError;
pub use format::{OutputFormat, format_color};
pub use parse::parse_color;
pub use space::{ACHROMATIC_CHROMA, clamp, hue_diff, normalize_hue, signed_hue_delta};
