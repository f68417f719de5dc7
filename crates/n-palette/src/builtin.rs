//! Named example palettes — compiled-in material to learn a pattern from.
//!
//! Three well-known 10-stop ramps: a saturated blue, a cool gray, and a
//! green. Learning from all three together gives a pattern that works for
//! chromatic and near-neutral anchors alike.

use n_color::Oklch;

use crate::pattern::{AnalyzedPalette, PaletteStop};
use crate::stop::{STOP_COUNT, StopPosition};

const AZURE: [&str; STOP_COUNT] = [
    "#eff6ff", "#dbeafe", "#bfdbfe", "#93c5fd", "#60a5fa", "#3b82f6", "#2563eb", "#1d4ed8", "#1e40af", "#1e3a8a",
];

const SLATE: [&str; STOP_COUNT] = [
    "#f8fafc", "#f1f5f9", "#e2e8f0", "#cbd5e1", "#94a3b8", "#64748b", "#475569", "#334155", "#1e293b", "#0f172a",
];

const EMERALD: [&str; STOP_COUNT] = [
    "#ecfdf5", "#d1fae5", "#a7f3d0", "#6ee7b7", "#34d399", "#10b981", "#059669", "#047857", "#065f46", "#064e3b",
];

/// Look up a builtin palette by name.
///
/// Returns `None` if the name is not recognized.
#[must_use]
pub fn builtin_palette(name: &str) -> Option<AnalyzedPalette> {
    let hexes = match name {
        "azure" => &AZURE,
        "slate" => &SLATE,
        "emerald" => &EMERALD,
        _ => return None,
    };
    let stops = StopPosition::ALL
        .iter()
        .zip(hexes)
        .map(|(&position, hex)| Oklch::hex(hex).map(|color| PaletteStop { position, color }))
        .collect::<Option<Vec<_>>>()?;
    Some(AnalyzedPalette::new(name, stops))
}

/// List all available builtin palette names.
#[must_use]
pub const fn builtin_names() -> &'static [&'static str] {
    &["azure", "slate", "emerald"]
}

/// Every builtin palette.
#[must_use]
pub fn builtin_palettes() -> Vec<AnalyzedPalette> {
    builtin_names().iter().filter_map(|name| builtin_palette(name)).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
