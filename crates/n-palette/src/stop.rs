//! Stop positions — the ten fixed lightness tiers of a palette.
//!
//! 100 is the lightest tier, 1000 the darkest. The set is closed, so a stop
//! is stored as its index (0..10) and per-stop data lives in plain arrays.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::PatternError;

/// Number of stops in every palette.
pub const STOP_COUNT: usize = 10;

/// The stop every pattern is measured against.
pub const REFERENCE_STOP: StopPosition = StopPosition::REFERENCE;

/// One of `100, 200, …, 1000`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct StopPosition(u8);

impl StopPosition {
    /// All ten stops, ascending.
    pub const ALL: [Self; STOP_COUNT] = [
        Self(0),
        Self(1),
        Self(2),
        Self(3),
        Self(4),
        Self(5),
        Self(6),
        Self(7),
        Self(8),
        Self(9),
    ];

    /// The stop patterns are measured against.
    pub const REFERENCE: Self = Self(4);

    /// Stop from its numeric value (`100`..=`1000`, multiples of 100).
    #[must_use]
    pub const fn new(value: u16) -> Option<Self> {
        if value >= 100 && value <= 1000 && value % 100 == 0 {
            #[allow(clippy::cast_possible_truncation)]
            Some(Self((value / 100 - 1) as u8))
        } else {
            None
        }
    }

    /// Stop from its index in [`Self::ALL`].
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < STOP_COUNT {
            #[allow(clippy::cast_possible_truncation)]
            Some(Self(index as u8))
        } else {
            None
        }
    }

    /// Numeric value, e.g. `500`.
    #[must_use]
    pub const fn value(self) -> u16 {
        (self.0 as u16 + 1) * 100
    }

    /// Position in [`Self::ALL`], 0 for stop 100.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl TryFrom<u16> for StopPosition {
    type Error = PatternError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(PatternError::InvalidStop { position: value })
    }
}

impl From<StopPosition> for u16 {
    fn from(stop: StopPosition) -> Self {
        stop.value()
    }
}

impl fmt::Debug for StopPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Stop({})", self.value())
    }
}

impl fmt::Display for StopPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
