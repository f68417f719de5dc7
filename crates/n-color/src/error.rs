// SPDX-License-Identifier: MIT
//
// Color errors. Gamut problems are never errors here: out-of-gamut colors
// are corrected by chroma reduction, see `Oklch::clamp_to_gamut`.

use thiserror::Error;

/// Failure to read or convert a color.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// The input is not any color notation we understand.
    #[error("cannot parse color {input:?}: {reason}")]
    Parse { input: String, reason: String },

    /// The color was read but could not be carried into the requested space.
    #[error("cannot convert {value} from {from_space} to {to_space}: {reason}")]
    Conversion {
        from_space: &'static str,
        to_space: &'static str,
        value: String,
        reason: String,
    },
}

impl ColorError {
    pub(crate) fn parse(input: &str, reason: impl Into<String>) -> Self {
        Self::Parse {
            input: input.to_owned(),
            reason: reason.into(),
        }
    }

    pub(crate) fn conversion(
        from_space: &'static str,
        to_space: &'static str,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Conversion {
            from_space,
            to_space,
            value: value.into(),
            reason: reason.into(),
        }
    }
}
