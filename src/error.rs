// SPDX-License-Identifier: GPL-3.0-or-later
use std::error::Error as StdError;
use std::fmt;

/// Errors from the frame handling path.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum Error {
    /// The radiometric payload did not unpack to exactly `height * width` samples.
    MalformedFrame { expected: usize, actual: usize },

    /// The calibration window has no width, so samples cannot be normalized.
    DegenerateWindow { min: u16, max: u16 },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::MalformedFrame { expected, actual } => write!(
                f,
                "Malformed radiometric payload: expected {} bytes, received {}",
                expected, actual
            ),
            Self::DegenerateWindow { min, max } => write!(
                f,
                "Degenerate calibration window: minimum {} is not below maximum {}",
                min, max
            ),
        }
    }
}

impl StdError for Error {}
