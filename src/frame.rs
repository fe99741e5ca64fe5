// SPDX-License-Identifier: GPL-3.0-or-later
use crate::error::Error;

/// Dimensions of the Lepton 3.5 sensor in a tCam-Mini.
pub(crate) const HEIGHT: usize = 120;
pub(crate) const WIDTH: usize = 160;

const NUM_SAMPLES: usize = HEIGHT * WIDTH;
const PAYLOAD_LENGTH: usize = NUM_SAMPLES * 2;

/// A single frame of raw radiometric data.
///
/// Samples are 16-bit values proportional to temperature, stored in row-major
/// order. No unit conversion is applied; normalization to a displayable range
/// happens later in the renderer.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct RadiometricFrame {
    samples: Vec<u16>,
}

impl RadiometricFrame {
    /// Unpack a frame from the camera's little-endian wire layout.
    ///
    /// The payload must be exactly `HEIGHT * WIDTH` two-byte samples; anything
    /// else is rejected as malformed.
    pub(crate) fn decode(payload: &[u8]) -> Result<Self, Error> {
        if payload.len() != PAYLOAD_LENGTH {
            return Err(Error::MalformedFrame {
                expected: PAYLOAD_LENGTH,
                actual: payload.len(),
            });
        }
        let samples = payload
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        Ok(Self { samples })
    }

    pub(crate) fn samples(&self) -> &[u16] {
        &self.samples
    }

    /// Repack the samples into the camera's wire layout.
    #[cfg(test)]
    pub(crate) fn to_bytes(&self) -> Vec<u8> {
        self.samples
            .iter()
            .flat_map(|sample| sample.to_le_bytes().to_vec())
            .collect()
    }
}
