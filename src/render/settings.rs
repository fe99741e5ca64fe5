// SPDX-License-Identifier: GPL-3.0-or-later
use serde::Deserialize;

use crate::settings::gradient;

#[derive(Clone, Copy, Debug, Deserialize)]
pub(crate) struct RenderSettings {
    /// The lower bound of the calibration window, in raw sample units.
    #[serde(default = "RenderSettings::default_lower_limit")]
    pub(crate) lower_limit: u16,

    /// The upper bound of the calibration window, in raw sample units.
    #[serde(default = "RenderSettings::default_upper_limit")]
    pub(crate) upper_limit: u16,

    /// The color gradient the palette is built from.
    #[serde(
        default = "RenderSettings::default_colors",
        deserialize_with = "gradient::deserialize"
    )]
    pub(crate) colors: colorous::Gradient,
}

impl RenderSettings {
    fn default_lower_limit() -> u16 {
        28915
    }

    fn default_upper_limit() -> u16 {
        31615
    }

    fn default_colors() -> colorous::Gradient {
        colorous::INFERNO
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            lower_limit: Self::default_lower_limit(),
            upper_limit: Self::default_upper_limit(),
            colors: Self::default_colors(),
        }
    }
}
