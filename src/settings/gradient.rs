// SPDX-License-Identifier: GPL-3.0-or-later
use colorous::Gradient;
use serde::de::{self, Deserialize, Deserializer};

/// Look up a colorous gradient by name.
///
/// Only the sequential gradients that make sense as thermal false-color ramps
/// are accepted; diverging and categorical ones render confusingly for this
/// kind of data.
pub fn from_str(gradient_name: &str) -> Result<Gradient, &'static str> {
    match &gradient_name.to_uppercase().replace(" ", "_") as &str {
        "CIVIDIS" => Ok(colorous::CIVIDIS),
        "COOL" => Ok(colorous::COOL),
        "CUBEHELIX" => Ok(colorous::CUBEHELIX),
        "GREYS" => Ok(colorous::GREYS),
        "INFERNO" => Ok(colorous::INFERNO),
        "MAGMA" => Ok(colorous::MAGMA),
        "PLASMA" => Ok(colorous::PLASMA),
        "RAINBOW" => Ok(colorous::RAINBOW),
        "SINEBOW" => Ok(colorous::SINEBOW),
        "TURBO" => Ok(colorous::TURBO),
        "VIRIDIS" => Ok(colorous::VIRIDIS),
        "WARM" => Ok(colorous::WARM),
        _ => Err("Invalid gradient name"),
    }
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Gradient, D::Error>
where
    D: Deserializer<'de>,
{
    let gradient_name: String = Deserialize::deserialize(deserializer)?;
    from_str(&gradient_name).map_err(|_| {
        de::Error::invalid_value(
            de::Unexpected::Str(&gradient_name),
            &"a name of a colorous gradient",
        )
    })
}
