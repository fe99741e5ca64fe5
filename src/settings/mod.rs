// SPDX-License-Identifier: GPL-3.0-or-later
use anyhow::Context as _;
use serde::Deserialize;

use std::fs;

mod cli;
pub(crate) mod gradient;

pub(crate) use cli::Args;

use crate::camera::CameraSettings;
use crate::render::RenderSettings;
use crate::stream::StreamSettings;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Settings {
    /// Camera connection settings.
    #[serde(default)]
    pub(crate) camera: CameraSettings,

    /// Settings for the HTTP server serving the video stream.
    #[serde(default)]
    pub(crate) streams: StreamSettings,

    /// Settings for how frames are rendered for the video stream.
    #[serde(default)]
    pub(crate) render: RenderSettings,
}

impl Settings {
    /// Load the configuration file (if one was given) and apply command line
    /// overrides on top of it.
    pub(crate) fn from_args(args: &Args) -> anyhow::Result<Self> {
        let mut settings = match &args.config_path {
            Some(path) => {
                let config_data = fs::read_to_string(path)
                    .with_context(|| format!("Error reading config file {}", path.display()))?;
                toml::from_str(&config_data)
                    .with_context(|| format!("Error parsing config file {}", path.display()))?
            }
            None => Self::default(),
        };
        if let Some(address) = args.address {
            settings.camera.address = address;
        }
        Ok(settings)
    }
}
