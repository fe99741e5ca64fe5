// SPDX-License-Identifier: GPL-3.0-or-later
mod colorizer;
mod palette;
mod settings;

pub(crate) use colorizer::Colorizer;
pub(crate) use settings::RenderSettings;
