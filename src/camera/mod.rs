// SPDX-License-Identifier: GPL-3.0-or-later
mod protocol;
mod session;
mod settings;

pub(crate) use session::{FrameSource, Session};
pub(crate) use settings::CameraSettings;
