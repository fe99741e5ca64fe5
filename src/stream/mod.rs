// SPDX-License-Identifier: GPL-3.0-or-later
mod client_count;
mod jpeg;
mod mjpeg;
mod multipart;
mod settings;

pub(crate) use client_count::ClientCounter;
pub(crate) use jpeg::encode_jpeg;
pub(crate) use mjpeg::MjpegStream;
pub(crate) use settings::StreamSettings;
