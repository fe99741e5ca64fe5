// SPDX-License-Identifier: GPL-3.0-or-later
use image::RgbImage;

use std::convert::TryFrom;

use super::palette::Palette;
use super::settings::RenderSettings;
use crate::error::Error;
use crate::frame::{RadiometricFrame, HEIGHT, WIDTH};

/// The fixed sample range used to normalize radiometric values.
///
/// A fixed window keeps the output visually stable from frame to frame, at
/// the cost of clipping scenes that fall outside it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct CalibrationWindow {
    min: u16,
    max: u16,
}

impl CalibrationWindow {
    pub(crate) fn new(min: u16, max: u16) -> Result<Self, Error> {
        if max <= min {
            return Err(Error::DegenerateWindow { min, max });
        }
        Ok(Self { min, max })
    }

    /// Normalize a raw sample to a palette index.
    ///
    /// Samples outside the window clamp to the palette ends. The reference
    /// implementation only clipped the high end, letting below-window samples
    /// produce an out-of-range index; both ends are clamped here.
    fn index_for(&self, sample: u16) -> u8 {
        let span = i32::from(self.max - self.min);
        let scaled = (i32::from(sample) - i32::from(self.min)) * 255 / span;
        scaled.clamp(0, 255) as u8
    }
}

impl Default for CalibrationWindow {
    /// The window the tCam reference viewer uses for indoor scenes.
    fn default() -> Self {
        Self {
            min: 28915,
            max: 31615,
        }
    }
}

/// Maps radiometric frames to false-color RGB images.
#[derive(Clone, Debug)]
pub(crate) struct Colorizer {
    window: CalibrationWindow,
    palette: Palette,
}

impl Colorizer {
    pub(crate) fn new(window: CalibrationWindow, palette: Palette) -> Self {
        Self { window, palette }
    }

    /// Render a frame into a fresh `HEIGHT` x `WIDTH` RGB buffer.
    pub(crate) fn colorize(&self, frame: &RadiometricFrame) -> RgbImage {
        let mut image = RgbImage::new(WIDTH as u32, HEIGHT as u32);
        for (sample, pixel) in frame.samples().iter().zip(image.pixels_mut()) {
            *pixel = image::Rgb(self.palette.color(self.window.index_for(*sample)));
        }
        image
    }
}

impl TryFrom<&RenderSettings> for Colorizer {
    type Error = Error;

    fn try_from(settings: &RenderSettings) -> Result<Self, Self::Error> {
        let window = CalibrationWindow::new(settings.lower_limit, settings.upper_limit)?;
        Ok(Self::new(window, Palette::from_gradient(settings.colors)))
    }
}
