// SPDX-License-Identifier: GPL-3.0-or-later
use colorous::Gradient;

/// A fixed 256-entry false-color lookup table.
///
/// Built once from a [colorous::Gradient] and immutable afterwards; the
/// colorizer indexes into it with normalized 8-bit intensities.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Palette {
    entries: [[u8; 3]; 256],
}

impl Palette {
    pub(crate) fn from_gradient(gradient: Gradient) -> Self {
        let mut entries = [[0u8; 3]; 256];
        for (index, entry) in entries.iter_mut().enumerate() {
            *entry = gradient.eval_rational(index, 256).as_array();
        }
        Self { entries }
    }

    pub(crate) fn color(&self, index: u8) -> [u8; 3] {
        self.entries[usize::from(index)]
    }
}
