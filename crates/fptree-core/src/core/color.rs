//! Wavelength-to-color conversion.
//!
//! A segmented approximation of the visible spectrum: six piecewise-linear
//! bands over 380-780 nm, with an intensity roll-off near the UV and IR
//! edges. Channels are truncated, not rounded, when quantized to 0-255; the
//! golden tests below depend on that.

use std::fmt;

/// Lower bound of the visible range in nanometers.
pub const VISIBLE_MIN_NM: f64 = 380.0;
/// Upper bound of the visible range in nanometers.
pub const VISIBLE_MAX_NM: f64 = 780.0;

/// An 8-bit RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Lowercase `#rrggbb` form, the format the external renderer consumes.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Maps a wavelength in nanometers to an approximate display color.
///
/// Total over all reals: anything outside the visible range maps to black.
pub fn wavelength_to_rgb(wavelength_nm: f64) -> Rgb {
    let nm = wavelength_nm;
    let (r, g, b) = if (VISIBLE_MIN_NM..440.0).contains(&nm) {
        (-(nm - 440.0) / 60.0, 0.0, 1.0)
    } else if (440.0..490.0).contains(&nm) {
        (0.0, (nm - 440.0) / 50.0, 1.0)
    } else if (490.0..510.0).contains(&nm) {
        (0.0, 1.0, -(nm - 510.0) / 20.0)
    } else if (510.0..580.0).contains(&nm) {
        ((nm - 510.0) / 70.0, 1.0, 0.0)
    } else if (580.0..645.0).contains(&nm) {
        (1.0, -(nm - 645.0) / 65.0, 0.0)
    } else if (645.0..=VISIBLE_MAX_NM).contains(&nm) {
        (1.0, 0.0, 0.0)
    } else {
        return Rgb::BLACK;
    };

    let factor = if (VISIBLE_MIN_NM..420.0).contains(&nm) {
        0.3 + 0.7 * (nm - VISIBLE_MIN_NM) / 40.0
    } else if (645.0..=VISIBLE_MAX_NM).contains(&nm) {
        0.3 + 0.7 * (VISIBLE_MAX_NM - nm) / 135.0
    } else {
        1.0
    };

    let quantize = |channel: f64| (channel * factor * 255.0) as u8;
    Rgb::new(quantize(r), quantize(g), quantize(b))
}
