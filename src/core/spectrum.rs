//! Minimal spectral helpers used to drive chromatic aberration.
use super::types::Float;
use std::fmt;
use std::ops::{Add, Mul};

/// Representative wavelengths in micrometers for the red, green and blue channels.
pub const RED_WAVELENGTH: Float = 0.65;
pub const GREEN_WAVELENGTH: Float = 0.55;
pub const BLUE_WAVELENGTH: Float = 0.45;

/// Lower and upper bound of the visible band in nanometers.
pub const VISIBLE_MIN_NM: Float = 380.0;
pub const VISIBLE_MAX_NM: Float = 780.0;

/// A linear RGB triple.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Rgb {
    pub r: Float,
    pub g: Float,
    pub b: Float
}

impl Rgb {
    pub fn new(r: Float, g: Float, b: Float) -> Rgb {
        Rgb { r, g, b }
    }

    pub fn black() -> Rgb {
        Rgb::default()
    }

    pub fn is_black(&self) -> bool {
        self.r == 0.0 && self.g == 0.0 && self.b == 0.0
    }

    /// Rec. 709 relative luminance.
    pub fn luminance(&self) -> Float {
        0.2126 * self.r + 0.7152 * self.g + 0.0722 * self.b
    }
}

impl Add for Rgb {
    type Output = Rgb;
    fn add(self, rhs: Rgb) -> Rgb {
        Rgb::new(self.r + rhs.r, self.g + rhs.g, self.b + rhs.b)
    }
}

impl Mul<Float> for Rgb {
    type Output = Rgb;
    fn mul(self, rhs: Float) -> Rgb {
        Rgb::new(self.r * rhs, self.g * rhs, self.b * rhs)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ {}, {}, {} ]", self.r, self.g, self.b)
    }
}

/// A colour channel sampled with its own wavelength.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Channel {
    Red,
    Green,
    Blue
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];

    /// Read back this channel from an RGB value.
    pub fn of(self, c: &Rgb) -> Float {
        match self {
            Channel::Red => c.r,
            Channel::Green => c.g,
            Channel::Blue => c.b
        }
    }
}

/// Approximate the colour of a single wavelength given in micrometers.
///
/// Piecewise linear over six bands between 380nm and 780nm, with the intensity rolling
/// off to 30% at both ends of the visible range. Wavelengths outside it are black.
pub fn wavelength_to_rgb(lambda: Float) -> Rgb {
    let nm = lambda * 1000.0;

    if !(VISIBLE_MIN_NM..=VISIBLE_MAX_NM).contains(&nm) {
        return Rgb::black();
    }

    let (r, g, b) = if nm < 440.0 {
        (-(nm - 440.0) / (440.0 - 380.0), 0.0, 1.0)
    } else if nm < 490.0 {
        (0.0, (nm - 440.0) / (490.0 - 440.0), 1.0)
    } else if nm < 510.0 {
        (0.0, 1.0, -(nm - 510.0) / (510.0 - 490.0))
    } else if nm < 580.0 {
        ((nm - 510.0) / (580.0 - 510.0), 1.0, 0.0)
    } else if nm < 645.0 {
        (1.0, -(nm - 645.0) / (645.0 - 580.0), 0.0)
    } else {
        (1.0, 0.0, 0.0)
    };

    let factor = if nm < 420.0 {
        0.3 + 0.7 * (nm - 380.0) / (420.0 - 380.0)
    } else if nm >= 700.0 {
        0.3 + 0.7 * (780.0 - nm) / (780.0 - 700.0)
    } else {
        1.0
    };

    Rgb::new(r, g, b) * factor
}

/// The wavelength in micrometers used to sample a colour channel.
pub fn sample_wavelength_for_channel(channel: Channel) -> Float {
    match channel {
        Channel::Red => RED_WAVELENGTH,
        Channel::Green => GREEN_WAVELENGTH,
        Channel::Blue => BLUE_WAVELENGTH
    }
}
