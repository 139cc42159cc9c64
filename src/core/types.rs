//! Type definitions and constants.

#[cfg(feature = "float_as_double")]
mod float_mod {
    pub type Float = f64;
    pub mod consts {
        pub use std::f64::consts::*;
    }
}
#[cfg(not(feature = "float_as_double"))]
mod float_mod {
    pub type Float = f32;
    pub mod consts {
        pub use std::f32::consts::*;
    }
}

pub use float_mod::Float;
pub mod consts {
    use super::float_mod::Float;
    pub use super::float_mod::consts::*;
    pub const FRAC_PI_180: Float = PI / 180.0;
}

/// Convert an angle from degrees into radians.
pub fn radians(deg: Float) -> Float {
    consts::FRAC_PI_180 * deg
}

/// Clamp a value into `[low, high]`.
#[inline]
pub fn clamp(value: Float, low: Float, high: Float) -> Float {
    num::clamp(value, low, high)
}
