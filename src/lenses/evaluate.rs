//! Forward polynomial evaluation: sensor sample to outer pupil.
use super::constants::LensConstants;
use super::polynomial::{CoefficientSet, INPUT_COUNT};
use crate::core::geometry::{Point2f, Vector2f};
use crate::core::types::{clamp, Float};

/// Sensor-side input of the forward map.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct OpticalSample {
    /// Sensor position in mm.
    pub x: Float,
    pub y: Float,
    /// Aperture direction.
    pub dx: Float,
    pub dy: Float,
    /// Wavelength in micrometers.
    pub lambda: Float
}

impl OpticalSample {
    pub fn new(x: Float, y: Float, dx: Float, dy: Float, lambda: Float) -> OpticalSample {
        OpticalSample { x, y, dx, dy, lambda }
    }

    /// A sample through the centre of the aperture.
    pub fn at_aperture_centre(x: Float, y: Float, lambda: Float) -> OpticalSample {
        OpticalSample { x, y, dx: 0.0, dy: 0.0, lambda }
    }

    #[inline]
    pub fn inputs(&self) -> [Float; INPUT_COUNT] {
        [self.x, self.y, self.dx, self.dy, self.lambda]
    }
}

/// Outer pupil side output of the forward map.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct PupilResult {
    pub x: Float,
    pub y: Float,
    pub dx: Float,
    pub dy: Float,
    /// Fraction of light passing the lens, in `[0, 1]`.
    pub transmittance: Float
}

impl PupilResult {
    pub fn position(&self) -> Point2f {
        Point2f::new(self.x, self.y)
    }

    pub fn direction(&self) -> Vector2f {
        Vector2f::new(self.dx, self.dy)
    }
}

/// Radial vignetting falloff for a sensor position.
///
/// Full transmission inside 70% of the maximum sensor radius, then a linear ramp reaching
/// 0.5 at the sensor corner.
pub fn transmittance(lens: &LensConstants, x: Float, y: Float) -> Float {
    let r_s = (x * x + y * y).sqrt();
    let r_max = lens.max_sensor_radius();
    let inner = 0.7 * r_max;
    if r_s <= inner {
        return 1.0;
    }
    let t = (r_s - inner) / (0.3 * r_max);
    clamp(1.0 - 0.5 * t, 0.0, 1.0)
}

/// Map a sensor sample to the outer pupil.
///
/// Total for any input: physical validity shows up as low transmittance, never as an error.
pub fn evaluate(lens: &LensConstants, coefficients: &CoefficientSet, sample: &OpticalSample) -> PupilResult {
    let [x, y, dx, dy] = coefficients.evaluate(&sample.inputs());
    PupilResult {
        x,
        y,
        dx,
        dy,
        transmittance: transmittance(lens, sample.x, sample.y)
    }
}
