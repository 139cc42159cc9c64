//! Physical parameters of a lens design.
use crate::core::types::Float;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Shape of a pupil surface.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PupilGeometry {
    Planar,
    Spherical,
    Cylindrical
}

impl Default for PupilGeometry {
    fn default() -> PupilGeometry {
        PupilGeometry::Spherical
    }
}

/// Static description of one lens design. Lengths are in millimeters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LensConstants {
    pub name: String,
    pub focal_length: Float,
    /// Maximum aperture (smallest f-number).
    pub fstop_min: Float,
    pub outer_pupil_radius: Float,
    pub outer_pupil_curvature_radius: Float,
    pub outer_pupil_curvature_height: Float,
    pub inner_pupil_radius: Float,
    pub inner_pupil_curvature_radius: Float,
    /// Half field of view in degrees.
    pub field_of_view: Float,
    pub aperture_radius_at_fstop_min: Float,
    pub sensor_diagonal: Float,
    pub outer_pupil_geometry: PupilGeometry,
    pub inner_pupil_geometry: PupilGeometry
}

impl LensConstants {
    /// The 50mm f/2.8 double Gauss design on a full frame sensor.
    pub fn double_gauss_50mm() -> LensConstants {
        LensConstants {
            name: String::from("Double Gauss 50mm f/2.8"),
            focal_length: 50.0,
            fstop_min: 2.8,
            outer_pupil_radius: 25.0,
            outer_pupil_curvature_radius: 50.0,
            outer_pupil_curvature_height: 0.0,
            inner_pupil_radius: 10.0,
            inner_pupil_curvature_radius: -30.0,
            field_of_view: 27.0,
            aperture_radius_at_fstop_min: 8.93,
            sensor_diagonal: 43.27,
            outer_pupil_geometry: PupilGeometry::Spherical,
            inner_pupil_geometry: PupilGeometry::Spherical
        }
    }

    /// Half the sensor diagonal, the largest radius a sensor position can have.
    #[inline]
    pub fn max_sensor_radius(&self) -> Float {
        0.5 * self.sensor_diagonal
    }

    /// Aperture radius at the given f-stop; values below 0.01 mean wide open.
    pub fn aperture_radius(&self, fstop: Float) -> Float {
        self.aperture_radius_at_fstop_min * crate::core::sampling::aperture_scale(fstop, self.fstop_min)
    }

    /// The f-stop actually used, never wider than the lens allows.
    #[inline]
    pub fn effective_fstop(&self, fstop: Float) -> Float {
        fstop.max(self.fstop_min)
    }
}

impl fmt::Display for LensConstants {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [ f = {}mm, N = {}, sensor diagonal = {}mm ]",
            self.name, self.focal_length, self.fstop_min, self.sensor_diagonal)
    }
}
