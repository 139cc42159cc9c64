//! Interface to an external sequential lens raytracer.
//!
//! The polynomial model never depends on one; a backward trace may consult it to refine
//! a sensor position.
use crate::core::geometry::{Point3f, Vector3f};
use crate::core::types::Float;

/// One refracting surface of a lens prescription, listed from the scene toward the sensor.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct LensElement {
    /// Zero marks the aperture stop.
    pub curvature_radius: Float,
    /// Distance to the next surface along the axis, in mm.
    pub thickness: Float,
    /// Index of refraction behind the surface.
    pub eta: Float,
    pub aperture_radius: Float
}

impl LensElement {
    pub fn is_stop(&self) -> bool {
        self.curvature_radius == 0.0
    }
}

/// A lens that can trace individual rays through its real elements.
///
/// Rays start on the sensor plane (`z = 0`, +z toward the scene) and come back as the
/// point and direction where they leave the outer pupil.
pub trait LensSystem: Send + Sync {
    fn id(&self) -> &str;

    fn elements(&self) -> &[LensElement];

    /// `None` when the ray is blocked inside the lens.
    fn trace_ray(&self, origin: &Point3f, direction: &Vector3f, lambda: Float) -> Option<(Point3f, Vector3f)>;

    /// Distance from the sensor to the front element.
    fn total_length(&self) -> Float {
        self.elements().iter().map(|e| e.thickness).sum()
    }
}

/// Source of [`LensSystem`]s by identifier.
pub trait LensLibrary {
    fn load_lens(&self, id: &str) -> Option<Box<dyn LensSystem>>;
}
