use super::types::Float;
use super::geometry::{Vector2f, Point2f};

/// An interface for the filtering used in image reconstruction.
///
/// `p` is the offset of a sample from the pixel centre, in pixels.
pub trait Filter: Send + Sync {
    fn get_radius(&self) -> Vector2f;
    fn get_inv_radius(&self) -> Vector2f;

    fn evaluate(&self, p: &Point2f) -> Float;
}
