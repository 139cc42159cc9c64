//! Aperture sampling functions.

use super::types::{Float, consts::{PI, FRAC_PI_4, FRAC_PI_2}};
use super::geometry::{Point2f, Vector2f};

/// Map a point of the unit square onto the unit disk with Shirley's concentric mapping.
pub fn concentric_sample_disk(u: &Point2f) -> Point2f {
    // Map uniform random numbers to $[-1,1]^2$
    let u_offset = *u * 2.0 - Vector2f::new(1.0, 1.0);

    // Handle degeneracy at the origin
    if u_offset.x == 0.0 && u_offset.y == 0.0 {
        return Point2f::zero();
    }

    // Apply concentric mapping to point
    let theta: Float;
    let r: Float;
    if u_offset.x.abs() > u_offset.y.abs() {
        r = u_offset.x;
        theta = FRAC_PI_4 * (u_offset.y / u_offset.x);
    } else {
        r = u_offset.y;
        theta = FRAC_PI_2 - FRAC_PI_4 * (u_offset.x / u_offset.y);
    }
    r * Point2f::new(theta.cos(), theta.sin())
}

/// Concentric disk sample from two independent uniform values in `[0, 1]`.
#[inline]
pub fn concentric_disk_sample(u1: Float, u2: Float) -> Point2f {
    concentric_sample_disk(&Point2f::new(u1, u2))
}

/// Warp a unit disk sample into a regular polygon with `blade_count` sides.
///
/// Fewer than four blades leave the circular aperture untouched. The polygon is inscribed
/// in the unit circle with its first vertex at angle `rotation` (radians).
pub fn apply_aperture_blades(p: Point2f, blade_count: u32, rotation: Float) -> Point2f {
    if blade_count < 4 {
        return p;
    }

    let r = (p.x * p.x + p.y * p.y).sqrt();
    if r == 0.0 {
        return p;
    }
    let theta = p.y.atan2(p.x);

    // Angle measured from the nearest preceding vertex
    let angle_per_blade = 2.0 * PI / blade_count as Float;
    let phi = theta - rotation;
    let blade_angle = phi - (phi / angle_per_blade).floor() * angle_per_blade;

    // Distance from the centre to the polygon edge along this direction
    let edge_radius = (PI / blade_count as Float).cos() / (blade_angle - 0.5 * angle_per_blade).cos();

    let r = r * edge_radius;
    Point2f::new(r * theta.cos(), r * theta.sin())
}

/// Fraction of the wide open aperture radius left at the given f-stop.
///
/// An f-stop below 0.01 means wide open.
pub fn aperture_scale(fstop: Float, fstop_min: Float) -> Float {
    if fstop < 0.01 {
        1.0
    } else {
        fstop_min / fstop
    }
}
