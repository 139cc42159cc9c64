//! Inverse aperture solve: which aperture direction reaches a given outer pupil point.
use super::constants::LensConstants;
use super::evaluate::{evaluate, OpticalSample, PupilResult};
use super::polynomial::CoefficientSet;
use crate::core::geometry::Point2f;
use crate::core::sampling::{aperture_scale, apply_aperture_blades, concentric_disk_sample};
use crate::core::types::Float;
use crate::error::SolveError;

/// Numeric parameters of the Newton iteration.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SolverSettings {
    pub max_iterations: u32,
    /// Converged once the squared residual drops below this.
    pub tolerance: Float,
    /// Forward difference step for the Jacobian.
    pub step: Float,
    /// Smallest Jacobian determinant magnitude accepted.
    pub singular_threshold: Float
}

impl Default for SolverSettings {
    fn default() -> SolverSettings {
        SolverSettings {
            max_iterations: 10,
            tolerance: 1e-4,
            step: 1e-3,
            singular_threshold: 1e-10
        }
    }
}

/// A converged aperture direction.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ApertureDirection {
    pub dx: Float,
    pub dy: Float,
    /// Newton steps taken before convergence.
    pub iterations: u32
}

pub type SolverOutcome = Result<ApertureDirection, SolveError>;

/// Find `p` with `f(p) == target` by Newton-Raphson in two variables, starting at `initial`.
///
/// The Jacobian comes from forward differences. Returns the root and the number of
/// steps taken, or the reason for giving up; no estimate is returned on failure.
pub fn newton_2d<F>(f: F, initial: Point2f, target: Point2f, settings: &SolverSettings) -> Result<(Point2f, u32), SolveError>
    where F: Fn(Float, Float) -> Point2f
{
    let h = settings.step;
    let (mut u, mut v) = (initial.x, initial.y);
    let mut squared_error = Float::INFINITY;

    for iteration in 0..settings.max_iterations {
        let value = f(u, v);
        let err_x = value.x - target.x;
        let err_y = value.y - target.y;
        squared_error = err_x * err_x + err_y * err_y;
        if squared_error < settings.tolerance {
            return Ok((Point2f::new(u, v), iteration));
        }

        let du = f(u + h, v);
        let dv = f(u, v + h);
        let j00 = (du.x - value.x) / h;
        let j10 = (du.y - value.y) / h;
        let j01 = (dv.x - value.x) / h;
        let j11 = (dv.y - value.y) / h;

        let determinant = j00 * j11 - j01 * j10;
        if determinant.abs() < settings.singular_threshold || !determinant.is_finite() {
            return Err(SolveError::SingularJacobian { determinant, iteration });
        }

        u -= (j11 * err_x - j01 * err_y) / determinant;
        v -= (-j10 * err_x + j00 * err_y) / determinant;
    }

    Err(SolveError::NonConvergence { iterations: settings.max_iterations, squared_error })
}

/// Aperture direction `(dx, dy)` for which the forward map of `(x, y, dx, dy, lambda)` lands on
/// `(target_x, target_y)` at the outer pupil.
pub fn solve(
    lens: &LensConstants,
    coefficients: &CoefficientSet,
    x: Float,
    y: Float,
    lambda: Float,
    target_x: Float,
    target_y: Float
) -> SolverOutcome {
    solve_with(lens, coefficients, x, y, lambda, target_x, target_y, &SolverSettings::default())
}

/// [`solve`] with explicit iteration settings.
#[allow(clippy::too_many_arguments)]
pub fn solve_with(
    lens: &LensConstants,
    coefficients: &CoefficientSet,
    x: Float,
    y: Float,
    lambda: Float,
    target_x: Float,
    target_y: Float,
    settings: &SolverSettings
) -> SolverOutcome {
    let forward = |dx: Float, dy: Float| {
        evaluate(lens, coefficients, &OpticalSample::new(x, y, dx, dy, lambda)).position()
    };
    let (root, iterations) = newton_2d(forward, Point2f::zero(), Point2f::new(target_x, target_y), settings)?;
    Ok(ApertureDirection { dx: root.x, dy: root.y, iterations })
}

/// A forward camera ray: the sampled aperture direction and where it leaves the lens.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ApertureSample {
    pub dx: Float,
    pub dy: Float,
    pub pupil: PupilResult
}

/// Draw an aperture direction from two uniform numbers and trace it forward.
///
/// The unit square is mapped to the disk, shaped by the aperture blades and stopped down
/// from the lens' maximum aperture to `fstop` (below 0.01 means wide open).
#[allow(clippy::too_many_arguments)]
pub fn sample_aperture(
    lens: &LensConstants,
    coefficients: &CoefficientSet,
    x: Float,
    y: Float,
    lambda: Float,
    u1: Float,
    u2: Float,
    blade_count: u32,
    rotation: Float,
    fstop: Float
) -> ApertureSample {
    let disk = apply_aperture_blades(concentric_disk_sample(u1, u2), blade_count, rotation);
    let direction = disk * aperture_scale(fstop, lens.fstop_min);
    let pupil = evaluate(lens, coefficients, &OpticalSample::new(x, y, direction.x, direction.y, lambda));
    ApertureSample { dx: direction.x, dy: direction.y, pupil }
}
