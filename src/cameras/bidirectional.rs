//! Backward tracing from a scene point to the sensor, with the circle of confusion it forms.
use crate::core::geometry::{Point2f, Point3f, Vector3f};
use crate::core::transform::Transform;
use crate::core::types::{clamp, Float};
use crate::error::TraceError;
use crate::lenses::constants::LensConstants;
use crate::lenses::evaluate::{evaluate, transmittance, OpticalSample};
use crate::lenses::polynomial::CoefficientSet;
use crate::lenses::solver::{newton_2d, SolverSettings};
use crate::lenses::system::LensSystem;

/// Points closer to the camera than this (mm) cannot be projected.
pub const MIN_DISTANCE: Float = 0.001;
/// Objects within this distance (mm) of the focus plane are sharp.
pub const IN_FOCUS_TOLERANCE: Float = 0.1;
/// Largest circle of confusion radius reported, in mm.
pub const MAX_COC_RADIUS: Float = 50.0;
/// Allowed disagreement between the camera position and the transform origin, in mm.
pub const CAMERA_POSITION_TOLERANCE: Float = 1e-3;

/// Where a scene point lands on the sensor and how blurred it is.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CocResult {
    /// Sensor position in mm.
    pub sensor: Point2f,
    /// Circle of confusion radius in mm, in `[0, MAX_COC_RADIUS]`.
    pub coc_radius: Float,
    /// Lens transmittance at the sensor position, when a lens model was used.
    pub transmittance: Option<Float>
}

/// Thin lens circle of confusion for an object at `object_distance`.
///
/// The f-stop is limited to the lens' maximum aperture `fstop_min`.
pub fn thin_lens_coc(object_distance: Float, focal_length: Float, focus_distance: Float, fstop: Float, fstop_min: Float) -> Float {
    let n = fstop.max(fstop_min);
    let aperture_diameter = focal_length / n;
    let defocus = (object_distance - focus_distance).abs();
    if defocus < IN_FOCUS_TOLERANCE {
        return 0.0;
    }
    clamp(aperture_diameter * defocus / (object_distance * n), 0.0, MAX_COC_RADIUS)
}

/// Convert a circle of confusion on the sensor to pixels.
pub fn coc_to_pixel_radius(coc_mm: Float, sensor_width_mm: Float, image_width: u32) -> Float {
    let mm_per_pixel = sensor_width_mm / image_width as Float;
    coc_mm / mm_per_pixel
}

/// Camera space pinhole projection of a scene point.
struct Projection {
    /// Distance from the camera to the point.
    distance: Float,
    /// Unit direction toward the point in camera space.
    direction: Vector3f,
    /// Intersection with the plane at `z = -focal_length`.
    sensor: Point2f
}

fn project(world_pos: &Point3f, camera_pos: &Point3f, camera_to_world: &Transform, focal_length: Float) -> Result<Projection, TraceError> {
    let origin = camera_to_world.origin();
    if origin.distance(camera_pos) > CAMERA_POSITION_TOLERANCE {
        debug!("Camera position {} differs from transform origin {}; using the transform", camera_pos, origin);
    }

    // Transform the point into camera space
    let p = Vector3f::from(camera_to_world.inverse().transform_point(world_pos));
    let distance = p.length();
    if distance < MIN_DISTANCE {
        return Err(TraceError::TooClose { distance });
    }

    // Camera looks down -z with the sensor plane at z = -focal_length
    let direction = p / distance;
    let t = -focal_length / direction.z;
    if !(t >= 0.0) || !t.is_finite() {
        return Err(TraceError::BehindCamera);
    }

    Ok(Projection {
        distance,
        direction,
        sensor: Point2f::new(direction.x * t, direction.y * t)
    })
}

/// Project `world_pos` onto the sensor with a pinhole and size its blur with the thin lens law.
#[allow(clippy::too_many_arguments)]
pub fn trace_backward_thin_lens(
    world_pos: &Point3f,
    camera_pos: &Point3f,
    camera_to_world: &Transform,
    focal_length: Float,
    focus_distance: Float,
    fstop: Float,
    fstop_min: Float
) -> Result<CocResult, TraceError> {
    let projection = project(world_pos, camera_pos, camera_to_world, focal_length)?;
    Ok(CocResult {
        sensor: projection.sensor,
        coc_radius: thin_lens_coc(projection.distance, focal_length, focus_distance, fstop, fstop_min),
        transmittance: None
    })
}

/// Settings of the polynomial backward trace.
#[derive(Clone, Copy)]
pub struct PolynomialTraceOptions<'a> {
    /// Solve for the sensor position that the polynomial maps onto the pinhole point.
    pub refine_sensor: bool,
    pub solver: SolverSettings,
    /// Optional raytraced lens for a final correction of the sensor position.
    pub lens_system: Option<&'a dyn LensSystem>
}

impl<'a> Default for PolynomialTraceOptions<'a> {
    fn default() -> PolynomialTraceOptions<'a> {
        PolynomialTraceOptions {
            refine_sensor: true,
            solver: SolverSettings::default(),
            lens_system: None
        }
    }
}

/// Backward trace through the polynomial lens model.
///
/// The pinhole projection gives the outer pupil point. The sensor position starts at the same
/// point and is optionally refined so that the central aperture ray reaches it. The circle of
/// confusion still comes from the thin lens law; only the sensor position and the
/// transmittance use the polynomial.
#[allow(clippy::too_many_arguments)]
pub fn trace_backward_polynomial(
    world_pos: &Point3f,
    camera_pos: &Point3f,
    camera_to_world: &Transform,
    focus_distance: Float,
    fstop: Float,
    lambda: Float,
    lens: &LensConstants,
    coefficients: &CoefficientSet,
    options: &PolynomialTraceOptions<'_>
) -> Result<CocResult, TraceError> {
    let projection = project(world_pos, camera_pos, camera_to_world, lens.focal_length)?;
    let pupil = projection.sensor;
    let mut sensor = pupil;

    if options.refine_sensor {
        let forward = |x: Float, y: Float| {
            evaluate(lens, coefficients, &OpticalSample::at_aperture_centre(x, y, lambda)).position()
        };
        match newton_2d(forward, sensor, pupil, &options.solver) {
            Ok((refined, _)) => sensor = refined,
            Err(e) => debug!("Sensor refinement for pupil point {} failed ({}), using pinhole estimate", pupil, e)
        }
    }

    if let Some(system) = options.lens_system {
        sensor = refine_with_lens_system(system, sensor, pupil, lambda, &options.solver);
    }

    Ok(CocResult {
        sensor,
        coc_radius: thin_lens_coc(projection.distance, lens.focal_length, focus_distance, fstop, lens.fstop_min),
        transmittance: Some(transmittance(lens, sensor.x, sensor.y))
    })
}

/// Move `sensor` so the axial ray traced by `system` leaves the lens at `pupil`.
fn refine_with_lens_system(system: &dyn LensSystem, sensor: Point2f, pupil: Point2f, lambda: Float, settings: &SolverSettings) -> Point2f {
    let axis = Vector3f::new(0.0, 0.0, 1.0);
    // Blocked rays give NaN, which ends the solve as a singular Jacobian
    let trace = |x: Float, y: Float| {
        system.trace_ray(&Point3f::new(x, y, 0.0), &axis, lambda)
            .map_or(Point2f::new(Float::NAN, Float::NAN), |(exit, _)| Point2f::new(exit.x, exit.y))
    };
    match newton_2d(trace, sensor, pupil, settings) {
        Ok((refined, _)) => refined,
        Err(e) => {
            debug!("Lens '{}' could not refine sensor position {} ({})", system.id(), sensor, e);
            sensor
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lenses::database::double_gauss_50mm_coefficients;
    use crate::lenses::system::tests::ScalingLens;
    use approx::assert_abs_diff_eq;

    fn trace(world_pos: Point3f, camera_to_world: &Transform) -> Result<CocResult, TraceError> {
        trace_backward_thin_lens(&world_pos, &camera_to_world.origin(), camera_to_world, 50.0, 2000.0, 2.8, 2.8)
    }

    #[test]
    fn thin_lens_should_be_sharp_at_focus() {
        let result = trace(Point3f::new(0.0, 0.0, -2000.0), &Transform::default()).unwrap();
        assert_eq!(result.coc_radius, 0.0);
        assert_eq!(result.sensor, Point2f::new(0.0, 0.0));
        assert_eq!(result.transmittance, None);
    }

    #[test]
    fn thin_lens_should_blur_out_of_focus() {
        let result = trace(Point3f::new(0.0, 0.0, -4000.0), &Transform::default()).unwrap();
        // (50 / 2.8) * 2000 / (4000 * 2.8)
        assert_abs_diff_eq!(result.coc_radius, 3.1888, epsilon = 1e-3);
    }

    #[test]
    fn thin_lens_should_clamp_coc() {
        let result = trace(Point3f::new(0.0, 0.0, -1.0), &Transform::default()).unwrap();
        assert_eq!(result.coc_radius, MAX_COC_RADIUS);
    }

    #[test]
    fn thin_lens_should_project_onto_sensor() {
        let result = trace(Point3f::new(100.0, -50.0, -1000.0), &Transform::default()).unwrap();
        assert_abs_diff_eq!(result.sensor.x, 5.0, epsilon = 1e-4);
        assert_abs_diff_eq!(result.sensor.y, -2.5, epsilon = 1e-4);
    }

    #[test]
    fn thin_lens_should_use_camera_transform() {
        let camera_to_world = Transform::translate(&Vector3f::new(10.0, 20.0, 30.0)) * Transform::rotate_y(180.0);
        // Camera at (10, 20, 30) looking down +z in world space
        let result = trace(Point3f::new(10.0, 20.0, 2030.0), &camera_to_world).unwrap();
        assert_abs_diff_eq!(result.sensor.x, 0.0, epsilon = 1e-3);
        assert_abs_diff_eq!(result.sensor.y, 0.0, epsilon = 1e-3);
        assert_abs_diff_eq!(result.coc_radius, 0.0);
    }

    #[test]
    fn thin_lens_should_reject_degenerate_points() {
        let identity = Transform::default();
        assert!(matches!(trace(Point3f::new(0.0, 0.0, 0.0), &identity), Err(TraceError::TooClose { .. })));
        assert_eq!(trace(Point3f::new(0.0, 0.0, 100.0), &identity), Err(TraceError::BehindCamera));
        assert_eq!(trace(Point3f::new(100.0, 0.0, 0.0), &identity), Err(TraceError::BehindCamera));
    }

    #[test]
    fn coc_should_respect_max_aperture() {
        let wide_open = thin_lens_coc(4000.0, 50.0, 2000.0, 1.0, 2.8);
        let at_min = thin_lens_coc(4000.0, 50.0, 2000.0, 2.8, 2.8);
        assert_eq!(wide_open, at_min);
        assert!(thin_lens_coc(4000.0, 50.0, 2000.0, 5.6, 2.8) < at_min);
        assert_eq!(thin_lens_coc(2000.05, 50.0, 2000.0, 2.8, 2.8), 0.0);
    }

    #[test]
    fn coc_should_convert_to_pixels() {
        assert_abs_diff_eq!(coc_to_pixel_radius(0.036, 36.0, 1920), 1.92, epsilon = 1e-4);
        assert_eq!(coc_to_pixel_radius(0.0, 36.0, 1920), 0.0);
    }

    #[test]
    fn polynomial_trace_should_refine_sensor() {
        let lens = LensConstants::double_gauss_50mm();
        let coefficients = double_gauss_50mm_coefficients();
        let identity = Transform::default();
        // Pinhole point (0.1, 0) on the pupil
        let world = Point3f::new(4.0, 0.0, -2000.0);
        let options = PolynomialTraceOptions::default();
        let result = trace_backward_polynomial(&world, &identity.origin(), &identity, 2000.0, 2.8, 0.55,
            &lens, &coefficients, &options).unwrap();

        let reached = evaluate(&lens, &coefficients, &OpticalSample::at_aperture_centre(result.sensor.x, result.sensor.y, 0.55));
        assert_abs_diff_eq!(reached.x, 0.1, epsilon = 1e-2);
        assert!(result.sensor.x > 0.1);
        assert_eq!(result.transmittance, Some(1.0));
        assert_eq!(result.coc_radius, 0.0);
    }

    #[test]
    fn polynomial_trace_should_fall_back_to_pinhole() {
        let lens = LensConstants::double_gauss_50mm();
        let coefficients = double_gauss_50mm_coefficients();
        let identity = Transform::default();
        // Two Newton steps are not enough to reach a pupil point this far off axis
        let world = Point3f::new(200.0, 0.0, -1000.0);
        let short = PolynomialTraceOptions {
            solver: SolverSettings { max_iterations: 2, ..SolverSettings::default() },
            ..PolynomialTraceOptions::default()
        };
        let refined = trace_backward_polynomial(&world, &identity.origin(), &identity, 2000.0, 2.8, 0.55,
            &lens, &coefficients, &short).unwrap();
        let pinhole = trace_backward_polynomial(&world, &identity.origin(), &identity, 2000.0, 2.8, 0.55,
            &lens, &coefficients, &PolynomialTraceOptions { refine_sensor: false, ..PolynomialTraceOptions::default() }).unwrap();
        assert_eq!(refined.sensor, pinhole.sensor);
        assert_abs_diff_eq!(pinhole.sensor.x, 10.0, epsilon = 1e-3);
        let thin = trace_backward_thin_lens(&world, &identity.origin(), &identity, 50.0, 2000.0, 2.8, 2.8).unwrap();
        assert_eq!(refined.coc_radius, thin.coc_radius);
    }

    #[test]
    fn polynomial_trace_should_use_lens_system() {
        let lens = LensConstants::double_gauss_50mm();
        let coefficients = double_gauss_50mm_coefficients();
        let identity = Transform::default();
        let system = ScalingLens::new(2.0);
        let options = PolynomialTraceOptions {
            refine_sensor: false,
            lens_system: Some(&system),
            ..PolynomialTraceOptions::default()
        };
        let world = Point3f::new(200.0, -100.0, -1000.0);
        let result = trace_backward_polynomial(&world, &identity.origin(), &identity, 2000.0, 2.8, 0.55,
            &lens, &coefficients, &options).unwrap();
        assert_abs_diff_eq!(result.sensor.x, 5.0, epsilon = 1e-2);
        assert_abs_diff_eq!(result.sensor.y, -2.5, epsilon = 1e-2);
    }

    #[test]
    fn polynomial_trace_should_keep_estimate_when_lens_blocks() {
        let lens = LensConstants::double_gauss_50mm();
        let coefficients = double_gauss_50mm_coefficients();
        let identity = Transform::default();
        let system = ScalingLens { max_radius: 1.0, ..ScalingLens::new(2.0) };
        let options = PolynomialTraceOptions {
            refine_sensor: false,
            lens_system: Some(&system),
            ..PolynomialTraceOptions::default()
        };
        let world = Point3f::new(200.0, 0.0, -1000.0);
        let result = trace_backward_polynomial(&world, &identity.origin(), &identity, 2000.0, 2.8, 0.55,
            &lens, &coefficients, &options).unwrap();
        assert_abs_diff_eq!(result.sensor.x, 10.0, epsilon = 1e-3);
    }
}
