//! Depth of field sample redistribution and bokeh importance weights.
use crate::core::filter::Filter;
use crate::core::geometry::{Point2f, Vector2f};
use crate::core::spectrum::Rgb;
use crate::core::types::{clamp, consts::PI, Float};

/// Below this circle of confusion radius (pixels) a sample stays in its own pixel.
pub const MIN_BLUR_RADIUS: Float = 0.5;

/// Weight of a sample offset by `(dx, dy)` pixels from a point blurred into a circle of
/// confusion of `coc_radius` pixels.
///
/// Sharp points use a box of half a pixel. Blurred points use a normalized Gaussian with
/// standard deviation `coc_radius / 2`, so the weights integrate to one over the plane.
pub fn compute_redistribution_weight(dx: Float, dy: Float, coc_radius: Float) -> Float {
    let r_sq = dx * dx + dy * dy;
    if coc_radius < MIN_BLUR_RADIUS {
        return if r_sq < 0.25 { 1.0 } else { 0.0 };
    }

    let sigma = coc_radius / 2.0;
    let sigma_sq = sigma * sigma;
    (-r_sq / (2.0 * sigma_sq)).exp() / (2.0 * PI * sigma_sq)
}

/// How many extra samples a point deserves: bright, strongly blurred points form visible
/// bokeh. Clamped to `[0.1, 10]`.
pub fn compute_importance_weight(color: &Rgb, coc_radius: Float, scale: Float) -> Float {
    clamp(color.luminance() * coc_radius * scale, 0.1, 10.0)
}

/// Normalized `(2 radius + 1)^2` Gaussian kernel, row by row.
pub fn gaussian_kernel(radius: usize, sigma: Float) -> Vec<Float> {
    let side = 2 * radius + 1;
    let two_sigma_sq = 2.0 * sigma * sigma;
    let mut kernel: Vec<Float> = (0..side * side).map(|i| {
        let x = (i % side) as Float - radius as Float;
        let y = (i / side) as Float - radius as Float;
        if two_sigma_sq > 0.0 {
            (-(x * x + y * y) / two_sigma_sq).exp()
        } else if x == 0.0 && y == 0.0 {
            1.0
        } else {
            0.0
        }
    }).collect();

    let sum: Float = kernel.iter().sum();
    for k in kernel.iter_mut() {
        *k /= sum;
    }
    kernel
}

/// Reconstruction filter that spreads a sample over its circle of confusion.
#[derive(Debug, Copy, Clone)]
pub struct RedistributionFilter {
    pub radius: Vector2f,
    pub inv_radius: Vector2f,
    coc_radius: Float
}

impl RedistributionFilter {
    /// Filter for a circle of confusion of `coc_radius` pixels.
    ///
    /// The support ends at three standard deviations.
    pub fn new(coc_radius: Float) -> RedistributionFilter {
        let r = if coc_radius < MIN_BLUR_RADIUS { 0.5 } else { 1.5 * coc_radius };
        RedistributionFilter {
            radius: Vector2f::new(r, r),
            inv_radius: Vector2f::new(1.0 / r, 1.0 / r),
            coc_radius
        }
    }

    pub fn coc_radius(&self) -> Float {
        self.coc_radius
    }
}

impl Filter for RedistributionFilter {
    fn get_radius(&self) -> Vector2f {
        self.radius
    }

    fn get_inv_radius(&self) -> Vector2f {
        self.inv_radius
    }

    fn evaluate(&self, p: &Point2f) -> Float {
        if p.x.abs() > self.radius.x || p.y.abs() > self.radius.y {
            return 0.0;
        }
        compute_redistribution_weight(p.x, p.y, self.coc_radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn sharp_points_should_stay_in_pixel() {
        assert_eq!(compute_redistribution_weight(0.0, 0.0, 0.2), 1.0);
        assert_eq!(compute_redistribution_weight(0.3, 0.3, 0.49), 1.0);
        assert_eq!(compute_redistribution_weight(0.5, 0.0, 0.2), 0.0);
        assert_eq!(compute_redistribution_weight(1.0, 1.0, 0.0), 0.0);
    }

    #[test]
    fn blurred_points_should_follow_gaussian() {
        let coc = 4.0;
        let sigma: Float = 2.0;
        let peak = 1.0 / (2.0 * PI * sigma * sigma);
        assert_relative_eq!(compute_redistribution_weight(0.0, 0.0, coc), peak, max_relative = 1e-5);
        assert_relative_eq!(compute_redistribution_weight(2.0, 0.0, coc), peak * (-0.5 as Float).exp(), max_relative = 1e-5);
        assert!(compute_redistribution_weight(3.0, 0.0, coc) < compute_redistribution_weight(0.0, 2.0, coc));
    }

    #[test]
    fn blurred_weights_should_conserve_energy() {
        let coc = 6.0;
        let mut total = 0.0;
        for y in -30..=30 {
            for x in -30..=30 {
                total += compute_redistribution_weight(x as Float, y as Float, coc);
            }
        }
        assert_abs_diff_eq!(total, 1.0, epsilon = 1e-3);
    }

    #[test]
    fn importance_should_be_clamped() {
        let white = Rgb::new(1.0, 1.0, 1.0);
        assert_abs_diff_eq!(compute_importance_weight(&white, 2.0, 1.5), 3.0, epsilon = 1e-4);
        assert_eq!(compute_importance_weight(&Rgb::black(), 10.0, 1.0), 0.1);
        assert_eq!(compute_importance_weight(&white, 50.0, 1.0), 10.0);
        let green = Rgb::new(0.0, 1.0, 0.0);
        assert_abs_diff_eq!(compute_importance_weight(&green, 1.0, 1.0), 0.7152, epsilon = 1e-5);
    }

    #[test]
    fn kernel_should_be_normalized_and_symmetric() {
        let kernel = gaussian_kernel(3, 1.5);
        assert_eq!(kernel.len(), 49);
        assert_abs_diff_eq!(kernel.iter().sum::<Float>(), 1.0, epsilon = 1e-5);
        assert_eq!(kernel[0], kernel[48]);
        assert!(kernel[24] > kernel[23]);

        let delta = gaussian_kernel(1, 0.0);
        assert_eq!(delta[4], 1.0);
        assert_eq!(delta.iter().sum::<Float>(), 1.0);
    }

    #[test]
    fn filter_should_match_weight_inside_support() {
        let filter = RedistributionFilter::new(4.0);
        assert_eq!(filter.get_radius(), Vector2f::new(6.0, 6.0));
        let p = Point2f::new(1.0, -2.0);
        assert_eq!(filter.evaluate(&p), compute_redistribution_weight(1.0, -2.0, 4.0));
        assert_eq!(filter.evaluate(&Point2f::new(7.0, 0.0)), 0.0);

        let sharp = RedistributionFilter::new(0.1);
        assert_eq!(sharp.get_inv_radius(), Vector2f::new(2.0, 2.0));
        assert_eq!(sharp.evaluate(&Point2f::new(0.0, 0.0)), 1.0);
    }
}
