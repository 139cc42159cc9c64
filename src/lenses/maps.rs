//! Per-pixel lens maps: distortion ST-maps and vignetting.
use super::constants::LensConstants;
use super::evaluate::{evaluate, transmittance, OpticalSample};
use super::polynomial::CoefficientSet;
use crate::core::geometry::Point2f;
use crate::core::imageio::write_image;
use crate::core::types::{clamp, Float};
use image::ImageResult;
use rayon::prelude::*;
use std::path::Path;

/// A `width * height` grid of values stored row by row, row 0 at the top.
#[derive(Debug, Clone, PartialEq)]
pub struct LensMap<T> {
    pub width: u32,
    pub height: u32,
    pub data: Vec<T>
}

impl<T: Copy> LensMap<T> {
    pub fn get(&self, x: u32, y: u32) -> T {
        self.data[(y * self.width + x) as usize]
    }
}

impl LensMap<Point2f> {
    /// Save as a 16-bit RGB image with U in red and V in green.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> ImageResult<()> {
        let pixels: Vec<Float> = self.data.iter().flat_map(|uv| [uv.x, uv.y, 0.0]).collect();
        write_image(path, &pixels, self.width, self.height, 3)
    }
}

impl LensMap<Float> {
    /// Save as a 16-bit greyscale image.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> ImageResult<()> {
        write_image(path, &self.data, self.width, self.height, 1)
    }
}

/// Maps pixel centres onto a sensor of the lens' diagonal with the image's aspect ratio.
#[derive(Debug, Copy, Clone)]
struct SensorGrid {
    width: u32,
    height: u32,
    sensor_width: Float,
    sensor_height: Float
}

impl SensorGrid {
    fn new(lens: &LensConstants, width: u32, height: u32) -> SensorGrid {
        let (w, h) = (width as Float, height as Float);
        let diagonal = (w * w + h * h).sqrt();
        SensorGrid {
            width,
            height,
            sensor_width: lens.sensor_diagonal * w / diagonal,
            sensor_height: lens.sensor_diagonal * h / diagonal
        }
    }

    /// Normalized pixel centre in `[0, 1]^2`.
    fn uv(&self, x: u32, y: u32) -> Point2f {
        Point2f::new(
            (x as Float + 0.5) / self.width as Float,
            (y as Float + 0.5) / self.height as Float
        )
    }

    /// Sensor position in mm, origin at the centre, +y up.
    fn sensor(&self, x: u32, y: u32) -> Point2f {
        let uv = self.uv(x, y);
        Point2f::new((uv.x - 0.5) * self.sensor_width, (0.5 - uv.y) * self.sensor_height)
    }

    fn generate<T, F>(&self, f: F) -> LensMap<T>
        where T: Send, F: Fn(u32, u32) -> T + Sync
    {
        let rows: Vec<Vec<T>> = (0..self.height).into_par_iter()
            .map(|y| (0..self.width).map(|x| f(x, y)).collect())
            .collect();
        LensMap { width: self.width, height: self.height, data: rows.into_iter().flatten().collect() }
    }
}

/// Distortion ST-map: for every pixel, the normalized coordinate where the lens actually
/// images that sensor position through the centre of the aperture.
///
/// Offsets are measured relative to the paraxial magnification, so a distortion free lens
/// yields the identity map. Coordinates are clamped to `[0, 1]`.
pub fn generate_stmap(lens: &LensConstants, coefficients: &CoefficientSet, width: u32, height: u32, lambda: Float) -> LensMap<Point2f> {
    let grid = SensorGrid::new(lens, width, height);
    let forward = |p: Point2f| evaluate(lens, coefficients, &OpticalSample::at_aperture_centre(p.x, p.y, lambda)).position();

    let centre = forward(Point2f::zero());
    let h: Float = 1e-2;
    let magnification = match (forward(Point2f::new(h, 0.0)).x - centre.x) / h {
        m if m.abs() > 1e-6 && m.is_finite() => m,
        m => {
            debug!("Degenerate paraxial magnification {}, using 1", m);
            1.0
        }
    };

    grid.generate(|x, y| {
        let out = forward(grid.sensor(x, y));
        let u = 0.5 + (out.x - centre.x) / (magnification * grid.sensor_width);
        let v = 0.5 - (out.y - centre.y) / (magnification * grid.sensor_height);
        Point2f::new(clamp(u, 0.0, 1.0), clamp(v, 0.0, 1.0))
    })
}

/// Transmittance of every pixel's sensor position.
pub fn generate_vignetting_map(lens: &LensConstants, width: u32, height: u32) -> LensMap<Float> {
    let grid = SensorGrid::new(lens, width, height);
    grid.generate(|x, y| {
        let p = grid.sensor(x, y);
        transmittance(lens, p.x, p.y)
    })
}
