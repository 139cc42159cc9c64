//! Math, sampling and spectral foundations shared by the lens model.
pub mod geometry;
pub mod types;
pub mod matrix;
pub mod transform;
pub mod rng;
pub mod sampling;
pub mod spectrum;
pub mod filter;
pub mod fileutil;
pub mod imageio;
