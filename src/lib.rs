//! Polynomial optics for depth of field rendering.
//!
//! A lens is a set of fitted polynomials mapping a sensor sample (position, aperture
//! direction, wavelength) to the outer pupil. On top of the forward map the crate provides
//! the Newton inverse for aperture sampling, backward tracing of scene points to the sensor
//! with their circle of confusion, and the weights used to redistribute blurred samples.

#[macro_use]
extern crate log;

#[macro_use]
extern crate lazy_static;

pub mod core;
pub mod error;
pub mod lenses;
pub mod cameras;
pub mod filters;
