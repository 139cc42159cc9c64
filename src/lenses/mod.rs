//! The polynomial lens model: coefficients, forward evaluation, inverse solve and loading.
pub mod constants;
pub mod polynomial;
pub mod evaluate;
pub mod solver;
pub mod lens;
pub mod database;
pub mod system;
pub mod maps;

pub use self::constants::{LensConstants, PupilGeometry};
pub use self::evaluate::{evaluate, transmittance, OpticalSample, PupilResult};
pub use self::lens::Lens;
pub use self::polynomial::{CoefficientSet, PolynomialChannel, Term};
pub use self::solver::{newton_2d, sample_aperture, solve, ApertureDirection, SolverOutcome, SolverSettings};
