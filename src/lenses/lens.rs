//! A loaded lens: physical constants plus the fitted polynomial.
use super::constants::LensConstants;
use super::evaluate::{self, OpticalSample, PupilResult};
use super::polynomial::CoefficientSet;
use super::solver::{self, SolverOutcome, SolverSettings};
use crate::core::types::Float;

#[derive(Debug, Clone, PartialEq)]
pub struct Lens {
    pub id: String,
    pub constants: LensConstants,
    pub coefficients: CoefficientSet
}

impl Lens {
    pub fn new<S: Into<String>>(id: S, constants: LensConstants, coefficients: CoefficientSet) -> Lens {
        Lens { id: id.into(), constants, coefficients }
    }

    pub fn evaluate(&self, sample: &OpticalSample) -> PupilResult {
        evaluate::evaluate(&self.constants, &self.coefficients, sample)
    }

    pub fn solve(&self, x: Float, y: Float, lambda: Float, target_x: Float, target_y: Float) -> SolverOutcome {
        solver::solve_with(&self.constants, &self.coefficients, x, y, lambda, target_x, target_y, &SolverSettings::default())
    }
}
