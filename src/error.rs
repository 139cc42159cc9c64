//! Error types for lens evaluation, tracing and lens loading.
//!
//! Solver and trace failures are ordinary values: a failed call never leaves a partially
//! filled result behind.

use crate::core::types::Float;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Why the inverse aperture solve gave up.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SolveError {
    /// The iteration budget ran out before the residual met the tolerance.
    #[error("no convergence after {iterations} iterations (squared error {squared_error})")]
    NonConvergence { iterations: u32, squared_error: Float },

    /// The Jacobian determinant fell below the singular threshold.
    #[error("singular Jacobian (determinant {determinant}) at iteration {iteration}")]
    SingularJacobian { determinant: Float, iteration: u32 },
}

/// Degenerate geometry met by the backward tracer.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum TraceError {
    #[error("point is too close to the camera (distance {distance})")]
    TooClose { distance: Float },

    #[error("point is behind the camera")]
    BehindCamera,
}

/// Problems building a coefficient set.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PolynomialError {
    #[error("{channel}: {len} coefficients given but degree {degree} only has {max} monomials")]
    TooManyCoefficients { channel: &'static str, len: usize, degree: u32, max: usize },

    #[error("{channel}: term of degree {term_degree} exceeds polynomial degree {degree}")]
    TermDegree { channel: &'static str, term_degree: u32, degree: u32 },

    #[error("polynomial degree {degree} exceeds the supported maximum {max}")]
    DegreeTooHigh { degree: u32, max: u32 },
}

/// Failures of the lens database.
#[derive(Debug, Error)]
pub enum LensDatabaseError {
    #[error("lens '{0}' not found")]
    NotFound(String),

    #[error("lens '{id}' is invalid: {reason}")]
    Invalid { id: String, reason: String },

    #[error("lens '{id}': {source}")]
    Polynomial { id: String, #[source] source: PolynomialError },

    #[error("failed to read {path}: {source}")]
    Io { path: PathBuf, #[source] source: io::Error },

    #[error("failed to parse {path}: {source}")]
    Json { path: PathBuf, #[source] source: serde_json::Error },
}
