//! Fitted polynomial coefficients.
//!
//! Each of the four outputs (outer pupil x, y, dx, dy) is a sum of monomials in the five
//! inputs (sensor x, y, aperture dx, dy, wavelength). Coefficient sets are produced by an
//! offline fit and handed to the evaluator at runtime.
use crate::core::types::Float;
use crate::error::PolynomialError;
use smallvec::SmallVec;

/// Number of polynomial inputs: x, y, dx, dy, lambda.
pub const INPUT_COUNT: usize = 5;
/// Number of polynomial outputs: x, y, dx, dy.
pub const OUTPUT_COUNT: usize = 4;

pub const OUTPUT_NAMES: [&str; OUTPUT_COUNT] = ["out_x", "out_y", "out_dx", "out_dy"];

/// Highest degree accepted for dense coefficient arrays. Fitted lenses use 5 to 9.
pub const MAX_DEGREE: u32 = 16;

/// Integer power by repeated multiplication for small exponents.
#[inline]
pub fn lens_ipow(base: Float, exp: u32) -> Float {
    match exp {
        0 => 1.0,
        1 => base,
        2 => base * base,
        3 => base * base * base,
        4 => {
            let b2 = base * base;
            b2 * b2
        }
        _ => base.powi(exp as i32)
    }
}

/// One monomial: `coefficient * x^p0 * y^p1 * dx^p2 * dy^p3 * lambda^p4`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Term {
    pub coefficient: Float,
    pub powers: [u8; INPUT_COUNT]
}

impl Term {
    pub fn new(coefficient: Float, powers: [u8; INPUT_COUNT]) -> Term {
        Term { coefficient, powers }
    }

    /// Total degree of the monomial.
    pub fn degree(&self) -> u32 {
        self.powers.iter().map(|&p| p as u32).sum()
    }

    #[inline]
    pub fn evaluate(&self, input: &[Float; INPUT_COUNT]) -> Float {
        let mut v = self.coefficient;
        for (x, &p) in input.iter().zip(self.powers.iter()) {
            if p != 0 {
                v *= lens_ipow(*x, p as u32);
            }
        }
        v
    }
}

/// The polynomial for a single output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolynomialChannel {
    terms: SmallVec<[Term; 8]>
}

impl PolynomialChannel {
    pub fn new<I: IntoIterator<Item = Term>>(terms: I) -> PolynomialChannel {
        PolynomialChannel {
            terms: terms.into_iter().filter(|t| t.coefficient != 0.0).collect()
        }
    }

    /// Build a channel from a dense coefficient array laid out along [`monomial_basis`].
    pub fn from_dense(coefficients: &[Float], basis: &[[u8; INPUT_COUNT]]) -> PolynomialChannel {
        PolynomialChannel::new(coefficients.iter().zip(basis.iter())
            .map(|(&c, &powers)| Term::new(c, powers)))
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Highest total degree among the non-zero terms.
    pub fn degree(&self) -> u32 {
        self.terms.iter().map(Term::degree).max().unwrap_or(0)
    }

    #[inline]
    pub fn evaluate(&self, input: &[Float; INPUT_COUNT]) -> Float {
        self.terms.iter().map(|t| t.evaluate(input)).sum()
    }
}

/// A polynomial degree with one channel per output.
#[derive(Debug, Clone, PartialEq)]
pub struct CoefficientSet {
    degree: u32,
    channels: [PolynomialChannel; OUTPUT_COUNT]
}

impl CoefficientSet {
    /// Build from sparse channels, checking that no term exceeds `degree`.
    pub fn new(degree: u32, channels: [PolynomialChannel; OUTPUT_COUNT]) -> Result<CoefficientSet, PolynomialError> {
        for (name, channel) in OUTPUT_NAMES.iter().zip(channels.iter()) {
            let term_degree = channel.degree();
            if term_degree > degree {
                return Err(PolynomialError::TermDegree { channel: name, term_degree, degree });
            }
        }
        Ok(CoefficientSet { degree, channels })
    }

    /// Build from sparse channels, taking the degree from the highest term.
    pub fn from_channels(channels: [PolynomialChannel; OUTPUT_COUNT]) -> CoefficientSet {
        let degree = channels.iter().map(PolynomialChannel::degree).max().unwrap_or(0);
        CoefficientSet { degree, channels }
    }

    /// Build from dense per-output coefficient arrays indexed by [`monomial_basis`] of `degree`.
    ///
    /// Arrays may be shorter than the basis; missing trailing coefficients are zero.
    pub fn from_dense(degree: u32, coefficients: [&[Float]; OUTPUT_COUNT]) -> Result<CoefficientSet, PolynomialError> {
        if degree > MAX_DEGREE {
            return Err(PolynomialError::DegreeTooHigh { degree, max: MAX_DEGREE });
        }
        let basis = monomial_basis(degree);
        let mut channels: [PolynomialChannel; OUTPUT_COUNT] = Default::default();
        for (i, c) in coefficients.iter().enumerate() {
            if c.len() > basis.len() {
                return Err(PolynomialError::TooManyCoefficients {
                    channel: OUTPUT_NAMES[i],
                    len: c.len(),
                    degree,
                    max: basis.len()
                });
            }
            channels[i] = PolynomialChannel::from_dense(c, &basis);
        }
        Ok(CoefficientSet { degree, channels })
    }

    pub fn degree(&self) -> u32 {
        self.degree
    }

    pub fn channel(&self, output: usize) -> &PolynomialChannel {
        &self.channels[output]
    }

    /// Evaluate all four outputs.
    #[inline]
    pub fn evaluate(&self, input: &[Float; INPUT_COUNT]) -> [Float; OUTPUT_COUNT] {
        [
            self.channels[0].evaluate(input),
            self.channels[1].evaluate(input),
            self.channels[2].evaluate(input),
            self.channels[3].evaluate(input)
        ]
    }
}

/// Number of monomials in five variables up to total degree `degree`, i.e. C(degree + 5, 5).
///
/// `None` when the count does not fit in a `usize`.
pub fn basis_len(degree: u32) -> Option<usize> {
    let d = degree as usize;
    (1..=INPUT_COUNT).try_fold(1_usize, |acc, k| Some(acc.checked_mul(d.checked_add(k)?)? / k))
}

/// All exponent tuples up to total degree `degree`.
///
/// Ordered by total degree, then lexicographically with larger powers of earlier inputs first:
/// `1, x, y, dx, dy, lambda, x^2, x*y, x*dx, ...`.
/// Degrees above [`MAX_DEGREE`] are clamped to it.
pub fn monomial_basis(degree: u32) -> Vec<[u8; INPUT_COUNT]> {
    fn push_compositions(remaining: u8, index: usize, powers: &mut [u8; INPUT_COUNT], out: &mut Vec<[u8; INPUT_COUNT]>) {
        if index == INPUT_COUNT - 1 {
            powers[index] = remaining;
            out.push(*powers);
            return;
        }
        for p in (0..=remaining).rev() {
            powers[index] = p;
            push_compositions(remaining - p, index + 1, powers, out);
        }
    }

    let degree = degree.min(MAX_DEGREE);
    let mut basis = Vec::with_capacity(basis_len(degree).unwrap_or(0));
    let mut powers = [0_u8; INPUT_COUNT];
    for total in 0..=degree as u8 {
        push_compositions(total, 0, &mut powers, &mut basis);
    }
    basis
}
