//! Intersystem crossing rate computation.
//!
//! This module is the numeric core of the program. Given two ordered state
//! manifolds (donors, e.g. singlets; acceptors, e.g. triplets) and a matrix
//! of spin-orbit coupling magnitudes, it evaluates equation (53) of
//! [Penfold et al., J. Phys. Chem. A 2021](https://doi.org/10.1021/acs.jpca.1c06165):
//!
//! ```text
//! k_ISC(k,l) = 2/ħ · |SOC(k,l)|² · γ / (E_kl² + γ²)
//! ```
//!
//! where `E_kl = E_donor(k) − E_acceptor(l)` is the energy gap, `γ` is the
//! Lorentzian half-width, and gaps, couplings and `γ` are all in cm⁻¹ so the
//! rate comes out in s⁻¹.
//!
//! The pipeline is a stateless sequence of pure functions:
//! inputs → [`gap_matrix`] → [`rate_matrix`]. All input validation happens
//! eagerly at the boundary; a shape mismatch, a non-finite value or a
//! non-positive `γ` is reported as a typed [`RateError`] before any
//! arithmetic runs, never as a partial result.

use crate::constants::PhysicalConstants;
use nalgebra::DMatrix;
use thiserror::Error;

/// Error type for rate calculations.
///
/// Every variant is detected during input validation, before the rate
/// formula is evaluated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RateError {
    /// Coupling count does not match the donor × acceptor grid, or a
    /// manifold is empty.
    #[error("shape mismatch: expected {expected} coupling values for a {rows}x{cols} donor/acceptor grid, got {actual}")]
    ShapeMismatch {
        /// Number of donor states (matrix rows).
        rows: usize,
        /// Number of acceptor states (matrix columns).
        cols: usize,
        /// Expected element count (rows × cols).
        expected: usize,
        /// Element count actually supplied.
        actual: usize,
    },
    /// A scalar parameter is outside its valid range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    /// An energy or coupling value is NaN or infinite.
    #[error("non-numeric input: {0}")]
    NonNumericInput(String),
}

/// Type alias for rate calculation results
type Result<T> = std::result::Result<T, RateError>;

/// Coupling magnitudes supplied either as a flat row-major sequence or as
/// an already-shaped matrix.
///
/// Command-line input arrives flat (one value per donor/acceptor pair, donor
/// index varying slowest); extraction from an ORCA output file produces the
/// matrix directly. [`reshape_couplings`] accepts both and checks the
/// element count against the target shape either way.
#[derive(Debug, Clone)]
pub enum Couplings {
    /// Flat row-major sequence of length rows × cols.
    Flat(Vec<f64>),
    /// Already-shaped matrix.
    Matrix(DMatrix<f64>),
}

/// Builds the donor/acceptor energy gap matrix.
///
/// Entry (k,l) is `donors[k] - acceptors[l]`, in whatever common energy unit
/// the inputs use. Defined for any manifold sizes N,M ≥ 1, including N ≠ M;
/// the ordering of each manifold defines the row/column identity of the
/// result.
///
/// # Errors
///
/// - [`RateError::ShapeMismatch`] if either manifold is empty
/// - [`RateError::NonNumericInput`] if any energy is NaN or infinite
///
/// # Examples
///
/// ```
/// use kisc::rates::gap_matrix;
///
/// let gaps = gap_matrix(&[0.0, 1.0], &[0.5]).unwrap();
/// assert_eq!(gaps.shape(), (2, 1));
/// assert_eq!(gaps[(0, 0)], -0.5);
/// assert_eq!(gaps[(1, 0)], 0.5);
/// ```
pub fn gap_matrix(donors: &[f64], acceptors: &[f64]) -> Result<DMatrix<f64>> {
    check_not_empty(donors.len(), acceptors.len())?;
    check_finite(donors, "donor energy")?;
    check_finite(acceptors, "acceptor energy")?;

    Ok(DMatrix::from_fn(donors.len(), acceptors.len(), |k, l| {
        donors[k] - acceptors[l]
    }))
}

/// Shapes coupling magnitudes into a rows × cols matrix.
///
/// Flat input is interpreted row-major: all couplings of the first donor
/// state first, matching how they are listed on the command line. Matrix
/// input is passed through after its element count is checked, so both
/// forms of the same data produce identical results.
///
/// # Errors
///
/// - [`RateError::ShapeMismatch`] if the element count is not rows × cols
///   or the target shape is empty
/// - [`RateError::NonNumericInput`] if any coupling is NaN or infinite
///
/// # Examples
///
/// ```
/// use kisc::rates::{reshape_couplings, Couplings};
/// use nalgebra::DMatrix;
///
/// let flat = reshape_couplings(Couplings::Flat(vec![1.0, 2.0, 3.0, 4.0]), 2, 2).unwrap();
/// let shaped = reshape_couplings(
///     Couplings::Matrix(DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 3.0, 4.0])),
///     2,
///     2,
/// ).unwrap();
/// assert_eq!(flat, shaped);
/// assert_eq!(flat[(0, 1)], 2.0);
/// ```
pub fn reshape_couplings(couplings: Couplings, rows: usize, cols: usize) -> Result<DMatrix<f64>> {
    check_not_empty(rows, cols)?;

    let matrix = match couplings {
        Couplings::Flat(values) => {
            if values.len() != rows * cols {
                return Err(RateError::ShapeMismatch {
                    rows,
                    cols,
                    expected: rows * cols,
                    actual: values.len(),
                });
            }
            DMatrix::from_row_slice(rows, cols, &values)
        }
        Couplings::Matrix(matrix) => {
            if matrix.nrows() * matrix.ncols() != rows * cols {
                return Err(RateError::ShapeMismatch {
                    rows,
                    cols,
                    expected: rows * cols,
                    actual: matrix.nrows() * matrix.ncols(),
                });
            }
            if matrix.shape() == (rows, cols) {
                matrix
            } else {
                // same element count, different shape: re-read row-major
                let values: Vec<f64> = matrix.transpose().as_slice().to_vec();
                DMatrix::from_row_slice(rows, cols, &values)
            }
        }
    };

    check_finite(matrix.as_slice(), "coupling")?;
    Ok(matrix)
}

/// Evaluates the Lorentzian rate formula elementwise.
///
/// `gaps` and `couplings` must share a shape and a unit (cm⁻¹), `gamma` is
/// the Lorentzian half-width in cm⁻¹. The result is in s⁻¹. A zero gap is
/// the resonance condition and yields the peak rate `2/ħ · soc² / γ`; the
/// denominator stays positive because `γ > 0` is enforced up front.
///
/// # Errors
///
/// - [`RateError::ShapeMismatch`] if the two matrices differ in shape
/// - [`RateError::InvalidParameter`] if `gamma` is not a finite, strictly
///   positive number
///
/// # Examples
///
/// ```
/// use kisc::constants::PhysicalConstants;
/// use kisc::rates::{gap_matrix, rate_matrix, reshape_couplings, Couplings};
///
/// let constants = PhysicalConstants::codata2018();
/// let gaps = gap_matrix(&[1000.0], &[1000.0]).unwrap();
/// let socs = reshape_couplings(Couplings::Flat(vec![10.0]), 1, 1).unwrap();
///
/// let rates = rate_matrix(&gaps, &socs, 500.0, &constants).unwrap();
/// let peak = 2.0 / constants.hbar_inv_cm_seconds * 100.0 / 500.0;
/// assert!((rates[(0, 0)] - peak).abs() / peak < 1e-12);
/// ```
pub fn rate_matrix(
    gaps: &DMatrix<f64>,
    couplings: &DMatrix<f64>,
    gamma: f64,
    constants: &PhysicalConstants,
) -> Result<DMatrix<f64>> {
    if gaps.shape() != couplings.shape() {
        return Err(RateError::ShapeMismatch {
            rows: gaps.nrows(),
            cols: gaps.ncols(),
            expected: gaps.nrows() * gaps.ncols(),
            actual: couplings.nrows() * couplings.ncols(),
        });
    }
    check_not_empty(gaps.nrows(), gaps.ncols())?;
    check_finite(gaps.as_slice(), "energy gap")?;
    check_finite(couplings.as_slice(), "coupling")?;
    if !(gamma > 0.0) || !gamma.is_finite() {
        return Err(RateError::InvalidParameter(format!(
            "broadening gamma must be a finite, strictly positive half-width in cm^-1, got {}",
            gamma
        )));
    }

    let two_over_hbar = 2.0 / constants.hbar_inv_cm_seconds;
    Ok(gaps.zip_map(couplings, |gap, soc| {
        two_over_hbar * soc * soc * gamma / (gap * gap + gamma * gamma)
    }))
}

/// End-to-end rate pipeline for manifolds given in hartree.
///
/// This is the path behind `kisc rates`: donor and acceptor energies in
/// hartree, couplings in cm⁻¹, `gamma` in cm⁻¹. Gaps are formed in hartree
/// and converted to cm⁻¹ through the constants' conversion chain before the
/// Lorentzian is applied. The ORCA extraction path shares [`gap_matrix`]
/// and [`rate_matrix`] directly since its energies are already in cm⁻¹.
pub fn isc_rate_matrix(
    donors_hartree: &[f64],
    acceptors_hartree: &[f64],
    couplings: Couplings,
    gamma: f64,
    constants: &PhysicalConstants,
) -> Result<DMatrix<f64>> {
    let gaps = gap_matrix(donors_hartree, acceptors_hartree)? * constants.inv_cm_per_hartree;
    let socs = reshape_couplings(couplings, donors_hartree.len(), acceptors_hartree.len())?;
    rate_matrix(&gaps, &socs, gamma, constants)
}

fn check_not_empty(rows: usize, cols: usize) -> Result<()> {
    if rows == 0 || cols == 0 {
        return Err(RateError::ShapeMismatch {
            rows,
            cols,
            expected: rows * cols,
            actual: 0,
        });
    }
    Ok(())
}

fn check_finite(values: &[f64], what: &str) -> Result<()> {
    for (i, value) in values.iter().enumerate() {
        if !value.is_finite() {
            return Err(RateError::NonNumericInput(format!(
                "{} at index {} is {}",
                what, i, value
            )));
        }
    }
    Ok(())
}
