//! Run configuration for the two calculation modes.
//!
//! - [`RateJob`]: a direct rate calculation from energies and couplings
//!   given on the command line
//! - [`ExtractConfig`]: options for extracting states and couplings from an
//!   ORCA output file before computing rates
//!
//! Both validate eagerly, so malformed input is reported before any file is
//! read or any matrix is built. The default Lorentzian half-width of
//! 1000 cm⁻¹ follows common practice for condensed-phase estimates.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default Lorentzian half-width, in cm⁻¹.
pub const DEFAULT_GAMMA: f64 = 1000.0;

/// Default output file for the extracted singlet-triplet Ms SOC matrix.
pub const DEFAULT_MATRIX_FILE: &str = "singlet-triplet-mat.csv";

/// A direct rate calculation: two manifolds and their couplings, straight
/// from the command line.
///
/// Donor and acceptor energies are in hartree (the unit excited-state
/// energies are tabulated in by most quantum chemistry programs), couplings
/// and `gamma` in cm⁻¹.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateJob {
    /// Donor (singlet) state energies in hartree, matrix row order.
    pub donor_energies: Vec<f64>,
    /// Acceptor (triplet) state energies in hartree, matrix column order.
    pub acceptor_energies: Vec<f64>,
    /// Coupling magnitudes in cm⁻¹, flat row-major.
    pub couplings: Vec<f64>,
    /// Lorentzian half-width in cm⁻¹.
    pub gamma: f64,
    /// Optional CSV destination for the rate matrix.
    pub output: Option<PathBuf>,
    /// Optional JSON destination for the full report.
    pub json: Option<PathBuf>,
}

impl Default for RateJob {
    fn default() -> Self {
        Self {
            donor_energies: Vec::new(),
            acceptor_energies: Vec::new(),
            couplings: Vec::new(),
            gamma: DEFAULT_GAMMA,
            output: None,
            json: None,
        }
    }
}

impl RateJob {
    /// Checks the job before any computation.
    ///
    /// Mirrors the calculator's own preconditions so problems surface with
    /// command-line context: both manifolds present, coupling count equal to
    /// the donor × acceptor grid, positive broadening.
    pub fn validate(&self) -> Result<(), String> {
        if self.donor_energies.is_empty() {
            return Err("no donor energies given (use -s / --singlet-energies)".into());
        }
        if self.acceptor_energies.is_empty() {
            return Err("no acceptor energies given (use -t / --triplet-energies)".into());
        }
        let expected = self.donor_energies.len() * self.acceptor_energies.len();
        if self.couplings.len() != expected {
            return Err(format!(
                "expected {} couplings for {} donor and {} acceptor states, got {} \
                 (use -soc / --spin-orbit-couplings, row-major)",
                expected,
                self.donor_energies.len(),
                self.acceptor_energies.len(),
                self.couplings.len()
            ));
        }
        if !(self.gamma > 0.0) || !self.gamma.is_finite() {
            return Err(format!(
                "gamma must be a positive half-width in cm^-1, got {}",
                self.gamma
            ));
        }
        Ok(())
    }
}

/// Options for the ORCA extraction mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// Lorentzian half-width in cm⁻¹.
    pub gamma: f64,
    /// Destination for the extracted Ms-basis SOC matrix.
    pub matrix_file: PathBuf,
    /// Write the SOC and rate matrices as CSV.
    pub save_matrices: bool,
    /// Print the extracted SOC matrix to the console.
    pub print_matrix: bool,
    /// Optional JSON destination for the full report.
    pub json: Option<PathBuf>,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            gamma: DEFAULT_GAMMA,
            matrix_file: PathBuf::from(DEFAULT_MATRIX_FILE),
            save_matrices: true,
            print_matrix: true,
            json: None,
        }
    }
}

impl ExtractConfig {
    /// Checks the options before the output file is read.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.gamma > 0.0) || !self.gamma.is_finite() {
            return Err(format!(
                "gamma must be a positive half-width in cm^-1, got {}",
                self.gamma
            ));
        }
        if !self.save_matrices && !self.print_matrix && self.json.is_none() {
            return Err(
                "nothing to do: matrices are neither saved, printed nor exported".into(),
            );
        }
        Ok(())
    }
}
