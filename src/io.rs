//! Output writers for matrices and rate reports.
//!
//! Matrices go out as plain comma-delimited text so any downstream plotting
//! or spreadsheet tool can pick them up; the human-readable rate report
//! mirrors the per-state coupling listing people are used to reading on the
//! console; and the full run can be persisted as a pretty-printed JSON
//! document.

use crate::states::Manifold;
use nalgebra::DMatrix;
use serde::Serialize;
use std::fs;
use std::io::Result;
use std::path::Path;

/// Writes a matrix as comma-delimited text with fixed-point precision.
///
/// An optional footer line is appended verbatim, used to label the row and
/// column conventions of the SOC matrices.
pub fn write_matrix_csv(
    matrix: &DMatrix<f64>,
    path: &Path,
    precision: usize,
    footer: Option<&str>,
) -> Result<()> {
    let mut content = String::new();
    for row in 0..matrix.nrows() {
        let cells: Vec<String> = (0..matrix.ncols())
            .map(|col| format!("{:.*}", precision, matrix[(row, col)]))
            .collect();
        content.push_str(&cells.join(","));
        content.push('\n');
    }
    if let Some(footer) = footer {
        content.push_str(footer);
        content.push('\n');
    }
    fs::write(path, content)
}

/// Writes a rate matrix as comma-delimited text in scientific notation.
pub fn write_rate_matrix_csv(matrix: &DMatrix<f64>, path: &Path) -> Result<()> {
    let mut content = String::new();
    for row in 0..matrix.nrows() {
        let cells: Vec<String> = (0..matrix.ncols())
            .map(|col| format!("{:.6e}", matrix[(row, col)]))
            .collect();
        content.push_str(&cells.join(","));
        content.push('\n');
    }
    fs::write(path, content)
}

/// Formats a matrix for console display, scientific notation, one row per
/// line.
pub fn format_matrix(matrix: &DMatrix<f64>) -> String {
    let mut out = String::new();
    for row in 0..matrix.nrows() {
        let cells: Vec<String> = (0..matrix.ncols())
            .map(|col| format!("{:>10.2e}", matrix[(row, col)]))
            .collect();
        out.push_str(&cells.join("  "));
        out.push('\n');
    }
    out
}

/// Formats the per-state rate report.
///
/// One block per donor (singlet) state, one line per acceptor (triplet)
/// state with the coupling magnitude, energy gap and resulting rate:
///
/// ```text
/// Couplings of S(  1) at    660.2 nm to:
/// T(  1) at   1532.5 nm ... |SOC| =        8 cm^-1 ... Ekl =     8622 cm^-1 ... k_ISC = 3.2e4 s^-1
/// ```
///
/// The caller guarantees that `socs`, `gaps` and `rates` share the shape
/// (singlets × triplets); [`rate_matrix`](crate::rates::rate_matrix) has
/// already validated it.
pub fn format_rate_report(
    singlets: &Manifold,
    triplets: &Manifold,
    socs: &DMatrix<f64>,
    gaps: &DMatrix<f64>,
    rates: &DMatrix<f64>,
) -> String {
    debug_assert_eq!(rates.shape(), (singlets.len(), triplets.len()));

    let mut out = String::new();
    for (k, singlet) in singlets.iter().enumerate() {
        out.push_str(&format!(
            "Couplings of S({:>3}) at {} nm to:\n",
            singlet.number,
            format_wavelength(singlet.wavelength)
        ));
        for (l, triplet) in triplets.iter().enumerate() {
            out.push_str(&format!(
                "T({:>3}) at {} nm ... |SOC| = {:>8.0} cm^-1 ... Ekl = {:>8.0} cm^-1 ... k_ISC = {:>7.1e} s^-1\n",
                triplet.number,
                format_wavelength(triplet.wavelength),
                socs[(k, l)],
                gaps[(k, l)],
                rates[(k, l)]
            ));
        }
        out.push('\n');
    }
    out
}

fn format_wavelength(wavelength: Option<f64>) -> String {
    match wavelength {
        Some(w) => format!("{:>8.1}", w),
        None => format!("{:>8}", "---"),
    }
}

/// Complete result of one rate calculation, serializable to JSON.
///
/// `donor_energies`, `acceptor_energies`, `gaps` and `couplings` are in
/// cm⁻¹, `rates` in s⁻¹. The manifolds are present when the run came from
/// an ORCA extraction and carry state numbers, wavelengths and oscillator
/// strengths.
#[derive(Debug, Serialize)]
pub struct RateReport {
    /// Lorentzian half-width used for the run, in cm⁻¹.
    pub gamma: f64,
    /// Singlet manifold, extraction runs only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub singlets: Option<Manifold>,
    /// Triplet manifold, extraction runs only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub triplets: Option<Manifold>,
    /// Donor energies in cm⁻¹, matrix row order.
    pub donor_energies: Vec<f64>,
    /// Acceptor energies in cm⁻¹, matrix column order.
    pub acceptor_energies: Vec<f64>,
    /// Coupling magnitudes in cm⁻¹, row-major.
    pub couplings: Vec<Vec<f64>>,
    /// Energy gaps in cm⁻¹, row-major.
    pub gaps: Vec<Vec<f64>>,
    /// Intersystem crossing rates in s⁻¹, row-major.
    pub rates: Vec<Vec<f64>>,
}

/// Converts a matrix into row-major nested vectors for serialization.
pub fn matrix_rows(matrix: &DMatrix<f64>) -> Vec<Vec<f64>> {
    (0..matrix.nrows())
        .map(|row| (0..matrix.ncols()).map(|col| matrix[(row, col)]).collect())
        .collect()
}

/// Persists a rate report as pretty-printed JSON.
pub fn write_json_report(report: &RateReport, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    fs::write(path, json)
}
