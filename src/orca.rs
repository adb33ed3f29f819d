//! Extraction of excited states and spin-orbit couplings from ORCA output.
//!
//! ORCA TD-DFT outputs are semi-structured text: tagged section headers
//! followed by fixed-layout tables. This module scans the output line by
//! line, switching on the section tags, and pulls out exactly the pieces
//! the rate calculator needs:
//!
//! - the number of TD-DFT roots
//! - the ground-state total energy
//! - the absorption spectrum (singlet rows carry an oscillator strength,
//!   spin-forbidden rows are the triplets)
//! - the two "CALCULATED SOCME BETWEEN TRIPLETS AND SINGLETS" tables
//!   (Cartesian components first, Ms components second)
//!
//! Each SOCME entry is a triple of complex numbers; it is reduced to its
//! Euclidean magnitude and stored in a matrix with singlets (including the
//! ground state) as rows and triplets as columns, ready for
//! [`rate_matrix`](crate::rates::rate_matrix).
//!
//! All extraction is eager: a missing section or a truncated table is a
//! [`ParseError`] up front, never a partially filled matrix.

use crate::states::{ExcitedState, Manifold};
use lazy_static::lazy_static;
use log::{debug, info};
use nalgebra::DMatrix;
use regex::Regex;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Error type for ORCA output extraction.
#[derive(Error, Debug)]
pub enum ParseError {
    /// I/O error when reading the output file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Expected content missing or malformed
    #[error("parse error: {0}")]
    Parse(String),
}

/// Type alias for extraction results
type Result<T> = std::result::Result<T, ParseError>;

lazy_static! {
    // Robust floating-point regex: handles 1.23, -0.032, 1.2e-4, .123, etc.
    static ref FLOAT_RE: String = r"[-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?".to_string();

    // " Number of roots to be determined               ...    5"
    static ref ROOTS_RE: Regex =
        Regex::new(r"Number of roots to be determined\D*(\d+)\s*$").unwrap();

    // "Total Energy       :       -12312.28056663 Eh         -335034.18703 eV"
    static ref TOTAL_ENERGY_RE: Regex = Regex::new(&format!(
        r"Total Energy\s*:\s*({0})\s*Eh\s*({0})\s*eV",
        *FLOAT_RE
    )).unwrap();
}

const ABSORPTION_HEADER: &str = "ABSORPTION SPECTRUM VIA TRANSITION ELECTRIC DIPOLE MOMENTS";
const VELOCITY_HEADER: &str = "ABSORPTION SPECTRUM VIA TRANSITION VELOCITY DIPOLE MOMENTS";
const CD_HEADER: &str = "CD SPECTRUM";
const SOCME_HEADER: &str = "CALCULATED SOCME BETWEEN TRIPLETS AND SINGLETS";

/// Ground-state total energy as printed by ORCA, in both units of the
/// output line.
#[derive(Debug, Clone, Copy)]
pub struct TotalEnergy {
    /// Total energy in hartree.
    pub hartree: f64,
    /// Total energy in eV.
    pub ev: f64,
}

/// Reads an ORCA output file into memory.
pub fn read_output(path: &Path) -> Result<String> {
    let content = fs::read_to_string(path)?;
    info!("file {} read", path.display());
    Ok(content)
}

/// Extracts the number of TD-DFT roots.
///
/// Looks for the "Number of roots to be determined" line of the TD-DFT
/// input echo. The SOCME tables are sized by this count.
pub fn number_of_roots(content: &str) -> Result<usize> {
    for line in content.lines() {
        if let Some(caps) = ROOTS_RE.captures(line) {
            let n: usize = caps[1].parse().map_err(|_| {
                ParseError::Parse(format!("unreadable root count in line: {}", line.trim()))
            })?;
            info!("{} excited states found", n);
            return Ok(n);
        }
    }
    Err(ParseError::Parse(
        "'Number of roots to be determined' not found. Check that the output \
         comes from an ORCA TD-DFT calculation."
            .into(),
    ))
}

/// Extracts the ground-state total energy.
///
/// ORCA prints several "Total Energy" lines during an SCF; the last one is
/// the converged value and wins.
pub fn total_energy(content: &str) -> Result<TotalEnergy> {
    let mut result = None;
    for line in content.lines() {
        if let Some(caps) = TOTAL_ENERGY_RE.captures(line) {
            let hartree: f64 = caps[1]
                .parse()
                .map_err(|_| ParseError::Parse(format!("bad energy in line: {}", line.trim())))?;
            let ev: f64 = caps[2]
                .parse()
                .map_err(|_| ParseError::Parse(format!("bad energy in line: {}", line.trim())))?;
            result = Some(TotalEnergy { hartree, ev });
        }
    }
    result.ok_or_else(|| {
        ParseError::Parse(
            "'Total Energy' line not found. Check that the SCF completed.".into(),
        )
    })
}

/// Extracts the singlet and triplet manifolds from the absorption spectrum.
///
/// The electric-dipole absorption table lists every root once. Rows with an
/// oscillator strength column are singlets:
///
/// ```text
///   20   15147.0    660.2   0.000076214   0.00166   0.03728  -0.01632  -0.00020
/// ```
///
/// and spin-forbidden rows are the triplets:
///
/// ```text
///   21    6525.5   1532.5   spin forbidden (mult=3)
/// ```
///
/// Energies are taken as printed (cm⁻¹, relative to the ground state). The
/// returned singlet manifold has the ground state prepended at 0 cm⁻¹ so its
/// rows line up with the SOCME matrices.
pub fn excited_states(content: &str) -> Result<(Manifold, Manifold)> {
    let lines: Vec<&str> = content.lines().collect();

    let start = lines
        .iter()
        .position(|l| l.contains(ABSORPTION_HEADER))
        .ok_or_else(|| {
            ParseError::Parse(format!(
                "'{}' section not found. Check that TD-DFT was requested.",
                ABSORPTION_HEADER
            ))
        })?;
    let end = lines[start + 1..]
        .iter()
        .position(|l| l.contains(VELOCITY_HEADER) || l.contains(CD_HEADER))
        .map(|i| start + 1 + i)
        .unwrap_or(lines.len());

    let mut singlets = Manifold::new();
    singlets.push(ExcitedState::ground());
    let mut triplets = Manifold::new();

    for line in &lines[start + 1..end] {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 3 {
            continue;
        }
        let number: usize = match tokens[0].parse() {
            Ok(n) => n,
            Err(_) => continue,
        };
        let (energy, wavelength): (f64, f64) = match (tokens[1].parse(), tokens[2].parse()) {
            (Ok(e), Ok(w)) => (e, w),
            _ => continue,
        };

        if line.contains("spin forbidden") {
            debug!("TRIPLET: {}", line.trim());
            triplets.push(ExcitedState {
                number,
                energy,
                wavelength: Some(wavelength),
                oscillator_strength: 0.0,
            });
        } else if tokens.len() >= 8 {
            let oscillator_strength: f64 = tokens[3].parse().map_err(|_| {
                ParseError::Parse(format!(
                    "bad oscillator strength in absorption row: {}",
                    line.trim()
                ))
            })?;
            debug!("SINGLET: {}", line.trim());
            singlets.push(ExcitedState {
                number,
                energy,
                wavelength: Some(wavelength),
                oscillator_strength,
            });
        }
    }

    if singlets.len() == 1 || triplets.is_empty() {
        return Err(ParseError::Parse(format!(
            "no state rows parsed from the absorption spectrum ({} singlets, {} triplets). \
             Check that the calculation included both multiplicities.",
            singlets.len() - 1,
            triplets.len()
        )));
    }

    Ok((singlets, triplets))
}

/// Extracts both SOCME tables as magnitude matrices.
///
/// The first table holds the Cartesian (z, x, y) components, the second the
/// spherical (Ms = 0, -1, +1) components. Each data row is
///
/// ```text
///    1      0    (0.00e+00 , 8.41e+00)    (-6.17e+00 , -4.88e+00)    (-6.17e+00 , 4.88e+00)
/// ```
///
/// with the triplet index first (1-based) and the singlet index second
/// (0 is the ground state). The three complex components are collapsed to
/// a single Euclidean magnitude. Both returned matrices have shape
/// `(n_roots + 1, n_roots)`: rows are singlets S0..Sn, columns are triplets
/// T1..Tn.
pub fn socme_matrices(content: &str, n_roots: usize) -> Result<(DMatrix<f64>, DMatrix<f64>)> {
    if n_roots == 0 {
        return Err(ParseError::Parse("SOCME tables need at least one root".into()));
    }
    let lines: Vec<&str> = content.lines().collect();
    let headers: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, l)| l.contains(SOCME_HEADER))
        .map(|(i, _)| i)
        .collect();

    match headers.len() {
        0 => Err(ParseError::Parse(format!(
            "'{}' section not found. Check that SOC integrals were requested \
             (DOSOC TRUE in the %tddft block).",
            SOCME_HEADER
        ))),
        1 => Err(ParseError::Parse(
            "only one SOCME table found; expected the Cartesian table followed \
             by the Ms table."
                .into(),
        )),
        _ => {
            debug!("Cartesian SOCME table at line {}", headers[0]);
            debug!("Ms SOCME table at line {}", headers[1]);
            let cartesian = read_socme_table(&lines, headers[0], n_roots)?;
            let ms = read_socme_table(&lines, headers[1], n_roots)?;
            Ok((cartesian, ms))
        }
    }
}

/// Reads one SOCME table starting after its header line.
fn read_socme_table(lines: &[&str], header: usize, n_roots: usize) -> Result<DMatrix<f64>> {
    let expected = n_roots * (n_roots + 1);
    let mut matrix = DMatrix::zeros(n_roots + 1, n_roots);
    let mut seen = 0usize;
    let mut in_data = false;

    for line in &lines[header + 1..] {
        match parse_socme_row(line) {
            Some((t, s, magnitude)) => {
                in_data = true;
                if t < 1 || t > n_roots || s > n_roots {
                    return Err(ParseError::Parse(format!(
                        "SOCME row T={} S={} outside the {}-root table",
                        t, s, n_roots
                    )));
                }
                matrix[(s, t - 1)] = magnitude;
                seen += 1;
                if seen == expected {
                    return Ok(matrix);
                }
            }
            // decoration lines before the data are fine; a gap after the
            // data started means the table ended early
            None if !in_data => continue,
            None => break,
        }
    }

    Err(ParseError::Parse(format!(
        "SOCME table truncated: expected {} rows, found {}",
        expected, seen
    )))
}

/// Parses one SOCME data row into (triplet index, singlet index, magnitude).
///
/// Returns `None` for decoration lines (rulers, column headers).
fn parse_socme_row(line: &str) -> Option<(usize, usize, f64)> {
    let cleaned = line.replace(['(', ')', ','], " ");
    let tokens: Vec<&str> = cleaned.split_whitespace().collect();
    if tokens.len() != 8 {
        return None;
    }
    let t: usize = tokens[0].parse().ok()?;
    let s: usize = tokens[1].parse().ok()?;
    let mut sum_sq = 0.0;
    for token in &tokens[2..] {
        let value: f64 = token.parse().ok()?;
        sum_sq += value * value;
    }
    Some((t, s, sum_sq.sqrt()))
}
