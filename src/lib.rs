#![deny(missing_docs)]

//! kisc - Intersystem Crossing Rate Calculator
//!
//! kisc computes intersystem crossing rates (k_ISC) between two manifolds of
//! electronic states — typically singlets and triplets — from their energies
//! and the spin-orbit coupling between every state pair, using a Lorentzian
//! line-shape approximation.
//!
//! # Overview
//!
//! Intersystem crossing is the non-radiative transition between electronic
//! states of different spin multiplicity. Its rate between donor state k and
//! acceptor state l is estimated as
//!
//! ```text
//! k_ISC(k,l) = 2/ħ · |SOC(k,l)|² · γ / (E_kl² + γ²)
//! ```
//!
//! with the energy gap `E_kl = E_k − E_l`, the spin-orbit coupling magnitude
//! `|SOC(k,l)|` and the Lorentzian half-width `γ`, all in cm⁻¹; the rate is
//! in s⁻¹ (equation (53) of
//! [DOI: 10.1021/acs.jpca.1c06165](https://doi.org/10.1021/acs.jpca.1c06165)).
//!
//! # Input Paths
//!
//! Energies and couplings can be supplied directly:
//!
//! ```bash
//! # two singlets, one triplet, couplings row-major in cm^-1
//! kisc rates -s 0.0 0.1532 -t 0.1021 -soc 2.0 3.0 -g 1000
//! ```
//!
//! or extracted from an ORCA TD-DFT output with SOC integrals:
//!
//! ```bash
//! kisc extract benzophenone.out -g 500 --json rates.json
//! ```
//!
//! # Pipeline
//!
//! Both paths go through the same stateless core: the
//! [`gap_matrix`](rates::gap_matrix) of the two manifolds, couplings shaped
//! by [`reshape_couplings`](rates::reshape_couplings), and the Lorentzian
//! evaluated by [`rate_matrix`](rates::rate_matrix) with the
//! [`PhysicalConstants`] built once at startup. All validation is eager:
//! shape mismatches, non-finite values and a non-positive broadening are
//! typed errors before any arithmetic runs.
//!
//! # References
//!
//! - Penfold, T. J. et al. *J. Phys. Chem. A* **2021**, 125.
//!   [DOI: 10.1021/acs.jpca.1c06165](https://doi.org/10.1021/acs.jpca.1c06165)
//! - CODATA 2018 adjustment of the fundamental constants,
//!   <https://physics.nist.gov/cuu/>

pub mod config;
/// Physical constants and the documented unit-conversion chain
pub mod constants;
/// Built-in help system
pub mod help;
pub mod io;
/// ORCA output extraction
pub mod orca;
pub mod rates;
/// Configuration management system
pub mod settings;
pub mod states;

pub use constants::PhysicalConstants;
pub use rates::{Couplings, RateError};
pub use states::{ExcitedState, Manifold};
