//! Excited-state data structures for rate calculations.
//!
//! A [`Manifold`] is an ordered list of electronic states of one spin
//! multiplicity (all singlets, or all triplets). The ordering is
//! significant: state k of the donor manifold is row k of every matrix the
//! calculator produces, and state l of the acceptor manifold is column l.
//! Energies are excitation energies in cm⁻¹ relative to the ground state,
//! which leaves every donor/acceptor gap unchanged while keeping the values
//! small enough to square without losing precision.

use serde::Serialize;

/// A single electronic state extracted from a quantum chemistry output.
#[derive(Debug, Clone, Serialize)]
pub struct ExcitedState {
    /// State index within its manifold (0 is the ground state).
    pub number: usize,
    /// Excitation energy relative to the ground state, in cm⁻¹.
    pub energy: f64,
    /// Transition wavelength in nm; `None` for the ground state.
    pub wavelength: Option<f64>,
    /// Oscillator strength of the transition from the ground state.
    /// Zero for spin-forbidden transitions.
    pub oscillator_strength: f64,
}

impl ExcitedState {
    /// The ground state: zero excitation energy, no transition wavelength.
    pub fn ground() -> Self {
        Self {
            number: 0,
            energy: 0.0,
            wavelength: None,
            oscillator_strength: 0.0,
        }
    }
}

/// An ordered manifold of electronic states sharing a spin multiplicity.
///
/// # Examples
///
/// ```
/// use kisc::states::{ExcitedState, Manifold};
///
/// let mut singlets = Manifold::new();
/// singlets.push(ExcitedState::ground());
/// singlets.push(ExcitedState {
///     number: 1,
///     energy: 15147.0,
///     wavelength: Some(660.2),
///     oscillator_strength: 7.6e-5,
/// });
///
/// assert_eq!(singlets.len(), 2);
/// assert_eq!(singlets.energies(), vec![0.0, 15147.0]);
/// ```
#[derive(Debug, Clone, Default, Serialize)]
pub struct Manifold {
    /// States in matrix order.
    pub states: Vec<ExcitedState>,
}

impl Manifold {
    /// Creates an empty manifold.
    pub fn new() -> Self {
        Self { states: Vec::new() }
    }

    /// Appends a state, preserving insertion order.
    pub fn push(&mut self, state: ExcitedState) {
        self.states.push(state);
    }

    /// Number of states in the manifold.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// True if the manifold holds no states.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Excitation energies in manifold order, in cm⁻¹.
    pub fn energies(&self) -> Vec<f64> {
        self.states.iter().map(|s| s.energy).collect()
    }

    /// Iterates over the states in manifold order.
    pub fn iter(&self) -> std::slice::Iter<'_, ExcitedState> {
        self.states.iter()
    }
}
