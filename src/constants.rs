//! Physical constants and the unit-conversion chain for rate calculations.
//!
//! The rate formula works in wavenumbers (cm⁻¹) for energies and couplings
//! and produces rates in s⁻¹, so every derived constant here is expressed in
//! those working units. Rather than hard-coding pre-converted values, the
//! derived constants are built step by step from the fixed CODATA 2018
//! inputs, with the source and target unit of every step spelled out. This
//! keeps the chain auditable and lets the tests recompute it independently.
//!
//! All values are bundled into an immutable [`PhysicalConstants`] that is
//! constructed once at process start and passed into the calculator by
//! parameter.

/// CODATA 2018 Planck constant, in J·s (exact by SI definition).
pub const PLANCK_JOULE_SECONDS: f64 = 6.62607015e-34;

/// CODATA 2018 elementary charge, in C. Numerically equal to the number of
/// joules per electronvolt (exact by SI definition).
pub const JOULES_PER_ELECTRONVOLT: f64 = 1.602176634e-19;

/// Speed of light in vacuum, in m/s (exact by SI definition).
pub const SPEED_OF_LIGHT_M_PER_S: f64 = 299792458.0;

/// CODATA 2018 hartree energy, in eV per Eh.
pub const ELECTRONVOLTS_PER_HARTREE: f64 = 27.211386245988;

/// Metric prefix factor: nanometers per meter.
pub const NANOMETERS_PER_METER: f64 = 1.0e9;

/// Metric prefix factor: nanometers per centimeter.
pub const NANOMETERS_PER_CENTIMETER: f64 = 1.0e7;

/// Immutable set of physical constants in the working units of the rate
/// calculator.
///
/// The raw SI inputs are kept alongside the derived quantities so a report
/// or a test can always trace a derived value back to its sources.
///
/// # Examples
///
/// ```
/// use kisc::constants::PhysicalConstants;
///
/// let c = PhysicalConstants::codata2018();
///
/// // hc ≈ 1239.84 eV·nm, the familiar photon-energy conversion factor
/// assert!((c.ev_nanometers - 1239.8419).abs() < 1e-3);
///
/// // ħ ≈ 5.3088e-12 cm⁻¹·s
/// assert!((c.hbar_inv_cm_seconds - 5.3088e-12).abs() < 1e-15);
///
/// // 1 Eh ≈ 219474.63 cm⁻¹
/// assert!((c.inv_cm_per_hartree - 219474.63).abs() < 1e-2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicalConstants {
    /// Planck constant h, in J·s.
    pub planck_joule_seconds: f64,
    /// Joules per electronvolt (elementary charge), in J/eV.
    pub joules_per_electronvolt: f64,
    /// Speed of light in vacuum, in m/s.
    pub speed_of_light_m_per_s: f64,
    /// Electronvolts per hartree, in eV/Eh.
    pub electronvolts_per_hartree: f64,
    /// Photon-energy conversion factor hc, in eV·nm.
    pub ev_nanometers: f64,
    /// Reduced Planck constant ħ, in cm⁻¹·s.
    pub hbar_inv_cm_seconds: f64,
    /// Wavenumbers per hartree, in cm⁻¹/Eh.
    pub inv_cm_per_hartree: f64,
    /// Wavenumbers per electronvolt, in cm⁻¹/eV.
    pub inv_cm_per_ev: f64,
}

impl PhysicalConstants {
    /// Builds the constant set from the CODATA 2018 adjustments.
    ///
    /// The derivation proceeds in order, each step converting exactly one
    /// unit:
    ///
    /// 1. `hc` in eV·nm: `(nm/m) · h[J·s] · c[m/s] / (J/eV)`
    ///    — J·m becomes J·nm, then eV·nm.
    /// 2. `ħ` in cm⁻¹·s: `h/(2π)[J·s] / (J/eV) → eV·s`, divide by
    ///    `hc[eV·nm] → s/nm`, multiply by `(nm/cm) → cm⁻¹·s`.
    /// 3. cm⁻¹ per hartree: `(eV/Eh) / hc[eV·nm] → nm⁻¹/Eh`, multiply by
    ///    `(nm/cm) → cm⁻¹/Eh`.
    /// 4. cm⁻¹ per eV: `(nm/cm) / hc[eV·nm]`.
    pub fn codata2018() -> Self {
        let ev_nanometers = NANOMETERS_PER_METER * PLANCK_JOULE_SECONDS * SPEED_OF_LIGHT_M_PER_S
            / JOULES_PER_ELECTRONVOLT;

        let hbar_inv_cm_seconds = PLANCK_JOULE_SECONDS / (2.0 * std::f64::consts::PI)
            * NANOMETERS_PER_CENTIMETER
            / JOULES_PER_ELECTRONVOLT
            / ev_nanometers;

        let inv_cm_per_hartree =
            ELECTRONVOLTS_PER_HARTREE * NANOMETERS_PER_CENTIMETER / ev_nanometers;

        let inv_cm_per_ev = NANOMETERS_PER_CENTIMETER / ev_nanometers;

        Self {
            planck_joule_seconds: PLANCK_JOULE_SECONDS,
            joules_per_electronvolt: JOULES_PER_ELECTRONVOLT,
            speed_of_light_m_per_s: SPEED_OF_LIGHT_M_PER_S,
            electronvolts_per_hartree: ELECTRONVOLTS_PER_HARTREE,
            ev_nanometers,
            hbar_inv_cm_seconds,
            inv_cm_per_hartree,
            inv_cm_per_ev,
        }
    }

    /// Converts an energy in hartree to wavenumbers.
    pub fn hartree_to_inv_cm(&self, energy_hartree: f64) -> f64 {
        energy_hartree * self.inv_cm_per_hartree
    }

    /// Converts an energy in wavenumbers to a wavelength in nanometers.
    ///
    /// Returns `None` for a non-positive energy, where no wavelength is
    /// defined (the ground state has zero excitation energy).
    pub fn inv_cm_to_nanometers(&self, energy_inv_cm: f64) -> Option<f64> {
        if energy_inv_cm > 0.0 {
            Some(NANOMETERS_PER_CENTIMETER / energy_inv_cm)
        } else {
            None
        }
    }
}

impl Default for PhysicalConstants {
    fn default() -> Self {
        Self::codata2018()
    }
}
