//! Built-in help system.
//!
//! Topic help for the rate formula, the expected file formats and the
//! command-line options, printed on `--help <topic>`.

use crate::config::{DEFAULT_GAMMA, DEFAULT_MATRIX_FILE};

/// Prints the usage banner.
pub fn print_usage(program: &str) {
    println!("Usage:");
    println!(
        "  {} rates -s <E...> -t <E...> -soc <V...> [options]   Compute k_ISC from energies",
        program
    );
    println!(
        "  {} extract <orca_output> [options]                   Extract states/SOCs and compute k_ISC",
        program
    );
    println!(
        "  {} config                                            Write a settings template",
        program
    );
    println!();
    println!("Help:");
    println!("  {} --help            This overview", program);
    println!("  {} --help formula    The rate law and unit conventions", program);
    println!("  {} --help formats    Input and output file formats", program);
    println!("  {} --help options    All command-line options", program);
}

/// Prints the rate law and its unit conventions.
pub fn print_formula_help() {
    println!("Rate law");
    println!("--------");
    println!();
    println!("  k_ISC(k,l) = 2/hbar * |SOC(k,l)|^2 * gamma / (E_kl^2 + gamma^2)");
    println!();
    println!("Equation (53) of J. Phys. Chem. A 2021, 125, DOI 10.1021/acs.jpca.1c06165.");
    println!("E_kl = E_donor(k) - E_acceptor(l) is the energy gap between donor state k");
    println!("(a singlet) and acceptor state l (a triplet).");
    println!();
    println!("Units: gaps, couplings and gamma in cm^-1; hbar is used as");
    println!("5.3088e-12 cm^-1 s, derived from the CODATA 2018 constants, so rates");
    println!("come out in s^-1. Energies given to `rates` are in hartree and are");
    println!("converted with 1 Eh = 219474.63 cm^-1.");
    println!();
    println!("A zero gap is the resonance condition and gives the peak rate");
    println!("2/hbar * |SOC|^2 / gamma; gamma must always be strictly positive.");
}

/// Prints the expected input and produced output formats.
pub fn print_formats_help() {
    println!("Input: ORCA TD-DFT output (extract mode)");
    println!("----------------------------------------");
    println!();
    println!("The extract mode needs an ORCA output containing:");
    println!("  - the TD-DFT input echo ('Number of roots to be determined')");
    println!("  - the converged SCF 'Total Energy' line");
    println!("  - 'ABSORPTION SPECTRUM VIA TRANSITION ELECTRIC DIPOLE MOMENTS'");
    println!("    (singlet rows carry an oscillator strength; 'spin forbidden'");
    println!("    rows are the triplets)");
    println!("  - both 'CALCULATED SOCME BETWEEN TRIPLETS AND SINGLETS' tables");
    println!("    (request them with DOSOC TRUE in the %tddft block)");
    println!();
    println!("Output files");
    println!("------------");
    println!();
    println!("  {}   Ms-basis |SOC| matrix, CSV", DEFAULT_MATRIX_FILE);
    println!("  xyz_matrix.csv            Cartesian |SOC| matrix, CSV");
    println!("  kisc_matrix.csv           rate matrix in s^-1, CSV");
    println!();
    println!("All matrices have singlets (S0 first) top to bottom and triplets");
    println!("left to right. JSON reports (--json FILE) additionally carry state");
    println!("numbers, wavelengths and oscillator strengths.");
}

/// Prints all command-line options.
pub fn print_options_help() {
    println!("rates options");
    println!("-------------");
    println!("  -s,   --singlet-energies <E...>      Donor energies in hartree");
    println!("  -t,   --triplet-energies <E...>      Acceptor energies in hartree");
    println!("  -soc, --spin-orbit-couplings <V...>  Couplings in cm^-1, row-major");
    println!("  -g,   --gamma <G>                    Half-width in cm^-1 (default {})", DEFAULT_GAMMA);
    println!("  -o,   --output <FILE>                Write the rate matrix as CSV");
    println!("        --json <FILE>                  Write the full report as JSON");
    println!();
    println!("extract options");
    println!("---------------");
    println!("  -g,  --gamma <G>                     Half-width in cm^-1 (default {})", DEFAULT_GAMMA);
    println!("  -m,  --matrix-file <FILE>            Ms SOC matrix file (default {})", DEFAULT_MATRIX_FILE);
    println!("  -ns, --no-save                       Do not write CSV matrices");
    println!("  -np, --no-print                      Do not print the SOC matrix");
    println!("       --json <FILE>                   Write the full report as JSON");
}
