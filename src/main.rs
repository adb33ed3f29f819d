//! kisc Command-Line Interface
//!
//! This module contains the main entry point for the kisc program and
//! handles command-line argument parsing, help system integration, and
//! dispatch of the two calculation modes.
//!
//! # Usage
//!
//! 1. **Direct rates** (`kisc rates -s <E...> -t <E...> -soc <V...>`):
//!    computes the k_ISC matrix from energies (hartree) and spin-orbit
//!    couplings (cm⁻¹) given on the command line
//!
//! 2. **Extraction** (`kisc extract <orca_output>`):
//!    pulls the excited-state manifolds and SOC matrices out of an ORCA
//!    TD-DFT output, then computes the same rate matrix
//!
//! 3. **Settings template** (`kisc config`):
//!    writes a commented `kisc_config.cfg`
//!
//! Built-in help is available through `--help` with optional topics
//! `formula`, `formats` and `options`.

use kisc::config::{ExtractConfig, RateJob};
use kisc::constants::PhysicalConstants;
use kisc::io::{self, RateReport};
use kisc::rates::{self, Couplings};
use kisc::settings::{create_settings_template, Settings, SettingsManager};
use kisc::{help, orca};
use log::info;
use std::env;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process;

/// Main entry point for the kisc program.
///
/// Loads user settings, initializes the logger at the configured level
/// (`RUST_LOG` still overrides), and dispatches on the first argument.
///
/// # Errors
///
/// Exits with code 1 if:
/// - Insufficient or unknown arguments are provided
/// - Input validation fails
/// - Extraction or file operations fail
fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        help::print_usage(&args[0]);
        process::exit(1);
    }

    check_help_flags(&args);

    let settings = match SettingsManager::load() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error loading settings: {}", e);
            process::exit(1);
        }
    };

    env_logger::Builder::new()
        .parse_filters(&settings.settings().logging.level)
        .parse_default_env()
        .target(env_logger::Target::Stdout)
        .format_timestamp_millis()
        .init();
    info!("configuration loaded from: {}", settings.config_source());

    let command = &args[1];
    match command.as_str() {
        "rates" => {
            let job = match parse_rate_job(&args[2..], settings.settings()) {
                Ok(job) => job,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    eprintln!();
                    help::print_usage(&args[0]);
                    process::exit(1);
                }
            };
            if let Err(e) = run_rates(&job) {
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        }
        "extract" => {
            let (file, cfg) = match parse_extract_config(&args[2..], settings.settings()) {
                Ok(parsed) => parsed,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    eprintln!();
                    help::print_usage(&args[0]);
                    process::exit(1);
                }
            };
            if let Err(e) = run_extract(&file, &cfg, settings.settings().output.soc_precision) {
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        }
        "config" => match create_settings_template() {
            Ok(()) => {
                println!("Settings template created: kisc_config.cfg");
                println!("Edit it and place it next to your runs, under ~/.config/kisc/,");
                println!("or under /etc/kisc/.");
            }
            Err(e) => {
                eprintln!("Error creating settings template: {}", e);
                process::exit(1);
            }
        },
        _ => {
            eprintln!("Error: Unknown command: {}", command);
            help::print_usage(&args[0]);
            process::exit(1);
        }
    }
}

/// Check for help flags and print appropriate help
fn check_help_flags(args: &[String]) {
    if args[1] != "--help" && args[1] != "-h" {
        return;
    }
    match args.get(2).map(|s| s.as_str()) {
        Some("formula") => help::print_formula_help(),
        Some("formats") => help::print_formats_help(),
        Some("options") => help::print_options_help(),
        _ => help::print_usage(&args[0]),
    }
    process::exit(0);
}

/// Parses the `rates` command arguments into a [`RateJob`].
fn parse_rate_job(args: &[String], defaults: &Settings) -> Result<RateJob, String> {
    let mut job = RateJob {
        gamma: defaults.rates.gamma,
        ..RateJob::default()
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-s" | "--singlet-energies" => {
                job.donor_energies = collect_floats(args, &mut i, "-s")?;
            }
            "-t" | "--triplet-energies" => {
                job.acceptor_energies = collect_floats(args, &mut i, "-t")?;
            }
            "-soc" | "--spin-orbit-couplings" => {
                job.couplings = collect_floats(args, &mut i, "-soc")?;
            }
            "-g" | "--gamma" => {
                let value = next_value(args, &mut i, "-g")?;
                job.gamma = value
                    .parse()
                    .map_err(|_| format!("bad gamma value: {}", value))?;
            }
            "-o" | "--output" => {
                job.output = Some(PathBuf::from(next_value(args, &mut i, "-o")?));
            }
            "--json" => {
                job.json = Some(PathBuf::from(next_value(args, &mut i, "--json")?));
            }
            other => return Err(format!("unknown option: {}", other)),
        }
        i += 1;
    }

    job.validate()?;
    Ok(job)
}

/// Parses the `extract` command arguments.
fn parse_extract_config(
    args: &[String],
    defaults: &Settings,
) -> Result<(PathBuf, ExtractConfig), String> {
    let mut file = None;
    let mut cfg = ExtractConfig {
        gamma: defaults.rates.gamma,
        matrix_file: PathBuf::from(&defaults.output.matrix_file),
        ..ExtractConfig::default()
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-g" | "--gamma" => {
                let value = next_value(args, &mut i, "-g")?;
                cfg.gamma = value
                    .parse()
                    .map_err(|_| format!("bad gamma value: {}", value))?;
            }
            "-m" | "--matrix-file" => {
                cfg.matrix_file = PathBuf::from(next_value(args, &mut i, "-m")?);
            }
            "-ns" | "--no-save" => cfg.save_matrices = false,
            "-np" | "--no-print" => cfg.print_matrix = false,
            "--json" => {
                cfg.json = Some(PathBuf::from(next_value(args, &mut i, "--json")?));
            }
            other if !other.starts_with('-') && file.is_none() => {
                file = Some(PathBuf::from(other));
            }
            other => return Err(format!("unknown option: {}", other)),
        }
        i += 1;
    }

    let file = file.ok_or_else(|| "missing ORCA output file argument".to_string())?;
    cfg.validate()?;
    Ok((file, cfg))
}

/// Returns the value following a flag, advancing the cursor.
fn next_value<'a>(args: &'a [String], i: &mut usize, flag: &str) -> Result<&'a str, String> {
    *i += 1;
    args.get(*i)
        .map(|s| s.as_str())
        .ok_or_else(|| format!("missing value after {}", flag))
}

/// Collects the run of numeric values following a flag, advancing the
/// cursor past them. Negative numbers are values, not flags.
fn collect_floats(args: &[String], i: &mut usize, flag: &str) -> Result<Vec<f64>, String> {
    let mut values = Vec::new();
    while let Some(next) = args.get(*i + 1) {
        match next.parse::<f64>() {
            Ok(v) => {
                values.push(v);
                *i += 1;
            }
            Err(_) => break,
        }
    }
    if values.is_empty() {
        return Err(format!("no numeric values after {}", flag));
    }
    Ok(values)
}

/// Runs a direct rate calculation from command-line manifolds.
fn run_rates(job: &RateJob) -> Result<(), Box<dyn Error>> {
    let constants = PhysicalConstants::codata2018();

    let kisc = rates::isc_rate_matrix(
        &job.donor_energies,
        &job.acceptor_energies,
        Couplings::Flat(job.couplings.clone()),
        job.gamma,
        &constants,
    )?;

    println!("\nk_ISC Rows=Singlets Columns=Triplets (s^-1)");
    print!("{}", io::format_matrix(&kisc));

    if let Some(path) = &job.output {
        io::write_rate_matrix_csv(&kisc, path)?;
        info!("rate matrix written to {}", path.display());
    }

    if let Some(path) = &job.json {
        let gaps = rates::gap_matrix(&job.donor_energies, &job.acceptor_energies)?
            * constants.inv_cm_per_hartree;
        let socs = rates::reshape_couplings(
            Couplings::Flat(job.couplings.clone()),
            job.donor_energies.len(),
            job.acceptor_energies.len(),
        )?;
        let to_inv_cm = |energies: &[f64]| -> Vec<f64> {
            energies
                .iter()
                .map(|e| constants.hartree_to_inv_cm(*e))
                .collect()
        };
        let report = RateReport {
            gamma: job.gamma,
            singlets: None,
            triplets: None,
            donor_energies: to_inv_cm(&job.donor_energies),
            acceptor_energies: to_inv_cm(&job.acceptor_energies),
            couplings: io::matrix_rows(&socs),
            gaps: io::matrix_rows(&gaps),
            rates: io::matrix_rows(&kisc),
        };
        io::write_json_report(&report, path)?;
        info!("JSON report written to {}", path.display());
    }

    Ok(())
}

/// Runs the ORCA extraction mode: parse, compute, report, persist.
fn run_extract(
    file: &Path,
    cfg: &ExtractConfig,
    soc_precision: usize,
) -> Result<(), Box<dyn Error>> {
    let content = orca::read_output(file)?;

    let n_roots = orca::number_of_roots(&content)?;
    let total = orca::total_energy(&content)?;
    info!(
        "ground state total energy: {:.8} Eh ({:.5} eV)",
        total.hartree, total.ev
    );

    let (singlets, triplets) = orca::excited_states(&content)?;
    info!(
        "{} excited singlet and {} triplet states extracted",
        singlets.len() - 1,
        triplets.len()
    );

    let (soc_xyz, soc_ms) = orca::socme_matrices(&content, n_roots)?;

    let constants = PhysicalConstants::codata2018();
    let gaps = rates::gap_matrix(&singlets.energies(), &triplets.energies())?;
    let kisc = rates::rate_matrix(&gaps, &soc_xyz, cfg.gamma, &constants)?;

    print!("{}", io::format_rate_report(&singlets, &triplets, &soc_xyz, &gaps, &kisc));

    if cfg.print_matrix {
        println!("SOCs Rows=Singlets Columns=Triplets (Ms basis, cm^-1)");
        print!("{}", io::format_matrix(&soc_ms));
    }

    if cfg.save_matrices {
        io::write_matrix_csv(&soc_ms, &cfg.matrix_file, soc_precision, None)?;
        io::write_matrix_csv(
            &soc_xyz,
            Path::new("xyz_matrix.csv"),
            soc_precision,
            Some("Top to Bottom: Singlets, Left to Right: Triplets"),
        )?;
        io::write_rate_matrix_csv(&kisc, Path::new("kisc_matrix.csv"))?;
        info!(
            "matrices written to {}, xyz_matrix.csv and kisc_matrix.csv",
            cfg.matrix_file.display()
        );
    }

    if let Some(path) = &cfg.json {
        let report = RateReport {
            gamma: cfg.gamma,
            donor_energies: singlets.energies(),
            acceptor_energies: triplets.energies(),
            singlets: Some(singlets),
            triplets: Some(triplets),
            couplings: io::matrix_rows(&soc_xyz),
            gaps: io::matrix_rows(&gaps),
            rates: io::matrix_rows(&kisc),
        };
        io::write_json_report(&report, path)?;
        info!("JSON report written to {}", path.display());
    }

    Ok(())
}
