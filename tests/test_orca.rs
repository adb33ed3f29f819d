// Integration tests for ORCA output extraction
use kisc::constants::PhysicalConstants;
use kisc::orca;
use kisc::rates::{gap_matrix, rate_matrix};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// A minimal two-root ORCA TD-DFT output with both SOCME tables.
fn sample_output() -> String {
    r#"
                        ORCA TD-DFT/TDA CALCULATION

   Number of roots to be determined               ...    2

----------------
TOTAL SCF ENERGY
----------------

Total Energy       :         -230.72274500 Eh           -6278.42102 eV

-----------------------------------------------------------------------------
         ABSORPTION SPECTRUM VIA TRANSITION ELECTRIC DIPOLE MOMENTS
-----------------------------------------------------------------------------
State   Energy  Wavelength   fosc         T2         TX        TY        TZ
        (cm-1)    (nm)                  (au**2)     (au)      (au)      (au)
-----------------------------------------------------------------------------
   1   30000.0    333.3   0.001000000   0.00166   0.03728  -0.01632  -0.00020
   2   40000.0    250.0   0.002000000   0.00201   0.04100   0.01110   0.00300
   3   25000.0    400.0   spin forbidden (mult=3)
   4   35000.0    285.7   spin forbidden (mult=3)

-----------------------------------------------------------------------------
         ABSORPTION SPECTRUM VIA TRANSITION VELOCITY DIPOLE MOMENTS
-----------------------------------------------------------------------------
State   Energy  Wavelength   fosc
-----------------------------------------------------------------------------

      --------------------------------------------------------------------------------
                      CALCULATED SOCME BETWEEN TRIPLETS AND SINGLETS
      --------------------------------------------------------------------------------
           Root                          <T|HSO|S>  (Re, Im) cm-1
         T      S              Z                    X                     Y
      --------------------------------------------------------------------------------
         1      0    (0.00e+00 , 3.00e+00)    (4.00e+00 , 0.00e+00)    (0.00e+00 , 0.00e+00)
         1      1    (0.00e+00 , 1.00e+00)    (0.00e+00 , 0.00e+00)    (0.00e+00 , 0.00e+00)
         1      2    (2.00e+00 , 0.00e+00)    (0.00e+00 , 0.00e+00)    (0.00e+00 , 0.00e+00)
         2      0    (0.00e+00 , 0.00e+00)    (0.00e+00 , 5.00e+00)    (0.00e+00 , 0.00e+00)
         2      1    (6.00e+00 , 0.00e+00)    (0.00e+00 , 0.00e+00)    (0.00e+00 , 0.00e+00)
         2      2    (0.00e+00 , 0.00e+00)    (0.00e+00 , 0.00e+00)    (7.00e+00 , 0.00e+00)

      --------------------------------------------------------------------------------
                      CALCULATED SOCME BETWEEN TRIPLETS AND SINGLETS
      --------------------------------------------------------------------------------
           Root                          <T|HSO|S>  (Re, Im) cm-1
         T      S           MS= 0                  -1                    +1
      --------------------------------------------------------------------------------
         1      0    (1.00e+00 , 0.00e+00)    (0.00e+00 , 0.00e+00)    (0.00e+00 , 0.00e+00)
         1      1    (1.00e+00 , 0.00e+00)    (0.00e+00 , 0.00e+00)    (0.00e+00 , 0.00e+00)
         1      2    (1.00e+00 , 0.00e+00)    (0.00e+00 , 0.00e+00)    (0.00e+00 , 0.00e+00)
         2      0    (0.00e+00 , 2.00e+00)    (0.00e+00 , 0.00e+00)    (0.00e+00 , 0.00e+00)
         2      1    (0.00e+00 , 2.00e+00)    (0.00e+00 , 0.00e+00)    (0.00e+00 , 0.00e+00)
         2      2    (0.00e+00 , 2.00e+00)    (0.00e+00 , 0.00e+00)    (0.00e+00 , 0.00e+00)
"#
    .to_string()
}

#[test]
fn reads_output_from_file() {
    let path = Path::new("test_orca_sample.out");
    let mut file = File::create(path).unwrap();
    write!(file, "{}", sample_output()).unwrap();

    let content = orca::read_output(path).unwrap();
    assert_eq!(orca::number_of_roots(&content).unwrap(), 2);

    std::fs::remove_file(path).unwrap();
}

#[test]
fn extracts_total_energy() {
    let e = orca::total_energy(&sample_output()).unwrap();
    assert!((e.hartree + 230.722745).abs() < 1e-9);
    assert!((e.ev + 6278.42102).abs() < 1e-9);
}

#[test]
fn extracts_both_manifolds_from_absorption_spectrum() {
    let (singlets, triplets) = orca::excited_states(&sample_output()).unwrap();

    // ground state prepended at zero
    assert_eq!(singlets.len(), 3);
    assert_eq!(singlets.states[0].energy, 0.0);
    assert!(singlets.states[0].wavelength.is_none());
    assert_eq!(singlets.energies(), vec![0.0, 30000.0, 40000.0]);
    assert!((singlets.states[1].oscillator_strength - 0.001).abs() < 1e-12);

    assert_eq!(triplets.len(), 2);
    assert_eq!(triplets.energies(), vec![25000.0, 35000.0]);
    assert_eq!(triplets.states[0].number, 3);
    assert_eq!(triplets.states[0].oscillator_strength, 0.0);
    assert_eq!(triplets.states[0].wavelength, Some(400.0));
}

#[test]
fn socme_tables_become_magnitude_matrices() {
    let (xyz, ms) = orca::socme_matrices(&sample_output(), 2).unwrap();

    // rows are singlets S0..S2, columns are triplets T1..T2
    assert_eq!(xyz.shape(), (3, 2));
    assert_eq!(ms.shape(), (3, 2));

    // (S0, T1): |(0+3i, 4, 0)| = 5
    assert!((xyz[(0, 0)] - 5.0).abs() < 1e-12);
    assert!((xyz[(1, 0)] - 1.0).abs() < 1e-12);
    assert!((xyz[(2, 0)] - 2.0).abs() < 1e-12);
    assert!((xyz[(0, 1)] - 5.0).abs() < 1e-12);
    assert!((xyz[(1, 1)] - 6.0).abs() < 1e-12);
    assert!((xyz[(2, 1)] - 7.0).abs() < 1e-12);

    // the Ms table is the second block
    assert!((ms[(0, 0)] - 1.0).abs() < 1e-12);
    assert!((ms[(0, 1)] - 2.0).abs() < 1e-12);
}

#[test]
fn extracted_data_feeds_the_rate_pipeline() {
    let content = sample_output();
    let n_roots = orca::number_of_roots(&content).unwrap();
    let (singlets, triplets) = orca::excited_states(&content).unwrap();
    let (xyz, _ms) = orca::socme_matrices(&content, n_roots).unwrap();

    let constants = PhysicalConstants::codata2018();
    let gamma = 1000.0;
    let gaps = gap_matrix(&singlets.energies(), &triplets.energies()).unwrap();
    let rates = rate_matrix(&gaps, &xyz, gamma, &constants).unwrap();

    assert_eq!(rates.shape(), (3, 2));

    // spot check (S1, T1): gap = 30000 - 25000, |SOC| = 1
    let gap: f64 = 5000.0;
    let expected = 2.0 / constants.hbar_inv_cm_seconds * 1.0 * gamma
        / (gap * gap + gamma * gamma);
    assert!((rates[(1, 0)] - expected).abs() / expected < 1e-9);

    // every rate is finite and non-negative
    for k in 0..3 {
        for l in 0..2 {
            assert!(rates[(k, l)].is_finite());
            assert!(rates[(k, l)] >= 0.0);
        }
    }
}

#[test]
fn missing_sections_are_reported() {
    let no_soc = sample_output()
        .lines()
        .filter(|l| !l.contains("CALCULATED SOCME"))
        .collect::<Vec<_>>()
        .join("\n");
    let err = orca::socme_matrices(&no_soc, 2).unwrap_err();
    assert!(err.to_string().contains("SOCME"));

    let err = orca::excited_states("no spectrum here").unwrap_err();
    assert!(err.to_string().contains("ABSORPTION SPECTRUM"));

    let err = orca::number_of_roots("nothing").unwrap_err();
    assert!(err.to_string().contains("Number of roots"));
}

#[test]
fn truncated_socme_table_is_reported() {
    // drop the last data row of the second table
    let content = sample_output();
    let truncated = content.trim_end().rsplitn(2, '\n').nth(1).unwrap().to_string();
    let err = orca::socme_matrices(&truncated, 2).unwrap_err();
    assert!(err.to_string().contains("truncated"));
}

#[test]
fn single_socme_table_is_rejected() {
    let content = sample_output();
    let second = content.rfind("CALCULATED SOCME").unwrap();
    // cut the file at the second table's header text
    let one_table = &content[..second];
    let err = orca::socme_matrices(one_table, 2).unwrap_err();
    assert!(err.to_string().contains("only one SOCME table"));
}
