extern crate nyx_sgp4 as nyx;

use approx::assert_abs_diff_eq;
use nyx::io::{ConfigRepr, TleReader};
use nyx::time::Epoch;
use nyx::tle::{parser, ParseDiagnostic};
use nyx::{Sgp4Config, Tle, TleError};
use rstest::*;

use crate::{init_logger, ISS_LINE1, ISS_LINE2};

#[rstest]
#[case(ISS_LINE1, ISS_LINE2)]
#[case(
    "1 00005U 58002B   00179.78495062  .00000023  00000-0  28098-4 0  4753",
    "2 00005  34.2682 348.7242 1859667 331.7664  19.3264 10.82419157413667"
)]
#[case(
    "1 28626U 05008A   06176.46683397 -.00000205  00000-0  10000-3 0  2190",
    "2 28626   0.0019 286.9433 0000335  13.7918  55.6504  1.00270176  4891"
)]
fn lines_round_trip(#[case] line1: &str, #[case] line2: &str) {
    let tle = Tle::new(&format!("{line1}  \r\n"), &format!("{line2}\n")).unwrap();
    assert_eq!(tle.lines(), (line1, line2));
    assert!(tle.diagnostics().is_empty(), "{:?}", tle.diagnostics());

    // Parsing the emitted lines again gives the same values
    let (again1, again2) = tle.lines();
    assert!(Tle::new(again1, again2).unwrap().equal_values(&tle));
}

#[test]
fn iss_mean_elements() {
    let tle = Tle::new(ISS_LINE1, ISS_LINE2).unwrap();
    assert_eq!(tle.catalog_number(), 25544);

    let mean = tle.mean_elements();
    assert_eq!(mean.classification, 'U');
    assert_eq!(mean.international_designator, "98067A");
    assert_eq!(mean.epoch_year, 2020);
    assert_abs_diff_eq!(mean.bstar, 2.7992e-5, epsilon = 1e-15);
    assert_abs_diff_eq!(mean.mean_motion_dot, 1.103e-5, epsilon = 1e-15);
    assert_eq!(mean.mean_motion_ddot, 0.0);
    assert_eq!(mean.element_set_number, 999);
    assert_eq!(mean.revolution_number, 25993);

    let elements = tle.elements();
    assert_abs_diff_eq!(elements.inclination_deg, 51.6443, epsilon = 1e-12);
    assert_abs_diff_eq!(elements.raan_deg, 177.357, epsilon = 1e-12);
    assert_abs_diff_eq!(elements.eccentricity, 1.731e-4, epsilon = 1e-15);
    assert_abs_diff_eq!(elements.arg_perigee_deg, 128.2351, epsilon = 1e-12);
    assert_abs_diff_eq!(elements.mean_anomaly_deg, 43.6939, epsilon = 1e-12);
    assert_abs_diff_eq!(elements.mean_motion_rev_day, 15.49184106, epsilon = 1e-12);

    // Day 349.28181795 of 2020 is December 14th, around 06:45:49 UTC
    let expected = Epoch::from_gregorian_utc(2020, 12, 14, 6, 45, 49, 70_880_000);
    assert!((tle.epoch() - expected).abs().to_seconds() < 1e-3);
}

#[test]
fn permissive_and_strict() {
    init_logger();
    // Last digit of the first line altered: the checksum no longer matches
    let bad_line1 = "1 25544U 98067A   20349.28181795  .00001103  00000-0  27992-4 0  9990";

    let tle = Tle::new(bad_line1, ISS_LINE2).unwrap();
    assert_eq!(
        tle.diagnostics(),
        &[ParseDiagnostic::ChecksumMismatch {
            line: 1,
            computed: 7,
            found: '0'
        }]
    );

    let strict = Sgp4Config::builder().strict(true).build();
    match Tle::with_config(bad_line1, ISS_LINE2, strict) {
        Err(TleError::MalformedLines { diagnostics }) => assert_eq!(diagnostics.len(), 1),
        other => panic!("expected malformed lines, got {other:?}"),
    }
    assert!(Tle::with_config(ISS_LINE1, ISS_LINE2, strict).is_ok());
}

#[test]
fn mismatched_catalog_numbers() {
    let line2 = "2 25545  51.6443 177.3570 0001731 128.2351  43.6939 15.49184106259931";
    let (elements, diagnostics) = parser::parse(ISS_LINE1, line2);
    assert_eq!(elements.catalog_number, 25544);
    assert!(diagnostics.contains(&ParseDiagnostic::CatalogMismatch {
        line1: 25544,
        line2: 25545
    }));
}

#[test]
fn yaml_configuration() {
    let cfg = Sgp4Config::loads("strict: true\n").unwrap();
    assert!(cfg.strict);
    assert_eq!(cfg.gravity, Sgp4Config::default().gravity);

    let back = Sgp4Config::loads(&serde_yaml::to_string(&cfg).unwrap()).unwrap();
    assert_eq!(back, cfg);
}

#[test]
fn catalog_stream() {
    let catalog = format!(
        "ISS (ZARYA)\n{ISS_LINE1}\n{ISS_LINE2}\n\n\
         1 00005U 58002B   00179.78495062  .00000023  00000-0  28098-4 0  4753\n\
         2 00005  34.2682 348.7242 1859667 331.7664  19.3264 10.82419157413667\n"
    );

    let tles = TleReader::new(catalog.as_bytes())
        .map(|raw| raw.unwrap().to_tle(Sgp4Config::default()).unwrap())
        .collect::<Vec<_>>();

    assert_eq!(tles.len(), 2);
    assert_eq!(tles[0].name(), Some("ISS (ZARYA)"));
    assert_eq!(tles[1].name(), None);
    assert_eq!(tles[1].catalog_number(), 5);
}
