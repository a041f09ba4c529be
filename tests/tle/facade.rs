extern crate nyx_sgp4 as nyx;

use approx::assert_abs_diff_eq;
use nyx::time::Unit;
use nyx::tle::ElementOverride;
use nyx::{Tle, TleError};
use rstest::*;

use crate::{ISS_LINE1, ISS_LINE2};

#[fixture]
fn iss() -> Tle {
    Tle::new(ISS_LINE1, ISS_LINE2).unwrap()
}

#[rstest]
fn equal_values(iss: Tle) {
    assert!(iss.equal_values(&Tle::new(ISS_LINE1, ISS_LINE2).unwrap()));

    // Epoch incremented by one unit of its last digit
    let later = Tle::new(
        "1 25544U 98067A   20349.28181796  .00001103  00000-0  27992-4 0  9998",
        ISS_LINE2,
    )
    .unwrap();
    assert!(!iss.equal_values(&later));
    assert!(!later.equal_values(&iss));

    let mut shifted = iss.clone();
    shifted
        .override_elements(&ElementOverride::builder().raan_deg(177.3571).build())
        .unwrap();
    assert!(!iss.equal_values(&shifted));
}

#[rstest]
fn override_initializes_again(iss: Tle) {
    let before = iss.propagate_by_minutes(0.0).unwrap();

    let mut tle = iss.clone();
    tle.override_elements(
        &ElementOverride::builder()
            .mean_anomaly_deg(43.6939 + 180.0)
            .eccentricity(0.0)
            .build(),
    )
    .unwrap();

    // A true zero is set, and the untouched values are kept
    assert_eq!(tle.elements().eccentricity, 0.0);
    assert_eq!(tle.elements().inclination_deg, iss.elements().inclination_deg);
    assert_eq!(tle.lines(), iss.lines());

    // Half an orbit away from the original position
    let after = tle.propagate_by_minutes(0.0).unwrap();
    assert!((after.position_km + before.position_km).norm() < 100.0);

    // Moving the epoch moves the propagation origin with it
    let mut moved = iss.clone();
    moved
        .override_elements(
            &ElementOverride::builder()
                .epoch(iss.epoch() + 1 * Unit::Hour)
                .build(),
        )
        .unwrap();
    assert_abs_diff_eq!(
        (moved.epoch() - iss.epoch()).to_unit(Unit::Minute),
        60.0,
        epsilon = 1e-6
    );
    let at_new_epoch = moved.propagate_at(moved.epoch()).unwrap();
    assert!((at_new_epoch.position_km - before.position_km).norm() < 1e-6);
}

#[rstest]
fn failed_override_is_reported(iss: Tle) {
    let mut tle = iss.clone();
    let err = tle
        .override_elements(&ElementOverride::builder().eccentricity(1.5).build())
        .unwrap_err();
    assert_eq!(err.code(), Some(1));
    assert!(tle.equal_values(&iss));
    assert!(tle.propagate_by_minutes(10.0).is_ok());
}

#[rstest]
fn semi_major_axis(iss: Tle) {
    let altitude_km = iss.semi_major_axis_m() / 1e3 - 6371.0;
    assert!((altitude_km - 408.0).abs() < 20.0, "{altitude_km}");

    // Close to, but not the same as, the value of the initializer
    let sgp4_km = iss.sgp4().semi_major_axis_km();
    assert!((iss.semi_major_axis_m() / 1e3 - sgp4_km).abs() < 15.0);
}

#[rstest]
#[case::too_low(
    ISS_LINE1,
    "2 25544  51.6443 177.3570 0001731 128.2351  43.6939 19.00000000259931",
    1
)]
#[case::no_mean_motion(
    ISS_LINE1,
    "2 25544  51.6443 177.3570 0001731 128.2351  43.6939  0.00000000259931",
    2
)]
#[case::diverging_eccentricity(
    "1 33334U 78066F   06174.85818871  .00000620  00000-0  10000-3 0  6806",
    "2 33334  68.4714 236.1303 5602877 123.7484 302.5767  0.00001000 67521",
    3
)]
#[case::below_surface_at_epoch(
    ISS_LINE1,
    "2 25544  51.6443 177.3570 0001731 128.2351  43.6939 17.50000000259934",
    5
)]
fn initialization_errors(#[case] line1: &str, #[case] line2: &str, #[case] code: u8) {
    match Tle::new(line1, line2) {
        Err(err @ TleError::Initialization { .. }) => {
            assert_eq!(err.code(), Some(code), "{err}");
            assert!(!err.has_decayed());
        }
        other => panic!("expected code {code}, got {other:?}"),
    }
}

#[test]
fn malformed_lines_have_no_code() {
    let err = Tle::with_config(
        "1 25544U",
        ISS_LINE2,
        nyx::Sgp4Config::builder().strict(true).build(),
    )
    .unwrap_err();
    assert_eq!(err.code(), None);
    assert!(err.sgp4_error().is_none());
}
