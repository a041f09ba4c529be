extern crate nyx_sgp4 as nyx;

use nyx::linalg::Vector3;
use nyx::time::{Epoch, Unit};
use nyx::Tle;
use rstest::*;

use crate::{init_logger, ISS_LINE1, ISS_LINE2};

#[fixture]
fn iss() -> Tle {
    Tle::new(ISS_LINE1, ISS_LINE2).unwrap()
}

#[rstest]
fn iss_at_noon(iss: Tle) {
    init_logger();
    let noon = Epoch::from_gregorian_utc_hms(2020, 12, 12, 12, 0, 0);
    let state = iss.propagate_at(noon).unwrap();
    println!("{state}");

    assert_eq!(state.catalog_number, 25544);
    assert_eq!(state.epoch, noon);

    let r_err = state.position_km - Vector3::new(-4522.507, 2857.518, -4201.949);
    let v_err = state.velocity_km_s - Vector3::new(-5.6779, -3.5549, 3.6968);
    assert!(r_err.amax() < 2e-2, "position error {r_err}");
    assert!(v_err.amax() < 1e-4, "velocity error {v_err}");
}

#[rstest]
fn deterministic(iss: Tle) {
    for minutes in [-720.0, 0.0, 45.5, 1440.0] {
        assert_eq!(
            iss.propagate_by_minutes(minutes).unwrap(),
            iss.propagate_by_minutes(minutes).unwrap()
        );
    }
}

#[rstest]
fn minutes_and_epochs_agree(iss: Tle) {
    for minutes in [-1440.0, -3.25, 0.0, 17.0, 90.0, 2880.5] {
        let by_minutes = iss.propagate_by_minutes(minutes).unwrap();
        let at_epoch = iss.propagate_at(iss.epoch() + minutes * Unit::Minute).unwrap();
        assert!((by_minutes.position_km - at_epoch.position_km).norm() < 1e-6);
        assert!((by_minutes.velocity_km_s - at_epoch.velocity_km_s).norm() < 1e-9);
    }
}

#[rstest]
fn iss_ground_track(iss: Tle) {
    let mut max_lat_deg: f64 = 0.0;
    for state in iss.ephemerides(iss.epoch(), iss.epoch() + 1 * Unit::Day, 5 * Unit::Minute) {
        let lla = state.unwrap().to_geodetic();
        assert!(
            (380.0..450.0).contains(&lla.altitude_km),
            "altitude of {lla}"
        );
        assert!((-180.0..180.0).contains(&lla.longitude_deg), "{lla}");
        max_lat_deg = max_lat_deg.max(lla.latitude_deg.abs());
    }
    // The ground track reaches up to the inclination
    assert!(max_lat_deg > 48.0 && max_lat_deg < 52.0, "{max_lat_deg}");
}
