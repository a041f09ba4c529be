extern crate nyx_sgp4 as nyx;

use nyx::batch::{propagate_many, series_many};
use nyx::time::Unit;
use nyx::Tle;
use rstest::*;
use std::thread;

use crate::{ISS_LINE1, ISS_LINE2, REENTRY_LINE1, REENTRY_LINE2};

#[fixture]
fn catalog() -> Vec<Tle> {
    vec![
        Tle::new(ISS_LINE1, ISS_LINE2).unwrap(),
        Tle::new(
            "1 00005U 58002B   00179.78495062  .00000023  00000-0  28098-4 0  4753",
            "2 00005  34.2682 348.7242 1859667 331.7664  19.3264 10.82419157413667",
        )
        .unwrap(),
        Tle::new(
            "1 28626U 05008A   06176.46683397 -.00000205  00000-0  10000-3 0  2190",
            "2 28626   0.0019 286.9433 0000335  13.7918  55.6504  1.00270176  4891",
        )
        .unwrap(),
        Tle::new(REENTRY_LINE1, REENTRY_LINE2).unwrap(),
    ]
}

#[rstest]
fn one_tle_many_threads(catalog: Vec<Tle>) {
    // The geosynchronous set runs the resonance integrator
    for tle in &catalog[..3] {
        let serial: Vec<_> = (0..8)
            .map(|i| tle.propagate_by_minutes(180.0 * f64::from(i)).unwrap())
            .collect();

        let parallel: Vec<_> = thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|i| s.spawn(move || tle.propagate_by_minutes(180.0 * f64::from(i)).unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(serial, parallel);
    }
}

#[rstest]
fn many_satellites_at_once(catalog: Vec<Tle>) {
    // One hour after the epoch of the re-entering set, the others are propagated over years
    let epoch = catalog[3].epoch() + 1 * Unit::Hour;
    let states = propagate_many(&catalog, epoch);
    assert_eq!(states.len(), catalog.len());

    for (tle, rslt) in catalog.iter().zip(&states) {
        match rslt {
            Ok(state) => {
                assert_eq!(state.catalog_number, tle.catalog_number());
                assert_eq!(state, &tle.propagate_at(epoch).unwrap());
            }
            Err(e) => {
                // Only the sub-orbital set has re-entered by then
                assert!(e.has_decayed(), "{e}");
                assert_eq!(tle.catalog_number(), 28872);
            }
        }
    }
    assert_eq!(states.iter().filter(|rslt| rslt.is_err()).count(), 1);
}

#[rstest]
fn series_match_single_propagations(catalog: Vec<Tle>) {
    let start = catalog[2].epoch();
    let end = start + 3 * Unit::Day;
    let step = 6 * Unit::Hour;
    let all_series = series_many(&catalog[..3], start, end, step);

    for (tle, series) in catalog.iter().zip(all_series) {
        assert_eq!(series.len(), 12);
        for (i, rslt) in series.into_iter().enumerate() {
            let state = rslt.unwrap();
            let expected = tle.propagate_at(start + step * (i as i64)).unwrap();
            assert!((state.position_km - expected.position_km).norm() < 1e-6);
            assert!((state.velocity_km_s - expected.velocity_km_s).norm() < 1e-9);
        }
    }
}
