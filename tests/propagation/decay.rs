extern crate nyx_sgp4 as nyx;

use nyx::time::Unit;
use nyx::{has_decayed, Sgp4Error, Tle, TleError};
use rstest::*;
use std::error::Error;

use crate::{init_logger, REENTRY_LINE1, REENTRY_LINE2};

#[fixture]
fn reentry() -> Tle {
    Tle::new(REENTRY_LINE1, REENTRY_LINE2).unwrap()
}

#[rstest]
#[case(-1440.0)]
#[case(0.0)]
#[case(25.0)]
#[case(50.0)]
fn before_reentry(reentry: Tle, #[case] minutes: f64) {
    assert!(reentry.propagate_by_minutes(minutes).is_ok());
}

#[rstest]
#[case(55.0)]
#[case(60.0)]
#[case(150.0)]
fn after_reentry(reentry: Tle, #[case] minutes: f64) {
    let err = reentry.propagate_by_minutes(minutes).unwrap_err();
    assert!(err.has_decayed(), "{err}");
    assert_eq!(err.code(), Some(6));
    match err {
        TleError::Propagation {
            catalog_number,
            minutes: at,
            source: Sgp4Error::Decayed { radius_er, .. },
        } => {
            assert_eq!(catalog_number, 28872);
            assert_eq!(at, minutes);
            assert!(radius_er < 1.0);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[rstest]
fn series_end_at_reentry(reentry: Tle) {
    init_logger();
    // The radius computed by the model rises above the surface again between the last revolutions,
    // but a series never goes past its first decay.
    assert!(reentry.propagate_by_minutes(100.0).is_ok());

    let start = reentry.epoch();
    let series: Vec<_> = reentry
        .ephemerides(start, start + 4 * Unit::Hour, 5 * Unit::Minute)
        .collect();
    assert_eq!(series.len(), 12);

    let (last, valid) = series.split_last().unwrap();
    assert!(valid.iter().all(|rslt| rslt.is_ok()));
    let err = last.as_ref().unwrap_err();
    assert!(err.has_decayed(), "{err}");
    assert!(matches!(
        err,
        TleError::Propagation { minutes, .. } if (minutes - 55.0).abs() < 1e-6
    ));
}

#[rstest]
fn decay_through_a_boxed_error(reentry: Tle) {
    let boxed: Box<dyn Error> = Box::new(reentry.propagate_by_minutes(60.0).unwrap_err());
    assert!(has_decayed(boxed.as_ref()));

    let not_decayed: Box<dyn Error> = Box::new(
        Tle::new(
            REENTRY_LINE1,
            "2 28872  96.4736 157.9986 0303955 244.0492 110.6523  0.00000000 10705",
        )
        .unwrap_err(),
    );
    assert!(!has_decayed(not_decayed.as_ref()));
}
