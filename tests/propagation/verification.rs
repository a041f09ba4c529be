extern crate nyx_sgp4 as nyx;

use nyx::Tle;
use rstest::*;
use serde_derive::Deserialize;

/// One line of the reference output: a state, or the error code at that time.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Expected {
    State {
        time: f64,
        position: [f64; 3],
        velocity: [f64; 3],
    },
    Error {
        time: f64,
        error: u8,
    },
}

#[derive(Debug, Deserialize)]
struct VerificationSet {
    line1: String,
    line2: String,
    states: Vec<Expected>,
}

#[derive(Deserialize)]
struct Catalog {
    list: Vec<VerificationSet>,
}

#[fixture]
fn catalog() -> Vec<VerificationSet> {
    toml::from_str::<Catalog>(include_str!("verification.toml"))
        .unwrap()
        .list
}

#[rstest]
fn afspc_verification(catalog: Vec<VerificationSet>) {
    assert_eq!(catalog.len(), 33);

    let mut failures = Vec::new();
    let mut checked = 0;
    for set in &catalog {
        let norad = &set.line1[2..7];
        let tle = match Tle::new(&set.line1, &set.line2) {
            Ok(tle) => tle,
            Err(e) => {
                // Only a set which already fails at its epoch may not initialize
                match set.states.as_slice() {
                    [Expected::Error { time, error }] if *time == 0.0 && e.code() == Some(*error) => {
                        checked += 1
                    }
                    _ => failures.push(format!("#{norad} initialization: {e}")),
                }
                continue;
            }
        };

        for expected in &set.states {
            checked += 1;
            match (expected, tle.propagate_by_minutes(expected.time())) {
                (
                    Expected::State {
                        time,
                        position,
                        velocity,
                    },
                    Ok(state),
                ) => {
                    let dr = (0..3)
                        .map(|i| (state.position_km[i] - position[i]).abs())
                        .fold(0.0, f64::max);
                    let dv = (0..3)
                        .map(|i| (state.velocity_km_s[i] - velocity[i]).abs())
                        .fold(0.0, f64::max);
                    if dr > 1e-6 || dv > 1e-8 {
                        failures.push(format!("#{norad} @ {time} min: dr = {dr:e} km, dv = {dv:e} km/s"));
                    }
                }
                (Expected::Error { error, .. }, Err(e)) if e.code() == Some(*error) => {}
                (expected, rslt) => {
                    failures.push(format!("#{norad}: expected {expected:?}, got {rslt:?}"))
                }
            }
        }
    }

    println!("checked {checked} states");
    assert!(checked > 600);
    assert!(
        failures.is_empty(),
        "{} mismatches:\n{}",
        failures.len(),
        failures.join("\n")
    );
}

impl Expected {
    fn time(&self) -> f64 {
        match self {
            Self::State { time, .. } | Self::Error { time, .. } => *time,
        }
    }
}
