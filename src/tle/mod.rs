/*
    Nyx, blazing fast astrodynamics
    Copyright (C) 2018-onwards Christopher Rabotin <christopher.rabotin@gmail.com>

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU Affero General Public License as published
    by the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU Affero General Public License for more details.

    You should have received a copy of the GNU Affero General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/

use snafu::prelude::*;
use std::f64::consts::TAU;
use std::fmt;

use crate::cosmic::Ephemeris;
use crate::errors::{InitializationSnafu, MalformedLinesSnafu, PropagationSnafu};
use crate::sgp4::{ResonanceState, Sgp4, Sgp4Config};
use crate::time::{Epoch, Unit};
use crate::TleError;

mod elements;
pub mod parser;

pub use self::elements::{ElementOverride, Elements, MeanElements};
pub use self::parser::ParseDiagnostic;

/// Gravitational parameter of the Earth used for the semi-major axis, m^3/s^2
const EARTH_MU_M3_S2: f64 = 3.986_004_418e14;
const SECONDS_PER_DAY: f64 = 86_400.0;

/// Minutes from `from` to `to` counted in UTC, so that a leap second in between does not shift the propagation.
pub(crate) fn utc_minutes_between(from: Epoch, to: Epoch) -> f64 {
    (to.to_utc_duration() - from.to_utc_duration()).to_unit(Unit::Minute)
}

/// A two-line element set, ready to be propagated.
///
/// The SGP4 record is initialized once at construction and is then only read, so the same `Tle`
/// may be propagated from several threads at once.
#[derive(Clone, Debug)]
pub struct Tle {
    name: Option<String>,
    line1: String,
    line2: String,
    elements: MeanElements,
    epoch: Epoch,
    diagnostics: Vec<ParseDiagnostic>,
    config: Sgp4Config,
    sgp4: Sgp4,
}

impl Tle {
    /// Parses and initializes an element set from its two lines, with the default configuration.
    pub fn new(line1: &str, line2: &str) -> Result<Self, TleError> {
        Self::with_config(line1, line2, Sgp4Config::default())
    }

    /// Parses and initializes an element set from its two lines.
    ///
    /// Parsing is permissive unless the configuration is strict: see [`Tle::diagnostics`].
    pub fn with_config(line1: &str, line2: &str, config: Sgp4Config) -> Result<Self, TleError> {
        let line1 = line1.trim_end();
        let line2 = line2.trim_end();
        let (elements, diagnostics) = parser::parse(line1, line2);

        ensure!(
            !config.strict || diagnostics.is_empty(),
            MalformedLinesSnafu { diagnostics }
        );

        let sgp4 = Sgp4::new(&elements, &config).context(InitializationSnafu {
            catalog_number: elements.catalog_number,
        })?;

        Ok(Self {
            name: None,
            line1: line1.to_string(),
            line2: line2.to_string(),
            epoch: elements.epoch(),
            elements,
            diagnostics,
            config,
            sgp4,
        })
    }

    /// Sets the name of this object, usually read from the line preceding the element set.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Propagates to the provided epoch.
    pub fn propagate_at(&self, epoch: Epoch) -> Result<Ephemeris, TleError> {
        let minutes = utc_minutes_between(self.epoch, epoch);
        self.ephemeris_with(&mut ResonanceState::default(), epoch, minutes)
    }

    /// Propagates by a number of minutes from the epoch of the elements, negative to propagate backward.
    pub fn propagate_by_minutes(&self, minutes: f64) -> Result<Ephemeris, TleError> {
        let epoch = Epoch::from_utc_duration(self.epoch.to_utc_duration() + Unit::Minute * minutes);
        self.ephemeris_with(&mut ResonanceState::default(), epoch, minutes)
    }

    pub(crate) fn ephemeris_with(
        &self,
        scratch: &mut ResonanceState,
        epoch: Epoch,
        minutes: f64,
    ) -> Result<Ephemeris, TleError> {
        let state = self
            .sgp4
            .propagate_with(scratch, minutes)
            .context(PropagationSnafu {
                catalog_number: self.catalog_number(),
                minutes,
            })?;

        Ok(Ephemeris {
            catalog_number: self.catalog_number(),
            epoch,
            position_km: state.position_km,
            velocity_km_s: state.velocity_km_s,
        })
    }

    /// Replaces the values set in the override and initializes the propagator again.
    ///
    /// If the new elements cannot be initialized, the error is returned and this element set is unchanged.
    /// The lines are not updated: [`Tle::lines`] still returns the text this set was parsed from.
    pub fn override_elements(&mut self, change: &ElementOverride) -> Result<(), TleError> {
        let mut elements = self.elements.clone();
        elements.apply(change);

        let sgp4 = Sgp4::new(&elements, &self.config).context(InitializationSnafu {
            catalog_number: elements.catalog_number,
        })?;

        debug!("overrode #{} with {change:?}", elements.catalog_number);
        self.epoch = elements.epoch();
        self.elements = elements;
        self.sgp4 = sgp4;
        Ok(())
    }

    pub fn elements(&self) -> Elements {
        self.elements.elements()
    }

    /// Returns the complete mean element set, including the catalog data and drag terms.
    pub fn mean_elements(&self) -> &MeanElements {
        &self.elements
    }

    /// Returns both lines as they were parsed, without their trailing whitespace.
    pub fn lines(&self) -> (&str, &str) {
        (&self.line1, &self.line2)
    }

    pub fn catalog_number(&self) -> u32 {
        self.elements.catalog_number
    }

    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    /// Returns true if the epoch, drag terms, element set number, elements and revolution number are all equal.
    pub fn equal_values(&self, other: &Self) -> bool {
        self.elements.equal_values(&other.elements)
    }

    /// Semi-major axis from the mean motion of the lines through Kepler's third law, in meters.
    ///
    /// This ignores the J2 correction applied by the propagator, so it differs slightly from [`Sgp4::semi_major_axis_km`].
    pub fn semi_major_axis_m(&self) -> f64 {
        let mean_motion_rad_s = self.elements.mean_motion_rev_day * TAU / SECONDS_PER_DAY;
        EARTH_MU_M3_S2.powf(1.0 / 3.0) / mean_motion_rad_s.powf(2.0 / 3.0)
    }

    /// Problems found while parsing the lines, empty for well formed lines.
    pub fn diagnostics(&self) -> &[ParseDiagnostic] {
        &self.diagnostics
    }

    pub fn config(&self) -> Sgp4Config {
        self.config
    }

    /// The initialized SGP4 record of these elements.
    pub fn sgp4(&self) -> &Sgp4 {
        &self.sgp4
    }
}

impl fmt::Display for Tle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            writeln!(f, "{name}")?;
        }
        write!(f, "{}\n{}", self.line1, self.line2)
    }
}

#[cfg(test)]
mod ut_tle {
    use super::*;
    use crate::sgp4::Sgp4Error;

    const ISS_1: &str = "1 25544U 98067A   20349.28181795  .00001103  00000-0  27992-4 0  9997";
    const ISS_2: &str = "2 25544  51.6443 177.3570 0001731 128.2351  43.6939 15.49184106259930";

    #[test]
    fn send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Tle>();
    }

    #[test]
    fn strict_rejects_diagnostics() {
        let bad_checksum = ISS_2.replace("259930", "259939");
        let lenient = Tle::new(ISS_1, &bad_checksum).unwrap();
        assert_eq!(lenient.diagnostics().len(), 1);

        let strict = Sgp4Config::builder().strict(true).build();
        let err = Tle::with_config(ISS_1, &bad_checksum, strict).unwrap_err();
        assert!(matches!(err, TleError::MalformedLines { .. }));
        assert_eq!(err.code(), None);
        assert!(Tle::with_config(ISS_1, ISS_2, strict).is_ok());
    }

    #[test]
    fn failed_override_leaves_set_unchanged() {
        let mut tle = Tle::new(ISS_1, ISS_2).unwrap();
        let before = tle.mean_elements().clone();
        let err = tle
            .override_elements(&ElementOverride::builder().eccentricity(1.5).build())
            .unwrap_err();
        assert_eq!(
            err.sgp4_error().map(Sgp4Error::code),
            Some(1),
            "unexpected {err}"
        );
        assert_eq!(tle.mean_elements(), &before);
    }

    #[test]
    fn epoch_after_leap_second() {
        // A leap second was inserted at the end of 2015 June 30th
        let tle = Tle::new(
            "1 25544U 98067A   15200.00000000  .00001103  00000-0  27992-4 0  9996",
            ISS_2,
        )
        .unwrap();
        let midnight = Epoch::from_gregorian_utc_at_midnight(2015, 7, 19);
        assert_eq!(tle.epoch(), midnight);
        assert_eq!(tle.mean_elements().epoch_day, 200.0);

        assert_eq!(
            tle.propagate_at(midnight).unwrap().position_km,
            tle.propagate_by_minutes(0.0).unwrap().position_km
        );

        // Across the leap second, an hour of UTC is still sixty minutes of propagation
        let later = tle.propagate_by_minutes(-20.0 * 1440.0).unwrap();
        let start = Epoch::from_gregorian_utc_at_midnight(2015, 6, 29);
        assert_eq!(later.epoch, start);
        assert_eq!(utc_minutes_between(start, tle.epoch()), 20.0 * 1440.0);
    }

    #[test]
    fn display_lines() {
        let tle = Tle::new(&format!("{ISS_1}   "), ISS_2)
            .unwrap()
            .with_name("ISS (ZARYA)");
        assert_eq!(tle.to_string(), format!("ISS (ZARYA)\n{ISS_1}\n{ISS_2}"));
    }
}
