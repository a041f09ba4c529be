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

use serde_derive::{Deserialize, Serialize};
use std::fmt;
use typed_builder::TypedBuilder;

use crate::sgp4::JD_1950;
use crate::time::{Epoch, Unit};

/// The mean elements of one two-line element set, in the units of the published format.
///
/// Angles are in degrees and the mean motion in revolutions per day. The drag terms keep the
/// scaling of the text format: the first derivative of the mean motion is divided by two and the
/// second one by six.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MeanElements {
    pub catalog_number: u32,
    /// One of `U` (unclassified), `C` or `S`
    pub classification: char,
    pub international_designator: String,
    /// Four digit year of the epoch
    pub epoch_year: i32,
    /// Fractional day of the year of the epoch, where 1.0 is January first at midnight UTC
    pub epoch_day: f64,
    pub mean_motion_dot: f64,
    pub mean_motion_ddot: f64,
    /// Drag term, in inverse Earth radii
    pub bstar: f64,
    pub ephemeris_type: u8,
    pub element_set_number: u32,
    pub inclination_deg: f64,
    pub raan_deg: f64,
    pub eccentricity: f64,
    pub arg_perigee_deg: f64,
    pub mean_anomaly_deg: f64,
    pub mean_motion_rev_day: f64,
    pub revolution_number: u32,
}

impl MeanElements {
    /// Returns the epoch of these elements, in UTC.
    pub fn epoch(&self) -> Epoch {
        // Days of year count UTC days, without the leap seconds inserted since January 1st
        let start_of_year = Epoch::from_gregorian_utc_at_midnight(self.epoch_year, 1, 1);
        Epoch::from_utc_duration(start_of_year.to_utc_duration() + Unit::Day * (self.epoch_day - 1.0))
    }

    /// Sets the epoch year and day of year from the provided epoch.
    pub fn set_epoch(&mut self, epoch: Epoch) {
        let (year, _, _, _, _, _, _) = epoch.to_gregorian_utc();
        self.epoch_year = year;
        let start_of_year = Epoch::from_gregorian_utc_at_midnight(year, 1, 1);
        self.epoch_day =
            (epoch.to_utc_duration() - start_of_year.to_utc_duration()).to_unit(Unit::Day) + 1.0;
    }

    /// Julian days of the epoch since 1949 December 31 00:00 UT, computed from the raw year and day of year.
    pub(crate) fn days_since_1950(&self) -> f64 {
        let year = f64::from(self.epoch_year);
        // Julian date of January 1st at midnight minus one day, folded with the day of year
        let jd = 367.0 * year - (7.0 * year * 0.25).floor() + 30.0 + 1_721_013.5;
        jd + self.epoch_day - JD_1950
    }

    /// Returns the orbital elements of this set.
    pub fn elements(&self) -> Elements {
        Elements {
            eccentricity: self.eccentricity,
            arg_perigee_deg: self.arg_perigee_deg,
            inclination_deg: self.inclination_deg,
            mean_anomaly_deg: self.mean_anomaly_deg,
            mean_motion_rev_day: self.mean_motion_rev_day,
            raan_deg: self.raan_deg,
        }
    }

    /// Returns true if all of the propagated values are bitwise equal.
    ///
    /// The catalog metadata (number, classification, designator) is not compared.
    pub fn equal_values(&self, other: &Self) -> bool {
        self.epoch_year == other.epoch_year
            && self.epoch_day == other.epoch_day
            && self.mean_motion_dot == other.mean_motion_dot
            && self.mean_motion_ddot == other.mean_motion_ddot
            && self.bstar == other.bstar
            && self.element_set_number == other.element_set_number
            && self.inclination_deg == other.inclination_deg
            && self.raan_deg == other.raan_deg
            && self.eccentricity == other.eccentricity
            && self.arg_perigee_deg == other.arg_perigee_deg
            && self.mean_anomaly_deg == other.mean_anomaly_deg
            && self.mean_motion_rev_day == other.mean_motion_rev_day
            && self.revolution_number == other.revolution_number
    }

    /// Replaces every value set in the override.
    pub(crate) fn apply(&mut self, change: &ElementOverride) {
        if let Some(epoch) = change.epoch {
            self.set_epoch(epoch);
        }
        let fields = [
            (change.mean_motion_dot, &mut self.mean_motion_dot),
            (change.mean_motion_ddot, &mut self.mean_motion_ddot),
            (change.bstar, &mut self.bstar),
            (change.inclination_deg, &mut self.inclination_deg),
            (change.raan_deg, &mut self.raan_deg),
            (change.eccentricity, &mut self.eccentricity),
            (change.arg_perigee_deg, &mut self.arg_perigee_deg),
            (change.mean_anomaly_deg, &mut self.mean_anomaly_deg),
            (change.mean_motion_rev_day, &mut self.mean_motion_rev_day),
        ];
        for (value, field) in fields {
            if let Some(value) = value {
                *field = value;
            }
        }
        if let Some(revs) = change.revolution_number {
            self.revolution_number = revs;
        }
    }
}

impl fmt::Display for MeanElements {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} @ {}: inc = {} deg, raan = {} deg, ecc = {}, aop = {} deg, ma = {} deg, n = {} rev/day, B* = {}",
            self.catalog_number,
            self.epoch(),
            self.inclination_deg,
            self.raan_deg,
            self.eccentricity,
            self.arg_perigee_deg,
            self.mean_anomaly_deg,
            self.mean_motion_rev_day,
            self.bstar
        )
    }
}

/// The Keplerian-like mean elements of a set, angles in degrees.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Elements {
    pub eccentricity: f64,
    pub arg_perigee_deg: f64,
    pub inclination_deg: f64,
    pub mean_anomaly_deg: f64,
    pub mean_motion_rev_day: f64,
    pub raan_deg: f64,
}

/// Higher precision values to replace in an element set, see [`crate::Tle::override_elements`].
///
/// Only the values which are set are replaced, so any of them may be set to zero.
#[derive(Clone, Debug, Default, PartialEq, TypedBuilder)]
#[builder(doc)]
pub struct ElementOverride {
    #[builder(default, setter(strip_option))]
    pub epoch: Option<Epoch>,
    #[builder(default, setter(strip_option))]
    pub mean_motion_dot: Option<f64>,
    #[builder(default, setter(strip_option))]
    pub mean_motion_ddot: Option<f64>,
    #[builder(default, setter(strip_option))]
    pub bstar: Option<f64>,
    #[builder(default, setter(strip_option))]
    pub inclination_deg: Option<f64>,
    #[builder(default, setter(strip_option))]
    pub raan_deg: Option<f64>,
    #[builder(default, setter(strip_option))]
    pub eccentricity: Option<f64>,
    #[builder(default, setter(strip_option))]
    pub arg_perigee_deg: Option<f64>,
    #[builder(default, setter(strip_option))]
    pub mean_anomaly_deg: Option<f64>,
    #[builder(default, setter(strip_option))]
    pub mean_motion_rev_day: Option<f64>,
    #[builder(default, setter(strip_option))]
    pub revolution_number: Option<u32>,
}
