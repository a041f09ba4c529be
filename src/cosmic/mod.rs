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

use crate::io::{epoch_from_str, epoch_to_str};
use crate::linalg::Vector3;
use crate::time::Epoch;

/// Sidereal time and the conversion of propagated positions into geodetic coordinates.
pub mod geodetic;
pub use self::geodetic::Geodetic;

/// The state of a satellite at one epoch, in the TEME frame.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ephemeris {
    #[serde(rename = "norad")]
    pub catalog_number: u32,
    #[serde(serialize_with = "epoch_to_str", deserialize_with = "epoch_from_str")]
    pub epoch: Epoch,
    pub position_km: Vector3<f64>,
    pub velocity_km_s: Vector3<f64>,
}

impl Ephemeris {
    pub fn radius_km(&self) -> f64 {
        self.position_km.norm()
    }

    pub fn speed_km_s(&self) -> f64 {
        self.velocity_km_s.norm()
    }

    /// Latitude, longitude and altitude of this state on the WGS-84 ellipsoid.
    pub fn to_geodetic(&self) -> Geodetic {
        geodetic::teme_to_geodetic(&self.position_km, self.epoch)
    }
}

impl fmt::Display for Ephemeris {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} @ {}: position = [{:.6}, {:.6}, {:.6}] km\tvelocity = [{:.9}, {:.9}, {:.9}] km/s",
            self.catalog_number,
            self.epoch,
            self.position_km[0],
            self.position_km[1],
            self.position_km[2],
            self.velocity_km_s[0],
            self.velocity_km_s[1],
            self.velocity_km_s[2]
        )
    }
}
