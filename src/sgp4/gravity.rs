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

/// Earth gravity model used to derive the SGP4 constants.
///
/// Element sets distributed by the space-surveillance networks are generated with WGS-72,
/// which is why it is the default. The other models are only useful for comparisons.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GravityModel {
    /// WGS-72 with the historical (truncated) value of `xke`.
    Wgs72Old,
    #[default]
    Wgs72,
    Wgs84,
}

impl fmt::Display for GravityModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wgs72Old => write!(f, "WGS-72 (old)"),
            Self::Wgs72 => write!(f, "WGS-72"),
            Self::Wgs84 => write!(f, "WGS-84"),
        }
    }
}

/// Geopotential constants in canonical SGP4 units: distances in Earth radii and time in minutes.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GravityConstants {
    /// Gravitational parameter, km^3/s^2
    pub mu_km3_s2: f64,
    /// Equatorial radius of the Earth, km
    pub radius_km: f64,
    /// sqrt(mu) in Earth radii^1.5 per minute
    pub xke: f64,
    /// Minutes in one canonical time unit
    pub tumin: f64,
    pub j2: f64,
    pub j3: f64,
    pub j4: f64,
    pub j3oj2: f64,
}

impl GravityConstants {
    /// Velocity of one Earth radius per canonical time unit, in km/s.
    pub fn vkmpersec(&self) -> f64 {
        self.radius_km * self.xke / 60.0
    }
}

impl From<GravityModel> for GravityConstants {
    fn from(model: GravityModel) -> Self {
        let (mu_km3_s2, radius_km, xke, j2, j3, j4) = match model {
            GravityModel::Wgs72Old => (
                398_600.799_64,
                6378.135,
                0.074_366_916_1,
                0.001_082_616,
                -0.000_002_538_81,
                -0.000_001_655_97,
            ),
            GravityModel::Wgs72 => {
                let (mu, radius): (f64, f64) = (398_600.8, 6378.135);
                (
                    mu,
                    radius,
                    60.0 / (radius * radius * radius / mu).sqrt(),
                    0.001_082_616,
                    -0.000_002_538_81,
                    -0.000_001_655_97,
                )
            }
            GravityModel::Wgs84 => {
                let (mu, radius): (f64, f64) = (398_600.5, 6378.137);
                (
                    mu,
                    radius,
                    60.0 / (radius * radius * radius / mu).sqrt(),
                    0.001_082_629_989_05,
                    -0.000_002_532_153_06,
                    -0.000_001_610_987_61,
                )
            }
        };

        Self {
            mu_km3_s2,
            radius_km,
            xke,
            tumin: 1.0 / xke,
            j2,
            j3,
            j4,
            j3oj2: j3 / j2,
        }
    }
}
