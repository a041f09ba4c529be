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
use std::f64::consts::{PI, TAU};
use std::fmt;

use crate::linalg::{Matrix3, Vector3};
use crate::time::Epoch;

/// WGS-84 equatorial radius, km
pub const WGS84_RADIUS_KM: f64 = 6378.137;
/// WGS-84 flattening
pub const WGS84_FLATTENING: f64 = 1.0 / 298.257_223_563;

const J2000_JD: f64 = 2_451_545.0;

/// Greenwich mean sidereal angle from the IAU-82 model, in radians within [0, 2π).
///
/// The Julian date is in UT1, which is approximated by UTC.
pub fn gmst_from_jd(jd_ut1: f64) -> f64 {
    let tut1 = (jd_ut1 - J2000_JD) / 36_525.0;
    let temp = -6.2e-6 * tut1 * tut1 * tut1
        + 0.093_104 * tut1 * tut1
        + (876_600.0 * 3600.0 + 8_640_184.812_866) * tut1
        + 67_310.548_41;
    // Seconds of time to radians, at 1 / 240 degrees per second
    let gmst = (temp * (PI / 180.0) / 240.0) % TAU;
    if gmst < 0.0 {
        gmst + TAU
    } else {
        gmst
    }
}

/// Greenwich mean sidereal angle at this epoch, in radians.
pub fn gmst(epoch: Epoch) -> f64 {
    gmst_from_jd(epoch.to_jde_utc_days())
}

/// Rotation from TEME to the pseudo Earth fixed frame, ignoring polar motion.
pub fn teme_to_ecef(epoch: Epoch) -> Matrix3<f64> {
    let (sin_g, cos_g) = gmst(epoch).sin_cos();
    Matrix3::new(cos_g, sin_g, 0.0, -sin_g, cos_g, 0.0, 0.0, 0.0, 1.0)
}

/// Geodetic coordinates on the WGS-84 ellipsoid.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Geodetic {
    pub latitude_deg: f64,
    /// Within [-180, 180)
    pub longitude_deg: f64,
    pub altitude_km: f64,
}

impl fmt::Display for Geodetic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "lat. {:.6} deg, long. {:.6} deg, alt. {:.3} km",
            self.latitude_deg, self.longitude_deg, self.altitude_km
        )
    }
}

/// Converts a TEME position at the provided epoch into geodetic coordinates.
///
/// Reference: Vallado, 4th Ed., Algorithm 12 page 172.
pub fn teme_to_geodetic(position_km: &Vector3<f64>, epoch: Epoch) -> Geodetic {
    ecef_to_geodetic(&(teme_to_ecef(epoch) * position_km))
}

/// Converts an Earth fixed position into geodetic coordinates on the WGS-84 ellipsoid.
pub fn ecef_to_geodetic(r: &Vector3<f64>) -> Geodetic {
    let eps = 1e-12;
    let max_attempts = 20;
    let e2 = WGS84_FLATTENING * (2.0 - WGS84_FLATTENING);
    let r_delta = (r.x * r.x + r.y * r.y).sqrt();

    let mut longitude = r.y.atan2(r.x);
    if longitude >= PI {
        longitude -= TAU;
    }

    let mut latitude = (r.z / r.norm()).asin();
    let mut attempt_no = 0;
    loop {
        attempt_no += 1;
        let c_earth = WGS84_RADIUS_KM / (1.0 - e2 * latitude.sin().powi(2)).sqrt();
        let new_latitude = (r.z + c_earth * e2 * latitude.sin()).atan2(r_delta);
        let converged = (latitude - new_latitude).abs() < eps;
        latitude = new_latitude;
        if converged {
            break;
        } else if attempt_no >= max_attempts {
            warn!("geodetic latitude did not converge after {max_attempts} iterations");
            break;
        }
    }

    let sin_lat = latitude.sin();
    let c_earth = WGS84_RADIUS_KM / (1.0 - e2 * sin_lat * sin_lat).sqrt();
    let altitude_km = if latitude.cos().abs() < 1e-3 {
        // Near the poles, use the height along the polar axis
        let s_earth = c_earth * (1.0 - e2);
        r.z / sin_lat - s_earth
    } else {
        r_delta / latitude.cos() - c_earth
    };

    Geodetic {
        latitude_deg: latitude.to_degrees(),
        longitude_deg: longitude.to_degrees(),
        altitude_km,
    }
}
