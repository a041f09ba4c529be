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
use snafu::prelude::*;
use std::f64::consts::TAU;
use std::fmt;
use typed_builder::TypedBuilder;

use crate::io::ConfigRepr;
use crate::linalg::Vector3;

mod deep_space;
mod gravity;
mod init;
mod propagate;

pub use self::gravity::{GravityConstants, GravityModel};
pub use self::init::JD_1950;
use self::deep_space::DeepSpace;

/// Revolutions per day to radians per minute: 1440 / 2π
pub const XPDOTP: f64 = 1440.0 / TAU;

/// Orbits with a period of at least this many minutes use the deep-space terms.
pub const DEEP_SPACE_PERIOD_MIN: f64 = 225.0;

/// Errors of the SGP4 initializer and propagator.
///
/// Each variant maps onto one of the historical numeric error codes, see [`Sgp4Error::code`].
#[derive(Copy, Clone, Debug, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Sgp4Error {
    #[snafu(display(
        "invalid mean elements: eccentricity {ecc} with a semi-major axis of {sma_er} Earth radii (code 1)"
    ))]
    InvalidMeanElements { ecc: f64, sma_er: f64 },
    #[snafu(display("mean motion of {mean_motion_rad_min} rad/min is not positive (code 2)"))]
    NegativeMeanMotion { mean_motion_rad_min: f64 },
    #[snafu(display("perturbed eccentricity {ecc} is outside of [0, 1] (code 3)"))]
    PerturbedEccentricity { ecc: f64 },
    #[snafu(display("semi-latus rectum of {slr_er} Earth radii is negative (code 4)"))]
    NegativeSemiLatusRectum { slr_er: f64 },
    #[snafu(display("epoch elements describe a sub-orbital trajectory (code 5)"))]
    SubOrbitalEpoch,
    #[snafu(display(
        "satellite has decayed {minutes} min from epoch, radius of {radius_er} Earth radii (code 6)"
    ))]
    Decayed { minutes: f64, radius_er: f64 },
}

impl Sgp4Error {
    /// Returns the numeric error code of this error, in [1, 6].
    pub fn code(&self) -> u8 {
        match self {
            Self::InvalidMeanElements { .. } => 1,
            Self::NegativeMeanMotion { .. } => 2,
            Self::PerturbedEccentricity { .. } => 3,
            Self::NegativeSemiLatusRectum { .. } => 4,
            Self::SubOrbitalEpoch => 5,
            Self::Decayed { .. } => 6,
        }
    }

    /// Returns true if this error signals that the satellite has re-entered.
    pub fn has_decayed(&self) -> bool {
        matches!(self, Self::Decayed { .. })
    }
}

/// Operation mode of the propagator.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpsMode {
    /// AFSPC operations: the sidereal time at epoch uses the 1970 polynomial and the node is kept in [0, 2π)
    /// in the low-inclination periodics. This is how the published element sets are generated.
    #[default]
    Afspc,
    /// Improved mode, using the IAU-82 sidereal time.
    Improved,
}

impl fmt::Display for OpsMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Afspc => write!(f, "AFSPC"),
            Self::Improved => write!(f, "improved"),
        }
    }
}

/// Sgp4Config stores how element sets are parsed and initialized.
///
/// The defaults match the element sets as distributed, and should only be changed for comparisons.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[builder(doc)]
pub struct Sgp4Config {
    #[builder(default)]
    #[serde(default)]
    pub gravity: GravityModel,
    #[builder(default)]
    #[serde(default)]
    pub ops_mode: OpsMode,
    /// Reject element sets with any parsing diagnostic instead of parsing them best-effort.
    #[builder(default = false)]
    #[serde(default)]
    pub strict: bool,
}

impl Default for Sgp4Config {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl fmt::Display for Sgp4Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "gravity: {}, ops mode: {}, strict: {}",
            self.gravity, self.ops_mode, self.strict
        )
    }
}

impl ConfigRepr for Sgp4Config {}

/// Position and velocity in the TEME frame, as computed by [`Sgp4::propagate`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TemeState {
    pub position_km: Vector3<f64>,
    pub velocity_km_s: Vector3<f64>,
}

/// State of the deep-space resonance integrator.
///
/// A fresh (default) state restarts the integration from epoch. Reusing the same state for
/// successive propagations of one satellite avoids integrating from epoch every time, and
/// yields the exact same results.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ResonanceState {
    pub(crate) atime: f64,
    pub(crate) xli: f64,
    pub(crate) xni: f64,
}

/// Drag terms only evaluated for near-earth orbits with a perigee above 220 km.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct HigherOrderDrag {
    pub(crate) cc5: f64,
    pub(crate) d2: f64,
    pub(crate) d3: f64,
    pub(crate) d4: f64,
    pub(crate) delmo: f64,
    pub(crate) eta: f64,
    pub(crate) omgcof: f64,
    pub(crate) sinmao: f64,
    pub(crate) t3cof: f64,
    pub(crate) t4cof: f64,
    pub(crate) t5cof: f64,
    pub(crate) xmcof: f64,
}

/// Term set applied by the propagator, chosen once at initialization.
#[derive(Clone, Debug)]
pub(crate) enum Regime {
    /// Period below 225 minutes. The higher order drag terms are dropped when the perigee is below 220 km.
    NearEarth { drag: Option<HigherOrderDrag> },
    DeepSpace(Box<DeepSpace>),
}

/// The SGP4 working record: every constant derived from one set of mean elements.
///
/// It is immutable once initialized, so a single record may be propagated from several threads at once.
#[derive(Clone, Debug)]
pub struct Sgp4 {
    pub(crate) model: GravityModel,
    pub(crate) grav: GravityConstants,
    pub(crate) ops_mode: OpsMode,
    // Mean elements at epoch, in radians and radians per minute
    pub(crate) bstar: f64,
    pub(crate) ecco: f64,
    pub(crate) argpo: f64,
    pub(crate) inclo: f64,
    pub(crate) mo: f64,
    pub(crate) nodeo: f64,
    pub(crate) no_kozai: f64,
    pub(crate) no_unkozai: f64,
    /// Greenwich sidereal angle at epoch, radians
    pub(crate) gsto: f64,
    // Secular rates and drag coefficients
    pub(crate) mdot: f64,
    pub(crate) argpdot: f64,
    pub(crate) nodedot: f64,
    pub(crate) nodecf: f64,
    pub(crate) cc1: f64,
    pub(crate) cc4: f64,
    pub(crate) t2cof: f64,
    // Short-period coefficients
    pub(crate) con41: f64,
    pub(crate) x1mth2: f64,
    pub(crate) x7thm1: f64,
    pub(crate) xlcof: f64,
    pub(crate) aycof: f64,
    pub(crate) regime: Regime,
}

impl Sgp4 {
    /// Returns true if the deep-space terms are applied.
    pub fn is_deep_space(&self) -> bool {
        matches!(self.regime, Regime::DeepSpace(_))
    }

    /// Returns true if the orbit is near a one-day or half-day geopotential resonance.
    pub fn is_resonant(&self) -> bool {
        match &self.regime {
            Regime::DeepSpace(ds) => ds.resonance != deep_space::Resonance::None,
            Regime::NearEarth { .. } => false,
        }
    }

    /// Returns true if the higher order drag terms are dropped (perigee below 220 km or deep space).
    pub fn is_simplified(&self) -> bool {
        !matches!(self.regime, Regime::NearEarth { drag: Some(_) })
    }

    pub fn gravity(&self) -> GravityModel {
        self.model
    }

    pub fn gravity_constants(&self) -> &GravityConstants {
        &self.grav
    }

    pub fn ops_mode(&self) -> OpsMode {
        self.ops_mode
    }

    /// Brouwer mean motion at epoch, in radians per minute.
    pub fn mean_motion_rad_min(&self) -> f64 {
        self.no_unkozai
    }

    /// Anomalistic period at epoch, in minutes.
    pub fn period_min(&self) -> f64 {
        TAU / self.no_unkozai
    }

    /// Brouwer mean semi-major axis at epoch, in kilometers.
    pub fn semi_major_axis_km(&self) -> f64 {
        (self.grav.xke / self.no_unkozai).powf(2.0 / 3.0) * self.grav.radius_km
    }

    /// Greenwich sidereal angle at epoch, in radians.
    pub fn gsto_rad(&self) -> f64 {
        self.gsto
    }
}

impl fmt::Display for Sgp4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let regime = match &self.regime {
            Regime::NearEarth { drag: Some(_) } => "near-earth",
            Regime::NearEarth { drag: None } => "near-earth (simplified drag)",
            Regime::DeepSpace(ds) => match ds.resonance {
                deep_space::Resonance::None => "deep-space",
                deep_space::Resonance::Synchronous { .. } => "deep-space (synchronous resonance)",
                deep_space::Resonance::HalfDay { .. } => "deep-space (half-day resonance)",
            },
        };
        write!(
            f,
            "SGP4 {regime}: period {:.3} min, ecc {:.7}, inc {:.4} deg, {}",
            self.period_min(),
            self.ecco,
            self.inclo.to_degrees(),
            self.model
        )
    }
}
