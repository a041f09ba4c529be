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

/*! # nyx-sgp4

Propagation of NORAD two-line element sets (TLEs) with the SGP4/SDP4 analytical theory.

A [`Tle`] is parsed from its two lines, initialized once, and then propagated to any epoch or any
number of minutes from its epoch. The result is an [`Ephemeris`] in the TEME (Earth-centered inertial) frame, in kilometers
and kilometers per second.

```
use nyx_sgp4::Tle;

let tle = Tle::new(
    "1 25544U 98067A   20349.28181795  .00001103  00000-0  27992-4 0  9997",
    "2 25544  51.6443 177.3570 0001731 128.2351  43.6939 15.49184106259930",
)
.unwrap();

let state = tle.propagate_by_minutes(90.0).unwrap();
assert!(state.radius_km() > 6700.0);
```
*/

/// The SGP4 initializer and propagator: gravity models, near-earth and deep-space term sets, error codes.
pub mod sgp4;

/// Two-line element sets: parsing, mean elements and the propagation facade.
pub mod tle;

/// Propagation results and the geodetic conversions applied to them.
pub mod cosmic;

/// Batch propagation, over time for a single satellite or over many satellites at once.
pub mod batch;

/// Configuration loading and TLE stream framing.
pub mod io;

mod errors;
/// Functions which may fail return an error, the decay condition is always queryable from it.
pub use self::errors::{has_decayed, TleError};

#[macro_use]
extern crate log;
extern crate hifitime;
extern crate nalgebra as na;

/// Re-export of hifitime
pub mod time {
    pub use hifitime::*;
}

/// Re-export nalgebra
pub mod linalg {
    pub use na::base::*;
}

/// Re-export some useful things
pub use self::cosmic::Ephemeris;
pub use self::sgp4::{Sgp4, Sgp4Config, Sgp4Error};
pub use self::tle::{Elements, MeanElements, Tle};
