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

use rayon::prelude::*;

use crate::sgp4::ResonanceState;
use crate::tle::utc_minutes_between;
use crate::time::{Duration, Epoch, TimeSeries};
use crate::{Ephemeris, Tle, TleError};

/// Iterates over the states of one satellite at a fixed step.
///
/// The deep-space resonance integrator state is carried from one step to the next. Iteration stops
/// after the first error, since a decayed satellite stays decayed.
pub struct EphemerisIter<'a> {
    time_series: Option<TimeSeries>,
    tle: &'a Tle,
    scratch: ResonanceState,
}

impl Iterator for EphemerisIter<'_> {
    type Item = Result<Ephemeris, TleError>;

    fn next(&mut self) -> Option<Self::Item> {
        let epoch = self.time_series.as_mut()?.next()?;
        let minutes = utc_minutes_between(self.tle.epoch(), epoch);
        let rslt = self.tle.ephemeris_with(&mut self.scratch, epoch, minutes);
        if let Err(e) = &rslt {
            debug!("stopping the series of #{}: {e}", self.tle.catalog_number());
            self.time_series = None;
        }
        Some(rslt)
    }
}

impl Tle {
    /// Propagates from `start` (included) to `end` (excluded) every `step`.
    ///
    /// A step which is not positive yields no state at all.
    pub fn ephemerides(&self, start: Epoch, end: Epoch, step: Duration) -> EphemerisIter<'_> {
        let time_series = if step > Duration::ZERO {
            Some(TimeSeries::exclusive(start, end, step))
        } else {
            warn!("step of {step} is not positive, no state will be computed");
            None
        };

        EphemerisIter {
            time_series,
            tle: self,
            scratch: ResonanceState::default(),
        }
    }
}

/// Propagates each satellite to the same epoch, in parallel.
pub fn propagate_many(tles: &[Tle], epoch: Epoch) -> Vec<Result<Ephemeris, TleError>> {
    tles.par_iter().map(|tle| tle.propagate_at(epoch)).collect()
}

/// Computes the time series of each satellite, in parallel across satellites.
///
/// Each series is computed sequentially and ends with its first error, if any.
pub fn series_many(
    tles: &[Tle],
    start: Epoch,
    end: Epoch,
    step: Duration,
) -> Vec<Vec<Result<Ephemeris, TleError>>> {
    tles.par_iter()
        .map(|tle| tle.ephemerides(start, end, step).collect())
        .collect()
}
