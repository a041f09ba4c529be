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
use std::error::Error;

use crate::sgp4::Sgp4Error;
use crate::tle::ParseDiagnostic;

#[derive(Clone, Debug, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum TleError {
    #[snafu(display("initializing #{catalog_number} failed: {source}"))]
    Initialization {
        catalog_number: u32,
        source: Sgp4Error,
    },
    #[snafu(display("propagating #{catalog_number} by {minutes} min failed: {source}"))]
    Propagation {
        catalog_number: u32,
        minutes: f64,
        source: Sgp4Error,
    },
    #[snafu(display("strict parsing rejected the lines: {}", diagnostics.iter().map(|d| d.to_string()).collect::<Vec<_>>().join("; ")))]
    MalformedLines { diagnostics: Vec<ParseDiagnostic> },
}

impl TleError {
    /// Returns the numeric SGP4 error code, or None if the lines were rejected before initialization.
    pub fn code(&self) -> Option<u8> {
        self.sgp4_error().map(Sgp4Error::code)
    }

    /// Returns true if the satellite had decayed at the requested time.
    pub fn has_decayed(&self) -> bool {
        self.sgp4_error().is_some_and(Sgp4Error::has_decayed)
    }

    pub fn sgp4_error(&self) -> Option<&Sgp4Error> {
        match self {
            Self::Initialization { source, .. } | Self::Propagation { source, .. } => Some(source),
            Self::MalformedLines { .. } => None,
        }
    }
}

/// Returns true if this error, or any of its sources, signals a decayed satellite.
///
/// This allows checking for a decay through boxed or wrapped errors.
pub fn has_decayed(err: &(dyn Error + 'static)) -> bool {
    let mut cur = Some(err);
    while let Some(err) = cur {
        if let Some(e) = err.downcast_ref::<Sgp4Error>() {
            if e.has_decayed() {
                return true;
            }
        } else if let Some(e) = err.downcast_ref::<TleError>() {
            if e.has_decayed() {
                return true;
            }
        }
        cur = err.source();
    }
    false
}

#[cfg(test)]
mod ut_errors {
    use super::*;

    #[test]
    fn decay_through_boxes() {
        let decayed = TleError::Propagation {
            catalog_number: 5,
            minutes: 1e5,
            source: Sgp4Error::Decayed {
                minutes: 1e5,
                radius_er: 0.9,
            },
        };
        assert_eq!(decayed.code(), Some(6));
        assert!(decayed.has_decayed());

        let boxed: Box<dyn Error + Send + Sync> = Box::new(decayed);
        assert!(has_decayed(boxed.as_ref()));

        let other: Box<dyn Error> = Box::new(Sgp4Error::SubOrbitalEpoch);
        assert!(!has_decayed(other.as_ref()));

        let io = std::io::Error::new(std::io::ErrorKind::Other, "satellite has decayed");
        assert!(!has_decayed(&io));
    }
}
