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

extern crate log;
extern crate nyx_sgp4 as nyx;
extern crate pretty_env_logger;

use clap::Parser;
use log::{error, info, warn};
use nyx::cosmic::Geodetic;
use nyx::io::{ConfigError, ConfigRepr, TleReader};
use nyx::linalg::Vector3;
use nyx::time::{Duration, Epoch, Unit};
use nyx::{batch, Ephemeris, Sgp4Config, Tle};
use serde_derive::Serialize;
use snafu::prelude::*;
use std::env::{set_var, var};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::str::FromStr;

const LOG_VAR: &str = "SGP4_LOG";

/// Reads element sets on stdin and writes their propagated states on stdout, one JSON object per line.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Propagation start time, defaults to now
    #[arg(long, value_parser = Epoch::from_str)]
    from: Option<Epoch>,
    /// Propagation end time (excluded), defaults to one minute after the start
    #[arg(long, value_parser = Epoch::from_str)]
    to: Option<Epoch>,
    /// Time between two states
    #[arg(long, value_parser = Duration::from_str, default_value = "6 s")]
    interval: Duration,
    /// YAML file of the SGP4 configuration
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Snafu)]
enum CliError {
    #[snafu(display("{source}"))]
    Config { source: ConfigError },
    #[snafu(display("could not get the current time: {source}"))]
    Clock { source: nyx::time::Errors },
    #[snafu(display("reading stdin failed: {source}"))]
    Input { source: io::Error },
    #[snafu(display("writing a state failed: {source}"))]
    Output { source: io::Error },
    #[snafu(display("serializing a state failed: {source}"))]
    Json { source: serde_json::Error },
}

#[derive(Serialize)]
struct State {
    position_km: Vector3<f64>,
    velocity_km_s: Vector3<f64>,
}

#[derive(Serialize)]
struct Record {
    norad: u32,
    at: String,
    state: State,
    lla: Geodetic,
}

impl From<&Ephemeris> for Record {
    fn from(eph: &Ephemeris) -> Self {
        Self {
            norad: eph.catalog_number,
            at: eph.epoch.to_string(),
            state: State {
                position_km: eph.position_km,
                velocity_km_s: eph.velocity_km_s,
            },
            lla: eph.to_geodetic(),
        }
    }
}

fn main() -> Result<(), CliError> {
    if var(LOG_VAR).is_err() {
        set_var(LOG_VAR, "INFO");
    }

    if pretty_env_logger::try_init_custom_env(LOG_VAR).is_err() {
        println!("could not init logger");
    }

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Sgp4Config::load(path).context(ConfigSnafu)?,
        None => Sgp4Config::default(),
    };

    let from = match args.from {
        Some(from) => from,
        None => Epoch::now().context(ClockSnafu)?,
    };
    let to = args.to.unwrap_or(from + 1 * Unit::Minute);
    if to <= from || args.interval <= Duration::ZERO {
        return Err(CliError::Config {
            source: ConfigError::InvalidConfig {
                msg: format!(
                    "cannot propagate from {from} to {to} every {}",
                    args.interval
                ),
            },
        });
    }

    let mut tles = Vec::new();
    for raw in TleReader::new(io::stdin().lock()) {
        let raw = raw.context(InputSnafu)?;
        match raw.to_tle(config) {
            Ok(tle) => tles.push(tle),
            Err(e) => error!("skipping {}: {e}", raw.line1),
        }
    }
    info!(
        "propagating {} objects from {from} to {to} every {} ({config})",
        tles.len(),
        args.interval
    );

    let all_series = batch::series_many(&tles, from, to, args.interval);

    let mut out = BufWriter::new(io::stdout().lock());
    let mut count = 0;
    for (tle, series) in tles.iter().zip(all_series) {
        for rslt in series {
            match rslt {
                Ok(eph) => {
                    serde_json::to_writer(&mut out, &Record::from(&eph)).context(JsonSnafu)?;
                    writeln!(out).context(OutputSnafu)?;
                    count += 1;
                }
                Err(e) if e.has_decayed() => warn!("{}", describe(tle, &e)),
                Err(e) => error!("{}", describe(tle, &e)),
            }
        }
    }
    out.flush().context(OutputSnafu)?;

    info!("wrote {count} states");
    Ok(())
}

fn describe(tle: &Tle, e: &nyx::TleError) -> String {
    match tle.name() {
        Some(name) => format!("{name}: {e}"),
        None => e.to_string(),
    }
}
