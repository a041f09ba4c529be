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

use std::io::{self, BufRead, Lines};

use crate::sgp4::Sgp4Config;
use crate::{Tle, TleError};

/// The text of one element set, as read from a stream.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawTle {
    /// Name of the object, from the line preceding the element set if any
    pub name: Option<String>,
    pub line1: String,
    pub line2: String,
}

impl RawTle {
    /// Parses and initializes this element set.
    pub fn to_tle(&self, config: Sgp4Config) -> Result<Tle, TleError> {
        let tle = Tle::with_config(&self.line1, &self.line2, config)?;
        Ok(match &self.name {
            Some(name) => tle.with_name(name.as_str()),
            None => tle,
        })
    }
}

/// Splits a stream into element sets, with or without a name line.
///
/// Blank lines are skipped. Any line which does not start with `1 ` is the name of the next set,
/// without its `0 ` prefix if present.
pub struct TleReader<R: BufRead> {
    lines: Lines<R>,
    line_no: usize,
}

impl<R: BufRead> TleReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
        }
    }

    /// Next line with some content, without its end of line characters
    fn next_line(&mut self) -> Option<io::Result<String>> {
        for line in self.lines.by_ref() {
            self.line_no += 1;
            match line {
                Ok(line) => {
                    let line = line.trim_end_matches(['\r', '\n']);
                    if !line.trim().is_empty() {
                        return Some(Ok(line.to_string()));
                    }
                }
                Err(e) => return Some(Err(e)),
            }
        }
        None
    }
}

fn is_first_line(line: &str) -> bool {
    line.starts_with("1 ")
}

impl<R: BufRead> Iterator for TleReader<R> {
    type Item = io::Result<RawTle>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut name: Option<String> = None;
        loop {
            let line = match self.next_line()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e)),
            };

            if is_first_line(&line) {
                let line2 = match self.next_line() {
                    Some(Ok(line2)) => line2,
                    Some(Err(e)) => return Some(Err(e)),
                    None => {
                        warn!("stream ends after line 1 of an element set: {line}");
                        return None;
                    }
                };
                if !line2.starts_with("2 ") {
                    warn!(
                        "line {} should be line 2 of an element set: {line2}",
                        self.line_no
                    );
                }
                return Some(Ok(RawTle {
                    name,
                    line1: line,
                    line2,
                }));
            }

            if let Some(orphan) = name.replace(object_name(&line)) {
                warn!("ignoring name `{orphan}` which is not followed by an element set");
            }
        }
    }
}

fn object_name(line: &str) -> String {
    line.strip_prefix("0 ").unwrap_or(line).trim().to_string()
}
