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
use std::ops::Range;

use super::elements::MeanElements;

/// Number of columns of a line, checksum included.
pub const LINE_LEN: usize = 69;

/// Problems found while decoding the fixed columns of an element set.
///
/// None of these prevent parsing: the affected values are read as zero. They are reported so that
/// mis-parses may be caught, and they are fatal when parsing in strict mode.
#[derive(Clone, Debug, PartialEq, Snafu)]
pub enum ParseDiagnostic {
    #[snafu(display("line {line} has {len} columns instead of {LINE_LEN}"))]
    ShortLine { line: u8, len: usize },
    #[snafu(display("line {line} starts with {found:?} instead of its line number"))]
    WrongLineNumber { line: u8, found: String },
    #[snafu(display("line {line} checksum is {found:?} but the line sums to {computed}"))]
    ChecksumMismatch { line: u8, computed: u8, found: char },
    #[snafu(display("line {line} field `{field}` cannot be parsed from {text:?}, read as zero"))]
    MalformedField {
        line: u8,
        field: &'static str,
        text: String,
    },
    #[snafu(display("catalog number is {line1} on line 1 but {line2} on line 2"))]
    CatalogMismatch { line1: u32, line2: u32 },
}

/// Computes the modulo 10 checksum of the first 68 columns: digits count for their value and minus signs for one.
pub fn checksum(line: &str) -> u8 {
    let sum: u32 = line
        .chars()
        .take(LINE_LEN - 1)
        .map(|c| match c {
            '-' => 1,
            _ => c.to_digit(10).unwrap_or(0),
        })
        .sum();
    (sum % 10) as u8
}

/// Decodes a catalog number, including the Alpha-5 form where a leading letter stands for the
/// hundred thousands (`A` is 10, `I` and `O` are skipped).
pub fn parse_catalog_number(field: &str) -> Option<u32> {
    let field = field.trim();
    let mut chars = field.chars();
    let first = chars.next()?;
    if first.is_ascii_uppercase() {
        if first == 'I' || first == 'O' {
            return None;
        }
        let mut prefix = u32::from(first) - u32::from('A') + 10;
        if first > 'I' {
            prefix -= 1;
        }
        if first > 'O' {
            prefix -= 1;
        }
        let rest = chars.as_str();
        if rest.len() != 4 || !rest.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some(prefix * 10_000 + rest.parse::<u32>().ok()?)
    } else {
        field.parse().ok()
    }
}

/// Decodes a field with an implied leading decimal point and a signed power of ten, e.g. ` 27992-4` is 0.27992e-4.
pub fn parse_implied_exponent(field: &str) -> Option<f64> {
    let field = field.trim();
    if field.is_empty() {
        return Some(0.0);
    }
    let (sign, unsigned) = match field.as_bytes()[0] {
        b'-' => ("-", &field[1..]),
        b'+' => ("", &field[1..]),
        _ => ("", field),
    };
    let split = unsigned.rfind(['-', '+'])?;
    let (mantissa, exponent) = unsigned.split_at(split);
    let mantissa = mantissa.trim();
    if mantissa.is_empty() || !mantissa.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let exponent: i32 = exponent.parse().ok()?;
    let mantissa: f64 = format!("{sign}0.{mantissa}").parse().ok()?;
    Some(mantissa * 10.0_f64.powf(f64::from(exponent)))
}

/// Reads the fixed-width fields of one line and collects the diagnostics.
struct Columns<'a> {
    line: u8,
    text: &'a str,
    diagnostics: &'a mut Vec<ParseDiagnostic>,
}

impl<'a> Columns<'a> {
    fn new(line: u8, text: &'a str, diagnostics: &'a mut Vec<ParseDiagnostic>) -> Self {
        let len = text.chars().count();
        if len < LINE_LEN {
            diagnostics.push(ParseDiagnostic::ShortLine { line, len });
        }
        let expected = char::from(b'0' + line);
        if !text.starts_with(expected) {
            diagnostics.push(ParseDiagnostic::WrongLineNumber {
                line,
                found: text.chars().take(2).collect(),
            });
        }
        if let Some(found) = text.chars().nth(LINE_LEN - 1) {
            let computed = checksum(text);
            if found.to_digit(10) != Some(u32::from(computed)) {
                diagnostics.push(ParseDiagnostic::ChecksumMismatch {
                    line,
                    computed,
                    found,
                });
            }
        }
        Self {
            line,
            text,
            diagnostics,
        }
    }

    /// Returns the raw columns, or an empty string when the line is too short.
    fn raw(&mut self, field: &'static str, cols: Range<usize>) -> &'a str {
        let text = self.text;
        if cols.start >= text.len() {
            return "";
        }
        let end = cols.end.min(text.len());
        match text.get(cols.start..end) {
            Some(raw) => raw,
            None => {
                // Not on a character boundary
                self.malformed(field, text.chars().skip(cols.start).take(cols.len()).collect());
                ""
            }
        }
    }

    fn malformed(&mut self, field: &'static str, text: String) {
        self.diagnostics.push(ParseDiagnostic::MalformedField {
            line: self.line,
            field,
            text,
        });
    }

    /// Parses a value through `decode`, where blank columns read as the default.
    fn parse<T: Default>(
        &mut self,
        field: &'static str,
        cols: Range<usize>,
        decode: impl FnOnce(&str) -> Option<T>,
    ) -> T {
        let raw = self.raw(field, cols);
        if raw.trim().is_empty() {
            return T::default();
        }
        match decode(raw) {
            Some(value) => value,
            None => {
                self.malformed(field, raw.to_string());
                T::default()
            }
        }
    }

    fn float(&mut self, field: &'static str, cols: Range<usize>) -> f64 {
        self.parse(field, cols, |raw| raw.trim().parse().ok())
    }

    fn int(&mut self, field: &'static str, cols: Range<usize>) -> u32 {
        self.parse(field, cols, |raw| raw.trim().parse().ok())
    }

    fn char(&mut self, field: &'static str, col: usize) -> char {
        self.raw(field, col..col + 1).chars().next().unwrap_or(' ')
    }
}

/// Decodes the two lines of an element set.
///
/// Parsing never fails: unreadable values are set to zero and reported in the returned diagnostics,
/// which are also logged as warnings.
pub fn parse(line1: &str, line2: &str) -> (MeanElements, Vec<ParseDiagnostic>) {
    let mut diagnostics = Vec::new();
    let mut elements = MeanElements::default();

    let mut cols = Columns::new(1, line1, &mut diagnostics);
    let catalog1 = cols.parse("catalog number", 2..7, parse_catalog_number);
    elements.catalog_number = catalog1;
    elements.classification = cols.char("classification", 7);
    elements.international_designator = cols.raw("international designator", 9..17).trim().to_string();
    let two_digit_year = cols.int("epoch year", 18..20) as i32;
    elements.epoch_year = if two_digit_year < 57 {
        2000 + two_digit_year
    } else {
        1900 + two_digit_year
    };
    elements.epoch_day = cols.float("epoch day", 20..32);
    elements.mean_motion_dot = cols.float("first derivative of mean motion", 33..43);
    elements.mean_motion_ddot = cols.parse(
        "second derivative of mean motion",
        44..52,
        parse_implied_exponent,
    );
    elements.bstar = cols.parse("drag term", 53..61, parse_implied_exponent);
    elements.ephemeris_type = cols.parse("ephemeris type", 62..63, |raw| raw.trim().parse().ok());
    elements.element_set_number = cols.int("element set number", 64..68);

    let mut cols = Columns::new(2, line2, &mut diagnostics);
    let catalog2 = cols.parse("catalog number", 2..7, parse_catalog_number);
    elements.inclination_deg = cols.float("inclination", 8..16);
    elements.raan_deg = cols.float("right ascension of the ascending node", 17..25);
    // Blank columns of the eccentricity are zeros after the implied decimal point
    let ecc = cols.raw("eccentricity", 26..33).replace(' ', "0");
    elements.eccentricity = if ecc.bytes().all(|b| b.is_ascii_digit()) {
        format!("0.{ecc}").parse().unwrap_or_default()
    } else {
        cols.malformed("eccentricity", ecc);
        0.0
    };
    elements.arg_perigee_deg = cols.float("argument of perigee", 34..42);
    elements.mean_anomaly_deg = cols.float("mean anomaly", 43..51);
    elements.mean_motion_rev_day = cols.float("mean motion", 52..63);
    elements.revolution_number = cols.int("revolution number", 63..68);

    if catalog1 != catalog2 {
        diagnostics.push(ParseDiagnostic::CatalogMismatch {
            line1: catalog1,
            line2: catalog2,
        });
    }

    for diag in &diagnostics {
        warn!("#{}: {diag}", elements.catalog_number);
    }

    (elements, diagnostics)
}

#[cfg(test)]
mod ut_parser {
    use super::*;
    use approx::assert_abs_diff_eq;

    const ISS_1: &str = "1 25544U 98067A   20349.28181795  .00001103  00000-0  27992-4 0  9997";
    const ISS_2: &str = "2 25544  51.6443 177.3570 0001731 128.2351  43.6939 15.49184106259930";

    #[test]
    fn iss_fields() {
        let (elements, diagnostics) = parse(ISS_1, ISS_2);
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        assert_eq!(elements.catalog_number, 25544);
        assert_eq!(elements.classification, 'U');
        assert_eq!(elements.international_designator, "98067A");
        assert_eq!(elements.epoch_year, 2020);
        assert_eq!(elements.epoch_day, 349.281_817_95);
        assert_eq!(elements.mean_motion_dot, 0.000_011_03);
        assert_eq!(elements.mean_motion_ddot, 0.0);
        assert_abs_diff_eq!(elements.bstar, 2.7992e-5, epsilon = 1e-18);
        assert_eq!(elements.ephemeris_type, 0);
        assert_eq!(elements.element_set_number, 999);
        assert_eq!(elements.inclination_deg, 51.6443);
        assert_eq!(elements.raan_deg, 177.357);
        assert_eq!(elements.eccentricity, 0.000_173_1);
        assert_eq!(elements.arg_perigee_deg, 128.2351);
        assert_eq!(elements.mean_anomaly_deg, 43.6939);
        assert_eq!(elements.mean_motion_rev_day, 15.491_841_06);
        assert_eq!(elements.revolution_number, 25993);
    }

    #[test]
    fn implied_exponents() {
        assert_eq!(parse_implied_exponent(" 00000-0"), Some(0.0));
        assert_abs_diff_eq!(
            parse_implied_exponent("-11606-4").unwrap(),
            -1.1606e-5,
            epsilon = 1e-18
        );
        assert_abs_diff_eq!(
            parse_implied_exponent("+12345+1").unwrap(),
            1.2345,
            epsilon = 1e-15
        );
        assert_eq!(parse_implied_exponent("        "), Some(0.0));
        assert_eq!(parse_implied_exponent(" 1x345-4"), None);
        assert_eq!(parse_implied_exponent(" 12345 4"), None);
    }

    #[test]
    fn alpha5() {
        assert_eq!(parse_catalog_number("25544"), Some(25544));
        assert_eq!(parse_catalog_number("A0000"), Some(100_000));
        assert_eq!(parse_catalog_number("H9999"), Some(179_999));
        assert_eq!(parse_catalog_number("J0000"), Some(180_000));
        assert_eq!(parse_catalog_number("P0001"), Some(230_001));
        assert_eq!(parse_catalog_number("Z9999"), Some(339_999));
        assert_eq!(parse_catalog_number("I0000"), None);
        assert_eq!(parse_catalog_number("A12"), None);
    }

    #[test]
    fn checksums() {
        assert_eq!(checksum(ISS_1), 7);
        assert_eq!(checksum(ISS_2), 0);
    }

    #[test]
    fn diagnostics_are_reported() {
        // Corrupted inclination and a checksum that no longer matches
        let line2 = "2 25544  51.6x43 177.3570 0001731 128.2351  43.6939 15.49184106259930";
        let (elements, diagnostics) = parse(ISS_1, line2);
        assert_eq!(elements.inclination_deg, 0.0);
        assert_eq!(elements.raan_deg, 177.357);
        assert!(diagnostics.contains(&ParseDiagnostic::MalformedField {
            line: 2,
            field: "inclination",
            text: " 51.6x43".to_string()
        }));
        assert!(diagnostics
            .iter()
            .any(|d| matches!(d, ParseDiagnostic::ChecksumMismatch { line: 2, .. })));

        let (_, diagnostics) = parse(&ISS_1[..60], ISS_2);
        assert!(diagnostics.contains(&ParseDiagnostic::ShortLine { line: 1, len: 60 }));

        let (_, diagnostics) = parse(ISS_2, ISS_1);
        assert!(diagnostics
            .iter()
            .any(|d| matches!(d, ParseDiagnostic::WrongLineNumber { line: 1, .. })));

        let other = "2 25545  51.6443 177.3570 0001731 128.2351  43.6939 15.49184106259931";
        let (_, diagnostics) = parse(ISS_1, other);
        assert_eq!(
            diagnostics,
            vec![ParseDiagnostic::CatalogMismatch {
                line1: 25544,
                line2: 25545
            }]
        );
    }
}
