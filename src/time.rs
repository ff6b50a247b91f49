// xmltv
// Copyright 2015-2026 xmltv developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::settings::{ParserSettings, DEFAULT_TIME_FORMAT};
use jiff::civil::DateTime;
use jiff::tz::Offset;
use jiff::Timestamp;
use log::debug;
use thiserror::Error;

#[derive(Debug, Error)]
/// Why a timestamp could not be resolved
pub enum TimeError {
    /// The input ended before the pattern was complete
    #[error("Unexpected end of input at position {position}")]
    UnexpectedEnd {
        /// Character position in the input
        position: usize,
    },
    /// A numeric field had too few digits
    #[error("Expected a digit at position {position}")]
    ExpectedDigit {
        /// Character position in the input
        position: usize,
    },
    /// A literal character of the pattern did not match
    #[error("Expected {expected:?} at position {position}")]
    ExpectedLiteral {
        /// The pattern's character
        expected: char,
        /// Character position in the input
        position: usize,
    },
    /// No `Z`, `+HHMM`, `+HH:MM` or the like where the pattern has an offset
    #[error("Expected a UTC offset at position {position}")]
    ExpectedOffset {
        /// Character position in the input
        position: usize,
    },
    /// Input left over after the pattern was complete
    #[error("Unexpected trailing input at position {position}")]
    TrailingInput {
        /// Character position in the input
        position: usize,
    },
    /// Neither the pattern nor the input provided a year
    #[error("No year found in input")]
    MissingYear,
    /// The fields do not make up a valid date, time or offset
    #[error("Invalid date or time: {0}")]
    Invalid(#[from] jiff::Error),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Field {
    Year,
    ShortYear,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Item {
    Number { field: Field, min: usize, max: usize },
    Offset,
    Literal(char),
}

/// A compiled date format pattern.
///
/// Patterns use the tokens `YYYY`, `YY`, `MM`, `M`, `DD`, `D`, `HH`, `H`,
/// `mm`, `m`, `ss`, `s` and `Z`/`ZZ` for the UTC offset. Text inside `[` `]`
/// and any other character is matched literally. The XMLTV default is
/// `YYYYMMDDHHmmss Z`, matching e.g. `20150603025000 +0200`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TimeFormat {
    pattern: String,
    items: Vec<Item>,
}

impl Default for TimeFormat {
    fn default() -> TimeFormat {
        TimeFormat::new(DEFAULT_TIME_FORMAT)
    }
}

impl TimeFormat {
    /// Compiles a pattern
    pub fn new(pattern: &str) -> TimeFormat {
        let chars: Vec<char> = pattern.chars().collect();
        let mut items = Vec::new();
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];
            if c == '[' {
                i += 1;
                while i < chars.len() && chars[i] != ']' {
                    items.push(Item::Literal(chars[i]));
                    i += 1;
                }
                i += 1;
                continue;
            }

            let mut run = 1;
            while i + run < chars.len() && chars[i + run] == c {
                run += 1;
            }
            match token(c, run) {
                Some(item) => items.push(item),
                None => items.extend(std::iter::repeat(Item::Literal(c)).take(run)),
            }
            i += run;
        }

        TimeFormat {
            pattern: pattern.to_owned(),
            items,
        }
    }

    /// The pattern this format was compiled from
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Parses `input` into an instant.
    ///
    /// In strict mode every field must have its full width, literals must
    /// match, an offset token requires an offset, and nothing may follow.
    /// Otherwise separators may differ, fields may be shorter, the input may
    /// stop after the year (missing fields default to the start of the
    /// period, a missing offset to UTC) and trailing input is ignored.
    pub fn parse(&self, input: &str, strict: bool) -> Result<Timestamp, TimeError> {
        let mut cursor = Cursor {
            chars: input.trim().chars().collect(),
            pos: 0,
        };
        let mut parts = Parts::default();

        for item in &self.items {
            match *item {
                Item::Literal(expected) => {
                    if cursor.peek() == Some(expected) {
                        cursor.pos += 1;
                    } else if strict {
                        return Err(match cursor.peek() {
                            None => TimeError::UnexpectedEnd {
                                position: cursor.pos,
                            },
                            Some(_) => TimeError::ExpectedLiteral {
                                expected,
                                position: cursor.pos,
                            },
                        });
                    }
                }
                Item::Number { field, min, max } => {
                    if !strict {
                        cursor.skip_while(|c| !c.is_alphanumeric() && c != '+');
                        if cursor.at_end() {
                            break;
                        }
                    }
                    let min = if strict { min } else { 1 };
                    let value = cursor.number(min, max)?;
                    parts.set(field, value);
                }
                Item::Offset => {
                    if !strict {
                        cursor.skip_while(char::is_whitespace);
                        parts.offset = cursor.offset(false).unwrap_or(0);
                        break;
                    }
                    parts.offset = cursor.offset(true)?;
                }
            }
        }

        if strict && !cursor.at_end() {
            return Err(TimeError::TrailingInput {
                position: cursor.pos,
            });
        }
        parts.to_timestamp()
    }
}

fn token(c: char, run: usize) -> Option<Item> {
    let (field, min, max) = match (c, run) {
        ('Y', 4) => (Field::Year, 4, 4),
        ('Y', 2) => (Field::ShortYear, 2, 2),
        ('M', 2) => (Field::Month, 2, 2),
        ('M', 1) => (Field::Month, 1, 2),
        ('D', 2) => (Field::Day, 2, 2),
        ('D', 1) => (Field::Day, 1, 2),
        ('H', 2) => (Field::Hour, 2, 2),
        ('H', 1) => (Field::Hour, 1, 2),
        ('m', 2) => (Field::Minute, 2, 2),
        ('m', 1) => (Field::Minute, 1, 2),
        ('s', 2) => (Field::Second, 2, 2),
        ('s', 1) => (Field::Second, 1, 2),
        ('Z', 1) | ('Z', 2) => return Some(Item::Offset),
        _ => return None,
    };
    Some(Item::Number { field, min, max })
}

struct Cursor {
    chars: Vec<char>,
    pos: usize,
}

impl Cursor {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).cloned()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn skip_while<F: Fn(char) -> bool>(&mut self, pred: F) {
        while self.peek().map_or(false, &pred) {
            self.pos += 1;
        }
    }

    // Reads between `min` and `max` ASCII digits
    fn number(&mut self, min: usize, max: usize) -> Result<u32, TimeError> {
        let mut value = 0u32;
        let mut read = 0;
        while read < max {
            match self.peek().and_then(|c| c.to_digit(10)) {
                Some(digit) => {
                    value = value * 10 + digit;
                    read += 1;
                    self.pos += 1;
                }
                _ => break,
            }
        }
        if read >= min {
            Ok(value)
        } else if self.at_end() {
            Err(TimeError::UnexpectedEnd { position: self.pos })
        } else {
            Err(TimeError::ExpectedDigit { position: self.pos })
        }
    }

    // Reads `Z`, `+HH`, `+HHMM` or `+HH:MM` as seconds east of UTC.
    // The minutes are required when `strict` is set.
    fn offset(&mut self, strict: bool) -> Result<i32, TimeError> {
        let start = self.pos;
        let sign = match self.peek() {
            Some('Z') => {
                self.pos += 1;
                return Ok(0);
            }
            Some('+') => 1,
            Some('-') => -1,
            Some(_) => return Err(TimeError::ExpectedOffset { position: start }),
            None => return Err(TimeError::UnexpectedEnd { position: start }),
        };
        self.pos += 1;

        let hours = self.number(2, 2)? as i32;
        if self.peek() == Some(':') {
            self.pos += 1;
        }
        let minutes = if strict || self.peek().map_or(false, |c| c.is_ascii_digit()) {
            self.number(2, 2)? as i32
        } else {
            0
        };
        Ok(sign * (hours * 3600 + minutes * 60))
    }
}

#[derive(Debug)]
struct Parts {
    year: Option<i32>,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
    offset: i32,
}

impl Default for Parts {
    fn default() -> Parts {
        Parts {
            year: None,
            month: 1,
            day: 1,
            hour: 0,
            minute: 0,
            second: 0,
            offset: 0,
        }
    }
}

impl Parts {
    fn set(&mut self, field: Field, value: u32) {
        match field {
            Field::Year => self.year = Some(value as i32),
            // Two digit years above 68 are in the twentieth century
            Field::ShortYear if value > 68 => self.year = Some(1900 + value as i32),
            Field::ShortYear => self.year = Some(2000 + value as i32),
            Field::Month => self.month = value,
            Field::Day => self.day = value,
            Field::Hour => self.hour = value,
            Field::Minute => self.minute = value,
            Field::Second => self.second = value,
        }
    }

    // Numeric fields are at most four digits wide, so the casts are lossless
    fn to_timestamp(&self) -> Result<Timestamp, TimeError> {
        let year = self.year.ok_or(TimeError::MissingYear)?;
        let dt = DateTime::new(
            year as i16,
            self.month as i8,
            self.day as i8,
            self.hour as i8,
            self.minute as i8,
            self.second as i8,
            0,
        )?;
        let offset = Offset::from_seconds(self.offset)?;
        Ok(offset.to_timestamp(dt)?)
    }
}

/// Resolves XMLTV timestamp attributes according to the parser settings.
///
/// Resolution never fails loudly: anything that does not fit the format
/// yields `None`.
#[derive(Clone, Debug)]
pub struct TimestampResolver {
    format: TimeFormat,
    strict: bool,
}

impl Default for TimestampResolver {
    fn default() -> TimestampResolver {
        TimestampResolver::new(&ParserSettings::default())
    }
}

impl TimestampResolver {
    /// Returns a resolver for the settings' format and strictness
    pub fn new(settings: &ParserSettings) -> TimestampResolver {
        TimestampResolver {
            format: TimeFormat::new(&settings.time_format),
            strict: settings.strict_time,
        }
    }

    /// Resolves `input`, or `None` if it does not fit the format
    pub fn resolve(&self, input: &str) -> Option<Timestamp> {
        match self.format.parse(input, self.strict) {
            Ok(ts) => Some(ts),
            Err(err) => {
                debug!(
                    "Could not resolve timestamp {:?} with format {:?}: {}",
                    input,
                    self.format.pattern(),
                    err
                );
                None
            }
        }
    }
}
