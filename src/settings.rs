// xmltv
// Copyright 2015-2026 xmltv developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use serde::Deserialize;

/// Format of XMLTV `start` and `stop` attributes, e.g. `20150603025000 +0200`
pub const DEFAULT_TIME_FORMAT: &str = "YYYYMMDDHHmmss Z";

/// Options recognised by `XmltvParser`.
///
/// Can be deserialized from a caller's configuration using the keys
/// `timeFmt` and `strictTime`; missing keys keep their defaults.
///
/// ~~~
/// use xmltv::ParserSettings;
///
/// let settings = ParserSettings::default()
///     .time_format("YYYYMMDDHHmmss")
///     .strict_time(false);
/// assert!(!settings.strict_time);
/// ~~~
#[derive(Clone, PartialEq, Eq, Debug, Deserialize)]
#[serde(default)]
pub struct ParserSettings {
    /// Pattern used to resolve `start` and `stop`, see `TimeFormat`
    #[serde(rename = "timeFmt")]
    pub time_format: String,
    /// Whether timestamps must match the pattern exactly
    #[serde(rename = "strictTime")]
    pub strict_time: bool,
}

impl Default for ParserSettings {
    fn default() -> ParserSettings {
        ParserSettings {
            time_format: DEFAULT_TIME_FORMAT.to_owned(),
            strict_time: true,
        }
    }
}

impl ParserSettings {
    /// Sets the timestamp pattern
    pub fn time_format<S: Into<String>>(mut self, pattern: S) -> ParserSettings {
        self.time_format = pattern.into();
        self
    }

    /// Sets whether timestamps are parsed strictly
    pub fn strict_time(mut self, strict: bool) -> ParserSettings {
        self.strict_time = strict;
        self
    }
}

#[cfg(test)]
mod settings_tests {
    use super::{ParserSettings, DEFAULT_TIME_FORMAT};

    #[test]
    fn test_defaults() {
        let settings = ParserSettings::default();
        assert_eq!(settings.time_format, DEFAULT_TIME_FORMAT);
        assert!(settings.strict_time);
    }

    #[test]
    fn test_deserialize_partial_config() {
        let settings: ParserSettings =
            serde_json::from_str(r#"{"strictTime": false}"#).expect("valid settings");
        assert_eq!(settings, ParserSettings::default().strict_time(false));

        let settings: ParserSettings =
            serde_json::from_str(r#"{"timeFmt": "YYYY-MM-DD HH:mm Z"}"#).expect("valid settings");
        assert_eq!(settings.time_format, "YYYY-MM-DD HH:mm Z");
        assert!(settings.strict_time);
    }
}
