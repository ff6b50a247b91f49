// xmltv
// Copyright 2015-2026 xmltv developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::parser::ParserError;
use std::io;
use thiserror::Error;

/// Result type returned by the streaming interface
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
/// The error surfaced to the caller, terminating the stream
pub enum Error {
    /// The input is not well-formed XML
    #[error(transparent)]
    Parser(#[from] ParserError),
    /// Reading the input failed
    #[error("An I/O error has occurred while reading input: {0}")]
    Io(#[from] io::Error),
    /// The input bytes are not valid UTF-8
    #[error("Input is not valid UTF-8 at byte offset {offset}")]
    InvalidUtf8 {
        /// Offset of the first invalid byte in the input stream
        offset: u64,
    },
}

impl Error {
    /// The tokenizer error behind this error, if any
    pub fn as_parser_error(&self) -> Option<&ParserError> {
        match *self {
            Error::Parser(ref err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod error_tests {
    use super::Error;
    use crate::parser::ParserError;

    #[test]
    fn test_parser_error_is_transparent() {
        let err = Error::from(ParserError {
            line: 3,
            col: 7,
            msg: "Unexpected closing tag",
        });
        assert_eq!(
            err.to_string(),
            "Parse error; Line: 3, Column: 7, Reason: Unexpected closing tag"
        );
        assert_eq!(err.as_parser_error().map(|e| e.line), Some(3));
    }

    #[test]
    fn test_invalid_utf8_display() {
        let err = Error::InvalidUtf8 { offset: 12 };
        assert_eq!(err.to_string(), "Input is not valid UTF-8 at byte offset 12");
        assert!(err.as_parser_error().is_none());
    }
}
