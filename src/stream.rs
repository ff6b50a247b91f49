// xmltv
// Copyright 2015-2026 xmltv developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::builder::{Record, RecordBuilder};
use crate::error::{Error, Result};
use crate::parser::{Parser, TokenSource};
use crate::record::{Channel, Programme};
use crate::settings::ParserSettings;
use log::debug;
use serde::Serialize;

#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
/// Items produced by `XmltvParser`
pub enum XmltvEvent {
    /// A `<channel>` was closed
    Channel(Channel),
    /// A `<programme>` was closed
    Programme(Programme),
    /// The document ended; produced once, after `finish()`
    End,
}

impl XmltvEvent {
    /// The record carried by this event, if any
    pub fn into_record(self) -> Option<Record> {
        match self {
            XmltvEvent::Channel(channel) => Some(Record::Channel(channel)),
            XmltvEvent::Programme(programme) => Some(Record::Programme(programme)),
            XmltvEvent::End => None,
        }
    }
}

impl From<Record> for XmltvEvent {
    fn from(record: Record) -> XmltvEvent {
        match record {
            Record::Channel(channel) => XmltvEvent::Channel(channel),
            Record::Programme(programme) => XmltvEvent::Programme(programme),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum StreamState {
    Running,
    Ended,
    Failed,
}

/// A streaming XMLTV parser
///
/// Chunks of the document are handed over with `feed_str()`; chunk
/// boundaries need not coincide with tag boundaries. Iterating yields each
/// record as soon as its closing tag has been fed, `XmltvEvent::End` once
/// the end of input was signalled with `finish()` and everything was
/// consumed, or a single `Err` if the document is not well-formed XML.
/// Nothing is yielded after `End` or an `Err`.
///
/// Records are only built while the caller iterates, so input can be fed
/// and drained alternately without anything being dropped. Every method
/// takes `&mut self`; one instance serves one document from one writer.
///
/// ~~~
/// use xmltv::{XmltvEvent, XmltvParser};
///
/// let mut parser = XmltvParser::new();
/// let mut titles = Vec::new();
/// for chunk in &["<tv><programme channel='bbc1'><ti", "tle>News</title></programme></tv>"] {
///     parser.feed_str(chunk);
///     for event in &mut parser {
///         if let XmltvEvent::Programme(programme) = event.unwrap() {
///             titles.extend(programme.title);
///         }
///     }
/// }
/// parser.finish();
/// assert_eq!(parser.next().map(Result::ok), Some(Some(XmltvEvent::End)));
/// assert_eq!(titles, vec!["News"]);
/// ~~~
pub struct XmltvParser<T = Parser> {
    tokens: T,
    builder: RecordBuilder,
    state: StreamState,
}

impl Default for XmltvParser<Parser> {
    fn default() -> XmltvParser<Parser> {
        XmltvParser::new()
    }
}

impl XmltvParser<Parser> {
    /// Returns a new `XmltvParser` using the default settings
    pub fn new() -> XmltvParser<Parser> {
        XmltvParser::with_settings(&ParserSettings::default())
    }

    /// Returns a new `XmltvParser` using the given settings
    pub fn with_settings(settings: &ParserSettings) -> XmltvParser<Parser> {
        XmltvParser::from_source(Parser::new(), settings)
    }

    /// Parses a complete document, collecting all records
    pub fn parse_str(input: &str) -> Result<Vec<Record>> {
        let mut parser = XmltvParser::new();
        parser.feed_str(input);
        parser.finish();
        parser
            .filter_map(|event| event.map(XmltvEvent::into_record).transpose())
            .collect()
    }
}

impl<T: TokenSource> XmltvParser<T> {
    /// Returns a new `XmltvParser` pulling events from `tokens`
    pub fn from_source(tokens: T, settings: &ParserSettings) -> XmltvParser<T> {
        XmltvParser {
            tokens,
            builder: RecordBuilder::with_settings(settings),
            state: StreamState::Running,
        }
    }

    /// Feeds a chunk of the document
    pub fn feed_str(&mut self, chunk: &str) {
        self.tokens.feed_str(chunk);
    }

    /// Signals that the whole document has been fed
    pub fn finish(&mut self) {
        self.tokens.finish();
    }

    /// The record builder, e.g. to inspect the record under construction
    pub fn builder(&self) -> &RecordBuilder {
        &self.builder
    }
}

impl<T: TokenSource> Iterator for XmltvParser<T> {
    type Item = Result<XmltvEvent>;

    fn next(&mut self) -> Option<Result<XmltvEvent>> {
        if self.state != StreamState::Running {
            return None;
        }

        loop {
            match self.tokens.next() {
                Some(Ok(event)) => {
                    if let Some(record) = self.builder.handle_event(event) {
                        return Some(Ok(XmltvEvent::from(record)));
                    }
                }
                Some(Err(err)) => {
                    debug!("Stopping on malformed input: {}", err);
                    self.state = StreamState::Failed;
                    return Some(Err(Error::from(err)));
                }
                None if self.tokens.is_finished() => {
                    self.state = StreamState::Ended;
                    return Some(Ok(XmltvEvent::End));
                }
                None => return None,
            }
        }
    }
}
