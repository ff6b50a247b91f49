// xmltv
// Copyright 2015-2026 xmltv developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

#![crate_name = "xmltv"]
#![crate_type = "lib"]
#![deny(non_camel_case_types)]
#![warn(missing_docs)]
// Required for benchmarks
#![cfg_attr(feature = "bench", feature(test))]

/*!
 * A streaming parser for XMLTV program-guide documents.
 *
 * Input is fed in arbitrarily sized chunks; completed `Channel` and
 * `Programme` records are pulled from the parser as soon as their closing
 * tag has been read.
 *
 * ~~~
 * use xmltv::{XmltvEvent, XmltvParser};
 *
 * let mut parser = XmltvParser::new();
 * parser.feed_str("<tv><channel id='bbc1'><display-name>BBC One</display-name>");
 * parser.feed_str("</channel></tv>");
 * parser.finish();
 * for event in parser {
 *     match event {
 *         Ok(XmltvEvent::Channel(channel)) => println!("{:?}", channel.display_name),
 *         Ok(_) => (),
 *         Err(err) => panic!("{}", err),
 *     }
 * }
 * ~~~
 */

pub use crate::builder::{Record, RecordBuilder};
pub use crate::context::{ContextStack, Node};
pub use crate::error::{Error, Result};
pub use crate::parser::{Event, Parser, ParserError, TokenSource};
pub use crate::reader::ReadRecords;
pub use crate::record::{
    xmltv_ns_season, Channel, Credit, CreditKind, EpisodeNum, Icon, Image, ImageSize, Programme,
    Rating,
};
pub use crate::settings::{ParserSettings, DEFAULT_TIME_FORMAT};
pub use crate::stream::{XmltvEvent, XmltvParser};
pub use crate::time::{TimeError, TimeFormat, TimestampResolver};

use std::char;

mod builder;
mod context;
mod error;
pub mod fields;
mod parser;
mod reader;
mod record;
mod settings;
mod stream;
mod time;

/// Attribute map of an element, keyed by attribute name
#[cfg(not(feature = "ordered_attrs"))]
pub type AttributeMap = std::collections::HashMap<String, String>;

/// Attribute map of an element, keyed by attribute name, in document order
#[cfg(feature = "ordered_attrs")]
pub type AttributeMap = indexmap::IndexMap<String, String>;

#[inline]
/// Unescapes all valid XML entities in a string.
/// Returns the first invalid entity on failure.
pub fn unescape(input: &str) -> std::result::Result<String, String> {
    let mut result = String::with_capacity(input.len());

    let mut it = input.split('&');

    // Push everything before the first '&'
    if let Some(sub) = it.next() {
        result.push_str(sub);
    }

    for sub in it {
        let idx = match sub.find(';') {
            Some(idx) => idx,
            None => return Err(format!("&{}", sub)),
        };
        let ent = &sub[..idx];
        match ent {
            "quot" => result.push('"'),
            "apos" => result.push('\''),
            "gt" => result.push('>'),
            "lt" => result.push('<'),
            "amp" => result.push('&'),
            ent => {
                let val = if let Some(hex) = ent.strip_prefix("#x") {
                    u32::from_str_radix(hex, 16).ok()
                } else if let Some(dec) = ent.strip_prefix('#') {
                    dec.parse::<u32>().ok()
                } else {
                    None
                };
                match val.and_then(char::from_u32) {
                    Some(c) => result.push(c),
                    None => return Err(format!("&{};", ent)),
                }
            }
        }
        result.push_str(&sub[idx + 1..]);
    }
    Ok(result)
}

#[derive(PartialEq, Eq, Debug, Clone)]
/// Structure describing an opening tag
pub struct StartTag {
    /// The tag's name, lower-cased
    pub name: String,
    /// The tag's attributes
    pub attributes: AttributeMap,
}

impl StartTag {
    /// Returns a `StartTag` without attributes
    pub fn new<S: Into<String>>(name: S) -> StartTag {
        StartTag {
            name: name.into(),
            attributes: AttributeMap::default(),
        }
    }

    /// Adds an attribute, returning the tag for chaining
    pub fn with_attr<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> StartTag {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Looks up the value of an attribute
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}

#[derive(PartialEq, Eq, Debug, Clone)]
/// Structure describing a closing tag
pub struct EndTag {
    /// The tag's name, lower-cased
    pub name: String,
}

impl EndTag {
    /// Returns an `EndTag` for the given name
    pub fn new<S: Into<String>>(name: S) -> EndTag {
        EndTag { name: name.into() }
    }
}
