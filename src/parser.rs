// xmltv
// Copyright 2015-2026 xmltv developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// The parser herein is derived from OFXMLParser as included with
// ObjFW, Copyright (c) 2008-2013 Jonathan Schleifer.
// Permission to license this derived work under MIT license has been granted by ObjFW's author.

use super::{unescape, AttributeMap, EndTag, StartTag};
use log::warn;
use std::collections::VecDeque;
use std::iter::Iterator;
use std::mem;
use thiserror::Error;

#[derive(PartialEq, Eq, Debug, Clone)]
/// Events returned by the `Parser`
pub enum Event {
    /// Event indicating a start tag was found
    ElementStart(StartTag),
    /// Event indicating a end tag was found
    ElementEnd(EndTag),
    /// Event indicating non-blank character data was found, already trimmed
    Characters(String),
}

#[derive(PartialEq, Eq, Debug, Clone, Error)]
#[error("Parse error; Line: {line}, Column: {col}, Reason: {msg}")]
/// The structure returned, when erroneous XML is read
pub struct ParserError {
    /// The line number at which the error occurred
    pub line: u32,
    /// The column number at which the error occurred
    pub col: u32,
    /// A message describing the type of the error
    pub msg: &'static str,
}

/// A push-fed producer of `Event`s.
///
/// Input is handed over in chunks through `feed_str()`; events are pulled by
/// iterating. `None` from the iterator means either "feed more input" or,
/// once `finish()` was called and `is_finished()` holds, the end of the
/// document.
pub trait TokenSource: Iterator<Item = Result<Event, ParserError>> {
    /// Appends a chunk of input
    fn feed_str(&mut self, data: &str);
    /// Signals that no more input will be fed
    fn finish(&mut self);
    /// Whether the end of input was signalled and all input has been consumed
    fn is_finished(&self) -> bool;
}

// Event based parser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    OutsideTag,
    TagOpened,
    InProcessingInstructions,
    InTagName,
    InCloseTagName,
    InTag,
    InAttrName,
    InAttrValue,
    ExpectDelimiter,
    ExpectClose,
    ExpectSpaceOrClose,
    InExclamationMark,
    InCDATAOpening,
    InCDATA,
    InCommentOpening,
    InComment1,
    InComment2,
    InDoctype,
}

/// A streaming XML tokenizer
///
/// Data is fed to the parser using the `feed_str()` method.
/// The `Event`s, and `ParserError`s generated while parsing the string
/// can be requested by iterating over the parser.
///
/// Tag names are lower-cased and character data is trimmed; comments,
/// processing instructions and the DOCTYPE are skipped, and CDATA sections
/// are merged into the surrounding character data.
///
/// ~~~
/// use xmltv::{Event, Parser};
///
/// let mut p = Parser::new();
/// p.feed_str("<title lang='en'>News</ti");
/// p.feed_str("tle>");
/// p.finish();
/// for event in p {
///     match event {
///        Ok(Event::Characters(text)) => assert_eq!(text, "News"),
///        Ok(_) => (),
///        Err(e) => panic!("{}", e),
///     }
/// }
/// ~~~
pub struct Parser {
    line: u32,
    col: u32,
    has_error: bool,
    finished: bool,
    done: bool,
    data: VecDeque<char>,
    buf: String,
    text: String,
    attributes: AttributeMap,
    open: Vec<String>,
    st: State,
    name: Option<String>,
    attr: Option<String>,
    delim: Option<char>,
    level: u8,
}

impl Default for Parser {
    fn default() -> Parser {
        Parser::new()
    }
}

impl Parser {
    /// Returns a new `Parser`
    pub fn new() -> Parser {
        Parser {
            line: 1,
            col: 0,
            has_error: false,
            finished: false,
            done: false,
            data: VecDeque::with_capacity(4096),
            buf: String::new(),
            text: String::new(),
            attributes: AttributeMap::default(),
            open: Vec::new(),
            st: State::OutsideTag,
            name: None,
            attr: None,
            delim: None,
            level: 0,
        }
    }

    /// Feeds a string slice to the parser
    pub fn feed_str(&mut self, data: &str) {
        if self.finished {
            warn!("Input fed after end of input was signalled, ignoring");
            return;
        }
        self.data.extend(data.chars());
    }

    /// Signals the end of input.
    ///
    /// Once the buffered input is consumed, unclosed constructs are reported
    /// as errors and iteration ends.
    pub fn finish(&mut self) {
        self.finished = true;
    }

    /// Whether the end of input was signalled and all input has been consumed
    pub fn is_finished(&self) -> bool {
        self.finished && self.data.is_empty()
    }

    /// Depth of currently open elements
    pub fn depth(&self) -> usize {
        self.open.len()
    }
}

impl TokenSource for Parser {
    fn feed_str(&mut self, data: &str) {
        Parser::feed_str(self, data)
    }

    fn finish(&mut self) {
        Parser::finish(self)
    }

    fn is_finished(&self) -> bool {
        Parser::is_finished(self)
    }
}

impl Iterator for Parser {
    type Item = Result<Event, ParserError>;

    fn next(&mut self) -> Option<Result<Event, ParserError>> {
        if self.has_error || self.done {
            return None;
        }

        loop {
            let c = match self.data.pop_front() {
                Some(c) => c,
                None => return self.end_of_input(),
            };

            if c == '\n' {
                self.line += 1;
                self.col = 0;
            } else {
                self.col += 1;
            }

            match self.parse_character(c) {
                Ok(None) => continue,
                Ok(Some(event)) => {
                    return Some(Ok(event));
                }
                Err(e) => {
                    self.has_error = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

#[inline]
fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

#[inline]
fn normalize_name(name: String) -> String {
    if name.chars().any(char::is_uppercase) {
        name.to_lowercase()
    } else {
        name
    }
}

fn unescape_owned(input: String) -> Result<String, String> {
    if input.find('&').is_none() {
        Ok(input)
    } else {
        unescape(&input)
    }
}

impl Parser {
    fn take_buf(&mut self) -> String {
        self.buf.split_off(0)
    }

    fn error(&self, msg: &'static str) -> Result<Option<Event>, ParserError> {
        Err(ParserError {
            line: self.line,
            col: self.col,
            msg,
        })
    }

    // Called when the buffered input ran dry
    fn end_of_input(&mut self) -> Option<Result<Event, ParserError>> {
        if !self.finished {
            return None;
        }
        self.done = true;

        let result = if self.st != State::OutsideTag {
            self.error("Unexpected end of input")
        } else if !self.open.is_empty() {
            self.error("Unclosed element at end of input")
        } else if !self.buf.trim().is_empty() {
            self.error("Text outside of root element")
        } else {
            Ok(None)
        };

        match result {
            Ok(_) => None,
            Err(e) => {
                self.has_error = true;
                Some(Err(e))
            }
        }
    }

    // Hands out the character data collected since the last tag
    fn take_text(&mut self) -> Result<Option<Event>, ParserError> {
        let text = mem::replace(&mut self.text, String::new());
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        if self.open.is_empty() {
            return self.error("Text outside of root element");
        }
        if trimmed.len() == text.len() {
            Ok(Some(Event::Characters(text)))
        } else {
            Ok(Some(Event::Characters(trimmed.to_owned())))
        }
    }

    fn start_element(&mut self, name: String, c: char) -> Result<Option<Event>, ParserError> {
        let attributes = mem::replace(&mut self.attributes, AttributeMap::default());
        self.open.push(name.clone());
        self.st = if c == '/' {
            self.name = Some(name.clone());
            State::ExpectClose
        } else {
            State::OutsideTag
        };
        Ok(Some(Event::ElementStart(StartTag { name, attributes })))
    }

    fn end_element(&mut self, name: String) -> Result<Option<Event>, ParserError> {
        match self.open.pop() {
            Some(ref open) if *open == name => Ok(Some(Event::ElementEnd(EndTag { name }))),
            _ => self.error("Unexpected closing tag"),
        }
    }

    fn parse_character(&mut self, c: char) -> Result<Option<Event>, ParserError> {
        match self.st {
            State::OutsideTag => self.outside_tag(c),
            State::TagOpened => self.tag_opened(c),
            State::InProcessingInstructions => self.in_processing_instructions(c),
            State::InTagName => self.in_tag_name(c),
            State::InCloseTagName => self.in_close_tag_name(c),
            State::InTag => self.in_tag(c),
            State::InAttrName => self.in_attr_name(c),
            State::InAttrValue => self.in_attr_value(c),
            State::ExpectDelimiter => self.expect_delimiter(c),
            State::ExpectClose => self.expect_close(c),
            State::ExpectSpaceOrClose => self.expect_space_or_close(c),
            State::InExclamationMark => self.in_exclamation_mark(c),
            State::InCDATAOpening => self.in_cdata_opening(c),
            State::InCDATA => self.in_cdata(c),
            State::InCommentOpening => self.in_comment_opening(c),
            State::InComment1 => self.in_comment1(c),
            State::InComment2 => self.in_comment2(c),
            State::InDoctype => self.in_doctype(c),
        }
    }

    // Outside any tag, or other construct
    // '<' => TagOpened, moving the unescaped buffer into the text
    fn outside_tag(&mut self, c: char) -> Result<Option<Event>, ParserError> {
        match c {
            '<' => {
                self.st = State::TagOpened;
                if !self.buf.is_empty() {
                    match unescape_owned(self.take_buf()) {
                        Ok(unescaped) => self.text.push_str(&unescaped),
                        Err(_) => return self.error("Found invalid entity"),
                    }
                }
            }
            _ => self.buf.push(c),
        }
        Ok(None)
    }

    // Character following a '<', starting a tag or other construct
    // '?' => InProcessingInstructions
    // '!' => InExclamationMark
    // '/' => InCloseTagName, producing Event::Characters
    //  _  => InTagName, producing Event::Characters
    fn tag_opened(&mut self, c: char) -> Result<Option<Event>, ParserError> {
        match c {
            '?' => self.st = State::InProcessingInstructions,
            '!' => self.st = State::InExclamationMark,
            '/' => {
                self.st = State::InCloseTagName;
                return self.take_text();
            }
            '>' => return self.error("Empty tag"),
            c if is_space(c) => return self.error("Whitespace before tag name"),
            _ => {
                self.buf.push(c);
                self.st = State::InTagName;
                return self.take_text();
            }
        }
        Ok(None)
    }

    // Inside a processing instruction, content is discarded
    // '?' '>' => OutsideTag
    fn in_processing_instructions(&mut self, c: char) -> Result<Option<Event>, ParserError> {
        match c {
            '?' => self.level = 1,
            '>' if self.level == 1 => {
                self.level = 0;
                self.st = State::OutsideTag;
            }
            _ => self.level = 0,
        }
        Ok(None)
    }

    // Inside a tag name (opening tag)
    // '/' => ExpectClose, producing Event::ElementStart
    // '>' => OutsideTag, producing Event::ElementStart
    // ' ' or '\t' or '\r' or '\n' => InTag
    fn in_tag_name(&mut self, c: char) -> Result<Option<Event>, ParserError> {
        match c {
            '/' | '>' => {
                let name = normalize_name(self.take_buf());
                return self.start_element(name, c);
            }
            c if is_space(c) => {
                self.name = Some(normalize_name(self.take_buf()));
                self.st = State::InTag;
            }
            _ => self.buf.push(c),
        }
        Ok(None)
    }

    // Inside a tag name (closing tag)
    // '>' => OutsideTag, producing ElementEnd
    // ' ' or '\t' or '\r' or '\n' => ExpectSpaceOrClose, producing ElementEnd
    fn in_close_tag_name(&mut self, c: char) -> Result<Option<Event>, ParserError> {
        match c {
            '>' => {
                self.st = State::OutsideTag;
                let name = normalize_name(self.take_buf());
                self.end_element(name)
            }
            c if is_space(c) => {
                self.st = State::ExpectSpaceOrClose;
                let name = normalize_name(self.take_buf());
                self.end_element(name)
            }
            _ => {
                self.buf.push(c);
                Ok(None)
            }
        }
    }

    // Inside a tag, parsing attributes
    // '/' => ExpectClose, producing StartTag
    // '>' => OutsideTag, producing StartTag
    // ' ' or '\t' or '\r' or '\n' => InAttrName
    fn in_tag(&mut self, c: char) -> Result<Option<Event>, ParserError> {
        match c {
            '/' | '>' => {
                let name = match self.name.take() {
                    Some(name) => name,
                    None => return self.error("Internal error: No element name set"),
                };
                return self.start_element(name, c);
            }
            c if is_space(c) => (),
            _ => {
                self.buf.push(c);
                self.st = State::InAttrName;
            }
        }
        Ok(None)
    }

    // Inside an attribute name
    // '=' => ExpectDelimiter
    fn in_attr_name(&mut self, c: char) -> Result<Option<Event>, ParserError> {
        match c {
            '=' => {
                self.level = 0;
                self.attr = Some(self.take_buf());
                self.st = State::ExpectDelimiter;
            }
            '/' | '>' => return self.error("Attribute without value"),
            c if is_space(c) => self.level = 1,
            _ if self.level == 0 => self.buf.push(c),
            _ => return self.error("Space occured in attribute name"),
        }
        Ok(None)
    }

    // Inside an attribute value
    // delimiter => InTag, adds attribute
    fn in_attr_value(&mut self, c: char) -> Result<Option<Event>, ParserError> {
        if Some(c) != self.delim {
            self.buf.push(c);
            return Ok(None);
        }

        self.delim = None;
        self.st = State::InTag;
        let name = match self.attr.take() {
            Some(name) => name,
            None => return self.error("Internal error: No attribute name set"),
        };
        let value = match unescape_owned(self.take_buf()) {
            Ok(unescaped) => unescaped,
            Err(_) => return self.error("Found invalid entity"),
        };
        if self.attributes.insert(name, value).is_some() {
            return self.error("Duplicate attribute");
        }
        Ok(None)
    }

    // Looking for an attribute value delimiter
    // '"' or '\'' => InAttrValue, sets delimiter
    fn expect_delimiter(&mut self, c: char) -> Result<Option<Event>, ParserError> {
        match c {
            '"' | '\'' => {
                self.delim = Some(c);
                self.st = State::InAttrValue;
            }
            c if is_space(c) => (),
            _ => return self.error("Attribute value not enclosed in ' or \""),
        }
        Ok(None)
    }

    // Expect closing '>' of an empty-element tag (no whitespace allowed)
    // '>' => OutsideTag, producing ElementEnd
    fn expect_close(&mut self, c: char) -> Result<Option<Event>, ParserError> {
        match c {
            '>' => {
                self.st = State::OutsideTag;
                let name = match self.name.take() {
                    Some(name) => name,
                    None => return self.error("Internal error: No element name set"),
                };
                self.end_element(name)
            }
            _ => self.error("Expected '>' to close tag"),
        }
    }

    // Expect closing '>' of an end tag
    // '>' => OutsideTag
    fn expect_space_or_close(&mut self, c: char) -> Result<Option<Event>, ParserError> {
        match c {
            c if is_space(c) => Ok(None),
            '>' => {
                self.st = State::OutsideTag;
                Ok(None)
            }
            _ => self.error("Expected '>' to close tag, or LWS"),
        }
    }

    // After an '!' trying to determine the type of the following construct
    // '-' => InCommentOpening
    // '[' => InCDATAOpening
    // 'D' => InDoctype
    fn in_exclamation_mark(&mut self, c: char) -> Result<Option<Event>, ParserError> {
        self.level = 0;
        self.st = match c {
            '-' => State::InCommentOpening,
            '[' => State::InCDATAOpening,
            'D' => State::InDoctype,
            _ => return self.error("Malformed XML"),
        };
        Ok(None)
    }

    // Opening sequence of a CDATA section
    // 'C' 'D' 'A' 'T' 'A' '[' => InCDATA
    fn in_cdata_opening(&mut self, c: char) -> Result<Option<Event>, ParserError> {
        static CDATA_PATTERN: [char; 6] = ['C', 'D', 'A', 'T', 'A', '['];
        if c == CDATA_PATTERN[self.level as usize] {
            self.level += 1;
        } else {
            return self.error("Invalid CDATA opening sequence");
        }

        if self.level == 6 {
            self.level = 0;
            self.st = State::InCDATA;
        }
        Ok(None)
    }

    // Inside CDATA, content is appended verbatim to the text
    // ']' ']' '>' => OutsideTag
    fn in_cdata(&mut self, c: char) -> Result<Option<Event>, ParserError> {
        match c {
            // Only the last two ']' matter
            ']' => {
                self.buf.push(c);
                self.level = self.level.saturating_add(1);
            }
            '>' if self.level >= 2 => {
                self.st = State::OutsideTag;
                self.level = 0;
                let len = self.buf.len();
                self.buf.truncate(len - 2);
                let buf = self.take_buf();
                self.text.push_str(&buf);
            }
            _ => {
                self.buf.push(c);
                self.level = 0;
            }
        }
        Ok(None)
    }

    // Opening sequence of a comment
    // '-' => InComment1
    fn in_comment_opening(&mut self, c: char) -> Result<Option<Event>, ParserError> {
        if c == '-' {
            self.st = State::InComment1;
            self.level = 0;
            Ok(None)
        } else {
            self.error("Expected 2nd '-' to start comment")
        }
    }

    // Inside a comment, content is discarded
    // '-' '-' => InComment2
    fn in_comment1(&mut self, c: char) -> Result<Option<Event>, ParserError> {
        if c == '-' {
            self.level += 1;
        } else {
            self.level = 0;
        }

        if self.level == 2 {
            self.level = 0;
            self.st = State::InComment2;
        }
        Ok(None)
    }

    // Closing a comment
    // '>' => OutsideTag
    fn in_comment2(&mut self, c: char) -> Result<Option<Event>, ParserError> {
        if c != '>' {
            self.error("No more than one adjacent '-' allowed in a comment")
        } else {
            self.st = State::OutsideTag;
            Ok(None)
        }
    }

    // Inside a doctype, an internal subset in '[' ']' may contain '>'
    // '>' after appropriate opening => OutsideTag
    fn in_doctype(&mut self, c: char) -> Result<Option<Event>, ParserError> {
        static DOCTYPE_PATTERN: [char; 6] = ['O', 'C', 'T', 'Y', 'P', 'E'];
        match self.level {
            0..=5 => {
                if c == DOCTYPE_PATTERN[self.level as usize] {
                    self.level += 1;
                } else {
                    return self.error("Invalid DOCTYPE");
                }
            }
            6 => {
                if !is_space(c) {
                    return self.error("Invalid DOCTYPE");
                }
                self.level += 1;
            }
            8 if c == ']' => self.level = 7,
            8 => (),
            _ if c == '[' => self.level = 8,
            _ if c == '>' => {
                self.level = 0;
                self.st = State::OutsideTag;
            }
            _ => (),
        }
        Ok(None)
    }
}
