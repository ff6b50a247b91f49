// xmltv
// Copyright 2015-2026 xmltv developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::error::{Error, Result};
use crate::settings::ParserSettings;
use crate::stream::{XmltvEvent, XmltvParser};
use log::trace;
use std::io::{ErrorKind, Read};
use std::str;

const CHUNK_SIZE: usize = 8 * 1024;

/// Streams records out of a UTF-8 encoded reader
///
/// The reader is consumed in fixed-size chunks as records are pulled, so
/// memory use does not depend on the size of the document.
///
/// ~~~
/// use xmltv::{ReadRecords, XmltvEvent};
///
/// let doc: &[u8] = b"<tv><channel id='bbc1'/></tv>";
/// let events: Vec<_> = ReadRecords::new(doc).collect::<Result<_, _>>().unwrap();
/// assert_eq!(events.len(), 2);
/// assert_eq!(events[1], XmltvEvent::End);
/// ~~~
pub struct ReadRecords<R> {
    reader: R,
    parser: XmltvParser,
    pending: Vec<u8>,
    offset: u64,
    eof: bool,
    failed: bool,
}

impl<R: Read> ReadRecords<R> {
    /// Returns a new `ReadRecords` using the default settings
    pub fn new(reader: R) -> ReadRecords<R> {
        ReadRecords::with_settings(reader, &ParserSettings::default())
    }

    /// Returns a new `ReadRecords` using the given settings
    pub fn with_settings(reader: R, settings: &ParserSettings) -> ReadRecords<R> {
        ReadRecords {
            reader,
            parser: XmltvParser::with_settings(settings),
            pending: Vec::new(),
            offset: 0,
            eof: false,
            failed: false,
        }
    }

    /// Number of bytes handed to the parser so far
    pub fn bytes_consumed(&self) -> u64 {
        self.offset
    }

    // Reads one chunk and feeds its complete characters to the parser.
    // A multi-byte sequence cut by the chunk boundary waits for the next read.
    fn fill(&mut self) -> Result<()> {
        let mut chunk = [0u8; CHUNK_SIZE];
        let read = loop {
            match self.reader.read(&mut chunk) {
                Ok(read) => break read,
                Err(ref e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(Error::Io(e)),
            }
        };
        trace!("Read {} bytes at offset {}", read, self.offset);

        if read == 0 {
            self.eof = true;
            if !self.pending.is_empty() {
                return Err(Error::InvalidUtf8 {
                    offset: self.offset,
                });
            }
            self.parser.finish();
            return Ok(());
        }

        self.pending.extend_from_slice(&chunk[..read]);
        let valid = match str::from_utf8(&self.pending) {
            Ok(text) => {
                self.parser.feed_str(text);
                text.len()
            }
            Err(err) if err.error_len().is_some() => {
                return Err(Error::InvalidUtf8 {
                    offset: self.offset + err.valid_up_to() as u64,
                });
            }
            Err(err) => {
                let valid = err.valid_up_to();
                if let Ok(text) = str::from_utf8(&self.pending[..valid]) {
                    self.parser.feed_str(text);
                }
                valid
            }
        };
        self.pending.drain(..valid);
        self.offset += valid as u64;
        Ok(())
    }
}

impl<R: Read> Iterator for ReadRecords<R> {
    type Item = Result<XmltvEvent>;

    fn next(&mut self) -> Option<Result<XmltvEvent>> {
        if self.failed {
            return None;
        }

        loop {
            if let Some(item) = self.parser.next() {
                self.failed = item.is_err();
                return Some(item);
            }
            if self.eof {
                return None;
            }
            if let Err(err) = self.fill() {
                self.failed = true;
                return Some(Err(err));
            }
        }
    }
}

#[cfg(test)]
mod reader_tests {
    use super::ReadRecords;
    use crate::error::Error;
    use crate::stream::XmltvEvent;
    use std::io::{self, Read};

    // Hands out one byte per read
    struct Trickle<'a>(&'a [u8]);

    impl<'a> Read for Trickle<'a> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.0.split_first() {
                Some((&first, rest)) if !buf.is_empty() => {
                    buf[0] = first;
                    self.0 = rest;
                    Ok(1)
                }
                _ => Ok(0),
            }
        }
    }

    struct Broken;

    impl Read for Broken {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk on fire"))
        }
    }

    #[test]
    fn test_multibyte_characters_across_reads() {
        let doc = "<tv><channel id='tf1'><display-name>Télé Één ✓</display-name></channel></tv>";
        let mut records = ReadRecords::new(Trickle(doc.as_bytes()));
        match records.next() {
            Some(Ok(XmltvEvent::Channel(channel))) => {
                assert_eq!(channel.display_name.as_deref(), Some("Télé Één ✓"))
            }
            other => panic!("expected a channel, got {:?}", other),
        }
        assert!(matches!(records.next(), Some(Ok(XmltvEvent::End))));
        assert!(records.next().is_none());
        assert_eq!(records.bytes_consumed(), doc.len() as u64);
    }

    #[test]
    fn test_invalid_utf8() {
        let doc: &[u8] = b"<tv><channel id='\xff'/></tv>";
        let items: Vec<_> = ReadRecords::new(doc).collect();
        assert_eq!(items.len(), 1);
        assert!(matches!(items[0], Err(Error::InvalidUtf8 { offset: 17 })));
    }

    #[test]
    fn test_truncated_utf8_at_eof() {
        let doc: &[u8] = b"<tv>\xc3";
        let items: Vec<_> = ReadRecords::new(Trickle(doc)).collect();
        assert!(matches!(items[..], [Err(Error::InvalidUtf8 { offset: 4 })]));
    }

    #[test]
    fn test_io_error() {
        let items: Vec<_> = ReadRecords::new(Broken).collect();
        assert_eq!(items.len(), 1);
        assert!(matches!(items[0], Err(Error::Io(_))));
    }
}
