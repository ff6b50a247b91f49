// xmltv
// Copyright 2015-2026 xmltv developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use super::{EndTag, StartTag};
use crate::context::{ContextStack, Node};
use crate::fields::{LengthUnit, TextField};
use crate::parser::Event;
use crate::record::{
    Channel, Credit, CreditKind, EpisodeNum, Icon, Image, ImageSize, Programme, Rating,
};
use crate::settings::ParserSettings;
use crate::time::TimestampResolver;
use log::{debug, trace, warn};
use serde::Serialize;

#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
/// A completed record, handed out when its closing tag is seen
pub enum Record {
    /// A closed `<channel>`
    Channel(Channel),
    /// A closed `<programme>`
    Programme(Programme),
}

/// Builds `Channel`s and `Programme`s from `Event`s as produced by `Parser`
///
/// A channel and a programme are tracked independently, so a programme
/// opened inside a channel does not end the channel.
///
/// ~~~
/// use xmltv::{Parser, Record, RecordBuilder};
///
/// let mut parser = Parser::new();
/// let mut builder = RecordBuilder::new();
///
/// parser.feed_str("<tv><channel id='bbc1'/></tv>");
/// for event in parser {
///     if let Some(Record::Channel(channel)) = builder.handle_event(event.unwrap()) {
///         assert_eq!(channel.name.as_deref(), Some("bbc1"));
///     }
/// }
/// ~~~
#[derive(Debug)]
pub struct RecordBuilder {
    context: ContextStack,
    channel: Option<Channel>,
    programme: Option<Programme>,
    resolver: TimestampResolver,
}

impl Default for RecordBuilder {
    fn default() -> RecordBuilder {
        RecordBuilder::new()
    }
}

impl RecordBuilder {
    /// Returns a new `RecordBuilder` using the default settings
    pub fn new() -> RecordBuilder {
        RecordBuilder::with_settings(&ParserSettings::default())
    }

    /// Returns a new `RecordBuilder` resolving timestamps as configured
    pub fn with_settings(settings: &ParserSettings) -> RecordBuilder {
        RecordBuilder {
            context: ContextStack::new(),
            channel: None,
            programme: None,
            resolver: TimestampResolver::new(settings),
        }
    }

    /// The currently open elements
    pub fn context(&self) -> &ContextStack {
        &self.context
    }

    /// The channel under construction, if any
    pub fn active_channel(&self) -> Option<&Channel> {
        self.channel.as_ref()
    }

    /// The programme under construction, if any
    pub fn active_programme(&self) -> Option<&Programme> {
        self.programme.as_ref()
    }

    /// Let the builder process an `Event`.
    ///
    /// Returns the completed record when the event closes a `<channel>` or
    /// `<programme>`, `None` otherwise.
    pub fn handle_event(&mut self, event: Event) -> Option<Record> {
        trace!("{:?}", event);
        match event {
            Event::ElementStart(tag) => {
                self.open(tag);
                None
            }
            Event::Characters(text) => {
                self.text(text);
                None
            }
            Event::ElementEnd(tag) => self.close(tag),
        }
    }

    fn open(&mut self, tag: StartTag) {
        match tag.name.as_str() {
            "channel" => {
                let channel = Channel {
                    name: owned_attr(&tag, "id"),
                    ..Channel::default()
                };
                if let Some(old) = self.channel.replace(channel) {
                    warn!("Discarding unclosed channel {:?}", old.name);
                }
            }
            "programme" => {
                // Absent attributes resolve like malformed ones
                let programme = Programme {
                    channel: owned_attr(&tag, "channel"),
                    start: self.resolver.resolve(tag.attr("start").unwrap_or("")),
                    end: self.resolver.resolve(tag.attr("stop").unwrap_or("")),
                    ..Programme::default()
                };
                if let Some(old) = self.programme.replace(programme) {
                    warn!("Discarding unclosed programme on {:?}", old.channel);
                }
            }
            "display-name" => {
                if let Some(ref mut channel) = self.channel {
                    if let Some(src) = owned_attr(&tag, "src") {
                        channel.display_name = Some(src);
                    }
                }
            }
            "icon" => {
                if let Some(ref mut programme) = self.programme {
                    programme.icon.push(Icon {
                        src: owned_attr(&tag, "src"),
                        width: non_empty_attr(&tag, "width"),
                        height: non_empty_attr(&tag, "height"),
                    });
                } else if let Some(ref mut channel) = self.channel {
                    if let Some(src) = owned_attr(&tag, "src") {
                        channel.icon = Some(src);
                    }
                }
            }
            _ => (),
        }
        self.context.push(tag);
    }

    fn text(&mut self, text: String) {
        let node = match self.context.current() {
            Some(node) => node,
            None => return,
        };
        if node.name == "display-name" {
            if let Some(ref mut channel) = self.channel {
                channel.display_name = Some(text);
                return;
            }
        }
        if let Some(ref mut programme) = self.programme {
            programme_text(programme, node, self.context.parent(), text);
        }
    }

    fn close(&mut self, tag: EndTag) -> Option<Record> {
        self.context.pop();
        match tag.name.as_str() {
            "channel" => {
                let channel = self.channel.take()?;
                debug!("Completed channel {:?}", channel.name);
                Some(Record::Channel(channel))
            }
            "programme" => {
                let programme = self.programme.take()?;
                debug!(
                    "Completed programme {:?} on {:?}",
                    programme.title.first(),
                    programme.channel
                );
                Some(Record::Programme(programme))
            }
            _ => None,
        }
    }
}

fn owned_attr(tag: &StartTag, key: &str) -> Option<String> {
    tag.attr(key).map(str::to_owned)
}

fn non_empty_attr(tag: &StartTag, key: &str) -> Option<String> {
    tag.attr(key).filter(|v| !v.is_empty()).map(str::to_owned)
}

// Applies the text of the innermost open element to the programme
fn programme_text(programme: &mut Programme, node: &Node, parent: Option<&Node>, text: String) {
    let tag = node.name.as_str();

    if let Some(field) = TextField::from_tag(tag) {
        programme.text_mut(field).push(text);
        return;
    }
    if let Some(kind) = CreditKind::from_tag(tag) {
        let role = match kind {
            CreditKind::Actor => node.non_empty_attr("role").map(str::to_owned),
            _ => None,
        };
        programme.credits.push(Credit {
            kind,
            role,
            name: text,
        });
        return;
    }
    if let Some(size) = ImageSize::from_tag(tag) {
        programme.images.push(Image { size, url: text });
        return;
    }

    match tag {
        "length" => {
            let units = node.attr("units");
            match units.and_then(LengthUnit::from_units) {
                Some(unit) => match unit.to_seconds(&text) {
                    Some(seconds) => programme.length = Some(seconds),
                    None => debug!("Ignoring <length> of {:?} {:?}", text, units),
                },
                None => debug!("Ignoring <length> with units {:?}", units),
            }
        }
        "episode-num" => programme.episode_num.push(EpisodeNum {
            system: node.attr("system").map(str::to_owned),
            value: text,
        }),
        "date" => {
            // Last well-formed date wins
            if let Some(year) = parse_year(&text) {
                programme.date = Some(year);
            }
        }
        "value" => {
            if let Some(rating) = parent.filter(|p| p.name == "rating") {
                programme.rating.push(Rating {
                    system: rating.attr("system").map(str::to_owned),
                    value: text,
                });
            }
        }
        _ => (),
    }
}

// A date needs four consecutive digits somewhere; the year is the leading
// integer of the text
fn parse_year(text: &str) -> Option<i64> {
    let has_year = text
        .as_bytes()
        .windows(4)
        .any(|w| w.iter().all(u8::is_ascii_digit));
    if !has_year {
        return None;
    }

    let text = text.trim_start();
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, text.strip_prefix('+').unwrap_or(text)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or_else(|| digits.len());
    digits[..end].parse::<i64>().ok().map(|year| sign * year)
}
