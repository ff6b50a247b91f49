// xmltv
// Copyright 2015-2026 xmltv developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::fields::TextField;
use jiff::Timestamp;
use serde::Serialize;
use std::fmt;

#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
/// A single channel listing
pub struct Channel {
    /// The channel's `id` attribute
    pub name: Option<String>,
    /// Text (or `src` attribute) of the last `<display-name>`
    pub display_name: Option<String>,
    /// `src` attribute of the channel's `<icon>`
    pub icon: Option<String>,
}

#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize)]
/// An `<icon>` of a programme
pub struct Icon {
    /// Location of the image
    pub src: Option<String>,
    /// Width as given in the document
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    /// Height as given in the document
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
/// A `<rating>` value together with its rating system
pub struct Rating {
    /// The `system` attribute of the enclosing `<rating>`
    pub system: Option<String>,
    /// Text of the `<value>`
    pub value: String,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
/// An `<episode-num>` in some numbering system
pub struct EpisodeNum {
    /// Numbering system, e.g. `xmltv_ns` or `onscreen`
    pub system: Option<String>,
    /// The episode number as written
    pub value: String,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
/// The part someone played in a programme
pub enum CreditKind {
    /// `<actor>`
    Actor,
    /// `<director>`
    Director,
    /// `<producer>`
    Producer,
    /// `<presenter>`
    Presenter,
}

impl CreditKind {
    /// The tag name of this credit kind
    pub fn as_str(self) -> &'static str {
        match self {
            CreditKind::Actor => "actor",
            CreditKind::Director => "director",
            CreditKind::Producer => "producer",
            CreditKind::Presenter => "presenter",
        }
    }
}

impl fmt::Display for CreditKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
/// A cast or crew attribution
pub struct Credit {
    /// Which credit tag this came from
    #[serde(rename = "type")]
    pub kind: CreditKind,
    /// The `role` attribute, only kept for actors
    pub role: Option<String>,
    /// The person's name
    pub name: String,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
/// Size class of a programme image
pub enum ImageSize {
    /// `<large-image-url>`
    Large,
    /// `<medium-image-url>`
    Medium,
    /// `<small-image-url>`
    Small,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
/// A programme image url
pub struct Image {
    /// Size class
    pub size: ImageSize,
    /// Location of the image
    pub url: String,
}

#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
/// A single programme listing
///
/// All list fields keep the order their tags had in the document.
pub struct Programme {
    /// The `channel` attribute, referring to a `Channel::name`
    pub channel: Option<String>,
    /// The `start` attribute, if it could be resolved
    pub start: Option<Timestamp>,
    /// The `stop` attribute, if it could be resolved
    pub end: Option<Timestamp>,
    /// Length in seconds
    pub length: Option<u64>,
    /// `<icon>` elements
    pub icon: Vec<Icon>,
    /// `<title>` texts
    pub title: Vec<String>,
    /// `<sub-title>` texts
    pub secondary_title: Vec<String>,
    /// `<desc>` texts
    pub desc: Vec<String>,
    /// `<descgen>` texts
    pub descgen: Vec<String>,
    /// `<category>` texts
    pub category: Vec<String>,
    /// `<country>` texts
    pub country: Vec<String>,
    /// `<rating>` values
    pub rating: Vec<Rating>,
    /// `<episode-num>` entries
    pub episode_num: Vec<EpisodeNum>,
    /// Entries below `<credits>`
    pub credits: Vec<Credit>,
    /// `<*-image-url>` entries
    pub images: Vec<Image>,
    /// Year from `<date>`
    pub date: Option<i64>,
}

impl Programme {
    /// The texts collected for a text field
    pub fn text(&self, field: TextField) -> &[String] {
        match field {
            TextField::Title => &self.title,
            TextField::SecondaryTitle => &self.secondary_title,
            TextField::Desc => &self.desc,
            TextField::Descgen => &self.descgen,
            TextField::Category => &self.category,
            TextField::Country => &self.country,
        }
    }

    pub(crate) fn text_mut(&mut self, field: TextField) -> &mut Vec<String> {
        match field {
            TextField::Title => &mut self.title,
            TextField::SecondaryTitle => &mut self.secondary_title,
            TextField::Desc => &mut self.desc,
            TextField::Descgen => &mut self.descgen,
            TextField::Category => &mut self.category,
            TextField::Country => &mut self.country,
        }
    }

    /// Returns the one-based season number.
    ///
    /// Without an explicit `episode_num`, the first entry of the
    /// `xmltv_ns` system is used. See `xmltv_ns_season()`.
    pub fn season(&self, episode_num: Option<&str>) -> Option<u32> {
        let value = match episode_num.filter(|v| !v.is_empty()) {
            Some(value) => value,
            None => self
                .episode_num
                .iter()
                .find(|e| e.system.as_deref() == Some("xmltv_ns"))?
                .value
                .as_str(),
        };
        xmltv_ns_season(value)
    }
}

/// Parses the season out of an `xmltv_ns` episode number.
///
/// The format is `season[/total].episode[/total].part[/total]`, counting
/// from zero; any component may be left out. So `"1.4/5."` is the last of
/// five episodes in season 2, and `"0.0.0/2"` is part 1 of episode 1 of
/// season 1.
///
/// ~~~
/// assert_eq!(xmltv::xmltv_ns_season("1.4/5."), Some(2));
/// assert_eq!(xmltv::xmltv_ns_season(".4/5."), None);
/// ~~~
pub fn xmltv_ns_season(episode_num: &str) -> Option<u32> {
    if episode_num.split('.').count() != 3 {
        return None;
    }
    let season = episode_num.split('.').next()?;
    let season = season.split('/').next()?.trim();
    if season.is_empty() {
        return None;
    }
    season.parse::<u32>().ok()?.checked_add(1)
}
