// xmltv
// Copyright 2015-2026 xmltv developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Tag name to field mappings used while building a `Programme`.

use crate::record::{CreditKind, ImageSize};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
/// Programme fields holding a list of raw texts
pub enum TextField {
    /// `<title>`
    Title,
    /// `<sub-title>`
    SecondaryTitle,
    /// `<desc>`
    Desc,
    /// `<descgen>`
    Descgen,
    /// `<category>`
    Category,
    /// `<country>`
    Country,
}

impl TextField {
    /// Maps a tag name to its text field
    pub fn from_tag(tag: &str) -> Option<TextField> {
        match tag {
            "title" => Some(TextField::Title),
            "sub-title" => Some(TextField::SecondaryTitle),
            "desc" => Some(TextField::Desc),
            "descgen" => Some(TextField::Descgen),
            "category" => Some(TextField::Category),
            "country" => Some(TextField::Country),
            _ => None,
        }
    }
}

impl CreditKind {
    /// Maps a tag name below `<credits>` to its credit kind
    pub fn from_tag(tag: &str) -> Option<CreditKind> {
        match tag {
            "actor" => Some(CreditKind::Actor),
            "director" => Some(CreditKind::Director),
            "producer" => Some(CreditKind::Producer),
            "presenter" => Some(CreditKind::Presenter),
            _ => None,
        }
    }
}

impl ImageSize {
    /// Maps an image url tag name to its size
    pub fn from_tag(tag: &str) -> Option<ImageSize> {
        match tag {
            "large-image-url" => Some(ImageSize::Large),
            "medium-image-url" => Some(ImageSize::Medium),
            "small-image-url" => Some(ImageSize::Small),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
/// Units accepted by the `units` attribute of `<length>`
pub enum LengthUnit {
    /// `units="seconds"`
    Seconds,
    /// `units="minutes"`
    Minutes,
    /// `units="hours"`
    Hours,
}

impl LengthUnit {
    /// Maps a `units` attribute value to its unit
    pub fn from_units(units: &str) -> Option<LengthUnit> {
        match units {
            "seconds" => Some(LengthUnit::Seconds),
            "minutes" => Some(LengthUnit::Minutes),
            "hours" => Some(LengthUnit::Hours),
            _ => None,
        }
    }

    /// Number of seconds in one unit
    pub fn seconds(self) -> u64 {
        match self {
            LengthUnit::Seconds => 1,
            LengthUnit::Minutes => 60,
            LengthUnit::Hours => 60 * 60,
        }
    }

    /// Converts an amount of this unit to whole seconds.
    ///
    /// Fractional amounts are rounded; negative, non-numeric or
    /// non-finite amounts yield `None`.
    pub fn to_seconds(self, amount: &str) -> Option<u64> {
        let amount: f64 = amount.trim().parse().ok()?;
        let seconds = amount * self.seconds() as f64;
        if seconds.is_finite() && seconds >= 0.0 && seconds <= u64::MAX as f64 {
            Some(seconds.round() as u64)
        } else {
            None
        }
    }
}
