//! Normalized calendar dates and extraction results.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::DobError;

/// A calendar date in canonical form, rendered as ISO `YYYY-MM-DD`.
///
/// Two date strings written in different formats are the same date of birth
/// exactly when they normalize to equal `NormalizedDate`s.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NormalizedDate(NaiveDate);

impl NormalizedDate {
    /// The canonical rendering format.
    pub const ISO_FORMAT: &'static str = "%Y-%m-%d";

    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Build from calendar fields, rejecting impossible dates (e.g. day 32).
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Parse a strict ISO `YYYY-MM-DD` string.
    pub fn parse_iso(s: &str) -> Result<Self, DobError> {
        NaiveDate::parse_from_str(s.trim(), Self::ISO_FORMAT)
            .map(Self)
            .map_err(|_| DobError::InvalidDate(s.to_string()))
    }

    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }
}

impl fmt::Display for NormalizedDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(Self::ISO_FORMAT))
    }
}

impl FromStr for NormalizedDate {
    type Err = DobError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_iso(s)
    }
}

impl From<NaiveDate> for NormalizedDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

/// The most probable date found in a certificate document.
///
/// `normalized_value` is `None` when the document had no date-like token, was
/// empty, or could not be read at all. In that case `raw_text` is empty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedDate {
    /// The substring of the document the date was parsed from.
    pub raw_text: String,
    /// The date in canonical form.
    pub normalized_value: Option<NormalizedDate>,
}

impl ExtractedDate {
    pub fn found(raw_text: impl Into<String>, date: NormalizedDate) -> Self {
        Self {
            raw_text: raw_text.into(),
            normalized_value: Some(date),
        }
    }

    pub fn absent() -> Self {
        Self {
            raw_text: String::new(),
            normalized_value: None,
        }
    }

    pub fn is_absent(&self) -> bool {
        self.normalized_value.is_none()
    }
}
