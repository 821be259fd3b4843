//! The event record shared by the local cache, the remote store and the feed.
//!
//! Local and remote stores never share an identifier. Events are matched
//! across them by their natural key: `(title, date)`.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::constants::{DISPLAY_DATE_FORMAT, INPUT_DATE_FORMAT, ISO_DATE_FORMAT};
use crate::error::{AgoraError, AgoraResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Row id assigned by the local cache. `None` until the event is stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: String,
    pub date: NaiveDate,
    pub location: String,
    #[serde(default)]
    pub liked: bool,
}

/// Cross-store identity of an event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NaturalKey {
    pub title: String,
    pub date: NaiveDate,
}

impl NaturalKey {
    pub fn new(title: impl Into<String>, date: NaiveDate) -> Self {
        NaturalKey {
            title: title.into(),
            date,
        }
    }

    pub fn date_string(&self) -> String {
        self.date.format(ISO_DATE_FORMAT).to_string()
    }
}

impl fmt::Display for NaturalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.date_string())
    }
}

impl Event {
    pub fn new(title: impl Into<String>, date: NaiveDate, location: impl Into<String>) -> Self {
        Event {
            id: None,
            title: title.into(),
            date,
            location: location.into(),
            liked: false,
        }
    }

    pub fn key(&self) -> NaturalKey {
        NaturalKey::new(self.title.clone(), self.date)
    }

    pub fn has_key(&self, key: &NaturalKey) -> bool {
        self.title == key.title && self.date == key.date
    }

    /// Same title, date and location with the given liked state.
    pub fn with_liked(&self, liked: bool) -> Event {
        Event {
            liked,
            ..self.clone()
        }
    }

    pub fn is_past(&self, today: NaiveDate) -> bool {
        self.date < today
    }

    /// e.g. `31 May 2025`
    pub fn display_date(&self) -> String {
        self.date.format(DISPLAY_DATE_FORMAT).to_string()
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// Parse an ISO-8601 calendar date (`YYYY-MM-DD`).
pub fn parse_iso_date(s: &str) -> AgoraResult<NaiveDate> {
    NaiveDate::parse_from_str(s, ISO_DATE_FORMAT).map_err(|_| {
        AgoraError::InvalidInput(format!("Invalid date '{}'. Expected YYYY-MM-DD", s))
    })
}

/// An event typed in by the user, before it is stored anywhere.
pub struct EventDraft;

impl EventDraft {
    /// Build an event from raw user input.
    ///
    /// `date_input` is `dd/MM/yyyy`. Title and location are trimmed and must
    /// not be blank.
    pub fn parse(title: &str, location: &str, date_input: &str) -> AgoraResult<Event> {
        let date = NaiveDate::parse_from_str(date_input.trim(), INPUT_DATE_FORMAT).map_err(|_| {
            AgoraError::InvalidInput(format!(
                "Invalid date '{}'. Expected dd/MM/yyyy",
                date_input
            ))
        })?;

        let title = title.trim();
        let location = location.trim();

        if title.is_empty() || location.is_empty() {
            return Err(AgoraError::InvalidInput(
                "Title and location must not be empty".into(),
            ));
        }

        Ok(Event::new(title, date, location))
    }
}
