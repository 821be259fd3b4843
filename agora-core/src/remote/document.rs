//! Wire shape of remote event documents and their conversion into events.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::ISO_DATE_FORMAT;
use crate::event::Event;

/// A document as the remote store returns it: an id and untyped fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteDocument {
    pub id: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

/// The fields written for an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDocument {
    pub title: String,
    pub date: String,
    pub location: String,
    pub is_liked: bool,
}

impl From<&Event> for EventDocument {
    fn from(event: &Event) -> Self {
        EventDocument {
            title: event.title.clone(),
            date: event.date.format(ISO_DATE_FORMAT).to_string(),
            location: event.location.clone(),
            is_liked: event.liked,
        }
    }
}

impl EventDocument {
    pub fn into_fields(self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InvalidReason {
    MissingField(&'static str),
    InvalidDate(String),
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidReason::MissingField(field) => write!(f, "missing field '{}'", field),
            InvalidReason::InvalidDate(value) => write!(f, "invalid date '{}'", value),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DocumentOutcome {
    Parsed(Event),
    Invalid { id: String, reason: InvalidReason },
}

/// Map a remote document onto an `Event`.
///
/// `title`, `location` and `date` must be strings and `date` must be a
/// `YYYY-MM-DD` calendar date. `isLiked` is optional.
pub fn parse_document(document: &RemoteDocument) -> DocumentOutcome {
    let invalid = |reason| DocumentOutcome::Invalid {
        id: document.id.clone(),
        reason,
    };

    let field = |name: &'static str| document.fields.get(name).and_then(Value::as_str);

    let Some(title) = field("title") else {
        return invalid(InvalidReason::MissingField("title"));
    };
    let Some(location) = field("location") else {
        return invalid(InvalidReason::MissingField("location"));
    };
    let Some(date) = field("date") else {
        return invalid(InvalidReason::MissingField("date"));
    };

    let Ok(date) = NaiveDate::parse_from_str(date, ISO_DATE_FORMAT) else {
        return invalid(InvalidReason::InvalidDate(date.to_string()));
    };

    let liked = document
        .fields
        .get("isLiked")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    DocumentOutcome::Parsed(Event::new(title, date, location).with_liked(liked))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(fields: Value) -> RemoteDocument {
        RemoteDocument {
            id: "doc-1".into(),
            fields: fields.as_object().cloned().unwrap_or_default(),
        }
    }

    #[test]
    fn test_parse_complete_document() {
        let outcome = parse_document(&doc(json!({
            "title": "Fair",
            "date": "2025-06-10",
            "location": "Square",
            "isLiked": true
        })));

        let DocumentOutcome::Parsed(event) = outcome else {
            panic!("expected parsed document, got {:?}", outcome);
        };
        assert_eq!(event.title, "Fair");
        assert_eq!(event.date, NaiveDate::from_ymd_opt(2025, 6, 10).unwrap());
        assert!(event.liked);
        assert_eq!(event.id, None);
    }

    #[test]
    fn test_is_liked_defaults_to_false() {
        let outcome = parse_document(&doc(json!({
            "title": "Fair", "date": "2025-06-10", "location": "Square"
        })));
        assert!(matches!(outcome, DocumentOutcome::Parsed(e) if !e.liked));
    }

    #[test]
    fn test_missing_or_mistyped_fields_are_invalid() {
        let outcome = parse_document(&doc(json!({ "title": "Fair", "date": "2025-06-10" })));
        assert_eq!(
            outcome,
            DocumentOutcome::Invalid {
                id: "doc-1".into(),
                reason: InvalidReason::MissingField("location"),
            }
        );

        let outcome = parse_document(&doc(json!({
            "title": 42, "date": "2025-06-10", "location": "Square"
        })));
        assert!(matches!(
            outcome,
            DocumentOutcome::Invalid { reason: InvalidReason::MissingField("title"), .. }
        ));
    }

    #[test]
    fn test_unparsable_date_is_invalid() {
        let outcome = parse_document(&doc(json!({
            "title": "Fair", "date": "10/06/2025", "location": "Square"
        })));
        assert!(matches!(
            outcome,
            DocumentOutcome::Invalid { reason: InvalidReason::InvalidDate(d), .. } if d == "10/06/2025"
        ));
    }

    #[test]
    fn test_event_document_uses_camel_case_fields() {
        let event = Event::new("Fair", NaiveDate::from_ymd_opt(2025, 6, 10).unwrap(), "Square");
        let fields = EventDocument::from(&event).into_fields();
        assert_eq!(fields.get("isLiked"), Some(&json!(false)));
        assert_eq!(fields.get("date"), Some(&json!("2025-06-10")));
    }
}
