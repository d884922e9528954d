//! The record type shared by every item source.
//!
//! `FeedItem` is one entry of a paged collection (an article, a service).
//! The loader never looks inside it beyond [`FeedItem::id`]; the display
//! fields exist for the UI.
//!
//! ## For contributors
//!
//! The API returns Rails-style JSON, so ids arrive as numbers and timestamps
//! as RFC 3339 strings.  Unknown fields are ignored, which lets the same
//! struct decode both `articles` and `services`.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Stable identity of a [`FeedItem`], used as its list key.
///
/// Accepts either a JSON number or a JSON string and always renders as a
/// string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "RawId")]
pub struct ItemId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(i64),
    Text(String),
}

impl From<RawId> for ItemId {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Number(n) => Self(n.to_string()),
            RawId::Text(s) => Self(s),
        }
    }
}

impl ItemId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single record from an item source.
///
/// Only `id` is required.  Display fields tolerate `null` and values of the
/// wrong JSON type, so one odd record cannot make a whole page undecodable.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FeedItem {
    /// Unique, stable identifier.
    pub id: ItemId,

    /// Headline shown in the list; empty when the API sends none.
    #[serde(default, deserialize_with = "text_or_empty")]
    pub title: String,

    /// Short summary; truncated in list rows.
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: Option<String>,

    /// Full article text, shown in the detail view.
    #[serde(default, deserialize_with = "lenient_text")]
    pub body: Option<String>,

    /// External link (services point at their booking or info page).
    #[serde(default, deserialize_with = "lenient_text")]
    pub url: Option<String>,

    /// Author / administrator attribution on articles.
    #[serde(default, deserialize_with = "lenient_text")]
    pub admin: Option<String>,

    /// Server-side creation time; `None` when absent or unparseable.
    #[serde(default, rename = "created_at", deserialize_with = "lenient_timestamp")]
    pub published: Option<DateTime<Utc>>,
}

/// Strings pass through, numbers and booleans are rendered, anything else
/// (null, arrays, objects) is treated as absent.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    })
}

fn text_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_text(deserializer).map(Option::unwrap_or_default)
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = lenient_text(deserializer)?;
    Ok(text
        .and_then(|t| DateTime::parse_from_rfc3339(&t).ok())
        .map(|dt| dt.with_timezone(&Utc)))
}

/// Shorten `text` to at most `max` characters, ending in `continuation`.
///
/// Text that already fits is returned unchanged.  Counts `char`s, not bytes,
/// so multi-byte text is never split mid-character.
pub fn truncate(text: &str, max: usize, continuation: &str) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(continuation.chars().count());
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(continuation);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn numeric_and_string_ids_both_decode() {
        let a: FeedItem = serde_json::from_str(r#"{"id": 42, "title": "A"}"#).unwrap();
        let b: FeedItem = serde_json::from_str(r#"{"id": "abc", "title": "B"}"#).unwrap();

        assert_eq!(a.id.as_str(), "42");
        assert_eq!(b.id.to_string(), "abc");
    }

    #[test]
    fn missing_display_fields_default() {
        let item: FeedItem = serde_json::from_str(r#"{"id": 1}"#).unwrap();

        assert_eq!(item.title, "");
        assert!(item.description.is_none());
        assert!(item.body.is_none());
        assert!(item.url.is_none());
        assert!(item.published.is_none());
    }

    #[test]
    fn created_at_maps_to_published() {
        let item: FeedItem = serde_json::from_str(
            r#"{"id": 7, "title": "Flu season", "created_at": "2024-03-01T12:30:00Z", "admin": "Dr. Lee"}"#,
        )
        .unwrap();

        assert_eq!(
            item.published,
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap())
        );
        assert_eq!(item.admin.as_deref(), Some("Dr. Lee"));
    }

    #[test]
    fn null_display_fields_decode_as_absent() {
        let item: FeedItem = serde_json::from_str(
            r#"{"id": 2, "title": null, "description": null, "body": null, "url": null, "admin": null, "created_at": null}"#,
        )
        .unwrap();

        assert_eq!(item.title, "");
        assert!(item.description.is_none());
        assert!(item.body.is_none());
        assert!(item.url.is_none());
        assert!(item.admin.is_none());
        assert!(item.published.is_none());
    }

    #[test]
    fn odd_field_types_do_not_reject_the_record() {
        let item: FeedItem = serde_json::from_str(
            r#"{"id": 3, "title": 2024, "admin": {"id": 1, "name": "Dr. Lee"}, "body": true, "created_at": "last tuesday"}"#,
        )
        .unwrap();

        assert_eq!(item.title, "2024");
        assert!(item.admin.is_none());
        assert_eq!(item.body.as_deref(), Some("true"));
        assert!(item.published.is_none());
    }

    #[test]
    fn truncate_leaves_short_text_alone() {
        assert_eq!(truncate("short", 85, "..."), "short");
        assert_eq!(truncate("exact", 5, "..."), "exact");
    }

    #[test]
    fn truncate_reserves_room_for_continuation() {
        let out = truncate("abcdefghij", 8, "...");
        assert_eq!(out, "abcde...");
        assert_eq!(out.chars().count(), 8);
    }

    #[test]
    fn truncate_counts_chars_not_bytes() {
        let out = truncate("ééééééé", 5, "…");
        assert_eq!(out, "éééé…");
    }
}
