//! Wikipedia data types

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, WikiError};

/// Page summary as returned by the REST `page/summary` endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSummary {
    /// `standard`, `disambiguation`, `mainpage` or `no-extract`
    #[serde(rename = "type", default)]
    pub summary_type: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub displaytitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pageid: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub extract: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extract_html: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<ImageRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub originalimage: Option<ImageRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_urls: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Any other fields the endpoint returns, passed through untouched
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// Image reference inside a summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    pub source: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}

/// A resolved page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub pageid: u64,
    /// Title after normalization and redirect resolution
    pub title: String,
    pub fullurl: String,
    #[serde(default)]
    pub ns: i64,
}

/// One hit from a full-text search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub pageid: u64,
    #[serde(default)]
    pub snippet: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wordcount: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// Default number of search results
pub const DEFAULT_SEARCH_LIMIT: u32 = 10;

/// Upper bound accepted by `list=search`
pub const MAX_SEARCH_LIMIT: u32 = 500;

/// Event feed type for "on this day"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    #[default]
    All,
    Selected,
    Births,
    Deaths,
    Events,
    Holidays,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::All => "all",
            EventType::Selected => "selected",
            EventType::Births => "births",
            EventType::Deaths => "deaths",
            EventType::Events => "events",
            EventType::Holidays => "holidays",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = WikiError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(EventType::All),
            "selected" => Ok(EventType::Selected),
            "births" => Ok(EventType::Births),
            "deaths" => Ok(EventType::Deaths),
            "events" => Ok(EventType::Events),
            "holidays" => Ok(EventType::Holidays),
            other => Err(WikiError::InvalidInput(format!(
                "unknown event type '{}' (expected all, selected, births, deaths, events, holidays)",
                other
            ))),
        }
    }
}

/// Options for an "on this day" lookup.
///
/// Only the fields the caller supplied are set; the client fills in the
/// rest (type `all`, today's month and day).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnThisDayOptions {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<String>,
}

/// Fully-resolved "on this day" request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OnThisDayQuery {
    pub event_type: EventType,
    pub month: u32,
    pub day: u32,
}

impl OnThisDayQuery {
    /// REST path segment: `{type}/{MM}/{DD}`
    pub fn path(&self) -> String {
        format!("{}/{:02}/{:02}", self.event_type, self.month, self.day)
    }
}

impl OnThisDayOptions {
    pub fn is_empty(&self) -> bool {
        self.event_type.is_none() && self.month.is_none() && self.day.is_none()
    }

    /// Fill in defaults from `today` and validate the supplied values
    pub fn resolve(&self, today: NaiveDate) -> Result<OnThisDayQuery> {
        let event_type = match &self.event_type {
            Some(t) => t.parse()?,
            None => EventType::default(),
        };
        let month = match &self.month {
            Some(m) => parse_bounded("month", m, 12)?,
            None => today.month(),
        };
        let day = match &self.day {
            Some(d) => parse_bounded("day", d, 31)?,
            None => today.day(),
        };

        Ok(OnThisDayQuery {
            event_type,
            month,
            day,
        })
    }
}

fn parse_bounded(field: &str, value: &str, max: u32) -> Result<u32> {
    match value.trim().parse::<u32>() {
        Ok(n) if (1..=max).contains(&n) => Ok(n),
        _ => Err(WikiError::InvalidInput(format!(
            "{} must be a number between 1 and {}, got '{}'",
            field, max, value
        ))),
    }
}
