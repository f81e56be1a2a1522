//! Typed view of the `summary.json` document.
//!
//! Only the fields the display needs are modelled; everything else in the
//! response is ignored by serde.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Deserializer};

use crate::constants::TIMESTAMP_FORMAT;

/// Snapshot of the remote status page. Replaced wholesale on every fresh poll.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SystemStatus {
    #[serde(default)]
    pub components: Vec<Component>,
    #[serde(default)]
    pub incidents: Vec<Incident>,
}

impl SystemStatus {
    /// Most recent incident (the API lists newest first).
    pub fn latest_incident(&self) -> Option<&Incident> {
        self.incidents.first()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Component {
    pub id: String,
    pub name: String,
    pub status: ComponentStatus,
}

/// Component health as reported by the API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum ComponentStatus {
    Operational,
    DegradedPerformance,
    PartialOutage,
    MajorOutage,
    /// Anything the API adds later; rendered literally.
    Other(String),
}

impl From<String> for ComponentStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "operational" => Self::Operational,
            "degraded_performance" => Self::DegradedPerformance,
            "partial_outage" => Self::PartialOutage,
            "major_outage" => Self::MajorOutage,
            _ => Self::Other(raw),
        }
    }
}

impl ComponentStatus {
    /// Human-readable label for the status column.
    pub fn label(&self) -> &str {
        match self {
            ComponentStatus::Operational => "Operational",
            ComponentStatus::DegradedPerformance => "Degraded Performance",
            ComponentStatus::PartialOutage => "Partial Outage",
            ComponentStatus::MajorOutage => "Major Outage",
            ComponentStatus::Other(raw) => raw,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Incident {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub incident_updates: Vec<IncidentUpdate>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IncidentUpdate {
    pub status: String,
    #[serde(deserialize_with = "deserialize_body")]
    pub body: String,
    #[serde(default)]
    pub created_at: Timestamp,
}

fn br_tag_regex() -> &'static Regex {
    static BR_TAG: OnceLock<Regex> = OnceLock::new();
    BR_TAG.get_or_init(|| Regex::new(r"<br\s*/?>").expect("valid br regex"))
}

/// Replace every `<br>`, `<br/>` and `<br />` with a single space.
pub fn normalize_line_breaks(body: &str) -> String {
    br_tag_regex().replace_all(body, " ").into_owned()
}

fn deserialize_body<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(normalize_line_breaks(&raw))
}

/// Optional instant. Absent is a valid state and displays as an empty string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timestamp(pub Option<DateTime<Utc>>);

impl Timestamp {
    #[cfg(test)]
    pub fn new(at: DateTime<Utc>) -> Self {
        Self(Some(at))
    }

    /// Parse `2014-05-03T01:22:07.286Z`. The literal `null` maps to an absent timestamp.
    pub fn parse(raw: &str) -> Result<Self, chrono::ParseError> {
        if raw == "null" {
            return Ok(Self(None));
        }
        let parsed = DateTime::parse_from_rfc3339(raw)?;
        Ok(Self(Some(parsed.with_timezone(&Utc))))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(at) => write!(f, "{}", at.format(TIMESTAMP_FORMAT)),
            None => Ok(()),
        }
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(Timestamp(None)),
            Some(raw) => Timestamp::parse(&raw).map_err(serde::de::Error::custom),
        }
    }
}
