use crate::{contest::to_iso_string, window::Window};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnError, DeserializeAs, DisplayFromStr, PickFirst, SerializeAs};

/// Reads the date-time strings upstreams send: RFC 3339, or naive ISO in UTC.
pub struct FromUpstreamDateTime;

pub fn parse_upstream_datetime(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Some(timestamp.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}

impl SerializeAs<DateTime<Utc>> for FromUpstreamDateTime {
    fn serialize_as<S>(source: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&to_iso_string(source))
    }
}

impl<'de> DeserializeAs<'de, DateTime<Utc>> for FromUpstreamDateTime {
    fn deserialize_as<D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        parse_upstream_datetime(&value)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date-time: {}", value)))
    }
}

/// Contest phase as reported by phase-based upstreams.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Before,
    Coding,
    Finished,
    Other,
}

impl From<&str> for Phase {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "BEFORE" => Phase::Before,
            "CODING" => Phase::Coding,
            "FINISHED" => Phase::Finished,
            _ => Phase::Other,
        }
    }
}

impl Phase {
    /// Whether a contest in this phase may appear in the requested window.
    ///
    /// Unknown phases pass; the window filter has the final word on them.
    pub fn admits(&self, window: &Window) -> bool {
        match self {
            Phase::Before | Phase::Coding => window.is_upcoming(),
            Phase::Finished => !window.is_upcoming(),
            Phase::Other => true,
        }
    }
}

// clist.by

#[derive(Debug, Serialize, Deserialize)]
pub struct ClistResponse {
    pub objects: Vec<ClistContest>,
}

#[serde_as]
#[derive(Debug, Serialize, Deserialize)]
pub struct ClistContest {
    pub id: i64,
    pub event: String,
    pub resource: String,
    pub href: String,
    #[serde(default)]
    #[serde_as(as = "DefaultOnError<Option<FromUpstreamDateTime>>")]
    pub start: Option<DateTime<Utc>>,
    #[serde(default)]
    #[serde_as(as = "DefaultOnError<Option<FromUpstreamDateTime>>")]
    pub end: Option<DateTime<Utc>>,
}

// codeforces.com

#[derive(Debug, Serialize, Deserialize)]
pub struct CodeforcesResponse {
    pub status: String,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub result: Vec<CodeforcesContest>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeforcesContest {
    pub id: i64,
    pub name: String,
    pub phase: String,
    #[serde(default)]
    pub start_time_seconds: Option<i64>,
    #[serde(default)]
    pub duration_seconds: Option<i64>,
}

// leetcode.com

#[derive(Debug, Serialize, Deserialize)]
pub struct LeetcodeResponse {
    #[serde(default)]
    pub data: Option<LeetcodeData>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeetcodeData {
    #[serde(default)]
    pub all_contests: Option<Vec<LeetcodeContest>>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeetcodeContest {
    pub title: String,
    pub title_slug: String,
    pub start_time: i64,
    pub duration: i64,
}

// codechef.com

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CodechefResponse {
    #[serde(default)]
    pub present_contests: Vec<CodechefContest>,
    #[serde(default)]
    pub future_contests: Vec<CodechefContest>,
    #[serde(default)]
    pub past_contests: Vec<CodechefContest>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CodechefContest {
    pub contest_code: String,
    pub contest_name: String,
    #[serde(default)]
    pub contest_start_date: Option<String>,
    #[serde(default)]
    pub contest_end_date: Option<String>,
    #[serde(default)]
    pub contest_start_date_iso: Option<String>,
    #[serde(default)]
    pub contest_end_date_iso: Option<String>,
}

// kontests.net

#[serde_as]
#[derive(Debug, Serialize, Deserialize)]
pub struct KontestsContest {
    pub name: String,
    pub url: String,
    #[serde(default)]
    #[serde_as(as = "DefaultOnError<Option<FromUpstreamDateTime>>")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    #[serde_as(as = "DefaultOnError<Option<FromUpstreamDateTime>>")]
    pub end_time: Option<DateTime<Utc>>,
    /// Seconds, sent either as a number or as a numeric string.
    #[serde(default)]
    #[serde_as(as = "DefaultOnError<Option<PickFirst<(_, DisplayFromStr)>>>")]
    pub duration: Option<f64>,
    #[serde(default)]
    pub site: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}
