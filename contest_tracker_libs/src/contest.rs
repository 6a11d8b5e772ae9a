use crate::identity::synthetic_id;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DeserializeAs, SerializeAs};
use std::fmt;

/// Canonical platform tag of a contest.
///
/// Upstream sources spell platforms in many ways (`codeforces.com`, `CodeForces`, `code_chef`),
/// so every source string goes through [`Platform::from_site`] before it reaches a [`Contest`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Platform {
    Codeforces,
    Codechef,
    Leetcode,
    Atcoder,
    Other(String),
}

impl Platform {
    /// Derive the canonical platform from a site name or a dotted resource string.
    ///
    /// Takes the first dot-separated segment, lowercases it and strips everything
    /// that is not alphanumeric. Unknown sites fall back to the normalized string.
    pub fn from_site(site: &str) -> Self {
        let site = site.trim().to_lowercase();
        let head = site
            .strip_prefix("www.")
            .unwrap_or(&site)
            .split('.')
            .next()
            .unwrap_or_default();
        let normalized: String = head.chars().filter(|c| c.is_ascii_alphanumeric()).collect();

        match normalized.as_str() {
            "codeforces" => Platform::Codeforces,
            "codechef" => Platform::Codechef,
            "leetcode" => Platform::Leetcode,
            "atcoder" => Platform::Atcoder,
            "" => Platform::Other(String::from("unknown")),
            _ => Platform::Other(normalized),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Platform::Codeforces => "codeforces",
            Platform::Codechef => "codechef",
            Platform::Leetcode => "leetcode",
            Platform::Atcoder => "atcoder",
            Platform::Other(name) => name.as_str(),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<String> for Platform {
    fn from(value: String) -> Self {
        Platform::from_site(&value)
    }
}

impl From<Platform> for String {
    fn from(value: Platform) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContestStatus {
    Upcoming,
    Ongoing,
    Past,
}

/// Serializes a UTC instant the way browsers print `Date#toISOString`.
pub struct IsoDateTime;

impl SerializeAs<DateTime<Utc>> for IsoDateTime {
    fn serialize_as<S>(source: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&to_iso_string(source))
    }
}

impl<'de> DeserializeAs<'de, DateTime<Utc>> for IsoDateTime {
    fn deserialize_as<D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        let timestamp = DateTime::parse_from_rfc3339(&value)
            .map_err(|e| serde::de::Error::custom(e.to_string()))?
            .with_timezone(&Utc);
        Ok(timestamp)
    }
}

pub fn to_iso_string(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Length of a contest in hours, rounded to two decimals.
///
/// End times before the start time come from malformed upstream records and yield `0.0`.
pub fn duration_hours(start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> f64 {
    let seconds = (end_time - start_time).num_seconds().max(0);
    (seconds as f64 / 36.0).round() / 100.0
}

/// `start + seconds`, or `None` when an upstream sends a duration chrono cannot represent.
pub fn offset_by_seconds(start_time: DateTime<Utc>, seconds: i64) -> Option<DateTime<Utc>> {
    if seconds.unsigned_abs() > (i64::MAX / 1000) as u64 {
        return None;
    }
    start_time.checked_add_signed(Duration::seconds(seconds))
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contest {
    pub id: i64,
    pub name: String,
    pub platform: Platform,
    pub url: String,
    #[serde_as(as = "IsoDateTime")]
    pub start_time: DateTime<Utc>,
    #[serde_as(as = "IsoDateTime")]
    pub end_time: DateTime<Utc>,
    #[serde(rename = "duration")]
    pub duration_hours: f64,
    pub status: ContestStatus,
}

impl Contest {
    /// Build a contest from a record that carries its own upstream id.
    ///
    /// The status is provisional until a [`crate::window::Window`] classifies the contest.
    pub fn new(
        id: i64,
        name: impl Into<String>,
        platform: Platform,
        url: impl Into<String>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            platform,
            url: url.into(),
            start_time,
            end_time,
            duration_hours: duration_hours(start_time, end_time),
            status: ContestStatus::Upcoming,
        }
    }

    /// Build a contest from a record without an upstream id.
    pub fn with_synthetic_id(
        name: impl Into<String>,
        platform: Platform,
        url: impl Into<String>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Self {
        let name = name.into();
        let id = synthetic_id(&platform, &name, start_time);
        Self::new(id, name, platform, url, start_time, end_time)
    }

    pub fn dedupe_key(&self) -> String {
        format!(
            "{}|{}|{}",
            self.platform,
            self.name,
            to_iso_string(&self.start_time)
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn platform_from_site_strings() {
        assert_eq!(Platform::from_site("codeforces.com"), Platform::Codeforces);
        assert_eq!(Platform::from_site("www.codechef.com"), Platform::Codechef);
        assert_eq!(Platform::from_site("LeetCode"), Platform::Leetcode);
        assert_eq!(Platform::from_site("code_chef"), Platform::Codechef);
        assert_eq!(Platform::from_site("CodeForces"), Platform::Codeforces);
        assert_eq!(Platform::from_site("atcoder.jp"), Platform::Atcoder);
        assert_eq!(
            Platform::from_site("Top-Coder.com"),
            Platform::Other(String::from("topcoder"))
        );
        assert_eq!(
            Platform::from_site(""),
            Platform::Other(String::from("unknown"))
        );
    }

    #[test]
    fn duration_is_rounded_to_two_decimals() {
        let start = Utc.with_ymd_and_hms(2024, 1, 20, 14, 35, 0).unwrap();

        assert_eq!(duration_hours(start, start + Duration::minutes(90)), 1.5);
        assert_eq!(duration_hours(start, start + Duration::minutes(100)), 1.67);
        assert_eq!(duration_hours(start, start + Duration::hours(2)), 2.0);
        assert_eq!(duration_hours(start, start - Duration::hours(2)), 0.0);
    }

    #[test]
    fn serialize_contest() {
        let start = Utc.with_ymd_and_hms(2024, 1, 20, 14, 35, 0).unwrap();
        let contest = Contest::new(
            1920,
            "Codeforces Round 920 (Div. 3)",
            Platform::Codeforces,
            "https://codeforces.com/contests/1920",
            start,
            start + Duration::minutes(135),
        );

        let value = serde_json::to_value(&contest).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": 1920,
                "name": "Codeforces Round 920 (Div. 3)",
                "platform": "codeforces",
                "url": "https://codeforces.com/contests/1920",
                "startTime": "2024-01-20T14:35:00.000Z",
                "endTime": "2024-01-20T16:50:00.000Z",
                "duration": 2.25,
                "status": "upcoming"
            })
        );

        let restored: Contest = serde_json::from_value(value).unwrap();
        assert_eq!(restored, contest);
    }

    #[test]
    fn dedupe_key_uses_iso_start_time() {
        let start = Utc.timestamp_millis_opt(1700000000000).unwrap();
        let contest = Contest::with_synthetic_id(
            "Biweekly Contest 100",
            Platform::Leetcode,
            "https://leetcode.com/contest/biweekly-contest-100",
            start,
            start + Duration::minutes(90),
        );

        assert_eq!(
            contest.dedupe_key(),
            "leetcode|Biweekly Contest 100|2023-11-14T22:13:20.000Z"
        );
        assert_eq!(contest.id, 1224696418);
    }
}
