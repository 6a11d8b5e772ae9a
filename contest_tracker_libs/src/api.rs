use crate::contest::{Contest, Platform};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Response header naming the provider tier that produced a contest list.
pub const SOURCE_HEADER: &str = "x-contest-source";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceTier {
    Primary,
    Direct,
    Secondary,
    #[serde(rename = "none")]
    Exhausted,
}

impl SourceTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceTier::Primary => "primary",
            SourceTier::Direct => "direct",
            SourceTier::Secondary => "secondary",
            SourceTier::Exhausted => "none",
        }
    }
}

impl fmt::Display for SourceTier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub contests: Vec<Contest>,
    pub tier: SourceTier,
}

impl Resolution {
    pub fn exhausted() -> Self {
        Self {
            contests: Vec::new(),
            tier: SourceTier::Exhausted,
        }
    }

    /// Keep only contests of the given platforms. An empty selection keeps everything.
    pub fn retain_platforms(mut self, platforms: &[Platform]) -> Self {
        if !platforms.is_empty() {
            self.contests
                .retain(|contest| platforms.contains(&contest.platform));
        }
        self
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn tier_names() {
        let tiers = [
            SourceTier::Primary,
            SourceTier::Direct,
            SourceTier::Secondary,
            SourceTier::Exhausted,
        ];
        let names: Vec<String> = tiers.iter().map(|tier| tier.to_string()).collect();

        assert_eq!(names, vec!["primary", "direct", "secondary", "none"]);
        assert_eq!(
            serde_json::to_string(&SourceTier::Exhausted).unwrap(),
            "\"none\""
        );
    }

    #[test]
    fn retain_platforms_filters_contests() {
        let start = Utc.with_ymd_and_hms(2024, 1, 20, 14, 35, 0).unwrap();
        let resolution = Resolution {
            contests: vec![
                Contest::new(1, "a", Platform::Codeforces, "u", start, start + Duration::hours(2)),
                Contest::new(2, "b", Platform::Leetcode, "u", start, start + Duration::hours(2)),
            ],
            tier: SourceTier::Direct,
        };

        let all = resolution.clone().retain_platforms(&[]);
        let leetcode = resolution.retain_platforms(&[Platform::Leetcode]);

        assert_eq!(all.contests.len(), 2);
        assert_eq!(leetcode.contests.len(), 1);
        assert_eq!(leetcode.contests[0].id, 2);
        assert_eq!(leetcode.tier, SourceTier::Direct);
    }
}
