use crate::{
    contest::{Contest, Platform},
    sources::{
        endpoint_url,
        model::{parse_upstream_datetime, CodechefContest, CodechefResponse},
        read_json, ContestSource, Result,
    },
    window::Window,
};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use itertools::Itertools;
use reqwest::{Client, Url};
use std::time::Duration;

// CodeChef publishes its plain dates in Indian Standard Time.
const IST_OFFSET_SECONDS: i32 = 5 * 3600 + 30 * 60;

pub struct CodechefSource {
    url: Url,
    client: Client,
    timeout: Duration,
}

impl CodechefSource {
    pub fn new(base_url: &str, client: Client, timeout: Duration) -> Result<Self> {
        Ok(Self {
            url: endpoint_url(base_url, "api/list/contests/all")?,
            client,
            timeout,
        })
    }
}

#[async_trait]
impl ContestSource for CodechefSource {
    fn name(&self) -> &str {
        "codechef"
    }

    async fn fetch_contests(&self, window: &Window) -> Result<Vec<Contest>> {
        let request = self.client.get(self.url.clone()).timeout(self.timeout);
        let response: CodechefResponse = read_json(request).await?;

        Ok(map_response(response, window))
    }
}

/// Upcoming requests read the present and future buckets, past requests the present and past ones.
fn map_response(response: CodechefResponse, window: &Window) -> Vec<Contest> {
    let CodechefResponse {
        present_contests,
        future_contests,
        past_contests,
    } = response;
    let other = if window.is_upcoming() {
        future_contests
    } else {
        past_contests
    };

    present_contests
        .into_iter()
        .chain(other)
        .filter_map(to_contest)
        .collect()
}

fn to_contest(contest: CodechefContest) -> Option<Contest> {
    let start_time = parse_date(
        contest.contest_start_date_iso.as_deref(),
        contest.contest_start_date.as_deref(),
    );
    let end_time = parse_date(
        contest.contest_end_date_iso.as_deref(),
        contest.contest_end_date.as_deref(),
    );
    let (start_time, end_time) = match (start_time, end_time) {
        (Some(start_time), Some(end_time)) => (start_time, end_time),
        _ => {
            tracing::debug!("skip codechef contest {} without schedule", contest.contest_code);
            return None;
        }
    };

    Some(Contest::with_synthetic_id(
        contest.contest_name,
        Platform::Codechef,
        format!("https://www.codechef.com/{}", contest.contest_code),
        start_time,
        end_time,
    ))
}

fn parse_date(iso: Option<&str>, local: Option<&str>) -> Option<DateTime<Utc>> {
    iso.and_then(parse_upstream_datetime)
        .or_else(|| local.and_then(parse_local_date))
}

/// Parse dates such as `17 Jan 2024  20:00:00`, given in IST.
fn parse_local_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.split_whitespace().join(" ");
    let naive = NaiveDateTime::parse_from_str(&value, "%d %b %Y %H:%M:%S").ok()?;
    let ist = FixedOffset::east_opt(IST_OFFSET_SECONDS)?;
    let local = ist.from_local_datetime(&naive).single()?;
    Some(local.with_timezone(&Utc))
}
