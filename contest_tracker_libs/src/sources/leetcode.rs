use crate::{
    contest::{offset_by_seconds, Contest, Platform},
    sources::{
        endpoint_url,
        model::{LeetcodeContest, LeetcodeResponse},
        read_json, ContestSource, Result,
    },
    window::Window,
};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use reqwest::{Client, Url};
use serde_json::json;
use std::time::Duration;

const CONTEST_LIST_QUERY: &str =
    "query getContestList { allContests { title startTime duration titleSlug } }";

pub struct LeetcodeSource {
    url: Url,
    client: Client,
    timeout: Duration,
}

impl LeetcodeSource {
    pub fn new(base_url: &str, client: Client, timeout: Duration) -> Result<Self> {
        Ok(Self {
            url: endpoint_url(base_url, "graphql")?,
            client,
            timeout,
        })
    }
}

#[async_trait]
impl ContestSource for LeetcodeSource {
    fn name(&self) -> &str {
        "leetcode"
    }

    async fn fetch_contests(&self, window: &Window) -> Result<Vec<Contest>> {
        let request = self
            .client
            .post(self.url.clone())
            .json(&json!({ "query": CONTEST_LIST_QUERY }))
            .timeout(self.timeout);
        let response: LeetcodeResponse = read_json(request).await?;

        Ok(map_response(response, window))
    }
}

fn map_response(response: LeetcodeResponse, window: &Window) -> Vec<Contest> {
    let contests = response
        .data
        .and_then(|data| data.all_contests)
        .unwrap_or_default();

    contests
        .into_iter()
        .filter_map(to_contest)
        .filter(|contest| (contest.end_time > window.now()) == window.is_upcoming())
        .collect()
}

fn to_contest(contest: LeetcodeContest) -> Option<Contest> {
    let start_time = Utc.timestamp_opt(contest.start_time, 0).single()?;
    let end_time = offset_by_seconds(start_time, contest.duration)?;

    Some(Contest::with_synthetic_id(
        contest.title,
        Platform::Leetcode,
        format!("https://leetcode.com/contest/{}", contest.title_slug),
        start_time,
        end_time,
    ))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{identity::synthetic_id, sources::build_client};
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn payload() -> serde_json::Value {
        json!({
            "data": {
                "allContests": [
                    {"title": "Weekly Contest 400", "titleSlug": "weekly-contest-400", "startTime": 1716690600, "duration": 5400},
                    {"title": "Biweekly Contest 131", "titleSlug": "biweekly-contest-131", "startTime": 1716647400, "duration": 5400},
                    {"title": "Weekly Contest 399", "titleSlug": "weekly-contest-399", "startTime": 1716085800, "duration": 5400}
                ]
            }
        })
    }

    #[test]
    fn map_splits_upcoming_and_past_by_end_time() {
        // 30 minutes into Biweekly Contest 131
        let now = Utc.timestamp_opt(1716649200, 0).unwrap();
        let response = || serde_json::from_value::<LeetcodeResponse>(payload()).unwrap();

        let upcoming = map_response(response(), &Window::upcoming(now));
        let past = map_response(response(), &Window::recent_past(now, 2));

        let upcoming: Vec<&str> = upcoming.iter().map(|c| c.name.as_str()).collect();
        let past: Vec<&str> = past.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(upcoming, vec!["Weekly Contest 400", "Biweekly Contest 131"]);
        assert_eq!(past, vec!["Weekly Contest 399"]);
    }

    #[test]
    fn map_assigns_synthetic_ids() {
        let now = Utc.timestamp_opt(1716000000, 0).unwrap();
        let response: LeetcodeResponse = serde_json::from_value(payload()).unwrap();

        let contests = map_response(response, &Window::upcoming(now));

        let start = Utc.timestamp_opt(1716690600, 0).unwrap();
        assert_eq!(contests[0].id, 958126864);
        assert_eq!(
            contests[0].id,
            synthetic_id(&Platform::Leetcode, "Weekly Contest 400", start)
        );
        assert_eq!(contests[0].url, "https://leetcode.com/contest/weekly-contest-400");
        assert_eq!(contests[0].duration_hours, 1.5);
    }

    #[test]
    fn map_tolerates_missing_data() {
        let now = Utc::now();
        let response: LeetcodeResponse =
            serde_json::from_value(json!({"errors": [{"message": "rate limited"}]})).unwrap();

        assert!(map_response(response, &Window::upcoming(now)).is_empty());
    }

    #[tokio::test]
    async fn fetch_posts_graphql_query() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .and(body_json(json!({ "query": CONTEST_LIST_QUERY })))
            .respond_with(ResponseTemplate::new(200).set_body_json(payload()))
            .expect(1)
            .mount(&server)
            .await;

        let source =
            LeetcodeSource::new(&server.uri(), build_client().unwrap(), Duration::from_secs(1))
                .unwrap();
        let now = Utc.timestamp_opt(1716000000, 0).unwrap();

        let contests = source.fetch_contests(&Window::upcoming(now)).await.unwrap();

        assert_eq!(contests.len(), 3);
    }
}
