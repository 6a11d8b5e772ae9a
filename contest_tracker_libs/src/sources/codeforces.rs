use crate::{
    contest::{offset_by_seconds, Contest, Platform},
    sources::{
        endpoint_url,
        model::{CodeforcesContest, CodeforcesResponse, Phase},
        read_json, ContestSource, Result, SourceError,
    },
    window::Window,
};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use reqwest::{Client, Url};
use std::time::Duration;

pub struct CodeforcesSource {
    url: Url,
    client: Client,
    timeout: Duration,
}

impl CodeforcesSource {
    pub fn new(base_url: &str, client: Client, timeout: Duration) -> Result<Self> {
        Ok(Self {
            url: endpoint_url(base_url, "api/contest.list")?,
            client,
            timeout,
        })
    }
}

#[async_trait]
impl ContestSource for CodeforcesSource {
    fn name(&self) -> &str {
        "codeforces"
    }

    async fn fetch_contests(&self, window: &Window) -> Result<Vec<Contest>> {
        let request = self.client.get(self.url.clone()).timeout(self.timeout);
        let response: CodeforcesResponse = read_json(request).await?;

        if response.status != "OK" {
            return Err(SourceError::UpstreamError(
                response
                    .comment
                    .unwrap_or_else(|| format!("status {}", response.status)),
            ));
        }

        Ok(map_response(response, window))
    }
}

fn map_response(response: CodeforcesResponse, window: &Window) -> Vec<Contest> {
    response
        .result
        .into_iter()
        .filter(|contest| Phase::from(contest.phase.as_str()).admits(window))
        .filter_map(to_contest)
        .collect()
}

fn to_contest(contest: CodeforcesContest) -> Option<Contest> {
    let start_time = Utc
        .timestamp_opt(contest.start_time_seconds?, 0)
        .single()?;
    let end_time = offset_by_seconds(start_time, contest.duration_seconds.unwrap_or(0))?;

    Some(Contest::new(
        contest.id,
        contest.name,
        Platform::Codeforces,
        format!("https://codeforces.com/contests/{}", contest.id),
        start_time,
        end_time,
    ))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::sources::build_client;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn payload() -> serde_json::Value {
        json!({
            "status": "OK",
            "result": [
                {"id": 1930, "name": "Codeforces Round 926", "type": "CF", "phase": "BEFORE", "frozen": false, "durationSeconds": 7200, "startTimeSeconds": 1707663300, "relativeTimeSeconds": -3600},
                {"id": 1929, "name": "Educational Round 162", "type": "ICPC", "phase": "CODING", "frozen": false, "durationSeconds": 7200, "startTimeSeconds": 1707577200},
                {"id": 1928, "name": "Codeforces Round 925", "type": "CF", "phase": "FINISHED", "frozen": false, "durationSeconds": 8100, "startTimeSeconds": 1707490800},
                {"id": 1927, "name": "Unscheduled", "type": "CF", "phase": "BEFORE", "frozen": false, "durationSeconds": 7200}
            ]
        })
    }

    #[test]
    fn map_upcoming_keeps_before_and_coding() {
        let response: CodeforcesResponse = serde_json::from_value(payload()).unwrap();
        let window = Window::upcoming(Utc.timestamp_opt(1707580000, 0).unwrap());

        let contests = map_response(response, &window);

        let ids: Vec<i64> = contests.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1930, 1929]);
        assert_eq!(contests[0].url, "https://codeforces.com/contests/1930");
        assert_eq!(contests[0].duration_hours, 2.0);
        assert_eq!(
            contests[0].end_time,
            Utc.timestamp_opt(1707663300 + 7200, 0).unwrap()
        );
    }

    #[test]
    fn map_past_keeps_finished() {
        let response: CodeforcesResponse = serde_json::from_value(payload()).unwrap();
        let window = Window::recent_past(Utc.timestamp_opt(1707580000, 0).unwrap(), 2);

        let contests = map_response(response, &window);

        assert_eq!(contests.len(), 1);
        assert_eq!(contests[0].id, 1928);
        assert_eq!(contests[0].duration_hours, 2.25);
    }

    #[tokio::test]
    async fn failed_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/contest.list"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "FAILED",
                "comment": "Call limit exceeded"
            })))
            .mount(&server)
            .await;

        let source = CodeforcesSource::new(
            &server.uri(),
            build_client().unwrap(),
            Duration::from_millis(500),
        )
        .unwrap();
        let result = source.fetch_contests(&Window::upcoming(Utc::now())).await;

        match result {
            Err(SourceError::UpstreamError(message)) => {
                assert_eq!(message, "Call limit exceeded")
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn malformed_payload_collects_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/contest.list"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        let source = CodeforcesSource::new(
            &server.uri(),
            build_client().unwrap(),
            Duration::from_millis(500),
        )
        .unwrap();
        let window = Window::upcoming(Utc::now());

        assert!(matches!(
            source.fetch_contests(&window).await,
            Err(SourceError::DeserializeError(_))
        ));
        assert!(source.collect(&window).await.is_empty());
    }

    #[tokio::test]
    async fn slow_upstream_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/contest.list"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(payload())
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let source = CodeforcesSource::new(
            &server.uri(),
            build_client().unwrap(),
            Duration::from_millis(200),
        )
        .unwrap();

        let result = source.fetch_contests(&Window::upcoming(Utc::now())).await;
        match result {
            Err(SourceError::RequestError(e)) => assert!(e.is_timeout()),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
