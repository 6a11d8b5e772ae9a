use crate::modules::models::request::{
    ContestQueryParameters, PastContestQueryParameters, ValidatedQueryParameters,
};
use axum::{extract::Extension, http::StatusCode, Json};
use chrono::Utc;
use contest_tracker_libs::{Contest, ContestResolver, Resolution, Window, SOURCE_HEADER};
use std::sync::Arc;

type ContestsResponse = ([(&'static str, &'static str); 1], Json<Vec<Contest>>);

fn into_response(resolution: Resolution) -> ContestsResponse {
    (
        [(SOURCE_HEADER, resolution.tier.as_str())],
        Json(resolution.contests),
    )
}

/// Ongoing contests first, then upcoming ones by start time.
pub async fn contests(
    ValidatedQueryParameters(params): ValidatedQueryParameters<ContestQueryParameters>,
    Extension(resolver): Extension<Arc<ContestResolver>>,
) -> ContestsResponse {
    let window = Window::upcoming(Utc::now());
    let resolution = resolver
        .resolve(&window)
        .await
        .retain_platforms(&params.platforms());

    into_response(resolution)
}

/// Contests that ended within the last `months` months, most recent first.
pub async fn past_contests(
    ValidatedQueryParameters(params): ValidatedQueryParameters<PastContestQueryParameters>,
    Extension(resolver): Extension<Arc<ContestResolver>>,
) -> ContestsResponse {
    let window = Window::recent_past(Utc::now(), params.months());
    let resolution = resolver
        .resolve(&window)
        .await
        .retain_platforms(&params.platforms());

    into_response(resolution)
}

pub async fn liveness() -> StatusCode {
    StatusCode::OK
}
