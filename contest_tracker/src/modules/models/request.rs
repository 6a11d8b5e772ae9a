use crate::modules::models::response::ErrorResponse;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::StatusCode;
use axum::Json;
use contest_tracker_libs::{Platform, DEFAULT_PAST_MONTHS};
use http::request::Parts;
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use validator::{Validate, ValidationError};

static VALID_PLATFORMS: Lazy<HashSet<&str>> =
    Lazy::new(|| HashSet::from(["codeforces", "codechef", "leetcode", "atcoder"]));

/// Parse a comma-separated platform list. Returns `None` if any entry is not a known platform.
pub fn parse_platforms(values: &str) -> Option<Vec<Platform>> {
    values
        .split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| {
            let platform = Platform::from_site(value);
            VALID_PLATFORMS
                .contains(platform.as_str())
                .then_some(platform)
        })
        .collect()
}

fn validate_platforms(values: &str) -> Result<(), ValidationError> {
    match parse_platforms(values) {
        Some(_) => Ok(()),
        None => Err(ValidationError::new("unknown platform")),
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, PartialEq, Eq)]
pub struct ContestQueryParameters {
    #[validate(custom = "validate_platforms")]
    pub platform: Option<String>,
}

impl ContestQueryParameters {
    pub fn platforms(&self) -> Vec<Platform> {
        self.platform
            .as_deref()
            .and_then(parse_platforms)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, PartialEq, Eq)]
pub struct PastContestQueryParameters {
    #[validate(custom = "validate_platforms")]
    pub platform: Option<String>,
    #[validate(range(min = 1, max = 12))]
    pub months: Option<u32>,
}

impl PastContestQueryParameters {
    pub fn platforms(&self) -> Vec<Platform> {
        self.platform
            .as_deref()
            .and_then(parse_platforms)
            .unwrap_or_default()
    }

    pub fn months(&self) -> u32 {
        self.months.unwrap_or(DEFAULT_PAST_MONTHS)
    }
}

pub struct ValidatedQueryParameters<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ValidatedQueryParameters<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let query = parts.uri.query().unwrap_or_default();
        let value: T = serde_urlencoded::from_str(query).map_err(|rejection| {
            tracing::error!("Parsing error: {}", rejection);
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new(format!(
                    "invalid format query string: [{}]",
                    rejection
                ))),
            )
        })?;

        value.validate().map_err(|rejection| {
            tracing::error!("Validation error: {}", rejection);
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new(
                    format!("Validation error: [{}]", rejection).replace('\n', ", "),
                )),
            )
        })?;

        Ok(ValidatedQueryParameters(value))
    }
}
