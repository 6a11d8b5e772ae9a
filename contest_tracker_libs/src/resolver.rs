use crate::{
    api::{Resolution, SourceTier},
    contest::Contest,
    merge::merge_contests,
    sources::{
        build_client, ClistSource, CodechefSource, CodeforcesSource, ContestSource,
        KontestsSource, LeetcodeSource, Result, SourceConfig,
    },
    window::Window,
};
use futures::future::join_all;
use std::time::Duration;
use tokio::time::{timeout_at, Instant};

/// Resolution cascade. Each state names the provider group tried next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverState {
    PrimaryAggregator,
    DirectSources,
    SecondaryAggregator,
    Empty,
}

impl ResolverState {
    pub fn next(self) -> Self {
        match self {
            ResolverState::PrimaryAggregator => ResolverState::DirectSources,
            ResolverState::DirectSources => ResolverState::SecondaryAggregator,
            ResolverState::SecondaryAggregator | ResolverState::Empty => ResolverState::Empty,
        }
    }

    pub fn source_tier(self) -> SourceTier {
        match self {
            ResolverState::PrimaryAggregator => SourceTier::Primary,
            ResolverState::DirectSources => SourceTier::Direct,
            ResolverState::SecondaryAggregator => SourceTier::Secondary,
            ResolverState::Empty => SourceTier::Exhausted,
        }
    }
}

pub struct ContestResolver {
    primary: Vec<Box<dyn ContestSource>>,
    direct: Vec<Box<dyn ContestSource>>,
    secondary: Vec<Box<dyn ContestSource>>,
    budget: Duration,
}

impl ContestResolver {
    pub fn new(
        primary: Vec<Box<dyn ContestSource>>,
        direct: Vec<Box<dyn ContestSource>>,
        secondary: Vec<Box<dyn ContestSource>>,
        budget: Duration,
    ) -> Self {
        Self {
            primary,
            direct,
            secondary,
            budget,
        }
    }

    /// Wire every upstream adapter from the given configuration.
    pub fn from_config(config: &SourceConfig) -> Result<Self> {
        let client = build_client()?;
        let endpoints = &config.endpoints;
        let timeout = config.request_timeout;

        let primary: Vec<Box<dyn ContestSource>> = vec![Box::new(ClistSource::new(
            &endpoints.clist,
            config.clist_credentials.clone(),
            client.clone(),
            timeout,
        )?)];
        let direct: Vec<Box<dyn ContestSource>> = vec![
            Box::new(CodeforcesSource::new(
                &endpoints.codeforces,
                client.clone(),
                timeout,
            )?),
            Box::new(LeetcodeSource::new(
                &endpoints.leetcode,
                client.clone(),
                timeout,
            )?),
            Box::new(CodechefSource::new(
                &endpoints.codechef,
                client.clone(),
                timeout,
            )?),
        ];
        let secondary: Vec<Box<dyn ContestSource>> =
            vec![Box::new(KontestsSource::new(&endpoints.kontests, client, timeout)?)];

        Ok(Self::new(primary, direct, secondary, config.resolve_budget))
    }

    fn sources(&self, state: ResolverState) -> Option<&[Box<dyn ContestSource>]> {
        match state {
            ResolverState::PrimaryAggregator => Some(self.primary.as_slice()),
            ResolverState::DirectSources => Some(self.direct.as_slice()),
            ResolverState::SecondaryAggregator => Some(self.secondary.as_slice()),
            ResolverState::Empty => None,
        }
    }

    /// Query every source of one state concurrently and merge the results as one unit.
    async fn attempt(sources: &[Box<dyn ContestSource>], window: &Window) -> Vec<Contest> {
        let batches = join_all(sources.iter().map(|source| source.collect(window))).await;
        merge_contests(batches, window)
    }

    /// Walk the cascade until a state yields contests or the budget runs out.
    ///
    /// Never fails: exhaustion of every state resolves to an empty list tagged `none`.
    pub async fn resolve(&self, window: &Window) -> Resolution {
        let start_process = Instant::now();
        let deadline = start_process + self.budget;
        let mut state = ResolverState::PrimaryAggregator;

        while let Some(sources) = self.sources(state) {
            match timeout_at(deadline, Self::attempt(sources, window)).await {
                Ok(contests) if !contests.is_empty() => {
                    let tier = state.source_tier();
                    tracing::info!(
                        target: "contestlog",
                        "elapsed_time={} tier={} hits={} window={:?}",
                        start_process.elapsed().as_millis(), tier, contests.len(), window.policy()
                    );
                    return Resolution { contests, tier };
                }
                Ok(_) => {
                    tracing::debug!("{:?} produced no contests", state);
                    state = state.next();
                }
                Err(_) => {
                    tracing::warn!(
                        "resolution budget of {}ms exhausted during {:?}",
                        self.budget.as_millis(),
                        state
                    );
                    break;
                }
            }
        }

        tracing::info!(
            target: "contestlog",
            "elapsed_time={} tier={} hits=0 window={:?}",
            start_process.elapsed().as_millis(), SourceTier::Exhausted, window.policy()
        );
        Resolution::exhausted()
    }
}
