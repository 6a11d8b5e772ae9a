use crate::contest::{Contest, ContestStatus};
use chrono::{DateTime, Months, Utc};

pub const DEFAULT_PAST_MONTHS: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowPolicy {
    /// Contests that have not ended yet.
    Upcoming,
    /// Contests that ended within the trailing number of months.
    RecentPast { months: u32 },
}

/// Time window deciding which contests are included and what status they get.
///
/// The window owns the resolution clock, so every status in one resolved list is
/// computed against the same `now`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    policy: WindowPolicy,
    now: DateTime<Utc>,
}

impl Window {
    pub fn upcoming(now: DateTime<Utc>) -> Self {
        Self {
            policy: WindowPolicy::Upcoming,
            now,
        }
    }

    pub fn recent_past(now: DateTime<Utc>, months: u32) -> Self {
        Self {
            policy: WindowPolicy::RecentPast { months },
            now,
        }
    }

    pub fn policy(&self) -> WindowPolicy {
        self.policy
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    pub fn is_upcoming(&self) -> bool {
        matches!(self.policy, WindowPolicy::Upcoming)
    }

    /// Earliest end time a contest may have to be inside the window.
    ///
    /// Months are calendar months; the day is clamped to the end of a shorter month.
    pub fn lower_bound(&self) -> DateTime<Utc> {
        match self.policy {
            WindowPolicy::Upcoming => self.now,
            WindowPolicy::RecentPast { months } => self
                .now
                .checked_sub_months(Months::new(months))
                .unwrap_or(DateTime::<Utc>::MIN_UTC),
        }
    }

    /// Status of a contest under this window, or `None` if it falls outside.
    pub fn classify(
        &self,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Option<ContestStatus> {
        match self.policy {
            WindowPolicy::Upcoming => {
                if end_time <= self.now {
                    None
                } else if start_time <= self.now {
                    Some(ContestStatus::Ongoing)
                } else {
                    Some(ContestStatus::Upcoming)
                }
            }
            WindowPolicy::RecentPast { .. } => {
                if self.lower_bound() <= end_time && end_time <= self.now {
                    Some(ContestStatus::Past)
                } else {
                    None
                }
            }
        }
    }

    pub fn apply(&self, contests: Vec<Contest>) -> Vec<Contest> {
        contests
            .into_iter()
            .filter_map(|mut contest| {
                let status = self.classify(contest.start_time, contest.end_time)?;
                contest.status = status;
                Some(contest)
            })
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::contest::Platform;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 15, 12, 0, 0).unwrap()
    }

    fn contest(name: &str, start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Contest {
        Contest::with_synthetic_id(
            name,
            Platform::Codechef,
            "https://www.codechef.com/START100",
            start_time,
            end_time,
        )
    }

    #[test]
    fn running_contest_is_ongoing() {
        let window = Window::upcoming(now());
        let status = window.classify(now() - Duration::hours(1), now() + Duration::hours(1));
        assert_eq!(status, Some(ContestStatus::Ongoing));
    }

    #[test]
    fn future_contest_is_upcoming() {
        let window = Window::upcoming(now());
        let status = window.classify(now() + Duration::hours(1), now() + Duration::hours(3));
        assert_eq!(status, Some(ContestStatus::Upcoming));
    }

    #[test]
    fn finished_contest_is_dropped_from_upcoming() {
        let window = Window::upcoming(now());
        assert_eq!(
            window.classify(now() - Duration::hours(3), now() - Duration::hours(1)),
            None
        );
        assert_eq!(window.classify(now() - Duration::hours(2), now()), None);
    }

    #[test]
    fn recent_past_includes_contest_ended_an_hour_ago() {
        let window = Window::recent_past(now(), DEFAULT_PAST_MONTHS);
        let status = window.classify(now() - Duration::hours(3), now() - Duration::hours(1));
        assert_eq!(status, Some(ContestStatus::Past));
    }

    #[test]
    fn recent_past_excludes_contest_ended_three_months_ago() {
        let window = Window::recent_past(now(), DEFAULT_PAST_MONTHS);
        let ended = now().checked_sub_months(Months::new(3)).unwrap();
        assert_eq!(window.classify(ended - Duration::hours(2), ended), None);
    }

    #[test]
    fn recent_past_excludes_contests_not_ended_yet() {
        let window = Window::recent_past(now(), DEFAULT_PAST_MONTHS);
        assert_eq!(
            window.classify(now() - Duration::hours(1), now() + Duration::hours(1)),
            None
        );
    }

    #[test]
    fn lower_bound_clamps_to_month_end() {
        let now = Utc.with_ymd_and_hms(2024, 4, 30, 0, 0, 0).unwrap();
        let window = Window::recent_past(now, 2);
        assert_eq!(
            window.lower_bound(),
            Utc.with_ymd_and_hms(2024, 2, 29, 0, 0, 0).unwrap()
        );
        assert_eq!(Window::upcoming(now).lower_bound(), now);
    }

    #[test]
    fn apply_assigns_status_and_drops_outsiders() {
        let window = Window::upcoming(now());
        let contests = vec![
            contest("running", now() - Duration::hours(1), now() + Duration::hours(1)),
            contest("finished", now() - Duration::hours(3), now() - Duration::hours(1)),
            contest("later", now() + Duration::days(1), now() + Duration::days(1) + Duration::hours(2)),
        ];

        let filtered = window.apply(contests);

        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0].name, "running");
        assert_eq!(filtered[0].status, ContestStatus::Ongoing);
        assert_eq!(filtered[1].name, "later");
        assert_eq!(filtered[1].status, ContestStatus::Upcoming);
    }

    #[test]
    fn apply_tolerates_end_before_start() {
        let window = Window::upcoming(now());
        let broken = contest("broken", now() + Duration::hours(5), now() + Duration::hours(1));

        let filtered = window.apply(vec![broken]);

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].status, ContestStatus::Upcoming);
        assert_eq!(filtered[0].duration_hours, 0.0);
    }
}
