use crate::{
    contest::{Contest, ContestStatus},
    window::{Window, WindowPolicy},
};
use itertools::Itertools;

/// Combine the outputs of one resolver attempt into a single presentable list.
///
/// The steps run in a fixed order: window filter, sort, dedupe, then the
/// ongoing-first partition for upcoming lists. Dedupe keeps the first
/// occurrence in sorted order and never merges fields of duplicates.
pub fn merge_contests<I>(batches: I, window: &Window) -> Vec<Contest>
where
    I: IntoIterator<Item = Vec<Contest>>,
{
    let mut contests = window.apply(batches.into_iter().flatten().collect());

    match window.policy() {
        WindowPolicy::Upcoming => contests.sort_by_key(|contest| contest.start_time),
        WindowPolicy::RecentPast { .. } => {
            contests.sort_by(|left, right| right.end_time.cmp(&left.end_time))
        }
    }

    let contests: Vec<Contest> = contests
        .into_iter()
        .unique_by(|contest| contest.dedupe_key())
        .collect();

    if window.is_upcoming() {
        let (ongoing, upcoming): (Vec<Contest>, Vec<Contest>) = contests
            .into_iter()
            .partition(|contest| contest.status == ContestStatus::Ongoing);
        ongoing.into_iter().chain(upcoming).collect()
    } else {
        contests
    }
}
