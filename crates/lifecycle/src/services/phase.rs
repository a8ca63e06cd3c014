use chrono::{DateTime, Utc};

use crate::models::{CompetitionRecord, CompetitionStatus, Phase};

/// Derive the display phase of a competition at `now`.
///
/// `Draft` and `Archived` are manual states and are returned unchanged, as is
/// `Completed`. For the timeline-driven statuses the result is the furthest
/// phase whose boundary has passed, never earlier than the persisted status.
/// Boundaries that are not configured never gate anything.
pub fn compute_phase(record: &CompetitionRecord, now: DateTime<Utc>) -> Phase {
    match record.status {
        CompetitionStatus::Draft
        | CompetitionStatus::Archived
        | CompetitionStatus::Completed => Phase::from(record.status),
        CompetitionStatus::Published
        | CompetitionStatus::Nomination
        | CompetitionStatus::Voting
        | CompetitionStatus::Judging => {
            let floor = Phase::from(record.status);
            timeline_phase(record, now).map_or(floor, |reached| reached.max(floor))
        }
    }
}

/// Furthest phase whose configured boundary is at or before `now`.
fn timeline_phase(record: &CompetitionRecord, now: DateTime<Utc>) -> Option<Phase> {
    let boundaries = [
        (record.nomination_start, Phase::Nomination),
        (record.voting_start, Phase::Voting),
        (record.voting_end, Phase::Judging),
        (record.finals_date, Phase::Completed),
    ];

    boundaries
        .into_iter()
        .filter_map(|(at, phase)| at.filter(|at| *at <= now).map(|_| phase))
        .max()
}
