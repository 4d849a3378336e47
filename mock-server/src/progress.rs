//! Goal progress: actual vs. time-prorated distance.

use chrono::NaiveDate;

/// Ratio over the expected distance above which a goal counts as ahead.
const AHEAD_RATIO: f64 = 1.1;
/// Ratio under the expected distance below which a goal counts as behind.
const BEHIND_RATIO: f64 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    OnTrack,
    Behind,
    Ahead,
    Completed,
}

impl Status {
    pub fn label(self) -> &'static str {
        match self {
            Status::OnTrack => "On Track",
            Status::Behind => "Behind",
            Status::Ahead => "Ahead",
            Status::Completed => "Completed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    pub current_distance: f64,
    pub expected_distance: f64,
    pub progress_percentage: f64,
    pub status: Status,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Target prorated over the inclusive range: nothing before it starts, the
/// full target once it has ended.
pub fn expected_distance(target: f64, start: NaiveDate, end: NaiveDate, today: NaiveDate) -> f64 {
    if today < start {
        return 0.0;
    }
    if today >= end {
        return target;
    }
    let total = (end - start).num_days() + 1;
    let elapsed = (today - start).num_days() + 1;
    target * elapsed as f64 / total as f64
}

pub fn compute(
    target: f64,
    start: NaiveDate,
    end: NaiveDate,
    current_distance: f64,
    today: NaiveDate,
) -> Progress {
    let expected = expected_distance(target, start, end, today);
    let percentage = if target > 0.0 {
        current_distance / target * 100.0
    } else {
        0.0
    };

    let status = if current_distance >= target {
        Status::Completed
    } else if current_distance > expected * AHEAD_RATIO {
        Status::Ahead
    } else if current_distance >= expected * BEHIND_RATIO {
        Status::OnTrack
    } else {
        Status::Behind
    };

    Progress {
        current_distance: round2(current_distance),
        expected_distance: round2(expected),
        progress_percentage: round2(percentage),
        status,
    }
}
