#![forbid(unsafe_code)]

use crate::parse::parse_date;
use crate::records::{Activity, Direction, Kpi};
use time::Date;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KpiStatus {
    Ahead,
    Met,
    Behind,
}

impl KpiStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ahead => "ahead",
            Self::Met => "met",
            Self::Behind => "behind",
        }
    }
}

/// Exact comparison, no tolerance: `0.1 + 0.2` against `0.3` is not `Met`.
#[allow(clippy::float_cmp)]
pub fn classify(target: f64, actual: f64, direction: Direction) -> KpiStatus {
    if actual == target {
        return KpiStatus::Met;
    }
    let better = match direction {
        Direction::Ascending => actual > target,
        Direction::Descending => actual < target,
    };
    if better {
        KpiStatus::Ahead
    } else {
        KpiStatus::Behind
    }
}

pub fn is_overdue(progress: i64, end_date: Date, today: Date) -> bool {
    progress < 100 && end_date < today
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverdueState {
    Overdue,
    NotOverdue,
    /// The end date could not be parsed; counted separately, never as on time or late.
    NotComparable,
}

impl OverdueState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Overdue => "overdue",
            Self::NotOverdue => "not_overdue",
            Self::NotComparable => "not_comparable",
        }
    }
}

pub fn overdue_state(progress: i64, end_date: &str, today: Date) -> OverdueState {
    if progress >= 100 {
        return OverdueState::NotOverdue;
    }
    match parse_date(end_date) {
        Some(end) if is_overdue(progress, end, today) => OverdueState::Overdue,
        Some(_) => OverdueState::NotOverdue,
        None => OverdueState::NotComparable,
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ActivitySummary {
    pub total: usize,
    pub completed: usize,
    pub overdue: usize,
    pub not_comparable: usize,
    /// Mean progress rounded down; zero for an empty set.
    pub average_progress: u8,
}

pub fn summarize_activities<'a>(
    activities: impl IntoIterator<Item = &'a Activity>,
    today: Date,
) -> ActivitySummary {
    let mut summary = ActivitySummary::default();
    let mut progress_sum: u64 = 0;
    for activity in activities {
        summary.total += 1;
        progress_sum += u64::from(activity.progress);
        if activity.progress >= 100 {
            summary.completed += 1;
        }
        match overdue_state(i64::from(activity.progress), &activity.end_date, today) {
            OverdueState::Overdue => summary.overdue += 1,
            OverdueState::NotComparable => summary.not_comparable += 1,
            OverdueState::NotOverdue => {}
        }
    }
    if summary.total > 0 {
        summary.average_progress = (progress_sum / summary.total as u64) as u8;
    }
    summary
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KpiSummary {
    pub ahead: usize,
    pub met: usize,
    pub behind: usize,
}

pub fn summarize_kpis<'a>(kpis: impl IntoIterator<Item = &'a Kpi>) -> KpiSummary {
    let mut summary = KpiSummary::default();
    for kpi in kpis {
        match classify(kpi.target, kpi.actual, kpi.direction) {
            KpiStatus::Ahead => summary.ahead += 1,
            KpiStatus::Met => summary.met += 1,
            KpiStatus::Behind => summary.behind += 1,
        }
    }
    summary
}
