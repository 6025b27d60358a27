#![forbid(unsafe_code)]

use sb_core::metrics::{ActivitySummary, KpiStatus, KpiSummary, OverdueState};
use sb_core::records::{Activity, Kpi};
use time::OffsetDateTime;

/// Owner edit of one activity. `None` leaves a field as it is.
#[derive(Clone, Debug, PartialEq)]
pub struct ActivityUpdateRequest {
    pub mabadara: String,
    pub activity: String,
    /// Clamped into 0..=100.
    pub progress: Option<i64>,
    /// Dates that do not parse are skipped and reported in `ignored`.
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub evidence_link: Option<String>,
    /// Appended to the owner comment log; blank is a no-op.
    pub owner_comment: Option<String>,
    pub at: OffsetDateTime,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActivityCreateRequest {
    pub mabadara: String,
    pub activity: String,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActivityComment {
    pub mabadara: String,
    pub activity: String,
    pub comment: String,
}

/// Admin notes on any number of activities, saved together.
#[derive(Clone, Debug, PartialEq)]
pub struct ActivityCommentsRequest {
    pub comments: Vec<ActivityComment>,
    pub at: OffsetDateTime,
}

#[derive(Clone, Debug, PartialEq)]
pub struct KpiTargetRequest {
    pub kpi_name: String,
    pub target: Option<f64>,
    pub admin_comment: Option<String>,
    pub at: OffsetDateTime,
}

#[derive(Clone, Debug, PartialEq)]
pub struct KpiActualRequest {
    pub kpi_name: String,
    pub actual: Option<f64>,
    pub owner_comment: Option<String>,
    pub at: OffsetDateTime,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ActivityStatusRow {
    pub activity: Activity,
    pub overdue: OverdueState,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ActivitiesView {
    pub rows: Vec<ActivityStatusRow>,
    pub summary: ActivitySummary,
    pub revision: i64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct KpiStatusRow {
    pub kpi: Kpi,
    pub status: KpiStatus,
}

#[derive(Clone, Debug, PartialEq)]
pub struct KpisView {
    pub rows: Vec<KpiStatusRow>,
    pub summary: KpiSummary,
    pub revision: i64,
}

/// Result of a write action. `committed` is false when nothing changed and no
/// write was issued.
#[derive(Clone, Debug, PartialEq)]
pub struct CommitOutcome {
    pub revision: i64,
    pub committed: bool,
    pub changed_rows: usize,
}

/// A request field that could not be parsed and was left as stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IgnoredField {
    pub column: &'static str,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ActivityUpdated {
    pub activity: Activity,
    pub outcome: CommitOutcome,
    pub ignored: Vec<IgnoredField>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct KpiUpdated {
    pub kpi: Kpi,
    pub status: KpiStatus,
    pub outcome: CommitOutcome,
    pub ignored: Vec<IgnoredField>,
}
