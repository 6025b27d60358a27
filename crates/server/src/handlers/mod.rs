#![forbid(unsafe_code)]

//! Argument parsing and JSON rendering around the engine's actions.

pub(crate) mod activities;
pub(crate) mod kpis;

use crate::{ai_ok_with_warnings, warning};
use sb_core::access::RequestContext;
use sb_core::records::{Activity, Kpi};
use sb_storage::{CommitOutcome, IgnoredField};
use serde_json::{Value, json};

pub(crate) fn context_json(ctx: &RequestContext) -> Value {
    json!({
        "username": ctx.username,
        "name": ctx.name,
        "role": ctx.role.as_str(),
        "assigned_initiatives": ctx.assigned_initiatives
    })
}

pub(crate) fn activity_json(activity: &Activity) -> Value {
    json!({
        "mabadara": activity.mabadara,
        "activity": activity.activity,
        "start_date": activity.start_date,
        "end_date": activity.end_date,
        "progress": activity.progress,
        "evidence_link": activity.evidence_link,
        "owner_comment": activity.owner_comment,
        "admin_comment": activity.admin_comment
    })
}

pub(crate) fn kpi_json(kpi: &Kpi) -> Value {
    json!({
        "kpi_name": kpi.name,
        "target": kpi.target,
        "actual": kpi.actual,
        "direction": kpi.direction.as_str(),
        "owner": kpi.owner,
        "owner_comment": kpi.owner_comment,
        "admin_comment": kpi.admin_comment
    })
}

fn outcome_json(outcome: &CommitOutcome) -> Value {
    json!({
        "revision": outcome.revision,
        "committed": outcome.committed,
        "changed_rows": outcome.changed_rows
    })
}

/// Success envelope for a write action; flags a request that changed nothing
/// and every field that was skipped as unparsable.
fn write_ok(
    intent: &str,
    mut result: Value,
    outcome: &CommitOutcome,
    ignored: &[IgnoredField],
) -> Value {
    if let Some(obj) = result.as_object_mut() {
        obj.insert("outcome".to_string(), outcome_json(outcome));
    }
    let mut warnings = ignored
        .iter()
        .map(|field| {
            let message = format!(
                "{} value {:?} could not be parsed and was not written",
                field.column, field.value
            );
            warning(
                "FIELD_IGNORED",
                &message,
                "Send dates as YYYY-MM-DD and numbers as plain digits.",
            )
        })
        .collect::<Vec<_>>();
    if !outcome.committed {
        warnings.push(warning(
            "NO_CHANGE",
            "the request matched the stored values; nothing was written",
            "No action needed.",
        ));
    }
    ai_ok_with_warnings(intent, result, warnings)
}
