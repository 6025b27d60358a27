#![forbid(unsafe_code)]

use super::{kpi_json, write_ok};
use crate::{Args, ai_ok, optional_f64, optional_string, require_string, store_error};
use sb_core::access::{Action, RequestContext};
use sb_storage::{Engine, KpiActualRequest, KpiTargetRequest, KpiUpdated, TableStore};
use serde_json::{Value, json};
use time::OffsetDateTime;

pub(crate) fn list<S: TableStore>(
    engine: &Engine<S>,
    ctx: &RequestContext,
    _args: &Args,
) -> Result<Value, Value> {
    let view = engine.list_kpis(ctx).map_err(|e| store_error(&e))?;
    let rows = view
        .rows
        .iter()
        .map(|row| {
            let mut value = kpi_json(&row.kpi);
            if let Some(obj) = value.as_object_mut() {
                obj.insert("status".to_string(), json!(row.status.as_str()));
            }
            value
        })
        .collect::<Vec<_>>();
    Ok(ai_ok(
        Action::ListKpis.as_str(),
        json!({
            "revision": view.revision,
            "summary": {
                "ahead": view.summary.ahead,
                "met": view.summary.met,
                "behind": view.summary.behind
            },
            "kpis": rows
        }),
    ))
}

fn updated_json(intent: &str, updated: &KpiUpdated) -> Value {
    write_ok(
        intent,
        json!({
            "kpi": kpi_json(&updated.kpi),
            "status": updated.status.as_str()
        }),
        &updated.outcome,
        &updated.ignored,
    )
}

pub(crate) fn set_target<S: TableStore>(
    engine: &Engine<S>,
    ctx: &RequestContext,
    args: &Args,
) -> Result<Value, Value> {
    let request = KpiTargetRequest {
        kpi_name: require_string(args, "kpi_name")?,
        target: optional_f64(args, "target")?,
        admin_comment: optional_string(args, "admin_comment")?,
        at: OffsetDateTime::now_utc(),
    };
    let updated = engine
        .set_kpi_target(ctx, request)
        .map_err(|e| store_error(&e))?;
    Ok(updated_json(Action::SetKpiTarget.as_str(), &updated))
}

pub(crate) fn update_actual<S: TableStore>(
    engine: &Engine<S>,
    ctx: &RequestContext,
    args: &Args,
) -> Result<Value, Value> {
    let request = KpiActualRequest {
        kpi_name: require_string(args, "kpi_name")?,
        actual: optional_f64(args, "actual")?,
        owner_comment: optional_string(args, "owner_comment")?,
        at: OffsetDateTime::now_utc(),
    };
    let updated = engine
        .update_kpi_actual(ctx, request)
        .map_err(|e| store_error(&e))?;
    Ok(updated_json(Action::UpdateKpiActual.as_str(), &updated))
}
