#![forbid(unsafe_code)]

use super::{activity_json, write_ok};
use crate::{
    Args, ai_error, ai_ok, optional_i64, optional_string, require_string, store_error,
};
use sb_core::access::{Action, RequestContext};
use sb_core::parse::{format_date, parse_date};
use sb_storage::{
    ActivityComment, ActivityCommentsRequest, ActivityCreateRequest, ActivityUpdateRequest,
    Engine, TableStore,
};
use serde::Deserialize;
use serde_json::{Value, json};
use time::OffsetDateTime;

#[derive(Debug, Deserialize)]
struct CommentArg {
    mabadara: String,
    activity: String,
    comment: String,
}

pub(crate) fn list<S: TableStore>(
    engine: &Engine<S>,
    ctx: &RequestContext,
    args: &Args,
) -> Result<Value, Value> {
    let today = match optional_string(args, "today")? {
        Some(raw) => parse_date(&raw)
            .ok_or_else(|| ai_error("INVALID_INPUT", "today must be a YYYY-MM-DD date"))?,
        None => OffsetDateTime::now_utc().date(),
    };
    let view = engine
        .list_activities(ctx, today)
        .map_err(|e| store_error(&e))?;

    let rows = view
        .rows
        .iter()
        .map(|row| {
            let mut value = activity_json(&row.activity);
            if let Some(obj) = value.as_object_mut() {
                obj.insert("overdue".to_string(), json!(row.overdue.as_str()));
            }
            value
        })
        .collect::<Vec<_>>();
    let summary = view.summary;
    Ok(ai_ok(
        Action::ListActivities.as_str(),
        json!({
            "today": format_date(today),
            "revision": view.revision,
            "summary": {
                "total": summary.total,
                "completed": summary.completed,
                "overdue": summary.overdue,
                "not_comparable": summary.not_comparable,
                "average_progress": summary.average_progress
            },
            "activities": rows
        }),
    ))
}

pub(crate) fn update<S: TableStore>(
    engine: &Engine<S>,
    ctx: &RequestContext,
    args: &Args,
) -> Result<Value, Value> {
    let request = ActivityUpdateRequest {
        mabadara: require_string(args, "mabadara")?,
        activity: require_string(args, "activity")?,
        progress: optional_i64(args, "progress")?,
        start_date: optional_string(args, "start_date")?,
        end_date: optional_string(args, "end_date")?,
        evidence_link: optional_string(args, "evidence_link")?,
        owner_comment: optional_string(args, "owner_comment")?,
        at: OffsetDateTime::now_utc(),
    };
    let updated = engine
        .update_activity(ctx, request)
        .map_err(|e| store_error(&e))?;
    Ok(write_ok(
        Action::UpdateActivity.as_str(),
        json!({ "activity": activity_json(&updated.activity) }),
        &updated.outcome,
        &updated.ignored,
    ))
}

pub(crate) fn add<S: TableStore>(
    engine: &Engine<S>,
    ctx: &RequestContext,
    args: &Args,
) -> Result<Value, Value> {
    let request = ActivityCreateRequest {
        mabadara: require_string(args, "mabadara")?,
        activity: require_string(args, "activity")?,
        start_date: optional_string(args, "start_date")?.unwrap_or_default(),
        end_date: optional_string(args, "end_date")?.unwrap_or_default(),
    };
    let added = engine
        .add_activity(ctx, request)
        .map_err(|e| store_error(&e))?;
    Ok(write_ok(
        Action::AddActivity.as_str(),
        json!({ "activity": activity_json(&added.activity) }),
        &added.outcome,
        &added.ignored,
    ))
}

pub(crate) fn comment<S: TableStore>(
    engine: &Engine<S>,
    ctx: &RequestContext,
    args: &Args,
) -> Result<Value, Value> {
    let Some(raw) = args.get("comments") else {
        return Err(ai_error("INVALID_INPUT", "comments is required"));
    };
    let parsed: Vec<CommentArg> = serde_json::from_value(raw.clone()).map_err(|_| {
        ai_error(
            "INVALID_INPUT",
            "comments must be a list of {mabadara, activity, comment}",
        )
    })?;
    if parsed.is_empty() {
        return Err(ai_error("INVALID_INPUT", "comments must not be empty"));
    }

    let request = ActivityCommentsRequest {
        comments: parsed
            .into_iter()
            .map(|c| ActivityComment {
                mabadara: c.mabadara,
                activity: c.activity,
                comment: c.comment,
            })
            .collect(),
        at: OffsetDateTime::now_utc(),
    };
    let outcome = engine
        .comment_activities(ctx, request)
        .map_err(|e| store_error(&e))?;
    Ok(write_ok(Action::CommentActivities.as_str(), json!({}), &outcome, &[]))
}
