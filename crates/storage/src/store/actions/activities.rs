#![forbid(unsafe_code)]

use super::{Engine, locate_row, normalize_date, rows_equal};
use crate::store::{
    ActivitiesView, ActivityCommentsRequest, ActivityCreateRequest, ActivityStatusRow,
    ActivityUpdateRequest, ActivityUpdated, CommitOutcome, StoreError, TableStore, read_table,
};
use sb_core::access::{
    Action, RequestContext, activity_write_fields, authorize, authorize_fields, can_see_activity,
    can_see_initiative,
};
use sb_core::annotation::append_entry;
use sb_core::locate::{FieldUpdates, NaturalKey, apply_at, locate};
use sb_core::metrics::{overdue_state, summarize_activities};
use sb_core::parse::{PROGRESS_MAX, PROGRESS_MIN};
use sb_core::records::Activity;
use sb_core::schema::{ACTIVITIES, activities as col};
use time::Date;
use tracing::info;

impl<S: TableStore> Engine<S> {
    pub fn list_activities(
        &self,
        ctx: &RequestContext,
        today: Date,
    ) -> Result<ActivitiesView, StoreError> {
        authorize(ctx, Action::ListActivities)?;
        let read = read_table(&self.store, ACTIVITIES)?;
        let visible = read
            .snapshot
            .rows()
            .iter()
            .map(Activity::from_row)
            .filter(|activity| can_see_activity(ctx, activity))
            .collect::<Vec<_>>();
        let summary = summarize_activities(&visible, today);
        let rows = visible
            .into_iter()
            .map(|activity| ActivityStatusRow {
                overdue: overdue_state(i64::from(activity.progress), &activity.end_date, today),
                activity,
            })
            .collect();
        Ok(ActivitiesView {
            rows,
            summary,
            revision: read.revision,
        })
    }

    pub fn update_activity(
        &self,
        ctx: &RequestContext,
        request: ActivityUpdateRequest,
    ) -> Result<ActivityUpdated, StoreError> {
        authorize(ctx, Action::UpdateActivity)?;
        let ActivityUpdateRequest {
            mabadara,
            activity,
            progress,
            start_date,
            end_date,
            evidence_link,
            owner_comment,
            at,
        } = request;

        if progress.is_none()
            && start_date.is_none()
            && end_date.is_none()
            && evidence_link.is_none()
            && owner_comment.is_none()
        {
            return Err(StoreError::InvalidInput("no fields to update"));
        }
        if !can_see_initiative(ctx, &mabadara) {
            return Err(StoreError::Forbidden {
                role: ctx.role.as_str().to_string(),
                action: Action::UpdateActivity.as_str(),
            });
        }
        let mut ignored = Vec::new();
        let start_date = start_date.and_then(|v| normalize_date(col::START_DATE, &v, &mut ignored));
        let end_date = end_date.and_then(|v| normalize_date(col::END_DATE, &v, &mut ignored));

        let mut read = read_table(&self.store, ACTIVITIES)?;
        let index = locate_row(&read, &NaturalKey::new([&mabadara, &activity]))?;
        let Some(before) = read.snapshot.row(index).cloned() else {
            return Err(StoreError::RecordNotFound {
                table: ACTIVITIES.name,
                key: NaturalKey::new([&mabadara, &activity]).to_string(),
            });
        };

        let mut updates = FieldUpdates::new();
        if let Some(progress) = progress {
            updates.insert(col::PROGRESS, progress.clamp(PROGRESS_MIN, PROGRESS_MAX));
        }
        if let Some(start_date) = start_date {
            updates.insert(col::START_DATE, start_date);
        }
        if let Some(end_date) = end_date {
            updates.insert(col::END_DATE, end_date);
        }
        if let Some(link) = evidence_link {
            updates.insert(col::EVIDENCE_LINK, link.trim());
        }
        if let Some(comment) = owner_comment {
            let log = append_entry(&before.text(col::OWNER_COMMENT), &comment, at);
            updates.insert(col::OWNER_COMMENT, log);
        }
        authorize_fields(ctx, Action::UpdateActivity, &updates, activity_write_fields(&ctx.role))?;
        apply_at(&mut read.snapshot, index, &updates);

        let after = read.snapshot.row(index).cloned().unwrap_or_default();
        let changed_rows = usize::from(!rows_equal(&before, &after));
        let outcome = self.commit_changes(&read, changed_rows)?;
        info!(
            user = %ctx.username,
            mabadara = %mabadara,
            activity = %activity,
            committed = outcome.committed,
            ignored = ignored.len(),
            "activity updated"
        );
        Ok(ActivityUpdated {
            activity: Activity::from_row(&after),
            outcome,
            ignored,
        })
    }

    /// Creates a row through `append_row`; no full-table write is involved.
    pub fn add_activity(
        &self,
        ctx: &RequestContext,
        request: ActivityCreateRequest,
    ) -> Result<ActivityUpdated, StoreError> {
        authorize(ctx, Action::AddActivity)?;
        let mabadara = request.mabadara.trim();
        let name = request.activity.trim();
        if name.is_empty() {
            return Err(StoreError::InvalidInput("activity name must not be empty"));
        }
        if !can_see_initiative(ctx, mabadara) {
            return Err(StoreError::Forbidden {
                role: ctx.role.as_str().to_string(),
                action: Action::AddActivity.as_str(),
            });
        }
        let mut ignored = Vec::new();
        let start_date =
            normalize_date(col::START_DATE, &request.start_date, &mut ignored).unwrap_or_default();
        let end_date =
            normalize_date(col::END_DATE, &request.end_date, &mut ignored).unwrap_or_default();

        let read = read_table(&self.store, ACTIVITIES)?;
        if locate(&read.snapshot, &ACTIVITIES, &NaturalKey::new([mabadara, name])).is_ok() {
            return Err(StoreError::InvalidInput(
                "activity already exists in this initiative",
            ));
        }

        let row = Activity::new_row(mabadara, name, &start_date, &end_date);
        let revision = self.store.append_row(ACTIVITIES.name, &row)?;
        info!(user = %ctx.username, mabadara, activity = name, revision, "activity added");
        Ok(ActivityUpdated {
            activity: Activity::from_row(&row),
            outcome: CommitOutcome {
                revision,
                committed: true,
                changed_rows: 1,
            },
            ignored,
        })
    }

    /// Appends admin notes to several activities and saves them in one write.
    /// Any missing activity aborts the whole batch.
    pub fn comment_activities(
        &self,
        ctx: &RequestContext,
        request: ActivityCommentsRequest,
    ) -> Result<CommitOutcome, StoreError> {
        authorize(ctx, Action::CommentActivities)?;
        let mut read = read_table(&self.store, ACTIVITIES)?;
        let mut changed = Vec::new();
        for entry in &request.comments {
            let index = locate_row(&read, &NaturalKey::new([&entry.mabadara, &entry.activity]))?;
            if entry.comment.trim().is_empty() {
                continue;
            }
            let existing = read
                .snapshot
                .row(index)
                .map(|row| row.text(col::ADMIN_COMMENT))
                .unwrap_or_default();
            let log = append_entry(&existing, &entry.comment, request.at);
            let updates = FieldUpdates::new().set(col::ADMIN_COMMENT, log);
            authorize_fields(
                ctx,
                Action::CommentActivities,
                &updates,
                activity_write_fields(&ctx.role),
            )?;
            apply_at(&mut read.snapshot, index, &updates);
            if !changed.contains(&index) {
                changed.push(index);
            }
        }
        let outcome = self.commit_changes(&read, changed.len())?;
        info!(
            user = %ctx.username,
            rows = outcome.changed_rows,
            committed = outcome.committed,
            "admin comments saved"
        );
        Ok(outcome)
    }
}
