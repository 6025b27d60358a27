#![forbid(unsafe_code)]

use super::{Engine, locate_row, number_cell, rows_equal};
use crate::store::{
    IgnoredField, KpiActualRequest, KpiStatusRow, KpiTargetRequest, KpiUpdated, KpisView,
    StoreError, TableRead, TableStore, read_table,
};
use sb_core::access::{
    Action, RequestContext, authorize, authorize_fields, can_see_kpi, kpi_write_fields,
};
use sb_core::annotation::append_entry;
use sb_core::locate::{FieldUpdates, NaturalKey, apply_at};
use sb_core::metrics::{classify, summarize_kpis};
use sb_core::records::Kpi;
use sb_core::schema::{KPIS, kpis as col};
use tracing::info;

impl<S: TableStore> Engine<S> {
    pub fn list_kpis(&self, ctx: &RequestContext) -> Result<KpisView, StoreError> {
        authorize(ctx, Action::ListKpis)?;
        let read = read_table(&self.store, KPIS)?;
        let visible = read
            .snapshot
            .rows()
            .iter()
            .map(Kpi::from_row)
            .filter(|kpi| can_see_kpi(ctx, kpi))
            .collect::<Vec<_>>();
        let summary = summarize_kpis(&visible);
        let rows = visible
            .into_iter()
            .map(|kpi| KpiStatusRow {
                status: classify(kpi.target, kpi.actual, kpi.direction),
                kpi,
            })
            .collect();
        Ok(KpisView {
            rows,
            summary,
            revision: read.revision,
        })
    }

    pub fn set_kpi_target(
        &self,
        ctx: &RequestContext,
        request: KpiTargetRequest,
    ) -> Result<KpiUpdated, StoreError> {
        authorize(ctx, Action::SetKpiTarget)?;
        if request.target.is_none() && request.admin_comment.is_none() {
            return Err(StoreError::InvalidInput("no fields to update"));
        }
        let mut ignored = Vec::new();
        let target = request.target.and_then(|v| number_cell(col::TARGET, v, &mut ignored));

        let mut read = read_table(&self.store, KPIS)?;
        let index = locate_row(&read, &NaturalKey::new([&request.kpi_name]))?;
        let before = read.snapshot.row(index).cloned().unwrap_or_default();

        let mut updates = FieldUpdates::new();
        if let Some(target) = target {
            updates.insert(col::TARGET, target);
        }
        if let Some(comment) = request.admin_comment.as_deref() {
            let log = append_entry(&before.text(col::ADMIN_COMMENT), comment, request.at);
            updates.insert(col::ADMIN_COMMENT, log);
        }
        self.finish_kpi_edit(ctx, Action::SetKpiTarget, &mut read, index, &updates, ignored)
    }

    /// Only the KPI's assigned owner may report its actual value.
    pub fn update_kpi_actual(
        &self,
        ctx: &RequestContext,
        request: KpiActualRequest,
    ) -> Result<KpiUpdated, StoreError> {
        authorize(ctx, Action::UpdateKpiActual)?;
        if request.actual.is_none() && request.owner_comment.is_none() {
            return Err(StoreError::InvalidInput("no fields to update"));
        }
        let mut ignored = Vec::new();
        let actual = request.actual.and_then(|v| number_cell(col::ACTUAL, v, &mut ignored));

        let mut read = read_table(&self.store, KPIS)?;
        let index = locate_row(&read, &NaturalKey::new([&request.kpi_name]))?;
        let before = read.snapshot.row(index).cloned().unwrap_or_default();
        if !can_see_kpi(ctx, &Kpi::from_row(&before)) {
            return Err(StoreError::Forbidden {
                role: ctx.role.as_str().to_string(),
                action: Action::UpdateKpiActual.as_str(),
            });
        }

        let mut updates = FieldUpdates::new();
        if let Some(actual) = actual {
            updates.insert(col::ACTUAL, actual);
        }
        if let Some(comment) = request.owner_comment.as_deref() {
            let log = append_entry(&before.text(col::OWNER_COMMENT), comment, request.at);
            updates.insert(col::OWNER_COMMENT, log);
        }
        self.finish_kpi_edit(ctx, Action::UpdateKpiActual, &mut read, index, &updates, ignored)
    }

    fn finish_kpi_edit(
        &self,
        ctx: &RequestContext,
        action: Action,
        read: &mut TableRead,
        index: usize,
        updates: &FieldUpdates,
        ignored: Vec<IgnoredField>,
    ) -> Result<KpiUpdated, StoreError> {
        authorize_fields(ctx, action, updates, kpi_write_fields(&ctx.role))?;
        let before = read.snapshot.row(index).cloned().unwrap_or_default();
        apply_at(&mut read.snapshot, index, updates);
        let after = read.snapshot.row(index).cloned().unwrap_or_default();
        let changed_rows = usize::from(!rows_equal(&before, &after));
        let outcome = self.commit_changes(read, changed_rows)?;
        let kpi = Kpi::from_row(&after);
        info!(
            user = %ctx.username,
            kpi = %kpi.name,
            committed = outcome.committed,
            ignored = ignored.len(),
            "kpi updated"
        );
        Ok(KpiUpdated {
            status: classify(kpi.target, kpi.actual, kpi.direction),
            kpi,
            outcome,
            ignored,
        })
    }
}
