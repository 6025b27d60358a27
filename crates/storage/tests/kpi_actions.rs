#![forbid(unsafe_code)]

use sb_core::Cell;
use sb_core::access::RequestContext;
use sb_core::metrics::KpiStatus;
use sb_core::records::{Direction, Role};
use sb_core::schema::KPIS;
use sb_storage::{
    Engine, KpiActualRequest, KpiTargetRequest, MemoryTableStore, StoreError, TableStore,
};
use time::macros::datetime;

fn kpi(name: &str, target: Cell, actual: Cell, direction: &str, owner: &str) -> Vec<Cell> {
    vec![
        Cell::text(name),
        target,
        actual,
        Cell::text(direction),
        Cell::text(owner),
        Cell::Empty,
        Cell::Empty,
    ]
}

fn seeded() -> MemoryTableStore {
    let store = MemoryTableStore::new();
    store.insert_table(
        KPIS.name,
        KPIS.columns,
        vec![
            kpi("Coverage", Cell::text("80%"), Cell::Int(85), "Ascending", "sara"),
            kpi("Defects", Cell::Int(10), Cell::Int(5), "تنازلي", "omar"),
            kpi("Uptime", Cell::Float(99.5), Cell::text("n/a"), "", "sara"),
        ],
    );
    store
}

fn admin() -> RequestContext {
    RequestContext::new("boss", "Boss", Role::Admin, "")
}

fn sara() -> RequestContext {
    RequestContext::new("sara", "Sara", Role::Owner, "")
}

fn actual(name: &str, value: Option<f64>, comment: Option<&str>) -> KpiActualRequest {
    KpiActualRequest {
        kpi_name: name.to_string(),
        actual: value,
        owner_comment: comment.map(str::to_string),
        at: datetime!(2025-03-01 12:00 UTC),
    }
}

#[test]
fn list_classifies_each_visible_kpi() {
    let store = seeded();
    let engine = Engine::new(&store);

    let view = engine.list_kpis(&admin()).expect("list");
    let statuses = view.rows.iter().map(|r| r.status).collect::<Vec<_>>();
    assert_eq!(
        statuses,
        vec![KpiStatus::Ahead, KpiStatus::Ahead, KpiStatus::Behind]
    );
    assert_eq!(view.rows[1].kpi.direction, Direction::Descending);
    assert_eq!(view.rows[2].kpi.actual, 0.0);
    assert_eq!((view.summary.ahead, view.summary.met, view.summary.behind), (2, 0, 1));

    let own = engine.list_kpis(&sara()).expect("list");
    let names = own.rows.iter().map(|r| r.kpi.name.as_str()).collect::<Vec<_>>();
    assert_eq!(names, vec!["Coverage", "Uptime"]);

    let viewer = RequestContext::new("v", "V", Role::Viewer, "");
    assert_eq!(engine.list_kpis(&viewer).expect("list").rows.len(), 3);
}

#[test]
fn admin_sets_target_and_reclassifies() {
    let store = seeded();
    let engine = Engine::new(&store);
    let updated = engine
        .set_kpi_target(
            &admin(),
            KpiTargetRequest {
                kpi_name: " Coverage ".to_string(),
                target: Some(85.0),
                admin_comment: Some("raised after review".to_string()),
                at: datetime!(2025-03-01 12:00 UTC),
            },
        )
        .expect("set target");
    assert_eq!(updated.status, KpiStatus::Met);
    assert_eq!(updated.kpi.admin_comment, "* 2025-03-01 12:00: raised after review");
    assert_eq!(store.write_count(), 1);

    let rows = store.read(KPIS.name).expect("read").rows;
    assert_eq!(rows[0][1], Cell::Int(85));
    assert_eq!(rows[0][2], Cell::Int(85));
    assert_eq!(rows[1], kpi("Defects", Cell::Int(10), Cell::Int(5), "تنازلي", "omar"));
}

#[test]
fn fractional_targets_are_stored_as_floats() {
    let store = seeded();
    let engine = Engine::new(&store);
    engine
        .set_kpi_target(
            &admin(),
            KpiTargetRequest {
                kpi_name: "Uptime".to_string(),
                target: Some(99.9),
                admin_comment: None,
                at: datetime!(2025-03-01 12:00 UTC),
            },
        )
        .expect("set target");
    assert_eq!(store.read(KPIS.name).expect("read").rows[2][1], Cell::Float(99.9));
}

#[test]
fn non_finite_target_is_skipped_and_the_comment_still_lands() {
    let store = seeded();
    let engine = Engine::new(&store);
    let updated = engine
        .set_kpi_target(
            &admin(),
            KpiTargetRequest {
                kpi_name: "Coverage".to_string(),
                target: Some(f64::NAN),
                admin_comment: Some("recheck the source".to_string()),
                at: datetime!(2025-03-01 12:00 UTC),
            },
        )
        .expect("set target");
    assert_eq!(updated.ignored.len(), 1);
    assert_eq!(updated.ignored[0].column, "Target");
    assert!(updated.outcome.committed);

    let row = &store.read(KPIS.name).expect("read").rows[0];
    assert_eq!(row[1], Cell::text("80%"));
    assert_eq!(row[6], Cell::text("* 2025-03-01 12:00: recheck the source"));
}

#[test]
fn owner_reports_actual_with_a_comment() {
    let store = seeded();
    let engine = Engine::new(&store);
    engine
        .update_kpi_actual(&sara(), actual("Uptime", Some(99.5), Some("steady")))
        .expect("first");
    let updated = engine
        .update_kpi_actual(&sara(), actual("Uptime", None, Some("still steady")))
        .expect("second");
    assert_eq!(updated.status, KpiStatus::Met);
    assert_eq!(
        updated.kpi.owner_comment,
        "* 2025-03-01 12:00: steady\n----------\n* 2025-03-01 12:00: still steady"
    );
    assert_eq!(store.write_count(), 2);
}

#[test]
fn only_the_kpi_owner_may_report_actual() {
    let store = seeded();
    let engine = Engine::new(&store);
    assert!(matches!(
        engine.update_kpi_actual(&sara(), actual("Defects", Some(1.0), None)),
        Err(StoreError::Forbidden { .. })
    ));
    assert!(matches!(
        engine.update_kpi_actual(&admin(), actual("Coverage", Some(1.0), None)),
        Err(StoreError::Forbidden { .. })
    ));
    assert!(matches!(
        engine.set_kpi_target(
            &sara(),
            KpiTargetRequest {
                kpi_name: "Coverage".to_string(),
                target: Some(1.0),
                admin_comment: None,
                at: datetime!(2025-03-01 12:00 UTC),
            },
        ),
        Err(StoreError::Forbidden { .. })
    ));
    assert_eq!(store.write_count(), 0);
}

#[test]
fn unchanged_value_issues_no_write() {
    let store = seeded();
    let engine = Engine::new(&store);
    let updated = engine
        .update_kpi_actual(&sara(), actual("Coverage", Some(85.0), None))
        .expect("update");
    assert!(!updated.outcome.committed);
    assert_eq!(store.write_count(), 0);
}

#[test]
fn missing_kpi_and_empty_request_are_rejected() {
    let store = seeded();
    let engine = Engine::new(&store);
    match engine.update_kpi_actual(&sara(), actual("Velocity", Some(3.0), None)) {
        Err(StoreError::RecordNotFound { table, key }) => {
            assert_eq!(table, KPIS.name);
            assert_eq!(key, "Velocity");
        }
        other => panic!("expected RecordNotFound, got {other:?}"),
    }
    assert!(matches!(
        engine.update_kpi_actual(&sara(), actual("Coverage", None, None)),
        Err(StoreError::InvalidInput(_))
    ));
    assert_eq!(store.write_count(), 0);
}

#[test]
fn missing_comment_columns_are_healed_on_write() {
    let store = MemoryTableStore::new();
    store.insert_table(
        KPIS.name,
        &["KPI_Name", "Target", "Actual", "Direction", "Owner"],
        vec![vec![
            Cell::text("Coverage"),
            Cell::Int(80),
            Cell::Int(70),
            Cell::Empty,
            Cell::text("sara"),
        ]],
    );
    let engine = Engine::new(&store);
    engine
        .update_kpi_actual(&sara(), actual("Coverage", Some(90.0), None))
        .expect("update");

    let stored = store.read(KPIS.name).expect("read");
    assert_eq!(
        stored.header,
        KPIS.columns.iter().map(|c| c.to_string()).collect::<Vec<_>>()
    );
    assert_eq!(stored.rows[0][2], Cell::Int(90));
    assert_eq!(stored.rows[0][5], Cell::Empty);
}
