#![forbid(unsafe_code)]

mod support;
use support::*;

use sb_core::Cell;
use sb_core::schema::{ACTIVITIES, KPIS};
use serde_json::json;

#[test]
fn owner_update_is_persisted_and_visible_to_the_next_process() {
    let mut server = Server::start_seeded("owner_update");
    server.initialize_default();

    let updated = server.call(
        "sara",
        "pw",
        "activities.update",
        json!({
            "mabadara": "A",
            "activity": "X",
            "progress": 60,
            "end_date": "2024/07/15",
            "owner_comment": "halfway"
        }),
    );
    assert_eq!(updated["success"], true, "{updated}");
    assert_eq!(updated["result"]["activity"]["end_date"], "2024-07-15");

    let rows = read_rows(server.storage_dir(), ACTIVITIES.name);
    assert_eq!(rows[0][4], Cell::Int(60));
    assert_eq!(rows[0][3], Cell::text("2024-07-15"));
    assert_eq!(rows[1][4], Cell::Int(10));
    assert_eq!(rows[2][3], Cell::text("tbd"));

    let dir = server.storage_dir().to_path_buf();
    server.keep_storage();
    drop(server);
    let mut next = Server::start_with_storage_dir(dir, &[], true);
    let list = next.call("vic", "pw", "activities.list", json!({ "today": "2024-08-01" }));
    let activities = list["result"]["activities"].as_array().expect("activities");
    assert_eq!(activities.len(), 3);
    assert_eq!(activities[0]["progress"], 60);
    assert_eq!(activities[0]["overdue"], "overdue");
    assert_eq!(activities[2]["overdue"], "not_comparable");
    assert_eq!(list["result"]["summary"]["not_comparable"], 1);
}

#[test]
fn owner_scope_and_role_matrix_hold_end_to_end() {
    let mut server = Server::start_seeded("owner_scope");
    server.initialize_default();

    let own = server.call("sara", "pw", "activities.list", json!({}));
    let names = own["result"]["activities"]
        .as_array()
        .expect("activities")
        .iter()
        .filter_map(|a| a["activity"].as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["X", "Y"]);

    let other = server.call(
        "sara",
        "pw",
        "activities.update",
        json!({ "mabadara": "B", "activity": "Z", "progress": 5 }),
    );
    assert_eq!(other["error"]["code"], "FORBIDDEN");

    let admin_edit = server.call(
        "boss",
        "pw",
        "activities.update",
        json!({ "mabadara": "A", "activity": "X", "progress": 5 }),
    );
    assert_eq!(admin_edit["error"]["code"], "FORBIDDEN");

    let wrong = server.call("boss", "nope", "kpis.list", json!({}));
    assert_eq!(wrong["error"]["code"], "INVALID_CREDENTIALS");

    let unknown_role = server.call("gus", "pw", "login", json!({}));
    assert_eq!(unknown_role["success"], false);
    assert_eq!(unknown_role["error"]["code"], "UNKNOWN_ROLE");
}

#[test]
fn admin_comments_append_and_keep_history() {
    let mut server = Server::start_seeded("admin_comments");
    server.initialize_default();

    for text in ["first look", "second look"] {
        let resp = server.call(
            "boss",
            "pw",
            "activities.comment",
            json!({ "comments": [
                { "mabadara": "A", "activity": "X", "comment": text },
                { "mabadara": "B", "activity": "Z", "comment": text }
            ] }),
        );
        assert_eq!(resp["result"]["outcome"]["changed_rows"], 2, "{resp}");
    }

    let rows = read_rows(server.storage_dir(), ACTIVITIES.name);
    let Cell::Text(log) = &rows[0][7] else {
        panic!("expected admin comment text, got {:?}", rows[0][7]);
    };
    let entries = log.split("\n----------\n").collect::<Vec<_>>();
    assert_eq!(entries.len(), 2);
    assert!(entries[0].starts_with("* ") && entries[0].ends_with(": first look"));
    assert!(entries[1].ends_with(": second look"));
    assert_eq!(rows[1][7], Cell::Empty);
}

#[test]
fn add_activity_then_reject_duplicate() {
    let mut server = Server::start_seeded("add_activity");
    server.initialize_default();

    let added = server.call(
        "sara",
        "pw",
        "activities.add",
        json!({ "mabadara": "A", "activity": "Kickoff", "end_date": "2025-02-01" }),
    );
    assert_eq!(added["success"], true, "{added}");
    assert_eq!(added["result"]["activity"]["progress"], 0);

    let again = server.call(
        "sara",
        "pw",
        "activities.add",
        json!({ "mabadara": "A", "activity": "Kickoff" }),
    );
    assert_eq!(again["error"]["code"], "INVALID_INPUT");

    let rows = read_rows(server.storage_dir(), ACTIVITIES.name);
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[3][1], Cell::text("Kickoff"));
}

#[test]
fn kpi_target_and_actual_flow() {
    let mut server = Server::start_seeded("kpi_flow");
    server.initialize_default();

    let target = server.call(
        "boss",
        "pw",
        "kpis.set_target",
        json!({ "kpi_name": "Coverage", "target": 65, "admin_comment": "rebased" }),
    );
    assert_eq!(target["result"]["status"], "ahead", "{target}");

    let actual = server.call(
        "sara",
        "pw",
        "kpis.update_actual",
        json!({ "kpi_name": "Coverage", "actual": 65 }),
    );
    assert_eq!(actual["result"]["status"], "met");

    let missing = server.call(
        "sara",
        "pw",
        "kpis.update_actual",
        json!({ "kpi_name": "Velocity", "actual": 1 }),
    );
    assert_eq!(missing["error"]["code"], "RECORD_NOT_FOUND");

    let rows = read_rows(server.storage_dir(), KPIS.name);
    assert_eq!(rows[0][1], Cell::Int(65));
    assert_eq!(rows[0][2], Cell::Int(65));
}

#[test]
fn numeric_text_and_bad_dates_do_not_drop_the_rest_of_an_edit() {
    let mut server = Server::start_seeded("lenient_edit");
    server.initialize_default();

    let updated = server.call(
        "sara",
        "pw",
        "activities.update",
        json!({
            "mabadara": "A",
            "activity": "Y",
            "progress": "45%",
            "end_date": "next week",
            "owner_comment": "x"
        }),
    );
    assert_eq!(updated["success"], true, "{updated}");
    assert_eq!(updated["warnings"][0]["code"], "FIELD_IGNORED");

    let rows = read_rows(server.storage_dir(), ACTIVITIES.name);
    assert_eq!(rows[1][4], Cell::Int(45));
    assert_eq!(rows[1][3], Cell::text("2099-01-01"));
    let Cell::Text(log) = &rows[1][6] else {
        panic!("expected owner comment text, got {:?}", rows[1][6]);
    };
    assert!(log.starts_with("* ") && log.ends_with(": x"));
}
