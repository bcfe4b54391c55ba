// JSON-RPC zone server handlers driven through the library
use serde_json::json;
use zone_engine::lsp::{dispatch, error_codes, Request, Response, ServerState};

fn call(state: &mut ServerState, method: &str, params: serde_json::Value) -> Response {
    let request: Request = serde_json::from_value(json!({
        "id": 1,
        "method": method,
        "params": params
    }))
    .expect("valid request");
    dispatch(state, request)
}

fn result(response: Response) -> serde_json::Value {
    assert!(response.error.is_none(), "unexpected error: {:?}", response.error);
    response.result.expect("result present")
}

fn rect(min_x: i64, min_y: i64, max_x: i64, max_y: i64) -> serde_json::Value {
    json!([
        { "x": min_x, "y": min_y },
        { "x": max_x, "y": min_y },
        { "x": max_x, "y": max_y },
        { "x": min_x, "y": max_y }
    ])
}

fn zone_json(id: u64, net: i32, outline: serde_json::Value) -> serde_json::Value {
    json!({
        "id": id,
        "settings": { "net": net, "layer": 0, "priority": 0, "clearance": 10 },
        "outline": { "contours": [outline] }
    })
}

#[test]
fn test_load_reconciles_board() {
    let mut state = ServerState::default();
    let loaded = result(call(&mut state, "Load", json!({
        "zones": [
            zone_json(1, 1, rect(0, 0, 100, 100)),
            zone_json(2, 1, rect(50, 50, 150, 150)),
            zone_json(3, 2, rect(300, 0, 400, 100))
        ]
    })));

    assert_eq!(loaded["zone_count"], 2);
    assert_eq!(loaded["report"]["merged"], 1);

    let zones = result(call(&mut state, "GetZones", json!(null)));
    let ids: Vec<u64> = zones
        .as_array()
        .unwrap()
        .iter()
        .map(|z| z["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 3]);
}

#[test]
fn test_edit_zone_creates_and_merges() {
    let mut state = ServerState::default();
    result(call(&mut state, "Load", json!({ "zones": [zone_json(1, 1, rect(0, 0, 100, 100))] })));

    let outcome = result(call(&mut state, "EditZone", json!({
        "outline": rect(80, 0, 180, 100),
        "net": 1,
        "layer": 0
    })));
    assert_eq!(outcome["report"]["merged"], 1);
    assert_eq!(state.board.len(), 1);

    let changes = result(call(&mut state, "GetChanges", json!(null)));
    let kinds: Vec<&str> = changes
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["type"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, vec!["Added", "Deleted"]);

    // The log is drained once read
    let changes = result(call(&mut state, "GetChanges", json!(null)));
    assert_eq!(changes, json!([]));
}

#[test]
fn test_edit_with_two_corners_is_rejected() {
    let mut state = ServerState::default();
    result(call(&mut state, "Load", json!({ "zones": [zone_json(1, 1, rect(0, 0, 100, 100))] })));
    let before = result(call(&mut state, "GetZones", json!(null)));

    let response = call(&mut state, "EditZone", json!({
        "zone_id": 1,
        "outline": [{ "x": 0, "y": 0 }, { "x": 100, "y": 0 }],
        "net": 1,
        "layer": 0
    }));
    assert_eq!(response.error.map(|e| e.code), Some(error_codes::EDIT_REJECTED));

    let after = result(call(&mut state, "GetZones", json!(null)));
    assert_eq!(before, after);
}

#[test]
fn test_delete_zone() {
    let mut state = ServerState::default();
    result(call(&mut state, "Load", json!({ "zones": [zone_json(7, 1, rect(0, 0, 100, 100))] })));

    let deleted = result(call(&mut state, "DeleteZone", json!({ "zone_id": 7 })));
    assert_eq!(deleted["zone_count"], 0);

    let response = call(&mut state, "DeleteZone", json!({ "zone_id": 7 }));
    assert_eq!(response.error.map(|e| e.code), Some(error_codes::UNKNOWN_ZONE));
}

#[test]
fn test_run_drc_full_and_targeted() {
    let mut state = ServerState::default();
    result(call(&mut state, "Load", json!({
        "zones": [
            zone_json(1, 1, rect(0, 0, 100, 100)),
            zone_json(2, 2, rect(105, 0, 205, 100)),
            zone_json(3, 3, rect(1000, 0, 1100, 100))
        ]
    })));

    let run = result(call(&mut state, "RunDRC", json!(null)));
    assert_eq!(run["violation_count"], 1);

    let violations = result(call(&mut state, "GetDRCViolations", json!(null)));
    assert_eq!(violations[0]["kind"], "ZonesTooClose");
    assert_eq!(violations[0]["zone_a"], 1);
    assert_eq!(violations[0]["zone_b"], 2);

    // Re-checking zone 3 keeps the cached result for the other pair
    let run = result(call(&mut state, "RunDRC", json!({ "zone_id": 3 })));
    assert_eq!(run["violation_count"], 1);

    let response = call(&mut state, "RunDRC", json!({ "zone_id": 42 }));
    assert_eq!(response.error.map(|e| e.code), Some(error_codes::UNKNOWN_ZONE));
}

#[test]
fn test_check_zone_edge() {
    let mut state = ServerState::default();
    result(call(&mut state, "Load", json!({
        "zones": [
            zone_json(1, 1, rect(0, 0, 100, 100)),
            zone_json(2, 2, rect(105, 0, 205, 100))
        ]
    })));

    let hit = result(call(&mut state, "CheckZoneEdge", json!({ "zone_id": 1, "corner_index": 1 })));
    assert_eq!(hit["kind"], "ZonesTooClose");

    let clean = result(call(
        &mut state,
        "CheckZoneEdge",
        json!({ "zone_id": 1, "corner_index": 3 }),
    ));
    assert!(clean.is_null());
}

#[test]
fn test_configure_overlays_fields() {
    let mut state = ServerState::default();
    let config = result(call(&mut state, "Configure", json!({ "default_clearance": 25 })));
    assert_eq!(config["default_clearance"], 25);
    assert_eq!(config["fillet_segments"], 32);
    assert_eq!(state.config().default_clearance, 25);

    let response = call(&mut state, "Configure", json!({ "no_such_field": 1 }));
    assert_eq!(response.error.map(|e| e.code), Some(error_codes::CONFIG_FAILED));
    assert_eq!(state.config().default_clearance, 25);
}

#[test]
fn test_close_and_unknown_method() {
    let mut state = ServerState::default();
    result(call(&mut state, "Load", json!({ "zones": [zone_json(1, 1, rect(0, 0, 100, 100))] })));

    let closed = result(call(&mut state, "Close", json!(null)));
    assert_eq!(closed["released_zones"], 1);
    assert!(state.board.is_empty());

    let response = call(&mut state, "Frobnicate", json!(null));
    assert_eq!(response.error.map(|e| e.code), Some(error_codes::METHOD_NOT_FOUND));
}

#[test]
fn test_load_rejects_duplicate_ids() {
    let mut state = ServerState::default();
    result(call(&mut state, "Load", json!({ "zones": [zone_json(9, 1, rect(0, 0, 10, 10))] })));

    let response = call(&mut state, "Load", json!({
        "zones": [
            zone_json(1, 1, rect(0, 0, 100, 100)),
            zone_json(1, 2, rect(300, 0, 400, 100))
        ]
    }));
    assert_eq!(response.error.map(|e| e.code), Some(error_codes::INVALID_PARAMS));

    // The previous board is left in place
    let zones = result(call(&mut state, "GetZones", json!(null)));
    assert_eq!(zones.as_array().unwrap().len(), 1);
    assert_eq!(zones[0]["id"], 9);
}

#[test]
fn test_load_accepts_largest_zone_id() {
    let mut state = ServerState::default();
    result(call(&mut state, "Load", json!({
        "zones": [zone_json(u64::MAX, 1, rect(0, 0, 100, 100))]
    })));

    let outcome = result(call(&mut state, "EditZone", json!({
        "outline": rect(500, 0, 600, 100),
        "net": 2,
        "layer": 0
    })));
    assert_ne!(outcome["zone_id"], json!(u64::MAX));
    assert_eq!(state.board.len(), 2);
}

#[test]
fn test_out_of_range_coordinates_are_rejected() {
    let mut state = ServerState::default();
    let huge = i64::MAX - 1;

    let response = call(&mut state, "Load", json!({
        "zones": [zone_json(1, 1, rect(0, 0, huge, huge))]
    }));
    assert_eq!(response.error.map(|e| e.code), Some(error_codes::INVALID_PARAMS));

    let response = call(&mut state, "EditZone", json!({
        "outline": rect(0, 0, huge, 100),
        "net": 1,
        "layer": 0
    }));
    assert_eq!(response.error.map(|e| e.code), Some(error_codes::EDIT_REJECTED));
    assert!(state.board.is_empty());
}
