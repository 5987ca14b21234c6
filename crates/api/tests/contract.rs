#![forbid(unsafe_code)]

mod support;

use serde_json::{Value, json};
use support::{Server, assert_error_code, result_items};

#[test]
fn create_then_list_round_trips_over_the_wire() {
    let mut server = Server::start("create_list");

    let resp = server.request(json!({
        "id": 1,
        "op": "items_create",
        "args": {
            "id": 10,
            "title": "Replace pump seals",
            "description": "Unit 4, east wing",
            "category": "support",
            "urgency": "high"
        }
    }));
    assert_eq!(resp["success"], json!(true), "response: {resp}");
    assert_eq!(resp["id"], json!(1));
    assert_eq!(resp["result"]["category"], json!("support"));
    assert_eq!(resp["result"]["service_type"], json!("general"));
    assert!(
        resp["result"]["created_at"].is_string(),
        "fresh rows carry a creation timestamp: {resp}"
    );
    assert_eq!(resp["result"]["completed_by"], Value::Null);

    let resp = server.request(json!({ "id": 2, "op": "items_list" }));
    assert_eq!(resp["success"], json!(true), "response: {resp}");
    let items = result_items(&resp);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], json!(10));
    assert_eq!(items[0]["title"], json!("Replace pump seals"));
    assert_eq!(items[0]["urgency"], json!("high"));
}

#[test]
fn conclude_stamps_attestation_and_freezes_the_item() {
    let mut server = Server::start("conclude_flow");

    let resp = server.request(json!({
        "op": "items_create",
        "args": { "id": 1, "title": "Audit invoices" }
    }));
    assert_eq!(resp["success"], json!(true), "response: {resp}");

    let resp = server.request(json!({
        "op": "items_update",
        "args": { "id": 1, "completed_by": "Bob" }
    }));
    assert_eq!(resp["success"], json!(true), "response: {resp}");

    let resp = server.request(json!({ "op": "items_list" }));
    let items = result_items(&resp);
    assert_eq!(items[0]["category"], json!("done"));
    assert_eq!(items[0]["completed_by"], json!("Bob"));
    assert!(
        items[0]["completed_at"].is_string(),
        "conclusion stamps both halves of the attestation: {resp}"
    );

    // Terminal items reject further moves and keep their attestation intact.
    let resp = server.request(json!({
        "op": "items_update",
        "args": { "id": 1, "category": "pending" }
    }));
    assert_error_code(&resp, "TERMINAL_STATE");

    let resp = server.request(json!({ "op": "items_list" }));
    let items = result_items(&resp);
    assert_eq!(items[0]["category"], json!("done"));
    assert_eq!(items[0]["completed_by"], json!("Bob"));
}

#[test]
fn blank_attestor_is_rejected_without_touching_the_row() {
    let mut server = Server::start("blank_attestor");

    server.request(json!({
        "op": "items_create",
        "args": { "id": 1, "title": "Calibrate sensors" }
    }));

    let resp = server.request(json!({
        "op": "items_update",
        "args": { "id": 1, "completed_by": "   " }
    }));
    assert_error_code(&resp, "INVALID_ATTESTATION");

    let resp = server.request(json!({ "op": "items_list" }));
    let items = result_items(&resp);
    assert_eq!(items[0]["category"], json!("pending"));
    assert_eq!(items[0]["completed_by"], Value::Null);
    assert_eq!(items[0]["completed_at"], Value::Null);
}

#[test]
fn plain_move_cannot_enter_done() {
    let mut server = Server::start("move_into_done");

    server.request(json!({
        "op": "items_create",
        "args": { "id": 1, "title": "Ship release notes" }
    }));

    let resp = server.request(json!({
        "op": "items_update",
        "args": { "id": 1, "category": "done" }
    }));
    assert_error_code(&resp, "INVALID_ATTESTATION");
}

#[test]
fn combined_conclude_and_detail_payload_resolves_as_conclude() {
    let mut server = Server::start("conclude_priority");

    server.request(json!({
        "op": "items_create",
        "args": { "id": 1, "title": "Rekey server room", "urgency": "normal" }
    }));

    let resp = server.request(json!({
        "op": "items_update",
        "args": {
            "id": 1,
            "completed_by": "Ana",
            "urgency": "low",
            "scheduled_at": "2026-09-01T10:00:00Z"
        }
    }));
    assert_eq!(resp["success"], json!(true), "response: {resp}");

    let resp = server.request(json!({ "op": "items_list" }));
    let items = result_items(&resp);
    assert_eq!(items[0]["category"], json!("done"));
    assert_eq!(items[0]["completed_by"], json!("Ana"));
    // The detail fields riding along are ignored.
    assert_eq!(items[0]["urgency"], json!("normal"));
    assert_eq!(items[0]["scheduled_at"], Value::Null);
}

#[test]
fn detail_update_merges_with_existing_fields() {
    let mut server = Server::start("detail_update");

    server.request(json!({
        "op": "items_create",
        "args": { "id": 1, "title": "Renew certificates", "category": "in_progress" }
    }));

    let resp = server.request(json!({
        "op": "items_update",
        "args": { "id": 1, "urgency": "high", "scheduled_at": "2026-09-15T08:30:00Z" }
    }));
    assert_eq!(resp["success"], json!(true), "response: {resp}");

    let resp = server.request(json!({ "op": "items_list" }));
    let items = result_items(&resp);
    assert_eq!(items[0]["category"], json!("in_progress"));
    assert_eq!(items[0]["urgency"], json!("high"));
    assert_eq!(items[0]["scheduled_at"], json!("2026-09-15T08:30:00Z"));

    // A later partial update keeps the untouched field.
    server.request(json!({
        "op": "items_update",
        "args": { "id": 1, "urgency": "low" }
    }));
    let resp = server.request(json!({ "op": "items_list" }));
    let items = result_items(&resp);
    assert_eq!(items[0]["urgency"], json!("low"));
    assert_eq!(items[0]["scheduled_at"], json!("2026-09-15T08:30:00Z"));
}

#[test]
fn duplicate_create_surfaces_duplicate_id() {
    let mut server = Server::start("duplicate_create");

    server.request(json!({
        "op": "items_create",
        "args": { "id": 1, "title": "First" }
    }));
    let resp = server.request(json!({
        "op": "items_create",
        "args": { "id": 1, "title": "Second" }
    }));
    assert_error_code(&resp, "DUPLICATE_ID");

    let resp = server.request(json!({ "op": "items_list" }));
    let items = result_items(&resp);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], json!("First"));
}

#[test]
fn delete_reports_rows_removed_and_is_idempotent() {
    let mut server = Server::start("delete_twice");

    server.request(json!({
        "op": "items_create",
        "args": { "id": 1, "title": "Scratch entry" }
    }));

    let resp = server.request(json!({
        "op": "items_delete",
        "args": { "id": 1 }
    }));
    assert_eq!(resp["success"], json!(true), "response: {resp}");
    assert_eq!(resp["result"]["removed"], json!(1));

    let resp = server.request(json!({
        "op": "items_delete",
        "args": { "id": 1 }
    }));
    assert_eq!(resp["success"], json!(true), "response: {resp}");
    assert_eq!(resp["result"]["removed"], json!(0));
}

#[test]
fn legacy_category_names_are_read_as_their_modern_forms() {
    let mut server = Server::start("legacy_aliases");

    let resp = server.request(json!({
        "op": "items_create",
        "args": { "id": 1, "title": "Old pipeline row", "category": "lead" }
    }));
    assert_eq!(resp["success"], json!(true), "response: {resp}");
    assert_eq!(resp["result"]["category"], json!("pending"));

    let resp = server.request(json!({
        "op": "items_update",
        "args": { "id": 1, "category": "inNegotiation" }
    }));
    assert_eq!(resp["success"], json!(true), "response: {resp}");

    let resp = server.request(json!({ "op": "items_list" }));
    let items = result_items(&resp);
    assert_eq!(items[0]["category"], json!("in_progress"));
}

#[test]
fn update_on_unknown_id_is_not_found() {
    let mut server = Server::start("unknown_id");

    let resp = server.request(json!({
        "op": "items_update",
        "args": { "id": 99, "category": "support" }
    }));
    assert_error_code(&resp, "NOT_FOUND");
}

#[test]
fn update_naming_no_fields_is_a_validation_failure() {
    let mut server = Server::start("empty_update");

    server.request(json!({
        "op": "items_create",
        "args": { "id": 1, "title": "Untouched" }
    }));

    let resp = server.request(json!({
        "op": "items_update",
        "args": { "id": 1 }
    }));
    assert_error_code(&resp, "VALIDATION_FAILED");
}

#[test]
fn status_reports_a_ready_store() {
    let mut server = Server::start("status_ready");

    let resp = server.request(json!({ "id": "s1", "op": "status" }));
    assert_eq!(resp["success"], json!(true), "response: {resp}");
    assert_eq!(resp["id"], json!("s1"));
    assert_eq!(resp["result"]["schema_ready"], json!(true));
    assert_eq!(resp["result"]["store_reachable"], json!(true));
    assert!(
        resp["result"]["storage_dir"]
            .as_str()
            .expect("storage_dir must be reported")
            .contains("status_ready"),
        "response: {resp}"
    );
}

#[test]
fn malformed_line_gets_an_error_envelope_and_the_stream_survives() {
    let mut server = Server::start("malformed_line");

    server.send_raw("this is not json");
    let resp = server.recv();
    assert_error_code(&resp, "INVALID_INPUT");
    assert_eq!(resp["id"], Value::Null);

    // The connection keeps serving after a bad line.
    let resp = server.request(json!({ "id": 3, "op": "items_list" }));
    assert_eq!(resp["success"], json!(true), "response: {resp}");
    assert_eq!(resp["id"], json!(3));
}
