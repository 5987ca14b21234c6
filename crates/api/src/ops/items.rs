#![forbid(unsafe_code)]

use crate::server::ApiServer;
use crate::{
    error, ok, optional_category, optional_string, optional_timestamp, optional_urgency,
    require_args, require_id, require_string, store_error, ts_ms_to_rfc3339,
};
use dk_core::lifecycle::Transition;
use dk_core::model::{Category, Item, Urgency};
use dk_storage::InsertItemRequest;
use serde_json::{Value, json};

impl ApiServer {
    pub(crate) fn op_items_list(&mut self) -> Value {
        let store = match self.store() {
            Ok(store) => store,
            Err(response) => return response,
        };
        match store.list_items() {
            Ok(items) => ok(json!({
                "items": items.iter().map(item_json).collect::<Vec<_>>(),
            })),
            Err(err) => store_error(&err),
        }
    }

    pub(crate) fn op_items_create(&mut self, args: Option<Value>) -> Value {
        let args = match require_args(args) {
            Ok(args) => args,
            Err(response) => return response,
        };
        let id = match require_id(&args) {
            Ok(id) => id,
            Err(response) => return response,
        };
        let title = match require_string(&args, "title") {
            Ok(title) => title,
            Err(response) => return response,
        };
        let description = match optional_string(&args, "description") {
            Ok(v) => v,
            Err(response) => return response,
        };
        let category = match optional_category(&args, "category") {
            Ok(v) => v,
            Err(response) => return response,
        };
        let service_type = match optional_string(&args, "service_type") {
            Ok(v) => v,
            Err(response) => return response,
        };
        let urgency = match optional_urgency(&args, "urgency") {
            Ok(v) => v,
            Err(response) => return response,
        };
        let scheduled_at_ms = match optional_timestamp(&args, "scheduled_at") {
            Ok(v) => v,
            Err(response) => return response,
        };

        let store = match self.store() {
            Ok(store) => store,
            Err(response) => return response,
        };
        match store.insert_item(InsertItemRequest {
            id,
            title,
            description,
            category,
            service_type,
            urgency,
            scheduled_at_ms,
        }) {
            Ok(item) => ok(item_json(&item)),
            Err(err) => store_error(&err),
        }
    }

    pub(crate) fn op_items_update(&mut self, args: Option<Value>) -> Value {
        let args = match require_args(args) {
            Ok(args) => args,
            Err(response) => return response,
        };
        let id = match require_id(&args) {
            Ok(id) => id,
            Err(response) => return response,
        };
        let completed_by = match optional_string(&args, "completed_by") {
            Ok(v) => v,
            Err(response) => return response,
        };
        let completed_at_ms = match optional_timestamp(&args, "completed_at") {
            Ok(v) => v,
            Err(response) => return response,
        };
        let category = match optional_category(&args, "category") {
            Ok(v) => v,
            Err(response) => return response,
        };
        let urgency = match optional_urgency(&args, "urgency") {
            Ok(v) => v,
            Err(response) => return response,
        };
        let scheduled_at_ms = match optional_timestamp(&args, "scheduled_at") {
            Ok(v) => v,
            Err(response) => return response,
        };

        let transition = match classify_update(
            completed_by,
            completed_at_ms,
            category,
            urgency,
            scheduled_at_ms,
        ) {
            Ok(transition) => transition,
            Err(response) => return response,
        };

        let store = match self.store() {
            Ok(store) => store,
            Err(response) => return response,
        };
        match store.apply_transition(id, &transition) {
            Ok(()) => ok(json!({ "status": "updated" })),
            Err(err) => store_error(&err),
        }
    }

    pub(crate) fn op_items_delete(&mut self, args: Option<Value>) -> Value {
        let args = match require_args(args) {
            Ok(args) => args,
            Err(response) => return response,
        };
        let id = match require_id(&args) {
            Ok(id) => id,
            Err(response) => return response,
        };

        let store = match self.store() {
            Ok(store) => store,
            Err(response) => return response,
        };
        match store.delete_item(id) {
            Ok(removed) => ok(json!({ "status": "deleted", "removed": removed })),
            Err(err) => store_error(&err),
        }
    }
}

/// Decide the transition from the payload shape, before the engine runs.
///
/// A present `completed_by` means conclude, even when blank (the engine
/// rejects blank attestors) and even when detail fields ride along —
/// conclude has priority and the extra fields are ignored. Without an
/// attestor, detail fields mean an update and a bare category means a move.
fn classify_update(
    completed_by: Option<String>,
    completed_at_ms: Option<i64>,
    category: Option<Category>,
    urgency: Option<Urgency>,
    scheduled_at_ms: Option<i64>,
) -> Result<Transition, Value> {
    if let Some(attestor) = completed_by {
        return Ok(Transition::Conclude {
            attestor,
            at_ms: completed_at_ms,
        });
    }
    if urgency.is_some() || scheduled_at_ms.is_some() {
        return Ok(Transition::UpdateDetails {
            urgency,
            scheduled_at_ms,
        });
    }
    if let Some(category) = category {
        return Ok(Transition::Move { category });
    }
    Err(error(
        "VALIDATION_FAILED",
        "update names no fields: supply category, completed_by, or urgency/scheduled_at",
    ))
}

fn item_json(item: &Item) -> Value {
    json!({
        "id": item.id,
        "title": item.title,
        "description": item.description,
        "category": item.category.as_str(),
        "service_type": item.service_type,
        "urgency": item.urgency.as_str(),
        "scheduled_at": opt_ts(item.scheduled_at_ms),
        "completed_by": item.completed_by,
        "created_at": opt_ts(item.created_at_ms),
        "completed_at": opt_ts(item.completed_at_ms),
    })
}

fn opt_ts(ts_ms: Option<i64>) -> Value {
    match ts_ms {
        Some(ts_ms) => Value::String(ts_ms_to_rfc3339(ts_ms)),
        None => Value::Null,
    }
}
