#![forbid(unsafe_code)]

use crate::server::ApiServer;
use crate::{now_rfc3339, ok};
use serde_json::{Value, json};

impl ApiServer {
    /// Diagnostic op: always succeeds, reporting whether the schema is
    /// ready and the table reachable so the UI can render an actionable
    /// message instead of a dead board.
    pub(crate) fn op_status(&mut self) -> Value {
        let storage_dir = self.storage_dir().display().to_string();
        match self.store() {
            Ok(store) => {
                let store_reachable = store.probe().is_ok();
                ok(json!({
                    "schema_ready": true,
                    "store_reachable": store_reachable,
                    "storage_dir": storage_dir,
                    "detail": Value::Null,
                    "time": now_rfc3339(),
                }))
            }
            Err(response) => {
                let detail = response
                    .get("error")
                    .and_then(|e| e.get("message"))
                    .cloned()
                    .unwrap_or(Value::Null);
                ok(json!({
                    "schema_ready": false,
                    "store_reachable": false,
                    "storage_dir": storage_dir,
                    "detail": detail,
                    "time": now_rfc3339(),
                }))
            }
        }
    }
}
