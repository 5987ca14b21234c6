#![forbid(unsafe_code)]

use crate::{SessionLog, error, store_error};
use dk_storage::ItemStore;
use serde::Deserialize;
use serde_json::Value;
use std::io::{BufRead, Write};
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
pub(crate) struct Request {
    #[serde(default)]
    pub(crate) id: Option<Value>,
    pub(crate) op: String,
    #[serde(default)]
    pub(crate) args: Option<Value>,
}

pub(crate) struct ApiServer {
    storage_dir: PathBuf,
    store: Option<ItemStore>,
    session_log: SessionLog,
}

impl ApiServer {
    pub(crate) fn new(storage_dir: PathBuf) -> Self {
        let session_log = SessionLog::new(&storage_dir);
        Self {
            storage_dir,
            store: None,
            session_log,
        }
    }

    pub(crate) fn storage_dir(&self) -> &PathBuf {
        &self.storage_dir
    }

    /// Every operation first guarantees the schema is ready. The store is
    /// opened lazily and a failed open is retried on the next request, so
    /// one failing request never poisons the ones after it.
    pub(crate) fn store(&mut self) -> Result<&mut ItemStore, Value> {
        if self.store.is_none() {
            match ItemStore::open(&self.storage_dir) {
                Ok(store) => {
                    self.store = Some(store);
                }
                Err(err) => {
                    self.session_log.note_error(&err.to_string());
                    return Err(store_error(&err));
                }
            }
        }
        Ok(self.store.as_mut().expect("store was just opened"))
    }

    pub(crate) fn handle_line(&mut self, line: &str) -> Value {
        match serde_json::from_str::<Request>(line) {
            Ok(request) => self.handle_request(request),
            Err(err) => with_id(
                None,
                error(
                    "INVALID_INPUT",
                    &format!("request must be a JSON object with an \"op\" field: {err}"),
                ),
            ),
        }
    }

    pub(crate) fn handle_request(&mut self, request: Request) -> Value {
        self.session_log.note_op(&request.op);

        let response = match request.op.as_str() {
            "items_list" => self.op_items_list(),
            "items_create" => self.op_items_create(request.args),
            "items_update" => self.op_items_update(request.args),
            "items_delete" => self.op_items_delete(request.args),
            "status" => self.op_status(),
            other => error(
                "INVALID_INPUT",
                &format!(
                    "unknown op: {other}; expected items_list, items_create, items_update, \
                     items_delete or status"
                ),
            ),
        };

        if response.get("success").and_then(|v| v.as_bool()) == Some(false)
            && let Some(message) = response
                .get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
        {
            self.session_log.note_error(message);
        }

        with_id(request.id, response)
    }

    pub(crate) fn note_exit(&mut self, reason: &str) {
        self.session_log.note_exit(reason);
    }
}

fn with_id(id: Option<Value>, mut response: Value) -> Value {
    if let Some(obj) = response.as_object_mut() {
        obj.insert("id".to_string(), id.unwrap_or(Value::Null));
    }
    response
}

pub(crate) fn run_stdio(server: &mut ApiServer) -> Result<(), Box<dyn std::error::Error>> {
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let response = server.handle_line(&line);
        writeln!(stdout, "{response}")?;
        stdout.flush()?;
    }

    server.note_exit("eof");
    Ok(())
}
