#![forbid(unsafe_code)]
#![allow(dead_code)]

use serde_json::Value;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

pub(crate) struct Server {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    storage_dir: PathBuf,
    cleanup_storage: bool,
}

impl Server {
    pub(crate) fn start(test_name: &str) -> Self {
        let storage_dir = temp_dir(test_name);
        Self::start_with_storage_dir(storage_dir, true)
    }

    pub(crate) fn start_with_storage_dir(storage_dir: PathBuf, cleanup_storage: bool) -> Self {
        let mut child = Command::new(env!("CARGO_BIN_EXE_dk_api"))
            .arg("--storage-dir")
            .arg(&storage_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .expect("spawn dk_api");

        let stdin = child.stdin.take().expect("stdin");
        let stdout = BufReader::new(child.stdout.take().expect("stdout"));

        Self {
            child,
            stdin,
            stdout,
            storage_dir,
            cleanup_storage,
        }
    }

    pub(crate) fn storage_dir(&self) -> &PathBuf {
        &self.storage_dir
    }

    pub(crate) fn send(&mut self, req: Value) {
        writeln!(self.stdin, "{req}").expect("write request");
        self.stdin.flush().expect("flush request");
    }

    pub(crate) fn send_raw(&mut self, line: &str) {
        writeln!(self.stdin, "{line}").expect("write raw line");
        self.stdin.flush().expect("flush raw line");
    }

    pub(crate) fn recv(&mut self) -> Value {
        let mut line = String::new();
        self.stdout.read_line(&mut line).expect("read response");
        assert!(!line.trim().is_empty(), "empty response line");
        serde_json::from_str(&line).expect("parse response json")
    }

    pub(crate) fn request(&mut self, req: Value) -> Value {
        self.send(req);
        self.recv()
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
        if self.cleanup_storage {
            let _ = std::fs::remove_dir_all(&self.storage_dir);
        }
    }
}

fn temp_dir(test_name: &str) -> PathBuf {
    let base = std::env::temp_dir();
    let pid = std::process::id();
    let nonce = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    base.join(format!("dk_api_{test_name}_{pid}_{nonce}"))
}

pub(crate) fn assert_error_code(resp: &Value, expected: &str) {
    assert_eq!(resp["success"], Value::Bool(false), "response: {resp}");
    let code = resp["error"]["code"].as_str().expect("error.code");
    assert_eq!(code, expected, "response: {resp}");
}

pub(crate) fn result_items(resp: &Value) -> &Vec<Value> {
    resp["result"]["items"]
        .as_array()
        .expect("result.items array")
}
