#![forbid(unsafe_code)]
#![allow(dead_code)]

use sb_core::Cell;
use sb_core::schema::{ACTIVITIES, KPIS, TableSchema, USERS};
use sb_storage::{CommitMode, SqliteTableStore, TableStore};
use serde_json::{Value, json};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

pub(crate) struct Server {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    storage_dir: PathBuf,
    cleanup_storage: bool,
    next_id: i64,
}

impl Server {
    pub(crate) fn start(test_name: &str) -> Self {
        Self::start_with_args(test_name, &[])
    }

    pub(crate) fn start_with_args(test_name: &str, extra_args: &[&str]) -> Self {
        let storage_dir = temp_dir(test_name);
        Self::start_with_storage_dir(storage_dir, extra_args, true)
    }

    /// Seeds the demo tables into a fresh store, then starts the server on it.
    pub(crate) fn start_seeded(test_name: &str) -> Self {
        let storage_dir = temp_dir(test_name);
        seed_demo(&storage_dir);
        Self::start_with_storage_dir(storage_dir, &[], true)
    }

    pub(crate) fn start_with_storage_dir(
        storage_dir: PathBuf,
        extra_args: &[&str],
        cleanup_storage: bool,
    ) -> Self {
        std::fs::create_dir_all(&storage_dir).expect("create storage dir");
        let mut child = Command::new(env!("CARGO_BIN_EXE_stratboard"))
            .arg("--storage-dir")
            .arg(&storage_dir)
            .args(["--log-level", "warn"])
            .args(extra_args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .expect("spawn stratboard");

        let stdin = child.stdin.take().expect("stdin");
        let stdout = BufReader::new(child.stdout.take().expect("stdout"));

        Self {
            child,
            stdin,
            stdout,
            storage_dir,
            cleanup_storage,
            next_id: 100,
        }
    }

    pub(crate) fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    /// Leaves the store on disk when this server is dropped.
    pub(crate) fn keep_storage(&mut self) {
        self.cleanup_storage = false;
    }

    pub(crate) fn send(&mut self, req: Value) {
        writeln!(self.stdin, "{req}").expect("write request");
        self.stdin.flush().expect("flush request");
    }

    pub(crate) fn send_raw(&mut self, line: &str) {
        writeln!(self.stdin, "{line}").expect("write request");
        self.stdin.flush().expect("flush request");
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

    pub(crate) fn initialize_default(&mut self) {
        let _ = self.request(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "initialize",
            "params": { "protocolVersion": "2024-11-05", "clientInfo": { "name": "test", "version": "0" } }
        }));
        self.send(json!({
            "jsonrpc": "2.0",
            "method": "notifications/initialized",
            "params": {}
        }));
    }

    /// `actions/call` as `username`; returns the envelope.
    pub(crate) fn call(
        &mut self,
        username: &str,
        password: &str,
        name: &str,
        arguments: Value,
    ) -> Value {
        self.next_id += 1;
        let resp = self.request(json!({
            "jsonrpc": "2.0",
            "id": self.next_id,
            "method": "actions/call",
            "params": {
                "name": name,
                "credentials": { "username": username, "password": password },
                "arguments": arguments
            }
        }));
        resp.get("result").cloned().expect("result envelope")
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

pub(crate) fn temp_dir(test_name: &str) -> PathBuf {
    let base = std::env::temp_dir();
    let pid = std::process::id();
    let nonce = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let dir = base.join(format!("sb_server_{test_name}_{pid}_{nonce}"));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn seed(store: &SqliteTableStore, schema: TableSchema, rows: Vec<Vec<Cell>>) {
    let header = schema
        .columns
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>();
    store
        .write(schema.name, &header, &rows, CommitMode::Overwrite)
        .expect("seed table");
}

/// Users `boss` (Admin), `sara` (Owner of A), `vic` (Viewer) and `gus` (an
/// unrecognized role); password `pw`.
pub(crate) fn seed_demo(storage_dir: &Path) {
    let store = SqliteTableStore::open(storage_dir).expect("open store");
    let user = |username: &str, role: &str, assigned: &str| {
        vec![
            Cell::text(username),
            Cell::text("pw"),
            Cell::text(username.to_uppercase()),
            Cell::text(role),
            Cell::text(assigned),
        ]
    };
    seed(
        &store,
        USERS,
        vec![
            user("boss", "Admin", ""),
            user("sara", "Owner", "A"),
            user("vic", "Viewer", ""),
            user("gus", "Auditor", ""),
        ],
    );
    let activity = |mabadara: &str, name: &str, end: &str, progress: i64| {
        vec![
            Cell::text(mabadara),
            Cell::text(name),
            Cell::text("2024-01-01"),
            Cell::text(end),
            Cell::Int(progress),
            Cell::Empty,
            Cell::Empty,
            Cell::Empty,
        ]
    };
    seed(
        &store,
        ACTIVITIES,
        vec![
            activity("A", "X", "2024-06-30", 40),
            activity("A", "Y", "2099-01-01", 10),
            activity("B", "Z", "tbd", 0),
        ],
    );
    seed(
        &store,
        KPIS,
        vec![vec![
            Cell::text("Coverage"),
            Cell::Int(80),
            Cell::Int(70),
            Cell::text("Ascending"),
            Cell::text("sara"),
            Cell::Empty,
            Cell::Empty,
        ]],
    );
}

pub(crate) fn read_rows(storage_dir: &Path, table: &str) -> Vec<Vec<Cell>> {
    SqliteTableStore::open(storage_dir)
        .expect("open store")
        .read(table)
        .expect("read table")
        .rows
}
