#![forbid(unsafe_code)]

use crate::{JsonRpcRequest, StratboardServer, json_rpc_error};
use sb_storage::TableStore;
use serde_json::Value;
use std::io::{BufRead, BufReader, Write};
use tracing::debug;

fn write_newline_json(
    stdout: &mut std::io::StdoutLock<'_>,
    resp: &Value,
) -> Result<(), Box<dyn std::error::Error>> {
    writeln!(stdout, "{}", serde_json::to_string(resp)?)?;
    stdout.flush()?;
    Ok(())
}

/// One JSON-RPC message per line on stdin, one response per line on stdout.
pub(crate) fn run_stdio<S: TableStore>(
    server: &mut StratboardServer<S>,
) -> Result<(), Box<dyn std::error::Error>> {
    let stdin = std::io::stdin();
    let mut reader = BufReader::new(stdin.lock());
    let mut stdout = std::io::stdout().lock();

    loop {
        let mut line = String::new();
        let read = reader.read_line(&mut line)?;
        if read == 0 {
            debug!("stdin closed");
            break;
        }
        let raw = line.trim();
        if raw.is_empty() {
            continue;
        }
        if let Some(resp) = handle_line(server, raw) {
            write_newline_json(&mut stdout, &resp)?;
        }
    }

    Ok(())
}

pub(crate) fn handle_line<S: TableStore>(
    server: &mut StratboardServer<S>,
    raw: &str,
) -> Option<Value> {
    let data: Value = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(e) => return Some(json_rpc_error(None, -32700, &format!("Parse error: {e}"))),
    };

    let (id, has_method) = match data.as_object() {
        Some(obj) => (obj.get("id").cloned(), obj.contains_key("method")),
        None => return Some(json_rpc_error(None, -32600, "Invalid Request")),
    };
    if !has_method {
        return Some(json_rpc_error(id, -32600, "Invalid Request"));
    }

    let request: JsonRpcRequest = match serde_json::from_value(data) {
        Ok(v) => v,
        Err(e) => return Some(json_rpc_error(id, -32600, &format!("Invalid Request: {e}"))),
    };

    server.handle(request)
}
