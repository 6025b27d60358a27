#![forbid(unsafe_code)]

use super::StratboardServer;
use crate::{JsonRpcRequest, json_rpc_error, json_rpc_response};
use sb_storage::{Engine, TableStore};
use serde_json::{Value, json};

impl<S: TableStore> StratboardServer<S> {
    pub(crate) fn new(engine: Engine<S>) -> Self {
        Self {
            initialized: false,
            engine,
        }
    }

    pub(crate) fn handle(&mut self, request: JsonRpcRequest) -> Option<Value> {
        let method = request.method.as_str();
        let expects_response = !matches!(request.id.as_ref(), None | Some(Value::Null));

        if method == "initialize" {
            let protocol_version = request
                .params
                .as_ref()
                .and_then(|v| v.get("protocolVersion"))
                .and_then(|v| v.as_str())
                .unwrap_or(crate::PROTOCOL_VERSION);
            self.initialized = true;

            return Some(json_rpc_response(
                request.id,
                json!({
                    "protocolVersion": protocol_version,
                    "serverInfo": {
                        "name": crate::SERVER_NAME,
                        "version": crate::SERVER_VERSION
                    },
                    "capabilities": {
                        "actions": {},
                        "guardedWrites": self.engine.guarded_writes()
                    }
                }),
            ));
        }

        if method == "notifications/initialized" || method == "initialized" {
            self.initialized = true;
            return None;
        }

        if !self.initialized {
            if matches!(method, "actions/call" | "actions/list" | "ping") {
                self.initialized = true;
            } else if expects_response {
                return Some(json_rpc_error(request.id, -32002, "Server not initialized"));
            } else {
                return None;
            }
        }

        match method {
            "ping" => Some(json_rpc_response(request.id, json!({}))),
            "actions/list" => Some(json_rpc_response(request.id, self.actions_list())),
            "actions/call" => {
                let envelope = self.call_action(request.params.as_ref());
                Some(json_rpc_response(request.id, envelope))
            }
            _ if expects_response => Some(json_rpc_error(
                request.id,
                -32601,
                &format!("Method not found: {method}"),
            )),
            _ => None,
        }
    }
}
