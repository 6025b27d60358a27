#![forbid(unsafe_code)]

use super::StratboardServer;
use crate::handlers::{self, context_json};
use crate::{Args, ai_error, ai_ok, require_credentials, store_error, store_error_code};
use sb_core::access::{Action, RequestContext, authorize};
use sb_core::records::Role;
use sb_storage::TableStore;
use serde_json::{Value, json};
use tracing::{info, warn};

const LOGIN: &str = "login";

fn action_by_name(name: &str) -> Option<Action> {
    Action::all()
        .iter()
        .copied()
        .find(|action| action.as_str() == name)
}

impl<S: TableStore> StratboardServer<S> {
    pub(crate) fn actions_list(&self) -> Value {
        let roles = [Role::Admin, Role::Owner, Role::Viewer];
        let mut actions = vec![json!({
            "name": LOGIN,
            "roles": roles.iter().map(Role::as_str).collect::<Vec<_>>()
        })];
        for action in Action::all() {
            let allowed = roles
                .iter()
                .filter(|role| {
                    let caller = RequestContext::new("", "", (*role).clone(), "");
                    authorize(&caller, *action).is_ok()
                })
                .map(Role::as_str)
                .collect::<Vec<_>>();
            actions.push(json!({ "name": action.as_str(), "roles": allowed }));
        }
        json!({ "actions": actions })
    }

    /// Runs one named action for the caller named in `credentials`. Always returns
    /// an envelope; protocol errors are reserved for malformed JSON-RPC.
    pub(crate) fn call_action(&self, params: Option<&Value>) -> Value {
        let Some(params) = params.and_then(|v| v.as_object()) else {
            return ai_error("INVALID_INPUT", "params must be an object");
        };
        let Some(name) = params.get("name").and_then(|v| v.as_str()) else {
            return ai_error("INVALID_INPUT", "name is required");
        };
        let empty = Args::new();
        let args = match params.get("arguments") {
            None | Some(Value::Null) => &empty,
            Some(Value::Object(obj)) => obj,
            Some(_) => return ai_error("INVALID_INPUT", "arguments must be an object"),
        };
        let action = action_by_name(name);
        if name != LOGIN && action.is_none() {
            return ai_error("UNKNOWN_ACTION", &format!("unknown action: {name}"));
        }

        let (username, password) = match require_credentials(params) {
            Ok(v) => v,
            Err(resp) => return resp,
        };
        let ctx = match self.engine.login(&username, &password) {
            Ok(ctx) => ctx,
            Err(err) => {
                warn!(action = name, code = store_error_code(&err), "authentication failed");
                return store_error(&err);
            }
        };

        let Some(action) = action else {
            return ai_ok(LOGIN, context_json(&ctx));
        };
        let result = match action {
            Action::ListActivities => handlers::activities::list(&self.engine, &ctx, args),
            Action::UpdateActivity => handlers::activities::update(&self.engine, &ctx, args),
            Action::AddActivity => handlers::activities::add(&self.engine, &ctx, args),
            Action::CommentActivities => handlers::activities::comment(&self.engine, &ctx, args),
            Action::ListKpis => handlers::kpis::list(&self.engine, &ctx, args),
            Action::SetKpiTarget => handlers::kpis::set_target(&self.engine, &ctx, args),
            Action::UpdateKpiActual => handlers::kpis::update_actual(&self.engine, &ctx, args),
        };
        match result {
            Ok(envelope) => {
                info!(action = name, user = %ctx.username, "action completed");
                envelope
            }
            Err(envelope) => {
                let code = envelope
                    .get("error")
                    .and_then(|e| e.get("code"))
                    .and_then(|c| c.as_str())
                    .unwrap_or("UNKNOWN");
                warn!(action = name, user = %ctx.username, code, "action failed");
                envelope
            }
        }
    }
}
