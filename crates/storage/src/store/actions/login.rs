#![forbid(unsafe_code)]

use super::Engine;
use crate::store::{StoreError, TableStore, read_table};
use sb_core::access::RequestContext;
use sb_core::locate::{NaturalKey, locate};
use sb_core::records::{Role, User};
use sb_core::schema::USERS;
use tracing::{info, warn};

impl<S: TableStore> Engine<S> {
    /// Plaintext comparison against the Users table. The username is trimmed;
    /// the password is compared exactly. A user whose role is not recognized
    /// cannot log in.
    pub fn login(&self, username: &str, password: &str) -> Result<RequestContext, StoreError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(StoreError::InvalidCredentials);
        }
        let read = read_table(&self.store, USERS)?;
        let Ok(found) = locate(&read.snapshot, &USERS, &NaturalKey::new([username])) else {
            warn!(user = username, "login for unknown user");
            return Err(StoreError::InvalidCredentials);
        };
        let Some(row) = read.snapshot.row(found.index) else {
            return Err(StoreError::InvalidCredentials);
        };
        let user = User::from_row(row);
        if user.password != password {
            warn!(user = username, "login with wrong password");
            return Err(StoreError::InvalidCredentials);
        }
        if let Role::Unknown(raw) = &user.role {
            warn!(user = username, role = %raw, "login with unknown role");
            return Err(StoreError::UnknownRole(raw.clone()));
        }
        info!(user = %user.username, role = user.role.as_str(), "login");
        Ok(RequestContext::from_user(&user))
    }
}
