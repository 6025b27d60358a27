#![forbid(unsafe_code)]

use sb_core::access::AccessError;

#[derive(Debug)]
pub enum StoreError {
    /// The table store (or the named table) cannot be reached. The action is aborted
    /// before any write.
    StoreUnavailable(String),
    Io(std::io::Error),
    Sql(rusqlite::Error),
    Json(serde_json::Error),
    InvalidInput(&'static str),
    InvalidCredentials,
    RecordNotFound {
        table: &'static str,
        key: String,
    },
    UnknownRole(String),
    Forbidden {
        role: String,
        action: &'static str,
    },
    RevisionMismatch {
        expected: i64,
        actual: i64,
    },
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StoreUnavailable(detail) => write!(f, "store unavailable: {detail}"),
            Self::Io(err) => write!(f, "io: {err}"),
            Self::Sql(err) => write!(f, "sqlite: {err}"),
            Self::Json(err) => write!(f, "json: {err}"),
            Self::InvalidInput(message) => write!(f, "invalid input: {message}"),
            Self::InvalidCredentials => write!(f, "invalid credentials"),
            Self::RecordNotFound { table, key } => {
                write!(f, "record not found (table={table}, key={key})")
            }
            Self::UnknownRole(role) => write!(f, "unknown role '{role}'"),
            Self::Forbidden { role, action } => {
                write!(f, "forbidden (role={role}, action={action})")
            }
            Self::RevisionMismatch { expected, actual } => {
                write!(
                    f,
                    "revision mismatch (expected={expected}, actual={actual})"
                )
            }
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sql(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<AccessError> for StoreError {
    fn from(value: AccessError) -> Self {
        match value {
            AccessError::UnknownRole(role) => Self::UnknownRole(role),
            AccessError::Forbidden { role, action } => Self::Forbidden {
                role,
                action: action.as_str(),
            },
        }
    }
}
