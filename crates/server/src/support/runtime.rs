#![forbid(unsafe_code)]

use std::path::PathBuf;

const DEFAULT_STORAGE_DIR: &str = ".stratboard";
const DEFAULT_LOG_FILTER: &str = "info";

/// Last value given for `flag`; later occurrences win.
fn flag_value(args: &[String], flag: &str) -> Option<String> {
    let mut iter = args.iter();
    let mut value = None;
    while let Some(arg) = iter.next() {
        if arg.as_str() == flag
            && let Some(next) = iter.next()
        {
            value = Some(next.clone());
        }
    }
    value
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_bool_env(key: &str) -> bool {
    let Ok(value) = std::env::var(key) else {
        return false;
    };
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

pub(crate) fn parse_storage_dir(args: &[String]) -> PathBuf {
    flag_value(args, "--storage-dir")
        .or_else(|| non_empty_env("STRATBOARD_STORAGE_DIR"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_DIR))
}

pub(crate) fn parse_guarded_writes(args: &[String]) -> bool {
    args.iter().any(|arg| arg.as_str() == "--guarded-writes")
        || parse_bool_env("STRATBOARD_GUARDED_WRITES")
}

pub(crate) fn parse_log_filter(args: &[String]) -> String {
    flag_value(args, "--log-level")
        .or_else(|| non_empty_env("STRATBOARD_LOG"))
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string())
}

pub(crate) fn build_profile_label() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "release"
    }
}
