#![forbid(unsafe_code)]

mod entry;
mod handlers;
mod server;
mod support;

pub(crate) use server::StratboardServer;
pub(crate) use support::*;

use sb_storage::{Engine, SqliteTableStore};
use tracing::info;

const PROTOCOL_VERSION: &str = "2024-11-05";
const SERVER_NAME: &str = "stratboard";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

fn usage() -> &'static str {
    "stratboard: shared strategy tracker (activities, KPIs, comment logs) over stdio JSON-RPC\n\n\
USAGE:\n\
  stratboard [--storage-dir DIR] [--guarded-writes] [--log-level FILTER]\n\
\n\
FLAGS:\n\
  --storage-dir DIR    Table store directory (env STRATBOARD_STORAGE_DIR, default .stratboard)\n\
  --guarded-writes     Reject writes when the table changed since it was read\n\
                       (env STRATBOARD_GUARDED_WRITES)\n\
  --log-level FILTER   tracing filter for stderr logs (env STRATBOARD_LOG, default info)\n\
  -h, --help           Print this help and exit\n\
  -V, --version        Print version/build and exit\n"
}

fn version_line() -> String {
    format!("stratboard {SERVER_VERSION} build={}", build_profile_label())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    if args
        .iter()
        .any(|arg| matches!(arg.as_str(), "-h" | "--help"))
    {
        print!("{}", usage());
        return Ok(());
    }
    if args
        .iter()
        .any(|arg| matches!(arg.as_str(), "-V" | "--version"))
    {
        println!("{}", version_line());
        return Ok(());
    }

    init_logging(&parse_log_filter(&args));
    let storage_dir = parse_storage_dir(&args);
    let guarded_writes = parse_guarded_writes(&args);

    let store = SqliteTableStore::open(&storage_dir)?;
    info!(
        storage_dir = %storage_dir.display(),
        guarded_writes,
        version = SERVER_VERSION,
        "stratboard started"
    );

    let mut server = StratboardServer::new(Engine::new(store).with_guarded_writes(guarded_writes));
    let result = entry::run_stdio(&mut server);
    if let Err(err) = &result {
        tracing::error!(error = %err, "stdio loop failed");
    }
    result
}
