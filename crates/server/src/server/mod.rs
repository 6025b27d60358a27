#![forbid(unsafe_code)]

mod dispatch;
mod lifecycle;


use sb_storage::Engine;

/// Protocol state plus the action engine. Holds no user session: every
/// `actions/call` authenticates on its own.
pub(crate) struct StratboardServer<S> {
    initialized: bool,
    engine: Engine<S>,
}
