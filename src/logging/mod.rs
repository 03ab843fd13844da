//! Console and run-log output.
//!
//! The command layer talks to [`Logger`]; everything below it emits plain
//! `tracing` events with structured fields. [`init_subscriber`] routes both to
//! the terminal and to the run log.

mod logger;
mod subscriber;
mod utils;

pub use logger::Logger;
pub use subscriber::init_subscriber;

/// A [`Logger`] plus a thread-local subscriber that writes to a run log in a
/// fresh temp dir.
///
/// Keep the returned guard alive for the whole test; events on other threads
/// do not reach this run log.
#[cfg(test)]
#[allow(clippy::expect_used)]
pub(crate) fn isolated_logger() -> (Logger, tempfile::TempDir, tracing::dispatcher::DefaultGuard) {
    use tracing_subscriber::{Layer as _, filter::LevelFilter, layer::SubscriberExt as _};

    let tmp = tempfile::tempdir().expect("create temp dir");
    let path = tmp.path().join("test.log");
    let layer = subscriber::FileLayer::create(&path).expect("create run log");
    let subscriber = tracing_subscriber::registry().with(layer.with_filter(LevelFilter::DEBUG));
    let guard = tracing::dispatcher::set_default(&tracing::Dispatch::new(subscriber));
    (Logger::at(path), tmp, guard)
}
