//! Process-wide log output: `<timestamp> <LEVEL> <message>` lines on stderr.
use tracing::Level;

/// Install the stderr subscriber at INFO.
///
/// Call once from `main`. A second call is a no-op.
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
