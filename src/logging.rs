use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Install the stderr log subscriber shared by the binaries
///
/// Stdout is reserved for each program's result line.
pub fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}
