#[cfg(feature = "trace")]
use std::path::Path;
#[cfg(feature = "trace")]
use std::sync::OnceLock;

#[cfg(feature = "trace")]
const DEFAULT_FILTER: &str = "skk_engine=debug,skk_session=debug,skk_core=debug";

#[cfg(feature = "trace")]
static INSTALLED: OnceLock<bool> = OnceLock::new();

/// Install a JSON-lines subscriber writing to `<log_dir>/skk-trace.jsonl`.
/// Returns `false` when the directory is unusable or the host already
/// installed a global subscriber. Only the first call does anything.
#[cfg(feature = "trace")]
pub fn init_tracing(log_dir: &Path) -> bool {
    *INSTALLED.get_or_init(|| {
        if let Err(e) = std::fs::create_dir_all(log_dir) {
            eprintln!("skk: cannot create log dir {}: {e}", log_dir.display());
            return false;
        }
        let file_appender = tracing_appender::rolling::never(log_dir, "skk-trace.jsonl");
        let (writer, guard) = tracing_appender::non_blocking(file_appender);
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_FILTER));
        let installed = tracing_subscriber::fmt()
            .json()
            .with_writer(writer)
            .with_target(true)
            .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
            .with_env_filter(filter)
            .try_init()
            .is_ok();
        if installed {
            // The editor keeps the engine for its whole lifetime.
            std::mem::forget(guard);
        }
        installed
    })
}

#[cfg(not(feature = "trace"))]
pub fn init_tracing(_log_dir: &std::path::Path) -> bool {
    false
}
