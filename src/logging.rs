//! Subscriber setup for the binary.
//!
//! Library code only emits `tracing` events; whoever embeds the toolkit
//! decides where they go. The CLI sends human-readable lines to stderr
//! and a full debug trail to a daily-rotated file.

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{Builder, Rotation};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::{LOG_FILE_NAME, LogSettings};

const DEBUG_FILTER: &str = "motion_toolkit=debug";

/// Directives for stderr: `--verbose`, then `RUST_LOG`, then the config.
fn stderr_filter(settings: &LogSettings, verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(DEBUG_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.filter))
    }
}

/// Install the global subscriber.
///
/// Keep the returned guard alive for the life of the process; dropping it
/// flushes and closes the log file.
pub fn init(settings: &LogSettings, verbose: bool) -> Result<Option<WorkerGuard>> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_filter(stderr_filter(settings, verbose));

    let (file_layer, guard) = if settings.file {
        let dir = settings.log_dir();
        let (prefix, suffix) = LOG_FILE_NAME
            .rsplit_once('.')
            .unwrap_or((LOG_FILE_NAME, "log"));
        let appender = Builder::new()
            .rotation(Rotation::DAILY)
            .filename_prefix(prefix)
            .filename_suffix(suffix)
            .max_log_files(settings.max_files.max(1))
            .build(&dir)
            .with_context(|| format!("failed to open log directory {}", dir.display()))?;
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let layer = fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_target(true)
            .with_filter(EnvFilter::new(DEBUG_FILTER));
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("failed to install tracing subscriber")?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use serde_json::json;
    use tracing_subscriber::fmt::MakeWriter;

    use super::*;
    use crate::api::MotionApi;
    use crate::api::testing::StubTransport;
    use crate::modes::Mode;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn capture(filter: EnvFilter, f: impl FnOnce()) -> String {
        let out = Captured::default();
        let subscriber = tracing_subscriber::registry().with(
            fmt::layer()
                .with_writer(out.clone())
                .with_ansi(false)
                .with_filter(filter),
        );
        tracing::subscriber::with_default(subscriber, f);
        out.text()
    }

    #[test]
    fn test_dispatch_is_logged_at_the_default_filter() {
        let api = MotionApi::with_transport(StubTransport::new([json!({"id": "t-answered"})]));
        let log = capture(EnvFilter::new(&LogSettings::default().filter), || {
            api.run_mode(Mode::TaskRetrieve, &json!({"task_id": "t-asked"}))
                .unwrap();
        });
        assert!(log.contains("dispatching"), "{log}");
        assert!(log.contains("task.retrieve"), "{log}");
        assert!(log.contains("t-asked"), "{log}");
        assert!(log.contains("t-answered"), "{log}");
    }

    #[test]
    fn test_file_filter_keeps_debug_events() {
        let log = capture(EnvFilter::new(DEBUG_FILTER), || {
            tracing::debug!(target: "motion_toolkit::api", "request detail");
        });
        assert!(log.contains("request detail"));

        let log = capture(EnvFilter::new(&LogSettings::default().filter), || {
            tracing::debug!(target: "motion_toolkit::api", "request detail");
        });
        assert!(log.is_empty());
    }
}
