use directories::ProjectDirs;
use once_cell::sync::OnceCell;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: OnceCell<()> = OnceCell::new();

fn log_dir() -> PathBuf {
    ProjectDirs::from("", "Mo", "the other roles installer")
        .map(|d| d.data_local_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

/// Console plus daily-rolling file logging. `RUST_LOG` overrides the `info` default.
///
/// The returned guard flushes the file writer when dropped; hold it until exit.
/// Later calls are no-ops and return `None`.
pub fn init_logging() -> Option<WorkerGuard> {
    let mut guard = None;
    INIT.get_or_init(|| {
        let dir = log_dir();
        let _ = std::fs::create_dir_all(&dir);
        let file_appender = rolling::daily(&dir, "torinstaller.log");
        let (nb_file, file_guard) = tracing_appender::non_blocking(file_appender);
        guard = Some(file_guard);

        let console_layer = fmt::layer().with_target(false);
        let file_layer = fmt::layer().with_writer(nb_file).with_target(false).with_ansi(false);

        let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = tracing_subscriber::registry()
            .with(env)
            .with(console_layer)
            .with(file_layer)
            .try_init();
    });
    guard
}

/// Rate-limits progress lines so a long download logs a handful of updates
/// instead of one per chunk.
pub struct ProgressThrottle {
    last: Instant,
    min_interval: Duration,
}

impl ProgressThrottle {
    pub fn new(min_interval_ms: u64) -> Self {
        let min_interval = Duration::from_millis(min_interval_ms);
        Self {
            last: Instant::now().checked_sub(min_interval).unwrap_or_else(Instant::now),
            min_interval,
        }
    }

    /// Whether enough time passed since the last accepted report.
    pub fn ready(&mut self) -> bool {
        let now = Instant::now();
        if now.duration_since(self.last) >= self.min_interval {
            self.last = now;
            true
        } else {
            false
        }
    }

    pub fn report_bytes(&mut self, prefix: &str, done: u64, total: u64) {
        if !self.ready() {
            return;
        }
        let done_h = humansize::format_size(done, humansize::BINARY);
        if total > 0 {
            let pct = (done.saturating_mul(100) / total).min(100);
            tracing::info!(target: "progress", "{prefix}: {done_h} / {} ({pct}%)", humansize::format_size(total, humansize::BINARY));
        } else {
            tracing::info!(target: "progress", "{prefix}: {done_h}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn throttle_accepts_first_report_then_waits() {
        let mut t = ProgressThrottle::new(60_000);
        assert!(t.ready());
        assert!(!t.ready());
    }

    #[test]
    fn zero_interval_never_throttles() {
        let mut t = ProgressThrottle::new(0);
        assert!(t.ready());
        assert!(t.ready());
    }
}
