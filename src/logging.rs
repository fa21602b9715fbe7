//! Tracing setup.
//!
//! Request and outcome lines are emitted on the [`NETWORKING`] target so they
//! can be filtered independently, e.g. `RUST_LOG=networking=warn`.

use tracing_subscriber::EnvFilter;

/// Target for request and outcome trace lines.
pub const NETWORKING: &str = "networking";

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "callback_http=info,networking=info";

/// Install a global fmt subscriber honoring `RUST_LOG`.
///
/// Safe to call more than once; only the first call installs a subscriber.
/// Returns true if this call installed it.
pub fn init_tracing() -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}

/// Run `f` with a thread-local subscriber and return what it logged.
///
/// Lines use the plain fmt layout without timestamps, e.g.
/// ` WARN networking: 404: http://x/1`.
#[cfg(test)]
pub(crate) fn capture_logs<R>(f: impl FnOnce() -> R) -> (R, String) {
    use std::io;
    use std::sync::{Arc, Mutex, PoisonError};
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Buffer {
        type Writer = Buffer;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    let buffer = Buffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buffer.clone())
        .with_ansi(false)
        .without_time()
        .with_max_level(tracing::Level::TRACE)
        .finish();

    let result = tracing::subscriber::with_default(subscriber, f);
    let bytes = buffer.0.lock().unwrap_or_else(PoisonError::into_inner).clone();
    (result, String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
    }

    #[test]
    fn test_capture_logs_sees_target_and_level() {
        let ((), logs) = capture_logs(|| {
            tracing::warn!(target: NETWORKING, "{}: {}", 503, "http://x/1");
        });
        assert!(logs.contains("WARN networking: 503: http://x/1"), "{}", logs);
    }

    #[test]
    fn test_init_tracing_is_idempotent() {
        init_tracing();
        assert!(!init_tracing());
    }
}
