//! `tracing` output to the browser console
//!
//! Events are formatted by the `tracing-subscriber` fmt layer and written to
//! `console.{debug,info,warn,error}` by level. Timestamps are left out since
//! the console adds its own.

use tracing::Subscriber;
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use tracing_web::MakeWebConsoleWriter;

/// Subscriber writing events that pass `filter` to the browser console
pub fn console_subscriber(filter: EnvFilter) -> impl Subscriber + Send + Sync {
    formatted(filter, MakeWebConsoleWriter::new())
}

fn formatted<W>(filter: EnvFilter, writer: W) -> impl Subscriber + Send + Sync
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::registry().with(filter).with(
        fmt::layer()
            .with_ansi(false)
            .without_time()
            .with_writer(writer),
    )
}

/// Install the console subscriber and the panic hook
///
/// Only the first call takes effect.
pub fn init_logging(filter: EnvFilter) {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    if console_subscriber(filter).try_init().is_err() {
        tracing::debug!("console subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WebConfig;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing::Level;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
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

    impl<'w> MakeWriter<'w> for Captured {
        type Writer = Captured;

        fn make_writer(&'w self) -> Self::Writer {
            self.clone()
        }
    }

    fn config(log_level: &str) -> WebConfig {
        WebConfig {
            log_level: log_level.to_string(),
            ..WebConfig::default()
        }
    }

    #[test]
    fn test_console_subscriber_applies_filter() {
        let subscriber = console_subscriber(config("mdi_desktop=debug,warn").filter());
        tracing::subscriber::with_default(subscriber, || {
            assert!(tracing::enabled!(target: "mdi_desktop::manager", Level::DEBUG));
            assert!(!tracing::enabled!(target: "mdi_desktop::manager", Level::TRACE));
            assert!(tracing::enabled!(target: "mdi_web::desktop", Level::WARN));
            assert!(!tracing::enabled!(target: "mdi_web::desktop", Level::INFO));
        });
    }

    #[test]
    fn test_unknown_level_filters_at_info() {
        let subscriber = console_subscriber(config("loud").filter());
        tracing::subscriber::with_default(subscriber, || {
            assert!(tracing::enabled!(target: "mdi_web::desktop", Level::INFO));
            assert!(!tracing::enabled!(target: "mdi_web::desktop", Level::DEBUG));
        });
    }

    #[test]
    fn test_events_carry_span_context() {
        let captured = Captured::default();
        let subscriber = formatted(config("debug").filter(), captured.clone());
        tracing::subscriber::with_default(subscriber, || {
            tracing::info_span!("restore", count = 2).in_scope(|| {
                tracing::info!(window = "window-a", "restored window");
                tracing::trace!("dropped by the filter");
            });
        });

        let text = captured.text();
        assert!(text.contains("INFO"));
        assert!(text.contains("restore{count=2}"));
        assert!(text.contains("restored window"));
        assert!(text.contains("window-a"));
        assert!(!text.contains("dropped by the filter"));
    }
}
