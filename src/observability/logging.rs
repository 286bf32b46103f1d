//! Structured logging.
//!
//! `RUST_LOG` takes precedence; otherwise the configured level applies to this
//! crate and `tower_http`. At `debug`, employee operations log a span close
//! event carrying their busy and idle time.

use tracing::Subscriber;
use tracing_subscriber::{
    fmt::{format::FmtSpan, MakeWriter},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

use crate::config::ObservabilityConfig;

fn default_directives(config: &ObservabilityConfig) -> String {
    format!(
        "employee_service={level},tower_http={level}",
        level = config.log_level
    )
}

fn fmt_layer<S, W>(writer: W) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt::layer()
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(writer)
}

/// Install the global tracing subscriber. Safe to call more than once.
pub fn init_logging(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(config)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer(std::io::stdout))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    use crate::employees::{EmployeeService, EmployeeStore};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    #[test]
    fn test_directives_follow_configured_level() {
        let config = ObservabilityConfig {
            log_level: "debug".into(),
            ..Default::default()
        };
        assert_eq!(
            default_directives(&config),
            "employee_service=debug,tower_http=debug"
        );
    }

    #[test]
    fn test_employee_operations_log_timed_spans_at_debug() {
        let captured = Captured::default();
        let subscriber = tracing_subscriber::registry()
            .with(EnvFilter::new("employee_service=debug"))
            .with(fmt_layer(captured.clone()));

        tracing::subscriber::with_default(subscriber, || {
            let svc = EmployeeService::new(EmployeeStore::new(), "company.com");
            assert!(svc.by_manager(7).is_empty());
        });

        let output = captured.text();
        assert!(output.contains("by_manager"), "{}", output);
        assert!(output.contains("manager_id"), "{}", output);
        assert!(output.contains("time.busy"), "{}", output);
    }

    #[test]
    fn test_employee_operation_spans_are_silent_at_info() {
        let captured = Captured::default();
        let subscriber = tracing_subscriber::registry()
            .with(EnvFilter::new("employee_service=info"))
            .with(fmt_layer(captured.clone()));

        tracing::subscriber::with_default(subscriber, || {
            let svc = EmployeeService::new(EmployeeStore::new(), "company.com");
            assert!(svc.by_manager(7).is_empty());
        });

        assert!(!captured.text().contains("time.busy"));
    }
}
