use tracing::error;

/// Sink for incidents that need an operator's attention.
pub trait IncidentLogger: Send + Sync {
    fn emergency(&self, message: &str);
}

/// Forwards incidents to `tracing` at error level, tagged as emergencies.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingIncidentLogger;

impl IncidentLogger for TracingIncidentLogger {
    fn emergency(&self, message: &str) {
        error!(severity = "emergency", "{message}");
    }
}
