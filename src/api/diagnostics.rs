use serde_json::Value;
use tracing::debug;

/// Diagnostic record emitted on transport and application failures.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    Transport {
        error: String,
        /// outgoing request, Authorization redacted
        request: String,
        /// status line and headers, when a response was received
        response: Option<String>,
    },
    /// exactly the `logs` array of the response
    Application { logs: Value },
}

pub trait DiagnosticSink: Send + Sync {
    fn record(&self, diagnostic: Diagnostic);
}

/// Emits diagnostics as `tracing` debug events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&self, diagnostic: Diagnostic) {
        match diagnostic {
            Diagnostic::Transport { error, request, response } => {
                debug!(
                    error = %error,
                    request = %request,
                    response = response.as_deref().unwrap_or("<none>"),
                    "Prelude API error"
                );
            }
            Diagnostic::Application { logs } => {
                debug!(logs = %logs, "Prelude API error");
            }
        }
    }
}
