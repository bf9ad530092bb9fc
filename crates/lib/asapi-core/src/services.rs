use std::error::Error;
use std::fmt;

use tokio::sync::watch;

/// The readiness signal was dropped before the provider became usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateError;

impl fmt::Display for GateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "symbol provider never became ready")
    }
}

impl Error for GateError {}

/// Creates a linked readiness pair. The gate resolves once the signal fires.
#[must_use]
pub fn readiness() -> (ReadinessSignal, ReadinessGate) {
    let (tx, rx) = watch::channel(false);
    (ReadinessSignal { ready: tx }, ReadinessGate { ready: rx })
}

/// Write half of the readiness pair, held by whoever brings the provider up.
#[derive(Debug)]
pub struct ReadinessSignal {
    ready: watch::Sender<bool>,
}

impl ReadinessSignal {
    /// Resolves the gate. Later calls are no-ops.
    pub fn mark_ready(&self) {
        self.ready.send_replace(true);
    }
}

/// One-shot condition awaited before any provider call.
///
/// Cloning is cheap; every clone observes the same signal.
#[derive(Debug, Clone)]
pub struct ReadinessGate {
    ready: watch::Receiver<bool>,
}

impl ReadinessGate {
    /// A gate that is already resolved.
    #[must_use]
    pub fn resolved() -> Self {
        let (signal, gate) = readiness();
        signal.mark_ready();
        gate
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        *self.ready.borrow()
    }

    /// Suspends until the gate resolves.
    ///
    /// # Errors
    /// Returns `GateError` if the signal is dropped without ever resolving.
    pub async fn wait(&self) -> Result<(), GateError> {
        if self.is_ready() {
            return Ok(());
        }
        let mut ready = self.ready.clone();
        ready
            .wait_for(|ready| *ready)
            .await
            .map(|_| ())
            .map_err(|_| GateError)
    }
}
