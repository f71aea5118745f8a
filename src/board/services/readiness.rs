//! Store readiness tracking and the bounded startup retry helper.
//!
//! The readiness cell replaces the ad hoc "is the database ready" flag a UI
//! shell would otherwise keep: one shared value with the transitions
//! Connecting → Connected and Connecting → Error, checked by every
//! operation of the board service.

use crate::board::ports::TaskStore;
use std::fmt;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use thiserror::Error;

/// Connection lifecycle states visible to callers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Readiness {
    /// Startup probing has not yet succeeded.
    #[default]
    Connecting,
    /// The store answered a round-trip probe; operations may proceed.
    Connected,
    /// Startup probing was exhausted without a successful round trip.
    Error,
}

impl fmt::Display for Readiness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Error => "error",
        };
        f.write_str(label)
    }
}

/// Shared readiness cell.
#[derive(Debug, Clone, Default)]
pub struct ReadinessCell {
    state: Arc<RwLock<Readiness>>,
}

impl ReadinessCell {
    /// Creates a cell in the `Connecting` state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current state.
    ///
    /// A poisoned lock reads as `Error`: a thread panicked mid-transition,
    /// so the conservative answer is "not usable".
    #[must_use]
    pub fn get(&self) -> Readiness {
        self.state
            .read()
            .map_or(Readiness::Error, |state| *state)
    }

    /// Stores a new state.
    pub fn set(&self, readiness: Readiness) {
        if let Ok(mut state) = self.state.write() {
            *state = readiness;
        }
    }
}

/// Bounded-retry policy for the startup probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of probe attempts.
    pub attempts: u32,
    /// Fixed delay between attempts.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 10,
            delay: Duration::from_millis(500),
        }
    }
}

/// Errors raised while bringing the store up.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StartupError {
    /// The connection pool could not be built or probed.
    #[error("failed to build connection pool: {0}")]
    PoolBuild(String),

    /// Schema provisioning or seeding failed.
    #[error("failed to provision schema: {0}")]
    Provision(String),

    /// Every probe attempt failed.
    #[error("store not ready after {attempts} attempts")]
    RetriesExhausted {
        /// How many probes were made before giving up.
        attempts: u32,
    },
}

/// Polls the store's health check until it answers or the policy is
/// exhausted, sleeping the fixed delay between attempts.
///
/// # Errors
///
/// Returns [`StartupError::RetriesExhausted`] after the final failed
/// attempt.
pub async fn await_ready<S>(store: &S, policy: RetryPolicy) -> Result<(), StartupError>
where
    S: TaskStore + ?Sized,
{
    for attempt in 1..=policy.attempts {
        if store.health_check().await {
            tracing::info!(attempt, "store ready");
            return Ok(());
        }
        tracing::debug!(attempt, attempts = policy.attempts, "store not ready yet");
        if attempt < policy.attempts {
            tokio::time::sleep(policy.delay).await;
        }
    }
    tracing::error!(attempts = policy.attempts, "store readiness probing exhausted");
    Err(StartupError::RetriesExhausted {
        attempts: policy.attempts,
    })
}
