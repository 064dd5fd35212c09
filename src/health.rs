//! # Health classification for fault streams.
//!
//! The monitor decides when a ward must be restarted by applying a pure
//! predicate to every fault it observes. The predicate is injected through
//! the [`StewardBuilder`](crate::StewardBuilder); the ward itself carries no
//! classification policy.
//!
//! ## Contract
//! - The predicate receives each [`Fault`] by reference and returns `true`
//!   if the fault is unrecoverable for the current resource instance.
//! - It must be pure: no I/O, no interior mutability that changes answers
//!   between calls for equal faults.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use connvisor::{Fault, HealthCheck};
//!
//! // Treat both fatal faults and a specific read error as terminal:
//! let check: HealthCheck = Arc::new(|f: &Fault| {
//!     f.is_fatal() || matches!(f, Fault::Read { error } if error == "connection reset")
//! });
//!
//! assert!(check(&Fault::Fatal { error: "socket gone".into() }));
//! assert!(!check(&Fault::Read { error: "slow".into() }));
//! ```

use std::sync::Arc;

use crate::error::Fault;

/// Pure predicate mapping a [`Fault`] to "is this fatal for the current resource?".
///
/// Shared handle so one predicate can serve every supervision cycle.
pub type HealthCheck = Arc<dyn Fn(&Fault) -> bool + Send + Sync>;

/// Returns the default health check: only [`Fault::Fatal`] is terminal.
///
/// Connect faults are handled by the steward's retry loop and transient read
/// faults are expected noise, so neither triggers a restart by default.
pub fn default_health_check() -> HealthCheck {
    Arc::new(Fault::is_fatal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_marks_only_fatal() {
        let check = default_health_check();
        assert!(check(&Fault::Fatal { error: "x".into() }));
        assert!(!check(&Fault::Read { error: "x".into() }));
        assert!(!check(&Fault::Connect { error: "x".into() }));
    }

    #[test]
    fn test_custom_predicate_overrides_category() {
        let check: HealthCheck =
            Arc::new(|f| matches!(f, Fault::Read { error } if error == "reset"));
        assert!(check(&Fault::Read { error: "reset".into() }));
        assert!(!check(&Fault::Fatal { error: "ignored".into() }));
    }
}
