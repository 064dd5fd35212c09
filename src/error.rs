//! Error types used by the connvisor runtime and its collaborators.
//!
//! This module defines two main error enums:
//!
//! - [`Fault`] — classified failures produced by providers and resources,
//!   flowing from the ward through the monitor up to the steward's callers.
//! - [`StewardError`] — errors raised by the supervision runtime itself.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging
//! and additional utilities such as [`Fault::is_fatal`].

use std::time::Duration;
use thiserror::Error;

/// # Classified failures produced by connections and resources.
///
/// A `Fault` carries an identity tag (its variant) that health predicates
/// compare against a known fatal category. The runtime never interprets
/// faults itself; classification belongs to the configured
/// [`HealthCheck`](crate::health::HealthCheck).
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Fault {
    /// Connection acquisition failed; the steward retries after one pulse.
    #[error("connect failed: {error}")]
    Connect {
        /// The underlying error message.
        error: String,
    },

    /// A poll failed but the resource may still recover.
    #[error("read failed: {error}")]
    Read {
        /// The underlying error message.
        error: String,
    },

    /// A poll failed in a way the resource cannot recover from.
    ///
    /// The default health check treats only this category as fatal.
    #[error("fatal read failure: {error}")]
    Fatal {
        /// The underlying error message.
        error: String,
    },
}

impl Fault {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use connvisor::Fault;
    ///
    /// let fault = Fault::Read { error: "timeout".into() };
    /// assert_eq!(fault.as_label(), "fault_read");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            Fault::Connect { .. } => "fault_connect",
            Fault::Read { .. } => "fault_read",
            Fault::Fatal { .. } => "fault_fatal",
        }
    }

    /// Returns a human-readable message with details about the fault.
    pub fn as_message(&self) -> String {
        match self {
            Fault::Connect { error } => format!("connect: {error}"),
            Fault::Read { error } => format!("read: {error}"),
            Fault::Fatal { error } => format!("fatal: {error}"),
        }
    }

    /// Indicates whether the fault belongs to the terminal category.
    ///
    /// This is what [`default_health_check`](crate::health::default_health_check)
    /// evaluates; custom predicates are free to classify differently.
    ///
    /// # Example
    /// ```
    /// use connvisor::Fault;
    ///
    /// let transient = Fault::Read { error: "slow".into() };
    /// assert!(!transient.is_fatal());
    ///
    /// let terminal = Fault::Fatal { error: "socket gone".into() };
    /// assert!(terminal.is_fatal());
    /// ```
    pub fn is_fatal(&self) -> bool {
        matches!(self, Fault::Fatal { .. })
    }
}

/// # Errors produced by the supervision runtime.
///
/// These represent failures of the orchestration itself, such as a shutdown
/// sequence exceeding its grace period. Faults from connections are never
/// promoted into this type; they stay on the fault channel.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum StewardError {
    /// Shutdown grace period elapsed before the supervision loop joined.
    #[error("shutdown grace {grace:?} exceeded; supervision loop still running")]
    GraceExceeded {
        /// The configured grace duration.
        grace: Duration,
    },
}

impl StewardError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            StewardError::GraceExceeded { .. } => "steward_grace_exceeded",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            StewardError::GraceExceeded { grace } => {
                format!("grace exceeded after {grace:?}")
            }
        }
    }
}
