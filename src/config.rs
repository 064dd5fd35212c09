//! # Global runtime configuration.
//!
//! Provides [`Config`], centralized settings for the steward runtime.
//!
//! ## Sentinel values
//! - `bus_capacity` and `errors_capacity` are clamped to a minimum of 1
//!   by their consumers.
//! - `pulse` must be strictly positive; the ward interval helper clamps
//!   degenerate values to 1ms rather than constructing a zero-period timer.

use std::time::Duration;

/// Global configuration for the steward runtime.
///
/// Defines:
/// - **Polling cadence**: the pulse interval driving connect retries and reads
/// - **Shutdown behavior**: grace period for the signal-driven entrypoint
/// - **Event system**: bus capacity for observability events
/// - **Fault delivery**: capacity of the caller-facing fault channel
///
/// ## Field semantics
/// - `pulse`: connect-retry wait; the ward polls at half this rate
/// - `grace`: maximum wait for the supervision loop to join after a signal
/// - `bus_capacity`: event bus ring buffer size (min 1; clamped by Bus)
/// - `errors_capacity`: fault channel depth (min 1; faults beyond it are dropped)
#[derive(Clone, Debug)]
pub struct Config {
    /// Pulse interval: connect-retry cadence and twice the ward poll rate.
    ///
    /// The ward reads at `pulse / 2` so that within one pulse window it
    /// observes either fresh faults or the stop signal.
    pub pulse: Duration,

    /// Maximum time to wait for the supervision loop to finish after a
    /// shutdown signal before [`Steward::run`](crate::Steward::run) gives up
    /// with [`StewardError::GraceExceeded`](crate::StewardError::GraceExceeded).
    pub grace: Duration,

    /// Capacity of the event bus broadcast ring buffer.
    ///
    /// Slow subscribers that lag behind more than `bus_capacity` events will
    /// observe `Lagged` and skip older items. Minimum value is 1 (enforced by Bus).
    pub bus_capacity: usize,

    /// Capacity of the caller-facing fault channel.
    ///
    /// Delivery is best-effort: when the channel is full or unwatched, faults
    /// are dropped with a diagnostic event instead of blocking the producer.
    pub errors_capacity: usize,
}

impl Config {
    /// Returns the ward poll interval: half the pulse, clamped to at least 1ms.
    ///
    /// The clamp guards against a sub-2ms pulse producing a zero-period timer.
    #[inline]
    pub fn ward_interval(&self) -> Duration {
        (self.pulse / 2).max(Duration::from_millis(1))
    }

    /// Returns the fault channel capacity clamped to a minimum of 1.
    #[inline]
    pub fn errors_capacity_clamped(&self) -> usize {
        self.errors_capacity.max(1)
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    ///
    /// The `Bus` should use this value to avoid constructing an invalid channel.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `pulse = 300ms` (reads every 150ms)
    /// - `grace = 60s` (reasonable graceful shutdown window)
    /// - `bus_capacity = 1024` (good baseline)
    /// - `errors_capacity = 1` (single-slot, drop-on-full fault delivery)
    fn default() -> Self {
        Self {
            pulse: Duration::from_millis(300),
            grace: Duration::from_secs(60),
            bus_capacity: 1024,
            errors_capacity: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ward_interval_is_half_pulse() {
        let cfg = Config {
            pulse: Duration::from_millis(300),
            ..Config::default()
        };
        assert_eq!(cfg.ward_interval(), Duration::from_millis(150));
    }

    #[test]
    fn test_ward_interval_clamped_for_tiny_pulse() {
        let cfg = Config {
            pulse: Duration::from_micros(100),
            ..Config::default()
        };
        assert_eq!(cfg.ward_interval(), Duration::from_millis(1));
    }

    #[test]
    fn test_capacities_clamped() {
        let cfg = Config {
            bus_capacity: 0,
            errors_capacity: 0,
            ..Config::default()
        };
        assert_eq!(cfg.bus_capacity_clamped(), 1);
        assert_eq!(cfg.errors_capacity_clamped(), 1);
    }
}
