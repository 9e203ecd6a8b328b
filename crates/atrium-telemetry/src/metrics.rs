//! Request metrics for Atrium.
//!
//! Metrics go through the [`metrics`] facade. Installing a recorder
//! (Prometheus, StatsD, ...) is left to the embedding application; without
//! one, recording is a no-op.
//!
//! # Standard Metrics
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `atrium_requests_total` | Counter | `outcome` | Total requests |
//! | `atrium_request_duration_seconds` | Histogram | `outcome` | Request latency |
//! | `atrium_in_flight_requests` | Gauge | - | In-flight requests |
//! | `atrium_access_decisions_total` | Counter | `allowed`, `reason` | Access decisions |

use std::fmt;
use std::time::Duration;

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};

/// Requests counter name.
pub const REQUESTS_TOTAL: &str = "atrium_requests_total";
/// Request duration histogram name.
pub const REQUEST_DURATION_SECONDS: &str = "atrium_request_duration_seconds";
/// In-flight gauge name.
pub const IN_FLIGHT_REQUESTS: &str = "atrium_in_flight_requests";
/// Access decision counter name.
pub const ACCESS_DECISIONS_TOTAL: &str = "atrium_access_decisions_total";

/// Terminal state of a request, used as the `outcome` label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// A view shell was rendered.
    Rendered,
    /// An API handler responded.
    Responded,
    /// The access policy denied the request.
    Denied,
    /// No route matched (fallback or generic 404).
    NotMatched,
    /// The path exists under other methods.
    MethodNotAllowed,
    /// A handler or the state function failed.
    Error,
    /// The request exceeded the configured timeout.
    Timeout,
}

impl Outcome {
    /// Returns the label value.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Rendered => "rendered",
            Self::Responded => "responded",
            Self::Denied => "denied",
            Self::NotMatched => "not_matched",
            Self::MethodNotAllowed => "method_not_allowed",
            Self::Error => "error",
            Self::Timeout => "timeout",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registers descriptions for all standard metrics.
///
/// Call once after installing a recorder.
pub fn describe_metrics() {
    describe_counter!(REQUESTS_TOTAL, "Total number of HTTP requests by outcome");
    describe_histogram!(
        REQUEST_DURATION_SECONDS,
        metrics::Unit::Seconds,
        "HTTP request duration in seconds"
    );
    describe_gauge!(
        IN_FLIGHT_REQUESTS,
        "Number of HTTP requests currently being processed"
    );
    describe_counter!(
        ACCESS_DECISIONS_TOTAL,
        "Total access policy decisions by result"
    );
}

/// Records a completed request.
pub fn record_request(outcome: Outcome, duration: Duration) {
    counter!(REQUESTS_TOTAL, "outcome" => outcome.as_str()).increment(1);
    histogram!(REQUEST_DURATION_SECONDS, "outcome" => outcome.as_str())
        .record(duration.as_secs_f64());
}

/// Records an access policy decision.
pub fn record_access_decision(allowed: bool, reason: &'static str) {
    counter!(
        ACCESS_DECISIONS_TOTAL,
        "allowed" => if allowed { "true" } else { "false" },
        "reason" => reason
    )
    .increment(1);
}

/// Guard that tracks one in-flight request for its lifetime.
#[derive(Debug)]
pub struct InFlightGuard {
    _private: (),
}

impl InFlightGuard {
    /// Creates a new guard and increments the in-flight gauge.
    #[must_use]
    pub fn new() -> Self {
        gauge!(IN_FLIGHT_REQUESTS).increment(1.0);
        Self { _private: () }
    }
}

impl Default for InFlightGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        gauge!(IN_FLIGHT_REQUESTS).decrement(1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_labels() {
        assert_eq!(Outcome::Rendered.as_str(), "rendered");
        assert_eq!(Outcome::NotMatched.to_string(), "not_matched");
        assert_eq!(Outcome::MethodNotAllowed.as_str(), "method_not_allowed");
    }

    #[test]
    fn test_record_functions_without_recorder() {
        describe_metrics();
        record_request(Outcome::Responded, Duration::from_millis(10));
        record_access_decision(false, "missing_credentials");
        let guard = InFlightGuard::new();
        drop(guard);
    }
}
