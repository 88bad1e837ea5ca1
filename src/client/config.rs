//! Polling configuration of [`crate::GatewayClient::wait_for_code`].

use std::time::Duration;

/// Controls timeout and polling behavior when waiting for SMS codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitConfig {
    /// Maximum time to wait for SMS code before timing out.
    pub timeout: Duration,
    /// Interval between polling attempts.
    pub poll_interval: Duration,
    /// Cancel the rental when the wait ends without a code.
    pub cancel_on_failure: bool,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(120),
            poll_interval: Duration::from_secs(3),
            cancel_on_failure: true,
        }
    }
}

impl WaitConfig {
    /// Preset for slow services: 5 minutes, polling every 5 seconds.
    pub fn patient() -> Self {
        Self {
            timeout: Duration::from_secs(300),
            poll_interval: Duration::from_secs(5),
            cancel_on_failure: true,
        }
    }

    /// Create a new config with a custom timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Create a new config with a custom poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Keep the rental alive when the wait fails.
    pub fn keep_rental_on_failure(mut self) -> Self {
        self.cancel_on_failure = false;
        self
    }
}
