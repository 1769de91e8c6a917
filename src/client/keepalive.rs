// ABOUTME: Session keep-alive tracking for long-running Clickatell clients
// ABOUTME: Decides when a ping is due so the gateway session does not expire while idle

use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Configuration for session keep-alive
///
/// The gateway expires a session after 15 minutes without activity. Pinging
/// every 10 minutes keeps an idle session alive with room to spare.
///
/// # Example
///
/// ```rust
/// use clickatell::client::KeepAliveConfig;
/// use std::time::Duration;
///
/// // Default configuration (10 minute interval, 3 max failures)
/// let config = KeepAliveConfig::default();
///
/// // Custom configuration
/// let config = KeepAliveConfig::new(Duration::from_secs(300))
///     .with_max_failures(5);
///
/// // Disabled keep-alive
/// let config = KeepAliveConfig::disabled();
/// assert!(!config.enabled);
/// ```
#[derive(Debug, Clone)]
pub struct KeepAliveConfig {
    /// Idle time after which a ping is due (default: 10 minutes)
    pub interval: Duration,

    /// Consecutive ping failures before the session is considered lost
    /// (default: 3)
    pub max_failures: u32,

    /// Whether keep-alive is enabled (default: true)
    pub enabled: bool,
}

impl Default for KeepAliveConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10 * 60),
            max_failures: 3,
            enabled: true,
        }
    }
}

impl KeepAliveConfig {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            ..Default::default()
        }
    }

    pub fn with_max_failures(mut self, max_failures: u32) -> Self {
        self.max_failures = max_failures;
        self
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }
}

/// Snapshot of keep-alive state
#[derive(Debug, Clone)]
pub struct KeepAliveStatus {
    /// Whether keep-alive is enabled
    pub running: bool,

    /// Pings that have failed in a row. Reset by any successful request.
    pub consecutive_failures: u32,

    /// Pings sent since the manager was created
    pub total_pings: u32,

    /// Pings answered with `OK:`
    pub total_pongs: u32,
}

/// Tracks session activity and decides when a keep-alive ping is due
///
/// Uses a polling model: the client asks [`should_ping`](Self::should_ping)
/// from [`maintain_keep_alive`](crate::client::ClickatellClient::maintain_keep_alive)
/// and reports the outcome back. Every successful request counts as
/// activity, so a busy client never pings.
#[derive(Debug)]
pub struct KeepAliveManager {
    config: KeepAliveConfig,

    /// Last successful request or ping
    last_activity: Option<Instant>,

    consecutive_failures: u32,
    total_pings: u32,
    total_pongs: u32,
    enabled: bool,
}

impl KeepAliveManager {
    pub fn new(config: KeepAliveConfig) -> Self {
        Self {
            enabled: config.enabled,
            config,
            last_activity: None,
            consecutive_failures: 0,
            total_pings: 0,
            total_pongs: 0,
        }
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// True if enabled, under the failure limit, and idle for at least the
    /// configured interval. A manager that has seen no activity yet has no
    /// session to keep alive and never asks for a ping.
    pub fn should_ping(&self) -> bool {
        if !self.enabled {
            return false;
        }

        if self.consecutive_failures >= self.config.max_failures {
            debug!("Max keep-alive failures reached, not sending more pings");
            return false;
        }

        self.last_activity
            .is_some_and(|last| last.elapsed() >= self.config.interval)
    }

    /// Record a successful request of any kind
    pub fn record_activity(&mut self) {
        self.last_activity = Some(Instant::now());
        self.reset_failures();
    }

    pub fn on_ping_sent(&mut self) {
        self.total_pings += 1;
        debug!("Session ping sent (total: {})", self.total_pings);
    }

    pub fn on_ping_success(&mut self) {
        self.total_pongs += 1;
        self.record_activity();
        debug!("Session ping successful (total: {})", self.total_pongs);
    }

    pub fn on_ping_failure(&mut self) {
        self.consecutive_failures += 1;
        warn!(
            "Session ping failed (consecutive failures: {})",
            self.consecutive_failures
        );
    }

    pub fn reset_failures(&mut self) {
        if self.consecutive_failures > 0 {
            debug!("Resetting {} consecutive failures", self.consecutive_failures);
            self.consecutive_failures = 0;
        }
    }

    /// Forget all activity, e.g. after the session was invalidated
    pub fn reset(&mut self) {
        self.last_activity = None;
        self.consecutive_failures = 0;
    }

    /// True once `max_failures` pings have failed in a row
    pub fn is_session_failed(&self) -> bool {
        self.consecutive_failures >= self.config.max_failures
    }

    pub fn status(&self) -> KeepAliveStatus {
        KeepAliveStatus {
            running: self.enabled,
            consecutive_failures: self.consecutive_failures,
            total_pings: self.total_pings,
            total_pongs: self.total_pongs,
        }
    }

    pub fn is_running(&self) -> bool {
        self.enabled
    }

    pub fn interval(&self) -> Duration {
        self.config.interval
    }
}
