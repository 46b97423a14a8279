// ── Runtime panel configuration ──
//
// Describes *how* to reach one controller and how the panel behaves.
// Never touches disk: the CLI/TUI resolve a profile through
// `coverly-config` and hand the result in.

use std::time::Duration;

use coverly_api::ReconnectConfig;
use url::Url;

/// Default number of operator-log lines kept on screen.
pub const DEFAULT_LOG_CAPACITY: usize = 20;

/// Configuration for one panel session against one controller.
#[derive(Debug, Clone)]
pub struct PanelConfig {
    /// Controller base URL (e.g. `http://192.168.1.40`).
    pub url: Url,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Push-channel reconnect policy. `None` keeps the panel offline after
    /// the first disconnect (REST keeps working).
    pub reconnect: Option<ReconnectConfig>,
    /// Operator log capacity; oldest lines are trimmed first.
    pub log_capacity: usize,
}

impl PanelConfig {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            timeout: Duration::from_secs(10),
            reconnect: Some(ReconnectConfig::default()),
            log_capacity: DEFAULT_LOG_CAPACITY,
        }
    }
}
