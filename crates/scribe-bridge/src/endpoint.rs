//! Where the bridge lives and how long to wait for it.

use std::time::Duration;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8177;

/// Address and timeouts of the bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeEndpoint {
    pub host: String,
    pub port: u16,
    /// Bound on the whole liveness exchange
    pub probe_timeout: Duration,
    /// Bound on establishing a connection; the compile stream itself is unbounded
    pub connect_timeout: Duration,
}

impl BridgeEndpoint {
    /// Returns the URL of an endpoint path such as `"health"`.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}:{}/{}", self.host, self.port, path)
    }
}

impl Default for BridgeEndpoint {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            probe_timeout: Duration::from_secs(2),
            connect_timeout: Duration::from_secs(2),
        }
    }
}
