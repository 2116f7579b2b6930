use std::collections::HashMap;
use std::time::Duration;

use crate::domain::UnknownPolicy;

/// mDNS service type announced by HEOS-capable Denon and Marantz receivers
pub const RECEIVER_SERVICE_TYPE: &str = "_heos-audio._tcp.local.";

/// Settings for a device session
#[derive(Debug, Clone)]
pub struct ReceiverConfig {
    /// Port of the HTTP command and AppCommand endpoints
    pub http_port: u16,

    /// Port of the Telnet control protocol
    pub telnet_port: u16,

    /// Open a Telnet session in addition to HTTP
    pub use_telnet: bool,

    /// Timeout applied to each HTTP request and Telnet write
    pub request_timeout: Duration,

    /// Pause between consecutive Telnet commands
    pub command_spacing: Duration,

    /// Per-feature overrides of the policy applied while a value is unknown
    pub unknown_state: HashMap<String, UnknownPolicy>,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            http_port: 8080,
            telnet_port: 23,
            use_telnet: true,
            request_timeout: Duration::from_secs(5),
            command_spacing: Duration::from_millis(50),
            unknown_state: HashMap::new(),
        }
    }
}

impl ReceiverConfig {
    /// Use a different HTTP port
    pub fn with_http_port(mut self, port: u16) -> Self {
        self.http_port = port;
        self
    }

    /// Enable or disable the Telnet session
    pub fn with_telnet(mut self, enabled: bool) -> Self {
        self.use_telnet = enabled;
        self
    }

    /// Set the per-request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Override what a feature's setter does while its state is unknown
    pub fn with_unknown_policy(
        mut self,
        feature: impl Into<String>,
        policy: UnknownPolicy,
    ) -> Self {
        self.unknown_state.insert(feature.into(), policy);
        self
    }
}

/// Settings for the discovery engine
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// mDNS service type to browse (trailing dot required)
    pub service_type: String,

    /// HTTP ports tried, in order, when probing a candidate
    pub probe_ports: Vec<u16>,

    /// Overall time allowed for browsing and for each device info request
    pub probe_timeout: Duration,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            service_type: RECEIVER_SERVICE_TYPE.to_string(),
            probe_ports: vec![8080, 80],
            probe_timeout: Duration::from_secs(5),
        }
    }
}
