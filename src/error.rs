use thiserror::Error;

/// Result type for receiver operations
pub type Result<T> = std::result::Result<T, AvrError>;

/// Errors that can occur when discovering or controlling receivers
#[derive(Error, Debug)]
pub enum AvrError {
    /// Requested value is outside the feature's domain
    #[error("Invalid value {value} for {feature}: {reason}")]
    Domain {
        /// Feature the value was requested for
        feature: String,
        /// The rejected value
        value: String,
        /// Why the value was rejected
        reason: String,
    },

    /// The receiver is not in a state that allows the command
    #[error("{0}")]
    Precondition(String),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Connection was closed unexpectedly
    #[error("Connection closed")]
    ConnectionClosed,

    /// Request timed out
    #[error("Request timeout")]
    Timeout,

    /// AppCommand endpoint did not acknowledge the command
    #[error("AppCommand {name} failed")]
    AppCommandFailed {
        /// Name of the rejected AppCommand
        name: String,
    },

    /// No available transport can carry the feature's command
    #[error("Feature {0} is not supported by any available transport")]
    Unsupported(String),

    /// A discovery candidate could not be bootstrapped
    #[error("Probe failed for {host}: {reason}")]
    Probe {
        /// Address that was probed
        host: String,
        /// Failure detail
        reason: String,
    },

    /// mDNS daemon error
    #[error("mDNS error: {0}")]
    Mdns(String),

    /// XML parsing error
    #[error("XML error: {0}")]
    Xml(String),

    /// Invalid or unexpected response from the receiver
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Channel receive error
    #[error("Channel error: {0}")]
    ChannelError(String),
}

impl AvrError {
    pub(crate) fn domain(
        feature: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        AvrError::Domain {
            feature: feature.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether this error is a domain validation failure
    pub fn is_domain(&self) -> bool {
        matches!(self, AvrError::Domain { .. })
    }
}
