//! Transport seams between the dispatcher and the wire.

use async_trait::async_trait;

use crate::appcommand::AppCommand;
use crate::error::Result;

/// HTTP interface of a receiver
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send a command on the simple command endpoint, returning the body
    async fn get_command(&self, command: &str) -> Result<String>;

    /// Post commands to the AppCommand endpoint, returning the body
    async fn post_appcommand(&self, commands: &[AppCommand]) -> Result<String>;
}

/// Telnet interface of a receiver
#[async_trait]
pub trait TelnetTransport: Send + Sync {
    fn connected(&self) -> bool;

    fn healthy(&self) -> bool;

    /// Write commands in order; implementations serialize concurrent callers
    async fn send_commands(&self, commands: &[String]) -> Result<()>;

    /// Whether commands should go out on this session
    fn available(&self) -> bool {
        self.connected() && self.healthy()
    }
}
