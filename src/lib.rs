//! Rust library for controlling Denon and Marantz AV receivers
//!
//! This library provides an async API for discovering and controlling
//! networked Denon and Marantz receivers. It supports:
//!
//! - Discovery via mDNS (`_heos-audio._tcp`) with HTTP device probing
//! - Control over Telnet, the HTTP command endpoint and HTTP AppCommands
//! - Idempotent setters that only send a command when the receiver's state differs
//! - A per-device state cache fed by receiver notifications
//! - Duplicate-notification suppression for noisy parameters
//! - Audyssey, Dirac Live, sound mode and system settings
//! - Real-time state update subscriptions
//!
//! # Quick Start
//!
//! ```no_run
//! use denon_avr_control::{Discovery, ReceiverConfig};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Browse the network for five seconds
//!     let discovery = Discovery::new();
//!     let Some(found) = discovery.discover(Duration::from_secs(5)).await? else {
//!         println!("No receivers found");
//!         return Ok(());
//!     };
//!
//!     let first = &found[0];
//!     println!("Found {} at {}", first.model_name, first.host);
//!
//!     // Connect and control the receiver
//!     let receiver = first.connect(ReceiverConfig::default()).await?;
//!     receiver.main_zone().power_on().await?;
//!     receiver.audyssey().dynamiceq_on().await?;
//!
//!     // Subscribe to state updates
//!     let mut updates = receiver.subscribe_state();
//!     while let Ok(update) = updates.recv().await {
//!         println!("{} {} = {}", update.zone, update.param, update.value);
//!         break; // Just show one update
//!     }
//!
//!     receiver.close();
//!     Ok(())
//! }
//! ```
//!
//! # Direct Connection
//!
//! If you know the IP address of a receiver, you can connect directly:
//!
//! ```no_run
//! use denon_avr_control::{AvrReceiver, ReceiverConfig, Zone};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let receiver = AvrReceiver::connect("192.168.1.50", ReceiverConfig::default()).await?;
//!     receiver.zone(Zone::Zone2).mute_on().await?;
//!     receiver.sound_mode().set_dialog_enhancer("Medium").await?;
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! The library is organized into several layers:
//!
//! - **Discovery**: mDNS browsing, the service record store and device probing
//! - **Receiver**: device session bootstrap and teardown
//! - **Zone / Audyssey / SoundMode**: high-level control API
//! - **Dispatch**: idempotent command dispatch with transport precedence
//! - **State**: notification parsing, deduplication and the state cache
//! - **Transports**: Telnet session, HTTP command and AppCommand clients
//! - **Catalog**: static feature tables and value domains

mod appcommand;
mod audyssey;
mod catalog;
mod config;
mod discovery;
mod dispatch;
mod domain;
mod error;
mod http;
mod notification;
mod receiver;
mod services;
mod sound_mode;
mod state;
mod subscription;
mod telnet;
mod transport;
mod types;
mod xml;
mod zone;

// Public exports
pub use appcommand::{request_body, AppCommand, AppCommandParam, APPCOMMAND_PATH};
pub use audyssey::Audyssey;
pub use config::{DiscoveryConfig, ReceiverConfig, RECEIVER_SERVICE_TYPE};
pub use discovery::{Discovery, HttpProber, Prober};
pub use dispatch::Dispatcher;
pub use domain::{
    same_wire_value, AppCommandTarget, Feature, FeatureKind, NumericDomain, RangePolicy,
    Requirement, Step, Token, UnknownPolicy,
};
pub use error::{AvrError, Result};
pub use http::{HttpClient, COMMAND_PATH};
pub use notification::{Notification, Prefix, RawEvent};
pub use receiver::AvrReceiver;
pub use services::ServiceStore;
pub use sound_mode::SoundMode;
pub use state::{DeviceState, DuplicateTracker, StateCache};
pub use subscription::StateReceiver;
pub use telnet::TelnetSession;
pub use transport::{HttpTransport, TelnetTransport};
pub use types::{
    Channel, DiscoveredReceiver, Dispatch, Param, ServiceInfo, ServiceRecord, Zone,
};
pub use zone::{SleepTimer, ZoneControl};

/// Static feature tables
pub mod features {
    pub use crate::catalog::*;
}
