use std::sync::Arc;

use crate::audyssey::Audyssey;
use crate::config::ReceiverConfig;
use crate::dispatch::Dispatcher;
use crate::error::Result;
use crate::http::HttpClient;
use crate::notification::Notification;
use crate::sound_mode::SoundMode;
use crate::state::{DeviceState, StateCache};
use crate::subscription::StateReceiver;
use crate::telnet::TelnetSession;
use crate::transport::{HttpTransport, TelnetTransport};
use crate::types::Zone;
use crate::zone::ZoneControl;

/// Session with one Denon or Marantz receiver
///
/// The session owns the state cache, the transports and the dispatcher. Zone,
/// Audyssey and sound mode handles borrow the dispatcher and stay valid until
/// the session is closed.
pub struct AvrReceiver {
    host: String,
    cache: Arc<StateCache>,
    dispatcher: Arc<Dispatcher>,
    session: Option<Arc<TelnetSession>>,
}

impl AvrReceiver {
    /// Connect to a receiver at the given address
    ///
    /// Opens the HTTP client and, unless disabled in `config`, a Telnet
    /// session. A failed Telnet connect leaves the session running HTTP-only.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use denon_avr_control::{AvrReceiver, ReceiverConfig};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let receiver = AvrReceiver::connect("192.168.1.50", ReceiverConfig::default()).await?;
    ///     receiver.audyssey().dynamiceq_on().await?;
    ///     receiver.audyssey().set_containment_amount(3).await?;
    ///     Ok(())
    /// }
    /// ```
    pub async fn connect(host: impl Into<String>, config: ReceiverConfig) -> Result<Self> {
        let host = host.into();
        let cache = Arc::new(StateCache::new());
        let http = HttpClient::new(&host, config.http_port, config.request_timeout)?;

        let session = if config.use_telnet {
            match TelnetSession::connect(&host, config.telnet_port, cache.clone(), &config).await {
                Ok(session) => Some(Arc::new(session)),
                Err(e) => {
                    tracing::warn!("Telnet connect to {} failed, using HTTP only: {}", host, e);
                    None
                }
            }
        } else {
            None
        };

        let telnet = session
            .clone()
            .map(|s| s as Arc<dyn TelnetTransport>);
        let dispatcher = Dispatcher::new(
            cache.clone(),
            Arc::new(http),
            telnet,
            config.unknown_state,
        );

        tracing::info!("Connected to receiver at {}", host);
        Ok(Self {
            host,
            cache,
            dispatcher: Arc::new(dispatcher),
            session,
        })
    }

    /// Build a session on caller-provided transports
    ///
    /// Notifications have to be fed in with [`AvrReceiver::ingest`].
    pub fn with_transports(
        host: impl Into<String>,
        http: Arc<dyn HttpTransport>,
        telnet: Option<Arc<dyn TelnetTransport>>,
        config: ReceiverConfig,
    ) -> Self {
        let cache = Arc::new(StateCache::new());
        let dispatcher = Dispatcher::new(cache.clone(), http, telnet, config.unknown_state);
        Self {
            host: host.into(),
            cache,
            dispatcher: Arc::new(dispatcher),
            session: None,
        }
    }

    /// Host the session was opened against
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Whether commands currently go out over Telnet
    pub fn telnet_available(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.available())
    }

    /// Control handle for a zone
    pub fn zone(&self, zone: Zone) -> ZoneControl {
        ZoneControl::new(self.dispatcher.clone(), zone)
    }

    /// Handle for the main zone
    pub fn main_zone(&self) -> ZoneControl {
        self.zone(Zone::Main)
    }

    /// Handle for Audyssey and Dirac Live settings
    pub fn audyssey(&self) -> Audyssey {
        Audyssey::new(self.dispatcher.clone())
    }

    /// Handle for surround processing settings
    pub fn sound_mode(&self) -> SoundMode {
        SoundMode::new(self.dispatcher.clone())
    }

    /// Feed a `(zone, event, parameter)` notification into the cache
    ///
    /// Returns the notification when it changed the cache.
    pub fn ingest(&self, zone: Zone, event: &str, parameter: &str) -> Option<Notification> {
        self.cache.ingest(zone, event, parameter)
    }

    /// Snapshot of everything the session knows about the receiver
    pub fn state(&self) -> DeviceState {
        self.cache.snapshot()
    }

    /// Subscribe to state changes
    ///
    /// # Example
    ///
    /// ```no_run
    /// use denon_avr_control::{AvrReceiver, ReceiverConfig};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let receiver = AvrReceiver::connect("192.168.1.50", ReceiverConfig::default()).await?;
    ///     let mut rx = receiver.subscribe_state();
    ///
    ///     while let Ok(update) = rx.recv().await {
    ///         println!("{} {} = {}", update.zone, update.param, update.value);
    ///     }
    ///
    ///     Ok(())
    /// }
    /// ```
    pub fn subscribe_state(&self) -> StateReceiver {
        self.cache.subscribe()
    }

    /// Tear down the Telnet session
    ///
    /// Later commands fall back to HTTP.
    pub fn close(&self) {
        if let Some(session) = &self.session {
            session.shutdown();
        }
        tracing::info!("Closed session to {}", self.host);
    }
}

impl Drop for AvrReceiver {
    fn drop(&mut self) {
        if let Some(session) = &self.session {
            session.shutdown();
        }
    }
}
