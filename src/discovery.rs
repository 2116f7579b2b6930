use async_trait::async_trait;
use futures_util::future::join_all;
use mdns_sd::{ServiceDaemon, ServiceEvent};
use std::net::IpAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;

use crate::config::DiscoveryConfig;
use crate::error::{AvrError, Result};
use crate::http::HttpClient;
use crate::services::ServiceStore;
use crate::types::{DiscoveredReceiver, ServiceInfo, ServiceRecord};
use crate::xml::element_text;

const DEVICE_INFO_PATH: &str = "/goform/Deviceinfo.xml";

/// Confirms that a discovered service is a controllable receiver
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, record: &ServiceRecord, addr: IpAddr) -> Result<DiscoveredReceiver>;
}

/// Probes a candidate by reading its device info over HTTP
pub struct HttpProber {
    ports: Vec<u16>,
    timeout: Duration,
}

impl HttpProber {
    /// HTTP prober using the configured timeout
    pub fn new(config: &DiscoveryConfig) -> Self {
        Self {
            ports: config.probe_ports.clone(),
            timeout: config.probe_timeout,
        }
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, record: &ServiceRecord, addr: IpAddr) -> Result<DiscoveredReceiver> {
        let host = addr.to_string();
        let mut last_error = None;

        for &port in &self.ports {
            let client = HttpClient::new(&host, port, self.timeout)?;
            let body = match client.get(DEVICE_INFO_PATH).await {
                Ok(body) => body,
                Err(e) => {
                    tracing::debug!("No device info at {}:{}: {}", host, port, e);
                    last_error = Some(e.to_string());
                    continue;
                }
            };

            let model_name = element_text(&body, "ModelName")?
                .filter(|name| !name.is_empty())
                .ok_or_else(|| AvrError::Probe {
                    host: host.clone(),
                    reason: "device info has no ModelName".to_string(),
                })?;
            let manufacturer = match element_text(&body, "BrandCode")?.as_deref() {
                Some("1") => "Marantz",
                _ => "Denon",
            };

            return Ok(DiscoveredReceiver {
                name: record.name.clone(),
                host: addr,
                port,
                model_name,
                manufacturer: manufacturer.to_string(),
            });
        }

        Err(AvrError::Probe {
            host,
            reason: last_error.unwrap_or_else(|| "no probe ports configured".to_string()),
        })
    }
}

/// Discovery engine for receivers on the local network
///
/// Browses mDNS for the configured service type, keeps the announcements in a
/// [`ServiceStore`] and probes every candidate to confirm it is a receiver.
///
/// # Example
///
/// ```no_run
/// use denon_avr_control::Discovery;
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let discovery = Discovery::new();
///
///     match discovery.discover(Duration::from_secs(5)).await? {
///         Some(receivers) => {
///             for receiver in receivers {
///                 println!(
///                     "Found {} {} at {}",
///                     receiver.manufacturer, receiver.model_name, receiver.host
///                 );
///             }
///         }
///         None => println!("No receivers found"),
///     }
///     Ok(())
/// }
/// ```
pub struct Discovery {
    config: DiscoveryConfig,
    store: Arc<ServiceStore>,
    prober: Arc<dyn Prober>,
}

impl Default for Discovery {
    fn default() -> Self {
        Self::new()
    }
}

impl Discovery {
    /// Create a discovery engine with default settings
    pub fn new() -> Self {
        Self::with_config(DiscoveryConfig::default())
    }

    /// Engine with custom settings and the HTTP prober
    pub fn with_config(config: DiscoveryConfig) -> Self {
        let prober = Arc::new(HttpProber::new(&config));
        Self {
            config,
            store: Arc::new(ServiceStore::new()),
            prober,
        }
    }

    /// Replace the prober used to bootstrap candidates
    pub fn with_prober(mut self, prober: Arc<dyn Prober>) -> Self {
        self.prober = prober;
        self
    }

    /// Service records seen by the last scan
    pub fn store(&self) -> &Arc<ServiceStore> {
        &self.store
    }

    /// Browse for `browse_timeout`, then probe every candidate
    ///
    /// Returns `Ok(None)` when no candidate could be confirmed. Probe failures
    /// only drop the failing candidate.
    pub async fn discover(
        &self,
        browse_timeout: Duration,
    ) -> Result<Option<Vec<DiscoveredReceiver>>> {
        self.browse(browse_timeout).await?;
        Ok(self.bootstrap().await)
    }

    /// Confirm every record currently in the store
    async fn bootstrap(&self) -> Option<Vec<DiscoveredReceiver>> {
        let records = self.store.snapshot();
        self.probe_records(&records).await
    }

    async fn browse(&self, browse_timeout: Duration) -> Result<()> {
        let service_type = self.config.service_type.as_str();
        tracing::info!(
            "Browsing for {} ({}ms)",
            service_type,
            browse_timeout.as_millis()
        );

        self.store.clear();
        let daemon = ServiceDaemon::new().map_err(|e| AvrError::Mdns(e.to_string()))?;
        let receiver = daemon
            .browse(service_type)
            .map_err(|e| AvrError::Mdns(e.to_string()))?;

        let start = Instant::now();
        while start.elapsed() < browse_timeout {
            let remaining = browse_timeout.saturating_sub(start.elapsed());
            match timeout(remaining, receiver.recv_async()).await {
                Ok(Ok(event)) => self.handle_event(event),
                Ok(Err(e)) => {
                    tracing::debug!("mDNS browse channel closed: {}", e);
                    break;
                }
                Err(_) => break,
            }
        }

        if let Err(e) = daemon.stop_browse(service_type) {
            tracing::warn!("Failed to stop mDNS browse: {}", e);
        }
        if let Err(e) = daemon.shutdown() {
            tracing::warn!("Failed to shut down mDNS daemon: {}", e);
        }

        tracing::info!("Browse finished with {} service(s)", self.store.len());
        Ok(())
    }

    fn handle_event(&self, event: ServiceEvent) {
        match event {
            ServiceEvent::ServiceFound(service_type, fullname) => {
                self.store.add(&fullname, &service_type, None);
            }
            ServiceEvent::ServiceResolved(info) => {
                tracing::debug!("Resolved {}", info.get_fullname());
                self.store.update(
                    info.get_fullname(),
                    info.get_type(),
                    Some(resolved_info(&info)),
                );
            }
            ServiceEvent::ServiceRemoved(service_type, fullname) => {
                self.store.remove(&fullname, &service_type);
            }
            _ => {}
        }
    }

    /// Probe the given records concurrently
    pub async fn probe_records(
        &self,
        records: &[ServiceRecord],
    ) -> Option<Vec<DiscoveredReceiver>> {
        let candidates: Vec<(&ServiceRecord, IpAddr)> = records
            .iter()
            .filter_map(|record| match record.address() {
                Some(addr) => Some((record, addr)),
                None => {
                    tracing::info!("Skipping {}: no usable address", record.name);
                    None
                }
            })
            .collect();

        let probes = candidates
            .iter()
            .map(|(record, addr)| self.prober.probe(record, *addr));
        let results = join_all(probes).await;

        let mut found = Vec::new();
        for ((record, addr), result) in candidates.iter().zip(results) {
            match result {
                Ok(receiver) => {
                    tracing::info!(
                        "Found {} {} at {}",
                        receiver.manufacturer,
                        receiver.model_name,
                        addr
                    );
                    found.push(receiver);
                }
                Err(e) => {
                    tracing::warn!("Probe of {} at {} failed: {}", record.name, addr, e);
                }
            }
        }

        if found.is_empty() {
            None
        } else {
            Some(found)
        }
    }
}

fn resolved_info(info: &mdns_sd::ServiceInfo) -> ServiceInfo {
    let mut addresses: Vec<IpAddr> = info.get_addresses().iter().copied().collect();
    addresses.sort();
    ServiceInfo {
        hostname: info.get_hostname().to_string(),
        port: info.get_port(),
        addresses,
        properties: info
            .get_properties()
            .iter()
            .map(|p| (p.key().to_string(), p.val_str().to_string()))
            .collect(),
    }
}
