use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use crate::config::ReceiverConfig;
use crate::error::{AvrError, Result};

/// Independently controllable output region of a receiver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Zone {
    /// Main zone, addressed without a command prefix
    Main,
    /// Second zone, `Z2` commands
    Zone2,
    /// Third zone, `Z3` commands
    Zone3,
}

impl Zone {
    /// All zones a receiver may expose
    pub const ALL: [Zone; 3] = [Zone::Main, Zone::Zone2, Zone::Zone3];

    /// Prefix of the zone power commands (`ZMON`, `Z2ON`, ...)
    pub fn power_prefix(self) -> &'static str {
        match self {
            Zone::Main => "ZM",
            Zone::Zone2 => "Z2",
            Zone::Zone3 => "Z3",
        }
    }

    /// Prefix prepended to zone-qualified commands (`MUON` vs `Z2MUON`)
    pub fn command_prefix(self) -> &'static str {
        match self {
            Zone::Main => "",
            Zone::Zone2 => "Z2",
            Zone::Zone3 => "Z3",
        }
    }

    /// Display name, as accepted by [`FromStr`]
    pub fn as_str(self) -> &'static str {
        match self {
            Zone::Main => "Main",
            Zone::Zone2 => "Zone2",
            Zone::Zone3 => "Zone3",
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Zone {
    type Err = AvrError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Main" | "ZM" => Ok(Zone::Main),
            "Zone2" | "Z2" => Ok(Zone::Zone2),
            "Zone3" | "Z3" => Ok(Zone::Zone3),
            other => Err(AvrError::InvalidResponse(format!("Unknown zone {}", other))),
        }
    }
}

/// Parameter key of a cached receiver value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Param {
    /// Zone power, `ON` / `OFF`
    Power,
    /// Zone mute, `ON` / `OFF`
    Mute,
    /// Sleep timer minutes, or `OFF`
    Sleep,
    /// Eco mode, `ON` / `AUTO` / `OFF`
    EcoMode,
    /// Trigger output, numbered from 1
    Trigger(u8),
    /// Audyssey DynamicEQ
    DynamicEq,
    /// Audyssey MultEQ curve
    MultiEq,
    /// Audyssey Dynamic Volume
    DynamicVolume,
    /// Audyssey reference level offset in dB
    RefLevelOffset,
    /// Audyssey Low Frequency Containment
    Lfc,
    /// LFC containment amount, 1-7
    ContainmentAmount,
    /// Dirac Live filter slot
    DiracFilter,
    /// DTS Neural:X upmixer
    NeuralX,
    /// IMAX Enhanced mode
    Imax,
    /// IMAX audio settings, automatic or manual
    ImaxAudioSettings,
    /// IMAX high-pass filter frequency in Hz
    ImaxHpf,
    /// IMAX low-pass filter frequency in Hz
    ImaxLpf,
    /// IMAX subwoofer mode
    ImaxSubwooferMode,
    /// IMAX subwoofer output routing
    ImaxSubwooferOutput,
    /// Cinema EQ
    CinemaEq,
    /// Dialog enhancer level
    DialogEnhancer,
    /// Auro-Matic 3D upmixer preset
    Auromatic3dPreset,
    /// M-DAX compressed audio restoration (Marantz)
    Mdax,
    /// DAC filter (Marantz)
    DacFilter,
    /// Audio delay in ms
    Delay,
    /// Audio/video delay time in ms
    DelayTime,
    /// Graphic EQ
    GraphicEq,
    /// Headphone EQ
    HeadphoneEq,
    /// Audio restorer level
    AudioRestorer,
    /// Room size used by the surround decoders
    RoomSize,
    /// Tactile transducer output
    TactileTransducer,
    /// Front panel illumination
    Illumination,
    /// HDMI auto lip sync
    AutoLipSync,
    /// HDMI monitor output
    HdmiOutput,
    /// Whether HDMI audio is decoded by the receiver or the TV
    HdmiAudioDecode,
    /// Video processing mode
    VideoProcessingMode,
    /// Active speaker preset, 1 or 2
    SpeakerPreset,
    /// Bluetooth transmitter
    BtTransmitter,
    /// Bluetooth transmitter output mode
    BtOutputMode,
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Param::Trigger(n) => write!(f, "Trigger{}", n),
            other => write!(f, "{:?}", other),
        }
    }
}

/// Transport channel a command was sent on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Telnet session
    Telnet,
    /// Simple HTTP command endpoint
    HttpCommand,
    /// Structured HTTP AppCommand endpoint
    AppCommand,
}

/// Outcome of a dispatcher call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Cached state already matched the target; nothing was sent
    Unchanged,
    /// Exactly one command was sent on the given channel
    Sent(Channel),
}

impl Dispatch {
    /// Whether a command went out on the wire
    pub fn was_sent(&self) -> bool {
        matches!(self, Dispatch::Sent(_))
    }
}

/// Resolved information of an mDNS service announcement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInfo {
    /// Host name the service resolved to, e.g. `living.local.`
    pub hostname: String,
    /// Service port announced over mDNS
    pub port: u16,
    /// Resolved addresses, sorted
    pub addresses: Vec<IpAddr>,

    /// TXT record properties of the announcement
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

impl ServiceInfo {
    /// First IPv4 address, falling back to the first IPv6 address
    pub fn preferred_address(&self) -> Option<IpAddr> {
        self.addresses
            .iter()
            .find(|addr| addr.is_ipv4())
            .or_else(|| self.addresses.iter().find(|addr| addr.is_ipv6()))
            .copied()
    }
}

/// A discovered network service, unique by (name, service type)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRecord {
    /// Full service instance name
    pub name: String,
    /// Service type the record was browsed under
    pub service_type: String,

    /// Resolved info, absent until the service has been resolved
    pub info: Option<ServiceInfo>,
}

impl ServiceRecord {
    /// Unresolved record for a service instance
    pub fn new(
        name: impl Into<String>,
        service_type: impl Into<String>,
        info: Option<ServiceInfo>,
    ) -> Self {
        Self {
            name: name.into(),
            service_type: service_type.into(),
            info,
        }
    }

    /// Whether this record has the given identity
    pub fn is(&self, name: &str, service_type: &str) -> bool {
        self.name == name && self.service_type == service_type
    }

    /// Address to probe, if the record resolved to any
    pub fn address(&self) -> Option<IpAddr> {
        self.info.as_ref().and_then(ServiceInfo::preferred_address)
    }
}

/// Receiver confirmed by the discovery probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredReceiver {
    /// mDNS service instance name
    pub name: String,
    /// Address the device answered on
    pub host: IpAddr,

    /// HTTP port the receiver answered on
    pub port: u16,
    /// `ModelName` reported by the device info document
    pub model_name: String,
    /// `Denon` or `Marantz`
    pub manufacturer: String,
}

impl DiscoveredReceiver {
    /// Open a device session to this receiver
    ///
    /// # Example
    ///
    /// ```no_run
    /// use denon_avr_control::{Discovery, ReceiverConfig};
    /// use std::time::Duration;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let discovery = Discovery::new();
    ///     if let Some(found) = discovery.discover(Duration::from_secs(5)).await? {
    ///         let receiver = found[0].connect(ReceiverConfig::default()).await?;
    ///         receiver.main_zone().power_on().await?;
    ///     }
    ///     Ok(())
    /// }
    /// ```
    pub async fn connect(&self, config: ReceiverConfig) -> Result<crate::receiver::AvrReceiver> {
        let config = ReceiverConfig {
            http_port: self.port,
            ..config
        };
        crate::receiver::AvrReceiver::connect(self.host.to_string(), config).await
    }
}
