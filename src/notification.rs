//! Status notification parsing.
//!
//! Receivers report state as ASCII lines such as `PSDYNEQ ON`, `Z2MUOFF`,
//! `VSMONI1` or `TR1 ON`. A line splits into a zone-qualified `(zone, event, parameter)`
//! triple, which is then parsed by the grammar of its event prefix into a
//! [`Notification`] before anything touches the state cache.

use crate::types::{Param, Zone};

/// Event prefix of a status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prefix {
    /// General power, `PWON` / `PWSTANDBY`
    Power,
    /// Zone power, `ZMON` / `Z2OFF`
    ZonePower,
    Mute,
    Sleep,
    Eco,
    /// Trigger outputs, `TR1 ON`
    Trigger,
    /// Bluetooth transmitter, `BTTX ON` / `BTTX SP`
    Bluetooth,
    /// Surround parameters, `PSDYNEQ ON` / `PSMULTEQ:AUDYSSEY`
    Surround,
    /// System settings, `SSTTR ON`
    System,
    /// Video settings, `VSMONI1` / `VSAUDIO AMP`
    Video,
    /// Speaker preset, `SPPR 1`
    SpeakerPreset,
}

impl Prefix {
    /// Prefixes in the order they are tried against a raw line
    const LINE_ORDER: [Prefix; 11] = [
        Prefix::Sleep,
        Prefix::Eco,
        Prefix::Power,
        Prefix::ZonePower,
        Prefix::Mute,
        Prefix::Trigger,
        Prefix::Bluetooth,
        Prefix::Surround,
        Prefix::System,
        Prefix::Video,
        Prefix::SpeakerPreset,
    ];

    /// Prefix that `event` starts with, longest match first
    pub fn parse(event: &str) -> Option<Self> {
        match event {
            "PW" => Some(Prefix::Power),
            "ZM" => Some(Prefix::ZonePower),
            "MU" => Some(Prefix::Mute),
            "SLP" => Some(Prefix::Sleep),
            "ECO" => Some(Prefix::Eco),
            "TR" | "TRG" => Some(Prefix::Trigger),
            "BT" => Some(Prefix::Bluetooth),
            "PS" => Some(Prefix::Surround),
            "SS" => Some(Prefix::System),
            "VS" => Some(Prefix::Video),
            "SP" => Some(Prefix::SpeakerPreset),
            _ => None,
        }
    }

    /// Prefix as it appears on the wire
    pub fn as_str(self) -> &'static str {
        match self {
            Prefix::Power => "PW",
            Prefix::ZonePower => "ZM",
            Prefix::Mute => "MU",
            Prefix::Sleep => "SLP",
            Prefix::Eco => "ECO",
            Prefix::Trigger => "TR",
            Prefix::Bluetooth => "BT",
            Prefix::Surround => "PS",
            Prefix::System => "SS",
            Prefix::Video => "VS",
            Prefix::SpeakerPreset => "SP",
        }
    }
}

/// Sub-parameters carried by `PS` lines
const SURROUND_TAGS: &[(&str, Param)] = &[
    ("DYNEQ", Param::DynamicEq),
    ("MULTEQ", Param::MultiEq),
    ("DYNVOL", Param::DynamicVolume),
    ("REFLEV", Param::RefLevelOffset),
    ("LFC", Param::Lfc),
    ("CNTAMT", Param::ContainmentAmount),
    ("DIRAC", Param::DiracFilter),
    ("NEURAL", Param::NeuralX),
    ("IMAX", Param::Imax),
    ("IMAXAUD", Param::ImaxAudioSettings),
    ("IMAXHPF", Param::ImaxHpf),
    ("IMAXLPF", Param::ImaxLpf),
    ("IMAXSWM", Param::ImaxSubwooferMode),
    ("IMAXSWO", Param::ImaxSubwooferOutput),
    ("CINEMA EQ", Param::CinemaEq),
    ("DEH", Param::DialogEnhancer),
    ("AUROPR", Param::Auromatic3dPreset),
    ("MDAX", Param::Mdax),
    ("DACFIL", Param::DacFilter),
    ("DELAY", Param::Delay),
    ("DEL", Param::DelayTime),
    ("GEQ", Param::GraphicEq),
    ("HEQ", Param::HeadphoneEq),
    ("RSTR", Param::AudioRestorer),
    ("RSZ", Param::RoomSize),
];

/// Sub-parameters carried by `SS` lines
const SYSTEM_TAGS: &[(&str, Param)] = &[
    ("TTR", Param::TactileTransducer),
    ("ILL", Param::Illumination),
    ("HOSALS", Param::AutoLipSync),
    ("SPST", Param::SpeakerPreset),
];

/// A status line split into its zone, event prefix and parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    pub zone: Zone,
    /// Event prefix, e.g. `PS` or `MU`
    pub event: String,
    /// Rest of the line after the prefix
    pub parameter: String,
}

/// A parsed status notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub zone: Zone,
    /// Parameter the value belongs to
    pub param: Param,
    /// Wire-native value, e.g. `ON`, `030`, `AUDYSSEY`
    pub value: String,
}

impl Notification {
    /// Notification carrying a wire value
    pub fn new(zone: Zone, param: Param, value: impl Into<String>) -> Self {
        Self {
            zone,
            param,
            value: value.into(),
        }
    }

    /// Parse a `(zone, event, parameter)` triple
    ///
    /// Returns `None` for prefixes and parameters this crate does not track.
    pub fn parse(zone: Zone, event: &str, parameter: &str) -> Option<Self> {
        let prefix = Prefix::parse(event)?;
        let parameter = parameter.trim();

        let (param, value) = match prefix {
            Prefix::Power | Prefix::ZonePower => (Param::Power, normalize_power(parameter)),
            Prefix::Mute => (Param::Mute, parameter),
            Prefix::Sleep => (Param::Sleep, parameter),
            Prefix::Eco => (Param::EcoMode, parameter),
            Prefix::Trigger => {
                let (index, state) = parameter.split_once(' ')?;
                let index: u8 = index.trim().parse().ok()?;
                (Param::Trigger(index), state.trim())
            }
            Prefix::Bluetooth => {
                let value = tagged(parameter, "TX")?;
                if value == "ON" || value == "OFF" {
                    (Param::BtTransmitter, value)
                } else {
                    (Param::BtOutputMode, value)
                }
            }
            Prefix::Surround => lookup(SURROUND_TAGS, parameter)?,
            Prefix::System => lookup(SYSTEM_TAGS, parameter)?,
            Prefix::Video => video(parameter)?,
            Prefix::SpeakerPreset => (Param::SpeakerPreset, tagged(parameter, "PR")?),
        };

        if value.is_empty() {
            return None;
        }
        Some(Self::new(zone, param, value))
    }

    /// Split and parse a raw status line
    pub fn parse_line(line: &str) -> Option<Self> {
        let raw = split_line(line)?;
        Self::parse(raw.zone, &raw.event, &raw.parameter)
    }
}

/// Split a raw Telnet status line into its zone, event and parameter
pub fn split_line(line: &str) -> Option<RawEvent> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let (zone, rest) = if let Some(rest) = line.strip_prefix("Z2") {
        (Zone::Zone2, rest)
    } else if let Some(rest) = line.strip_prefix("Z3") {
        (Zone::Zone3, rest)
    } else {
        (Zone::Main, line)
    };

    // Bare `Z2ON` reports zone power
    if zone != Zone::Main && (rest == "ON" || rest == "OFF") {
        return Some(RawEvent {
            zone,
            event: Prefix::ZonePower.as_str().to_string(),
            parameter: rest.to_string(),
        });
    }

    Prefix::LINE_ORDER.iter().find_map(|prefix| {
        rest.strip_prefix(prefix.as_str()).map(|parameter| RawEvent {
            zone,
            event: prefix.as_str().to_string(),
            parameter: parameter.to_string(),
        })
    })
}

fn normalize_power(value: &str) -> &str {
    match value {
        "STANDBY" => "OFF",
        other => other,
    }
}

/// Value following `tag` and one of the separators ` `, `:` or `.`
fn tagged<'a>(parameter: &'a str, tag: &str) -> Option<&'a str> {
    let rest = parameter.strip_prefix(tag)?;
    let mut chars = rest.chars();
    match chars.next() {
        Some(' ' | ':' | '.') => Some(chars.as_str().trim()),
        _ => None,
    }
}

/// `VS` lines mix `MONI1` and `VPMAUTO`, which carry no separator, with `AUDIO AMP`
fn video(parameter: &str) -> Option<(Param, &str)> {
    if let Some(value) = tagged(parameter, "AUDIO") {
        return Some((Param::HdmiAudioDecode, value));
    }
    if let Some(value) = parameter.strip_prefix("MONI") {
        return Some((Param::HdmiOutput, value.trim()));
    }
    parameter
        .strip_prefix("VPM")
        .map(|value| (Param::VideoProcessingMode, value.trim()))
}

fn lookup<'a>(tags: &[(&str, Param)], parameter: &'a str) -> Option<(Param, &'a str)> {
    tags.iter()
        .find_map(|(tag, param)| tagged(parameter, tag).map(|value| (*param, value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(event: &str, parameter: &str) -> Option<(Param, String)> {
        Notification::parse(Zone::Main, event, parameter).map(|n| (n.param, n.value))
    }

    #[test]
    fn test_space_and_colon_grammars() {
        assert_eq!(parsed("PS", "DYNEQ ON"), Some((Param::DynamicEq, "ON".into())));
        assert_eq!(parsed("PS", "MULTEQ:AUDYSSEY"), Some((Param::MultiEq, "AUDYSSEY".into())));
        assert_eq!(parsed("PS", "DIRAC:1"), Some((Param::DiracFilter, "1".into())));
        assert_eq!(parsed("PS", "DIRAC 1"), Some((Param::DiracFilter, "1".into())));
        assert_eq!(parsed("PS", "CINEMA EQ.ON"), Some((Param::CinemaEq, "ON".into())));
        assert_eq!(parsed("PS", "NEURAL:OFF"), Some((Param::NeuralX, "OFF".into())));
    }

    #[test]
    fn test_tags_sharing_a_stem() {
        assert_eq!(parsed("PS", "DELAY 100"), Some((Param::Delay, "100".into())));
        assert_eq!(parsed("PS", "DEL 300"), Some((Param::DelayTime, "300".into())));
        assert_eq!(parsed("PS", "IMAX AUTO"), Some((Param::Imax, "AUTO".into())));
        assert_eq!(
            parsed("PS", "IMAXAUD MANUAL"),
            Some((Param::ImaxAudioSettings, "MANUAL".into()))
        );
        assert_eq!(parsed("PS", "IMAXSWO L+M"), Some((Param::ImaxSubwooferOutput, "L+M".into())));
    }

    #[test]
    fn test_imax_filter_and_preset_tags() {
        assert_eq!(parsed("PS", "IMAXHPF 080"), Some((Param::ImaxHpf, "080".into())));
        assert_eq!(parsed("PS", "IMAXLPF 120"), Some((Param::ImaxLpf, "120".into())));
        assert_eq!(parsed("PS", "IMAXSWM OFF"), Some((Param::ImaxSubwooferMode, "OFF".into())));
        assert_eq!(parsed("PS", "AUROPR SPE"), Some((Param::Auromatic3dPreset, "SPE".into())));
        assert_eq!(parsed("PS", "DACFIL MODE2"), Some((Param::DacFilter, "MODE2".into())));
        assert_eq!(parsed("PS", "RSZ ML"), Some((Param::RoomSize, "ML".into())));
    }

    #[test]
    fn test_video_lines_without_separator() {
        assert_eq!(parsed("VS", "MONI1"), Some((Param::HdmiOutput, "1".into())));
        assert_eq!(parsed("VS", "MONIAUTO"), Some((Param::HdmiOutput, "AUTO".into())));
        assert_eq!(parsed("VS", "VPMMOVI"), Some((Param::VideoProcessingMode, "MOVI".into())));
        assert_eq!(parsed("VS", "AUDIO TV"), Some((Param::HdmiAudioDecode, "TV".into())));
        assert_eq!(parsed("VS", "ASPFUL"), None);
        assert_eq!(parsed("VS", "MONI"), None);
    }

    #[test]
    fn test_speaker_preset_from_both_prefixes() {
        assert_eq!(parsed("SP", "PR 2"), Some((Param::SpeakerPreset, "2".into())));
        assert_eq!(parsed("SS", "SPST 1"), Some((Param::SpeakerPreset, "1".into())));
        assert_eq!(
            Notification::parse_line("SPPR 1"),
            Some(Notification::new(Zone::Main, Param::SpeakerPreset, "1"))
        );
    }

    #[test]
    fn test_compound_trigger() {
        assert_eq!(parsed("TR", "1 ON"), Some((Param::Trigger(1), "ON".into())));
        assert_eq!(parsed("TRG", "3 OFF"), Some((Param::Trigger(3), "OFF".into())));
        assert_eq!(parsed("TR", "ON"), None);
        assert_eq!(parsed("TR", "X ON"), None);
    }

    #[test]
    fn test_bluetooth_splits_transmitter_and_output_mode() {
        assert_eq!(parsed("BT", "TX ON"), Some((Param::BtTransmitter, "ON".into())));
        assert_eq!(parsed("BT", "TX SP"), Some((Param::BtOutputMode, "SP".into())));
    }

    #[test]
    fn test_power_standby_normalizes_to_off() {
        assert_eq!(parsed("PW", "STANDBY"), Some((Param::Power, "OFF".into())));
        assert_eq!(parsed("ZM", "ON"), Some((Param::Power, "ON".into())));
    }

    #[test]
    fn test_unknown_input() {
        assert_eq!(parsed("MV", "50"), None);
        assert_eq!(parsed("PS", "BASS 50"), None);
        assert_eq!(parsed("PS", "DYNEQ"), None);
        assert_eq!(parsed("SLP", ""), None);
    }

    #[test]
    fn test_split_line() {
        let raw = split_line("PSDYNEQ ON\r").unwrap();
        assert_eq!(raw.zone, Zone::Main);
        assert_eq!(raw.event, "PS");
        assert_eq!(raw.parameter, "DYNEQ ON");

        let raw = split_line("Z2SLP030").unwrap();
        assert_eq!(raw.zone, Zone::Zone2);
        assert_eq!(raw.event, "SLP");
        assert_eq!(raw.parameter, "030");

        let raw = split_line("Z3OFF").unwrap();
        assert_eq!(raw.zone, Zone::Zone3);
        assert_eq!(raw.event, "ZM");

        assert!(split_line("MVMAX 98").is_none());
        assert!(split_line("   ").is_none());
    }

    #[test]
    fn test_parse_line() {
        assert_eq!(
            Notification::parse_line("Z2MUON"),
            Some(Notification::new(Zone::Zone2, Param::Mute, "ON"))
        );
        assert_eq!(
            Notification::parse_line("SSTTR OFF"),
            Some(Notification::new(Zone::Main, Param::TactileTransducer, "OFF"))
        );
        assert_eq!(
            Notification::parse_line("PWSTANDBY"),
            Some(Notification::new(Zone::Main, Param::Power, "OFF"))
        );
    }
}
