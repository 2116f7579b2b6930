//! Static feature tables shared by all receivers of the AVR-X family.
//!
//! Wire tokens follow the Telnet protocol. The HTTP command endpoint accepts
//! the same command strings; AppCommand tokens are listed where they differ.

use crate::domain::{
    AppCommandTarget, Feature, FeatureKind, NumericDomain, RangePolicy, Requirement, Token,
    UnknownPolicy,
};
use crate::error::{AvrError, Result};
use crate::types::Param;

/// Keys whose notifications the receiver repeats across channels
pub const DUPLICATE_PRONE: &[Param] = &[
    Param::Power,
    Param::Mute,
    Param::DynamicEq,
    Param::MultiEq,
    Param::DynamicVolume,
    Param::RefLevelOffset,
    Param::DiracFilter,
];

const ON_OFF: FeatureKind = FeatureKind::Toggle {
    on: Token::new("On", "ON"),
    off: Token::new("Off", "OFF"),
};

const fn toggle(name: &'static str, param: Param, command: &'static str) -> Feature {
    Feature {
        name,
        param,
        kind: ON_OFF,
        command,
        zoned: false,
        http: true,
        appcommand: None,
        unknown: UnknownPolicy::Send,
        requires: None,
    }
}

const fn enumerated(
    name: &'static str,
    param: Param,
    tokens: &'static [Token],
    command: &'static str,
) -> Feature {
    Feature {
        name,
        param,
        kind: FeatureKind::Enumerated(tokens),
        command,
        zoned: false,
        http: true,
        appcommand: None,
        unknown: UnknownPolicy::Send,
        requires: None,
    }
}

const fn numeric(
    name: &'static str,
    param: Param,
    domain: NumericDomain,
    command: &'static str,
) -> Feature {
    Feature {
        name,
        param,
        kind: FeatureKind::Numeric(domain),
        command,
        zoned: false,
        http: true,
        appcommand: None,
        unknown: UnknownPolicy::Send,
        requires: None,
    }
}

// ========== System ==========

/// Zone power; the main zone uses `ZM`, other zones their own prefix
pub const POWER: Feature = Feature {
    zoned: true,
    ..toggle("power", Param::Power, "{power}{value}")
};

/// Zone mute
pub const MUTE: Feature = Feature {
    zoned: true,
    ..toggle("mute", Param::Mute, "{zone}MU{value}")
};

/// Sleep timer in minutes, or `OFF`
pub const SLEEP: Feature = Feature {
    zoned: true,
    ..numeric(
        "sleep",
        Param::Sleep,
        NumericDomain {
            min: 1,
            max: 120,
            step: 1,
            width: 3,
            out_of_range: RangePolicy::Reject,
            off: Some("OFF"),
        },
        "{zone}SLP{value}",
    )
};

pub const ECO_MODE_TOKENS: &[Token] = &[
    Token::new("On", "ON"),
    Token::new("Auto", "AUTO"),
    Token::new("Off", "OFF"),
];

/// Eco mode
pub const ECO_MODE: Feature = enumerated("eco_mode", Param::EcoMode, ECO_MODE_TOKENS, "ECO{value}");

/// Number of trigger outputs
pub const TRIGGER_COUNT: u8 = 3;

/// Trigger output `index`, numbered from 1
pub fn trigger(index: u8) -> Result<Feature> {
    if !(1..=TRIGGER_COUNT).contains(&index) {
        return Err(AvrError::domain(
            "trigger",
            index,
            format!("trigger must be between 1 and {}", TRIGGER_COUNT),
        ));
    }
    Ok(Feature {
        param: Param::Trigger(index),
        ..TRIGGER
    })
}

/// Audio delay in ms
pub const DELAY: Feature = numeric(
    "delay",
    Param::Delay,
    NumericDomain {
        min: 0,
        max: 500,
        step: 10,
        width: 3,
        out_of_range: RangePolicy::Clamp,
        off: None,
    },
    "PSDELAY {value}",
);

/// Audio/video delay time in ms
pub const DELAY_TIME: Feature = numeric(
    "delay_time",
    Param::DelayTime,
    NumericDomain {
        min: 0,
        max: 300,
        step: 1,
        width: 3,
        out_of_range: RangePolicy::Reject,
        off: None,
    },
    "PSDEL {value}",
);

/// Graphic EQ
pub const GRAPHIC_EQ: Feature = toggle("graphic_eq", Param::GraphicEq, "PSGEQ {value}");

/// Headphone EQ
pub const HEADPHONE_EQ: Feature = toggle("headphone_eq", Param::HeadphoneEq, "PSHEQ {value}");

pub const AUDIO_RESTORER_TOKENS: &[Token] = &[
    Token::new("Off", "OFF"),
    Token::new("Low", "LOW"),
    Token::new("Medium", "MED"),
    Token::new("High", "HI"),
];

/// Audio restorer level for compressed sources
pub const AUDIO_RESTORER: Feature = enumerated(
    "audio_restorer",
    Param::AudioRestorer,
    AUDIO_RESTORER_TOKENS,
    "PSRSTR {value}",
);

pub const ROOM_SIZE_TOKENS: &[Token] = &[
    Token::new("S", "S"),
    Token::new("MS", "MS"),
    Token::new("M", "M"),
    Token::new("ML", "ML"),
    Token::new("L", "L"),
];

/// Room size used by the surround decoders
pub const ROOM_SIZE: Feature =
    enumerated("room_size", Param::RoomSize, ROOM_SIZE_TOKENS, "PSRSZ {value}");

/// Tactile transducer output
pub const TACTILE_TRANSDUCER: Feature =
    toggle("tactile_transducer", Param::TactileTransducer, "SSTTR {value}");

pub const ILLUMINATION_TOKENS: &[Token] = &[
    Token::new("Auto", "AUTO"),
    Token::new("Bright", "BRI"),
    Token::new("Dim", "DIM"),
    Token::new("Dark", "DAR"),
    Token::new("Off", "OFF"),
];

/// Front panel illumination
pub const ILLUMINATION: Feature = enumerated(
    "illumination",
    Param::Illumination,
    ILLUMINATION_TOKENS,
    "SSILL {value}",
);

/// HDMI auto lip sync
pub const AUTO_LIP_SYNC: Feature = toggle("auto_lip_sync", Param::AutoLipSync, "SSHOSALS {value}");

// ========== Video ==========

pub const HDMI_OUTPUT_TOKENS: &[Token] = &[
    Token::new("Auto", "AUTO"),
    Token::new("HDMI1", "1"),
    Token::new("HDMI2", "2"),
];

/// HDMI monitor output
pub const HDMI_OUTPUT: Feature =
    enumerated("hdmi_output", Param::HdmiOutput, HDMI_OUTPUT_TOKENS, "VSMONI{value}");

pub const HDMI_AUDIO_DECODE_TOKENS: &[Token] =
    &[Token::new("AMP", "AMP"), Token::new("TV", "TV")];

/// Whether the amplifier or the TV decodes HDMI audio
pub const HDMI_AUDIO_DECODE: Feature = enumerated(
    "hdmi_audio_decode",
    Param::HdmiAudioDecode,
    HDMI_AUDIO_DECODE_TOKENS,
    "VSAUDIO {value}",
);

pub const VIDEO_PROCESSING_MODE_TOKENS: &[Token] = &[
    Token::new("Auto", "AUTO"),
    Token::new("Game", "GAME"),
    Token::new("Movie", "MOVI"),
    Token::new("Bypass", "BYP"),
];

/// Video processing mode
pub const VIDEO_PROCESSING_MODE: Feature = enumerated(
    "video_processing_mode",
    Param::VideoProcessingMode,
    VIDEO_PROCESSING_MODE_TOKENS,
    "VSVPM{value}",
);

// ========== Speakers and Bluetooth ==========

pub const SPEAKER_PRESET_TOKENS: &[Token] = &[Token::new("1", "1"), Token::new("2", "2")];

/// Speaker preset
pub const SPEAKER_PRESET: Feature = enumerated(
    "speaker_preset",
    Param::SpeakerPreset,
    SPEAKER_PRESET_TOKENS,
    "SPPR {value}",
);

/// Bluetooth transmitter
pub const BT_TRANSMITTER: Feature = toggle("bt_transmitter", Param::BtTransmitter, "BTTX {value}");

pub const BT_OUTPUT_MODE_TOKENS: &[Token] = &[
    Token::new("Bluetooth + Speakers", "SP"),
    Token::new("Bluetooth Only", "BT"),
];

/// Bluetooth output mode
pub const BT_OUTPUT_MODE: Feature = enumerated(
    "bt_output_mode",
    Param::BtOutputMode,
    BT_OUTPUT_MODE_TOKENS,
    "BTTX {value}",
);

// ========== Audyssey ==========

const SET_AUDYSSEY: &str = "SetAudyssey";

/// Audyssey DynamicEQ
pub const DYNAMIC_EQ: Feature = Feature {
    name: "dynamic_eq",
    param: Param::DynamicEq,
    kind: FeatureKind::Toggle {
        on: Token::with_appcommand("On", "ON", "1"),
        off: Token::with_appcommand("Off", "OFF", "0"),
    },
    command: "PSDYNEQ {value}",
    zoned: false,
    http: false,
    appcommand: Some(AppCommandTarget {
        name: SET_AUDYSSEY,
        param: "dynamiceq",
    }),
    unknown: UnknownPolicy::Send,
    requires: None,
};

pub const MULTI_EQ_TOKENS: &[Token] = &[
    Token::with_appcommand("Off", "OFF", "0"),
    Token::with_appcommand("Flat", "FLAT", "1"),
    Token::with_appcommand("L/R Bypass", "BYP.LR", "2"),
    Token::with_appcommand("Reference", "AUDYSSEY", "3"),
    Token::with_appcommand("Manual", "MANUAL", "4"),
];

/// Audyssey MultEQ curve
pub const MULTI_EQ: Feature = Feature {
    name: "multi_eq",
    param: Param::MultiEq,
    kind: FeatureKind::Enumerated(MULTI_EQ_TOKENS),
    command: "PSMULTEQ:{value}",
    zoned: false,
    http: false,
    appcommand: Some(AppCommandTarget {
        name: SET_AUDYSSEY,
        param: "multeq",
    }),
    unknown: UnknownPolicy::Send,
    requires: None,
};

pub const DYNAMIC_VOLUME_TOKENS: &[Token] = &[
    Token::with_appcommand("Off", "OFF", "0"),
    Token::with_appcommand("Light", "LIT", "1"),
    Token::with_appcommand("Medium", "MED", "2"),
    Token::with_appcommand("Heavy", "HEV", "3"),
];

/// Audyssey Dynamic Volume
pub const DYNAMIC_VOLUME: Feature = Feature {
    name: "dynamic_volume",
    param: Param::DynamicVolume,
    kind: FeatureKind::Enumerated(DYNAMIC_VOLUME_TOKENS),
    command: "PSDYNVOL {value}",
    zoned: false,
    http: false,
    appcommand: Some(AppCommandTarget {
        name: SET_AUDYSSEY,
        param: "dynamicvol",
    }),
    unknown: UnknownPolicy::Send,
    requires: None,
};

pub const REF_LEVEL_OFFSET_TOKENS: &[Token] = &[
    Token::with_appcommand("0dB", "0", "0"),
    Token::with_appcommand("+5dB", "5", "1"),
    Token::with_appcommand("+10dB", "10", "2"),
    Token::with_appcommand("+15dB", "15", "3"),
];

/// DynamicEQ reference level offset; needs DynamicEQ on
pub const REF_LEVEL_OFFSET: Feature = Feature {
    name: "reference_level_offset",
    param: Param::RefLevelOffset,
    kind: FeatureKind::Enumerated(REF_LEVEL_OFFSET_TOKENS),
    command: "PSREFLEV {value}",
    zoned: false,
    http: false,
    appcommand: Some(AppCommandTarget {
        name: SET_AUDYSSEY,
        param: "reflevoffset",
    }),
    unknown: UnknownPolicy::Send,
    requires: Some(Requirement {
        param: Param::DynamicEq,
        wire: "ON",
        message: "Reference level could only be set when DynamicEQ is active",
    }),
};

/// Audyssey Low Frequency Containment
pub const LFC: Feature = toggle("lfc", Param::Lfc, "PSLFC {value}");

/// LFC containment amount
pub const CONTAINMENT_AMOUNT: Feature = numeric(
    "containment_amount",
    Param::ContainmentAmount,
    NumericDomain {
        min: 1,
        max: 7,
        step: 1,
        width: 2,
        out_of_range: RangePolicy::Reject,
        off: None,
    },
    "PSCNTAMT {value}",
);

pub const DIRAC_FILTER_TOKENS: &[Token] = &[
    Token::new("Slot 1", "1"),
    Token::new("Slot 2", "2"),
    Token::new("Slot 3", "3"),
    Token::new("Off", "OFF"),
];

/// Dirac Live filter slot
pub const DIRAC_FILTER: Feature = enumerated(
    "dirac_filter",
    Param::DiracFilter,
    DIRAC_FILTER_TOKENS,
    "PSDIRAC {value}",
);

// ========== Sound mode ==========

/// DTS Neural:X upmixer
pub const NEURAL_X: Feature = toggle("neural_x", Param::NeuralX, "PSNEURAL {value}");

pub const IMAX_TOKENS: &[Token] = &[Token::new("Auto", "AUTO"), Token::new("Off", "OFF")];

/// IMAX Enhanced mode
pub const IMAX: Feature = enumerated("imax", Param::Imax, IMAX_TOKENS, "PSIMAX {value}");

/// Cinema EQ
pub const CINEMA_EQ: Feature = toggle("cinema_eq", Param::CinemaEq, "PSCINEMA EQ.{value}");

pub const IMAX_AUDIO_SETTINGS_TOKENS: &[Token] =
    &[Token::new("AUTO", "AUTO"), Token::new("MANUAL", "MANUAL")];

/// IMAX audio settings
pub const IMAX_AUDIO_SETTINGS: Feature = enumerated(
    "imax_audio_settings",
    Param::ImaxAudioSettings,
    IMAX_AUDIO_SETTINGS_TOKENS,
    "PSIMAXAUD {value}",
);

pub const IMAX_HPF_TOKENS: &[Token] = &[
    Token::new("40", "040"),
    Token::new("60", "060"),
    Token::new("80", "080"),
    Token::new("90", "090"),
    Token::new("100", "100"),
    Token::new("110", "110"),
    Token::new("120", "120"),
    Token::new("150", "150"),
    Token::new("180", "180"),
    Token::new("200", "200"),
    Token::new("250", "250"),
];

/// IMAX high-pass filter; labels are frequencies in Hz
pub const IMAX_HPF: Feature =
    enumerated("imax_hpf", Param::ImaxHpf, IMAX_HPF_TOKENS, "PSIMAXHPF {value}");

pub const IMAX_LPF_TOKENS: &[Token] = &[
    Token::new("80", "080"),
    Token::new("90", "090"),
    Token::new("100", "100"),
    Token::new("110", "110"),
    Token::new("120", "120"),
    Token::new("150", "150"),
    Token::new("180", "180"),
    Token::new("200", "200"),
    Token::new("250", "250"),
];

/// IMAX low-pass filter; labels are frequencies in Hz
pub const IMAX_LPF: Feature =
    enumerated("imax_lpf", Param::ImaxLpf, IMAX_LPF_TOKENS, "PSIMAXLPF {value}");

pub const IMAX_SUBWOOFER_MODE_TOKENS: &[Token] =
    &[Token::new("ON", "ON"), Token::new("OFF", "OFF")];

/// IMAX subwoofer mode
pub const IMAX_SUBWOOFER_MODE: Feature = enumerated(
    "imax_subwoofer_mode",
    Param::ImaxSubwooferMode,
    IMAX_SUBWOOFER_MODE_TOKENS,
    "PSIMAXSWM {value}",
);

pub const IMAX_SUBWOOFER_OUTPUT_TOKENS: &[Token] =
    &[Token::new("L+M", "L+M"), Token::new("LFE", "LFE")];

/// IMAX subwoofer output
pub const IMAX_SUBWOOFER_OUTPUT: Feature = enumerated(
    "imax_subwoofer_output",
    Param::ImaxSubwooferOutput,
    IMAX_SUBWOOFER_OUTPUT_TOKENS,
    "PSIMAXSWO {value}",
);

pub const DIALOG_ENHANCER_TOKENS: &[Token] = &[
    Token::new("Off", "OFF"),
    Token::new("Low", "LOW"),
    Token::new("Medium", "MED"),
    Token::new("High", "HIGH"),
];

/// Dialog enhancer level
pub const DIALOG_ENHANCER: Feature = enumerated(
    "dialog_enhancer",
    Param::DialogEnhancer,
    DIALOG_ENHANCER_TOKENS,
    "PSDEH {value}",
);

pub const AUROMATIC_3D_PRESET_TOKENS: &[Token] = &[
    Token::new("Small", "SMA"),
    Token::new("Medium", "MED"),
    Token::new("Large", "LAR"),
    Token::new("Speech", "SPE"),
    Token::new("Movie", "MOV"),
];

/// Auro-Matic 3D upmixer preset
pub const AUROMATIC_3D_PRESET: Feature = enumerated(
    "auromatic_3d_preset",
    Param::Auromatic3dPreset,
    AUROMATIC_3D_PRESET_TOKENS,
    "PSAUROPR {value}",
);

pub const MDAX_TOKENS: &[Token] = &[
    Token::new("Off", "OFF"),
    Token::new("Low", "LOW"),
    Token::new("Medium", "MID"),
    Token::new("High", "HI"),
];

/// Marantz M-DAX compressed audio enhancer
pub const MDAX: Feature = enumerated("mdax", Param::Mdax, MDAX_TOKENS, "PSMDAX {value}");

pub const DAC_FILTER_TOKENS: &[Token] =
    &[Token::new("Mode 1", "MODE1"), Token::new("Mode 2", "MODE2")];

/// Marantz DAC filter
pub const DAC_FILTER: Feature = enumerated(
    "dac_filter",
    Param::DacFilter,
    DAC_FILTER_TOKENS,
    "PSDACFIL {value}",
);

/// Toggle features with a fixed parameter key
pub const TOGGLES: &[&Feature] = &[
    &POWER,
    &MUTE,
    &GRAPHIC_EQ,
    &HEADPHONE_EQ,
    &TACTILE_TRANSDUCER,
    &AUTO_LIP_SYNC,
    &BT_TRANSMITTER,
    &DYNAMIC_EQ,
    &LFC,
    &NEURAL_X,
    &CINEMA_EQ,
];

/// Enumerated features
pub const ENUMERATED: &[&Feature] = &[
    &ECO_MODE,
    &AUDIO_RESTORER,
    &ROOM_SIZE,
    &ILLUMINATION,
    &HDMI_OUTPUT,
    &HDMI_AUDIO_DECODE,
    &VIDEO_PROCESSING_MODE,
    &SPEAKER_PRESET,
    &BT_OUTPUT_MODE,
    &MULTI_EQ,
    &DYNAMIC_VOLUME,
    &REF_LEVEL_OFFSET,
    &DIRAC_FILTER,
    &IMAX,
    &IMAX_AUDIO_SETTINGS,
    &IMAX_HPF,
    &IMAX_LPF,
    &IMAX_SUBWOOFER_MODE,
    &IMAX_SUBWOOFER_OUTPUT,
    &DIALOG_ENHANCER,
    &AUROMATIC_3D_PRESET,
    &MDAX,
    &DAC_FILTER,
];

/// Numeric features with single-step up/down commands
pub const STEPPED: &[&Feature] = &[&CONTAINMENT_AMOUNT, &DELAY, &DELAY_TIME];

/// Look up a feature by its name
pub fn by_name(name: &str) -> Option<&'static Feature> {
    if SLEEP.name == name {
        return Some(&SLEEP);
    }
    if name == "trigger" {
        return Some(&TRIGGER);
    }
    TOGGLES
        .iter()
        .chain(ENUMERATED)
        .chain(STEPPED)
        .find(|f| f.name == name)
        .copied()
}

// Template for policy lookups; real trigger features come from `trigger()`.
const TRIGGER: Feature = toggle("trigger", Param::Trigger(1), "TR{index} {value}");
