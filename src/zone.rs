use std::sync::Arc;

use crate::catalog;
use crate::dispatch::Dispatcher;
use crate::domain::Step;
use crate::error::{AvrError, Result};
use crate::types::{Dispatch, Zone};

/// State of the sleep timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SleepTimer {
    /// Timer disabled
    Off,
    /// Minutes until the zone switches off
    Minutes(u32),
}

/// Interface for controlling one zone of a receiver
///
/// Setters send nothing when the cached state already matches the request and
/// report what they did through [`Dispatch`]. Getters read the cache and return
/// `None` until the receiver has reported the value.
///
/// Power, mute and sleep belong to the zone. Every other setting is
/// receiver-wide: any zone handle reads and changes the same value.
#[derive(Clone)]
pub struct ZoneControl {
    dispatcher: Arc<Dispatcher>,
    zone: Zone,
}

impl ZoneControl {
    pub(crate) fn new(dispatcher: Arc<Dispatcher>, zone: Zone) -> Self {
        Self { dispatcher, zone }
    }

    /// Zone this handle controls
    pub fn zone(&self) -> Zone {
        self.zone
    }

    // ========== Power and mute ==========

    /// Whether the zone is powered on
    pub fn power(&self) -> Option<bool> {
        self.dispatcher.toggle_value(self.zone, &catalog::POWER)
    }

    /// Power the zone on
    pub async fn power_on(&self) -> Result<Dispatch> {
        self.dispatcher.set_toggle(self.zone, &catalog::POWER, true).await
    }

    /// Put the zone in standby
    pub async fn power_off(&self) -> Result<Dispatch> {
        self.dispatcher.set_toggle(self.zone, &catalog::POWER, false).await
    }

    /// Whether the zone is muted
    pub fn muted(&self) -> Option<bool> {
        self.dispatcher.toggle_value(self.zone, &catalog::MUTE)
    }

    /// Mute the zone
    pub async fn mute_on(&self) -> Result<Dispatch> {
        self.dispatcher.set_toggle(self.zone, &catalog::MUTE, true).await
    }

    /// Unmute the zone
    pub async fn mute_off(&self) -> Result<Dispatch> {
        self.dispatcher.set_toggle(self.zone, &catalog::MUTE, false).await
    }

    // ========== Sleep timer ==========

    /// Sleep timer of the zone
    pub fn sleep(&self) -> Option<SleepTimer> {
        let zone = catalog::SLEEP.scope(self.zone);
        let current = self.dispatcher.cache().get(zone, catalog::SLEEP.param)?;
        if current.eq_ignore_ascii_case("OFF") {
            return Some(SleepTimer::Off);
        }
        self.dispatcher
            .number_value(self.zone, &catalog::SLEEP)
            .map(|minutes| SleepTimer::Minutes(minutes as u32))
    }

    /// Set the sleep timer in minutes (1-120), or switch it off with `None`
    pub async fn set_sleep(&self, minutes: Option<u32>) -> Result<Dispatch> {
        match minutes {
            Some(minutes) => {
                self.dispatcher
                    .set_number(self.zone, &catalog::SLEEP, i64::from(minutes))
                    .await
            }
            None => self.dispatcher.set_off(self.zone, &catalog::SLEEP).await,
        }
    }

    // ========== Triggers ==========

    /// State of trigger output `index` (1-3)
    pub fn trigger(&self, index: u8) -> Result<Option<bool>> {
        let feature = catalog::trigger(index)?;
        Ok(self.dispatcher.toggle_value(self.zone, &feature))
    }

    /// Switch trigger output `index` on
    pub async fn trigger_on(&self, index: u8) -> Result<Dispatch> {
        let feature = catalog::trigger(index)?;
        self.dispatcher.set_toggle(self.zone, &feature, true).await
    }

    /// Switch trigger output `index` off
    pub async fn trigger_off(&self, index: u8) -> Result<Dispatch> {
        let feature = catalog::trigger(index)?;
        self.dispatcher.set_toggle(self.zone, &feature, false).await
    }

    // ========== Eco mode ==========

    /// Eco mode label, `On`, `Auto` or `Off`
    pub fn eco_mode(&self) -> Option<&'static str> {
        self.dispatcher.label_value(self.zone, &catalog::ECO_MODE)
    }

    /// Labels accepted by [`Self::set_eco_mode`]
    pub fn eco_mode_setting_list(&self) -> Vec<&'static str> {
        catalog::ECO_MODE.labels()
    }

    /// Set the eco mode
    pub async fn set_eco_mode(&self, mode: &str) -> Result<Dispatch> {
        self.dispatcher.set_enum(self.zone, &catalog::ECO_MODE, mode).await
    }

    // ========== Audio delay ==========

    /// Audio delay in ms
    pub fn delay(&self) -> Option<i64> {
        self.dispatcher.number_value(self.zone, &catalog::DELAY)
    }

    /// Set the audio delay in ms; values outside 0-500 are clamped
    pub async fn set_delay(&self, ms: i64) -> Result<Dispatch> {
        self.dispatcher.set_number(self.zone, &catalog::DELAY, ms).await
    }

    /// Raise the audio delay by one step
    pub async fn delay_up(&self) -> Result<Dispatch> {
        self.dispatcher.step(self.zone, &catalog::DELAY, Step::Up).await
    }

    /// Lower the audio delay by one step
    pub async fn delay_down(&self) -> Result<Dispatch> {
        self.dispatcher.step(self.zone, &catalog::DELAY, Step::Down).await
    }

    /// Audio/video delay time in ms
    pub fn delay_time(&self) -> Option<i64> {
        self.dispatcher.number_value(self.zone, &catalog::DELAY_TIME)
    }

    /// Set the audio/video delay time in ms
    pub async fn set_delay_time(&self, ms: i64) -> Result<Dispatch> {
        self.dispatcher.set_number(self.zone, &catalog::DELAY_TIME, ms).await
    }

    /// Raise the delay time by one step
    pub async fn delay_time_up(&self) -> Result<Dispatch> {
        self.dispatcher.step(self.zone, &catalog::DELAY_TIME, Step::Up).await
    }

    /// Lower the delay time by one step
    pub async fn delay_time_down(&self) -> Result<Dispatch> {
        self.dispatcher.step(self.zone, &catalog::DELAY_TIME, Step::Down).await
    }

    // ========== EQ and audio processing ==========

    /// Whether the graphic EQ is enabled
    pub fn graphic_eq(&self) -> Option<bool> {
        self.dispatcher.toggle_value(self.zone, &catalog::GRAPHIC_EQ)
    }

    /// Enable the graphic EQ
    pub async fn graphic_eq_on(&self) -> Result<Dispatch> {
        self.dispatcher.set_toggle(self.zone, &catalog::GRAPHIC_EQ, true).await
    }

    /// Disable the graphic EQ
    pub async fn graphic_eq_off(&self) -> Result<Dispatch> {
        self.dispatcher.set_toggle(self.zone, &catalog::GRAPHIC_EQ, false).await
    }

    /// Whether the headphone EQ is enabled
    pub fn headphone_eq(&self) -> Option<bool> {
        self.dispatcher.toggle_value(self.zone, &catalog::HEADPHONE_EQ)
    }

    /// Enable the headphone EQ
    pub async fn headphone_eq_on(&self) -> Result<Dispatch> {
        self.dispatcher.set_toggle(self.zone, &catalog::HEADPHONE_EQ, true).await
    }

    /// Disable the headphone EQ
    pub async fn headphone_eq_off(&self) -> Result<Dispatch> {
        self.dispatcher.set_toggle(self.zone, &catalog::HEADPHONE_EQ, false).await
    }

    /// Audio restorer level label
    pub fn audio_restorer(&self) -> Option<&'static str> {
        self.dispatcher.label_value(self.zone, &catalog::AUDIO_RESTORER)
    }

    /// Labels accepted by [`Self::set_audio_restorer`]
    pub fn audio_restorer_setting_list(&self) -> Vec<&'static str> {
        catalog::AUDIO_RESTORER.labels()
    }

    /// Set the audio restorer level
    pub async fn set_audio_restorer(&self, mode: &str) -> Result<Dispatch> {
        self.dispatcher.set_enum(self.zone, &catalog::AUDIO_RESTORER, mode).await
    }

    /// Room size, `S` through `L`
    pub fn room_size(&self) -> Option<&'static str> {
        self.dispatcher.label_value(self.zone, &catalog::ROOM_SIZE)
    }

    /// Labels accepted by [`Self::set_room_size`]
    pub fn room_size_setting_list(&self) -> Vec<&'static str> {
        catalog::ROOM_SIZE.labels()
    }

    /// Set the room size
    pub async fn set_room_size(&self, size: &str) -> Result<Dispatch> {
        self.dispatcher.set_enum(self.zone, &catalog::ROOM_SIZE, size).await
    }

    /// Whether the tactile transducer output is enabled
    pub fn tactile_transducer(&self) -> Option<bool> {
        self.dispatcher.toggle_value(self.zone, &catalog::TACTILE_TRANSDUCER)
    }

    /// Enable the tactile transducer output
    pub async fn tactile_transducer_on(&self) -> Result<Dispatch> {
        self.dispatcher
            .set_toggle(self.zone, &catalog::TACTILE_TRANSDUCER, true)
            .await
    }

    /// Disable the tactile transducer output
    pub async fn tactile_transducer_off(&self) -> Result<Dispatch> {
        self.dispatcher
            .set_toggle(self.zone, &catalog::TACTILE_TRANSDUCER, false)
            .await
    }

    // ========== Front panel and HDMI ==========

    /// Front panel illumination label
    pub fn illumination(&self) -> Option<&'static str> {
        self.dispatcher.label_value(self.zone, &catalog::ILLUMINATION)
    }

    /// Labels accepted by [`Self::set_illumination`]
    pub fn illumination_setting_list(&self) -> Vec<&'static str> {
        catalog::ILLUMINATION.labels()
    }

    /// Set the front panel illumination
    pub async fn set_illumination(&self, level: &str) -> Result<Dispatch> {
        self.dispatcher.set_enum(self.zone, &catalog::ILLUMINATION, level).await
    }

    /// Whether HDMI auto lip sync is enabled
    pub fn auto_lip_sync(&self) -> Option<bool> {
        self.dispatcher.toggle_value(self.zone, &catalog::AUTO_LIP_SYNC)
    }

    /// Enable auto lip sync
    pub async fn auto_lip_sync_on(&self) -> Result<Dispatch> {
        self.dispatcher.set_toggle(self.zone, &catalog::AUTO_LIP_SYNC, true).await
    }

    /// Disable auto lip sync
    pub async fn auto_lip_sync_off(&self) -> Result<Dispatch> {
        self.dispatcher.set_toggle(self.zone, &catalog::AUTO_LIP_SYNC, false).await
    }

    /// HDMI monitor output, `Auto`, `HDMI1` or `HDMI2`
    pub fn hdmi_output(&self) -> Option<&'static str> {
        self.dispatcher.label_value(self.zone, &catalog::HDMI_OUTPUT)
    }

    /// Labels accepted by [`Self::set_hdmi_output`]
    pub fn hdmi_output_setting_list(&self) -> Vec<&'static str> {
        catalog::HDMI_OUTPUT.labels()
    }

    /// Select the HDMI monitor output
    pub async fn set_hdmi_output(&self, output: &str) -> Result<Dispatch> {
        self.dispatcher.set_enum(self.zone, &catalog::HDMI_OUTPUT, output).await
    }

    /// Where HDMI audio is decoded, `AMP` or `TV`
    pub fn hdmi_audio_decode(&self) -> Option<&'static str> {
        self.dispatcher.label_value(self.zone, &catalog::HDMI_AUDIO_DECODE)
    }

    /// Labels accepted by [`Self::set_hdmi_audio_decode`]
    pub fn hdmi_audio_decode_setting_list(&self) -> Vec<&'static str> {
        catalog::HDMI_AUDIO_DECODE.labels()
    }

    /// Choose whether the amplifier or the TV decodes HDMI audio
    pub async fn set_hdmi_audio_decode(&self, mode: &str) -> Result<Dispatch> {
        self.dispatcher
            .set_enum(self.zone, &catalog::HDMI_AUDIO_DECODE, mode)
            .await
    }

    /// Video processing mode label
    pub fn video_processing_mode(&self) -> Option<&'static str> {
        self.dispatcher
            .label_value(self.zone, &catalog::VIDEO_PROCESSING_MODE)
    }

    /// Labels accepted by [`Self::set_video_processing_mode`]
    pub fn video_processing_mode_setting_list(&self) -> Vec<&'static str> {
        catalog::VIDEO_PROCESSING_MODE.labels()
    }

    /// Set the video processing mode
    pub async fn set_video_processing_mode(&self, mode: &str) -> Result<Dispatch> {
        self.dispatcher
            .set_enum(self.zone, &catalog::VIDEO_PROCESSING_MODE, mode)
            .await
    }

    // ========== Speakers ==========

    /// Active speaker preset, 1 or 2
    pub fn speaker_preset(&self) -> Option<u8> {
        self.dispatcher
            .label_value(self.zone, &catalog::SPEAKER_PRESET)?
            .parse()
            .ok()
    }

    /// Activate speaker preset 1 or 2
    pub async fn set_speaker_preset(&self, preset: u8) -> Result<Dispatch> {
        if !(1..=2).contains(&preset) {
            return Err(AvrError::domain("speaker_preset", preset, "preset must be 1 or 2"));
        }
        self.dispatcher
            .set_enum(self.zone, &catalog::SPEAKER_PRESET, &preset.to_string())
            .await
    }

    // ========== Bluetooth ==========

    /// Whether the Bluetooth transmitter is enabled
    pub fn bt_transmitter(&self) -> Option<bool> {
        self.dispatcher.toggle_value(self.zone, &catalog::BT_TRANSMITTER)
    }

    /// Enable the Bluetooth transmitter
    pub async fn bt_transmitter_on(&self) -> Result<Dispatch> {
        self.dispatcher.set_toggle(self.zone, &catalog::BT_TRANSMITTER, true).await
    }

    /// Disable the Bluetooth transmitter
    pub async fn bt_transmitter_off(&self) -> Result<Dispatch> {
        self.dispatcher.set_toggle(self.zone, &catalog::BT_TRANSMITTER, false).await
    }

    /// Bluetooth output mode label
    pub fn bt_output_mode(&self) -> Option<&'static str> {
        self.dispatcher.label_value(self.zone, &catalog::BT_OUTPUT_MODE)
    }

    /// Labels accepted by [`Self::set_bt_output_mode`]
    pub fn bt_output_mode_setting_list(&self) -> Vec<&'static str> {
        catalog::BT_OUTPUT_MODE.labels()
    }

    /// Set the Bluetooth output mode
    pub async fn set_bt_output_mode(&self, mode: &str) -> Result<Dispatch> {
        self.dispatcher.set_enum(self.zone, &catalog::BT_OUTPUT_MODE, mode).await
    }
}
