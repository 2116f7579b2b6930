use std::sync::Arc;

use crate::catalog;
use crate::dispatch::Dispatcher;
use crate::domain::Feature;
use crate::error::Result;
use crate::types::{Dispatch, Zone};

/// Surround processing settings of the main zone
///
/// Getters return `None` until the receiver has reported the value. Setters
/// send nothing when the cached value already matches.
#[derive(Clone)]
pub struct SoundMode {
    dispatcher: Arc<Dispatcher>,
}

impl SoundMode {
    pub(crate) fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    /// Whether DTS Neural:X is enabled
    pub fn neural_x(&self) -> Option<bool> {
        self.dispatcher.toggle_value(Zone::Main, &catalog::NEURAL_X)
    }

    /// Enable Neural:X
    pub async fn neural_x_on(&self) -> Result<Dispatch> {
        self.dispatcher.set_toggle(Zone::Main, &catalog::NEURAL_X, true).await
    }

    /// Disable Neural:X
    pub async fn neural_x_off(&self) -> Result<Dispatch> {
        self.dispatcher.set_toggle(Zone::Main, &catalog::NEURAL_X, false).await
    }

    // ========== IMAX ==========

    /// IMAX mode label, `Auto` or `Off`
    pub fn imax(&self) -> Option<&'static str> {
        self.dispatcher.label_value(Zone::Main, &catalog::IMAX)
    }

    /// Let the receiver apply IMAX automatically
    pub async fn imax_auto(&self) -> Result<Dispatch> {
        self.dispatcher.set_enum(Zone::Main, &catalog::IMAX, "Auto").await
    }

    /// Switch IMAX off
    pub async fn imax_off(&self) -> Result<Dispatch> {
        self.dispatcher.set_enum(Zone::Main, &catalog::IMAX, "Off").await
    }

    /// IMAX audio settings, `AUTO` or `MANUAL`
    pub fn imax_audio_settings(&self) -> Option<&'static str> {
        self.dispatcher
            .label_value(Zone::Main, &catalog::IMAX_AUDIO_SETTINGS)
    }

    /// Labels accepted by [`Self::set_imax_audio_settings`]
    pub fn imax_audio_settings_setting_list(&self) -> Vec<&'static str> {
        catalog::IMAX_AUDIO_SETTINGS.labels()
    }

    /// Set the IMAX audio settings
    pub async fn set_imax_audio_settings(&self, setting: &str) -> Result<Dispatch> {
        self.dispatcher
            .set_enum(Zone::Main, &catalog::IMAX_AUDIO_SETTINGS, setting)
            .await
    }

    /// IMAX high-pass filter frequency in Hz
    pub fn imax_hpf(&self) -> Option<u32> {
        self.frequency(&catalog::IMAX_HPF)
    }

    /// Frequencies accepted by [`Self::set_imax_hpf`]
    pub fn imax_hpf_setting_list(&self) -> Vec<u32> {
        frequencies(&catalog::IMAX_HPF)
    }

    /// Set the IMAX high-pass filter; `hz` must be one of [`Self::imax_hpf_setting_list`]
    pub async fn set_imax_hpf(&self, hz: u32) -> Result<Dispatch> {
        self.dispatcher
            .set_enum(Zone::Main, &catalog::IMAX_HPF, &hz.to_string())
            .await
    }

    /// IMAX low-pass filter frequency in Hz
    pub fn imax_lpf(&self) -> Option<u32> {
        self.frequency(&catalog::IMAX_LPF)
    }

    /// Frequencies accepted by [`Self::set_imax_lpf`]
    pub fn imax_lpf_setting_list(&self) -> Vec<u32> {
        frequencies(&catalog::IMAX_LPF)
    }

    /// Set the IMAX low-pass filter; `hz` must be one of [`Self::imax_lpf_setting_list`]
    pub async fn set_imax_lpf(&self, hz: u32) -> Result<Dispatch> {
        self.dispatcher
            .set_enum(Zone::Main, &catalog::IMAX_LPF, &hz.to_string())
            .await
    }

    /// IMAX subwoofer mode, `ON` or `OFF`
    pub fn imax_subwoofer_mode(&self) -> Option<&'static str> {
        self.dispatcher
            .label_value(Zone::Main, &catalog::IMAX_SUBWOOFER_MODE)
    }

    /// Labels accepted by [`Self::set_imax_subwoofer_mode`]
    pub fn imax_subwoofer_mode_setting_list(&self) -> Vec<&'static str> {
        catalog::IMAX_SUBWOOFER_MODE.labels()
    }

    /// Set the IMAX subwoofer mode
    pub async fn set_imax_subwoofer_mode(&self, mode: &str) -> Result<Dispatch> {
        self.dispatcher
            .set_enum(Zone::Main, &catalog::IMAX_SUBWOOFER_MODE, mode)
            .await
    }

    /// IMAX subwoofer output, `L+M` or `LFE`
    pub fn imax_subwoofer_output(&self) -> Option<&'static str> {
        self.dispatcher
            .label_value(Zone::Main, &catalog::IMAX_SUBWOOFER_OUTPUT)
    }

    /// Labels accepted by [`Self::set_imax_subwoofer_output`]
    pub fn imax_subwoofer_output_setting_list(&self) -> Vec<&'static str> {
        catalog::IMAX_SUBWOOFER_OUTPUT.labels()
    }

    /// Set the IMAX subwoofer output
    pub async fn set_imax_subwoofer_output(&self, output: &str) -> Result<Dispatch> {
        self.dispatcher
            .set_enum(Zone::Main, &catalog::IMAX_SUBWOOFER_OUTPUT, output)
            .await
    }

    // ========== Dialog and upmixing ==========

    /// Whether Cinema EQ is enabled
    pub fn cinema_eq(&self) -> Option<bool> {
        self.dispatcher.toggle_value(Zone::Main, &catalog::CINEMA_EQ)
    }

    /// Enable Cinema EQ
    pub async fn cinema_eq_on(&self) -> Result<Dispatch> {
        self.dispatcher.set_toggle(Zone::Main, &catalog::CINEMA_EQ, true).await
    }

    /// Disable Cinema EQ
    pub async fn cinema_eq_off(&self) -> Result<Dispatch> {
        self.dispatcher.set_toggle(Zone::Main, &catalog::CINEMA_EQ, false).await
    }

    /// Dialog enhancer level label
    pub fn dialog_enhancer(&self) -> Option<&'static str> {
        self.dispatcher.label_value(Zone::Main, &catalog::DIALOG_ENHANCER)
    }

    /// Labels accepted by [`Self::set_dialog_enhancer`]
    pub fn dialog_enhancer_setting_list(&self) -> Vec<&'static str> {
        catalog::DIALOG_ENHANCER.labels()
    }

    /// Set the dialog enhancer level
    pub async fn set_dialog_enhancer(&self, level: &str) -> Result<Dispatch> {
        self.dispatcher
            .set_enum(Zone::Main, &catalog::DIALOG_ENHANCER, level)
            .await
    }

    /// Auro-Matic 3D preset label
    pub fn auromatic_3d_preset(&self) -> Option<&'static str> {
        self.dispatcher
            .label_value(Zone::Main, &catalog::AUROMATIC_3D_PRESET)
    }

    /// Labels accepted by [`Self::set_auromatic_3d_preset`]
    pub fn auromatic_3d_preset_setting_list(&self) -> Vec<&'static str> {
        catalog::AUROMATIC_3D_PRESET.labels()
    }

    /// Set the Auro-Matic 3D preset
    pub async fn set_auromatic_3d_preset(&self, preset: &str) -> Result<Dispatch> {
        self.dispatcher
            .set_enum(Zone::Main, &catalog::AUROMATIC_3D_PRESET, preset)
            .await
    }

    // ========== Marantz ==========

    /// M-DAX level
    pub fn mdax(&self) -> Option<&'static str> {
        self.dispatcher.label_value(Zone::Main, &catalog::MDAX)
    }

    /// Labels accepted by [`Self::set_mdax`]
    pub fn mdax_setting_list(&self) -> Vec<&'static str> {
        catalog::MDAX.labels()
    }

    /// Set the M-DAX level
    pub async fn set_mdax(&self, level: &str) -> Result<Dispatch> {
        self.dispatcher.set_enum(Zone::Main, &catalog::MDAX, level).await
    }

    /// DAC filter label, `Mode 1` or `Mode 2`
    pub fn dac_filter(&self) -> Option<&'static str> {
        self.dispatcher.label_value(Zone::Main, &catalog::DAC_FILTER)
    }

    /// Labels accepted by [`Self::set_dac_filter`]
    pub fn dac_filter_setting_list(&self) -> Vec<&'static str> {
        catalog::DAC_FILTER.labels()
    }

    /// Set the DAC filter
    pub async fn set_dac_filter(&self, filter: &str) -> Result<Dispatch> {
        self.dispatcher
            .set_enum(Zone::Main, &catalog::DAC_FILTER, filter)
            .await
    }

    fn frequency(&self, feature: &Feature) -> Option<u32> {
        self.dispatcher
            .label_value(Zone::Main, feature)?
            .parse()
            .ok()
    }
}

fn frequencies(feature: &Feature) -> Vec<u32> {
    feature
        .labels()
        .into_iter()
        .filter_map(|label| label.parse().ok())
        .collect()
}
