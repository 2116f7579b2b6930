use std::sync::Arc;

use crate::catalog;
use crate::dispatch::Dispatcher;
use crate::domain::Step;
use crate::error::Result;
use crate::types::{Dispatch, Zone};

/// Audyssey room correction and Dirac Live settings of the main zone
///
/// DynamicEQ, MultEQ, Dynamic Volume and the reference level offset are
/// not accepted by the simple HTTP command endpoint; without Telnet they are
/// sent as `SetAudyssey` AppCommands.
#[derive(Clone)]
pub struct Audyssey {
    dispatcher: Arc<Dispatcher>,
}

impl Audyssey {
    pub(crate) fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    // ========== DynamicEQ ==========

    /// Whether DynamicEQ is enabled
    pub fn dynamic_eq(&self) -> Option<bool> {
        self.dispatcher.toggle_value(Zone::Main, &catalog::DYNAMIC_EQ)
    }

    /// Enable DynamicEQ
    pub async fn dynamiceq_on(&self) -> Result<Dispatch> {
        self.dispatcher
            .set_toggle(Zone::Main, &catalog::DYNAMIC_EQ, true)
            .await
    }

    /// Disable DynamicEQ
    pub async fn dynamiceq_off(&self) -> Result<Dispatch> {
        self.dispatcher
            .set_toggle(Zone::Main, &catalog::DYNAMIC_EQ, false)
            .await
    }

    /// Flip DynamicEQ based on the cached value
    pub async fn toggle_dynamic_eq(&self) -> Result<Dispatch> {
        self.dispatcher.toggle(Zone::Main, &catalog::DYNAMIC_EQ).await
    }

    // ========== MultEQ ==========

    /// MultEQ curve label
    pub fn multi_eq(&self) -> Option<&'static str> {
        self.dispatcher.label_value(Zone::Main, &catalog::MULTI_EQ)
    }

    /// Labels accepted by [`Self::set_multieq`]
    pub fn multi_eq_setting_list(&self) -> Vec<&'static str> {
        catalog::MULTI_EQ.labels()
    }

    /// Select the MultEQ curve
    pub async fn set_multieq(&self, setting: &str) -> Result<Dispatch> {
        self.dispatcher
            .set_enum(Zone::Main, &catalog::MULTI_EQ, setting)
            .await
    }

    // ========== Dynamic Volume ==========

    /// Dynamic Volume level label
    pub fn dynamic_volume(&self) -> Option<&'static str> {
        self.dispatcher.label_value(Zone::Main, &catalog::DYNAMIC_VOLUME)
    }

    /// Labels accepted by [`Self::set_dynamicvol`]
    pub fn dynamic_volume_setting_list(&self) -> Vec<&'static str> {
        catalog::DYNAMIC_VOLUME.labels()
    }

    /// Set the Dynamic Volume level
    pub async fn set_dynamicvol(&self, setting: &str) -> Result<Dispatch> {
        self.dispatcher
            .set_enum(Zone::Main, &catalog::DYNAMIC_VOLUME, setting)
            .await
    }

    // ========== Reference level offset ==========

    /// Reference level offset label, e.g. `+5dB`
    pub fn reference_level_offset(&self) -> Option<&'static str> {
        self.dispatcher
            .label_value(Zone::Main, &catalog::REF_LEVEL_OFFSET)
    }

    /// Labels accepted by [`Self::set_reflevoffset`]
    pub fn reference_level_offset_setting_list(&self) -> Vec<&'static str> {
        catalog::REF_LEVEL_OFFSET.labels()
    }

    /// Set the reference level offset (`0dB`, `+5dB`, `+10dB`, `+15dB`)
    ///
    /// Fails with a precondition error unless DynamicEQ is known to be on.
    pub async fn set_reflevoffset(&self, offset: &str) -> Result<Dispatch> {
        self.dispatcher
            .set_enum(Zone::Main, &catalog::REF_LEVEL_OFFSET, offset)
            .await
    }

    // ========== LFC ==========

    /// Whether Low Frequency Containment is enabled
    pub fn lfc(&self) -> Option<bool> {
        self.dispatcher.toggle_value(Zone::Main, &catalog::LFC)
    }

    /// Enable LFC
    pub async fn lfc_on(&self) -> Result<Dispatch> {
        self.dispatcher.set_toggle(Zone::Main, &catalog::LFC, true).await
    }

    /// Disable LFC
    pub async fn lfc_off(&self) -> Result<Dispatch> {
        self.dispatcher.set_toggle(Zone::Main, &catalog::LFC, false).await
    }

    /// Flip LFC based on the cached value
    pub async fn toggle_lfc(&self) -> Result<Dispatch> {
        self.dispatcher.toggle(Zone::Main, &catalog::LFC).await
    }

    // ========== Containment amount ==========

    /// LFC containment amount (1-7)
    pub fn containment_amount(&self) -> Option<i64> {
        self.dispatcher
            .number_value(Zone::Main, &catalog::CONTAINMENT_AMOUNT)
    }

    /// Set the LFC containment amount (1-7)
    pub async fn set_containment_amount(&self, amount: i64) -> Result<Dispatch> {
        self.dispatcher
            .set_number(Zone::Main, &catalog::CONTAINMENT_AMOUNT, amount)
            .await
    }

    /// Raise the containment amount by one
    pub async fn containment_amount_up(&self) -> Result<Dispatch> {
        self.dispatcher
            .step(Zone::Main, &catalog::CONTAINMENT_AMOUNT, Step::Up)
            .await
    }

    /// Lower the containment amount by one
    pub async fn containment_amount_down(&self) -> Result<Dispatch> {
        self.dispatcher
            .step(Zone::Main, &catalog::CONTAINMENT_AMOUNT, Step::Down)
            .await
    }

    // ========== Dirac Live ==========

    /// Active Dirac Live filter slot label
    pub fn dirac_filter(&self) -> Option<&'static str> {
        self.dispatcher.label_value(Zone::Main, &catalog::DIRAC_FILTER)
    }

    /// Labels accepted by [`Self::set_dirac_filter`]
    pub fn dirac_filter_setting_list(&self) -> Vec<&'static str> {
        catalog::DIRAC_FILTER.labels()
    }

    /// Select a Dirac Live filter slot, or switch Dirac off
    pub async fn set_dirac_filter(&self, filter: &str) -> Result<Dispatch> {
        self.dispatcher
            .set_enum(Zone::Main, &catalog::DIRAC_FILTER, filter)
            .await
    }
}
