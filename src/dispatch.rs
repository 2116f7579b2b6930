//! Idempotent command dispatch.
//!
//! Every setter follows the same contract: validate the requested value,
//! compare it with the cached state, and only when they differ issue exactly
//! one command on the first usable channel. The dispatcher never writes the
//! cache; the receiver's notification confirms the change later.
//!
//! Receiver-wide features are cached under the main zone, so every entry point
//! first folds the caller's zone through [`Feature::scope`].

use std::collections::HashMap;
use std::sync::Arc;

use crate::appcommand::AppCommand;
use crate::catalog;
use crate::domain::{
    parse_number, same_wire_value, Feature, FeatureKind, Step, Token, UnknownPolicy,
};
use crate::error::{AvrError, Result};
use crate::state::StateCache;
use crate::transport::{HttpTransport, TelnetTransport};
use crate::types::{Channel, Dispatch, Zone};

/// Sends feature changes for one device session
pub struct Dispatcher {
    cache: Arc<StateCache>,
    http: Arc<dyn HttpTransport>,
    telnet: Option<Arc<dyn TelnetTransport>>,
    unknown_overrides: HashMap<String, UnknownPolicy>,
}

impl Dispatcher {
    /// Dispatcher sending over the given transports and reading from `cache`
    pub fn new(
        cache: Arc<StateCache>,
        http: Arc<dyn HttpTransport>,
        telnet: Option<Arc<dyn TelnetTransport>>,
        unknown_overrides: HashMap<String, UnknownPolicy>,
    ) -> Self {
        for name in unknown_overrides.keys() {
            if catalog::by_name(name).is_none() {
                tracing::warn!("Unknown-state policy set for unknown feature {}", name);
            }
        }
        Self {
            cache,
            http,
            telnet,
            unknown_overrides,
        }
    }

    /// State cache the dispatcher compares against
    pub fn cache(&self) -> &Arc<StateCache> {
        &self.cache
    }

    /// Policy applied while `feature` has no cached value
    pub fn unknown_policy(&self, feature: &Feature) -> UnknownPolicy {
        self.unknown_overrides
            .get(feature.name)
            .copied()
            .unwrap_or(feature.unknown)
    }

    /// Cached state of a toggle feature
    pub fn toggle_value(&self, zone: Zone, feature: &Feature) -> Option<bool> {
        let FeatureKind::Toggle { on, off } = feature.kind else {
            return None;
        };
        let current = self.cache.get(feature.scope(zone), feature.param)?;
        if same_wire_value(&current, on.wire) {
            Some(true)
        } else if same_wire_value(&current, off.wire) {
            Some(false)
        } else {
            None
        }
    }

    /// Cached label of an enumerated feature
    pub fn label_value(&self, zone: Zone, feature: &Feature) -> Option<&'static str> {
        let current = self.cache.get(feature.scope(zone), feature.param)?;
        feature.label_of(&current)
    }

    /// Cached value of a numeric feature
    pub fn number_value(&self, zone: Zone, feature: &Feature) -> Option<i64> {
        parse_number(&self.cache.get(feature.scope(zone), feature.param)?)
    }

    /// Turn a toggle feature on or off
    pub async fn set_toggle(&self, zone: Zone, feature: &Feature, on: bool) -> Result<Dispatch> {
        let zone = feature.scope(zone);
        let token = match feature.kind {
            FeatureKind::Toggle { on: on_token, off } => {
                if on {
                    on_token
                } else {
                    off
                }
            }
            _ => return Err(AvrError::domain(feature.name, on, "feature is not a toggle")),
        };
        self.set_token(zone, feature, token).await
    }

    /// Flip a toggle feature; an unknown value is treated as off
    pub async fn toggle(&self, zone: Zone, feature: &Feature) -> Result<Dispatch> {
        if !matches!(feature.kind, FeatureKind::Toggle { .. }) {
            return Err(AvrError::domain(feature.name, "toggle", "feature is not a toggle"));
        }
        let zone = feature.scope(zone);
        let on = self.toggle_value(zone, feature).unwrap_or(false);
        self.set_toggle(zone, feature, !on).await
    }

    /// Select a setting of an enumerated feature by label
    pub async fn set_enum(&self, zone: Zone, feature: &Feature, label: &str) -> Result<Dispatch> {
        let token = feature.token(label)?;
        self.set_token(feature.scope(zone), feature, token).await
    }

    /// Set a numeric feature directly, clamping or rejecting per its domain
    pub async fn set_number(&self, zone: Zone, feature: &Feature, value: i64) -> Result<Dispatch> {
        let domain = feature.numeric()?;
        let value = domain.resolve(feature.name, value)?;
        let zone = feature.scope(zone);
        self.check_requirement(zone, feature)?;

        let wire = domain.format(value);
        if self.is_current(zone, feature, &wire) {
            return Ok(Dispatch::Unchanged);
        }
        self.send(zone, feature, feature.command_for(zone, &wire), &value.to_string())
            .await
    }

    /// Set a numeric feature to its non-numeric off token
    pub async fn set_off(&self, zone: Zone, feature: &Feature) -> Result<Dispatch> {
        let domain = feature.numeric()?;
        let Some(off) = domain.off else {
            return Err(AvrError::domain(feature.name, "OFF", "feature has no off setting"));
        };
        let zone = feature.scope(zone);
        self.check_requirement(zone, feature)?;

        if self.is_current(zone, feature, off) {
            return Ok(Dispatch::Unchanged);
        }
        self.send(zone, feature, feature.command_for(zone, off), off)
            .await
    }

    /// Step a numeric feature by one unit
    ///
    /// Stepping past the domain bounds is a no-op.
    pub async fn step(&self, zone: Zone, feature: &Feature, step: Step) -> Result<Dispatch> {
        let domain = feature.numeric()?;
        let zone = feature.scope(zone);
        self.check_requirement(zone, feature)?;

        match self.cache.get(zone, feature.param) {
            Some(current) => {
                if let Some(value) = parse_number(&current) {
                    let at_limit = match step {
                        Step::Up => value >= domain.max,
                        Step::Down => value <= domain.min,
                    };
                    if at_limit {
                        tracing::debug!(
                            "{} already at limit {} for {}, not stepping",
                            feature.name,
                            value,
                            zone
                        );
                        return Ok(Dispatch::Unchanged);
                    }
                }
            }
            None => {
                if self.unknown_policy(feature) == UnknownPolicy::AssumeCurrent {
                    tracing::debug!("{} unknown for {}, assuming current", feature.name, zone);
                    return Ok(Dispatch::Unchanged);
                }
            }
        }

        self.send(zone, feature, feature.command_for(zone, step.wire()), step.wire())
            .await
    }

    async fn set_token(&self, zone: Zone, feature: &Feature, token: Token) -> Result<Dispatch> {
        self.check_requirement(zone, feature)?;
        if self.is_current(zone, feature, token.wire) {
            return Ok(Dispatch::Unchanged);
        }
        self.send(
            zone,
            feature,
            feature.command_for(zone, token.wire),
            token.appcommand_value(),
        )
        .await
    }

    fn check_requirement(&self, zone: Zone, feature: &Feature) -> Result<()> {
        let Some(requirement) = feature.requires else {
            return Ok(());
        };
        match self.cache.get(zone, requirement.param) {
            Some(current) if same_wire_value(&current, requirement.wire) => Ok(()),
            _ => Err(AvrError::Precondition(requirement.message.to_string())),
        }
    }

    fn is_current(&self, zone: Zone, feature: &Feature, wire: &str) -> bool {
        match self.cache.get(zone, feature.param) {
            Some(current) if same_wire_value(&current, wire) => {
                tracing::debug!("{} already {} for {}, not sending", feature.name, current, zone);
                true
            }
            Some(_) => false,
            None => {
                let assume = self.unknown_policy(feature) == UnknownPolicy::AssumeCurrent;
                if assume {
                    tracing::debug!("{} unknown for {}, assuming current", feature.name, zone);
                }
                assume
            }
        }
    }

    async fn send(
        &self,
        zone: Zone,
        feature: &Feature,
        command: String,
        appcommand_value: &str,
    ) -> Result<Dispatch> {
        if let Some(telnet) = self.telnet.as_ref().filter(|t| t.available()) {
            tracing::debug!("{} for {} via telnet: {}", feature.name, zone, command);
            telnet.send_commands(std::slice::from_ref(&command)).await?;
            return Ok(Dispatch::Sent(Channel::Telnet));
        }

        if feature.http {
            tracing::debug!("{} for {} via HTTP: {}", feature.name, zone, command);
            self.http.get_command(&command).await?;
            return Ok(Dispatch::Sent(Channel::HttpCommand));
        }

        if let Some(target) = feature.appcommand {
            let request = AppCommand::new(target.name).with_param(target.param, appcommand_value);
            tracing::debug!(
                "{} for {} via AppCommand: {} {}={}",
                feature.name,
                zone,
                target.name,
                target.param,
                appcommand_value
            );
            let body = self
                .http
                .post_appcommand(std::slice::from_ref(&request))
                .await?;
            request.check_response(&body)?;
            return Ok(Dispatch::Sent(Channel::AppCommand));
        }

        Err(AvrError::Unsupported(feature.name.to_string()))
    }
}
