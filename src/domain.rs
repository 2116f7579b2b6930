//! Feature domains: the static description of what a controllable feature
//! accepts and how its values travel on the wire.

use crate::error::{AvrError, Result};
use crate::types::{Param, Zone};

/// What a setter does while the cached value is unknown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownPolicy {
    /// Issue the command
    Send,
    /// Treat the receiver as already matching and send nothing
    AssumeCurrent,
}

/// How a direct numeric setter handles out-of-range values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangePolicy {
    /// Fail with a domain error
    Reject,
    /// Pull the value to the nearest bound
    Clamp,
}

/// Direction of a single-step numeric command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Up,
    Down,
}

impl Step {
    /// Token appended to the step command
    pub fn wire(self) -> &'static str {
        match self {
            Step::Up => "UP",
            Step::Down => "DOWN",
        }
    }
}

/// A value of an enumerated or toggle feature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    /// Human-facing label used by callers
    pub label: &'static str,
    /// Token the receiver emits and expects on Telnet and HTTP commands
    pub wire: &'static str,
    /// Token used on the AppCommand endpoint, when it differs
    pub appcommand: Option<&'static str>,
}

impl Token {
    /// Token whose AppCommand value equals its wire value
    pub const fn new(label: &'static str, wire: &'static str) -> Self {
        Self {
            label,
            wire,
            appcommand: None,
        }
    }

    /// Token with a distinct AppCommand value
    pub const fn with_appcommand(
        label: &'static str,
        wire: &'static str,
        appcommand: &'static str,
    ) -> Self {
        Self {
            label,
            wire,
            appcommand: Some(appcommand),
        }
    }

    /// Value sent on the AppCommand endpoint
    pub fn appcommand_value(&self) -> &'static str {
        self.appcommand.unwrap_or(self.wire)
    }
}

/// Bounds of a numeric feature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumericDomain {
    /// Lowest accepted value
    pub min: i64,
    /// Highest accepted value
    pub max: i64,
    /// Granularity; accepted values are `min + n * step`
    pub step: i64,
    /// Zero-padded width of the wire value (`030` has width 3)
    pub width: usize,
    /// What happens to values outside `min..=max`
    pub out_of_range: RangePolicy,
    /// Extra non-numeric token accepted by the feature, e.g. sleep `OFF`
    pub off: Option<&'static str>,
}

impl NumericDomain {
    /// Validate `value`, clamping it when the policy allows
    pub fn resolve(&self, feature: &str, value: i64) -> Result<i64> {
        let value = if (self.min..=self.max).contains(&value) {
            value
        } else {
            match self.out_of_range {
                RangePolicy::Clamp => value.clamp(self.min, self.max),
                RangePolicy::Reject => {
                    return Err(AvrError::domain(
                        feature,
                        value,
                        format!("must be between {} and {}", self.min, self.max),
                    ))
                }
            }
        };
        if (value - self.min) % self.step != 0 {
            return Err(AvrError::domain(
                feature,
                value,
                format!("must be a multiple of {}", self.step),
            ));
        }
        Ok(value)
    }

    /// Render `value` zero-padded to the wire width
    pub fn format(&self, value: i64) -> String {
        format!("{:0width$}", value, width = self.width)
    }
}

/// Shape of a feature's value domain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureKind {
    /// Two tokens, usually `ON` and `OFF`
    Toggle { on: Token, off: Token },
    /// A fixed list of tokens
    Enumerated(&'static [Token]),
    /// A bounded integer with optional step commands
    Numeric(NumericDomain),
}

/// AppCommand that carries a feature, e.g. `SetAudyssey` with param `dynamiceq`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppCommandTarget {
    /// Command name, e.g. `SetAudyssey`
    pub name: &'static str,
    /// Parameter name inside the command
    pub param: &'static str,
}

/// Cached value a feature requires before it can be set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requirement {
    /// Parameter that must be cached
    pub param: Param,
    /// Wire value it must hold
    pub wire: &'static str,
    /// Reason reported when the requirement is not met
    pub message: &'static str,
}

/// Static description of one controllable feature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Feature {
    /// Name used in errors, logs and unknown-state overrides
    pub name: &'static str,
    /// Cache key of the feature's value
    pub param: Param,
    pub kind: FeatureKind,
    /// Command template; `{value}`, `{zone}`, `{power}` and `{index}` are substituted
    pub command: &'static str,
    /// Whether each zone keeps its own value; receiver-wide features live under [`Zone::Main`]
    pub zoned: bool,
    /// Whether the simple HTTP command endpoint accepts the command
    pub http: bool,
    /// AppCommand used when neither Telnet nor the HTTP command endpoint applies
    pub appcommand: Option<AppCommandTarget>,
    /// What the setter does while the value is unknown
    pub unknown: UnknownPolicy,
    /// Cached value that must hold before the feature can be set
    pub requires: Option<Requirement>,
}

impl Feature {
    /// Zone whose cache entry holds this feature's value when addressed from `zone`
    pub fn scope(&self, zone: Zone) -> Zone {
        if self.zoned {
            zone
        } else {
            Zone::Main
        }
    }

    /// Render the Telnet/HTTP command for `zone` carrying `value`
    pub fn command_for(&self, zone: Zone, value: &str) -> String {
        let index = match self.param {
            Param::Trigger(n) => n.to_string(),
            _ => String::new(),
        };
        self.command
            .replace("{power}", zone.power_prefix())
            .replace("{zone}", zone.command_prefix())
            .replace("{index}", &index)
            .replace("{value}", value)
    }

    /// Token for `label`, or a domain error
    pub fn token(&self, label: &str) -> Result<Token> {
        match self.kind {
            FeatureKind::Enumerated(tokens) => tokens
                .iter()
                .find(|t| t.label == label)
                .copied()
                .ok_or_else(|| AvrError::domain(self.name, label, "not a known setting")),
            FeatureKind::Toggle { on, off } => [on, off]
                .into_iter()
                .find(|t| t.label == label)
                .ok_or_else(|| AvrError::domain(self.name, label, "not a known setting")),
            FeatureKind::Numeric(_) => {
                Err(AvrError::domain(self.name, label, "feature is numeric"))
            }
        }
    }

    /// Label of a cached wire value
    pub fn label_of(&self, wire: &str) -> Option<&'static str> {
        let tokens: &[Token] = match &self.kind {
            FeatureKind::Enumerated(tokens) => tokens,
            FeatureKind::Toggle { on, off } => {
                return [on, off]
                    .into_iter()
                    .find(|t| same_wire_value(t.wire, wire))
                    .map(|t| t.label)
            }
            FeatureKind::Numeric(_) => return None,
        };
        tokens
            .iter()
            .find(|t| same_wire_value(t.wire, wire))
            .map(|t| t.label)
    }

    /// Labels accepted by the feature's setter
    pub fn labels(&self) -> Vec<&'static str> {
        match self.kind {
            FeatureKind::Enumerated(tokens) => tokens.iter().map(|t| t.label).collect(),
            FeatureKind::Toggle { on, off } => vec![on.label, off.label],
            FeatureKind::Numeric(_) => Vec::new(),
        }
    }

    /// Numeric domain, or a domain error for non-numeric features
    pub fn numeric(&self) -> Result<NumericDomain> {
        match self.kind {
            FeatureKind::Numeric(domain) => Ok(domain),
            _ => Err(AvrError::domain(self.name, "", "feature is not numeric")),
        }
    }
}

/// Compare two wire values the way the receiver means them
///
/// Mnemonics compare case-insensitively; fixed-width decimals compare by value,
/// so `"03"` equals `"3"`.
pub fn same_wire_value(a: &str, b: &str) -> bool {
    let (a, b) = (a.trim(), b.trim());
    if a.eq_ignore_ascii_case(b) {
        return true;
    }
    match (parse_number(a), parse_number(b)) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

/// Parse a fixed-width decimal wire value
pub fn parse_number(value: &str) -> Option<i64> {
    let value = value.trim();
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}
