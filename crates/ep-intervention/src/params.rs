//! Typed intervention commands.
//!
//! Each command deserializes from JSON as `{"type": "<name>", ...params}`;
//! omitted parameters take the defaults below.  Every command except
//! `reopen` accepts an optional `duration` in days, after which an
//! `end_<name>` event removes it.

use std::fmt;
use std::str::FromStr;

use ep_core::{EpError, InterventionKind};
use serde::{Deserialize, Serialize};

use crate::{InterventionError, InterventionResult};

fn check_unit(intervention: &'static str, what: &'static str, value: f64) -> InterventionResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(InterventionError::OutOfUnitRange { intervention, what, value })
    }
}

// ── Parameter records ────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct LockdownParams {
    /// Fraction of mobility removed from each compliant person.
    pub strictness: f64,
    pub compliance: f64,
    pub duration:   Option<u32>,
}

impl Default for LockdownParams {
    fn default() -> Self {
        Self { strictness: 0.7, compliance: 0.8, duration: None }
    }
}

impl LockdownParams {
    /// Above this strictness compliant people are also isolated.
    pub const ISOLATION_THRESHOLD: f64 = 0.6;
}

#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DistancingParams {
    #[serde(alias = "reduction")]
    pub effectiveness: f64,
    pub compliance:    f64,
    pub duration:      Option<u32>,
}

impl Default for DistancingParams {
    fn default() -> Self {
        Self { effectiveness: 0.3, compliance: 0.7, duration: None }
    }
}

#[derive(Copy, Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskParams {
    /// `None` uses the disease's own mask efficacy.
    pub efficacy:   Option<f64>,
    pub compliance: f64,
    pub duration:   Option<u32>,
}

impl MaskParams {
    pub fn new(efficacy: f64, compliance: f64) -> Self {
        Self { efficacy: Some(efficacy), compliance, duration: None }
    }
}

/// Order in which susceptible people are offered a dose.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Oldest first.
    #[default]
    Age,
    /// Highest current mobility first.
    Frontline,
    Random,
    /// Highest health risk first.
    Vulnerable,
}

impl Priority {
    pub fn name(self) -> &'static str {
        match self {
            Priority::Age        => "age",
            Priority::Frontline  => "frontline",
            Priority::Random     => "random",
            Priority::Vulnerable => "vulnerable",
        }
    }
}

impl FromStr for Priority {
    type Err = EpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "age"        => Ok(Priority::Age),
            "frontline"  => Ok(Priority::Frontline),
            "random"     => Ok(Priority::Random),
            "vulnerable" => Ok(Priority::Vulnerable),
            other        => Err(EpError::Parse(format!("unknown vaccination priority '{other}'"))),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct VaccinationParams {
    /// Fraction of the eligible pool dosed per batch.
    pub rate:           f64,
    /// Probability that a dose moves the person to V.
    pub efficacy:       f64,
    pub priority:       Priority,
    /// Hard cap on doses per batch.
    pub daily_capacity: Option<usize>,
    /// With a duration the campaign doses a batch every day until it ends;
    /// without one it doses a single batch.
    pub duration:       Option<u32>,
}

impl Default for VaccinationParams {
    fn default() -> Self {
        Self {
            rate:           0.01,
            efficacy:       0.9,
            priority:       Priority::Age,
            daily_capacity: None,
            duration:       None,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TestingParams {
    /// Fraction of currently infectious people tested.
    pub rate:                 f64,
    /// Probability that an infectious person tests positive.
    pub accuracy:             f64,
    /// Days between a positive test and isolation.
    pub delay:                u32,
    /// Probability that a positive person goes on to isolate.
    pub isolation_compliance: f64,
    pub duration:             Option<u32>,
}

impl Default for TestingParams {
    fn default() -> Self {
        Self {
            rate:                 0.05,
            accuracy:             0.95,
            delay:                2,
            isolation_compliance: 0.8,
            duration:             None,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct IsolationParams {
    pub compliance: f64,
    pub duration:   Option<u32>,
}

impl Default for IsolationParams {
    fn default() -> Self {
        Self { compliance: 0.8, duration: None }
    }
}

#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TravelParams {
    /// Probability that each random-type contact is cut, and the factor
    /// removed from transmission over the ones that remain.
    pub reduction: f64,
    pub duration:  Option<u32>,
}

impl Default for TravelParams {
    fn default() -> Self {
        Self { reduction: 0.5, duration: None }
    }
}

#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct HygieneParams {
    pub improvement: f64,
    pub duration:    Option<u32>,
}

impl Default for HygieneParams {
    fn default() -> Self {
        Self { improvement: 0.3, duration: None }
    }
}

#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct VentilationParams {
    pub improvement: f64,
    pub duration:    Option<u32>,
}

impl Default for VentilationParams {
    fn default() -> Self {
        Self { improvement: 0.4, duration: None }
    }
}

#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ReopenParams {
    /// Ramp mobility back to baseline over a fortnight instead of at once.
    pub gradual: bool,
}

impl Default for ReopenParams {
    fn default() -> Self {
        Self { gradual: true }
    }
}

// ── Intervention ─────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Intervention {
    Lockdown(LockdownParams),
    SocialDistancing(DistancingParams),
    MaskMandate(MaskParams),
    Vaccination(VaccinationParams),
    Testing(TestingParams),
    Isolation(IsolationParams),
    TravelRestrictions(TravelParams),
    Hygiene(HygieneParams),
    Ventilation(VentilationParams),
    Reopen(ReopenParams),
}

impl Intervention {
    /// Build a command from its name and a JSON object of parameters.
    ///
    /// `params` may be `null` or an object; missing keys take defaults.
    ///
    /// ```
    /// # use ep_intervention::Intervention;
    /// let cmd = Intervention::from_name_and_params(
    ///     "lockdown",
    ///     serde_json::json!({ "strictness": 0.9, "duration": 30 }),
    /// ).unwrap();
    /// assert_eq!(cmd.duration(), Some(30));
    /// ```
    pub fn from_name_and_params(name: &str, params: serde_json::Value) -> InterventionResult<Self> {
        let kind: InterventionKind = name.parse()?;
        let mut object = match params {
            serde_json::Value::Null => serde_json::Map::new(),
            serde_json::Value::Object(map) => map,
            other => return Err(InterventionError::BadParams(other.to_string())),
        };
        object.insert("type".to_owned(), serde_json::Value::from(kind.name()));
        let cmd: Intervention = serde_json::from_value(serde_json::Value::Object(object))?;
        cmd.validate()?;
        Ok(cmd)
    }

    /// Parse a command from a JSON string such as
    /// `{"type": "mask_mandate", "efficacy": 0.5}`.
    pub fn from_json_str(json: &str) -> InterventionResult<Self> {
        let cmd: Intervention = serde_json::from_str(json)?;
        cmd.validate()?;
        Ok(cmd)
    }

    pub fn kind(&self) -> InterventionKind {
        match self {
            Intervention::Lockdown(_)           => InterventionKind::Lockdown,
            Intervention::SocialDistancing(_)   => InterventionKind::SocialDistancing,
            Intervention::MaskMandate(_)        => InterventionKind::MaskMandate,
            Intervention::Vaccination(_)        => InterventionKind::Vaccination,
            Intervention::Testing(_)            => InterventionKind::Testing,
            Intervention::Isolation(_)          => InterventionKind::Isolation,
            Intervention::TravelRestrictions(_) => InterventionKind::TravelRestrictions,
            Intervention::Hygiene(_)            => InterventionKind::Hygiene,
            Intervention::Ventilation(_)        => InterventionKind::Ventilation,
            Intervention::Reopen(_)             => InterventionKind::Reopen,
        }
    }

    /// Days until the `end_<name>` event, if any.
    pub fn duration(&self) -> Option<u32> {
        match self {
            Intervention::Lockdown(p)           => p.duration,
            Intervention::SocialDistancing(p)   => p.duration,
            Intervention::MaskMandate(p)        => p.duration,
            Intervention::Vaccination(p)        => p.duration,
            Intervention::Testing(p)            => p.duration,
            Intervention::Isolation(p)          => p.duration,
            Intervention::TravelRestrictions(p) => p.duration,
            Intervention::Hygiene(p)            => p.duration,
            Intervention::Ventilation(p)        => p.duration,
            Intervention::Reopen(_)             => None,
        }
    }

    pub fn validate(&self) -> InterventionResult<()> {
        let name = self.kind().name();
        match self {
            Intervention::Lockdown(p) => {
                check_unit(name, "strictness", p.strictness)?;
                check_unit(name, "compliance", p.compliance)
            }
            Intervention::SocialDistancing(p) => {
                check_unit(name, "effectiveness", p.effectiveness)?;
                check_unit(name, "compliance", p.compliance)
            }
            Intervention::MaskMandate(p) => {
                if let Some(e) = p.efficacy {
                    check_unit(name, "efficacy", e)?;
                }
                check_unit(name, "compliance", p.compliance)
            }
            Intervention::Vaccination(p) => {
                check_unit(name, "rate", p.rate)?;
                check_unit(name, "efficacy", p.efficacy)
            }
            Intervention::Testing(p) => {
                check_unit(name, "rate", p.rate)?;
                check_unit(name, "accuracy", p.accuracy)?;
                check_unit(name, "isolation_compliance", p.isolation_compliance)
            }
            Intervention::Isolation(p) => check_unit(name, "compliance", p.compliance),
            Intervention::TravelRestrictions(p) => check_unit(name, "reduction", p.reduction),
            Intervention::Hygiene(p) => check_unit(name, "improvement", p.improvement),
            Intervention::Ventilation(p) => check_unit(name, "improvement", p.improvement),
            Intervention::Reopen(_) => Ok(()),
        }
    }
}

impl fmt::Display for Intervention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intervention::Lockdown(p) => {
                write!(f, "lockdown(strictness={}, compliance={})", p.strictness, p.compliance)
            }
            Intervention::SocialDistancing(p) => write!(
                f,
                "social_distancing(effectiveness={}, compliance={})",
                p.effectiveness, p.compliance
            ),
            Intervention::MaskMandate(p) => match p.efficacy {
                Some(e) => write!(f, "mask_mandate(efficacy={e}, compliance={})", p.compliance),
                None => write!(f, "mask_mandate(compliance={})", p.compliance),
            },
            Intervention::Vaccination(p) => write!(
                f,
                "vaccination(rate={}, efficacy={}, priority={})",
                p.rate,
                p.efficacy,
                p.priority.name()
            ),
            Intervention::Testing(p) => write!(
                f,
                "testing(rate={}, accuracy={}, delay={})",
                p.rate, p.accuracy, p.delay
            ),
            Intervention::Isolation(p) => write!(f, "isolation(compliance={})", p.compliance),
            Intervention::TravelRestrictions(p) => {
                write!(f, "travel_restrictions(reduction={})", p.reduction)
            }
            Intervention::Hygiene(p) => write!(f, "hygiene(improvement={})", p.improvement),
            Intervention::Ventilation(p) => write!(f, "ventilation(improvement={})", p.improvement),
            Intervention::Reopen(p) => write!(f, "reopen(gradual={})", p.gradual),
        }
    }
}
