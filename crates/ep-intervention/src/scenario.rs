//! Preset intervention plans.

use std::fmt;
use std::str::FromStr;

use ep_core::InterventionKind;

use crate::{
    Comparison, Condition, DistancingParams, Intervention, InterventionError, InterventionPlan,
    LockdownParams, MaskParams, Metric, Priority, ReopenParams, TestingParams, TravelParams,
    Trigger, VaccinationParams,
};

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Scenario {
    NoIntervention,
    /// Masks on day 30, distancing 45, vaccination 60, lockdown 75, reopen 120.
    DelayedResponse,
    /// Masks on day 7, testing 14, distancing 21, vaccination 30, travel 45.
    RapidResponse,
    /// Random-order vaccination rounds on days 0, 30 and 60.
    HerdImmunity,
    /// 30-day strict lockdown from day 14, masks, travel cuts, reopen 45,
    /// vulnerable-first vaccination 50.
    FullLockdown,
}

impl Scenario {
    pub const ALL: [Scenario; 5] = [
        Scenario::NoIntervention,
        Scenario::DelayedResponse,
        Scenario::RapidResponse,
        Scenario::HerdImmunity,
        Scenario::FullLockdown,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Scenario::NoIntervention  => "no_intervention",
            Scenario::DelayedResponse => "delayed_response",
            Scenario::RapidResponse   => "rapid_response",
            Scenario::HerdImmunity    => "herd_immunity",
            Scenario::FullLockdown    => "full_lockdown",
        }
    }

    pub fn plan(self) -> InterventionPlan {
        let triggers = match self {
            Scenario::NoIntervention => Vec::new(),
            Scenario::DelayedResponse => vec![
                Trigger::on_day(30, Intervention::MaskMandate(MaskParams::new(0.5, 0.7))),
                Trigger::on_day(45, distancing(0.3, 0.6)),
                Trigger::on_day(60, vaccination(0.02, 0.9, Priority::Age)),
                Trigger::on_day(75, lockdown(0.7, 0.8, None)),
                Trigger::on_day(120, reopen()),
            ],
            Scenario::RapidResponse => vec![
                Trigger::on_day(7, Intervention::MaskMandate(MaskParams::new(0.6, 0.8))),
                Trigger::on_day(
                    14,
                    Intervention::Testing(TestingParams {
                        rate: 0.1,
                        accuracy: 0.95,
                        delay: 1,
                        ..TestingParams::default()
                    }),
                ),
                Trigger::on_day(21, distancing(0.5, 0.7)),
                Trigger::on_day(30, vaccination(0.03, 0.9, Priority::Frontline)),
                Trigger::on_day(
                    45,
                    Intervention::TravelRestrictions(TravelParams { reduction: 0.7, duration: None }),
                ),
            ],
            Scenario::HerdImmunity => vec![
                Trigger::on_day(0, vaccination(0.05, 0.9, Priority::Random)),
                Trigger::on_day(30, vaccination(0.03, 0.9, Priority::Random)),
                Trigger::on_day(60, vaccination(0.02, 0.9, Priority::Random)),
            ],
            Scenario::FullLockdown => vec![
                Trigger::on_day(14, lockdown(0.9, 0.85, Some(30))),
                Trigger::on_day(15, Intervention::MaskMandate(MaskParams::new(0.7, 0.9))),
                Trigger::on_day(
                    16,
                    Intervention::TravelRestrictions(TravelParams { reduction: 0.9, duration: None }),
                ),
                Trigger::on_day(45, reopen()),
                Trigger::on_day(50, vaccination(0.04, 0.95, Priority::Vulnerable)),
            ],
        };
        InterventionPlan::from_triggers(triggers)
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scenario {
    type Err = InterventionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Scenario::ALL
            .into_iter()
            .find(|sc| sc.name() == s)
            .ok_or_else(|| InterventionError::UnknownScenario(s.to_owned()))
    }
}

/// Responsive policy: vaccinate from day 60 unless a campaign is already
/// running, lock down on day 30 if more than 50 people are infectious, and
/// reopen on day 90 if the lockdown is still in force.
pub fn default_policy() -> InterventionPlan {
    InterventionPlan::new()
        .with(
            Trigger::on_day(60, vaccination(0.02, 0.9, Priority::Age))
                .and(Condition::Inactive { intervention: InterventionKind::Vaccination }),
        )
        .with(
            Trigger::on_day(30, lockdown(0.7, 0.8, None))
                .and(Condition::Inactive { intervention: InterventionKind::Lockdown })
                .and(Condition::metric(Metric::Infectious, Comparison::Above, 50.0)),
        )
        .with(
            Trigger::on_day(90, reopen())
                .and(Condition::Active { intervention: InterventionKind::Lockdown }),
        )
}

fn lockdown(strictness: f64, compliance: f64, duration: Option<u32>) -> Intervention {
    Intervention::Lockdown(LockdownParams { strictness, compliance, duration })
}

fn distancing(effectiveness: f64, compliance: f64) -> Intervention {
    Intervention::SocialDistancing(DistancingParams { effectiveness, compliance, duration: None })
}

fn vaccination(rate: f64, efficacy: f64, priority: Priority) -> Intervention {
    Intervention::Vaccination(VaccinationParams { rate, efficacy, priority, ..VaccinationParams::default() })
}

fn reopen() -> Intervention {
    Intervention::Reopen(ReopenParams { gradual: true })
}
