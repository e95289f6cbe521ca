//! Day- and threshold-triggered interventions.
//!
//! A [`Trigger`] fires at most once.  With a `day` it is only considered on
//! that day and fires if every condition holds then; without one it fires
//! on the first day every condition holds.

use ep_core::{Compartment, CompartmentCounts, Day, InterventionKind};
use serde::{Deserialize, Serialize};

use crate::{Intervention, InterventionResult, InterventionState};

/// Epidemic quantity a condition can test.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Susceptible,
    Exposed,
    /// All infectious compartments.
    Infectious,
    /// Hospital beds in use (Ih + Ic).
    Hospitalized,
    Recovered,
    Deaths,
    Vaccinated,
    /// New infections recorded on the previous day.
    NewInfections,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    Above,
    AtLeast,
    Below,
    AtMost,
}

impl Comparison {
    fn holds(self, lhs: f64, rhs: f64) -> bool {
        match self {
            Comparison::Above   => lhs > rhs,
            Comparison::AtLeast => lhs >= rhs,
            Comparison::Below   => lhs < rhs,
            Comparison::AtMost  => lhs <= rhs,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(tag = "when", rename_all = "snake_case")]
pub enum Condition {
    Metric { metric: Metric, op: Comparison, value: f64 },
    Active { intervention: InterventionKind },
    Inactive { intervention: InterventionKind },
}

impl Condition {
    pub fn metric(metric: Metric, op: Comparison, value: f64) -> Self {
        Condition::Metric { metric, op, value }
    }

    pub fn holds(&self, ctx: &TriggerContext<'_>) -> bool {
        match *self {
            Condition::Metric { metric, op, value } => op.holds(ctx.value(metric), value),
            Condition::Active { intervention } => ctx.state.is_active(intervention),
            Condition::Inactive { intervention } => !ctx.state.is_active(intervention),
        }
    }
}

/// What a trigger can see when it is evaluated.
pub struct TriggerContext<'a> {
    pub day:            Day,
    pub counts:         CompartmentCounts,
    pub new_infections: usize,
    pub state:          &'a InterventionState,
}

impl TriggerContext<'_> {
    pub fn value(&self, metric: Metric) -> f64 {
        let c = &self.counts;
        let v = match metric {
            Metric::Susceptible   => c[Compartment::S],
            Metric::Exposed       => c[Compartment::E],
            Metric::Infectious    => c.infectious(),
            Metric::Hospitalized  => c.hospital_beds(),
            Metric::Recovered     => c[Compartment::R],
            Metric::Deaths        => c[Compartment::D],
            Metric::Vaccinated    => c[Compartment::V],
            Metric::NewInfections => self.new_infections,
        };
        v as f64
    }
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Trigger {
    #[serde(default)]
    pub day:          Option<Day>,
    #[serde(default)]
    pub conditions:   Vec<Condition>,
    pub intervention: Intervention,
    /// Day the trigger fired, if it has.
    #[serde(default)]
    pub fired_on:     Option<Day>,
}

impl Trigger {
    /// Fire unconditionally on `day`.
    pub fn on_day(day: u32, intervention: Intervention) -> Self {
        Self { day: Some(Day(day)), conditions: Vec::new(), intervention, fired_on: None }
    }

    /// Fire on the first day `condition` holds.
    pub fn when(condition: Condition, intervention: Intervention) -> Self {
        Self { day: None, conditions: vec![condition], intervention, fired_on: None }
    }

    /// Add a further condition.
    pub fn and(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn fired(&self) -> bool {
        self.fired_on.is_some()
    }

    pub fn is_due(&self, ctx: &TriggerContext<'_>) -> bool {
        !self.fired()
            && self.day.is_none_or(|d| d == ctx.day)
            && self.conditions.iter().all(|c| c.holds(ctx))
    }
}

/// Ordered list of triggers.  Triggers due on the same day fire in list
/// order, each seeing the state left by the ones before it.
#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InterventionPlan {
    triggers: Vec<Trigger>,
}

impl InterventionPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_triggers(triggers: Vec<Trigger>) -> Self {
        Self { triggers }
    }

    /// Load a plan from a JSON array of triggers.
    pub fn from_json_str(json: &str) -> InterventionResult<Self> {
        let plan: InterventionPlan = serde_json::from_str(json)?;
        for t in &plan.triggers {
            t.intervention.validate()?;
        }
        Ok(plan)
    }

    pub fn push(&mut self, trigger: Trigger) {
        self.triggers.push(trigger);
    }

    pub fn with(mut self, trigger: Trigger) -> Self {
        self.push(trigger);
        self
    }

    /// Append every trigger of `other`.
    pub fn extend(&mut self, other: InterventionPlan) {
        self.triggers.extend(other.triggers);
    }

    pub fn triggers(&self) -> &[Trigger] {
        &self.triggers
    }

    pub fn len(&self) -> usize {
        self.triggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }

    /// Mark the first due trigger as fired and return its intervention.
    pub fn fire_next(&mut self, ctx: &TriggerContext<'_>) -> Option<Intervention> {
        let t = self.triggers.iter_mut().find(|t| t.is_due(ctx))?;
        t.fired_on = Some(ctx.day);
        log::debug!("{}: trigger fired for {}", ctx.day, t.intervention.kind());
        Some(t.intervention)
    }

    /// Clear the fired mark of every trigger that fired on or after `day`,
    /// so it can fire again when the run passes that point.  Returns how
    /// many were re-armed.
    pub fn rearm_from(&mut self, day: Day) -> usize {
        let mut n = 0;
        for t in &mut self.triggers {
            if t.fired_on.is_some_and(|d| d >= day) {
                t.fired_on = None;
                n += 1;
            }
        }
        n
    }
}
