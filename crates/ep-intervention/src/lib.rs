//! `ep-intervention` — public-health measures applied to a running epidemic.
//!
//! An intervention has two effects:
//!
//! 1. an entry in [`InterventionState`], which the transmission model reads
//!    through [`InterventionState::measures`];
//! 2. optional one-off mutations of person records, contact flags, or the
//!    event queue, performed by [`InterventionState::apply`].
//!
//! | Intervention           | Entry read by transmission | Mutation on apply                          |
//! |------------------------|----------------------------|--------------------------------------------|
//! | `lockdown`             | –                          | mobility ×(1−strictness), isolation        |
//! | `social_distancing`    | distancing factor          | –                                          |
//! | `mask_mandate`         | mask efficacy              | mask flag per compliance roll              |
//! | `vaccination`          | –                          | S → V by priority, daily while it lasts    |
//! | `testing`              | –                          | isolate events for positives               |
//! | `isolation`            | –                          | isolation flag for symptomatic people      |
//! | `travel_restrictions`  | random-contact reduction   | random contacts deactivated                |
//! | `hygiene`              | environment factor         | –                                          |
//! | `ventilation`          | environment factor         | –                                          |
//! | `reopen`               | –                          | lockdown removed, mobility restored        |
//!
//! Interventions can be applied directly, or planned with [`Trigger`]s that
//! fire on a given day and/or when the epidemic crosses a threshold.
//! [`Scenario`] bundles the preset plans.

pub mod apply;
pub mod error;
pub mod params;
pub mod scenario;
pub mod state;
pub mod trigger;

#[cfg(test)]
mod tests;

pub use apply::{ApplyContext, ApplyReport};
pub use error::{InterventionError, InterventionResult};
pub use params::{
    DistancingParams, HygieneParams, Intervention, IsolationParams, LockdownParams, MaskParams,
    Priority, ReopenParams, TestingParams, TravelParams, VaccinationParams, VentilationParams,
};
pub use scenario::{default_policy, Scenario};
pub use state::{ActiveIntervention, InterventionState, REOPEN_RAMP_DAYS};
pub use trigger::{Comparison, Condition, InterventionPlan, Metric, Trigger, TriggerContext};
