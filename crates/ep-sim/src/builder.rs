//! Fluent builder for constructing a [`Sim`].

use ep_core::SimConfig;
use ep_disease::DiseaseParameters;
use ep_graph::ContactGraph;
use ep_intervention::{InterventionPlan, Scenario};

use crate::{Sim, SimError, SimResult};

/// Fluent builder for [`Sim`].
///
/// # Required inputs
///
/// - [`ContactGraph`] — the finished, immutable contact structure
/// - [`DiseaseParameters`] — e.g. from [`ep_disease::library`]
///
/// # Optional inputs (have defaults)
///
/// | Method           | Default                    |
/// |------------------|----------------------------|
/// | `.config(c)`     | `SimConfig::default()`     |
/// | `.plan(p)`       | Empty plan                 |
/// | `.scenario(s)`   | Appends the preset's plan  |
/// | `.seed(s)`       | `config.seed`              |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(graph, DiseaseParameters::default())
///     .config(SimConfig { days: 120, ..SimConfig::default() })
///     .scenario(Scenario::DelayedResponse)
///     .build()?;
/// sim.seed_infections(5, &SeedMethod::Hubs);
/// sim.run_to_end(&mut NoopObserver);
/// ```
pub struct SimBuilder {
    graph:   ContactGraph,
    disease: DiseaseParameters,
    config:  SimConfig,
    plan:    InterventionPlan,
    seed:    Option<u64>,
}

impl SimBuilder {
    pub fn new(graph: ContactGraph, disease: DiseaseParameters) -> Self {
        Self {
            graph,
            disease,
            config: SimConfig::default(),
            plan:   InterventionPlan::new(),
            seed:   None,
        }
    }

    pub fn config(mut self, config: SimConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the intervention plan.
    pub fn plan(mut self, plan: InterventionPlan) -> Self {
        self.plan = plan;
        self
    }

    /// Append the triggers of a preset scenario to the plan.
    pub fn scenario(mut self, scenario: Scenario) -> Self {
        self.plan.extend(scenario.plan());
        self
    }

    /// Override `config.seed`.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validate all inputs and construct the [`Sim`].
    ///
    /// # Errors
    ///
    /// - [`SimError::Core`] if the run configuration is out of range.
    /// - [`SimError::Disease`] if the disease parameters are invalid.
    /// - [`SimError::Intervention`] if a planned intervention is invalid.
    /// - [`SimError::Config`] if the graph has no people.
    pub fn build(self) -> SimResult<Sim> {
        let mut config = self.config;
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        config.validate()?;
        self.disease.validate()?;
        for trigger in self.plan.triggers() {
            trigger.intervention.validate()?;
        }
        if self.graph.is_empty() {
            return Err(SimError::Config("contact graph has no people".into()));
        }
        Ok(Sim::new(self.graph, self.disease, config, self.plan))
    }
}
