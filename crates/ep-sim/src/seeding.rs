//! Choosing who is infected at the start of an outbreak.

use std::cmp::Reverse;

use ep_agent::Population;
use ep_core::{Compartment, PersonId, SimRng};
use ep_graph::ContactGraph;
use serde::{Deserialize, Serialize};

/// How [`Sim::seed_infections`](crate::Sim::seed_infections) picks its
/// targets.  Only susceptible people are ever chosen.
#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum SeedMethod {
    /// Uniformly at random.
    #[default]
    Random,
    /// Highest contact degree first.
    Hubs,
    /// Highest current mobility first.
    Mobile,
    /// Uniformly among people whose age is in `min_age..=max_age`.
    AgeTargeted { min_age: u8, max_age: u8 },
    /// Exactly these people; ids that are out of range or not susceptible
    /// are skipped.
    Explicit(Vec<PersonId>),
}

impl SeedMethod {
    /// Up to `n` distinct susceptible targets.
    pub(crate) fn choose(
        &self,
        n:          usize,
        population: &Population,
        graph:      &ContactGraph,
        rng:        &mut SimRng,
    ) -> Vec<PersonId> {
        let mut pool = population.sorted_members(Compartment::S);
        match self {
            SeedMethod::Random => rng.sample(&pool, n),
            SeedMethod::Hubs => {
                pool.sort_by_key(|&p| Reverse(graph.degree(p)));
                pool.truncate(n);
                pool
            }
            SeedMethod::Mobile => {
                pool.sort_by(|&a, &b| {
                    population.record(b).mobility.total_cmp(&population.record(a).mobility)
                });
                pool.truncate(n);
                pool
            }
            SeedMethod::AgeTargeted { min_age, max_age } => {
                pool.retain(|&p| (*min_age..=*max_age).contains(&graph.demographics(p).age));
                rng.sample(&pool, n)
            }
            SeedMethod::Explicit(ids) => {
                let mut chosen: Vec<PersonId> = Vec::new();
                for &p in ids {
                    if p.index() < population.len()
                        && population.compartment(p) == Compartment::S
                        && !chosen.contains(&p)
                    {
                        chosen.push(p);
                    }
                }
                chosen.truncate(n);
                chosen
            }
        }
    }
}
