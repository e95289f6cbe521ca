//! Who-infected-whom.

use std::collections::BTreeMap;

use ep_agent::{InfectionSource, Population};
use ep_core::{Day, PersonId, SymptomClass};
use ep_graph::ContactGraph;
use serde::{Deserialize, Serialize};

/// Seeds shown by [`InfectionTree::forest`] when no limit is given.
pub const DEFAULT_SEED_LIMIT: usize = 5;

/// Transmission edges recorded as infections happen.  Children of each
/// infector are kept in infection order.
#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct InfectionTree {
    seeds:    Vec<PersonId>,
    children: BTreeMap<PersonId, Vec<PersonId>>,
}

/// One node of an expanded subtree.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct TreeNode {
    pub id:          PersonId,
    pub age:         u8,
    pub infected_on: Option<Day>,
    pub symptoms:    Option<SymptomClass>,
    /// `None` when the depth limit cut the tree here; `Some(vec![])` for a
    /// leaf.
    pub children:    Option<Vec<TreeNode>>,
}

impl InfectionTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, source: InfectionSource, p: PersonId) {
        match source {
            InfectionSource::Seed => self.seeds.push(p),
            InfectionSource::Person(infector) => self.children.entry(infector).or_default().push(p),
        }
    }

    /// Keep only infections for which `keep` holds.  Seeds are kept or
    /// dropped the same way; an infector whose own infection is dropped
    /// loses its children too, since they were infected later.
    pub(crate) fn retain(&mut self, mut keep: impl FnMut(PersonId) -> bool) {
        self.seeds.retain(|&p| keep(p));
        for kids in self.children.values_mut() {
            kids.retain(|&p| keep(p));
        }
        self.children.retain(|&infector, kids| !kids.is_empty() && keep(infector));
    }

    pub fn seeds(&self) -> &[PersonId] {
        &self.seeds
    }

    pub fn children_of(&self, p: PersonId) -> &[PersonId] {
        self.children.get(&p).map_or(&[], Vec::as_slice)
    }

    /// Number of people `p` infected.
    pub fn secondary_cases(&self, p: PersonId) -> usize {
        self.children_of(p).len()
    }

    /// Secondary case count of every infector, ascending by id.
    pub fn secondary_case_counts(&self) -> Vec<(PersonId, usize)> {
        self.children.iter().map(|(&p, kids)| (p, kids.len())).collect()
    }

    /// Transmission edges (seeds excluded).
    pub fn edge_count(&self) -> usize {
        self.children.values().map(Vec::len).sum()
    }

    /// Expand the tree under `root` to `max_depth` generations.
    pub fn subtree(
        &self,
        root:       PersonId,
        max_depth:  usize,
        population: &Population,
        graph:      &ContactGraph,
    ) -> TreeNode {
        let record = population.record(root);
        let children = (max_depth > 0).then(|| {
            self.children_of(root)
                .iter()
                .map(|&c| self.subtree(c, max_depth - 1, population, graph))
                .collect()
        });
        TreeNode {
            id:          root,
            age:         graph.demographics(root).age,
            infected_on: record.infection.map(|i| i.day),
            symptoms:    record.symptoms(),
            children,
        }
    }

    /// Subtrees of the first `limit` seeds (default [`DEFAULT_SEED_LIMIT`]).
    pub fn forest(
        &self,
        limit:      Option<usize>,
        max_depth:  usize,
        population: &Population,
        graph:      &ContactGraph,
    ) -> Vec<TreeNode> {
        self.seeds
            .iter()
            .take(limit.unwrap_or(DEFAULT_SEED_LIMIT))
            .map(|&s| self.subtree(s, max_depth, population, graph))
            .collect()
    }
}
