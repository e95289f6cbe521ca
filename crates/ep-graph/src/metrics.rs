//! Structural metrics relevant to spread.

use std::collections::VecDeque;

use ep_core::PersonId;
use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::ContactGraph;

/// Fraction of people (by descending degree) counted as super-spreaders.
const SUPERSPREADER_FRACTION: f64 = 0.05;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GraphMetrics {
    pub person_count:              usize,
    pub contact_count:             usize,
    pub mean_degree:               f64,
    pub max_degree:                usize,
    pub density:                   f64,
    /// Mean local clustering coefficient (people of degree < 2 count as 0).
    pub mean_clustering:           f64,
    /// Connected components over all contacts, active or not.
    pub components:                usize,
    pub superspreader_count:       usize,
    pub superspreader_mean_degree: f64,
}

impl GraphMetrics {
    pub fn compute(graph: &ContactGraph) -> Self {
        let n = graph.person_count();
        let degrees: Vec<usize> = graph.person_ids().map(|p| graph.degree(p)).collect();

        let density = if n < 2 {
            0.0
        } else {
            2.0 * graph.contact_count() as f64 / (n as f64 * (n - 1) as f64)
        };

        let mut sorted = degrees.clone();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        let top = if n == 0 {
            0
        } else {
            ((SUPERSPREADER_FRACTION * n as f64) as usize).max(1)
        };
        let superspreader_mean_degree = if top == 0 {
            0.0
        } else {
            sorted[..top].iter().sum::<usize>() as f64 / top as f64
        };

        Self {
            person_count: n,
            contact_count: graph.contact_count(),
            mean_degree: graph.mean_degree(),
            max_degree: sorted.first().copied().unwrap_or(0),
            density,
            mean_clustering: mean_clustering(graph),
            components: component_count(graph),
            superspreader_count: top,
            superspreader_mean_degree,
        }
    }
}

fn mean_clustering(graph: &ContactGraph) -> f64 {
    let n = graph.person_count();
    if n == 0 {
        return 0.0;
    }
    let mut total = 0.0;
    for p in graph.person_ids() {
        let nbrs: Vec<PersonId> = graph.neighbors(p).map(|(q, _)| q).collect();
        let k = nbrs.len();
        if k < 2 {
            continue;
        }
        let set: FxHashSet<PersonId> = nbrs.iter().copied().collect();
        let mut links = 0usize;
        for &q in &nbrs {
            links += graph.neighbors(q).filter(|(r, _)| set.contains(r)).count();
        }
        // each neighbour-neighbour link was seen from both ends
        total += links as f64 / (k * (k - 1)) as f64;
    }
    total / n as f64
}

fn component_count(graph: &ContactGraph) -> usize {
    let n = graph.person_count();
    let mut seen = vec![false; n];
    let mut queue = VecDeque::new();
    let mut components = 0;
    for start in graph.person_ids() {
        if seen[start.index()] {
            continue;
        }
        components += 1;
        seen[start.index()] = true;
        queue.push_back(start);
        while let Some(p) = queue.pop_front() {
            for (q, _) in graph.neighbors(p) {
                if !seen[q.index()] {
                    seen[q.index()] = true;
                    queue.push_back(q);
                }
            }
        }
    }
    components
}
