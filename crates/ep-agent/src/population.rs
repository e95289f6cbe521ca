//! `Population` — health records plus the registry that indexes them.

use ep_core::{Compartment, CompartmentCounts, PersonId};
use ep_graph::ContactGraph;

use crate::{AgentError, AgentResult, HealthRecord, StateRegistry};

#[derive(Clone, Debug)]
pub struct Population {
    records:  Vec<HealthRecord>,
    registry: StateRegistry,
}

impl Population {
    /// Everyone susceptible, mobility at each person's baseline.
    pub fn from_graph(graph: &ContactGraph) -> Self {
        let records: Vec<HealthRecord> = graph
            .people()
            .iter()
            .map(|d| HealthRecord::new(d.mobility))
            .collect();
        let registry = StateRegistry::all_susceptible(records.len());
        Self { records, registry }
    }

    /// Adopt externally supplied records (e.g. from a saved snapshot).
    pub fn from_records(records: Vec<HealthRecord>) -> Self {
        let registry = StateRegistry::from_records(&records);
        Self { records, registry }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    // ── Records ───────────────────────────────────────────────────────────

    #[inline]
    pub fn record(&self, p: PersonId) -> &HealthRecord {
        &self.records[p.index()]
    }

    /// Mutable access to everything except the compartment.
    #[inline]
    pub fn record_mut(&mut self, p: PersonId) -> &mut HealthRecord {
        &mut self.records[p.index()]
    }

    pub fn records(&self) -> &[HealthRecord] {
        &self.records
    }

    /// Apply `f` to every record, in id order.
    pub fn for_each_record_mut(&mut self, mut f: impl FnMut(PersonId, &mut HealthRecord)) {
        for (i, r) in self.records.iter_mut().enumerate() {
            f(PersonId(i as u32), r);
        }
    }

    #[inline]
    pub fn compartment(&self, p: PersonId) -> Compartment {
        self.records[p.index()].compartment()
    }

    // ── Transitions ───────────────────────────────────────────────────────

    /// Move `p` to `to`, resetting their days-in-state.  Returns the
    /// previous compartment.  Moving to the current compartment is a no-op.
    pub fn set_compartment(&mut self, p: PersonId, to: Compartment) -> Compartment {
        let record = &mut self.records[p.index()];
        let from = record.compartment();
        if from != to {
            self.registry.relocate(p, from, to);
            record.set_compartment_unchecked(to);
            record.days_in_state = 0;
            log::trace!("{p}: {from} -> {to}");
        }
        from
    }

    /// Overwrite every compartment from a snapshot and rebuild the registry.
    /// People whose compartment changes get their days-in-state reset.
    pub fn overwrite_compartments(&mut self, compartments: &[Compartment]) -> AgentResult<()> {
        if compartments.len() != self.records.len() {
            return Err(AgentError::LengthMismatch {
                expected: self.records.len(),
                got:      compartments.len(),
                what:     "compartment snapshot",
            });
        }
        for (r, &c) in self.records.iter_mut().zip(compartments) {
            if r.compartment() != c {
                r.set_compartment_unchecked(c);
                r.days_in_state = 0;
            }
        }
        self.registry = StateRegistry::from_records(&self.records);
        Ok(())
    }

    // ── Queries ───────────────────────────────────────────────────────────

    pub fn registry(&self) -> &StateRegistry {
        &self.registry
    }

    #[inline]
    pub fn count(&self, c: Compartment) -> usize {
        self.registry.count(c)
    }

    pub fn counts(&self) -> CompartmentCounts {
        self.registry.counts()
    }

    pub fn sorted_members(&self, c: Compartment) -> Vec<PersonId> {
        self.registry.sorted_members(c)
    }

    /// Every infectious person, any subtype, ascending id.
    pub fn infectious_sorted(&self) -> Vec<PersonId> {
        let mut v: Vec<PersonId> = Compartment::ALL
            .iter()
            .filter(|c| c.is_infectious())
            .flat_map(|&c| self.registry.members(c).iter().copied())
            .collect();
        v.sort_unstable();
        v
    }

    /// Snapshot of every compartment in id order.
    pub fn compartments(&self) -> Vec<Compartment> {
        self.records.iter().map(HealthRecord::compartment).collect()
    }

    /// Verify the partition invariant.
    pub fn check_partition(&self) -> AgentResult<()> {
        self.registry.check(&self.records)
    }
}
