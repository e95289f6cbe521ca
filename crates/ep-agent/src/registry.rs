//! `StateRegistry` — per-compartment membership lists.
//!
//! Each compartment owns a `Vec<PersonId>`; each person remembers their slot
//! in that vector.  Moving a person is a swap-remove plus a push, O(1).
//! Member order is a deterministic function of the sequence of moves, but it
//! is not sorted: callers that draw randomness per member should iterate
//! [`sorted_members`](StateRegistry::sorted_members) so the draw order does
//! not depend on how the registry was built.

use ep_core::{Compartment, CompartmentCounts, PersonId};

use crate::{AgentError, AgentResult, HealthRecord};

#[derive(Clone, Debug)]
pub struct StateRegistry {
    members: [Vec<PersonId>; Compartment::COUNT],
    /// Position of each person inside their compartment's vector.
    slot:    Vec<u32>,
}

impl StateRegistry {
    /// Everyone starts in S, in id order.
    pub fn all_susceptible(n: usize) -> Self {
        let mut members: [Vec<PersonId>; Compartment::COUNT] = Default::default();
        members[Compartment::S.index()] = (0..n as u32).map(PersonId).collect();
        Self { members, slot: (0..n as u32).collect() }
    }

    /// Rebuild from the compartment stored in each record.
    pub fn from_records(records: &[HealthRecord]) -> Self {
        let mut members: [Vec<PersonId>; Compartment::COUNT] = Default::default();
        let mut slot = Vec::with_capacity(records.len());
        for (i, r) in records.iter().enumerate() {
            let list = &mut members[r.compartment().index()];
            slot.push(list.len() as u32);
            list.push(PersonId(i as u32));
        }
        Self { members, slot }
    }

    /// Move `p` from `from` to `to`.  The caller guarantees `p` is in `from`.
    pub(crate) fn relocate(&mut self, p: PersonId, from: Compartment, to: Compartment) {
        if from == to {
            return;
        }
        let list = &mut self.members[from.index()];
        let at = self.slot[p.index()] as usize;
        list.swap_remove(at);
        if let Some(&moved) = list.get(at) {
            self.slot[moved.index()] = at as u32;
        }
        let dest = &mut self.members[to.index()];
        self.slot[p.index()] = dest.len() as u32;
        dest.push(p);
    }

    #[inline]
    pub fn members(&self, c: Compartment) -> &[PersonId] {
        &self.members[c.index()]
    }

    /// Members of `c` in ascending id order.
    pub fn sorted_members(&self, c: Compartment) -> Vec<PersonId> {
        let mut v = self.members[c.index()].clone();
        v.sort_unstable();
        v
    }

    #[inline]
    pub fn count(&self, c: Compartment) -> usize {
        self.members[c.index()].len()
    }

    pub fn counts(&self) -> CompartmentCounts {
        let mut counts = CompartmentCounts::default();
        for c in Compartment::ALL {
            counts[c] = self.count(c);
        }
        counts
    }

    /// Whether `p` is listed under `c`.
    pub fn contains(&self, c: Compartment, p: PersonId) -> bool {
        self.members[c.index()]
            .get(self.slot[p.index()] as usize)
            .is_some_and(|&q| q == p)
    }

    /// Verify that the lists partition the population and agree with the
    /// records.
    pub fn check(&self, records: &[HealthRecord]) -> AgentResult<()> {
        let registered: usize = self.members.iter().map(Vec::len).sum();
        if registered != records.len() || self.slot.len() != records.len() {
            return Err(AgentError::CountMismatch { population: records.len(), registered });
        }
        for (i, r) in records.iter().enumerate() {
            let p = PersonId(i as u32);
            if !self.contains(r.compartment(), p) {
                let registered = Compartment::ALL
                    .into_iter()
                    .find(|&c| self.contains(c, p))
                    .ok_or(AgentError::Unregistered(p))?;
                return Err(AgentError::PartitionViolation {
                    person: p,
                    recorded: r.compartment(),
                    registered,
                });
            }
        }
        Ok(())
    }
}
