//! `ContactGraph` and its builder.

use ep_core::{ContactId, PersonId};
use rustc_hash::FxHashMap;

use crate::{Contact, ContactAttrs, ContactKind, Demographics, GraphError, GraphResult};

// ── ContactGraph ─────────────────────────────────────────────────────────────

/// Undirected contact graph in CSR format.
///
/// Do not construct directly; use [`ContactGraphBuilder`].
#[derive(Clone, Debug)]
pub struct ContactGraph {
    people:      Vec<Demographics>,
    contacts:    Vec<Contact>,
    /// CSR row pointer.  Length = `person_count + 1`.
    adj_start:   Vec<u32>,
    adj_person:  Vec<PersonId>,
    adj_contact: Vec<ContactId>,
    /// Per-contact enabled flag.  The only mutable part of the graph.
    active:      Vec<bool>,
}

impl ContactGraph {
    /// Graph with no people and no contacts.
    pub fn empty() -> Self {
        ContactGraphBuilder::new().build()
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn person_count(&self) -> usize {
        self.people.len()
    }

    pub fn contact_count(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    /// All person ids in ascending order.
    pub fn person_ids(&self) -> impl Iterator<Item = PersonId> + '_ {
        (0..self.people.len()).map(|i| PersonId(i as u32))
    }

    // ── Attributes ────────────────────────────────────────────────────────

    #[inline]
    pub fn demographics(&self, p: PersonId) -> &Demographics {
        &self.people[p.index()]
    }

    pub fn people(&self) -> &[Demographics] {
        &self.people
    }

    #[inline]
    pub fn contact(&self, c: ContactId) -> &Contact {
        &self.contacts[c.index()]
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    // ── Traversal ─────────────────────────────────────────────────────────

    /// `(neighbour, contact)` pairs of `p`, active or not.  Contiguous scan.
    #[inline]
    pub fn neighbors(&self, p: PersonId) -> impl Iterator<Item = (PersonId, ContactId)> + '_ {
        let start = self.adj_start[p.index()] as usize;
        let end   = self.adj_start[p.index() + 1] as usize;
        self.adj_person[start..end]
            .iter()
            .copied()
            .zip(self.adj_contact[start..end].iter().copied())
    }

    /// Neighbours reachable over currently active contacts.
    pub fn active_neighbors(&self, p: PersonId) -> impl Iterator<Item = (PersonId, ContactId)> + '_ {
        self.neighbors(p).filter(move |&(_, c)| self.active[c.index()])
    }

    /// Number of contacts of `p`, including inactive ones.
    #[inline]
    pub fn degree(&self, p: PersonId) -> usize {
        (self.adj_start[p.index() + 1] - self.adj_start[p.index()]) as usize
    }

    /// Mean degree over all people (0 for an empty graph).
    pub fn mean_degree(&self) -> f64 {
        if self.people.is_empty() {
            return 0.0;
        }
        2.0 * self.contacts.len() as f64 / self.people.len() as f64
    }

    /// The contact joining `a` and `b`, if any.
    pub fn contact_between(&self, a: PersonId, b: PersonId) -> Option<ContactId> {
        let (small, other) = if self.degree(a) <= self.degree(b) { (a, b) } else { (b, a) };
        self.neighbors(small).find(|&(n, _)| n == other).map(|(_, c)| c)
    }

    // ── Active flags ──────────────────────────────────────────────────────

    #[inline]
    pub fn is_active(&self, c: ContactId) -> bool {
        self.active[c.index()]
    }

    #[inline]
    pub fn set_active(&mut self, c: ContactId, active: bool) {
        self.active[c.index()] = active;
    }

    /// Re-enable every contact.
    pub fn activate_all(&mut self) {
        self.active.iter_mut().for_each(|a| *a = true);
    }

    pub fn active_flags(&self) -> &[bool] {
        &self.active
    }

    /// Replace all active flags (used when restoring a saved snapshot).
    pub fn restore_active_flags(&mut self, flags: &[bool]) -> GraphResult<()> {
        if flags.len() != self.active.len() {
            return Err(GraphError::ContactCountMismatch {
                expected: self.active.len(),
                got:      flags.len(),
            });
        }
        self.active.copy_from_slice(flags);
        Ok(())
    }

    pub fn inactive_count(&self) -> usize {
        self.active.iter().filter(|a| !**a).count()
    }
}

// ── ContactGraphBuilder ──────────────────────────────────────────────────────

/// Construct a [`ContactGraph`] incrementally, then call [`build`](Self::build).
///
/// Duplicate contacts between the same pair are merged: the first one added
/// wins and its id is returned for the later calls.
///
/// # Example
///
/// ```
/// use ep_graph::{ContactAttrs, ContactGraphBuilder, ContactKind, Demographics};
///
/// let mut b = ContactGraphBuilder::new();
/// let x = b.add_person(Demographics::with_age(30)).unwrap();
/// let y = b.add_person(Demographics::with_age(60)).unwrap();
/// b.add_contact(x, y, ContactAttrs::new(ContactKind::Household)).unwrap();
/// let g = b.build();
/// assert_eq!(g.degree(x), 1);
/// assert_eq!(g.contact_count(), 1);
/// ```
#[derive(Default)]
pub struct ContactGraphBuilder {
    people:   Vec<Demographics>,
    contacts: Vec<Contact>,
    pairs:    FxHashMap<(u32, u32), ContactId>,
}

impl ContactGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocate for the expected number of people and contacts.
    pub fn with_capacity(people: usize, contacts: usize) -> Self {
        let mut pairs = FxHashMap::default();
        pairs.reserve(contacts);
        Self {
            people:   Vec::with_capacity(people),
            contacts: Vec::with_capacity(contacts),
            pairs,
        }
    }

    pub fn person_count(&self) -> usize {
        self.people.len()
    }

    /// Add a person and return their id.
    pub fn add_person(&mut self, demographics: Demographics) -> GraphResult<PersonId> {
        demographics.validate()?;
        let id = PersonId(self.people.len() as u32);
        self.people.push(demographics);
        Ok(id)
    }

    /// Add an undirected contact between `a` and `b`.
    pub fn add_contact(
        &mut self,
        a:     PersonId,
        b:     PersonId,
        attrs: ContactAttrs,
    ) -> GraphResult<ContactId> {
        for p in [a, b] {
            if p.index() >= self.people.len() {
                return Err(GraphError::UnknownPerson(p));
            }
        }
        if a == b {
            return Err(GraphError::SelfContact(a));
        }
        if !attrs.weight.is_finite() || attrs.weight < 0.0 {
            return Err(GraphError::InvalidWeight(attrs.weight));
        }
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        if let Some(&existing) = self.pairs.get(&(lo.0, hi.0)) {
            log::trace!("duplicate contact {lo}-{hi} merged into {existing}");
            return Ok(existing);
        }
        let id = ContactId(self.contacts.len() as u32);
        self.contacts.push(Contact { a: lo, b: hi, attrs });
        self.pairs.insert((lo.0, hi.0), id);
        Ok(id)
    }

    /// Sort adjacency into CSR arrays.  All contacts start active.
    pub fn build(self) -> ContactGraph {
        let n = self.people.len();

        let mut degree = vec![0u32; n];
        for c in &self.contacts {
            degree[c.a.index()] += 1;
            degree[c.b.index()] += 1;
        }

        let mut adj_start = Vec::with_capacity(n + 1);
        let mut running = 0u32;
        adj_start.push(0);
        for d in &degree {
            running += d;
            adj_start.push(running);
        }

        let total = running as usize;
        let mut adj_person  = vec![PersonId::INVALID; total];
        let mut adj_contact = vec![ContactId::INVALID; total];
        let mut cursor: Vec<u32> = adj_start[..n].to_vec();

        // Contacts are visited in id order, so each row ends up sorted by
        // contact id: traversal order is a pure function of insertion order.
        for (i, c) in self.contacts.iter().enumerate() {
            let id = ContactId(i as u32);
            for (from, to) in [(c.a, c.b), (c.b, c.a)] {
                let slot = cursor[from.index()] as usize;
                adj_person[slot]  = to;
                adj_contact[slot] = id;
                cursor[from.index()] += 1;
            }
        }

        let active = vec![true; self.contacts.len()];
        ContactGraph {
            people: self.people,
            contacts: self.contacts,
            adj_start,
            adj_person,
            adj_contact,
            active,
        }
    }
}

/// Complete graph over `people`, every contact of the given kind.
pub fn complete(people: Vec<Demographics>, kind: ContactKind) -> GraphResult<ContactGraph> {
    let n = people.len();
    let mut b = ContactGraphBuilder::with_capacity(n, n * n.saturating_sub(1) / 2);
    for d in people {
        b.add_person(d)?;
    }
    for i in 0..n as u32 {
        for j in (i + 1)..n as u32 {
            b.add_contact(PersonId(i), PersonId(j), ContactAttrs::new(kind))?;
        }
    }
    Ok(b.build())
}
