//! `EventQueue` — min-heap of future events.
//!
//! Push and pop are O(log n).  Alongside the heap the queue keeps a set of
//! pending events (to reject exact duplicates) and the day of each person's
//! pending terminal event (to reject a second recover/die).

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use ep_core::{Day, PersonId};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::{ScheduleError, ScheduleResult, ScheduledEvent};

#[derive(Clone, Debug)]
struct Entry {
    seq:   u64,
    event: ScheduledEvent,
}

impl Entry {
    fn key(&self) -> (Day, u8, u64) {
        (self.event.day, self.event.action.rank(), self.seq)
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

/// Future events ordered by trigger day.
///
/// Serializes as the list of pending events in pop order; deserializing
/// re-pushes them, which preserves that order.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(into = "Vec<ScheduledEvent>", try_from = "Vec<ScheduledEvent>")]
pub struct EventQueue {
    heap:     BinaryHeap<Reverse<Entry>>,
    pending:  FxHashSet<ScheduledEvent>,
    terminal: FxHashMap<PersonId, Day>,
    next_seq: u64,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a queue from events listed in pop order.
    pub fn from_events(events: impl IntoIterator<Item = ScheduledEvent>) -> ScheduleResult<Self> {
        let mut queue = Self::new();
        for e in events {
            queue.push(e)?;
        }
        Ok(queue)
    }

    /// Queue `event`.
    ///
    /// Rejects an event identical to one already pending, a person event
    /// without a target, and a second terminal event for the same person.
    pub fn push(&mut self, event: ScheduledEvent) -> ScheduleResult<()> {
        if event.action.needs_target() && event.target.is_none() {
            return Err(ScheduleError::MissingTarget(event));
        }
        if self.pending.contains(&event) {
            return Err(ScheduleError::Duplicate(event));
        }
        if event.action.is_terminal() {
            if let Some(person) = event.target {
                if let Some(&pending) = self.terminal.get(&person) {
                    return Err(ScheduleError::TerminalConflict { person, pending });
                }
                self.terminal.insert(person, event.day);
            }
        }
        self.pending.insert(event);
        self.heap.push(Reverse(Entry { seq: self.next_seq, event }));
        self.next_seq += 1;
        Ok(())
    }

    /// Remove and return every event due on or before `today`, in pop order.
    pub fn pop_due(&mut self, today: Day) -> Vec<ScheduledEvent> {
        let mut due = Vec::new();
        while self.heap.peek().is_some_and(|Reverse(e)| e.event.day <= today) {
            if let Some(Reverse(entry)) = self.heap.pop() {
                self.forget(&entry.event);
                if entry.event.day < today {
                    log::debug!("event {:?} was overdue on {today}", entry.event);
                }
                due.push(entry.event);
            }
        }
        due
    }

    /// Drop every pending event targeting `person`.  Returns how many were
    /// removed.
    pub fn cancel_for(&mut self, person: PersonId) -> usize {
        self.retain(|e| e.target != Some(person))
    }

    /// Keep only the events for which `keep` returns `true`.  Returns how
    /// many were removed.
    pub fn retain(&mut self, mut keep: impl FnMut(&ScheduledEvent) -> bool) -> usize {
        let before = self.heap.len();
        let entries = std::mem::take(&mut self.heap).into_vec();
        let mut kept = Vec::with_capacity(entries.len());
        for Reverse(entry) in entries {
            if keep(&entry.event) {
                kept.push(Reverse(entry));
            } else {
                self.forget(&entry.event);
            }
        }
        self.heap = BinaryHeap::from(kept);
        before - self.heap.len()
    }

    fn forget(&mut self, event: &ScheduledEvent) {
        self.pending.remove(event);
        if event.action.is_terminal() {
            if let Some(p) = event.target {
                self.terminal.remove(&p);
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// The earliest pending trigger day, or `None` if empty.
    pub fn next_day(&self) -> Option<Day> {
        self.heap.peek().map(|Reverse(e)| e.event.day)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Day of `person`'s pending recover/die event, if any.
    pub fn pending_terminal(&self, person: PersonId) -> Option<Day> {
        self.terminal.get(&person).copied()
    }

    /// Every pending event for `person`, in pop order.
    pub fn pending_for(&self, person: PersonId) -> Vec<ScheduledEvent> {
        let mut entries: Vec<&Entry> = self
            .heap
            .iter()
            .map(|Reverse(e)| e)
            .filter(|e| e.event.target == Some(person))
            .collect();
        entries.sort();
        entries.into_iter().map(|e| e.event).collect()
    }

    /// Every pending event, in pop order.
    pub fn events(&self) -> Vec<ScheduledEvent> {
        let mut entries: Vec<&Entry> = self.heap.iter().map(|Reverse(e)| e).collect();
        entries.sort();
        entries.into_iter().map(|e| e.event).collect()
    }
}

impl From<EventQueue> for Vec<ScheduledEvent> {
    fn from(queue: EventQueue) -> Self {
        queue.events()
    }
}

impl TryFrom<Vec<ScheduledEvent>> for EventQueue {
    type Error = ScheduleError;

    fn try_from(events: Vec<ScheduledEvent>) -> ScheduleResult<Self> {
        EventQueue::from_events(events)
    }
}
