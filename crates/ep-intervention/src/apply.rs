//! Applying, ending, and advancing interventions.
//!
//! Every randomised choice iterates people (or contacts) in ascending id
//! order and draws from the engine's single generator, so application is
//! reproducible from the same state and seed.

use ep_agent::{Population, Vaccination};
use ep_core::{Compartment, ContactId, Day, InterventionKind, PersonId, SimRng};
use ep_disease::VaccineProfile;
use ep_graph::{ContactGraph, ContactKind};
use ep_schedule::{EventAction, EventQueue, ScheduledEvent};
use serde::{Deserialize, Serialize};

use crate::{
    ActiveIntervention, Intervention, InterventionResult, InterventionState, IsolationParams,
    LockdownParams, MaskParams, Priority, REOPEN_RAMP_DAYS, ReopenParams, TestingParams,
    TravelParams, VaccinationParams,
};

/// Mutable engine state an intervention may touch.
pub struct ApplyContext<'a> {
    pub day:        Day,
    pub population: &'a mut Population,
    pub graph:      &'a mut ContactGraph,
    pub queue:      &'a mut EventQueue,
    pub rng:        &'a mut SimRng,
    pub vaccine:    &'a VaccineProfile,
}

/// What one application (or expiry, or daily step) changed.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct ApplyReport {
    pub kind:             InterventionKind,
    pub day:              Day,
    /// People whose record was modified.
    pub people_affected:  usize,
    pub doses:            usize,
    /// Doses that moved the person to V.
    pub vaccinated:       usize,
    /// Contacts activated or deactivated.
    pub contacts_changed: usize,
    pub events_scheduled: usize,
}

impl ApplyReport {
    pub fn new(kind: InterventionKind, day: Day) -> Self {
        Self {
            kind,
            day,
            people_affected:  0,
            doses:            0,
            vaccinated:       0,
            contacts_changed: 0,
            events_scheduled: 0,
        }
    }
}

impl InterventionState {
    /// Apply `cmd` on `ctx.day`: perform its mutations, record its entry,
    /// and schedule its end if it has a duration.
    pub fn apply(
        &mut self,
        cmd: Intervention,
        ctx: &mut ApplyContext<'_>,
    ) -> InterventionResult<ApplyReport> {
        cmd.validate()?;
        let kind = cmd.kind();
        let mut report = match cmd {
            Intervention::Lockdown(p) => lockdown(&p, ctx),
            Intervention::MaskMandate(p) => masks(&p, ctx),
            Intervention::Vaccination(p) => vaccinate_batch(&p, ctx),
            Intervention::Testing(p) => testing(&p, ctx),
            Intervention::Isolation(p) => isolation(&p, ctx),
            Intervention::TravelRestrictions(p) => restrict_travel(&p, ctx),
            Intervention::Reopen(p) => {
                let report = self.reopen(&p, ctx);
                log::info!("{}: applied {cmd}", ctx.day);
                return Ok(report);
            }
            Intervention::SocialDistancing(_)
            | Intervention::Hygiene(_)
            | Intervention::Ventilation(_) => ApplyReport::new(kind, ctx.day),
        };

        // A re-application supersedes any expiry scheduled by the previous one.
        let end = EventAction::EndIntervention(kind);
        ctx.queue.retain(|e| e.action != end);
        let ends_on = cmd.duration().map(|d| ctx.day + d);
        if let Some(on) = ends_on {
            match ctx.queue.push(ScheduledEvent::end_intervention(on, kind)) {
                Ok(()) => report.events_scheduled += 1,
                Err(e) => log::warn!("{}: could not schedule end of {kind}: {e}", ctx.day),
            }
        }
        self.insert(ActiveIntervention { intervention: cmd, since: ctx.day, ends_on });
        log::info!(
            "{}: applied {cmd}; {} people affected, {} contacts changed",
            ctx.day,
            report.people_affected,
            report.contacts_changed
        );
        Ok(report)
    }

    /// Handle an `end_<kind>` event.  Ending travel restrictions reactivates
    /// the random-type contacts.  Returns `None` if `kind` was not active.
    pub fn end(&mut self, kind: InterventionKind, ctx: &mut ApplyContext<'_>) -> Option<ApplyReport> {
        self.remove(kind)?;
        let mut report = ApplyReport::new(kind, ctx.day);
        if kind == InterventionKind::TravelRestrictions {
            report.contacts_changed = reactivate_random_contacts(ctx.graph);
        }
        log::info!("{}: ended {kind}", ctx.day);
        Some(report)
    }

    /// Per-day work of long-running interventions: campaigns with a
    /// duration dose a new batch, and a gradual reopening takes one more
    /// step.  Entries applied today are skipped.
    pub fn daily_update(&mut self, ctx: &mut ApplyContext<'_>) -> Vec<ApplyReport> {
        let mut reports = Vec::new();
        if let Some(entry) = self.get(InterventionKind::Vaccination).copied() {
            if let Intervention::Vaccination(p) = entry.intervention {
                if entry.ends_on.is_some() && entry.since < ctx.day {
                    reports.push(vaccinate_batch(&p, ctx));
                }
            }
        }
        if let Some(entry) = self.get(InterventionKind::Reopen).copied() {
            if entry.since < ctx.day {
                let elapsed = ctx.day.since(entry.since);
                let remaining = REOPEN_RAMP_DAYS.saturating_sub(elapsed);
                reports.push(ramp_mobility(remaining, ctx));
                if remaining <= 1 {
                    self.remove(InterventionKind::Reopen);
                    log::info!("{}: reopening complete", ctx.day);
                }
            }
        }
        reports
    }

    fn reopen(&mut self, p: &ReopenParams, ctx: &mut ApplyContext<'_>) -> ApplyReport {
        self.remove(InterventionKind::Lockdown);
        let end_lockdown = EventAction::EndIntervention(InterventionKind::Lockdown);
        ctx.queue.retain(|e| e.action != end_lockdown);

        ctx.population.for_each_record_mut(|_, r| r.isolated = false);
        if p.gradual {
            self.insert(ActiveIntervention {
                intervention: Intervention::Reopen(*p),
                since:        ctx.day,
                ends_on:      None,
            });
            ramp_mobility(REOPEN_RAMP_DAYS, ctx)
        } else {
            self.remove(InterventionKind::Reopen);
            ramp_mobility(1, ctx)
        }
    }
}

// ── Individual interventions ─────────────────────────────────────────────────

fn lockdown(p: &LockdownParams, ctx: &mut ApplyContext<'_>) -> ApplyReport {
    let mut report = ApplyReport::new(InterventionKind::Lockdown, ctx.day);
    let isolate = p.strictness > LockdownParams::ISOLATION_THRESHOLD;
    let rng = &mut *ctx.rng;
    ctx.population.for_each_record_mut(|_, r| {
        if rng.gen_bool(p.compliance) {
            r.mobility *= 1.0 - p.strictness;
            if isolate {
                r.isolated = true;
            }
            report.people_affected += 1;
        }
    });
    report
}

fn masks(p: &MaskParams, ctx: &mut ApplyContext<'_>) -> ApplyReport {
    let mut report = ApplyReport::new(InterventionKind::MaskMandate, ctx.day);
    let rng = &mut *ctx.rng;
    ctx.population.for_each_record_mut(|_, r| {
        if rng.gen_bool(p.compliance) {
            r.wears_mask = true;
            report.people_affected += 1;
        }
    });
    report
}

/// Offer one batch of doses to unvaccinated susceptible people in
/// priority order.
fn vaccinate_batch(p: &VaccinationParams, ctx: &mut ApplyContext<'_>) -> ApplyReport {
    let mut report = ApplyReport::new(InterventionKind::Vaccination, ctx.day);
    let mut candidates: Vec<PersonId> = ctx
        .population
        .sorted_members(Compartment::S)
        .into_iter()
        .filter(|&person| !ctx.population.record(person).is_vaccinated())
        .collect();

    // Stable sorts: ties keep ascending id order.
    match p.priority {
        Priority::Age => {
            let graph = &*ctx.graph;
            candidates.sort_by_key(|&person| std::cmp::Reverse(graph.demographics(person).age));
        }
        Priority::Frontline => {
            let pop = &*ctx.population;
            candidates.sort_by(|a, b| pop.record(*b).mobility.total_cmp(&pop.record(*a).mobility));
        }
        Priority::Vulnerable => {
            let graph = &*ctx.graph;
            candidates.sort_by(|a, b| {
                graph.demographics(*b).health_risk.total_cmp(&graph.demographics(*a).health_risk)
            });
        }
        Priority::Random => ctx.rng.shuffle(&mut candidates),
    }

    let mut n = (p.rate * candidates.len() as f64) as usize;
    if let Some(cap) = p.daily_capacity {
        n = n.min(cap);
    }
    for &person in &candidates[..n] {
        report.doses += 1;
        report.people_affected += 1;
        let protected = ctx.rng.gen_bool(p.efficacy);
        if protected {
            ctx.population.set_compartment(person, Compartment::V);
            ctx.population.record_mut(person).immunity = ctx.vaccine.initial_immunity;
            report.vaccinated += 1;
        }
        ctx.population.record_mut(person).vaccination = Some(Vaccination { day: ctx.day, protected });
    }
    log::debug!(
        "{}: {} doses ({} protected) by {} priority",
        ctx.day,
        report.doses,
        report.vaccinated,
        p.priority.name()
    );
    report
}

/// Test a sample of infectious people; positives who comply isolate after
/// the reporting delay.
fn testing(p: &TestingParams, ctx: &mut ApplyContext<'_>) -> ApplyReport {
    let mut report = ApplyReport::new(InterventionKind::Testing, ctx.day);
    let mut pool: Vec<PersonId> = [Compartment::Ia, Compartment::Im, Compartment::Is, Compartment::Ih]
        .into_iter()
        .flat_map(|c| ctx.population.registry().members(c).iter().copied())
        .collect();
    pool.sort_unstable();

    let n = (p.rate * pool.len() as f64) as usize;
    for person in ctx.rng.sample(&pool, n) {
        if !(ctx.rng.gen_bool(p.accuracy) && ctx.rng.gen_bool(p.isolation_compliance)) {
            continue;
        }
        if p.delay == 0 {
            ctx.population.record_mut(person).isolated = true;
            report.people_affected += 1;
            continue;
        }
        let event = ScheduledEvent::person(ctx.day + p.delay, person, EventAction::Isolate);
        match ctx.queue.push(event) {
            Ok(()) => report.events_scheduled += 1,
            Err(e) => log::debug!("{}: isolation of {person} not scheduled: {e}", ctx.day),
        }
    }
    report
}

fn isolation(p: &IsolationParams, ctx: &mut ApplyContext<'_>) -> ApplyReport {
    let mut report = ApplyReport::new(InterventionKind::Isolation, ctx.day);
    let mut symptomatic: Vec<PersonId> = [Compartment::Im, Compartment::Is, Compartment::Ih]
        .into_iter()
        .flat_map(|c| ctx.population.registry().members(c).iter().copied())
        .collect();
    symptomatic.sort_unstable();
    for person in symptomatic {
        if ctx.rng.gen_bool(p.compliance) {
            ctx.population.record_mut(person).isolated = true;
            report.people_affected += 1;
        }
    }
    report
}

fn restrict_travel(p: &TravelParams, ctx: &mut ApplyContext<'_>) -> ApplyReport {
    let mut report = ApplyReport::new(InterventionKind::TravelRestrictions, ctx.day);
    for i in 0..ctx.graph.contact_count() {
        let c = ContactId(i as u32);
        if ctx.graph.contact(c).attrs.kind != ContactKind::Random || !ctx.graph.is_active(c) {
            continue;
        }
        if ctx.rng.gen_bool(p.reduction) {
            ctx.graph.set_active(c, false);
            report.contacts_changed += 1;
        }
    }
    report
}

fn reactivate_random_contacts(graph: &mut ContactGraph) -> usize {
    let cut: Vec<ContactId> = (0..graph.contact_count())
        .map(|i| ContactId(i as u32))
        .filter(|&c| graph.contact(c).attrs.kind == ContactKind::Random && !graph.is_active(c))
        .collect();
    for &c in &cut {
        graph.set_active(c, true);
    }
    cut.len()
}

/// Move every person's mobility `1/remaining` of the way back to baseline.
/// `remaining <= 1` restores baseline exactly.
fn ramp_mobility(remaining: u32, ctx: &mut ApplyContext<'_>) -> ApplyReport {
    let mut report = ApplyReport::new(InterventionKind::Reopen, ctx.day);
    let graph = &*ctx.graph;
    let steps = remaining.max(1) as f64;
    ctx.population.for_each_record_mut(|person, r| {
        let baseline = graph.demographics(person).mobility;
        let next = r.mobility + (baseline - r.mobility) / steps;
        if next != r.mobility {
            r.mobility = next;
            report.people_affected += 1;
        }
    });
    report
}
