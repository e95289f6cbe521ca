//! The `Sim` struct and its daily loop.

use ep_agent::{Infection, InfectionSource, Population};
use ep_core::{Compartment, ContactId, Day, InterventionKind, PersonId, SimClock, SimConfig, SimRng};
use ep_disease::immunity::{natural_waning_step, vaccine_immunity};
use ep_disease::{probability, sample_course, Course, DiseaseParameters, Exposure, TerminalOutcome};
use ep_graph::ContactGraph;
use ep_intervention::{
    ApplyContext, ApplyReport, Intervention, InterventionPlan, InterventionState, TriggerContext,
};
use ep_schedule::{EventAction, EventQueue, ScheduledEvent};

use crate::history::estimate_r_eff;
use crate::{
    Checkpoint, CheckpointStore, DailyRecord, History, InfectionTree, RunStats, SeedMethod,
    SimError, SimObserver, SimResult, SummaryStats,
};

// ── Status values ─────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum SimStatus {
    #[default]
    Idle,
    /// Inside [`Sim::run`] or [`Sim::run_to_end`].
    Running,
}

/// Result of [`Sim::infect`].
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum InfectOutcome {
    Infected(Course),
    /// The target was not in S; nothing changed.
    NotSusceptible(Compartment),
    /// The id is outside the population.
    UnknownPerson,
}

/// Result of executing one scheduled event.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum EventOutcome {
    Applied,
    /// An intervention ended.
    Ended(ApplyReport),
    /// The end event named an intervention that was no longer active.
    NotActive(InterventionKind),
    /// The target's compartment did not allow the transition.
    Skipped { person: PersonId, compartment: Compartment },
    /// A person event without a valid target.
    NoTarget,
}

/// What one day produced besides its record.
struct DayOutput {
    checkpoint: Option<Checkpoint>,
    reports:    Vec<ApplyReport>,
    record:     DailyRecord,
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The simulation engine.
///
/// `Sim` owns every piece of mutable state (person records, edge flags,
/// event queue, interventions, generator, history) and advances it one day
/// per [`step`](Sim::step).  Create via [`SimBuilder`][crate::SimBuilder] or
/// [`Sim::from_snapshot`].
pub struct Sim {
    pub(crate) config:        SimConfig,
    pub(crate) disease:       DiseaseParameters,
    pub(crate) clock:         SimClock,
    pub(crate) status:        SimStatus,
    pub(crate) graph:         ContactGraph,
    pub(crate) population:    Population,
    pub(crate) queue:         EventQueue,
    pub(crate) interventions: InterventionState,
    pub(crate) plan:          InterventionPlan,
    pub(crate) rng:           SimRng,
    pub(crate) history:       History,
    pub(crate) checkpoints:   CheckpointStore,
    pub(crate) stats:         RunStats,
    pub(crate) tree:          InfectionTree,
    /// Infections since the last record; folded into the next one.
    pub(crate) pending_new_infections: usize,
}

impl Sim {
    pub(crate) fn new(
        graph:   ContactGraph,
        disease: DiseaseParameters,
        config:  SimConfig,
        plan:    InterventionPlan,
    ) -> Self {
        let population = Population::from_graph(&graph);
        Self {
            rng:           SimRng::new(config.seed),
            clock:         SimClock::new(),
            status:        SimStatus::Idle,
            queue:         EventQueue::new(),
            interventions: InterventionState::new(),
            history:       History::new(),
            checkpoints:   CheckpointStore::new(),
            stats:         RunStats::default(),
            tree:          InfectionTree::new(),
            pending_new_infections: 0,
            config,
            disease,
            graph,
            population,
            plan,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn disease(&self) -> &DiseaseParameters {
        &self.disease
    }

    /// The day the next [`step`](Sim::step) will simulate.
    pub fn day(&self) -> Day {
        self.clock.current_day
    }

    pub fn status(&self) -> SimStatus {
        self.status
    }

    pub fn graph(&self) -> &ContactGraph {
        &self.graph
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn queue(&self) -> &EventQueue {
        &self.queue
    }

    pub fn interventions(&self) -> &InterventionState {
        &self.interventions
    }

    pub fn plan(&self) -> &InterventionPlan {
        &self.plan
    }

    /// Add triggers mid-run.
    pub fn plan_mut(&mut self) -> &mut InterventionPlan {
        &mut self.plan
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn checkpoints(&self) -> &CheckpointStore {
        &self.checkpoints
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    pub fn tree(&self) -> &InfectionTree {
        &self.tree
    }

    /// Summary of the run so far.
    pub fn summary(&self) -> SummaryStats {
        SummaryStats::from_run(
            &self.stats,
            self.clock.current_day.0,
            self.population.len(),
            self.population.count(Compartment::S),
        )
    }

    // ── Running ───────────────────────────────────────────────────────────

    /// Run exactly `days` days from the current position.
    pub fn run<O: SimObserver>(&mut self, days: u32, observer: &mut O) {
        self.status = SimStatus::Running;
        for _ in 0..days {
            self.observed_day(observer);
        }
        self.status = SimStatus::Idle;
    }

    /// Run up to `config.end_day()`, take a final checkpoint, and return
    /// the summary.
    pub fn run_to_end<O: SimObserver>(&mut self, observer: &mut O) -> SummaryStats {
        log::info!(
            "running {} → {} on {} people",
            self.clock.current_day,
            self.config.end_day(),
            self.population.len()
        );
        self.status = SimStatus::Running;
        while self.clock.current_day < self.config.end_day() {
            self.observed_day(observer);
        }
        let checkpoint = self.save_checkpoint();
        observer.on_checkpoint(&checkpoint);
        self.status = SimStatus::Idle;

        let summary = self.summary();
        log::info!(
            "finished after {} days: {} infected, {} deaths, peak {} on {}",
            summary.total_days,
            summary.total_infected,
            summary.total_deaths,
            summary.peak_infections,
            summary.peak_day
        );
        observer.on_sim_end(&summary);
        summary
    }

    /// Simulate one day and return its record.
    pub fn step(&mut self) -> DailyRecord {
        self.advance_day().record
    }

    fn observed_day<O: SimObserver>(&mut self, observer: &mut O) {
        observer.on_day_start(self.clock.current_day);
        let out = self.advance_day();
        if let Some(cp) = &out.checkpoint {
            observer.on_checkpoint(cp);
        }
        for report in &out.reports {
            observer.on_intervention(report);
        }
        observer.on_day_end(&out.record);
    }

    fn advance_day(&mut self) -> DayOutput {
        let day = self.clock.current_day;
        let mut reports = Vec::new();

        // ── Phase 0: checkpoint ───────────────────────────────────────────
        let interval = self.config.checkpoint_interval;
        let checkpoint = (interval > 0 && day.0.is_multiple_of(interval)).then(|| self.save_checkpoint());

        // ── Phase 1: due events ───────────────────────────────────────────
        let executed = self.process_events(day, &mut reports);

        // ── Phase 2: interventions ────────────────────────────────────────
        self.update_interventions(day, &mut reports);
        self.fire_triggers(day, &mut reports);

        // ── Phase 3: transmission ─────────────────────────────────────────
        self.transmit(day);

        // ── Phase 4: aging ────────────────────────────────────────────────
        self.population.for_each_record_mut(|_, r| r.days_in_state += 1);

        // ── Phase 5: immunity ─────────────────────────────────────────────
        self.decay_immunity(day);

        // ── Phase 6: record ───────────────────────────────────────────────
        let record = self.record_day(day);
        log::debug!(
            "{day}: {executed} events, {} new infections, {} infectious",
            record.new_infections,
            record.counts.infectious()
        );

        self.clock.advance();
        DayOutput { checkpoint, reports, record }
    }

    // ── Infection ─────────────────────────────────────────────────────────

    /// Move `p` from S to E today, sample its course, and schedule the
    /// course's events.
    pub fn infect(&mut self, p: PersonId, source: InfectionSource) -> InfectOutcome {
        if p.index() >= self.population.len() {
            log::warn!("infect: {p:?} is not in the population");
            return InfectOutcome::UnknownPerson;
        }
        let current = self.population.compartment(p);
        if current != Compartment::S {
            log::warn!("infect: {p:?} is in {current}, not S");
            return InfectOutcome::NotSusceptible(current);
        }

        let day = self.clock.current_day;
        self.population.set_compartment(p, Compartment::E);
        let age = self.graph.demographics(p).age;
        let vaccinated = self.population.record(p).is_vaccinated();
        let course = sample_course(age, &self.disease, vaccinated, &mut self.rng);
        let infection = Infection { day, source, course };
        self.population.record_mut(p).infection = Some(infection);
        self.schedule_course(p, &infection);

        self.tree.record(source, p);
        self.stats.total_infected += 1;
        self.pending_new_infections += 1;
        log::trace!("{day}: {p:?} infected ({source:?}), {}", course.symptoms);
        InfectOutcome::Infected(course)
    }

    /// Infect up to `n` susceptible people chosen by `method`.
    pub fn seed_infections(&mut self, n: usize, method: &SeedMethod) -> Vec<PersonId> {
        let targets = method.choose(n, &self.population, &self.graph, &mut self.rng);
        for &p in &targets {
            self.infect(p, InfectionSource::Seed);
        }
        log::info!("{}: seeded {} infections", self.clock.current_day, targets.len());
        targets
    }

    /// Queue the still-pending events of `p`'s current infection.  Events
    /// before today, and steps the person has already passed, are skipped.
    fn schedule_course(&mut self, p: PersonId, infection: &Infection) {
        let today = self.clock.current_day;
        let compartment = self.population.compartment(p);
        let course = infection.course;
        let mut events = Vec::with_capacity(3);
        if compartment == Compartment::E {
            events.push(ScheduledEvent::person(
                infection.day + course.incubation_days,
                p,
                EventAction::BecomeInfectious,
            ));
        }
        if let Some(h) = course.hospital_day {
            let on = infection.day + h;
            if on >= today && compartment != Compartment::Ih {
                events.push(ScheduledEvent::person(on, p, EventAction::Hospitalize));
            }
        }
        let terminal = match course.outcome {
            TerminalOutcome::Recover { .. } => EventAction::Recover,
            TerminalOutcome::Die { .. } => EventAction::Die,
        };
        events.push(ScheduledEvent::person(infection.terminal_day(), p, terminal));

        for event in events {
            if let Err(e) = self.queue.push(event) {
                log::warn!("{today}: could not schedule {event:?}: {e}");
            }
        }
    }

    // ── Events ────────────────────────────────────────────────────────────

    /// Execute every event due today.  Returns how many ran.
    pub fn process_due(&mut self) -> usize {
        let mut reports = Vec::new();
        self.process_events(self.clock.current_day, &mut reports)
    }

    fn process_events(&mut self, day: Day, reports: &mut Vec<ApplyReport>) -> usize {
        let due = self.queue.pop_due(day);
        let n = due.len();
        for event in due {
            match self.execute_event(event) {
                EventOutcome::Ended(report) => reports.push(report),
                EventOutcome::Skipped { person, compartment } => {
                    log::warn!("{day}: skipped {} for {person:?} in {compartment}", event.action);
                }
                EventOutcome::NotActive(kind) => {
                    log::debug!("{day}: {kind} already ended");
                }
                EventOutcome::NoTarget => log::warn!("{day}: {} has no valid target", event.action),
                EventOutcome::Applied => {}
            }
        }
        n
    }

    /// Execute one event against the current state, on the current day.
    pub fn execute_event(&mut self, event: ScheduledEvent) -> EventOutcome {
        match event.action {
            EventAction::EndIntervention(kind) => self.end_intervention(kind),
            action => match event.target.filter(|p| p.index() < self.population.len()) {
                Some(p) => self.execute_person_event(p, action),
                None => EventOutcome::NoTarget,
            },
        }
    }

    fn end_intervention(&mut self, kind: InterventionKind) -> EventOutcome {
        let mut ctx = ApplyContext {
            day:        self.clock.current_day,
            population: &mut self.population,
            graph:      &mut self.graph,
            queue:      &mut self.queue,
            rng:        &mut self.rng,
            vaccine:    &self.disease.vaccine,
        };
        match self.interventions.end(kind, &mut ctx) {
            Some(report) => EventOutcome::Ended(report),
            None => EventOutcome::NotActive(kind),
        }
    }

    fn execute_person_event(&mut self, p: PersonId, action: EventAction) -> EventOutcome {
        let day = self.clock.current_day;
        let current = self.population.compartment(p);
        let skipped = EventOutcome::Skipped { person: p, compartment: current };

        match action {
            EventAction::BecomeInfectious => {
                match self.population.record(p).symptoms() {
                    Some(s) if current == Compartment::E => {
                        self.population.set_compartment(p, s.infectious_compartment());
                    }
                    _ => return skipped,
                }
            }
            EventAction::Hospitalize => {
                if !matches!(
                    current,
                    Compartment::Ia | Compartment::Im | Compartment::Is | Compartment::Ic
                ) {
                    return skipped;
                }
                self.population.set_compartment(p, Compartment::Ih);
                self.population.record_mut(p).hospitalized_on = Some(day);
                self.stats.total_hospitalized += 1;
            }
            EventAction::Recover => {
                if !current.is_active_infection() {
                    return skipped;
                }
                self.population.set_compartment(p, Compartment::R);
                self.population.record_mut(p).immunity = self.config.natural_immunity;
                self.stats.total_recovered += 1;
            }
            EventAction::Die => {
                if !current.is_active_infection() {
                    return skipped;
                }
                self.population.set_compartment(p, Compartment::D);
                self.stats.total_deaths += 1;
            }
            EventAction::Isolate => {
                if current == Compartment::D {
                    return skipped;
                }
                self.population.record_mut(p).isolated = true;
            }
            // Not a person event.
            EventAction::EndIntervention(_) => return skipped,
        }
        EventOutcome::Applied
    }

    // ── Interventions ─────────────────────────────────────────────────────

    /// Apply `cmd` immediately, on the current day.
    pub fn apply_intervention(&mut self, cmd: Intervention) -> SimResult<ApplyReport> {
        let mut ctx = ApplyContext {
            day:        self.clock.current_day,
            population: &mut self.population,
            graph:      &mut self.graph,
            queue:      &mut self.queue,
            rng:        &mut self.rng,
            vaccine:    &self.disease.vaccine,
        };
        let report = self.interventions.apply(cmd, &mut ctx)?;
        self.stats.total_vaccinated += report.vaccinated;
        Ok(report)
    }

    /// Apply an intervention given by name and a JSON parameter object,
    /// e.g. `("lockdown", {"strictness": 0.8})`.
    pub fn apply_named(&mut self, name: &str, params: serde_json::Value) -> SimResult<ApplyReport> {
        let cmd = Intervention::from_name_and_params(name, params)?;
        self.apply_intervention(cmd)
    }

    fn update_interventions(&mut self, day: Day, reports: &mut Vec<ApplyReport>) {
        let mut ctx = ApplyContext {
            day,
            population: &mut self.population,
            graph:      &mut self.graph,
            queue:      &mut self.queue,
            rng:        &mut self.rng,
            vaccine:    &self.disease.vaccine,
        };
        for report in self.interventions.daily_update(&mut ctx) {
            self.stats.total_vaccinated += report.vaccinated;
            reports.push(report);
        }
    }

    /// Fire due triggers one at a time so each sees the effect of the last.
    fn fire_triggers(&mut self, day: Day, reports: &mut Vec<ApplyReport>) {
        loop {
            let ctx = TriggerContext {
                day,
                counts:         self.population.counts(),
                new_infections: self.history.last().map_or(0, |r| r.new_infections),
                state:          &self.interventions,
            };
            let Some(cmd) = self.plan.fire_next(&ctx) else {
                break;
            };
            match self.apply_intervention(cmd) {
                Ok(report) => reports.push(report),
                Err(e) => log::warn!("{day}: triggered {cmd} was rejected: {e}"),
            }
        }
    }

    // ── Transmission ──────────────────────────────────────────────────────

    fn transmit(&mut self, day: Day) {
        let measures = self.interventions.measures(self.disease.mask_efficacy);
        let day_of_year = day.day_of_year(self.config.start_day_of_year);
        let cap = self.config.daily_infection_cap;
        let mut new_today = 0usize;

        for infector in self.population.infectious_sorted() {
            let record = self.population.record(infector);
            let mobility = record.mobility;
            let infector_party = record.party(self.graph.demographics(infector), self.graph.degree(infector));

            // Reduced mobility means only a share of contacts are met today.
            let neighbors: Vec<(PersonId, ContactId)> = self.graph.neighbors(infector).collect();
            let met = if mobility < 1.0 {
                let n = (neighbors.len() as f64 * mobility.max(0.0)) as usize;
                if n < neighbors.len() { self.rng.sample(&neighbors, n) } else { neighbors }
            } else {
                neighbors
            };

            for (other, contact) in met {
                if self.population.compartment(other) != Compartment::S || !self.graph.is_active(contact) {
                    continue;
                }
                let exposure = Exposure {
                    infector:    infector_party,
                    susceptible: self
                        .population
                        .record(other)
                        .party(self.graph.demographics(other), self.graph.degree(other)),
                    contact:     self.graph.contact(contact).attrs,
                    day,
                    day_of_year,
                };
                let p = probability(&exposure, &measures, &self.disease, &mut self.rng);
                if self.rng.random::<f64>() < p {
                    self.infect(other, InfectionSource::Person(infector));
                    new_today += 1;
                    let remaining = self.population.count(Compartment::S);
                    if new_today as f64 > cap * remaining as f64 {
                        break;
                    }
                }
            }
        }
    }

    // ── Immunity ──────────────────────────────────────────────────────────

    fn decay_immunity(&mut self, day: Day) {
        let annual = self.config.natural_waning_rate;
        let vaccine = &self.disease.vaccine;
        self.population.for_each_record_mut(|_, r| match r.compartment() {
            Compartment::R => r.immunity = natural_waning_step(r.immunity, annual),
            Compartment::V => {
                if let Some(v) = r.vaccination {
                    r.immunity = vaccine_immunity(vaccine, day.since(v.day));
                }
            }
            _ => {}
        });
    }

    // ── Recording ─────────────────────────────────────────────────────────

    fn record_day(&mut self, day: Day) -> DailyRecord {
        let counts = self.population.counts();
        let new_infections = std::mem::take(&mut self.pending_new_infections);

        let mut series = self.history.new_infections();
        series.push(new_infections);
        let r_eff = estimate_r_eff(&series, self.config.r_eff_window);

        let record = DailyRecord {
            day,
            counts,
            new_infections,
            interventions: self.interventions.entries(),
            hospital_beds: counts.hospital_beds(),
            r_eff,
        };
        self.stats.observe_peak(day, counts.infectious());
        if r_eff.is_some() {
            self.stats.last_r_eff = r_eff;
        }
        self.history.push(record.clone());
        record
    }

    // ── Checkpoints ───────────────────────────────────────────────────────

    /// Snapshot every compartment as of now (the start of the current day).
    pub fn save_checkpoint(&mut self) -> Checkpoint {
        let checkpoint = Checkpoint {
            day:          self.clock.current_day,
            compartments: self.population.compartments(),
            counts:       self.population.counts(),
            vaccinations: self.population.records().iter().map(|r| r.vaccination).collect(),
        };
        self.checkpoints.insert(checkpoint.clone());
        log::debug!("{}: checkpoint saved", checkpoint.day);
        checkpoint
    }

    /// Roll compartments back to the checkpoint taken at the start of `day`
    /// and resume from there.
    ///
    /// Infections, hospital stays and doses that happened on or after `day`
    /// are undone; pending course events are rebuilt from the surviving
    /// infections; history, the infection tree, statistics and later
    /// checkpoints are cut back to match.  Plan triggers that fired on or
    /// after `day` are re-armed.
    ///
    /// Active interventions, contact flags, mobility, the generator and
    /// pending isolate and end-of-intervention events keep their current
    /// values.
    ///
    /// An unknown `day` is an error and leaves the engine untouched.
    pub fn restore_checkpoint(&mut self, day: Day) -> SimResult<()> {
        let checkpoint = self.checkpoints.get(day).cloned().ok_or(SimError::UnknownCheckpoint(day))?;
        if checkpoint.vaccinations.len() != self.population.len() {
            return Err(SimError::SnapshotMismatch {
                expected: self.population.len(),
                got:      checkpoint.vaccinations.len(),
                what:     "checkpoint vaccinations",
            });
        }
        self.population.overwrite_compartments(&checkpoint.compartments)?;
        self.clock = SimClock::starting_at(day);

        let natural = self.config.natural_immunity;
        let annual = self.config.natural_waning_rate;
        let vaccine = &self.disease.vaccine;
        let vaccinations = &checkpoint.vaccinations;
        self.population.for_each_record_mut(|p, r| {
            r.vaccination = vaccinations[p.index()];
            match r.compartment() {
                Compartment::S => {
                    r.infection = None;
                    r.hospitalized_on = None;
                    r.immunity = 0.0;
                }
                Compartment::Ih => {}
                Compartment::R => {
                    let recovered = r.infection.map_or(day, |i| i.terminal_day());
                    let mut immunity = natural;
                    for _ in 0..day.since(recovered) {
                        immunity = natural_waning_step(immunity, annual);
                    }
                    r.immunity = immunity;
                }
                Compartment::V => {
                    if let Some(v) = r.vaccination {
                        let last_update = Day(day.0.saturating_sub(1));
                        r.immunity = vaccine_immunity(vaccine, last_update.since(v.day));
                    }
                }
                c if c.is_active_infection() => r.hospitalized_on = None,
                _ => {}
            }
        });

        self.queue.retain(|e| e.target.is_none() || e.action == EventAction::Isolate);
        let people: Vec<PersonId> = self.graph.person_ids().collect();
        for p in people {
            let record = self.population.record(p);
            if !record.compartment().is_active_infection() {
                continue;
            }
            if let Some(infection) = record.infection {
                self.schedule_course(p, &infection);
            }
        }

        let population = &self.population;
        self.tree.retain(|p| population.record(p).infection.is_some());
        self.history.truncate_from(day);
        self.stats = RunStats::recompute(&self.population, &self.history);
        self.pending_new_infections = self
            .population
            .records()
            .iter()
            .filter(|r| r.infection.is_some_and(|i| i.day == day))
            .count();
        self.checkpoints.truncate_after(day);
        self.plan.rearm_from(day);

        log::info!("restored checkpoint {day}: {} people", self.population.len());
        Ok(())
    }
}
