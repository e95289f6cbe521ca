//! Integration tests for ep-sim.

use ep_agent::InfectionSource;
use ep_core::{Compartment, Day, InterventionKind, PersonId, SimConfig};
use ep_disease::DiseaseParameters;
use ep_graph::{complete, ContactAttrs, ContactGraph, ContactGraphBuilder, ContactKind, Demographics};
use ep_intervention::{
    Comparison, Condition, HygieneParams, Intervention, InterventionPlan, IsolationParams,
    LockdownParams, Metric, TestingParams, Trigger, VaccinationParams,
};
use ep_schedule::{EventAction, ScheduledEvent};

use crate::*;

// ── Helpers ───────────────────────────────────────────────────────────────────

fn config(days: u32) -> SimConfig {
    SimConfig { days, seed: 11, ..SimConfig::default() }
}

/// Fully mixed population of `n` mobile adults.
fn mixed(n: usize) -> ContactGraph {
    let people = (0..n)
        .map(|_| Demographics { mobility: 1.0, ..Demographics::with_age(35) })
        .collect();
    complete(people, ContactKind::Household).unwrap()
}

/// `n` people on a ring with a chord every tenth person.
fn ring(n: u32) -> ContactGraph {
    let mut b = ContactGraphBuilder::new();
    for i in 0..n {
        b.add_person(Demographics::with_age((i % 90) as u8)).unwrap();
    }
    for i in 0..n {
        b.add_contact(PersonId(i), PersonId((i + 1) % n), ContactAttrs::new(ContactKind::Household))
            .unwrap();
        if i % 10 == 0 {
            b.add_contact(PersonId(i), PersonId((i + n / 2) % n), ContactAttrs::new(ContactKind::Random))
                .unwrap();
        }
    }
    b.build()
}

fn epidemic(graph: ContactGraph, days: u32) -> Sim {
    let disease = DiseaseParameters::default().with_r0(10.0).unwrap();
    SimBuilder::new(graph, disease).config(config(days)).build().unwrap()
}

#[derive(Default)]
struct Recorder {
    starts:        usize,
    ends:          usize,
    checkpoints:   Vec<Day>,
    interventions: Vec<InterventionKind>,
    summary:       Option<SummaryStats>,
}

impl SimObserver for Recorder {
    fn on_day_start(&mut self, _day: Day) {
        self.starts += 1;
    }
    fn on_checkpoint(&mut self, cp: &Checkpoint) {
        self.checkpoints.push(cp.day);
    }
    fn on_intervention(&mut self, report: &ep_intervention::ApplyReport) {
        self.interventions.push(report.kind);
    }
    fn on_day_end(&mut self, _record: &DailyRecord) {
        self.ends += 1;
    }
    fn on_sim_end(&mut self, summary: &SummaryStats) {
        self.summary = Some(summary.clone());
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;

    #[test]
    fn builds_with_defaults() {
        let sim = SimBuilder::new(ring(20), DiseaseParameters::default()).build().unwrap();
        assert_eq!(sim.day(), Day(0));
        assert_eq!(sim.status(), SimStatus::Idle);
        assert_eq!(sim.population().count(Compartment::S), 20);
        assert!(sim.plan().is_empty());
    }

    #[test]
    fn seed_override_wins() {
        let sim = SimBuilder::new(ring(20), DiseaseParameters::default())
            .config(config(10))
            .seed(99)
            .build()
            .unwrap();
        assert_eq!(sim.config().seed, 99);
    }

    #[test]
    fn rejects_bad_config() {
        let bad = SimConfig { daily_infection_cap: 0.0, ..SimConfig::default() };
        let err = SimBuilder::new(ring(20), DiseaseParameters::default()).config(bad).build();
        assert!(matches!(err, Err(SimError::Core(_))));
    }

    #[test]
    fn rejects_empty_graph() {
        let err = SimBuilder::new(ContactGraph::empty(), DiseaseParameters::default()).build();
        assert!(matches!(err, Err(SimError::Config(_))));
    }

    #[test]
    fn scenario_appends_triggers() {
        let sim = SimBuilder::new(ring(20), DiseaseParameters::default())
            .scenario(ep_intervention::Scenario::HerdImmunity)
            .build()
            .unwrap();
        assert_eq!(sim.plan().len(), 3);
    }
}

// ── Infection and events ──────────────────────────────────────────────────────

#[cfg(test)]
mod infection_tests {
    use super::*;

    #[test]
    fn infect_moves_to_exposed_and_schedules_course() {
        let mut sim = epidemic(ring(30), 10);
        let outcome = sim.infect(PersonId(3), InfectionSource::Seed);
        let InfectOutcome::Infected(course) = outcome else {
            panic!("expected infection, got {outcome:?}");
        };
        assert_eq!(sim.population().compartment(PersonId(3)), Compartment::E);

        let events = sim.queue().pending_for(PersonId(3));
        assert_eq!(events[0].action, EventAction::BecomeInfectious);
        assert_eq!(events[0].day, Day(course.incubation_days));
        let terminal: Vec<_> = events.iter().filter(|e| e.action.is_terminal()).collect();
        assert_eq!(terminal.len(), 1);
        assert_eq!(terminal[0].day, Day(course.outcome.day()));
        assert_eq!(sim.tree().seeds(), &[PersonId(3)]);
        assert_eq!(sim.stats().total_infected, 1);
    }

    #[test]
    fn infect_non_susceptible_is_a_no_op() {
        let mut sim = epidemic(ring(30), 10);
        sim.infect(PersonId(3), InfectionSource::Seed);
        let queued = sim.queue().len();
        let again = sim.infect(PersonId(3), InfectionSource::Person(PersonId(4)));
        assert_eq!(again, InfectOutcome::NotSusceptible(Compartment::E));
        assert_eq!(sim.queue().len(), queued);
        assert_eq!(sim.stats().total_infected, 1);
        assert_eq!(sim.infect(PersonId(1000), InfectionSource::Seed), InfectOutcome::UnknownPerson);
    }

    #[test]
    fn events_skip_wrong_compartments() {
        let mut sim = epidemic(ring(30), 10);
        let recover = ScheduledEvent::person(Day(0), PersonId(5), EventAction::Recover);
        assert_eq!(
            sim.execute_event(recover),
            EventOutcome::Skipped { person: PersonId(5), compartment: Compartment::S }
        );
        let onset = ScheduledEvent::person(Day(0), PersonId(5), EventAction::BecomeInfectious);
        assert!(matches!(sim.execute_event(onset), EventOutcome::Skipped { .. }));
        assert_eq!(sim.population().compartment(PersonId(5)), Compartment::S);
    }

    #[test]
    fn course_runs_to_its_terminal_state() {
        let mut sim = epidemic(ring(30), 10);
        let InfectOutcome::Infected(course) = sim.infect(PersonId(0), InfectionSource::Seed) else {
            panic!("seed failed");
        };
        for _ in 0..=course.outcome.day() {
            sim.step();
        }
        let expected = if course.outcome.is_fatal() { Compartment::D } else { Compartment::R };
        assert_eq!(sim.population().compartment(PersonId(0)), expected);
        assert!(sim.queue().pending_for(PersonId(0)).is_empty());
    }

    #[test]
    fn recovery_grants_natural_immunity() {
        let mut sim = epidemic(ring(30), 10);
        sim.infect(PersonId(0), InfectionSource::Seed);
        let out = sim.execute_event(ScheduledEvent::person(Day(0), PersonId(0), EventAction::Recover));
        assert_eq!(out, EventOutcome::Applied);
        assert_eq!(sim.population().compartment(PersonId(0)), Compartment::R);
        assert_eq!(sim.population().record(PersonId(0)).immunity, sim.config().natural_immunity);
    }

    #[test]
    fn isolate_event_sets_flag() {
        let mut sim = epidemic(ring(30), 10);
        let out = sim.execute_event(ScheduledEvent::person(Day(0), PersonId(2), EventAction::Isolate));
        assert_eq!(out, EventOutcome::Applied);
        assert!(sim.population().record(PersonId(2)).isolated);
    }

    #[test]
    fn end_of_inactive_intervention_reports_not_active() {
        let mut sim = epidemic(ring(30), 10);
        let out = sim.execute_event(ScheduledEvent::end_intervention(Day(0), InterventionKind::Lockdown));
        assert_eq!(out, EventOutcome::NotActive(InterventionKind::Lockdown));
    }
}

// ── Seeding ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod seeding_tests {
    use super::*;

    #[test]
    fn random_seeds_are_distinct_and_susceptible() {
        let mut sim = epidemic(ring(50), 10);
        let seeds = sim.seed_infections(10, &SeedMethod::Random);
        assert_eq!(seeds.len(), 10);
        let mut sorted = seeds.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), 10);
        assert_eq!(sim.population().count(Compartment::E), 10);
    }

    #[test]
    fn hubs_pick_highest_degree() {
        let mut sim = epidemic(ring(50), 10);
        let seeds = sim.seed_infections(5, &SeedMethod::Hubs);
        for p in seeds {
            assert_eq!(sim.graph().degree(p), 3);
        }
    }

    #[test]
    fn age_targeted_respects_range() {
        let mut sim = epidemic(ring(50), 10);
        let seeds = sim.seed_infections(5, &SeedMethod::AgeTargeted { min_age: 10, max_age: 19 });
        assert_eq!(seeds.len(), 5);
        for p in seeds {
            let age = sim.graph().demographics(p).age;
            assert!((10..=19).contains(&age));
        }
    }

    #[test]
    fn explicit_skips_invalid_and_duplicate_ids() {
        let mut sim = epidemic(ring(50), 10);
        let ids = vec![PersonId(4), PersonId(4), PersonId(999), PersonId(7)];
        let seeds = sim.seed_infections(10, &SeedMethod::Explicit(ids));
        assert_eq!(seeds, vec![PersonId(4), PersonId(7)]);
    }

    #[test]
    fn seeds_count_towards_first_record() {
        let mut sim = epidemic(ring(50), 10);
        sim.seed_infections(4, &SeedMethod::Random);
        let rec = sim.step();
        assert!(rec.new_infections >= 4);
    }
}

// ── Whole-run properties ──────────────────────────────────────────────────────

#[cfg(test)]
mod run_tests {
    use super::*;

    #[test]
    fn no_seeds_stays_susceptible() {
        let mut sim = epidemic(ring(100), 30);
        sim.run_to_end(&mut NoopObserver);
        assert_eq!(sim.history().len(), 30);
        for rec in sim.history().records() {
            assert_eq!(rec.new_infections, 0);
            assert_eq!(rec.counts[Compartment::S], 100);
        }
    }

    #[test]
    fn fully_mixed_outbreak_peaks_mid_run() {
        let mut sim = epidemic(mixed(200), 60);
        sim.seed_infections(10, &SeedMethod::Random);
        let summary = sim.run_to_end(&mut NoopObserver);

        assert!(summary.peak_day > Day(1) && summary.peak_day < Day(60), "{summary:?}");
        let last = sim.history().last().unwrap();
        assert!(last.counts[Compartment::R] + last.counts[Compartment::D] > 0);
        assert!(summary.attack_rate > 0.0 && summary.attack_rate <= 1.0);
    }

    #[test]
    fn full_vaccination_blocks_infection() {
        let mut sim = epidemic(mixed(200), 30);
        let report = sim
            .apply_intervention(Intervention::Vaccination(VaccinationParams {
                rate: 1.0,
                efficacy: 1.0,
                ..VaccinationParams::default()
            }))
            .unwrap();
        assert_eq!(report.vaccinated, 200);
        assert!(sim.seed_infections(10, &SeedMethod::Random).is_empty());

        let summary = sim.run_to_end(&mut NoopObserver);
        assert_eq!(summary.total_infected, 0);
        assert_eq!(summary.total_vaccinated, 200);
        assert!(sim.history().records().iter().all(|r| r.new_infections == 0));
    }

    #[test]
    fn partition_and_monotone_totals() {
        let mut sim = epidemic(mixed(150), 40);
        sim.seed_infections(5, &SeedMethod::Random);
        let mut last_deaths = 0;
        let mut cumulative = 0;
        for _ in 0..40 {
            let rec = sim.step();
            sim.population().check_partition().unwrap();
            assert_eq!(rec.counts.total(), 150);
            assert!(rec.counts[Compartment::D] >= last_deaths);
            last_deaths = rec.counts[Compartment::D];
            cumulative += rec.new_infections;
            assert_eq!(cumulative, sim.stats().total_infected);
        }
    }

    #[test]
    fn every_infection_has_one_terminal_event() {
        let mut sim = epidemic(mixed(120), 20);
        sim.seed_infections(5, &SeedMethod::Random);
        sim.run(8, &mut NoopObserver);
        for p in sim.graph().person_ids() {
            let c = sim.population().compartment(p);
            let terminal = sim.queue().pending_for(p).iter().filter(|e| e.action.is_terminal()).count();
            let expected = usize::from(c.is_active_infection());
            assert_eq!(terminal, expected, "{p:?} in {c}");
        }
    }

    #[test]
    fn same_seed_same_history() {
        let run = || {
            let mut sim = epidemic(mixed(120), 40);
            sim.seed_infections(5, &SeedMethod::Random);
            sim.run_to_end(&mut NoopObserver);
            sim.history().to_json().unwrap()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn observer_sees_every_day() {
        let mut sim = epidemic(ring(40), 12);
        sim.plan_mut().push(Trigger::on_day(
            3,
            Intervention::Lockdown(LockdownParams { duration: Some(4), ..LockdownParams::default() }),
        ));
        let mut rec = Recorder::default();
        sim.run_to_end(&mut rec);

        assert_eq!(rec.starts, 12);
        assert_eq!(rec.ends, 12);
        // Periodic checkpoints on 0, 5, 10 plus the final one.
        assert_eq!(rec.checkpoints, vec![Day(0), Day(5), Day(10), Day(12)]);
        // Applied on day 3, ended on day 7.
        assert_eq!(rec.interventions, vec![InterventionKind::Lockdown, InterventionKind::Lockdown]);
        assert_eq!(rec.summary.unwrap().total_days, 12);
        assert_eq!(sim.status(), SimStatus::Idle);
    }

    #[test]
    fn record_lists_active_interventions() {
        let mut sim = epidemic(ring(40), 10);
        sim.apply_named("mask_mandate", serde_json::json!({ "compliance": 1.0 })).unwrap();
        let rec = sim.step();
        assert_eq!(rec.intervention_kinds(), vec![InterventionKind::MaskMandate]);
        let Intervention::MaskMandate(mask) = rec.interventions[0].intervention else {
            panic!("expected a mask mandate");
        };
        assert_eq!(mask.compliance, 1.0);
        assert_eq!(rec.interventions[0].since, Day(0));
        assert!(sim.population().records().iter().all(|r| r.wears_mask));
    }

    #[test]
    fn threshold_trigger_fires_once() {
        let mut sim = epidemic(mixed(150), 30);
        let plan = InterventionPlan::new().with(Trigger::when(
            Condition::metric(Metric::Infectious, Comparison::AtLeast, 1.0),
            Intervention::Lockdown(LockdownParams::default()),
        ));
        *sim.plan_mut() = plan;
        sim.seed_infections(5, &SeedMethod::Random);
        sim.run_to_end(&mut NoopObserver);
        assert!(sim.plan().triggers()[0].fired());
        assert!(sim.interventions().is_active(InterventionKind::Lockdown));
    }
}

// ── Checkpoints ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod checkpoint_tests {
    use super::*;

    #[test]
    fn restore_returns_exact_snapshot() {
        let mut sim = epidemic(mixed(150), 30);
        sim.seed_infections(5, &SeedMethod::Random);
        sim.run(30, &mut NoopObserver);

        let saved = sim.checkpoints().get(Day(20)).unwrap().clone();
        sim.restore_checkpoint(Day(20)).unwrap();

        assert_eq!(sim.day(), Day(20));
        assert_eq!(sim.population().compartments(), saved.compartments);
        assert_eq!(sim.population().counts(), saved.counts);
        assert_eq!(sim.history().len(), 20);
        assert_eq!(sim.checkpoints().latest().unwrap().day, Day(20));
        sim.population().check_partition().unwrap();
        assert_eq!(sim.stats().total_infected, sim.history().cumulative_infections());
    }

    #[test]
    fn restored_run_keeps_invariants() {
        let mut sim = epidemic(mixed(150), 30);
        sim.seed_infections(5, &SeedMethod::Random);
        sim.run(25, &mut NoopObserver);
        sim.restore_checkpoint(Day(10)).unwrap();
        sim.run(10, &mut NoopObserver);

        for p in sim.graph().person_ids() {
            let c = sim.population().compartment(p);
            let terminal = sim.queue().pending_for(p).iter().filter(|e| e.action.is_terminal()).count();
            assert_eq!(terminal, usize::from(c.is_active_infection()));
        }
        assert_eq!(sim.history().len(), 20);
    }

    #[test]
    fn unknown_day_leaves_state_unchanged() {
        let mut sim = epidemic(mixed(100), 30);
        sim.seed_infections(3, &SeedMethod::Random);
        sim.run(8, &mut NoopObserver);
        let before = sim.population().compartments();

        let err = sim.restore_checkpoint(Day(3));
        assert!(matches!(err, Err(SimError::UnknownCheckpoint(Day(3)))));
        assert_eq!(sim.day(), Day(8));
        assert_eq!(sim.history().len(), 8);
        assert_eq!(sim.population().compartments(), before);
    }

    #[test]
    fn restore_keeps_doses_given_before_the_checkpoint() {
        let mut sim = epidemic(mixed(50), 20);
        let failed = VaccinationParams { rate: 1.0, efficacy: 0.0, ..VaccinationParams::default() };
        let report = sim.apply_intervention(Intervention::Vaccination(failed)).unwrap();
        assert_eq!(report.doses, 50);
        assert_eq!(report.vaccinated, 0);
        sim.seed_infections(3, &SeedMethod::Random);
        sim.run(10, &mut NoopObserver);

        sim.restore_checkpoint(Day(0)).unwrap();
        let dosed = sim.population().records().iter().filter(|r| r.is_vaccinated()).count();
        assert_eq!(dosed, 50);
        assert!(sim.population().records().iter().all(|r| r.vaccination.is_none_or(|v| v.day == Day(0))));
    }

    #[test]
    fn restore_undoes_later_doses() {
        let mut sim = epidemic(ring(40), 20);
        sim.run(7, &mut NoopObserver);
        let sure = VaccinationParams { rate: 1.0, efficacy: 1.0, ..VaccinationParams::default() };
        sim.apply_intervention(Intervention::Vaccination(sure)).unwrap();
        assert_eq!(sim.population().count(Compartment::V), 40);

        sim.restore_checkpoint(Day(5)).unwrap();
        assert_eq!(sim.population().count(Compartment::S), 40);
        assert!(sim.population().records().iter().all(|r| r.vaccination.is_none()));
        assert_eq!(sim.stats().total_vaccinated, 0);
    }

    #[test]
    fn restore_keeps_pending_isolation() {
        let mut sim = epidemic(mixed(100), 30);
        sim.seed_infections(10, &SeedMethod::Random);
        sim.run(11, &mut NoopObserver);
        assert!(sim.population().counts().infectious() > 0);
        let testing = TestingParams {
            rate:                 1.0,
            accuracy:             1.0,
            delay:                5,
            isolation_compliance: 1.0,
            duration:             None,
        };
        sim.apply_intervention(Intervention::Testing(testing)).unwrap();
        let isolating = |sim: &Sim| {
            sim.queue().events().iter().filter(|e| e.action == EventAction::Isolate).count()
        };
        let before = isolating(&sim);
        assert!(before > 0);

        sim.restore_checkpoint(Day(10)).unwrap();
        assert_eq!(isolating(&sim), before);
    }

    #[test]
    fn restore_rearms_later_triggers() {
        let mut sim = epidemic(ring(40), 20);
        sim.plan_mut().push(Trigger::on_day(3, Intervention::Hygiene(HygieneParams::default())));
        sim.plan_mut().push(Trigger::on_day(7, Intervention::Isolation(IsolationParams::default())));
        sim.run(8, &mut NoopObserver);
        assert!(sim.plan().triggers().iter().all(|t| t.fired()));

        sim.restore_checkpoint(Day(5)).unwrap();
        assert_eq!(sim.plan().triggers()[0].fired_on, Some(Day(3)));
        assert_eq!(sim.plan().triggers()[1].fired_on, None);

        sim.run(3, &mut NoopObserver);
        assert_eq!(sim.plan().triggers()[1].fired_on, Some(Day(7)));
    }

    #[test]
    fn store_replaces_same_day() {
        let mut store = CheckpointStore::new();
        let cp = |day: u32, c: Compartment| Checkpoint {
            day:          Day(day),
            compartments: vec![c],
            counts:       ep_core::CompartmentCounts::default(),
            vaccinations: vec![None],
        };
        store.insert(cp(5, Compartment::S));
        store.insert(cp(0, Compartment::S));
        store.insert(cp(5, Compartment::E));
        assert_eq!(store.days(), vec![Day(0), Day(5)]);
        assert_eq!(store.get(Day(5)).unwrap().compartments, vec![Compartment::E]);
    }
}

// ── Snapshots ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod snapshot_tests {
    use super::*;

    #[test]
    fn resumed_run_matches_uninterrupted_run() {
        let mut a = epidemic(mixed(120), 40);
        a.seed_infections(5, &SeedMethod::Random);
        a.apply_intervention(Intervention::Lockdown(LockdownParams {
            duration: Some(25),
            ..LockdownParams::default()
        }))
        .unwrap();
        a.run(15, &mut NoopObserver);

        let mut b = Sim::from_snapshot(mixed(120), a.snapshot()).unwrap();
        a.run(25, &mut NoopObserver);
        b.run(25, &mut NoopObserver);

        assert_eq!(a.history().to_json().unwrap(), b.history().to_json().unwrap());
        assert_eq!(a.population().records(), b.population().records());
        assert_eq!(a.stats(), b.stats());
    }

    #[test]
    fn json_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        let mut a = epidemic(mixed(80), 20);
        a.seed_infections(3, &SeedMethod::Random);
        a.run(10, &mut NoopObserver);
        a.save_json(&path).unwrap();

        let mut b = Sim::load_json(mixed(80), &path).unwrap();
        assert_eq!(b.day(), Day(10));
        a.run(10, &mut NoopObserver);
        b.run(10, &mut NoopObserver);
        assert_eq!(a.history(), b.history());
    }

    #[test]
    fn rejects_wrong_graph() {
        let a = epidemic(mixed(80), 20);
        let err = Sim::from_snapshot(mixed(81), a.snapshot());
        assert!(matches!(err, Err(SimError::SnapshotMismatch { what: "records", .. })));
    }

    #[test]
    fn rejects_future_version() {
        let a = epidemic(mixed(20), 20);
        let mut snap = a.snapshot();
        snap.version = SNAPSHOT_VERSION + 1;
        let err = Sim::from_snapshot(mixed(20), snap);
        assert!(matches!(err, Err(SimError::SnapshotVersion { .. })));
    }
}

// ── Statistics, history and tree ──────────────────────────────────────────────

#[cfg(test)]
mod stats_tests {
    use super::*;
    use crate::history::estimate_r_eff;

    #[test]
    fn r_eff_needs_two_windows() {
        assert_eq!(estimate_r_eff(&[1, 2, 3], 2), None);
        assert_eq!(estimate_r_eff(&[2, 2, 4, 4], 2), Some(2.0));
        assert_eq!(estimate_r_eff(&[0, 0, 4, 4], 2), None);
        assert_eq!(estimate_r_eff(&[3, 3, 0, 0], 2), None);
    }

    #[test]
    fn summary_rates() {
        let stats = RunStats { total_infected: 50, total_deaths: 5, ..RunStats::default() };
        let s = SummaryStats::from_run(&stats, 30, 200, 150);
        assert_eq!(s.attack_rate, 0.25);
        assert_eq!(s.case_fatality_rate, 0.1);
        assert_eq!(s.final_r_eff, 0.0);

        let none = SummaryStats::from_run(&RunStats::default(), 30, 200, 200);
        assert_eq!(none.case_fatality_rate, 0.0);
    }

    #[test]
    fn tree_accounts_for_every_infection() {
        let mut sim = epidemic(mixed(150), 30);
        sim.seed_infections(5, &SeedMethod::Random);
        sim.run_to_end(&mut NoopObserver);
        let tree = sim.tree();
        assert_eq!(tree.seeds().len() + tree.edge_count(), sim.stats().total_infected);

        let total: usize = tree.secondary_case_counts().iter().map(|&(_, n)| n).sum();
        assert_eq!(total, tree.edge_count());
        for (p, kids) in tree.secondary_case_counts() {
            for &child in tree.children_of(p) {
                let infection = sim.population().record(child).infection.unwrap();
                assert_eq!(infection.source, InfectionSource::Person(p));
            }
            assert_eq!(kids, tree.secondary_cases(p));
        }
    }

    #[test]
    fn subtree_depth_limit() {
        let mut sim = epidemic(mixed(150), 30);
        sim.seed_infections(5, &SeedMethod::Random);
        sim.run_to_end(&mut NoopObserver);
        let root = sim.tree().seeds()[0];
        let node = sim.tree().subtree(root, 0, sim.population(), sim.graph());
        assert_eq!(node.id, root);
        assert_eq!(node.infected_on, Some(Day(0)));
        assert!(node.children.is_none());

        let forest = sim.tree().forest(None, 2, sim.population(), sim.graph());
        assert_eq!(forest.len(), 5);
        assert!(forest.iter().all(|n| n.children.is_some()));
    }
}

// ── Ensembles ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod ensemble_tests {
    use super::*;

    #[test]
    fn runs_one_member_per_seed_in_order() {
        let seeds = ensemble_seeds(7, 3);
        assert_eq!(seeds.len(), 3);
        let make = |seed: u64| -> SimResult<Sim> {
            let mut sim = SimBuilder::new(mixed(60), DiseaseParameters::default())
                .config(config(15))
                .seed(seed)
                .build()?;
            sim.seed_infections(3, &SeedMethod::Random);
            Ok(sim)
        };
        let first: Vec<SummaryStats> = run_ensemble(&seeds, make).into_iter().map(Result::unwrap).collect();
        let second: Vec<SummaryStats> = run_ensemble(&seeds, make).into_iter().map(Result::unwrap).collect();
        assert_eq!(first.len(), 3);
        assert_eq!(first, second);
        assert!(first.iter().all(|s| s.total_days == 15));
    }
}
