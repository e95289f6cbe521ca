//! Unit tests for ep-intervention.

use ep_agent::Population;
use ep_core::{Compartment, Day, InterventionKind, PersonId, SimRng};
use ep_disease::VaccineProfile;
use ep_graph::{ContactAttrs, ContactGraph, ContactGraphBuilder, ContactKind, Demographics};
use ep_schedule::EventQueue;

use crate::*;

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Ten people aged 0, 10, …, 90 on a ring of household contacts plus two
/// random long-range contacts.
struct World {
    graph:   ContactGraph,
    pop:     Population,
    queue:   EventQueue,
    rng:     SimRng,
    vaccine: VaccineProfile,
}

impl World {
    fn new() -> Self {
        let mut b = ContactGraphBuilder::new();
        for i in 0..10u32 {
            b.add_person(Demographics {
                mobility: 0.5,
                health_risk: 1.0 - i as f64 / 10.0,
                ..Demographics::with_age((i * 10) as u8)
            })
            .unwrap();
        }
        for i in 0..10u32 {
            b.add_contact(PersonId(i), PersonId((i + 1) % 10), ContactAttrs::new(ContactKind::Household))
                .unwrap();
        }
        b.add_contact(PersonId(0), PersonId(5), ContactAttrs::new(ContactKind::Random)).unwrap();
        b.add_contact(PersonId(2), PersonId(7), ContactAttrs::new(ContactKind::Random)).unwrap();
        let graph = b.build();
        let pop = Population::from_graph(&graph);
        Self { graph, pop, queue: EventQueue::new(), rng: SimRng::new(7), vaccine: VaccineProfile::default() }
    }

    fn ctx(&mut self, day: u32) -> ApplyContext<'_> {
        ApplyContext {
            day:        Day(day),
            population: &mut self.pop,
            graph:      &mut self.graph,
            queue:      &mut self.queue,
            rng:        &mut self.rng,
            vaccine:    &self.vaccine,
        }
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod command_tests {
    use super::*;

    #[test]
    fn parses_name_and_params_with_defaults() {
        let cmd = Intervention::from_name_and_params(
            "social_distancing",
            serde_json::json!({ "reduction": 0.4 }),
        )
        .unwrap();
        assert_eq!(
            cmd,
            Intervention::SocialDistancing(DistancingParams {
                effectiveness: 0.4,
                compliance:    0.7,
                duration:      None,
            })
        );
        let reopen = Intervention::from_name_and_params("reopen", serde_json::Value::Null).unwrap();
        assert_eq!(reopen, Intervention::Reopen(ReopenParams { gradual: true }));
    }

    #[test]
    fn rejects_bad_commands() {
        assert!(matches!(
            Intervention::from_name_and_params("curfew", serde_json::Value::Null),
            Err(InterventionError::Core(_))
        ));
        assert!(matches!(
            Intervention::from_name_and_params("lockdown", serde_json::json!({ "strictness": 1.5 })),
            Err(InterventionError::OutOfUnitRange { what: "strictness", .. })
        ));
        assert!(matches!(
            Intervention::from_name_and_params("lockdown", serde_json::json!([1, 2])),
            Err(InterventionError::BadParams(_))
        ));
    }

    #[test]
    fn json_command_round_trip() {
        let cmd = Intervention::from_json_str(
            r#"{"type": "vaccination", "rate": 0.2, "priority": "vulnerable", "duration": 10}"#,
        )
        .unwrap();
        assert_eq!(cmd.kind(), InterventionKind::Vaccination);
        assert_eq!(cmd.duration(), Some(10));
        let back: Intervention = serde_json::from_str(&serde_json::to_string(&cmd).unwrap()).unwrap();
        assert_eq!(back, cmd);
    }

    #[test]
    fn measures_reflect_active_entries() {
        let mut w = World::new();
        let mut state = InterventionState::new();
        assert_eq!(state.measures(0.3), ep_disease::Measures::default());

        state.apply(Intervention::MaskMandate(MaskParams::default()), &mut w.ctx(0)).unwrap();
        state
            .apply(Intervention::Ventilation(VentilationParams::default()), &mut w.ctx(0))
            .unwrap();
        state
            .apply(Intervention::SocialDistancing(DistancingParams::default()), &mut w.ctx(0))
            .unwrap();
        let m = state.measures(0.3);
        assert_eq!(m.mask_efficacy, Some(0.3));
        assert_eq!(m.ventilation, Some(0.4));
        assert_eq!(m.hygiene, None);
        assert_eq!(m.distancing.map(|d| d.effectiveness), Some(0.3));
        assert_eq!(state.kinds().len(), 3);
    }
}

// ── Application ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod apply_tests {
    use ep_schedule::EventAction;

    use super::*;

    #[test]
    fn full_compliance_lockdown_scales_mobility_and_isolates() {
        let mut w = World::new();
        let mut state = InterventionState::new();
        let cmd = Intervention::Lockdown(LockdownParams { strictness: 0.8, compliance: 1.0, duration: Some(10) });
        let report = state.apply(cmd, &mut w.ctx(3)).unwrap();
        assert_eq!(report.people_affected, 10);
        assert_eq!(report.events_scheduled, 1);
        for r in w.pop.records() {
            assert!((r.mobility - 0.1).abs() < 1e-12);
            assert!(r.isolated);
        }
        assert_eq!(state.get(InterventionKind::Lockdown).unwrap().ends_on, Some(Day(13)));
        assert_eq!(w.queue.next_day(), Some(Day(13)));

        // Re-applying replaces the pending expiry.
        state.apply(cmd, &mut w.ctx(5)).unwrap();
        assert_eq!(w.queue.len(), 1);
        assert_eq!(w.queue.next_day(), Some(Day(15)));
    }

    #[test]
    fn mild_lockdown_does_not_isolate() {
        let mut w = World::new();
        let mut state = InterventionState::new();
        let cmd = Intervention::Lockdown(LockdownParams { strictness: 0.5, compliance: 1.0, duration: None });
        state.apply(cmd, &mut w.ctx(0)).unwrap();
        assert!(w.pop.records().iter().all(|r| !r.isolated));
        assert!(w.queue.is_empty());
    }

    #[test]
    fn vaccination_by_age_takes_the_oldest() {
        let mut w = World::new();
        let mut state = InterventionState::new();
        let cmd = Intervention::Vaccination(VaccinationParams {
            rate: 0.3,
            efficacy: 1.0,
            ..VaccinationParams::default()
        });
        let report = state.apply(cmd, &mut w.ctx(1)).unwrap();
        assert_eq!((report.doses, report.vaccinated), (3, 3));
        assert_eq!(
            w.pop.sorted_members(Compartment::V),
            vec![PersonId(7), PersonId(8), PersonId(9)]
        );
        assert_eq!(w.pop.record(PersonId(9)).immunity, 0.95);
        w.pop.check_partition().unwrap();
    }

    #[test]
    fn vaccination_by_vulnerability_and_capacity() {
        let mut w = World::new();
        let mut state = InterventionState::new();
        let cmd = Intervention::Vaccination(VaccinationParams {
            rate: 1.0,
            efficacy: 1.0,
            priority: Priority::Vulnerable,
            daily_capacity: Some(2),
            duration: None,
        });
        state.apply(cmd, &mut w.ctx(1)).unwrap();
        assert_eq!(w.pop.sorted_members(Compartment::V), vec![PersonId(0), PersonId(1)]);
    }

    #[test]
    fn failed_doses_leave_people_susceptible_but_vaccinated() {
        let mut w = World::new();
        let mut state = InterventionState::new();
        let cmd = Intervention::Vaccination(VaccinationParams {
            rate: 1.0,
            efficacy: 0.0,
            ..VaccinationParams::default()
        });
        let report = state.apply(cmd, &mut w.ctx(4)).unwrap();
        assert_eq!((report.doses, report.vaccinated), (10, 0));
        assert_eq!(w.pop.count(Compartment::S), 10);
        let v = w.pop.record(PersonId(2)).vaccination.unwrap();
        assert_eq!(v.day, Day(4));
        assert!(!v.protected);

        // Already-dosed people are not offered a second dose.
        let again = state.apply(cmd, &mut w.ctx(5)).unwrap();
        assert_eq!(again.doses, 0);
    }

    #[test]
    fn campaign_with_duration_doses_daily() {
        let mut w = World::new();
        let mut state = InterventionState::new();
        let cmd = Intervention::Vaccination(VaccinationParams {
            rate: 0.5,
            efficacy: 1.0,
            duration: Some(5),
            ..VaccinationParams::default()
        });
        state.apply(cmd, &mut w.ctx(0)).unwrap();
        assert_eq!(w.pop.count(Compartment::V), 5);
        assert!(state.daily_update(&mut w.ctx(0)).is_empty(), "same-day update is skipped");
        let reports = state.daily_update(&mut w.ctx(1));
        assert_eq!(reports.len(), 1);
        assert_eq!(w.pop.count(Compartment::V), 7);
    }

    #[test]
    fn testing_schedules_or_applies_isolation() {
        let mut w = World::new();
        for (p, c) in [(1, Compartment::Im), (4, Compartment::Ia), (6, Compartment::E)] {
            w.pop.set_compartment(PersonId(p), c);
        }
        let mut state = InterventionState::new();
        let delayed = Intervention::Testing(TestingParams {
            rate: 1.0,
            accuracy: 1.0,
            delay: 2,
            isolation_compliance: 1.0,
            duration: None,
        });
        let report = state.apply(delayed, &mut w.ctx(10)).unwrap();
        assert_eq!(report.events_scheduled, 2);
        let due = w.queue.pop_due(Day(12));
        assert!(due.iter().all(|e| e.action == EventAction::Isolate));
        let mut targets: Vec<PersonId> = due.iter().filter_map(|e| e.target).collect();
        targets.sort();
        assert_eq!(targets, vec![PersonId(1), PersonId(4)]);

        let immediate = Intervention::Testing(TestingParams {
            rate: 1.0,
            accuracy: 1.0,
            delay: 0,
            isolation_compliance: 1.0,
            duration: None,
        });
        state.apply(immediate, &mut w.ctx(12)).unwrap();
        assert!(w.pop.record(PersonId(1)).isolated);
        assert!(w.pop.record(PersonId(4)).isolated);
        assert!(!w.pop.record(PersonId(6)).isolated);
    }

    #[test]
    fn isolation_targets_symptomatic_only() {
        let mut w = World::new();
        for (p, c) in [(0, Compartment::Ia), (1, Compartment::Im), (2, Compartment::Is), (3, Compartment::Ih)] {
            w.pop.set_compartment(PersonId(p), c);
        }
        let mut state = InterventionState::new();
        let report = state
            .apply(Intervention::Isolation(IsolationParams { compliance: 1.0, duration: None }), &mut w.ctx(0))
            .unwrap();
        assert_eq!(report.people_affected, 3);
        assert!(!w.pop.record(PersonId(0)).isolated);
        assert!(w.pop.record(PersonId(3)).isolated);
    }

    #[test]
    fn travel_restrictions_cut_and_restore_random_contacts() {
        let mut w = World::new();
        let mut state = InterventionState::new();
        let cmd = Intervention::TravelRestrictions(TravelParams { reduction: 1.0, duration: Some(3) });
        let report = state.apply(cmd, &mut w.ctx(0)).unwrap();
        assert_eq!(report.contacts_changed, 2);
        assert_eq!(w.graph.inactive_count(), 2);
        assert_eq!(w.graph.active_neighbors(PersonId(0)).count(), 2);

        let ended = state.end(InterventionKind::TravelRestrictions, &mut w.ctx(3)).unwrap();
        assert_eq!(ended.contacts_changed, 2);
        assert_eq!(w.graph.inactive_count(), 0);
        assert!(state.end(InterventionKind::TravelRestrictions, &mut w.ctx(3)).is_none());
    }

    #[test]
    fn gradual_reopen_restores_baseline_over_ramp() {
        let mut w = World::new();
        let mut state = InterventionState::new();
        let lock = Intervention::Lockdown(LockdownParams { strictness: 0.8, compliance: 1.0, duration: Some(50) });
        state.apply(lock, &mut w.ctx(0)).unwrap();
        state.apply(Intervention::Reopen(ReopenParams { gradual: true }), &mut w.ctx(20)).unwrap();

        assert!(!state.is_active(InterventionKind::Lockdown));
        assert!(state.is_active(InterventionKind::Reopen));
        assert!(w.queue.is_empty(), "pending end_lockdown is cancelled");
        assert!(w.pop.records().iter().all(|r| !r.isolated));
        let first = w.pop.record(PersonId(0)).mobility;
        assert!(first > 0.1 && first < 0.5);

        let mut last = first;
        for day in 21..=(20 + REOPEN_RAMP_DAYS) {
            state.daily_update(&mut w.ctx(day));
            let now = w.pop.record(PersonId(0)).mobility;
            assert!(now >= last);
            last = now;
        }
        assert!((last - 0.5).abs() < 1e-12);
        assert!(!state.is_active(InterventionKind::Reopen));
    }

    #[test]
    fn immediate_reopen() {
        let mut w = World::new();
        let mut state = InterventionState::new();
        let lock = Intervention::Lockdown(LockdownParams { strictness: 0.8, compliance: 1.0, duration: None });
        state.apply(lock, &mut w.ctx(0)).unwrap();
        state.apply(Intervention::Reopen(ReopenParams { gradual: false }), &mut w.ctx(5)).unwrap();
        assert!(state.is_empty());
        assert!(w.pop.records().iter().all(|r| (r.mobility - 0.5).abs() < 1e-12));
    }
}

// ── Triggers & scenarios ──────────────────────────────────────────────────────

#[cfg(test)]
mod trigger_tests {
    use ep_core::CompartmentCounts;

    use super::*;

    fn counts_with_infectious(n: usize) -> CompartmentCounts {
        let mut c = CompartmentCounts::default();
        c[Compartment::Im] = n;
        c[Compartment::S] = 1000 - n;
        c
    }

    fn ctx(day: u32, infectious: usize, state: &InterventionState) -> TriggerContext<'_> {
        TriggerContext { day: Day(day), counts: counts_with_infectious(infectious), new_infections: 0, state }
    }

    #[test]
    fn default_policy_lockdown_needs_threshold() {
        let state = InterventionState::new();
        let mut plan = default_policy();
        assert!(plan.fire_next(&ctx(29, 80, &state)).is_none());
        assert!(plan.fire_next(&ctx(30, 50, &state)).is_none(), "threshold is strict");
        // The day passed with the condition false: the trigger never fires.
        assert!(plan.fire_next(&ctx(31, 80, &state)).is_none());

        let mut plan = default_policy();
        let cmd = plan.fire_next(&ctx(30, 51, &state)).unwrap();
        assert_eq!(cmd.kind(), InterventionKind::Lockdown);
        assert!(plan.fire_next(&ctx(30, 51, &state)).is_none(), "one-shot");
    }

    #[test]
    fn default_policy_reopen_requires_active_lockdown() {
        let mut w = World::new();
        let mut state = InterventionState::new();
        let mut plan = default_policy();
        assert!(plan.fire_next(&ctx(90, 0, &state)).is_none());

        let mut plan2 = default_policy();
        state.apply(Intervention::Lockdown(LockdownParams::default()), &mut w.ctx(30)).unwrap();
        let cmd = plan2.fire_next(&ctx(90, 0, &state)).unwrap();
        assert_eq!(cmd.kind(), InterventionKind::Reopen);
        assert!(plan.triggers().iter().all(|t| !t.fired()));
    }

    #[test]
    fn dayless_trigger_fires_on_first_match() {
        let state = InterventionState::new();
        let mut plan = InterventionPlan::new().with(Trigger::when(
            Condition::metric(Metric::Hospitalized, Comparison::AtLeast, 2.0),
            Intervention::Isolation(IsolationParams::default()),
        ));
        let mut counts = CompartmentCounts::default();
        let mut c = TriggerContext { day: Day(3), counts, new_infections: 0, state: &state };
        assert!(plan.fire_next(&c).is_none());
        counts[Compartment::Ih] = 1;
        counts[Compartment::Ic] = 1;
        c.counts = counts;
        c.day = Day(9);
        assert!(plan.fire_next(&c).is_some());
        assert!(plan.fire_next(&c).is_none());
        assert_eq!(plan.triggers()[0].fired_on, Some(Day(9)));
    }

    #[test]
    fn rearm_clears_only_later_firings() {
        let state = InterventionState::new();
        let mut plan = InterventionPlan::new()
            .with(Trigger::on_day(2, Intervention::Hygiene(HygieneParams::default())))
            .with(Trigger::on_day(6, Intervention::Isolation(IsolationParams::default())));
        let counts = CompartmentCounts::default();
        for day in [2, 6] {
            let c = TriggerContext { day: Day(day), counts, new_infections: 0, state: &state };
            assert!(plan.fire_next(&c).is_some());
        }

        assert_eq!(plan.rearm_from(Day(4)), 1);
        assert!(plan.triggers()[0].fired());
        assert!(!plan.triggers()[1].fired());

        let c = TriggerContext { day: Day(6), counts, new_infections: 0, state: &state };
        assert_eq!(plan.fire_next(&c).map(|i| i.kind()), Some(InterventionKind::Isolation));
    }

    #[test]
    fn plan_loads_from_json() {
        let json = r#"[
            {"day": 5, "intervention": {"type": "hygiene"}},
            {"conditions": [{"when": "metric", "metric": "new_infections", "op": "above", "value": 10}],
             "intervention": {"type": "mask_mandate", "compliance": 0.9}}
        ]"#;
        let plan = InterventionPlan::from_json_str(json).unwrap();
        assert_eq!(plan.len(), 2);
        assert_eq!(plan.triggers()[0].day, Some(Day(5)));
        assert!(!plan.triggers()[1].fired());
        let back: InterventionPlan = serde_json::from_str(&serde_json::to_string(&plan).unwrap()).unwrap();
        assert_eq!(back, plan);
    }

    #[test]
    fn scenarios_by_name() {
        for s in Scenario::ALL {
            assert_eq!(s.name().parse::<Scenario>().unwrap(), s);
        }
        assert!(matches!("panic".parse::<Scenario>(), Err(InterventionError::UnknownScenario(_))));
        assert!(Scenario::NoIntervention.plan().is_empty());
        assert_eq!(Scenario::HerdImmunity.plan().len(), 3);
        let full = Scenario::FullLockdown.plan();
        assert_eq!(full.triggers()[0].intervention.duration(), Some(30));
    }
}
