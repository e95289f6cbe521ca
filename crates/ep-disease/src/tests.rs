//! Unit tests for ep-disease.

#[cfg(test)]
mod params_tests {
    use crate::{library, DiseaseError, DiseaseParameters};

    #[test]
    fn default_and_presets_validate() {
        DiseaseParameters::default().validate().unwrap();
        for name in library::PRESET_NAMES {
            let p = library::preset(name).unwrap();
            p.validate().unwrap_or_else(|e| panic!("{name}: {e}"));
        }
    }

    #[test]
    fn unknown_preset_errors() {
        assert!(matches!(library::preset("plague"), Err(DiseaseError::UnknownPreset(_))));
    }

    #[test]
    fn rejects_unnormalised_severity() {
        let p = DiseaseParameters { p_mild: 0.6, ..DiseaseParameters::default() };
        assert!(matches!(p.validate(), Err(DiseaseError::SeverityNotNormalised(_))));
    }

    #[test]
    fn tolerates_small_rounding_in_severity() {
        let p = DiseaseParameters { p_mild: 0.405, ..DiseaseParameters::default() };
        p.validate().unwrap();
    }

    #[test]
    fn rejects_r0_out_of_range() {
        assert!(DiseaseParameters::default().with_r0(25.0).is_err());
        assert!(DiseaseParameters::default().with_r0(-1.0).is_err());
        assert!(DiseaseParameters::default().with_r0(20.0).is_ok());
    }

    #[test]
    fn json_overrides_only_named_fields() {
        let p = DiseaseParameters::from_json_str(r#"{ "name": "X", "r0": 3.5 }"#).unwrap();
        assert_eq!(p.r0, 3.5);
        assert_eq!(p.p_mild, 0.4);
        assert_eq!(p.vaccine.waning_start_days, 120);
    }

    #[test]
    fn json_validation_applies() {
        assert!(DiseaseParameters::from_json_str(r#"{ "r0": 50 }"#).is_err());
    }

    #[test]
    fn json_round_trip_preserves_everything() {
        let p = library::influenza();
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(DiseaseParameters::from_json_str(&json).unwrap(), p);
    }
}

#[cfg(test)]
mod age_tests {
    use crate::{AgeGroup, AgeStratification};

    #[test]
    fn bands() {
        assert_eq!(AgeGroup::from_age(0), AgeGroup::Age0To9);
        assert_eq!(AgeGroup::from_age(19), AgeGroup::Age10To19);
        assert_eq!(AgeGroup::from_age(80), AgeGroup::Age80Plus);
        assert_eq!(AgeGroup::from_age(255), AgeGroup::Age80Plus);
    }

    #[test]
    fn default_table_values() {
        let t = AgeStratification::default();
        assert_eq!(t.for_age(5).susceptibility, 0.5);
        assert_eq!(t.for_age(65).mortality, 0.8);
        assert_eq!(t.for_age(90).severity, 0.8);
    }
}

#[cfg(test)]
mod progression_tests {
    use ep_core::{SimRng, SymptomClass};

    use crate::progression::adjusted_severity;
    use crate::{sample_course, Course, DiseaseParameters, TerminalOutcome};

    #[test]
    fn adjusted_probabilities_sum_to_one() {
        let p = DiseaseParameters::default();
        for age in [0, 25, 55, 85] {
            for vaccinated in [false, true] {
                let probs = adjusted_severity(&p, age, vaccinated);
                let sum: f64 = probs.iter().sum();
                assert!((sum - 1.0).abs() < 1e-9, "age {age} vax {vaccinated}: {sum}");
                assert!(probs.iter().all(|&x| (0.0..=1.0).contains(&x)));
            }
        }
    }

    #[test]
    fn vaccination_suppresses_critical() {
        let p = DiseaseParameters::default();
        let plain = adjusted_severity(&p, 70, false);
        let vax = adjusted_severity(&p, 70, true);
        assert!(vax[3] < plain[3]);
        assert!(vax[0] > plain[0]);
    }

    #[test]
    fn age_shifts_mass_toward_critical() {
        let p = DiseaseParameters::default();
        assert!(adjusted_severity(&p, 85, false)[3] > adjusted_severity(&p, 5, false)[3]);
    }

    #[test]
    fn every_course_has_one_valid_terminal_outcome() {
        let p = crate::library::ebola();
        let mut rng = SimRng::new(11);
        let mut deaths = 0;
        for i in 0..2_000 {
            let c = sample_course((i % 100) as u8, &p, i % 3 == 0, &mut rng);
            assert!(c.incubation_days >= 1);
            assert!(c.infectious_days >= 3);
            assert!(c.outcome.day() > c.incubation_days);
            if let Some(h) = c.hospital_day {
                assert!(matches!(c.symptoms, SymptomClass::Severe | SymptomClass::Critical));
                assert!(h > c.incubation_days && h <= c.outcome.day());
            }
            if let TerminalOutcome::Recover { day } = c.outcome {
                assert_eq!(day, c.incubation_days + c.infectious_days);
            } else {
                deaths += 1;
            }
        }
        assert!(deaths > 0, "ebola preset should produce some deaths");
    }

    #[test]
    fn sampling_is_deterministic() {
        let p = DiseaseParameters::default();
        let mut a = SimRng::new(3);
        let mut b = SimRng::new(3);
        for age in 0..50u8 {
            assert_eq!(sample_course(age, &p, false, &mut a), sample_course(age, &p, false, &mut b));
        }
    }

    #[test]
    fn sanitize_applies_fallback_day() {
        let bad = Course {
            symptoms:        SymptomClass::Severe,
            incubation_days: 4,
            infectious_days: 6,
            hospital_day:    Some(30),
            outcome:         TerminalOutcome::Die { day: 0 },
        };
        let (fixed, repaired) = bad.sanitize();
        assert!(repaired);
        assert_eq!(fixed.outcome, TerminalOutcome::Die { day: 10 });
        assert_eq!(fixed.hospital_day, None);
    }

    #[test]
    fn sanitize_leaves_valid_course_alone() {
        let ok = Course {
            symptoms:        SymptomClass::Mild,
            incubation_days: 2,
            infectious_days: 5,
            hospital_day:    None,
            outcome:         TerminalOutcome::Recover { day: 7 },
        };
        assert_eq!(ok.sanitize(), (ok, false));
    }
}

#[cfg(test)]
mod transmission_tests {
    use ep_core::{Day, SimRng, SymptomClass};
    use ep_graph::{ContactAttrs, ContactKind};

    use crate::transmission::*;
    use crate::DiseaseParameters;

    fn party() -> Party {
        Party { age: 40, compliance: 0.5, mobility: 1.0, degree: 4, ..Party::default() }
    }

    fn exposure(kind: ContactKind) -> Exposure {
        Exposure {
            infector:    Party { symptoms: Some(SymptomClass::Mild), ..party() },
            susceptible: party(),
            contact:     ContactAttrs::new(kind),
            day:         Day(10),
            day_of_year: 10,
        }
    }

    #[test]
    fn base_rate_saturates_with_degree() {
        assert!((base_rate(2.5, 0, 0) - 0.2).abs() < 1e-12);
        assert!(base_rate(2.5, 100, 100) < base_rate(2.5, 2, 2));
    }

    #[test]
    fn contact_type_ordering() {
        let f = |k| contact_factor(&ContactAttrs::new(k));
        assert!(f(ContactKind::Household) > f(ContactKind::Hub));
        assert!(f(ContactKind::Hub) > f(ContactKind::School));
        assert!(f(ContactKind::School) > f(ContactKind::Workplace));
        assert!(f(ContactKind::Workplace) > f(ContactKind::Random));
    }

    #[test]
    fn mask_factor_requires_mandate() {
        let none = Measures::default();
        assert_eq!(mask_factor(true, true, &none), 1.0);
        let mandate = Measures { mask_efficacy: Some(0.5), ..Measures::default() };
        assert!((mask_factor(true, true, &mandate) - 0.5 * 0.65).abs() < 1e-12);
        assert!((mask_factor(true, false, &mandate) - 0.85).abs() < 1e-12);
        assert_eq!(mask_factor(false, false, &mandate), 1.0);
    }

    #[test]
    fn isolation_and_travel_reduce() {
        let mut rng = SimRng::new(1);
        let mut e = exposure(ContactKind::Random);
        e.susceptible.isolated = true;
        let travel = Measures { travel_reduction: Some(0.5), ..Measures::default() };
        assert!((npi_factor(&e, &travel, &mut rng) - 0.05).abs() < 1e-12);
        let home = exposure(ContactKind::Household);
        assert_eq!(npi_factor(&home, &travel, &mut rng), 1.0);
    }

    #[test]
    fn distancing_needs_both_parties_compliant() {
        let mut rng = SimRng::new(1);
        let measures = Measures {
            distancing: Some(DistancingMeasure { effectiveness: 0.3, compliance: 0.7 }),
            ..Measures::default()
        };
        let mut e = exposure(ContactKind::Workplace);
        e.infector.compliance = 0.0;
        e.susceptible.compliance = 1.0;
        assert_eq!(npi_factor(&e, &measures, &mut rng), 1.0);
        e.infector.compliance = 1.0;
        assert!((npi_factor(&e, &measures, &mut rng) - 0.79).abs() < 1e-12);
    }

    #[test]
    fn seasonality_noop_at_zero_amplitude() {
        let p = DiseaseParameters::default();
        assert_eq!(seasonality_factor(&p, 200), 1.0);
        let flu = crate::library::influenza();
        assert!((seasonality_factor(&flu, 45) - 1.3).abs() < 1e-12);
        assert!(seasonality_factor(&flu, 45 + 182) < 1.0);
    }

    #[test]
    fn full_immunity_blocks_transmission() {
        let p = DiseaseParameters::default();
        let mut rng = SimRng::new(2);
        let mut e = exposure(ContactKind::Household);
        e.susceptible.immunity = 1.0;
        assert_eq!(probability(&e, &Measures::default(), &p, &mut rng), 0.0);
    }

    #[test]
    fn vaccine_efficacy_wanes_after_start() {
        let p = DiseaseParameters::default();
        let vaccinated = Party { vaccinated_on: Some(Day(0)), ..party() };
        let early = immunity_factor(&p, &vaccinated, Day(30));
        let late = immunity_factor(&p, &vaccinated, Day(400));
        assert!((early - 0.3).abs() < 1e-12);
        assert!(late > early);
    }

    #[test]
    fn asymptomatic_and_outdoor_discounts() {
        assert_eq!(symptom_factor(Some(SymptomClass::Asymptomatic)), 0.3);
        assert_eq!(symptom_factor(Some(SymptomClass::Critical)), 1.0);
        let outdoor = ContactAttrs::new(ContactKind::Hub).outdoor();
        assert!((environment_factor(&outdoor, &Measures::default()) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn probability_bounded_for_degenerate_inputs() {
        let mut rng = SimRng::new(9);
        let extreme = DiseaseParameters::default().with_r0(20.0).unwrap();
        let all_on = Measures {
            distancing:       Some(DistancingMeasure { effectiveness: 1.0, compliance: 1.0 }),
            travel_reduction: Some(1.0),
            mask_efficacy:    Some(1.0),
            ventilation:      Some(1.0),
            hygiene:          Some(1.0),
        };
        for params in [DiseaseParameters::default(), extreme] {
            for measures in [Measures::default(), all_on] {
                for degree in [0, 1, 1_000] {
                    for weight in [0.0, 1.0, 1e6] {
                        let mut e = exposure(ContactKind::Household);
                        e.infector.degree = degree;
                        e.susceptible.degree = degree;
                        e.contact = e.contact.with_weight(weight);
                        let p = probability(&e, &measures, &params, &mut rng);
                        assert!((0.0..=MAX_PROBABILITY).contains(&p), "p = {p}");
                    }
                }
            }
        }
    }

    #[test]
    fn nan_input_yields_zero() {
        let mut rng = SimRng::new(9);
        let mut e = exposure(ContactKind::Household);
        e.infector.mobility = f64::NAN;
        assert_eq!(probability(&e, &Measures::default(), &DiseaseParameters::default(), &mut rng), 0.0);
    }
}

#[cfg(test)]
mod immunity_tests {
    use crate::immunity::*;
    use crate::{VaccineProfile, WaningCurve};

    #[test]
    fn waning_curves() {
        assert_eq!(waning_fraction(WaningCurve::Linear, 0.01, 0), 0.0);
        assert!((waning_fraction(WaningCurve::Linear, 0.01, 50) - 0.5).abs() < 1e-12);
        assert_eq!(waning_fraction(WaningCurve::Linear, 0.01, 500), 1.0);
        let e = waning_fraction(WaningCurve::Exponential, 0.01, 50);
        assert!(e > 0.39 && e < 0.40);
    }

    #[test]
    fn vaccine_immunity_flat_then_decays() {
        let v = VaccineProfile::default();
        assert_eq!(vaccine_immunity(&v, 0), 0.95);
        assert_eq!(vaccine_immunity(&v, 120), 0.95);
        assert!((vaccine_immunity(&v, 220) - 0.65).abs() < 1e-12);
        assert_eq!(vaccine_immunity(&v, 10_000), 0.0);
    }

    #[test]
    fn natural_waning_is_slow_and_monotone() {
        let mut immunity = 0.8;
        for _ in 0..365 {
            let next = natural_waning_step(immunity, 0.5);
            assert!(next <= immunity);
            immunity = next;
        }
        assert!((immunity - 0.4).abs() < 1e-9);
    }
}
