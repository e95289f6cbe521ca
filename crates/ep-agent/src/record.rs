//! `HealthRecord` — everything about a person that changes during a run.

use ep_core::{Compartment, Day, PersonId, SymptomClass};
use ep_disease::{Course, Party};
use ep_graph::Demographics;
use serde::{Deserialize, Serialize};

/// Who caused an infection.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InfectionSource {
    /// Introduced by seeding rather than transmission.
    Seed,
    Person(PersonId),
}

impl InfectionSource {
    pub fn person(self) -> Option<PersonId> {
        match self {
            InfectionSource::Seed => None,
            InfectionSource::Person(p) => Some(p),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Infection {
    pub day:    Day,
    pub source: InfectionSource,
    pub course: Course,
}

impl Infection {
    /// Absolute day the course ends.
    pub fn terminal_day(&self) -> Day {
        self.day + self.course.outcome.day()
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Vaccination {
    pub day:       Day,
    /// The efficacy roll succeeded and the person moved to V.  A failed
    /// roll still counts as vaccinated for severity and waned efficacy.
    pub protected: bool,
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct HealthRecord {
    /// Private: only [`Population::set_compartment`](crate::Population::set_compartment)
    /// may change it.
    compartment:         Compartment,
    pub days_in_state:   u32,
    pub immunity:        f64,
    /// Current mobility; starts at the demographic baseline.
    pub mobility:        f64,
    pub isolated:        bool,
    pub wears_mask:      bool,
    pub vaccination:     Option<Vaccination>,
    pub infection:       Option<Infection>,
    pub hospitalized_on: Option<Day>,
}

impl HealthRecord {
    /// A fresh susceptible record.
    pub fn new(baseline_mobility: f64) -> Self {
        Self {
            compartment:     Compartment::S,
            days_in_state:   0,
            immunity:        0.0,
            mobility:        baseline_mobility,
            isolated:        false,
            wears_mask:      false,
            vaccination:     None,
            infection:       None,
            hospitalized_on: None,
        }
    }

    #[inline]
    pub fn compartment(&self) -> Compartment {
        self.compartment
    }

    pub(crate) fn set_compartment_unchecked(&mut self, c: Compartment) {
        self.compartment = c;
    }

    pub fn symptoms(&self) -> Option<SymptomClass> {
        self.infection.map(|i| i.course.symptoms)
    }

    pub fn is_vaccinated(&self) -> bool {
        self.vaccination.is_some()
    }

    /// Transmission-model view of this person.
    pub fn party(&self, demographics: &Demographics, degree: usize) -> Party {
        Party {
            age:           demographics.age,
            compliance:    demographics.compliance,
            mobility:      self.mobility,
            degree,
            isolated:      self.isolated,
            wears_mask:    self.wears_mask,
            immunity:      self.immunity,
            vaccinated_on: self.vaccination.map(|v| v.day),
            symptoms:      self.symptoms(),
        }
    }
}
