//! Running totals and the end-of-run summary.

use ep_agent::Population;
use ep_core::{Compartment, Day};
use serde::{Deserialize, Serialize};

use crate::History;

/// Totals kept up to date as the run progresses.
#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct RunStats {
    pub total_infected:     usize,
    pub total_recovered:    usize,
    pub total_deaths:       usize,
    /// Doses that moved someone to V.
    pub total_vaccinated:   usize,
    pub total_hospitalized: usize,
    pub peak_infections:    usize,
    pub peak_day:           Day,
    pub last_r_eff:         Option<f64>,
}

impl RunStats {
    /// Rebuild the totals from person records and the recorded history.
    /// Nobody leaves R, D or V, so each total is a count of records.
    pub fn recompute(population: &Population, history: &History) -> Self {
        let mut stats = RunStats::default();
        for r in population.records() {
            stats.total_infected += usize::from(r.infection.is_some());
            stats.total_hospitalized += usize::from(r.hospitalized_on.is_some());
        }
        stats.total_recovered = population.count(Compartment::R);
        stats.total_deaths = population.count(Compartment::D);
        stats.total_vaccinated = population.count(Compartment::V);
        for rec in history.records() {
            stats.observe_peak(rec.day, rec.counts.infectious());
        }
        stats.last_r_eff = history.last().and_then(|r| r.r_eff);
        stats
    }

    pub(crate) fn observe_peak(&mut self, day: Day, infectious: usize) {
        if infectious > self.peak_infections {
            self.peak_infections = infectious;
            self.peak_day = day;
        }
    }
}

/// Final report of a run.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct SummaryStats {
    pub total_days:         u32,
    pub initial_population: usize,
    pub final_susceptible:  usize,
    pub total_infected:     usize,
    pub total_recovered:    usize,
    pub total_deaths:       usize,
    pub total_vaccinated:   usize,
    pub total_hospitalized: usize,
    pub peak_infections:    usize,
    pub peak_day:           Day,
    /// Fraction of the population ever infected.
    pub attack_rate:        f64,
    /// Deaths per infection; 0 when nobody was infected.
    pub case_fatality_rate: f64,
    /// Last R-effective estimate, or 0 if none was ever available.
    pub final_r_eff:        f64,
}

impl SummaryStats {
    pub fn from_run(stats: &RunStats, total_days: u32, population: usize, susceptible: usize) -> Self {
        Self {
            total_days,
            initial_population: population,
            final_susceptible:  susceptible,
            total_infected:     stats.total_infected,
            total_recovered:    stats.total_recovered,
            total_deaths:       stats.total_deaths,
            total_vaccinated:   stats.total_vaccinated,
            total_hospitalized: stats.total_hospitalized,
            peak_infections:    stats.peak_infections,
            peak_day:           stats.peak_day,
            attack_rate:        stats.total_infected as f64 / population.max(1) as f64,
            case_fatality_rate: stats.total_deaths as f64 / stats.total_infected.max(1) as f64,
            final_r_eff:        stats.last_r_eff.unwrap_or(0.0),
        }
    }

    /// Name/value rows in a stable order, for tabular output.
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("total_days",         self.total_days.to_string()),
            ("initial_population", self.initial_population.to_string()),
            ("final_susceptible",  self.final_susceptible.to_string()),
            ("total_infected",     self.total_infected.to_string()),
            ("total_recovered",    self.total_recovered.to_string()),
            ("total_deaths",       self.total_deaths.to_string()),
            ("total_vaccinated",   self.total_vaccinated.to_string()),
            ("total_hospitalized", self.total_hospitalized.to_string()),
            ("peak_infections",    self.peak_infections.to_string()),
            ("peak_day",           self.peak_day.0.to_string()),
            ("attack_rate",        format!("{:.6}", self.attack_rate)),
            ("case_fatality_rate", format!("{:.6}", self.case_fatality_rate)),
            ("final_r_eff",        format!("{:.6}", self.final_r_eff)),
        ]
    }
}
