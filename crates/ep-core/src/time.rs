//! Simulation time model.
//!
//! # Design
//!
//! Time is a monotonically increasing `Day` counter.  One step of the
//! simulation clock is one day; every scheduled event, intervention trigger
//! and history record is keyed by a `Day`, so all schedule arithmetic is
//! exact integer arithmetic.
//!
//! `SimConfig` carries the run-level knobs (length, seed, checkpoint
//! cadence, …).  It is serde-loadable from JSON and validated eagerly so a
//! malformed file is rejected before an engine is ever built.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{EpError, EpResult};

/// Days in the seasonal cycle used for day-of-year arithmetic.
pub const DAYS_PER_YEAR: u32 = 365;

// ── Day ──────────────────────────────────────────────────────────────────────

/// An absolute simulation day.  Day 0 is the state before the first step.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
pub struct Day(pub u32);

impl Day {
    pub const ZERO: Day = Day(0);

    /// Return the day `n` days after `self`.
    #[inline]
    pub fn offset(self, n: u32) -> Day {
        Day(self.0.saturating_add(n))
    }

    /// Days elapsed from `earlier` to `self`; zero if `earlier` is later.
    #[inline]
    pub fn since(self, earlier: Day) -> u32 {
        self.0.saturating_sub(earlier.0)
    }

    /// Position within the seasonal year, shifted by `start_day_of_year`.
    #[inline]
    pub fn day_of_year(self, start_day_of_year: u32) -> u32 {
        (self.0 + start_day_of_year) % DAYS_PER_YEAR
    }
}

impl std::ops::Add<u32> for Day {
    type Output = Day;
    #[inline]
    fn add(self, rhs: u32) -> Day {
        self.offset(rhs)
    }
}

impl std::ops::Sub for Day {
    type Output = u32;
    #[inline]
    fn sub(self, rhs: Day) -> u32 {
        self.since(rhs)
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "D{}", self.0)
    }
}

// ── SimClock ─────────────────────────────────────────────────────────────────

/// The current simulation day.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SimClock {
    pub current_day: Day,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the clock at an arbitrary day (used when resuming a snapshot).
    pub fn starting_at(day: Day) -> Self {
        Self { current_day: day }
    }

    /// Advance the clock by one day.
    #[inline]
    pub fn advance(&mut self) {
        self.current_day = self.current_day + 1;
    }

    /// Whole weeks elapsed since day 0.
    #[inline]
    pub fn elapsed_weeks(&self) -> u32 {
        self.current_day.0 / 7
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (week {})", self.current_day, self.elapsed_weeks())
    }
}

// ── SimConfig ────────────────────────────────────────────────────────────────

/// Top-level run configuration.
///
/// Every field has a default, so a JSON file only needs to name the fields
/// it overrides:
///
/// ```
/// use ep_core::SimConfig;
///
/// let cfg = SimConfig::from_json_str(r#"{ "days": 60, "seed": 7 }"#).unwrap();
/// assert_eq!(cfg.days, 60);
/// assert_eq!(cfg.checkpoint_interval, 5);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Days simulated by `Sim::run_to_end`.
    pub days: u32,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Take a checkpoint every N days.  0 disables periodic checkpoints.
    pub checkpoint_interval: u32,

    /// Window (in days) of the rolling R-effective estimate.  The estimate
    /// needs two full windows of history before it is reported.
    pub r_eff_window: usize,

    /// An infector stops trying further contacts once the day's new
    /// infections exceed this fraction of the remaining susceptible pool.
    pub daily_infection_cap: f64,

    /// Immunity level granted on recovery.
    pub natural_immunity: f64,

    /// Fractional loss of natural immunity per year, applied daily.
    pub natural_waning_rate: f64,

    /// Day of year that simulation day 0 corresponds to (seasonality).
    pub start_day_of_year: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            days:                100,
            seed:                42,
            checkpoint_interval: 5,
            r_eff_window:        7,
            daily_infection_cap: 0.1,
            natural_immunity:    0.8,
            natural_waning_rate: 0.0005,
            start_day_of_year:   0,
        }
    }
}

impl SimConfig {
    /// Reject out-of-range values.
    pub fn validate(&self) -> EpResult<()> {
        if self.r_eff_window == 0 {
            return Err(EpError::Config("r_eff_window must be at least 1".into()));
        }
        if !(self.daily_infection_cap > 0.0 && self.daily_infection_cap <= 1.0) {
            return Err(EpError::Config(format!(
                "daily_infection_cap {} must be in (0, 1]",
                self.daily_infection_cap
            )));
        }
        if !(0.0..=1.0).contains(&self.natural_immunity) {
            return Err(EpError::Config(format!(
                "natural_immunity {} must be in [0, 1]",
                self.natural_immunity
            )));
        }
        if !(0.0..1.0).contains(&self.natural_waning_rate) {
            return Err(EpError::Config(format!(
                "natural_waning_rate {} must be in [0, 1)",
                self.natural_waning_rate
            )));
        }
        if self.start_day_of_year >= DAYS_PER_YEAR {
            return Err(EpError::Config(format!(
                "start_day_of_year {} must be below {DAYS_PER_YEAR}",
                self.start_day_of_year
            )));
        }
        Ok(())
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> EpResult<Self> {
        let cfg: SimConfig = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON file.
    pub fn from_json_file(path: &Path) -> EpResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// The day a `run_to_end` starting from day 0 stops at (exclusive).
    #[inline]
    pub fn end_day(&self) -> Day {
        Day(self.days)
    }
}
