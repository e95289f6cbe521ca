//! small-town — an outbreak in a synthetic town of a few thousand people.
//!
//! Builds a household / workplace / school / hub / random contact graph,
//! seeds an outbreak, runs a preset intervention scenario, writes CSV and
//! JSON output, and prints the summary.
//!
//! ```text
//! cargo run -p small-town -- --people 5000 --days 180 --scenario rapid_response \
//!     --disease covid19_delta --output ./out
//! ```

mod town;

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::Config;

use ep_core::{Day, SimConfig, SimRng};
use ep_disease::library;
use ep_graph::{ContactGraph, GraphMetrics};
use ep_intervention::{default_policy, InterventionPlan, Scenario};
use ep_output::json::{export_history, export_infection_tree};
use ep_output::{CsvWriter, SimOutputObserver};
use ep_sim::{
    ensemble_seeds, run_ensemble, DailyRecord, NoopObserver, SeedMethod, Sim, SimBuilder,
    SimObserver, SummaryStats,
};

// ISO 8601 timestamp and colour-coded level.
const LOG_PATTERN: &str = "{d(%Y-%m-%dT%H:%M:%SZ)} {h({l})} {t} - {m}{n}";

// Offset that keeps the town layout independent of the run seed stream.
const TOWN_SEED_OFFSET: u64 = 0x70_77_6E;

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "small-town", about = "Epidemic on a synthetic town contact graph")]
struct Args {
    /// Residents in the town.
    #[arg(long, default_value_t = 2_000)]
    people: usize,

    /// Days to simulate (overrides the config file).
    #[arg(long)]
    days: Option<u32>,

    /// Master seed (overrides the config file).
    #[arg(long)]
    seed: Option<u64>,

    /// JSON `SimConfig` file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Disease preset, e.g. covid19, covid19_delta, influenza, measles.
    #[arg(long, default_value = "covid19")]
    disease: String,

    /// Override the preset's R0.
    #[arg(long)]
    r0: Option<f64>,

    /// Preset scenario: no_intervention, delayed_response, rapid_response,
    /// herd_immunity, full_lockdown, or `default` for the responsive policy.
    #[arg(long, default_value = "no_intervention")]
    scenario: String,

    /// Extra triggers from a JSON plan file, appended after the scenario.
    #[arg(long)]
    plan: Option<PathBuf>,

    /// Initial infections.
    #[arg(long, default_value_t = 5)]
    seeds: usize,

    /// How to pick initial infections: random, hubs, mobile.
    #[arg(long, default_value = "random")]
    seed_method: String,

    /// Directory for CSV and JSON output.  Nothing is written when absent.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Run this many independent seeds instead of a single run.
    #[arg(long)]
    ensemble: Option<usize>,

    /// Log level: error, warn, info, debug, trace.
    #[arg(long, default_value = "info")]
    log_level: String,
}

// ── Progress observer ─────────────────────────────────────────────────────────

/// Logs a line every `interval` days and forwards everything to `inner`.
struct Progress<O: SimObserver> {
    inner:    O,
    interval: u32,
}

impl<O: SimObserver> SimObserver for Progress<O> {
    fn on_day_start(&mut self, day: Day) {
        self.inner.on_day_start(day);
    }

    fn on_checkpoint(&mut self, checkpoint: &ep_sim::Checkpoint) {
        self.inner.on_checkpoint(checkpoint);
    }

    fn on_intervention(&mut self, report: &ep_intervention::ApplyReport) {
        log::info!(
            "{}: {} ({} people, {} contacts)",
            report.day,
            report.kind,
            report.people_affected,
            report.contacts_changed
        );
        self.inner.on_intervention(report);
    }

    fn on_day_end(&mut self, record: &DailyRecord) {
        if record.day.0.is_multiple_of(self.interval) {
            log::info!(
                "{}: {} infectious, {} new, {} in hospital, R_eff {}",
                record.day,
                record.counts.infectious(),
                record.new_infections,
                record.hospital_beds,
                record.r_eff.map_or_else(|| "-".to_owned(), |r| format!("{r:.2}"))
            );
        }
        self.inner.on_day_end(record);
    }

    fn on_sim_end(&mut self, summary: &SummaryStats) {
        self.inner.on_sim_end(summary);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();
    let level = LevelFilter::from_str(&args.log_level)
        .map_err(|_| anyhow::anyhow!("invalid --log-level {:?}", args.log_level))?;
    init_logging(level)?;

    let mut config = match &args.config {
        Some(path) => SimConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SimConfig::default(),
    };
    if let Some(days) = args.days {
        config.days = days;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let mut disease = library::preset(&args.disease)?;
    if let Some(r0) = args.r0 {
        disease = disease.with_r0(r0)?;
    }
    let plan = build_plan(&args)?;
    let method = match args.seed_method.as_str() {
        "random" => SeedMethod::Random,
        "hubs" => SeedMethod::Hubs,
        "mobile" => SeedMethod::Mobile,
        other => anyhow::bail!("unknown --seed-method {other:?}"),
    };

    let t0 = Instant::now();
    let mut town_rng = SimRng::new(config.seed ^ TOWN_SEED_OFFSET);
    let graph = town::build_town(args.people, &mut town_rng)?;
    let metrics = GraphMetrics::compute(&graph);
    println!("=== small-town — {} ===", args.disease);
    println!(
        "People: {}  |  Contacts: {}  |  Mean degree: {:.1}  |  Clustering: {:.2}  |  Built in {:.2?}",
        metrics.person_count,
        metrics.contact_count,
        metrics.mean_degree,
        metrics.mean_clustering,
        t0.elapsed()
    );

    if let Some(n) = args.ensemble {
        return ensemble(&graph, &disease, &config, &plan, args.seeds, &method, n);
    }

    let mut sim = SimBuilder::new(graph, disease).config(config).plan(plan).build()?;
    let seeded = sim.seed_infections(args.seeds, &method);
    println!("Seeded {} infections; scenario {}", seeded.len(), args.scenario);

    let t1 = Instant::now();
    let summary = match &args.output {
        Some(dir) => {
            let writer = CsvWriter::new(dir).with_context(|| format!("creating {}", dir.display()))?;
            let mut obs = Progress { inner: SimOutputObserver::new(writer), interval: 10 };
            let summary = sim.run_to_end(&mut obs);
            if let Some(e) = obs.inner.take_error() {
                return Err(e).context("writing CSV output");
            }
            export_history(&dir.join("history.json"), sim.history())?;
            export_infection_tree(&dir.join("infection_tree.json"), &sim, None, 4)?;
            sim.save_json(&dir.join("snapshot.json"))?;
            println!("Output written to {}", dir.display());
            summary
        }
        None => sim.run_to_end(&mut Progress { inner: NoopObserver, interval: 10 }),
    };
    println!("Simulated {} days in {:.2?}", summary.total_days, t1.elapsed());

    print_summary(&summary, &sim);
    Ok(())
}

fn init_logging(level: LevelFilter) -> Result<()> {
    let stdout = ConsoleAppender::builder().encoder(Box::new(PatternEncoder::new(LOG_PATTERN))).build();
    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(level))?;
    log4rs::init_config(config)?;
    Ok(())
}

fn build_plan(args: &Args) -> Result<InterventionPlan> {
    let mut plan = match args.scenario.as_str() {
        "default" => default_policy(),
        name => Scenario::from_str(name)?.plan(),
    };
    if let Some(path) = &args.plan {
        let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        plan.extend(InterventionPlan::from_json_str(&text)?);
    }
    Ok(plan)
}

fn ensemble(
    graph:   &ContactGraph,
    disease: &ep_disease::DiseaseParameters,
    config:  &SimConfig,
    plan:    &InterventionPlan,
    seeds:   usize,
    method:  &SeedMethod,
    n:       usize,
) -> Result<()> {
    let run_seeds = ensemble_seeds(config.seed, n);
    let make = |seed: u64| -> ep_sim::SimResult<Sim> {
        let mut sim = SimBuilder::new(graph.clone(), disease.clone())
            .config(config.clone())
            .plan(plan.clone())
            .seed(seed)
            .build()?;
        sim.seed_infections(seeds, method);
        Ok(sim)
    };
    let t = Instant::now();
    let results = run_ensemble(&run_seeds, make);
    println!("Ran {n} members in {:.2?}", t.elapsed());

    let mut attack = Vec::with_capacity(n);
    for (seed, result) in run_seeds.iter().zip(results) {
        let s = result?;
        println!(
            "  seed {seed:>20}  attack {:>5.1}%  peak {:>6} on {}  deaths {}",
            s.attack_rate * 100.0,
            s.peak_infections,
            s.peak_day,
            s.total_deaths
        );
        attack.push(s.attack_rate);
    }
    let mean = attack.iter().sum::<f64>() / attack.len().max(1) as f64;
    println!("Mean attack rate: {:.1}%", mean * 100.0);
    Ok(())
}

fn print_summary(s: &SummaryStats, sim: &Sim) {
    println!();
    println!("── Summary ──────────────────────────────────────────");
    for (name, value) in s.rows() {
        println!("  {name:<20} {value}");
    }
    let top = sim
        .tree()
        .secondary_case_counts()
        .into_iter()
        .max_by_key(|&(p, n)| (n, std::cmp::Reverse(p)));
    if let Some((p, n)) = top {
        println!("  {:<20} {p} ({n} secondary cases)", "top_spreader");
    }
}
