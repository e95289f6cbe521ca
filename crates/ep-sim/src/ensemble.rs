//! Independent runs over a list of seeds.

use ep_core::rng::derive_seed;

use crate::{NoopObserver, Sim, SimResult, SummaryStats};

/// `n` well-separated seeds derived from `base`.
pub fn ensemble_seeds(base: u64, n: usize) -> Vec<u64> {
    (0..n as u64).map(|i| derive_seed(base, i)).collect()
}

/// Build one engine per seed with `make` and run each to its end day.
///
/// Results come back in seed order.  With the `parallel` feature the runs
/// execute on Rayon's thread pool; each run owns its engine, so the output
/// is the same either way.
pub fn run_ensemble<F>(seeds: &[u64], make: F) -> Vec<SimResult<SummaryStats>>
where
    F: Fn(u64) -> SimResult<Sim> + Sync,
{
    let run_one = |&seed: &u64| -> SimResult<SummaryStats> {
        let mut sim = make(seed)?;
        Ok(sim.run_to_end(&mut NoopObserver))
    };

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        seeds.par_iter().map(run_one).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        seeds.iter().map(run_one).collect()
    }
}
