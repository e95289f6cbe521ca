//! JSON export of history, infection trees, and other serde values.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use ep_sim::{History, Sim, TreeNode};
use serde::Serialize;

use crate::OutputResult;

/// Write any serializable value as pretty-printed JSON.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> OutputResult<()> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, value)?;
    Ok(())
}

pub fn export_history(path: &Path, history: &History) -> OutputResult<()> {
    write_json(path, history)
}

/// Write the transmission trees of the first `seed_limit` seeds (default
/// five), each expanded to `max_depth` generations.
pub fn export_infection_tree(
    path:       &Path,
    sim:        &Sim,
    seed_limit: Option<usize>,
    max_depth:  usize,
) -> OutputResult<()> {
    let forest: Vec<TreeNode> = sim.tree().forest(seed_limit, max_depth, sim.population(), sim.graph());
    write_json(path, &forest)
}
