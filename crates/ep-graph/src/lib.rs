//! `ep-graph` — the contact graph the epidemic spreads over.
//!
//! # Data layout
//!
//! Individuals are nodes, contacts are undirected edges.  Adjacency is stored
//! in **Compressed Sparse Row** form: the neighbours of person `p` occupy
//!
//! ```text
//! adj_person[ adj_start[p] .. adj_start[p+1] ]
//! ```
//!
//! with the matching `ContactId` at the same position in `adj_contact`.  Each
//! undirected contact therefore appears twice in the adjacency arrays but
//! once in the contact table.
//!
//! Topology and demographics are immutable after [`ContactGraphBuilder::build`].
//! The only mutable part is the per-contact `active` flag, flipped by travel
//! restrictions.
//!
//! # Modules
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`person`]      | `Demographics`, `Occupation`                          |
//! | [`contact`]     | `Contact`, `ContactAttrs`, `ContactKind`, `Setting`   |
//! | [`graph`]       | `ContactGraph`, `ContactGraphBuilder`, `complete`     |
//! | [`metrics`]     | `GraphMetrics` (degree, clustering, super-spreaders)  |
//! | [`loader`]      | CSV people/contacts loader                            |

pub mod contact;
pub mod error;
pub mod graph;
pub mod loader;
pub mod metrics;
pub mod person;

#[cfg(test)]
mod tests;

pub use contact::{Contact, ContactAttrs, ContactKind, Setting};
pub use error::{GraphError, GraphResult};
pub use graph::{complete, ContactGraph, ContactGraphBuilder};
pub use loader::{load_graph_csv, load_graph_readers};
pub use metrics::GraphMetrics;
pub use person::{Demographics, Occupation};
