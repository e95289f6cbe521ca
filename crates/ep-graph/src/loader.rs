//! CSV graph loader.
//!
//! # CSV format
//!
//! People, one row per person, ids dense from 0 in file order:
//!
//! ```csv
//! person_id,age,occupation,mobility,compliance,health_risk,essential_worker,household
//! 0,34,worker,0.6,0.7,0.1,false,0
//! 1,8,student,0.4,0.5,0.05,false,0
//! ```
//!
//! Contacts, one row per undirected contact:
//!
//! ```csv
//! a,b,type,weight,location
//! 0,1,household,1.0,indoor
//! ```
//!
//! `type` accepts household / workplace / school / hub / random; anything
//! else loads as `other`.  `weight` defaults to 1 and `location` to indoor
//! when the column is empty.

use std::io::Read;
use std::path::Path;

use ep_core::{HouseholdId, PersonId};
use serde::Deserialize;

use crate::{ContactAttrs, ContactGraph, ContactGraphBuilder, Demographics, GraphError, GraphResult};

// ── CSV records ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct PersonRecord {
    person_id:        u32,
    age:              u8,
    occupation:       String,
    mobility:         f64,
    compliance:       f64,
    health_risk:      f64,
    essential_worker: bool,
    household:        u32,
}

#[derive(Deserialize)]
struct ContactRecord {
    a:        u32,
    b:        u32,
    #[serde(rename = "type")]
    kind:     String,
    weight:   Option<f64>,
    location: Option<String>,
}

// ── Public API ───────────────────────────────────────────────────────────────

/// Load a graph from a people CSV and a contacts CSV.
pub fn load_graph_csv(people: &Path, contacts: &Path) -> GraphResult<ContactGraph> {
    let people = std::fs::File::open(people)?;
    let contacts = std::fs::File::open(contacts)?;
    load_graph_readers(people, contacts)
}

/// Like [`load_graph_csv`] but accepts any `Read` sources.
pub fn load_graph_readers<P: Read, C: Read>(people: P, contacts: C) -> GraphResult<ContactGraph> {
    let mut builder = ContactGraphBuilder::new();

    let mut rdr = csv::Reader::from_reader(people);
    for result in rdr.deserialize::<PersonRecord>() {
        let row = result?;
        if row.person_id as usize != builder.person_count() {
            return Err(GraphError::Parse(format!(
                "person_id {} out of sequence (expected {})",
                row.person_id,
                builder.person_count()
            )));
        }
        builder.add_person(Demographics {
            age:              row.age,
            occupation:       row.occupation.parse()?,
            mobility:         row.mobility,
            compliance:       row.compliance,
            health_risk:      row.health_risk,
            essential_worker: row.essential_worker,
            household:        HouseholdId(row.household),
        })?;
    }

    let mut rdr = csv::Reader::from_reader(contacts);
    for result in rdr.deserialize::<ContactRecord>() {
        let row = result?;
        let mut attrs = ContactAttrs::new(row.kind.parse()?);
        if let Some(w) = row.weight {
            attrs = attrs.with_weight(w);
        }
        if let Some(loc) = row.location.as_deref() {
            attrs.setting = loc.parse()?;
        }
        builder.add_contact(PersonId(row.a), PersonId(row.b), attrs)?;
    }

    let graph = builder.build();
    log::info!(
        "loaded contact graph: {} people, {} contacts",
        graph.person_count(),
        graph.contact_count()
    );
    Ok(graph)
}
