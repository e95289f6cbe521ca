//! Unit tests for ep-graph.

use ep_core::PersonId;

use crate::{ContactAttrs, ContactGraph, ContactGraphBuilder, ContactKind, Demographics};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// 0 — 1 — 2 — 3 path plus a 0 — 2 chord.
fn small_graph() -> ContactGraph {
    let mut b = ContactGraphBuilder::new();
    for age in [10, 30, 50, 70] {
        b.add_person(Demographics::with_age(age)).unwrap();
    }
    b.add_contact(PersonId(0), PersonId(1), ContactAttrs::new(ContactKind::Household)).unwrap();
    b.add_contact(PersonId(1), PersonId(2), ContactAttrs::new(ContactKind::Workplace)).unwrap();
    b.add_contact(PersonId(2), PersonId(3), ContactAttrs::new(ContactKind::Random)).unwrap();
    b.add_contact(PersonId(2), PersonId(0), ContactAttrs::new(ContactKind::School)).unwrap();
    b.build()
}

#[cfg(test)]
mod builder_tests {
    use super::*;
    use crate::GraphError;

    #[test]
    fn csr_degrees_and_neighbours() {
        let g = small_graph();
        assert_eq!(g.person_count(), 4);
        assert_eq!(g.contact_count(), 4);
        assert_eq!(g.degree(PersonId(2)), 3);
        let n: Vec<_> = g.neighbors(PersonId(2)).map(|(p, _)| p).collect();
        assert_eq!(n, vec![PersonId(1), PersonId(3), PersonId(0)]);
    }

    #[test]
    fn contacts_are_normalised_low_high() {
        let g = small_graph();
        let c = g.contact_between(PersonId(0), PersonId(2)).unwrap();
        assert_eq!(g.contact(c).a, PersonId(0));
        assert_eq!(g.contact(c).b, PersonId(2));
        assert_eq!(g.contact(c).other(PersonId(2)), PersonId(0));
    }

    #[test]
    fn duplicate_contact_merges() {
        let mut b = ContactGraphBuilder::new();
        b.add_person(Demographics::default()).unwrap();
        b.add_person(Demographics::default()).unwrap();
        let first = b.add_contact(PersonId(0), PersonId(1), ContactAttrs::default()).unwrap();
        let again = b.add_contact(PersonId(1), PersonId(0), ContactAttrs::default()).unwrap();
        assert_eq!(first, again);
        assert_eq!(b.build().contact_count(), 1);
    }

    #[test]
    fn rejects_self_and_unknown() {
        let mut b = ContactGraphBuilder::new();
        b.add_person(Demographics::default()).unwrap();
        assert!(matches!(
            b.add_contact(PersonId(0), PersonId(0), ContactAttrs::default()),
            Err(GraphError::SelfContact(_))
        ));
        assert!(matches!(
            b.add_contact(PersonId(0), PersonId(5), ContactAttrs::default()),
            Err(GraphError::UnknownPerson(_))
        ));
    }

    #[test]
    fn rejects_out_of_range_demographics() {
        let mut b = ContactGraphBuilder::new();
        let bad = Demographics { compliance: 1.5, ..Demographics::default() };
        assert!(b.add_person(bad).is_err());
    }

    #[test]
    fn rejects_negative_weight() {
        let mut b = ContactGraphBuilder::new();
        b.add_person(Demographics::default()).unwrap();
        b.add_person(Demographics::default()).unwrap();
        let attrs = ContactAttrs::default().with_weight(-1.0);
        assert!(b.add_contact(PersonId(0), PersonId(1), attrs).is_err());
    }

    #[test]
    fn complete_graph_edge_count() {
        let g = crate::complete(vec![Demographics::default(); 10], ContactKind::Other).unwrap();
        assert_eq!(g.contact_count(), 45);
        assert!(g.person_ids().all(|p| g.degree(p) == 9));
        assert_eq!(g.mean_degree(), 9.0);
    }
}

#[cfg(test)]
mod active_tests {
    use super::*;

    #[test]
    fn inactive_contacts_are_skipped_but_counted_in_degree() {
        let mut g = small_graph();
        let c = g.contact_between(PersonId(2), PersonId(3)).unwrap();
        g.set_active(c, false);
        assert_eq!(g.degree(PersonId(3)), 1);
        assert_eq!(g.active_neighbors(PersonId(3)).count(), 0);
        assert_eq!(g.inactive_count(), 1);
        g.activate_all();
        assert_eq!(g.inactive_count(), 0);
    }

    #[test]
    fn restore_flags_checks_length() {
        let mut g = small_graph();
        assert!(g.restore_active_flags(&[true; 3]).is_err());
        g.restore_active_flags(&[false, true, true, false]).unwrap();
        assert_eq!(g.inactive_count(), 2);
    }
}

#[cfg(test)]
mod metrics_tests {
    use super::*;
    use crate::GraphMetrics;

    #[test]
    fn triangle_clustering_is_one() {
        let g = crate::complete(vec![Demographics::default(); 3], ContactKind::Other).unwrap();
        let m = GraphMetrics::compute(&g);
        assert!((m.mean_clustering - 1.0).abs() < 1e-12);
        assert_eq!(m.components, 1);
        assert!((m.density - 1.0).abs() < 1e-12);
    }

    #[test]
    fn isolated_people_are_separate_components() {
        let mut b = ContactGraphBuilder::new();
        for _ in 0..3 {
            b.add_person(Demographics::default()).unwrap();
        }
        let m = GraphMetrics::compute(&b.build());
        assert_eq!(m.components, 3);
        assert_eq!(m.max_degree, 0);
        assert_eq!(m.superspreader_count, 1);
    }

    #[test]
    fn superspreaders_are_top_degree() {
        let m = GraphMetrics::compute(&small_graph());
        assert_eq!(m.max_degree, 3);
        assert_eq!(m.superspreader_mean_degree, 3.0);
    }
}

#[cfg(test)]
mod loader_tests {
    use std::io::Cursor;

    use super::*;
    use crate::{load_graph_readers, Occupation, Setting};

    const PEOPLE: &str = "\
person_id,age,occupation,mobility,compliance,health_risk,essential_worker,household
0,34,worker,0.6,0.7,0.1,false,0
1,8,student,0.4,0.5,0.05,false,0
2,71,retired,0.2,0.9,0.4,false,1
";

    const CONTACTS: &str = "\
a,b,type,weight,location
0,1,household,2.0,indoor
1,2,park,,outdoor
";

    #[test]
    fn loads_people_and_contacts() {
        let g = load_graph_readers(Cursor::new(PEOPLE), Cursor::new(CONTACTS)).unwrap();
        assert_eq!(g.person_count(), 3);
        assert_eq!(g.demographics(PersonId(1)).occupation, Occupation::Student);
        let c = g.contact_between(PersonId(2), PersonId(1)).unwrap();
        assert_eq!(g.contact(c).attrs.kind, ContactKind::Other);
        assert_eq!(g.contact(c).attrs.weight, 1.0);
        assert_eq!(g.contact(c).attrs.setting, Setting::Outdoor);
    }

    #[test]
    fn out_of_sequence_ids_error() {
        let people = "person_id,age,occupation,mobility,compliance,health_risk,essential_worker,household\n\
                      3,34,worker,0.6,0.7,0.1,false,0\n";
        assert!(load_graph_readers(Cursor::new(people), Cursor::new("a,b,type,weight,location\n")).is_err());
    }

    #[test]
    fn unknown_person_in_contacts_errors() {
        let contacts = "a,b,type,weight,location\n0,9,household,1.0,indoor\n";
        assert!(load_graph_readers(Cursor::new(PEOPLE), Cursor::new(contacts)).is_err());
    }
}
