//! Synthetic town: households, workplaces, schools, a few community hubs,
//! and random encounters.

use ep_core::{HouseholdId, PersonId, SimRng};
use ep_graph::{
    ContactAttrs, ContactGraph, ContactGraphBuilder, ContactKind, Demographics, GraphResult,
    Occupation,
};

const WORKPLACE_SIZE:     usize = 12;
const CLASS_SIZE:         usize = 24;
const WORK_CONTACT_P:     f64   = 0.3;
const SCHOOL_CONTACT_P:   f64   = 0.25;
const RANDOM_PER_PERSON:  f64   = 1.5;
const HUB_COUNT:          usize = 6;
const HUB_REACH:          usize = 40;

/// Build a town of roughly `people` residents.
pub fn build_town(people: usize, rng: &mut SimRng) -> GraphResult<ContactGraph> {
    let mut b = ContactGraphBuilder::with_capacity(people, people * 8);
    let mut households: Vec<Vec<PersonId>> = Vec::new();
    let mut workers: Vec<PersonId> = Vec::new();
    let mut students: Vec<PersonId> = Vec::new();

    // ── Households ────────────────────────────────────────────────────────
    while b.person_count() < people {
        let size = rng.gen_range(1..=5usize).min(people - b.person_count());
        let household = HouseholdId(households.len() as u32);
        let mut members = Vec::with_capacity(size);
        for i in 0..size {
            let age: u8 = if i < 2 || rng.gen_bool(0.2) {
                rng.gen_range(20..=85)
            } else {
                rng.gen_range(0..=17)
            };
            let person = resident(age, household, rng);
            let occupation = person.occupation;
            let id = b.add_person(person)?;
            match occupation {
                Occupation::Worker | Occupation::Essential => workers.push(id),
                Occupation::Student => students.push(id),
                _ => {}
            }
            members.push(id);
        }
        households.push(members);
    }
    for members in &households {
        for (i, &a) in members.iter().enumerate() {
            for &c in &members[i + 1..] {
                b.add_contact(a, c, ContactAttrs::new(ContactKind::Household))?;
            }
        }
    }

    // ── Workplaces and schools ────────────────────────────────────────────
    let all: Vec<PersonId> = households.iter().flatten().copied().collect();
    rng.shuffle(&mut workers);
    rng.shuffle(&mut students);
    mix_groups(&mut b, &workers, WORKPLACE_SIZE, WORK_CONTACT_P, ContactKind::Workplace, rng)?;
    mix_groups(&mut b, &students, CLASS_SIZE, SCHOOL_CONTACT_P, ContactKind::School, rng)?;

    // ── Community hubs ────────────────────────────────────────────────────
    for hub in rng.sample(&all, HUB_COUNT) {
        for other in rng.sample(&all, HUB_REACH) {
            if other != hub {
                b.add_contact(hub, other, ContactAttrs::new(ContactKind::Hub))?;
            }
        }
    }

    // ── Random encounters ─────────────────────────────────────────────────
    let encounters = (all.len() as f64 * RANDOM_PER_PERSON) as usize;
    for _ in 0..encounters {
        let a = all[rng.gen_range(0..all.len())];
        let c = all[rng.gen_range(0..all.len())];
        if a != c {
            let attrs = ContactAttrs::new(ContactKind::Random).with_weight(0.5);
            let attrs = if rng.gen_bool(0.3) { attrs.outdoor() } else { attrs };
            b.add_contact(a, c, attrs)?;
        }
    }

    Ok(b.build())
}

fn resident(age: u8, household: HouseholdId, rng: &mut SimRng) -> Demographics {
    let occupation = match age {
        0..=17 => Occupation::Student,
        18..=64 if rng.gen_bool(0.1) => Occupation::Essential,
        18..=64 if rng.gen_bool(0.08) => Occupation::Unemployed,
        18..=64 => Occupation::Worker,
        _ => Occupation::Retired,
    };
    let mobility = match occupation {
        Occupation::Essential => 0.85,
        Occupation::Student => 0.7,
        Occupation::Worker => 0.6,
        Occupation::Unemployed => 0.4,
        Occupation::Retired => 0.3,
    };
    Demographics {
        age,
        occupation,
        mobility: (mobility + rng.normal(0.0, 0.05)).clamp(0.05, 1.0),
        compliance: rng.gen_range(0.3..0.95),
        health_risk: (age as f64 / 100.0).clamp(0.0, 1.0),
        essential_worker: occupation == Occupation::Essential,
        household,
    }
}

/// Split `members` into consecutive groups of `size` and connect each pair
/// within a group with probability `p`.
fn mix_groups(
    b:       &mut ContactGraphBuilder,
    members: &[PersonId],
    size:    usize,
    p:       f64,
    kind:    ContactKind,
    rng:     &mut SimRng,
) -> GraphResult<()> {
    for group in members.chunks(size) {
        for (i, &a) in group.iter().enumerate() {
            for &c in &group[i + 1..] {
                if rng.gen_bool(p) {
                    b.add_contact(a, c, ContactAttrs::new(kind))?;
                }
            }
        }
    }
    Ok(())
}
