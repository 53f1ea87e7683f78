//! Shared fixtures for store integration tests
//!
//! The standard type graph is
//! Competence -> Indicator -> {Knowledge, Ability, Skill}.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use std::collections::BTreeSet;

use cqc_core::model::{DictionaryEntry, Element, HierarchyEdge};
use cqc_store::{CqcStore, DictionaryRepo, ElementRepo, HierarchyRepo};
use rusqlite::Connection;
use uuid::Uuid;

pub struct Types {
    pub competence: DictionaryEntry,
    pub indicator: DictionaryEntry,
    pub knowledge: DictionaryEntry,
    pub ability: DictionaryEntry,
    pub skill: DictionaryEntry,
}

impl Types {
    pub fn all(&self) -> Vec<DictionaryEntry> {
        vec![
            self.competence.clone(),
            self.indicator.clone(),
            self.knowledge.clone(),
            self.ability.clone(),
            self.skill.clone(),
        ]
    }

    /// The four standard edges, top-down
    pub fn edges(&self) -> Vec<HierarchyEdge> {
        vec![
            HierarchyEdge::new(self.competence.clone(), self.indicator.clone()),
            HierarchyEdge::new(self.indicator.clone(), self.knowledge.clone()),
            HierarchyEdge::new(self.indicator.clone(), self.ability.clone()),
            HierarchyEdge::new(self.indicator.clone(), self.skill.clone()),
        ]
    }
}

/// One competence subtree: c -> i -> {k1, k2, a1, s1}
#[derive(Debug, Clone)]
pub struct Tree {
    pub c: Element,
    pub i: Element,
    pub k1: Element,
    pub k2: Element,
    pub a1: Element,
    pub s1: Element,
}

impl Tree {
    /// Parents before children
    pub fn elements(&self) -> Vec<Element> {
        vec![
            self.c.clone(),
            self.i.clone(),
            self.k1.clone(),
            self.k2.clone(),
            self.a1.clone(),
            self.s1.clone(),
        ]
    }
}

pub fn store() -> CqcStore {
    CqcStore::open_in_memory().expect("Failed to open in-memory store")
}

pub fn types() -> Types {
    Types {
        competence: DictionaryEntry::new("Competence"),
        indicator: DictionaryEntry::new("Indicator"),
        knowledge: DictionaryEntry::new("Knowledge"),
        ability: DictionaryEntry::new("Ability"),
        skill: DictionaryEntry::new("Skill"),
    }
}

/// Insert the five types and the four standard edges
pub fn seed_hierarchy(conn: &Connection) -> Types {
    let types = types();
    DictionaryRepo::multi_insert(conn, &types.all()).unwrap();
    HierarchyRepo::multi_insert(conn, &types.edges()).unwrap();
    types
}

/// Build (but do not insert) a subtree whose values end in `n`
pub fn tree(types: &Types, n: u32) -> Tree {
    let c = Element::root(types.competence.clone(), format!("Competence{}", n));
    let i = Element::child_of(&c, types.indicator.clone(), format!("Indicator{}", n));
    let k1 = Element::child_of(&i, types.knowledge.clone(), format!("Knowledge{}.1", n));
    let k2 = Element::child_of(&i, types.knowledge.clone(), format!("Knowledge{}.2", n));
    let a1 = Element::child_of(&i, types.ability.clone(), format!("Ability{}", n));
    let s1 = Element::child_of(&i, types.skill.clone(), format!("Skill{}", n));
    Tree {
        c,
        i,
        k1,
        k2,
        a1,
        s1,
    }
}

pub fn insert_tree(conn: &Connection, types: &Types, n: u32) -> Tree {
    let tree = tree(types, n);
    ElementRepo::multi_insert(conn, &tree.elements()).unwrap();
    tree
}

/// Edges as a set of (parent name, child name)
pub fn edge_names(conn: &Connection) -> BTreeSet<(String, String)> {
    HierarchyRepo::select_all(conn, 1000)
        .unwrap()
        .into_iter()
        .map(|e| (e.parent.name, e.child.name))
        .collect()
}

pub fn names(pairs: &[(&str, &str)]) -> BTreeSet<(String, String)> {
    pairs
        .iter()
        .map(|(p, c)| (p.to_string(), c.to_string()))
        .collect()
}

pub fn count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| {
        r.get(0)
    })
    .unwrap()
}

pub fn random_id() -> Uuid {
    Uuid::new_v4()
}
