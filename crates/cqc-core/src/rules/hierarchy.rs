//! Type-graph rules over hierarchy edges.

use std::collections::{HashMap, HashSet, VecDeque};

use uuid::Uuid;

use crate::errors::CqcError;
use crate::model::{DictionaryEntry, HierarchyEdge};

/// Would adding `parent -> child` make a type its own ancestor?
///
/// Walks downward from `child` over `edges` (pairs of parent, child type
/// ids) looking for `parent`.
pub fn would_create_cycle(edges: &[(Uuid, Uuid)], parent: Uuid, child: Uuid) -> bool {
    if parent == child {
        return true;
    }

    let mut children: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for (p, c) in edges {
        children.entry(*p).or_default().push(*c);
    }

    let mut visited = HashSet::new();
    let mut stack = vec![child];
    while let Some(id) = stack.pop() {
        if id == parent {
            return true;
        }
        if !visited.insert(id) {
            continue;
        }
        if let Some(next) = children.get(&id) {
            stack.extend(next.iter().copied());
        }
    }

    false
}

/// # Errors
///
/// `CqcError::HierarchyCycle` if the edge would close a cycle.
pub fn check_new_edge(edges: &[(Uuid, Uuid)], parent: Uuid, child: Uuid) -> Result<(), CqcError> {
    if would_create_cycle(edges, parent, child) {
        return Err(CqcError::HierarchyCycle {
            parent_type_id: parent,
            child_type_id: child,
        });
    }
    Ok(())
}

/// Types that appear as a parent but never as a child, in first-seen order
pub fn root_types(edges: &[HierarchyEdge]) -> Vec<DictionaryEntry> {
    let children: HashSet<Uuid> = edges.iter().map(|e| e.child.id).collect();
    let mut seen = HashSet::new();
    edges
        .iter()
        .filter(|e| !children.contains(&e.parent.id))
        .filter(|e| seen.insert(e.parent.id))
        .map(|e| e.parent.clone())
        .collect()
}

/// All types reachable from the roots, breadth first, each listed once
///
/// Gives the top-down presentation order for course leaf groups
/// (Competence, Indicator, then the leaf types).
pub fn type_levels(edges: &[HierarchyEdge]) -> Vec<DictionaryEntry> {
    let mut ordered = Vec::new();
    let mut seen = HashSet::new();
    let mut queue: VecDeque<DictionaryEntry> = root_types(edges).into();

    while let Some(entry) = queue.pop_front() {
        if !seen.insert(entry.id) {
            continue;
        }
        for edge in edges.iter().filter(|e| e.parent.id == entry.id) {
            if !seen.contains(&edge.child.id) {
                queue.push_back(edge.child.clone());
            }
        }
        ordered.push(entry);
    }

    ordered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cqc_types() -> Vec<DictionaryEntry> {
        ["Competence", "Indicator", "Knowledge", "Ability", "Skill"]
            .into_iter()
            .map(DictionaryEntry::new)
            .collect()
    }

    fn cqc_edges(t: &[DictionaryEntry]) -> Vec<HierarchyEdge> {
        vec![
            HierarchyEdge::new(t[0].clone(), t[1].clone()),
            HierarchyEdge::new(t[1].clone(), t[2].clone()),
            HierarchyEdge::new(t[1].clone(), t[3].clone()),
            HierarchyEdge::new(t[1].clone(), t[4].clone()),
        ]
    }

    fn keys(edges: &[HierarchyEdge]) -> Vec<(Uuid, Uuid)> {
        edges.iter().map(HierarchyEdge::key).collect()
    }

    #[test]
    fn test_self_edge_is_cycle() {
        let id = Uuid::new_v4();
        assert!(would_create_cycle(&[], id, id));
    }

    #[test]
    fn test_back_edge_is_cycle() {
        let t = cqc_types();
        let edges = keys(&cqc_edges(&t));

        // Skill -> Competence would close Competence -> Indicator -> Skill
        assert!(would_create_cycle(&edges, t[4].id, t[0].id));
        assert!(matches!(
            check_new_edge(&edges, t[4].id, t[0].id),
            Err(CqcError::HierarchyCycle { .. })
        ));
    }

    #[test]
    fn test_sibling_and_new_edges_allowed() {
        let t = cqc_types();
        let edges = keys(&cqc_edges(&t));

        assert!(!would_create_cycle(&edges, t[2].id, t[3].id));
        assert!(!would_create_cycle(&edges, Uuid::new_v4(), t[0].id));
        assert!(check_new_edge(&edges, t[0].id, t[4].id).is_ok());
    }

    #[test]
    fn test_root_types() {
        let t = cqc_types();
        let roots = root_types(&cqc_edges(&t));
        assert_eq!(roots, vec![t[0].clone()]);
    }

    #[test]
    fn test_type_levels_top_down() {
        let t = cqc_types();
        let levels = type_levels(&cqc_edges(&t));
        let names: Vec<&str> = levels.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Competence", "Indicator", "Knowledge", "Ability", "Skill"]
        );
    }
}
