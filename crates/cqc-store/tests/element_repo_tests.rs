// Integration tests for ElementRepo and the element placement triggers

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use cqc_core::model::{DictionaryEntry, Element};
use cqc_core::{ExErrorKind, Page, SortOrder};
use cqc_store::{DictionaryRepo, ElementRepo};

#[test]
fn test_insert_then_select_by_id_round_trips() {
    // Given: The standard hierarchy and a full subtree
    let store = common::store();
    let types = common::seed_hierarchy(store.conn());
    let tree = common::tree(&types, 1);

    // When: The subtree is inserted
    let inserted = ElementRepo::multi_insert(store.conn(), &tree.elements()).unwrap();

    // Then: Every element reads back equal, type resolved
    assert_eq!(inserted, 6);
    for element in tree.elements() {
        let loaded = ElementRepo::select_by_id(store.conn(), element.id).unwrap();
        assert_eq!(loaded.as_ref(), Some(&element), "round trip of {}", element.value);
    }
}

#[test]
fn test_root_type_with_parent_rejected() {
    let store = common::store();
    let types = common::seed_hierarchy(store.conn());
    let tree = common::insert_tree(store.conn(), &types, 1);

    let nested_root = Element::child_of(&tree.i, types.competence.clone(), "Nested");
    let err = ElementRepo::insert(store.conn(), &nested_root).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::HierarchyViolation);
    assert!(err.message().contains("root type"), "got: {}", err.message());
}

#[test]
fn test_non_root_without_parent_rejected() {
    let store = common::store();
    let types = common::seed_hierarchy(store.conn());

    let orphan = Element::root(types.indicator.clone(), "Orphan");
    let err = ElementRepo::insert(store.conn(), &orphan).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::HierarchyViolation);
    assert!(err.message().contains("requires a parent"), "got: {}", err.message());
}

#[test]
fn test_wrong_parent_type_rejected() {
    // Given: A competence root
    let store = common::store();
    let types = common::seed_hierarchy(store.conn());
    let tree = common::insert_tree(store.conn(), &types, 1);

    // When: A Knowledge element is put directly under it
    let skipped = Element::child_of(&tree.c, types.knowledge.clone(), "Skipped");
    let err = ElementRepo::insert(store.conn(), &skipped).unwrap_err();

    // Then: Competence is not a parent type of Knowledge
    assert_eq!(err.kind(), ExErrorKind::HierarchyViolation);
    assert!(ElementRepo::select_by_id(store.conn(), skipped.id)
        .unwrap()
        .is_none());
}

#[test]
fn test_unknown_parent_or_type_is_foreign_key_failure() {
    let store = common::store();
    let types = common::seed_hierarchy(store.conn());

    let dangling = Element::new(types.indicator.clone(), Some(common::random_id()), "Dangling");
    let untyped = Element::root(DictionaryEntry::new("Ghost"), "Untyped");

    assert_eq!(
        ElementRepo::insert(store.conn(), &dangling).unwrap_err().kind(),
        ExErrorKind::ForeignKeyViolation
    );
    assert_eq!(
        ElementRepo::insert(store.conn(), &untyped).unwrap_err().kind(),
        ExErrorKind::ForeignKeyViolation
    );
}

#[test]
fn test_sibling_values_unique_per_parent() {
    let store = common::store();
    let types = common::seed_hierarchy(store.conn());
    let first = common::insert_tree(store.conn(), &types, 1);
    let second = common::insert_tree(store.conn(), &types, 2);

    let same_parent = Element::child_of(&first.i, types.skill.clone(), first.s1.value.clone());
    let other_parent = Element::child_of(&second.i, types.skill.clone(), first.s1.value.clone());
    let same_root = Element::root(types.competence.clone(), first.c.value.clone());

    assert_eq!(
        ElementRepo::insert(store.conn(), &same_parent).unwrap_err().kind(),
        ExErrorKind::UniqueConstraintViolation
    );
    assert!(ElementRepo::insert(store.conn(), &other_parent).is_ok());
    assert_eq!(
        ElementRepo::insert(store.conn(), &same_root).unwrap_err().kind(),
        ExErrorKind::UniqueConstraintViolation,
        "roots share one scope"
    );
}

#[test]
fn test_blank_and_long_values_rejected() {
    let store = common::store();
    let types = common::seed_hierarchy(store.conn());

    let blank = Element::root(types.competence.clone(), " ");
    let long = Element::root(types.competence.clone(), "v".repeat(251));

    assert_eq!(
        ElementRepo::insert(store.conn(), &blank).unwrap_err().kind(),
        ExErrorKind::InvalidInput
    );
    assert_eq!(
        ElementRepo::insert(store.conn(), &long).unwrap_err().kind(),
        ExErrorKind::InvalidInput
    );
}

#[test]
fn test_multi_insert_is_atomic() {
    let store = common::store();
    let types = common::seed_hierarchy(store.conn());
    let mut elements = common::tree(&types, 1).elements();
    elements.push(Element::root(types.skill.clone(), "Misplaced"));

    let err = ElementRepo::multi_insert(store.conn(), &elements).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::HierarchyViolation);
    assert_eq!(common::count(store.conn(), "cqc_elem"), 0);
}

#[test]
fn test_update_moves_element_between_parents() {
    let store = common::store();
    let types = common::seed_hierarchy(store.conn());
    let first = common::insert_tree(store.conn(), &types, 1);
    let second = common::insert_tree(store.conn(), &types, 2);

    let mut moved = first.k1.clone();
    moved.parent_id = Some(second.i.id);
    moved.value = "Knowledge moved".to_string();
    let updated = ElementRepo::update(store.conn(), &moved).unwrap();

    assert_eq!(updated, 1);
    assert_eq!(
        ElementRepo::select_by_id(store.conn(), moved.id).unwrap(),
        Some(moved)
    );
}

#[test]
fn test_update_to_invalid_placement_rejected() {
    let store = common::store();
    let types = common::seed_hierarchy(store.conn());
    let tree = common::insert_tree(store.conn(), &types, 1);

    let mut detached = tree.k1.clone();
    detached.parent_id = None;
    let mut self_parent = tree.k2.clone();
    self_parent.parent_id = Some(self_parent.id);

    assert_eq!(
        ElementRepo::update(store.conn(), &detached).unwrap_err().kind(),
        ExErrorKind::HierarchyViolation
    );
    assert_eq!(
        ElementRepo::update(store.conn(), &self_parent).unwrap_err().kind(),
        ExErrorKind::HierarchyViolation
    );
}

#[test]
fn test_type_change_rejected_while_children_disagree() {
    // Given: An indicator with knowledge, ability and skill children
    let store = common::store();
    let types = common::seed_hierarchy(store.conn());
    let tree = common::insert_tree(store.conn(), &types, 1);

    // When: The leaf k1 is retyped to Skill (fine) and the indicator to a
    // type its children do not accept
    let mut retyped_leaf = tree.k1.clone();
    retyped_leaf.element_type = types.skill.clone();
    let mut retyped_parent = tree.i.clone();
    retyped_parent.element_type = types.knowledge.clone();

    // Then: Only the leaf change is accepted
    assert_eq!(ElementRepo::update(store.conn(), &retyped_leaf).unwrap(), 1);
    assert_eq!(
        ElementRepo::update(store.conn(), &retyped_parent).unwrap_err().kind(),
        ExErrorKind::HierarchyViolation
    );
}

#[test]
fn test_value_only_update_skips_placement_checks() {
    // Given: A skill whose edge was removed behind the repository's back,
    // as in a database written before edge changes were guarded
    let store = common::store();
    let types = common::seed_hierarchy(store.conn());
    let tree = common::insert_tree(store.conn(), &types, 1);
    store
        .conn()
        .execute(
            "DELETE FROM cqc_elem_hierarchy WHERE parent_type_id = ?1 AND child_type_id = ?2",
            [types.indicator.id.to_string(), types.skill.id.to_string()],
        )
        .unwrap();

    // When: Only its value changes
    let mut renamed = tree.s1.clone();
    renamed.value = "Skill renamed".to_string();
    let updated = ElementRepo::update(store.conn(), &renamed).unwrap();

    // Then: The rename goes through, but moving it is still judged
    assert_eq!(updated, 1);
    let mut moved = renamed.clone();
    moved.parent_id = Some(tree.c.id);
    assert_eq!(
        ElementRepo::update(store.conn(), &moved).unwrap_err().kind(),
        ExErrorKind::HierarchyViolation
    );
}

#[test]
fn test_update_missing_is_zero() {
    let store = common::store();
    let types = common::seed_hierarchy(store.conn());

    let ghost = Element::root(types.competence.clone(), "Ghost");

    assert_eq!(ElementRepo::update(store.conn(), &ghost).unwrap(), 0);
}

#[test]
fn test_delete_with_children_blocked() {
    // Given: An indicator with children
    let store = common::store();
    let types = common::seed_hierarchy(store.conn());
    let tree = common::insert_tree(store.conn(), &types, 1);

    // When: The indicator is deleted
    let err = ElementRepo::delete_by_id(store.conn(), tree.i.id).unwrap_err();

    // Then: The delete is blocked and parent and child both remain
    assert_eq!(err.kind(), ExErrorKind::ReferentialDeleteBlocked);
    assert!(ElementRepo::select_by_id(store.conn(), tree.i.id).unwrap().is_some());
    assert!(ElementRepo::select_by_id(store.conn(), tree.k1.id).unwrap().is_some());
}

#[test]
fn test_delete_leaf_then_missing_is_zero() {
    let store = common::store();
    let types = common::seed_hierarchy(store.conn());
    let tree = common::insert_tree(store.conn(), &types, 1);

    assert_eq!(ElementRepo::delete_by_id(store.conn(), tree.s1.id).unwrap(), 1);
    assert_eq!(ElementRepo::delete_by_id(store.conn(), tree.s1.id).unwrap(), 0);
}

#[test]
fn test_select_children_ordered_by_value() {
    let store = common::store();
    let types = common::seed_hierarchy(store.conn());
    let tree = common::insert_tree(store.conn(), &types, 1);

    let values: Vec<String> = ElementRepo::select_children(store.conn(), tree.i.id)
        .unwrap()
        .into_iter()
        .map(|e| e.value)
        .collect();

    assert_eq!(
        values,
        vec!["Ability1", "Knowledge1.1", "Knowledge1.2", "Skill1"]
    );
}

#[test]
fn test_select_all_orders_and_pages() {
    let store = common::store();
    let types = common::seed_hierarchy(store.conn());
    common::insert_tree(store.conn(), &types, 1);
    common::insert_tree(store.conn(), &types, 2);

    let page = Page::new().order_by("value").order(SortOrder::Desc).limit(3);
    let values: Vec<String> = ElementRepo::select_all(store.conn(), &page)
        .unwrap()
        .into_iter()
        .map(|e| e.value)
        .collect();

    assert_eq!(values, vec!["Skill2", "Skill1", "Knowledge2.2"]);
    assert_eq!(
        ElementRepo::select_all(store.conn(), &Page::new()).unwrap().len(),
        12
    );
    assert_eq!(
        ElementRepo::select_all(store.conn(), &Page::new().order_by("type"))
            .unwrap_err()
            .kind(),
        ExErrorKind::UnknownColumn
    );
}

#[test]
fn test_type_in_use_cannot_be_hard_deleted() {
    let store = common::store();
    let types = common::seed_hierarchy(store.conn());
    common::insert_tree(store.conn(), &types, 1);
    let extra = DictionaryEntry::new("Unused");
    DictionaryRepo::insert(store.conn(), &extra).unwrap();

    assert_eq!(
        DictionaryRepo::delete_by_id(store.conn(), types.knowledge.id)
            .unwrap_err()
            .kind(),
        ExErrorKind::ReferentialDeleteBlocked
    );
    assert_eq!(DictionaryRepo::delete_by_id(store.conn(), extra.id).unwrap(), 1);
}
