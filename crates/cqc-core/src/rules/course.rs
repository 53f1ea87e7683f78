//! Course leaf-set rules.

use std::collections::{BTreeSet, HashMap};

use uuid::Uuid;

use crate::errors::CqcError;
use crate::model::{Element, LeafGroups};

/// Check one direction's leaf mapping against the stored elements
///
/// `stored` maps element id to the element as persisted; the caller's copy
/// in `groups` is only trusted for its id. Every listed element must exist,
/// sit under its own type's key, and have its parent listed as well. The
/// last condition makes the set parent-closed, so it reaches a root-type
/// element without gaps.
///
/// # Errors
///
/// `LeafNotFound`, `LeafTypeMismatch` or `LeafParentMissing` for the first
/// offending element.
pub fn check_leaf_closure(
    groups: &LeafGroups,
    stored: &HashMap<Uuid, Element>,
) -> Result<(), CqcError> {
    let listed: BTreeSet<Uuid> = groups.element_ids();

    for (key, element) in groups.entries() {
        let actual = stored
            .get(&element.id)
            .ok_or(CqcError::LeafNotFound {
                element_id: element.id,
            })?;

        if actual.type_id() != key.id {
            return Err(CqcError::LeafTypeMismatch {
                element_id: element.id,
                listed_type_id: key.id,
                actual_type_id: actual.type_id(),
            });
        }

        if let Some(parent_id) = actual.parent_id {
            if !listed.contains(&parent_id) {
                return Err(CqcError::LeafParentMissing {
                    element_id: element.id,
                    parent_id,
                });
            }
        }
    }

    Ok(())
}
