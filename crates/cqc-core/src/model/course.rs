use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{DictionaryEntry, Element};

/// Which of a course's two leaf collections a link belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeafDirection {
    Input,
    Output,
}

impl LeafDirection {
    pub const ALL: [LeafDirection; 2] = [LeafDirection::Input, LeafDirection::Output];

    pub fn as_str(&self) -> &'static str {
        match self {
            LeafDirection::Input => "input",
            LeafDirection::Output => "output",
        }
    }

    /// Link table backing this direction
    pub fn link_table(&self) -> &'static str {
        match self {
            LeafDirection::Input => "course_input_leaf_link",
            LeafDirection::Output => "course_output_leaf_link",
        }
    }

    /// View returning this direction's leaves joined to element and type
    pub fn elements_view(&self) -> &'static str {
        match self {
            LeafDirection::Input => "course_input_elements",
            LeafDirection::Output => "course_output_elements",
        }
    }
}

impl std::fmt::Display for LeafDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of a course leaf link table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CourseLeafLink {
    pub course_id: Uuid,
    pub leaf_id: Uuid,
}

impl CourseLeafLink {
    pub fn new(course_id: Uuid, leaf_id: Uuid) -> Self {
        Self { course_id, leaf_id }
    }
}

/// Elements grouped by type, groups kept in first-appearance order
///
/// Equality compares the set of types and each type's element set; group
/// order is presentation only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeafGroups(Vec<(DictionaryEntry, BTreeSet<Element>)>);

impl LeafGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `element` under its own type
    ///
    /// Returns false if it was already present in that group.
    pub fn insert(&mut self, element: Element) -> bool {
        let key = element.element_type.clone();
        self.insert_under(key, element)
    }

    /// Add `element` under an explicit type key, which may differ from the
    /// element's own type until validated
    pub fn insert_under(&mut self, key: DictionaryEntry, element: Element) -> bool {
        match self.0.iter_mut().find(|(k, _)| k.id == key.id) {
            Some((_, set)) => set.insert(element),
            None => {
                self.0.push((key, BTreeSet::from([element])));
                true
            }
        }
    }

    /// Builder form of `insert_under` for a whole group
    pub fn with_group(
        mut self,
        key: DictionaryEntry,
        elements: impl IntoIterator<Item = Element>,
    ) -> Self {
        for element in elements {
            self.insert_under(key.clone(), element);
        }
        self
    }

    pub fn groups(&self) -> impl Iterator<Item = (&DictionaryEntry, &BTreeSet<Element>)> {
        self.0.iter().map(|(k, v)| (k, v))
    }

    /// Every (listed type, element) pair
    pub fn entries(&self) -> impl Iterator<Item = (&DictionaryEntry, &Element)> {
        self.0
            .iter()
            .flat_map(|(k, set)| set.iter().map(move |e| (k, e)))
    }

    pub fn get(&self, type_id: Uuid) -> Option<&BTreeSet<Element>> {
        self.0.iter().find(|(k, _)| k.id == type_id).map(|(_, v)| v)
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.0.iter().flat_map(|(_, set)| set.iter())
    }

    pub fn element_ids(&self) -> BTreeSet<Uuid> {
        self.elements().map(|e| e.id).collect()
    }

    /// Number of type groups
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn element_count(&self) -> usize {
        self.0.iter().map(|(_, set)| set.len()).sum()
    }

    /// Reorder groups to follow `type_order` (root type first); types not in
    /// `type_order` keep their relative order at the end
    pub fn order_by_types(&mut self, type_order: &[DictionaryEntry]) {
        let rank = |key: &DictionaryEntry| {
            type_order
                .iter()
                .position(|t| t.id == key.id)
                .unwrap_or(type_order.len())
        };
        self.0.sort_by_key(|(k, _)| rank(k));
    }
}

impl PartialEq for LeafGroups {
    fn eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len()
            && self.0.iter().all(|(key, set)| {
                other
                    .0
                    .iter()
                    .any(|(other_key, other_set)| other_key == key && other_set == set)
            })
    }
}

impl Eq for LeafGroups {}

impl FromIterator<Element> for LeafGroups {
    fn from_iter<I: IntoIterator<Item = Element>>(iter: I) -> Self {
        let mut groups = LeafGroups::new();
        for element in iter {
            groups.insert(element);
        }
        groups
    }
}

/// A course and the hierarchy leaves it consumes and produces
///
/// A course does not own its elements; it references existing ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: Uuid,
    pub name: String,
    pub input_leaves: LeafGroups,
    pub output_leaves: LeafGroups,
}

impl Course {
    /// Orderable columns of `course`
    pub const COLUMNS: &'static [&'static str] = &["id", "name"];
    pub const TABLE: &'static str = "course";
    pub const NAME_MAX_LEN: usize = 250;

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            input_leaves: LeafGroups::new(),
            output_leaves: LeafGroups::new(),
        }
    }

    pub fn with_inputs(mut self, leaves: LeafGroups) -> Self {
        self.input_leaves = leaves;
        self
    }

    pub fn with_outputs(mut self, leaves: LeafGroups) -> Self {
        self.output_leaves = leaves;
        self
    }

    pub fn leaves(&self, direction: LeafDirection) -> &LeafGroups {
        match direction {
            LeafDirection::Input => &self.input_leaves,
            LeafDirection::Output => &self.output_leaves,
        }
    }

    pub fn leaves_mut(&mut self, direction: LeafDirection) -> &mut LeafGroups {
        match direction {
            LeafDirection::Input => &mut self.input_leaves,
            LeafDirection::Output => &mut self.output_leaves,
        }
    }
}

fn fmt_groups(f: &mut std::fmt::Formatter<'_>, groups: &LeafGroups) -> std::fmt::Result {
    if groups.is_empty() {
        return f.write_str(" -");
    }
    for (key, elements) in groups.groups() {
        let values: Vec<&str> = elements.iter().map(|e| e.value.as_str()).collect();
        write!(f, " {} [{}]", key.name, values.join(", "))?;
    }
    Ok(())
}

impl std::fmt::Display for Course {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.name)?;
        f.write_str("  input:")?;
        fmt_groups(f, &self.input_leaves)?;
        f.write_str("\n  output:")?;
        fmt_groups(f, &self.output_leaves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types() -> (DictionaryEntry, DictionaryEntry) {
        (
            DictionaryEntry::new("Competence"),
            DictionaryEntry::new("Indicator"),
        )
    }

    #[test]
    fn test_groups_keep_first_appearance_order() {
        let (competence, indicator) = types();
        let c1 = Element::root(competence.clone(), "Competence1");
        let i1 = Element::child_of(&c1, indicator.clone(), "Indicator1");
        let i2 = Element::child_of(&c1, indicator.clone(), "Indicator2");

        let groups: LeafGroups = vec![i1, c1, i2].into_iter().collect();

        let keys: Vec<&str> = groups.groups().map(|(k, _)| k.name.as_str()).collect();
        assert_eq!(keys, vec!["Indicator", "Competence"]);
        assert_eq!(groups.get(indicator.id).map(|s| s.len()), Some(2));
        assert_eq!(groups.element_count(), 3);
    }

    #[test]
    fn test_equality_ignores_group_order() {
        let (competence, indicator) = types();
        let c1 = Element::root(competence.clone(), "Competence1");
        let i1 = Element::child_of(&c1, indicator.clone(), "Indicator1");

        let a = LeafGroups::new()
            .with_group(competence.clone(), [c1.clone()])
            .with_group(indicator.clone(), [i1.clone()]);
        let b = LeafGroups::new()
            .with_group(indicator, [i1])
            .with_group(competence, [c1]);

        assert_eq!(a, b);
    }

    #[test]
    fn test_equality_detects_regrouping() {
        let (competence, indicator) = types();
        let c1 = Element::root(competence.clone(), "Competence1");
        let i1 = Element::child_of(&c1, indicator.clone(), "Indicator1");

        let by_type: LeafGroups = vec![c1.clone(), i1.clone()].into_iter().collect();
        let lumped = LeafGroups::new().with_group(competence, [c1, i1]);

        assert_ne!(by_type, lumped);
    }

    #[test]
    fn test_order_by_types_puts_root_first() {
        let (competence, indicator) = types();
        let c1 = Element::root(competence.clone(), "Competence1");
        let i1 = Element::child_of(&c1, indicator.clone(), "Indicator1");

        let mut groups: LeafGroups = vec![i1, c1].into_iter().collect();
        groups.order_by_types(&[competence.clone(), indicator]);

        let first = groups.groups().next().map(|(k, _)| k.id);
        assert_eq!(first, Some(competence.id));
    }

    #[test]
    fn test_display_lists_values_per_type() {
        let (competence, _) = types();
        let c1 = Element::root(competence.clone(), "Competence1");
        let course = Course::new("Rust 101")
            .with_inputs(LeafGroups::new().with_group(competence, [c1]));

        let text = course.to_string();
        assert!(text.starts_with("Rust 101\n"));
        assert!(text.contains("input: Competence [Competence1]"));
        assert!(text.contains("output: -"));
    }
}
