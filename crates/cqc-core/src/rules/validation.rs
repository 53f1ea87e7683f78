//! Field-level limits.

use crate::errors::CqcError;
use crate::model::{Course, DictionaryEntry, Element};

/// Check a required text field against its character limit
///
/// # Errors
///
/// `EmptyValue` for blank text, `ValueTooLong` past `max` characters.
pub fn check_text(field: &'static str, value: &str, max: usize) -> Result<(), CqcError> {
    if value.trim().is_empty() {
        return Err(CqcError::EmptyValue { field });
    }
    let actual = value.chars().count();
    if actual > max {
        return Err(CqcError::ValueTooLong { field, max, actual });
    }
    Ok(())
}

/// # Errors
///
/// See [`check_text`].
pub fn validate_dictionary_entry(entry: &DictionaryEntry) -> Result<(), CqcError> {
    check_text("name", &entry.name, DictionaryEntry::NAME_MAX_LEN)
}

/// # Errors
///
/// See [`check_text`].
pub fn validate_element(element: &Element) -> Result<(), CqcError> {
    check_text("value", &element.value, Element::VALUE_MAX_LEN)
}

/// # Errors
///
/// See [`check_text`].
pub fn validate_course_name(course: &Course) -> Result<(), CqcError> {
    check_text("course name", &course.name, Course::NAME_MAX_LEN)
}
