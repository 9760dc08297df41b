//! Form validation for book drafts.
//!
//! Pure and side-effect free: every rule runs, nothing short-circuits, and
//! the result is a field-to-message map. An empty map means the form can be
//! submitted. Calling this before `add_book`/`update_book` is the UI
//! layer's job; the catalog itself does not re-validate.

use chrono::{Datelike, Utc};
use std::collections::BTreeMap;
use std::fmt;

use crate::model::BookDraft;

/// Earliest accepted publication year.
const MIN_YEAR: i32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    Title,
    Author,
    Isbn,
    Category,
    PublishedYear,
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FormField::Title => "title",
            FormField::Author => "author",
            FormField::Isbn => "isbn",
            FormField::Category => "category",
            FormField::PublishedYear => "publishedYear",
        };
        f.write_str(name)
    }
}

/// Field-level validation errors, ordered by field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: BTreeMap<FormField, &'static str>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn get(&self, field: FormField) -> Option<&'static str> {
        self.errors.get(&field).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, &'static str)> + '_ {
        self.errors.iter().map(|(field, msg)| (*field, *msg))
    }

    fn insert(&mut self, field: FormField, message: &'static str) {
        self.errors.insert(field, message);
    }
}

/// Validate a draft against the current calendar year.
pub fn validate(draft: &BookDraft) -> FieldErrors {
    validate_at(draft, Utc::now().year())
}

/// Validate a draft against an explicit current year.
pub fn validate_at(draft: &BookDraft, current_year: i32) -> FieldErrors {
    let mut errors = FieldErrors::default();

    if draft.title.trim().is_empty() {
        errors.insert(FormField::Title, "Title is required");
    }
    if draft.author.trim().is_empty() {
        errors.insert(FormField::Author, "Author is required");
    }
    if draft.isbn.trim().is_empty() {
        errors.insert(FormField::Isbn, "ISBN is required");
    }
    if draft.category.is_none() {
        errors.insert(FormField::Category, "Category is required");
    }
    if draft.published_year < MIN_YEAR || draft.published_year > current_year + 1 {
        errors.insert(FormField::PublishedYear, "Invalid year");
    }

    errors
}

/// The issue dialog's single rule: the member name, trimmed, must be
/// non-empty. Returns the trimmed name that should be stored.
pub fn member_name(input: &str) -> Result<&str, &'static str> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        Err("Member name is required")
    } else {
        Ok(trimmed)
    }
}
