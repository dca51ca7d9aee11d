//! Post form drafts and their validation rules.

use std::collections::BTreeMap;
use std::fmt;

use super::types::{Post, PostDraft, PostStatus};

pub const TITLE_MIN_CHARS: usize = 20;
pub const CONTENT_MIN_CHARS: usize = 20;
pub const CATEGORY_MIN_CHARS: usize = 3;

/// Editable form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DraftField {
    Title,
    Content,
    Category,
    Status,
}

impl DraftField {
    pub const ALL: [DraftField; 4] = [
        DraftField::Title,
        DraftField::Content,
        DraftField::Category,
        DraftField::Status,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DraftField::Title => "title",
            DraftField::Content => "content",
            DraftField::Category => "category",
            DraftField::Status => "status",
        }
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw form contents while the user is typing. The status is kept as the
/// selected string so an unknown value can be reported instead of panicking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftForm {
    pub title: String,
    pub content: String,
    pub category: String,
    pub status: String,
}

impl Default for DraftForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            content: String::new(),
            category: String::new(),
            status: PostStatus::Draft.as_str().to_string(),
        }
    }
}

impl DraftForm {
    pub fn from_post(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            content: post.content.clone(),
            category: post.category.clone(),
            status: post.status.as_str().to_string(),
        }
    }

    pub fn value(&self, field: DraftField) -> &str {
        match field {
            DraftField::Title => &self.title,
            DraftField::Content => &self.content,
            DraftField::Category => &self.category,
            DraftField::Status => &self.status,
        }
    }

    pub fn set(&mut self, field: DraftField, value: String) {
        match field {
            DraftField::Title => self.title = value,
            DraftField::Content => self.content = value,
            DraftField::Category => self.category = value,
            DraftField::Status => self.status = value,
        }
    }
}

/// Per-field validation messages, ordered by field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<DraftField, &'static str>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: DraftField) -> Option<&'static str> {
        self.0.get(&field).copied()
    }

    pub fn insert(&mut self, field: DraftField, message: &'static str) {
        self.0.insert(field, message);
    }

    /// Drop the message for one field, leaving the others in place.
    pub fn clear(&mut self, field: DraftField) {
        self.0.remove(&field);
    }

    pub fn iter(&self) -> impl Iterator<Item = (DraftField, &'static str)> + '_ {
        self.0.iter().map(|(field, message)| (*field, *message))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

/// Outcome of validating a form. `draft` is present exactly when no field
/// failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    pub errors: FieldErrors,
    pub draft: Option<PostDraft>,
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Check every field independently; one failing field never hides another.
pub fn validate(form: &DraftForm) -> Validation {
    let mut errors = FieldErrors::default();

    if let Some(message) = check_length(
        &form.title,
        TITLE_MIN_CHARS,
        "Title is required",
        "Title must be at least 20 characters",
    ) {
        errors.insert(DraftField::Title, message);
    }

    if let Some(message) = check_length(
        &form.content,
        CONTENT_MIN_CHARS,
        "Content is required",
        "Content must be at least 20 characters",
    ) {
        errors.insert(DraftField::Content, message);
    }

    if let Some(message) = check_length(
        &form.category,
        CATEGORY_MIN_CHARS,
        "Category is required",
        "Category must be at least 3 characters",
    ) {
        errors.insert(DraftField::Category, message);
    }

    let status = PostStatus::parse(&form.status);
    if status.is_none() {
        errors.insert(DraftField::Status, "Invalid status");
    }

    let draft = match status {
        Some(status) if errors.is_empty() => Some(PostDraft {
            title: form.title.clone(),
            content: form.content.clone(),
            category: form.category.clone(),
            status,
        }),
        _ => None,
    };

    Validation { errors, draft }
}

fn check_length(
    value: &str,
    min_chars: usize,
    required: &'static str,
    too_short: &'static str,
) -> Option<&'static str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Some(required)
    } else if trimmed.chars().count() < min_chars {
        Some(too_short)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> DraftForm {
        DraftForm {
            title: "A".repeat(25),
            content: "B".repeat(30),
            category: "tech".into(),
            status: "draft".into(),
        }
    }

    #[test]
    fn valid_form_produces_typed_draft() {
        let outcome = validate(&valid_form());
        assert!(outcome.is_valid());
        let draft = outcome.draft.expect("draft");
        assert_eq!(draft.status, PostStatus::Draft);
        assert_eq!(draft.title.len(), 25);
    }

    #[test]
    fn empty_form_reports_required_for_text_fields() {
        let outcome = validate(&DraftForm::default());
        assert!(!outcome.is_valid());
        assert_eq!(outcome.errors.get(DraftField::Title), Some("Title is required"));
        assert_eq!(
            outcome.errors.get(DraftField::Content),
            Some("Content is required")
        );
        assert_eq!(
            outcome.errors.get(DraftField::Category),
            Some("Category is required")
        );
        assert_eq!(outcome.errors.get(DraftField::Status), None);
        assert!(outcome.draft.is_none());
    }

    #[test]
    fn length_is_measured_after_trimming() {
        let mut form = valid_form();
        form.title = format!("   {}   ", "x".repeat(19));
        form.category = "  ab  ".into();
        let outcome = validate(&form);
        assert_eq!(
            outcome.errors.get(DraftField::Title),
            Some("Title must be at least 20 characters")
        );
        assert_eq!(
            outcome.errors.get(DraftField::Category),
            Some("Category must be at least 3 characters")
        );
        assert_eq!(outcome.errors.get(DraftField::Content), None);
    }

    #[test]
    fn whitespace_only_counts_as_missing() {
        let mut form = valid_form();
        form.content = "      \n\t ".into();
        let outcome = validate(&form);
        assert_eq!(
            outcome.errors.get(DraftField::Content),
            Some("Content is required")
        );
        assert_eq!(outcome.errors.len(), 1);
    }

    #[test]
    fn boundary_lengths_pass() {
        let form = DraftForm {
            title: "t".repeat(TITLE_MIN_CHARS),
            content: "c".repeat(CONTENT_MIN_CHARS),
            category: "abc".into(),
            status: "publish".into(),
        };
        assert!(validate(&form).is_valid());
    }

    #[test]
    fn multibyte_characters_count_once() {
        let mut form = valid_form();
        form.title = "é".repeat(20);
        assert!(validate(&form).is_valid());
    }

    #[test]
    fn unknown_status_is_a_field_error() {
        let mut form = valid_form();
        form.status = "archived".into();
        let outcome = validate(&form);
        assert_eq!(outcome.errors.get(DraftField::Status), Some("Invalid status"));
        assert_eq!(outcome.errors.len(), 1);
        assert!(outcome.draft.is_none());
    }

    #[test]
    fn every_short_field_is_reported_together() {
        let form = DraftForm {
            title: "short".into(),
            content: "short".into(),
            category: "ab".into(),
            status: "nope".into(),
        };
        let outcome = validate(&form);
        assert_eq!(outcome.errors.len(), 4);
    }

    #[test]
    fn clearing_one_field_keeps_the_rest() {
        let mut errors = validate(&DraftForm::default()).errors;
        errors.clear(DraftField::Title);
        assert_eq!(errors.get(DraftField::Title), None);
        assert!(errors.get(DraftField::Content).is_some());
        assert!(errors.get(DraftField::Category).is_some());
    }

    #[test]
    fn form_prefills_from_post() {
        let post = Post {
            id: "9".into(),
            title: "Existing title with enough chars".into(),
            content: "Existing content with enough chars".into(),
            category: "news".into(),
            status: PostStatus::Trash,
            created_at: time::OffsetDateTime::UNIX_EPOCH,
            updated_at: None,
        };
        let form = DraftForm::from_post(&post);
        assert_eq!(form.value(DraftField::Status), "trash");
        assert_eq!(form.value(DraftField::Category), "news");
    }
}
