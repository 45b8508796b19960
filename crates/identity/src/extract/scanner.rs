//! Document scanner.
//!
//! Search order inside one record:
//! 1. Known avatar fields, in [`AVATAR_FIELDS`] order (list elements in order)
//! 2. The nested [`NESTED_PROFILE_FIELD`] record, at most [`MAX_NESTING_DEPTH`] deep
//! 3. Every other text field in storage order, URL extraction only
//!
//! A correctly named field always beats a URL-looking substring elsewhere.

use std::sync::Arc;

use super::extractor::{extract, extract_url};
use crate::models::{AvatarUrl, FieldValue, Record};
use crate::validator::AvatarValidator;

/// Candidate field names, highest priority first.
pub const AVATAR_FIELDS: &[&str] = &[
    "avatar",
    "photo_url",
    "photo",
    "picture",
    "image",
    "img_url",
    "img",
    "image_url",
    "userpic",
    "telegram_photo",
    "tg_photo",
];

/// Sub-document field searched after the known fields.
pub const NESTED_PROFILE_FIELD: &str = "profile";

/// How many nested levels the scanner may descend.
pub const MAX_NESTING_DEPTH: usize = 1;

/// Scans records for the first valid avatar.
#[derive(Clone, Debug)]
pub struct DocumentScanner {
    validator: Arc<AvatarValidator>,
}

impl DocumentScanner {
    pub fn new(validator: Arc<AvatarValidator>) -> Self {
        Self { validator }
    }

    /// Returns the first valid avatar in `doc`, or `None`.
    pub fn scan(&self, doc: &Record) -> Option<AvatarUrl> {
        self.scan_with_depth(doc, MAX_NESTING_DEPTH)
    }

    fn scan_with_depth(&self, doc: &Record, remaining_depth: usize) -> Option<AvatarUrl> {
        if let Some(found) = self.scan_known_fields(doc) {
            return Some(found);
        }

        if remaining_depth > 0 {
            if let Some(nested) = doc.get(NESTED_PROFILE_FIELD).and_then(FieldValue::as_record) {
                if let Some(found) = self.scan_with_depth(nested, remaining_depth - 1) {
                    return Some(found);
                }
            }
        }

        self.scan_remaining_fields(doc)
    }

    fn scan_known_fields(&self, doc: &Record) -> Option<AvatarUrl> {
        AVATAR_FIELDS
            .iter()
            .filter_map(|field| doc.get(field))
            .find_map(|value| match value {
                FieldValue::List(items) => items
                    .iter()
                    .filter_map(FieldValue::as_text)
                    .find_map(|raw| self.accept_extracted(raw)),
                FieldValue::Text(raw) => self.accept_extracted(raw),
                FieldValue::Nested(_) | FieldValue::Opaque => None,
            })
    }

    fn scan_remaining_fields(&self, doc: &Record) -> Option<AvatarUrl> {
        doc.iter()
            .filter(|(name, _)| !AVATAR_FIELDS.contains(name))
            .filter_map(|(_, value)| value.as_text())
            .find_map(|raw| {
                extract_url(raw).and_then(|candidate| self.validator.accept(&candidate))
            })
    }

    fn accept_extracted(&self, raw: &str) -> Option<AvatarUrl> {
        extract(raw).and_then(|candidate| self.validator.accept(&candidate))
    }
}

impl Default for DocumentScanner {
    fn default() -> Self {
        Self::new(Arc::new(AvatarValidator::new()))
    }
}
