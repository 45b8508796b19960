//! Candidate extraction and per-document scanning.

mod extractor;
mod scanner;

pub use extractor::{extract, extract_url, is_platform_token, userpic_url, USERPIC_URL_PREFIX};
pub use scanner::{DocumentScanner, AVATAR_FIELDS, MAX_NESTING_DEPTH, NESTED_PROFILE_FIELD};
