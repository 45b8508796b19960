//! Candidate extraction from raw field values.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::{Candidate, CandidateKind};

/// User-picture path on the messaging platform; a bare token is appended.
pub const USERPIC_URL_PREFIX: &str = "https://t.me/i/userpic/320/";

lazy_static! {
    /// First http(s) URL, ending at whitespace, comma, semicolon or a quote.
    static ref EMBEDDED_URL_REGEX: Regex =
        Regex::new(r#"https?://[^\s,;'"]+"#).expect("Invalid regex pattern");

    /// Short vector-image filename, e.g. `a1b2_c3.svg`.
    static ref SVG_TOKEN_REGEX: Regex =
        Regex::new(r"^[A-Za-z0-9_\-]+\.svg$").expect("Invalid regex pattern");

    /// Opaque platform file id of at least 20 characters.
    static ref OPAQUE_TOKEN_REGEX: Regex =
        Regex::new(r"^[A-Za-z0-9_\-]{20,}$").expect("Invalid regex pattern");
}

/// Returns the first http(s) URL embedded in `raw`, without token synthesis.
pub fn extract_url(raw: &str) -> Option<Candidate> {
    EMBEDDED_URL_REGEX
        .find(raw)
        .map(|m| Candidate::new(m.as_str(), CandidateKind::EmbeddedUrl))
}

/// Whether `raw` looks like a bare platform photo token.
pub fn is_platform_token(raw: &str) -> bool {
    SVG_TOKEN_REGEX.is_match(raw) || OPAQUE_TOKEN_REGEX.is_match(raw)
}

/// Builds the canonical user-picture URL for a platform token.
pub fn userpic_url(token: &str) -> String {
    format!("{}{}", USERPIC_URL_PREFIX, token)
}

/// Pulls a candidate out of a raw field.
///
/// An embedded URL wins; otherwise a bare platform token is turned into a
/// user-picture URL. Returns `None` when neither shape matches.
pub fn extract(raw: &str) -> Option<Candidate> {
    if let Some(candidate) = extract_url(raw) {
        return Some(candidate);
    }

    let token = raw.trim();
    is_platform_token(token)
        .then(|| Candidate::new(userpic_url(token), CandidateKind::PlatformToken))
}
