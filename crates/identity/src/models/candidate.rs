use std::fmt;

use serde::Serialize;

/// How a candidate was pulled out of a raw field.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CandidateKind {
    /// First http(s) URL found in the field.
    EmbeddedUrl,
    /// URL built from a bare platform photo token.
    PlatformToken,
}

/// A raw string extracted from a record field, not yet validated.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Candidate {
    pub value: String,
    pub kind: CandidateKind,
}

impl Candidate {
    pub fn new(value: impl Into<String>, kind: CandidateKind) -> Self {
        Self {
            value: value.into(),
            kind,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

/// An avatar URL that passed the validity predicate.
///
/// Only [`AvatarValidator`](crate::validator::AvatarValidator) can construct
/// one, so a value of this type is always presentable.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AvatarUrl(String);

impl AvatarUrl {
    pub(crate) fn new_validated(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for AvatarUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AvatarUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
