//! Avatar validity predicate.
//!
//! A candidate is acceptable when, after trimming:
//! - it is non-empty
//! - it starts with an `http://` or `https://` scheme
//! - it does not contain a placeholder-image host marker
//! - it does not point into the app's own default-asset tree
//!
//! Everything else is treated as a placeholder so the search keeps going.

use std::fmt;

use lazy_static::lazy_static;
use log::trace;

use crate::models::{AvatarUrl, Candidate};

/// Placeholder-image hosts that never count as a real avatar.
pub const PLACEHOLDER_HOST_MARKERS: &[&str] = &["picsum.photos"];

/// Path markers of the app's own default assets.
pub const LOCAL_ASSET_MARKERS: &[&str] = &["/static/"];

/// Why a candidate was rejected.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Rejection {
    Empty,
    MissingScheme,
    PlaceholderHost(String),
    LocalAsset(String),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Empty => f.write_str("empty value"),
            Rejection::MissingScheme => f.write_str("missing http(s) scheme"),
            Rejection::PlaceholderHost(marker) => write!(f, "placeholder host '{}'", marker),
            Rejection::LocalAsset(marker) => write!(f, "local default asset '{}'", marker),
        }
    }
}

/// Validator configuration.
#[derive(Clone, Debug)]
pub struct ValidatorConfig {
    /// Substrings identifying placeholder-image services.
    pub denied_host_markers: Vec<String>,
    /// Substrings identifying the app's own default assets.
    pub local_asset_markers: Vec<String>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            denied_host_markers: PLACEHOLDER_HOST_MARKERS.iter().map(|m| m.to_string()).collect(),
            local_asset_markers: LOCAL_ASSET_MARKERS.iter().map(|m| m.to_string()).collect(),
        }
    }
}

/// Avatar validity predicate. Pure; holds only its configuration.
#[derive(Clone, Debug, Default)]
pub struct AvatarValidator {
    config: ValidatorConfig,
}

impl AvatarValidator {
    /// Create a validator with the default denylists.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a validator with custom denylists.
    pub fn with_config(config: ValidatorConfig) -> Self {
        Self { config }
    }

    /// Checks every rule and reports the first one that fails.
    pub fn check(&self, candidate: &str) -> Result<(), Rejection> {
        let value = candidate.trim();
        if value.is_empty() {
            return Err(Rejection::Empty);
        }

        if !has_http_scheme(value) {
            return Err(Rejection::MissingScheme);
        }

        let lowered = value.to_ascii_lowercase();
        if let Some(marker) = first_marker(&lowered, &self.config.denied_host_markers) {
            return Err(Rejection::PlaceholderHost(marker.to_string()));
        }
        if let Some(marker) = first_marker(&lowered, &self.config.local_asset_markers) {
            return Err(Rejection::LocalAsset(marker.to_string()));
        }

        Ok(())
    }

    pub fn is_valid(&self, candidate: &str) -> bool {
        self.check(candidate).is_ok()
    }

    /// Promotes a raw string to an [`AvatarUrl`] if it passes.
    pub fn accept_str(&self, raw: &str) -> Option<AvatarUrl> {
        match self.check(raw) {
            Ok(()) => Some(AvatarUrl::new_validated(raw.trim().to_string())),
            Err(rejection) => {
                trace!("Rejected avatar candidate '{}': {}", raw, rejection);
                None
            }
        }
    }

    /// Promotes an extracted candidate to an [`AvatarUrl`] if it passes.
    pub fn accept(&self, candidate: &Candidate) -> Option<AvatarUrl> {
        self.accept_str(candidate.as_str())
    }
}

lazy_static! {
    static ref DEFAULT_VALIDATOR: AvatarValidator = AvatarValidator::new();
}

/// Validity predicate with the default denylists.
pub fn is_valid(candidate: &str) -> bool {
    DEFAULT_VALIDATOR.is_valid(candidate)
}

fn has_http_scheme(value: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        value
            .get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}

fn first_marker<'a>(lowered: &str, markers: &'a [String]) -> Option<&'a str> {
    markers
        .iter()
        .map(String::as_str)
        .find(|marker| lowered.contains(&marker.to_ascii_lowercase()))
}
