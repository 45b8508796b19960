use num_format::{Locale, ToFormattedString};
use serde::Serialize;

/// Placeholder shown when no avatar resolved or the resolved one failed to load.
pub const DEFAULT_AVATAR: &str = "/static/default.png";

/// Display name used when no source provides one.
pub const DEFAULT_NAME: &str = "Traveler";

/// Presentation-ready snapshot of a session's identity.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProfileView {
    pub id: String,
    pub name: String,
    pub avatar: String,
    pub avatar_is_placeholder: bool,
    pub balance: i64,
    pub balance_display: String,
}

/// Groups thousands with the en locale, e.g. `1234567` -> `1,234,567`.
pub fn format_balance(balance: i64) -> String {
    balance.to_formatted_string(&Locale::en)
}

/// First non-blank name, or [`DEFAULT_NAME`].
pub(crate) fn name_or_default<'a>(candidates: impl IntoIterator<Item = Option<&'a str>>) -> String {
    candidates
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|n| !n.is_empty())
        .unwrap_or(DEFAULT_NAME)
        .to_string()
}
