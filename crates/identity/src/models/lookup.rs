//! Wire shapes of the primary and secondary lookups.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::SecondarySources;
use crate::errors::ResolutionError;

/// Lookup name used in errors and logs for the primary profile request.
pub const PRIMARY_LOOKUP: &str = "user_info";

/// Lookup name used in errors and logs for the secondary multi-source request.
pub const SECONDARY_LOOKUP: &str = "inspect_user";

/// Response of the primary profile lookup.
///
/// Fields the resolver does not use are ignored. A text field holding a
/// non-string value reads as `None` instead of failing the whole profile.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct PrimaryProfile {
    #[serde(default)]
    pub ok: bool,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub avatar: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub firstname: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "deserialize_balance")]
    pub balance: Option<i64>,
}

impl PrimaryProfile {
    /// First non-blank of `name`, `firstname`, `first_name`.
    pub fn display_name(&self) -> Option<&str> {
        [&self.name, &self.firstname, &self.first_name]
            .into_iter()
            .filter_map(|n| n.as_deref())
            .map(str::trim)
            .find(|n| !n.is_empty())
    }
}

/// Accepts strings only; any other JSON value is `None`.
fn deserialize_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

/// Accepts integers, floats and numeric strings; anything else is `None`.
fn deserialize_balance<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }))
}

/// Response of the secondary multi-source lookup.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct SecondaryLookupResponse {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub sources: Option<Map<String, Value>>,
}

impl SecondaryLookupResponse {
    /// Converts into typed sources; `ok: false` is a rejected lookup.
    pub fn into_sources(self) -> Result<SecondarySources, ResolutionError> {
        if !self.ok {
            return Err(ResolutionError::Rejected {
                lookup: SECONDARY_LOOKUP,
            });
        }
        Ok(self
            .sources
            .map(|map| SecondarySources::from_json_map(&map))
            .unwrap_or_default())
    }
}
