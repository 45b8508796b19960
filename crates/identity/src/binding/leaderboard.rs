//! Leaderboard rows ready for presentation.

use serde::Serialize;
use serde_json::{Map, Value};

use super::view::{format_balance, name_or_default, DEFAULT_AVATAR};
use crate::validator;

const SCORE_FIELDS: &[&str] = &["charms", "score", "count"];

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LeaderboardRow {
    /// 1-based position on the board.
    pub rank: usize,
    pub name: String,
    pub username: Option<String>,
    pub avatar: String,
    pub avatar_is_placeholder: bool,
    pub score: i64,
    pub score_display: String,
    pub score_label: &'static str,
}

impl LeaderboardRow {
    /// Builds a row from one leaderboard record. Non-object values yield `None`.
    pub fn from_json(rank: usize, value: &Value) -> Option<Self> {
        let record = value.as_object()?;

        let avatar = text(record, "avatar")
            .map(str::trim)
            .filter(|a| !a.is_empty() && *a != "null" && validator::is_valid(a));
        let score = SCORE_FIELDS
            .iter()
            .find_map(|field| record.get(*field).and_then(as_score))
            .unwrap_or(0);
        let score_label = if record.contains_key("charms") {
            "Charms"
        } else {
            "Collection"
        };

        Some(Self {
            rank,
            name: name_or_default([
                text(record, "name"),
                text(record, "firstname"),
                text(record, "first_name"),
            ]),
            username: text(record, "username")
                .map(|u| u.trim().trim_start_matches('@'))
                .filter(|u| !u.is_empty())
                .map(String::from),
            avatar: avatar.unwrap_or(DEFAULT_AVATAR).to_string(),
            avatar_is_placeholder: avatar.is_none(),
            score,
            score_display: format_balance(score),
            score_label,
        })
    }
}

/// Binds a leaderboard in order. Ranks count only the object entries.
pub fn bind_leaderboard(entries: &[Value]) -> Vec<LeaderboardRow> {
    entries
        .iter()
        .filter(|v| v.is_object())
        .enumerate()
        .filter_map(|(index, value)| LeaderboardRow::from_json(index + 1, value))
        .collect()
}

fn text<'a>(record: &'a Map<String, Value>, field: &str) -> Option<&'a str> {
    record.get(field).and_then(Value::as_str)
}

fn as_score(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
