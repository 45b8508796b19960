//! Secondary source collections and their fixed priority order.

use std::collections::BTreeMap;
use std::fmt;

use log::debug;
use serde_json::{Map, Value};

use super::Record;
use crate::errors::ResolutionError;

/// The known secondary collections.
///
/// Declaration order is priority order: `Ord` follows it, so any ordered
/// container keyed by this enum iterates highest priority first.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum SourceCollection {
    /// Mini-app registry (`registered_users`).
    RegisteredUsers,
    /// Global profile store (`global_user_profiles_coll`).
    GlobalUserProfiles,
    /// Waifu-catcher per-category user store (`waifu_users_coll`).
    WaifuUsers,
    /// Husband-catcher per-category user store (`husband_users_coll`).
    HusbandUsers,
    /// Leaderboard snapshot (`top_global_coll`).
    TopGlobal,
}

impl SourceCollection {
    /// All collections, highest priority first.
    pub const PRIORITY: [SourceCollection; 5] = [
        SourceCollection::RegisteredUsers,
        SourceCollection::GlobalUserProfiles,
        SourceCollection::WaifuUsers,
        SourceCollection::HusbandUsers,
        SourceCollection::TopGlobal,
    ];

    /// Wire key used by the secondary lookup.
    pub fn key(&self) -> &'static str {
        match self {
            SourceCollection::RegisteredUsers => "registered_users",
            SourceCollection::GlobalUserProfiles => "global_user_profiles_coll",
            SourceCollection::WaifuUsers => "waifu_users_coll",
            SourceCollection::HusbandUsers => "husband_users_coll",
            SourceCollection::TopGlobal => "top_global_coll",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::PRIORITY.into_iter().find(|c| c.key() == key)
    }

    /// 1-based priority rank.
    pub fn rank(&self) -> usize {
        *self as usize + 1
    }
}

impl fmt::Display for SourceCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Contents of one collection: a single record or an ordered list of them.
///
/// List records keep their position in the wire array, so indexes stay
/// stable when non-object elements are dropped.
#[derive(Clone, Debug, PartialEq)]
pub enum SourceEntry {
    Single(Record),
    Many(Vec<(usize, Record)>),
}

impl SourceEntry {
    /// Records in scan order, paired with their wire index.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Record)> + '_ {
        let (single, many) = match self {
            SourceEntry::Single(record) => (Some((0, record)), &[][..]),
            SourceEntry::Many(records) => (None, records.as_slice()),
        };
        single
            .into_iter()
            .chain(many.iter().map(|(index, record)| (*index, record)))
    }

    /// Number of records that will be scanned.
    pub fn len(&self) -> usize {
        match self {
            SourceEntry::Single(_) => 1,
            SourceEntry::Many(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Converts a wire value. Non-object array elements are dropped.
    pub fn from_json(collection: SourceCollection, value: &Value) -> Result<Self, ResolutionError> {
        match value {
            Value::Object(map) => Ok(SourceEntry::Single(Record::from_json_object(map))),
            Value::Array(items) => {
                let records = items
                    .iter()
                    .enumerate()
                    .filter_map(|(index, item)| match Record::from_json(item) {
                        Some(record) => Some((index, record)),
                        None => {
                            debug!("Skipping non-object entry #{} in '{}'", index, collection);
                            None
                        }
                    })
                    .collect();
                Ok(SourceEntry::Many(records))
            }
            other => Err(ResolutionError::MalformedRecord {
                collection: collection.key().to_string(),
                message: format!("expected object or array, got {}", json_kind(other)),
            }),
        }
    }
}

impl From<Record> for SourceEntry {
    fn from(record: Record) -> Self {
        SourceEntry::Single(record)
    }
}

impl From<Vec<Record>> for SourceEntry {
    fn from(records: Vec<Record>) -> Self {
        SourceEntry::Many(records.into_iter().enumerate().collect())
    }
}

/// Result of the secondary lookup, keyed by known collection.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SecondarySources {
    entries: BTreeMap<SourceCollection, SourceEntry>,
}

impl SecondarySources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, collection: SourceCollection, entry: impl Into<SourceEntry>) -> Self {
        self.insert(collection, entry);
        self
    }

    pub fn insert(&mut self, collection: SourceCollection, entry: impl Into<SourceEntry>) {
        self.entries.insert(collection, entry.into());
    }

    pub fn get(&self, collection: SourceCollection) -> Option<&SourceEntry> {
        self.entries.get(&collection)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Present collections, highest priority first.
    pub fn in_priority_order(&self) -> impl Iterator<Item = (SourceCollection, &SourceEntry)> {
        self.entries.iter().map(|(collection, entry)| (*collection, entry))
    }

    /// Converts the wire `sources` object.
    ///
    /// Unknown collection names and malformed collection values are logged and
    /// dropped; they never fail the whole lookup.
    pub fn from_json_map(map: &Map<String, Value>) -> Self {
        let mut sources = Self::new();
        for (key, value) in map {
            let Some(collection) = SourceCollection::from_key(key) else {
                debug!("Ignoring unknown source collection '{}'", key);
                continue;
            };
            if value.is_null() {
                continue;
            }
            match SourceEntry::from_json(collection, value) {
                Ok(entry) => sources.insert(collection, entry),
                Err(e) => debug!("Skipping collection: {}", e),
            }
        }
        sources
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
