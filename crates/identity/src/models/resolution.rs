use serde::Serialize;

use super::{AvatarUrl, SourceCollection};

/// States of a single resolution call.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionState {
    NotStarted,
    PrimaryChecked,
    SecondarySearching,
    Resolved,
    Unresolved,
}

impl ResolutionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ResolutionState::Resolved | ResolutionState::Unresolved)
    }
}

/// Where a resolved value came from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ResolutionSource {
    /// The primary store already held a valid value.
    Primary,
    /// Found by the secondary search.
    Secondary {
        collection: SourceCollection,
        /// 0-based index of the record in the wire array.
        record_index: usize,
    },
}

/// Terminal outcome of one resolution call.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResolutionResult {
    pub value: Option<AvatarUrl>,
    pub resolved: bool,
    /// A write-back was dispatched for this call.
    pub persisted: bool,
}

impl ResolutionResult {
    pub fn unresolved() -> Self {
        Self {
            value: None,
            resolved: false,
            persisted: false,
        }
    }

    pub fn resolved(value: AvatarUrl, persisted: bool) -> Self {
        Self {
            value: Some(value),
            resolved: true,
            persisted,
        }
    }
}
