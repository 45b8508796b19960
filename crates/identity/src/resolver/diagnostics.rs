//! Search diagnostics for a single resolution call.

use crate::models::{ResolutionState, SourceCollection};

/// Outcome of the primary or secondary lookup request itself.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LookupOutcome {
    /// The lookup answered with a usable payload.
    Answered,
    /// The lookup failed and was degraded to a miss.
    Failed(String),
}

/// Outcome of scanning one collection.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CollectionOutcome {
    /// The collection was not part of the response.
    Absent,
    /// Every record was scanned without a hit.
    Miss,
    /// A record produced a valid avatar.
    Hit { record_index: usize },
}

/// Record of one collection visited during the secondary search.
#[derive(Clone, Debug)]
pub struct CollectionAttempt {
    pub collection: SourceCollection,
    pub records_scanned: usize,
    pub outcome: CollectionOutcome,
}

/// Everything the resolver did during one call, in order.
#[derive(Clone, Debug)]
pub struct SearchDiagnostics {
    pub states: Vec<ResolutionState>,
    pub primary: Option<LookupOutcome>,
    pub secondary: Option<LookupOutcome>,
    pub attempts: Vec<CollectionAttempt>,
}

impl SearchDiagnostics {
    pub fn new() -> Self {
        Self {
            states: vec![ResolutionState::NotStarted],
            primary: None,
            secondary: None,
            attempts: Vec::new(),
        }
    }

    pub fn transition(&mut self, state: ResolutionState) {
        self.states.push(state);
    }

    /// The latest state reached.
    pub fn state(&self) -> ResolutionState {
        self.states
            .last()
            .copied()
            .unwrap_or(ResolutionState::NotStarted)
    }

    pub fn record_absent(&mut self, collection: SourceCollection) {
        self.attempts.push(CollectionAttempt {
            collection,
            records_scanned: 0,
            outcome: CollectionOutcome::Absent,
        });
    }

    pub fn record_miss(&mut self, collection: SourceCollection, records_scanned: usize) {
        self.attempts.push(CollectionAttempt {
            collection,
            records_scanned,
            outcome: CollectionOutcome::Miss,
        });
    }

    /// `record_index` is the wire index; it can exceed `records_scanned - 1`
    /// when non-object elements were dropped.
    pub fn record_hit(
        &mut self,
        collection: SourceCollection,
        record_index: usize,
        records_scanned: usize,
    ) {
        self.attempts.push(CollectionAttempt {
            collection,
            records_scanned,
            outcome: CollectionOutcome::Hit { record_index },
        });
    }

    /// Whether a secondary lookup request was issued.
    pub fn secondary_queried(&self) -> bool {
        self.secondary.is_some()
    }

    /// Total number of records handed to the scanner.
    pub fn records_scanned(&self) -> usize {
        self.attempts.iter().map(|a| a.records_scanned).sum()
    }

    /// Collections whose records were actually scanned, in visit order.
    pub fn scanned_collections(&self) -> Vec<SourceCollection> {
        self.attempts
            .iter()
            .filter(|a| a.records_scanned > 0)
            .map(|a| a.collection)
            .collect()
    }

    /// Summary for logging/debugging.
    pub fn summary(&self) -> String {
        self.attempts
            .iter()
            .map(|a| match &a.outcome {
                CollectionOutcome::Absent => format!("{}: ABSENT", a.collection),
                CollectionOutcome::Miss => {
                    format!("{}: MISS ({} scanned)", a.collection, a.records_scanned)
                }
                CollectionOutcome::Hit { record_index } => {
                    format!("{}: HIT (#{})", a.collection, record_index)
                }
            })
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

impl Default for SearchDiagnostics {
    fn default() -> Self {
        Self::new()
    }
}
