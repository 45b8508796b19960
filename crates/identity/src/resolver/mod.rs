//! Avatar resolution across the primary store and secondary collections.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                     AvatarResolver                        │
//! │                                                           │
//! │  1. PrimaryLookup ── valid avatar? ──────────► Resolved   │
//! │          │ miss / failure                  (not persisted)│
//! │          ▼                                                │
//! │  2. SecondaryLookup                                       │
//! │          │                                                │
//! │          ▼                                                │
//! │  3. for collection in PRIORITY:                           │
//! │        for record in collection:                          │
//! │           DocumentScanner ── hit? ───► Resolved           │
//! │                                     + PersistenceWriter   │
//! │          │ exhausted                                      │
//! │          ▼                                                │
//! │      Unresolved                                           │
//! └──────────────────────────────────────────────────────────┘
//! ```

mod aggregator;
mod diagnostics;
mod traits;

#[cfg(test)]
mod resolver_tests;

pub use aggregator::{AvatarResolver, ResolutionReport, ResolverConfig};
pub use diagnostics::{CollectionAttempt, CollectionOutcome, LookupOutcome, SearchDiagnostics};
pub use traits::{AvatarWriter, PrimaryLookup, SecondaryLookup};
