//! Charms Identity Crate
//!
//! Resolves a user's profile picture across several independent data sources
//! and binds the outcome to client session state.
//!
//! # Overview
//!
//! - A primary profile store, checked first
//! - Five secondary collections, searched in a fixed priority order
//! - Schema-less records scanned by a known field-name list
//! - Platform tokens expanded into userpic URLs
//! - Discovered avatars written back to the primary store, fire-and-forget
//!
//! # Architecture
//!
//! ```text
//! +------------------+
//! |     Session      |  (binding: identity, view, placeholder)
//! +------------------+
//!          |
//!          v
//! +------------------+     +------------------+
//! |  AvatarResolver  | --> |  PrimaryLookup   |  (user_info)
//! +------------------+     +------------------+
//!          |  miss
//!          v
//! +------------------+     +------------------+
//! | SecondaryLookup  | --> | DocumentScanner  |  (per record, by priority)
//! +------------------+     +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          | extract + valid. |  (Candidate -> AvatarUrl)
//!                          +------------------+
//!                                  |  hit
//!                                  v
//!                          +------------------+
//!                          | PersistenceWriter|  (detached write-back)
//!                          +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`Record`] - Ordered field map of one source document
//! - [`SourceCollection`] - Closed set of secondary collections, in priority order
//! - [`Candidate`] - Raw extracted value, not yet validated
//! - [`AvatarUrl`] - A value that passed the validity predicate
//! - [`ResolutionResult`] - Terminal outcome of one resolution call

pub mod binding;
pub mod errors;
pub mod extract;
pub mod models;
pub mod persistence;
pub mod provider;
pub mod resolver;
pub mod validator;

// Re-export all public types from models
pub use models::{
    AvatarUrl, Candidate, CandidateKind, FieldValue, Identity, IdentityId, IdentitySeed,
    PrimaryProfile, Record, ResolutionResult, ResolutionSource, ResolutionState,
    SecondarySources, SourceCollection, SourceEntry,
};

// Re-export resolver types
pub use resolver::{
    AvatarResolver, AvatarWriter, PrimaryLookup, ResolutionReport, ResolverConfig,
    SearchDiagnostics, SecondaryLookup,
};

// Re-export binding types
pub use binding::{
    bind_leaderboard, format_balance, LeaderboardRow, ProfileView, Session, DEFAULT_AVATAR,
    DEFAULT_NAME,
};

pub use errors::{FailureClass, ResolutionError};
pub use extract::DocumentScanner;
pub use persistence::{PersistHandle, PersistOutcome, PersistenceWriter};
pub use provider::{HttpProfileApi, InMemoryProfileStore};
pub use validator::{AvatarValidator, Rejection, ValidatorConfig};
