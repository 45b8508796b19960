//! Identity resolution models
//!
//! - `types` - Type aliases (IdentityId)
//! - `identity` - The session subject (Identity) and its bootstrap seed
//! - `record` - Schema-less source documents (Record, FieldValue)
//! - `collection` - Secondary collections in priority order (SourceCollection, SecondarySources)
//! - `candidate` - Extracted candidates and validated avatar URLs
//! - `lookup` - Wire shapes of the primary/secondary lookups
//! - `resolution` - Resolution state machine and result

mod candidate;
mod collection;
mod identity;
mod lookup;
mod record;
mod resolution;
mod types;

pub use candidate::{AvatarUrl, Candidate, CandidateKind};
pub use collection::{SecondarySources, SourceCollection, SourceEntry};
pub use identity::{Identity, IdentitySeed};
pub use lookup::{PrimaryProfile, SecondaryLookupResponse, PRIMARY_LOOKUP, SECONDARY_LOOKUP};
pub use record::{FieldValue, Record};
pub use resolution::{ResolutionResult, ResolutionSource, ResolutionState};
pub use types::IdentityId;
