//! Lookup seams used by the resolver.
//!
//! Each external interface is its own trait so a deployment can mix sources
//! (e.g. an HTTP primary store with a locally cached secondary snapshot).

use async_trait::async_trait;

use crate::errors::ResolutionError;
use crate::models::{AvatarUrl, IdentityId, PrimaryProfile, SecondarySources};

/// Canonical profile store, keyed by identity.
#[async_trait]
pub trait PrimaryLookup: Send + Sync {
    /// Fetch the stored profile.
    ///
    /// A response with `ok: false` may be returned as-is or as
    /// [`ResolutionError::Rejected`]; the resolver treats both as a miss.
    async fn fetch_primary(&self, identity: &IdentityId)
        -> Result<PrimaryProfile, ResolutionError>;
}

/// Multi-collection lookup consulted when the primary store has no value.
#[async_trait]
pub trait SecondaryLookup: Send + Sync {
    /// Fetch every known collection's records for the identity.
    async fn fetch_secondary(
        &self,
        identity: &IdentityId,
    ) -> Result<SecondarySources, ResolutionError>;
}

/// Write-back into the canonical profile store.
#[async_trait]
pub trait AvatarWriter: Send + Sync {
    /// Store `avatar` as the identity's canonical avatar.
    ///
    /// Called at most once per resolution and never retried.
    async fn persist_avatar(
        &self,
        identity: &IdentityId,
        avatar: &AvatarUrl,
    ) -> Result<(), ResolutionError>;
}
