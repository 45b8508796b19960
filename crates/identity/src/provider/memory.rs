//! In-memory profile store.
//!
//! Serves all three lookups from memory, records every call, and can be told
//! to fail any of them. Used by tests and by the CLI's offline fixture mode.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::errors::ResolutionError;
use crate::models::{
    AvatarUrl, IdentityId, PrimaryProfile, SecondarySources, PRIMARY_LOOKUP, SECONDARY_LOOKUP,
};
use crate::resolver::{AvatarWriter, PrimaryLookup, SecondaryLookup};

const FIXTURE: &str = "fixture";

#[derive(Default)]
struct StoreState {
    primary: HashMap<String, PrimaryProfile>,
    sources: HashMap<String, SecondarySources>,
    writes: Vec<(String, String)>,
    primary_calls: usize,
    secondary_calls: usize,
    fail_primary: bool,
    fail_secondary: bool,
    fail_writes: bool,
}

/// Fixture file layout: `{ "users": { "<id>": { "primary": {..}, "sources": {..} } } }`.
#[derive(Deserialize)]
struct FixtureFile {
    #[serde(default)]
    users: HashMap<String, FixtureUser>,
}

#[derive(Deserialize)]
struct FixtureUser {
    #[serde(default)]
    primary: Option<PrimaryProfile>,
    #[serde(default)]
    sources: Option<Map<String, Value>>,
}

/// Profile store backed by process memory.
#[derive(Clone, Default)]
pub struct InMemoryProfileStore {
    state: Arc<Mutex<StoreState>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a store from a JSON fixture document.
    pub fn from_fixture(fixture: &Value) -> Result<Self, ResolutionError> {
        let file = FixtureFile::deserialize(fixture).map_err(|e| ResolutionError::Parse {
            lookup: FIXTURE,
            message: e.to_string(),
        })?;

        let store = Self::new();
        for (id, user) in file.users {
            if let Some(primary) = user.primary {
                store.set_primary(&id, primary);
            }
            if let Some(sources) = user.sources {
                store.set_sources(&id, SecondarySources::from_json_map(&sources));
            }
        }
        Ok(store)
    }

    fn state(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_primary(&self, identity: &str, profile: PrimaryProfile) {
        self.state().primary.insert(identity.to_string(), profile);
    }

    pub fn set_sources(&self, identity: &str, sources: SecondarySources) {
        self.state().sources.insert(identity.to_string(), sources);
    }

    pub fn set_fail_primary(&self, fail: bool) {
        self.state().fail_primary = fail;
    }

    pub fn set_fail_secondary(&self, fail: bool) {
        self.state().fail_secondary = fail;
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.state().fail_writes = fail;
    }

    /// Number of primary lookups served (including failed ones).
    pub fn primary_calls(&self) -> usize {
        self.state().primary_calls
    }

    /// Number of secondary lookups served (including failed ones).
    pub fn secondary_calls(&self) -> usize {
        self.state().secondary_calls
    }

    /// Successful writes as `(identity, avatar)`, oldest first.
    pub fn writes(&self) -> Vec<(String, String)> {
        self.state().writes.clone()
    }

    pub fn primary_profile(&self, identity: &str) -> Option<PrimaryProfile> {
        self.state().primary.get(identity).cloned()
    }
}

#[async_trait]
impl PrimaryLookup for InMemoryProfileStore {
    async fn fetch_primary(
        &self,
        identity: &IdentityId,
    ) -> Result<PrimaryProfile, ResolutionError> {
        let mut state = self.state();
        state.primary_calls += 1;
        if state.fail_primary {
            return Err(ResolutionError::Transport {
                lookup: PRIMARY_LOOKUP,
                message: "primary store unavailable".to_string(),
            });
        }
        Ok(state
            .primary
            .get(identity.as_ref())
            .cloned()
            .unwrap_or_else(|| PrimaryProfile {
                ok: true,
                ..PrimaryProfile::default()
            }))
    }
}

#[async_trait]
impl SecondaryLookup for InMemoryProfileStore {
    async fn fetch_secondary(
        &self,
        identity: &IdentityId,
    ) -> Result<SecondarySources, ResolutionError> {
        let mut state = self.state();
        state.secondary_calls += 1;
        if state.fail_secondary {
            return Err(ResolutionError::Transport {
                lookup: SECONDARY_LOOKUP,
                message: "secondary sources unavailable".to_string(),
            });
        }
        Ok(state
            .sources
            .get(identity.as_ref())
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl AvatarWriter for InMemoryProfileStore {
    async fn persist_avatar(
        &self,
        identity: &IdentityId,
        avatar: &AvatarUrl,
    ) -> Result<(), ResolutionError> {
        let mut state = self.state();
        if state.fail_writes {
            return Err(ResolutionError::Persistence {
                message: "write rejected by store".to_string(),
            });
        }

        let profile = state
            .primary
            .entry(identity.to_string())
            .or_insert_with(|| PrimaryProfile {
                ok: true,
                ..PrimaryProfile::default()
            });
        profile.avatar = Some(avatar.to_string());

        state
            .writes
            .push((identity.to_string(), avatar.to_string()));
        Ok(())
    }
}
