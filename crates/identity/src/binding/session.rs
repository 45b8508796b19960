//! Per-session identity state and its binding to resolution outcomes.

use std::sync::Arc;

use log::{debug, warn};

use super::view::{format_balance, name_or_default, ProfileView, DEFAULT_AVATAR};
use crate::models::{Identity, IdentityId, IdentitySeed, PrimaryProfile, ResolutionResult};
use crate::persistence::{PersistHandle, PersistOutcome};
use crate::resolver::{AvatarResolver, ResolutionReport};

/// One client session: owns the [`Identity`] and binds resolution results to it.
///
/// Created once at bootstrap and passed explicitly to every call that needs
/// the identity. Nothing outlives [`end`](Self::end) except detached writes.
pub struct Session {
    identity: Identity,
    resolver: Arc<AvatarResolver>,
    avatar_load_failed: bool,
    last_resolution: Option<ResolutionResult>,
    pending_writes: Vec<PersistHandle>,
}

impl Session {
    /// Builds the session identity from the platform seed.
    ///
    /// A seed avatar is kept only if it passes the resolver's validator.
    pub fn bootstrap(seed: IdentitySeed, resolver: Arc<AvatarResolver>) -> Self {
        let avatar = seed
            .avatar
            .as_deref()
            .and_then(|raw| resolver.validator().accept_str(raw));
        let identity = Identity {
            id: IdentityId::from(seed.id.trim()),
            name: name_or_default([seed.name.as_deref()]),
            avatar,
            balance: 0,
        };
        debug!(
            "Session started for '{}' (seed avatar: {})",
            identity.id,
            identity.avatar.is_some()
        );

        Self {
            identity,
            resolver,
            avatar_load_failed: false,
            last_resolution: None,
            pending_writes: Vec::new(),
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn last_resolution(&self) -> Option<&ResolutionResult> {
        self.last_resolution.as_ref()
    }

    /// Runs one resolution call and binds its outcome.
    pub async fn resolve_avatar(&mut self) -> ResolutionResult {
        let report = self.resolver.resolve(&self.identity.id).await;
        self.bind(report)
    }

    /// Binds a resolution report to the identity.
    ///
    /// Only a resolved value touches `Identity.avatar`; an unresolved outcome
    /// leaves it as is and the view falls back to the placeholder.
    pub fn bind(&mut self, mut report: ResolutionReport) -> ResolutionResult {
        if let Some(handle) = report.persist.take() {
            self.pending_writes.push(handle);
        }

        if let Some(avatar) = report.result.value.clone() {
            self.identity.avatar = Some(avatar);
            self.avatar_load_failed = false;
        }

        self.last_resolution = Some(report.result.clone());
        report.result
    }

    /// Profile initialization: avatar, then name and balance.
    ///
    /// Skips resolution when the identity already holds an avatar; a valid
    /// avatar in the primary store still replaces it. The primary store is
    /// queried at most once per call.
    pub async fn refresh(&mut self) -> ResolutionResult {
        if self.identity.avatar.is_none() {
            let mut report = self.resolver.resolve(&self.identity.id).await;
            let profile = report.primary_profile.take();
            let result = self.bind(report);
            if let Some(profile) = profile {
                self.apply_profile(&profile);
            }
            return result;
        }

        debug!(
            "Identity '{}' already has an avatar, skipping resolution",
            self.identity.id
        );
        if let Some(profile) = self.fetch_profile().await {
            self.apply_profile(&profile);
        }

        let result = match self.identity.avatar.clone() {
            Some(avatar) => ResolutionResult::resolved(avatar, false),
            None => ResolutionResult::unresolved(),
        };
        self.last_resolution = Some(result.clone());
        result
    }

    async fn fetch_profile(&self) -> Option<PrimaryProfile> {
        match self
            .resolver
            .primary_lookup()
            .fetch_primary(&self.identity.id)
            .await
        {
            Ok(profile) if profile.ok => Some(profile),
            Ok(_) => None,
            Err(e) => {
                warn!("Profile refresh for '{}' failed: {}", self.identity.id, e);
                None
            }
        }
    }

    fn apply_profile(&mut self, profile: &PrimaryProfile) {
        let stored = profile
            .avatar
            .as_deref()
            .and_then(|raw| self.resolver.validator().accept_str(raw));
        if let Some(avatar) = stored {
            if self.identity.avatar.as_ref() != Some(&avatar) {
                self.identity.avatar = Some(avatar);
                self.avatar_load_failed = false;
            }
        }
        if let Some(name) = profile.display_name() {
            self.identity.name = name.to_string();
        } else {
            self.identity.name = name_or_default([Some(self.identity.name.as_str())]);
        }
        if let Some(balance) = profile.balance {
            self.identity.balance = balance;
        }
    }

    /// Render-time trigger: the bound avatar failed to load.
    pub fn avatar_load_failed(&mut self) {
        if !self.avatar_load_failed {
            debug!("Avatar for '{}' failed to load", self.identity.id);
        }
        self.avatar_load_failed = true;
    }

    pub fn view(&self) -> ProfileView {
        let avatar = self
            .identity
            .avatar
            .as_ref()
            .filter(|_| !self.avatar_load_failed);

        ProfileView {
            id: self.identity.id.to_string(),
            name: self.identity.name.clone(),
            avatar: avatar
                .map(|a| a.to_string())
                .unwrap_or_else(|| DEFAULT_AVATAR.to_string()),
            avatar_is_placeholder: avatar.is_none(),
            balance: self.identity.balance,
            balance_display: format_balance(self.identity.balance),
        }
    }

    /// Waits for every write dispatched so far.
    pub async fn flush_pending_writes(&mut self) -> Vec<PersistOutcome> {
        let mut outcomes = Vec::with_capacity(self.pending_writes.len());
        for handle in self.pending_writes.drain(..) {
            outcomes.push(handle.wait().await);
        }
        outcomes
    }

    /// Tears the session down. Unflushed writes keep running detached.
    pub fn end(self) {
        debug!(
            "Session for '{}' ended ({} write(s) detached)",
            self.identity.id,
            self.pending_writes.len()
        );
    }
}
