//! Source aggregator: primary lookup, then prioritized secondary search.

use std::sync::Arc;

use log::{debug, info, warn};

use super::diagnostics::{LookupOutcome, SearchDiagnostics};
use super::traits::{AvatarWriter, PrimaryLookup, SecondaryLookup};
use crate::extract::DocumentScanner;
use crate::models::{
    AvatarUrl, IdentityId, PrimaryProfile, ResolutionResult, ResolutionSource, ResolutionState,
    SecondarySources, SourceCollection,
};
use crate::persistence::{PersistHandle, PersistOutcome, PersistenceWriter};
use crate::validator::{AvatarValidator, ValidatorConfig};

/// Resolver configuration.
#[derive(Clone, Debug)]
pub struct ResolverConfig {
    /// Write avatars found by the secondary search back to the primary store.
    pub persist_discovered: bool,
    /// Validity predicate denylists.
    pub validator: ValidatorConfig,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            persist_discovered: true,
            validator: ValidatorConfig::default(),
        }
    }
}

/// Everything one resolution call produced.
#[derive(Debug)]
pub struct ResolutionReport {
    pub identity: IdentityId,
    pub result: ResolutionResult,
    pub source: Option<ResolutionSource>,
    /// Primary profile, when the primary lookup answered.
    pub primary_profile: Option<PrimaryProfile>,
    pub diagnostics: SearchDiagnostics,
    /// Write-back dispatched by this call, if any.
    pub persist: Option<PersistHandle>,
}

impl ResolutionReport {
    pub fn state(&self) -> ResolutionState {
        self.diagnostics.state()
    }

    /// Waits for the dispatched write, if there is one.
    pub async fn wait_for_persistence(&mut self) -> Option<PersistOutcome> {
        match self.persist.take() {
            Some(handle) => Some(handle.wait().await),
            None => None,
        }
    }
}

/// Resolves an identity's avatar across the primary store and secondary sources.
///
/// # Flow
///
/// 1. Query the primary store; a valid avatar there ends the call (nothing persisted)
/// 2. Otherwise query the secondary lookup
/// 3. Scan collections in [`SourceCollection::PRIORITY`] order, records in order
/// 4. Stop at the first valid avatar and dispatch one write-back
/// 5. Exhausting every record ends in `Unresolved`
///
/// Lookup failures never escape: they are logged and the stage counts as a miss.
pub struct AvatarResolver {
    primary: Arc<dyn PrimaryLookup>,
    secondary: Arc<dyn SecondaryLookup>,
    writer: PersistenceWriter,
    validator: Arc<AvatarValidator>,
    scanner: DocumentScanner,
    config: ResolverConfig,
}

impl AvatarResolver {
    /// Create a resolver with the default configuration.
    pub fn new(
        primary: Arc<dyn PrimaryLookup>,
        secondary: Arc<dyn SecondaryLookup>,
        writer: Arc<dyn AvatarWriter>,
    ) -> Self {
        Self::with_config(primary, secondary, writer, ResolverConfig::default())
    }

    /// Create a resolver with custom configuration.
    pub fn with_config(
        primary: Arc<dyn PrimaryLookup>,
        secondary: Arc<dyn SecondaryLookup>,
        writer: Arc<dyn AvatarWriter>,
        config: ResolverConfig,
    ) -> Self {
        let validator = Arc::new(AvatarValidator::with_config(config.validator.clone()));
        Self {
            primary,
            secondary,
            writer: PersistenceWriter::new(writer),
            scanner: DocumentScanner::new(Arc::clone(&validator)),
            validator,
            config,
        }
    }

    pub fn validator(&self) -> &AvatarValidator {
        &self.validator
    }

    pub fn primary_lookup(&self) -> &Arc<dyn PrimaryLookup> {
        &self.primary
    }

    pub fn writer(&self) -> &PersistenceWriter {
        &self.writer
    }

    /// Runs one resolution call to a terminal state.
    pub async fn resolve(&self, identity: &IdentityId) -> ResolutionReport {
        let mut diagnostics = SearchDiagnostics::new();

        let primary_profile = match self.primary.fetch_primary(identity).await {
            Ok(profile) if profile.ok => {
                diagnostics.primary = Some(LookupOutcome::Answered);
                Some(profile)
            }
            Ok(_) => {
                warn!("Primary lookup for '{}' answered ok=false", identity);
                diagnostics.primary = Some(LookupOutcome::Failed("ok=false".to_string()));
                None
            }
            Err(e) => {
                warn!(
                    "Primary lookup for '{}' failed ({:?}): {}",
                    identity,
                    e.failure_class(),
                    e
                );
                diagnostics.primary = Some(LookupOutcome::Failed(e.to_string()));
                None
            }
        };
        diagnostics.transition(ResolutionState::PrimaryChecked);

        if let Some(avatar) = primary_profile
            .as_ref()
            .and_then(|p| p.avatar.as_deref())
            .and_then(|raw| self.validator.accept_str(raw))
        {
            debug!("Primary store already holds an avatar for '{}'", identity);
            diagnostics.transition(ResolutionState::Resolved);
            return ResolutionReport {
                identity: identity.clone(),
                result: ResolutionResult::resolved(avatar, false),
                source: Some(ResolutionSource::Primary),
                primary_profile,
                diagnostics,
                persist: None,
            };
        }

        diagnostics.transition(ResolutionState::SecondarySearching);
        let sources = match self.secondary.fetch_secondary(identity).await {
            Ok(sources) => {
                diagnostics.secondary = Some(LookupOutcome::Answered);
                Some(sources)
            }
            Err(e) => {
                warn!(
                    "Secondary lookup for '{}' failed ({:?}): {}",
                    identity,
                    e.failure_class(),
                    e
                );
                diagnostics.secondary = Some(LookupOutcome::Failed(e.to_string()));
                None
            }
        };

        let found = sources
            .as_ref()
            .and_then(|sources| self.search(sources, &mut diagnostics));

        let Some((avatar, collection, record_index)) = found else {
            diagnostics.transition(ResolutionState::Unresolved);
            info!(
                "No avatar found for '{}' [{}]",
                identity,
                diagnostics.summary()
            );
            return ResolutionReport {
                identity: identity.clone(),
                result: ResolutionResult::unresolved(),
                source: None,
                primary_profile,
                diagnostics,
                persist: None,
            };
        };

        diagnostics.transition(ResolutionState::Resolved);
        info!(
            "Resolved avatar for '{}' from {} record #{}",
            identity, collection, record_index
        );

        let persist = self
            .config
            .persist_discovered
            .then(|| self.writer.dispatch(identity.clone(), avatar.clone()));

        ResolutionReport {
            identity: identity.clone(),
            result: ResolutionResult::resolved(avatar, persist.is_some()),
            source: Some(ResolutionSource::Secondary {
                collection,
                record_index,
            }),
            primary_profile,
            diagnostics,
            persist,
        }
    }

    /// Scans collections by priority, records in order; first hit wins.
    fn search(
        &self,
        sources: &SecondarySources,
        diagnostics: &mut SearchDiagnostics,
    ) -> Option<(AvatarUrl, SourceCollection, usize)> {
        for collection in SourceCollection::PRIORITY {
            let Some(entry) = sources.get(collection) else {
                diagnostics.record_absent(collection);
                continue;
            };

            for (scanned, (index, record)) in entry.iter().enumerate() {
                if let Some(avatar) = self.scanner.scan(record) {
                    diagnostics.record_hit(collection, index, scanned + 1);
                    return Some((avatar, collection, index));
                }
            }

            debug!(
                "No avatar in '{}' ({} record(s) scanned)",
                collection,
                entry.len()
            );
            diagnostics.record_miss(collection, entry.len());
        }

        None
    }
}
