//! Tests for AvatarResolver behaviour across the primary store and secondary sources.
//!
//! # Contract Points
//!
//! 1. A valid primary avatar ends the call without a secondary lookup or a write
//! 2. Collections are searched by priority and the search stops at the first hit
//! 3. Exactly one write is dispatched per secondary hit, none otherwise
//! 4. Lookup failures degrade to a miss and never escape

#[cfg(test)]
mod tests {
    use crate::errors::ResolutionError;
    use crate::models::{
        IdentityId, PrimaryProfile, Record, ResolutionSource, ResolutionState, SecondarySources,
        SourceCollection, SourceEntry,
    };
    use crate::persistence::PersistOutcome;
    use crate::provider::InMemoryProfileStore;
    use crate::resolver::{
        AvatarResolver, CollectionOutcome, LookupOutcome, PrimaryLookup, ResolverConfig,
    };
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    // =========================================================================
    // Mock primary lookup answering ok=false
    // =========================================================================

    #[derive(Clone, Default)]
    struct RejectingPrimary {
        calls: Arc<Mutex<usize>>,
    }

    #[async_trait]
    impl PrimaryLookup for RejectingPrimary {
        async fn fetch_primary(
            &self,
            _identity: &IdentityId,
        ) -> Result<PrimaryProfile, ResolutionError> {
            *self.calls.lock().unwrap() += 1;
            Ok(PrimaryProfile {
                ok: false,
                avatar: Some("https://cdn.example/ignored.png".to_string()),
                ..Default::default()
            })
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn resolver(store: &InMemoryProfileStore) -> AvatarResolver {
        let store = Arc::new(store.clone());
        AvatarResolver::new(store.clone(), store.clone(), store)
    }

    fn empty_profile() -> PrimaryProfile {
        PrimaryProfile {
            ok: true,
            ..Default::default()
        }
    }

    fn id(value: &str) -> IdentityId {
        IdentityId::from(value)
    }

    // =========================================================================
    // Scenarios
    // =========================================================================

    #[tokio::test]
    async fn test_secondary_hit_is_resolved_and_persisted_once() {
        let store = InMemoryProfileStore::new();
        store.set_primary("1", empty_profile());
        store.set_sources(
            "1",
            SecondarySources::new().with(
                SourceCollection::GlobalUserProfiles,
                Record::new().with("photo_url", "https://cdn.example/x.jpg"),
            ),
        );

        let mut report = resolver(&store).resolve(&id("1")).await;

        assert_eq!(report.state(), ResolutionState::Resolved);
        assert!(report.result.resolved);
        assert!(report.result.persisted);
        assert_eq!(
            report.result.value.as_ref().map(|v| v.as_str()),
            Some("https://cdn.example/x.jpg")
        );
        assert_eq!(
            report.source,
            Some(ResolutionSource::Secondary {
                collection: SourceCollection::GlobalUserProfiles,
                record_index: 0,
            })
        );

        assert_eq!(
            report.wait_for_persistence().await,
            Some(PersistOutcome::Written)
        );
        assert_eq!(
            store.writes(),
            vec![("1".to_string(), "https://cdn.example/x.jpg".to_string())]
        );
    }

    #[tokio::test]
    async fn test_platform_token_is_synthesized() {
        let store = InMemoryProfileStore::new();
        store.set_sources(
            "2",
            SecondarySources::new().with(
                SourceCollection::WaifuUsers,
                Record::new().with("tg_photo", "AbCdEfGh1234567890AbCdEf"),
            ),
        );

        let report = resolver(&store).resolve(&id("2")).await;

        assert_eq!(
            report.result.value.as_ref().map(|v| v.as_str()),
            Some("https://t.me/i/userpic/320/AbCdEfGh1234567890AbCdEf")
        );
    }

    #[tokio::test]
    async fn test_empty_sources_are_unresolved() {
        let store = InMemoryProfileStore::new();
        store.set_sources(
            "3",
            SecondarySources::new()
                .with(SourceCollection::RegisteredUsers, Vec::<Record>::new())
                .with(SourceCollection::TopGlobal, Record::new()),
        );

        let report = resolver(&store).resolve(&id("3")).await;

        assert_eq!(report.state(), ResolutionState::Unresolved);
        assert!(!report.result.resolved);
        assert!(!report.result.persisted);
        assert!(report.result.value.is_none());
        assert!(report.persist.is_none());
        assert!(store.writes().is_empty());
        assert_eq!(
            report.diagnostics.states,
            vec![
                ResolutionState::NotStarted,
                ResolutionState::PrimaryChecked,
                ResolutionState::SecondarySearching,
                ResolutionState::Unresolved,
            ]
        );
    }

    #[tokio::test]
    async fn test_placeholder_is_skipped_and_search_continues() {
        let store = InMemoryProfileStore::new();
        store.set_primary(
            "4",
            PrimaryProfile {
                ok: true,
                avatar: Some("https://picsum.photos/200".to_string()),
                ..Default::default()
            },
        );
        store.set_sources(
            "4",
            SecondarySources::new()
                .with(
                    SourceCollection::RegisteredUsers,
                    Record::new().with("avatar", "https://picsum.photos/seed/1/200"),
                )
                .with(
                    SourceCollection::HusbandUsers,
                    Record::new().with("picture", "https://cdn.example/h.png"),
                ),
        );

        let report = resolver(&store).resolve(&id("4")).await;

        assert_eq!(
            report.result.value.as_ref().map(|v| v.as_str()),
            Some("https://cdn.example/h.png")
        );
        assert_eq!(
            report.diagnostics.attempts[0].outcome,
            CollectionOutcome::Miss
        );
    }

    // =========================================================================
    // Priority and short-circuit
    // =========================================================================

    #[tokio::test]
    async fn test_higher_priority_collection_wins() {
        let store = InMemoryProfileStore::new();
        store.set_sources(
            "5",
            SecondarySources::new()
                .with(
                    SourceCollection::TopGlobal,
                    Record::new().with("avatar", "https://cdn.example/top.png"),
                )
                .with(
                    SourceCollection::WaifuUsers,
                    Record::new().with("avatar", "https://cdn.example/waifu.png"),
                ),
        );

        let report = resolver(&store).resolve(&id("5")).await;

        assert_eq!(
            report.result.value.as_ref().map(|v| v.as_str()),
            Some("https://cdn.example/waifu.png")
        );
        assert_eq!(
            report.diagnostics.scanned_collections(),
            vec![SourceCollection::WaifuUsers]
        );
    }

    #[tokio::test]
    async fn test_search_stops_at_first_hit() {
        let store = InMemoryProfileStore::new();
        store.set_sources(
            "6",
            SecondarySources::new()
                .with(
                    SourceCollection::GlobalUserProfiles,
                    vec![
                        Record::new().with("name", "no avatar here"),
                        Record::new().with("image", "https://cdn.example/second.png"),
                        Record::new().with("image", "https://cdn.example/third.png"),
                    ],
                )
                .with(
                    SourceCollection::TopGlobal,
                    Record::new().with("avatar", "https://cdn.example/never.png"),
                ),
        );

        let report = resolver(&store).resolve(&id("6")).await;

        assert_eq!(
            report.result.value.as_ref().map(|v| v.as_str()),
            Some("https://cdn.example/second.png")
        );
        assert_eq!(
            report.source,
            Some(ResolutionSource::Secondary {
                collection: SourceCollection::GlobalUserProfiles,
                record_index: 1,
            })
        );
        assert_eq!(report.diagnostics.records_scanned(), 2);
        assert!(!report
            .diagnostics
            .scanned_collections()
            .contains(&SourceCollection::TopGlobal));
    }

    #[tokio::test]
    async fn test_array_entries_keep_their_order() {
        let store = InMemoryProfileStore::new();
        let entry = SourceEntry::from(vec![
            Record::new().with("img", "https://cdn.example/first.png"),
            Record::new().with("img", "https://cdn.example/second.png"),
        ]);
        store.set_sources(
            "7",
            SecondarySources::new().with(SourceCollection::RegisteredUsers, entry),
        );

        let report = resolver(&store).resolve(&id("7")).await;

        assert_eq!(
            report.result.value.as_ref().map(|v| v.as_str()),
            Some("https://cdn.example/first.png")
        );
    }

    #[tokio::test]
    async fn test_record_index_is_wire_position() {
        let wire = serde_json::json!({
            "waifu_users_coll": [
                "stray",
                { "name": "no avatar" },
                42,
                { "photo": "https://cdn.example/wire.png" }
            ]
        });
        let store = InMemoryProfileStore::new();
        store.set_sources(
            "7w",
            SecondarySources::from_json_map(wire.as_object().unwrap()),
        );

        let report = resolver(&store).resolve(&id("7w")).await;

        assert_eq!(
            report.source,
            Some(ResolutionSource::Secondary {
                collection: SourceCollection::WaifuUsers,
                record_index: 3,
            })
        );
        assert_eq!(report.diagnostics.records_scanned(), 2);
        assert!(report.diagnostics.summary().contains("HIT (#3)"));
    }

    // =========================================================================
    // Idempotence
    // =========================================================================

    #[tokio::test]
    async fn test_primary_hit_skips_secondary_and_write() {
        let store = InMemoryProfileStore::new();
        store.set_primary(
            "8",
            PrimaryProfile {
                ok: true,
                avatar: Some("https://cdn.example/stored.png".to_string()),
                ..Default::default()
            },
        );

        let report = resolver(&store).resolve(&id("8")).await;

        assert_eq!(report.source, Some(ResolutionSource::Primary));
        assert!(report.result.resolved);
        assert!(!report.result.persisted);
        assert!(!report.diagnostics.secondary_queried());
        assert_eq!(store.secondary_calls(), 0);
        assert!(store.writes().is_empty());
    }

    #[tokio::test]
    async fn test_loosely_typed_profile_keeps_stored_avatar() {
        let fixture = serde_json::json!({
            "users": {
                "8b": {
                    "primary": {
                        "ok": true,
                        "avatar": "https://cdn.example/stored.png",
                        "name": "Rem",
                        "username": 12345,
                        "balance": 10
                    },
                    "sources": {
                        "registered_users": { "avatar": "https://cdn.example/other.png" }
                    }
                }
            }
        });
        let store = InMemoryProfileStore::from_fixture(&fixture).unwrap();

        let report = resolver(&store).resolve(&id("8b")).await;

        assert_eq!(report.source, Some(ResolutionSource::Primary));
        assert_eq!(
            report.result.value.as_ref().map(|v| v.as_str()),
            Some("https://cdn.example/stored.png")
        );
        assert!(!report.result.persisted);
        assert_eq!(store.secondary_calls(), 0);
        assert!(store.writes().is_empty());
    }

    #[tokio::test]
    async fn test_second_resolution_reads_persisted_value() {
        let store = InMemoryProfileStore::new();
        store.set_sources(
            "9",
            SecondarySources::new().with(
                SourceCollection::TopGlobal,
                Record::new().with("userpic", "https://cdn.example/9.png"),
            ),
        );
        let resolver = resolver(&store);

        let mut first = resolver.resolve(&id("9")).await;
        first.wait_for_persistence().await;

        let second = resolver.resolve(&id("9")).await;

        assert_eq!(second.source, Some(ResolutionSource::Primary));
        assert_eq!(second.result.value, first.result.value);
        assert!(!second.result.persisted);
        assert_eq!(store.secondary_calls(), 1);
        assert_eq!(store.writes().len(), 1);
        assert_eq!(resolver.writer().dispatched(), 1);
    }

    // =========================================================================
    // Degraded lookups
    // =========================================================================

    #[tokio::test]
    async fn test_primary_failure_degrades_to_miss() {
        let store = InMemoryProfileStore::new();
        store.set_fail_primary(true);
        store.set_sources(
            "10",
            SecondarySources::new().with(
                SourceCollection::RegisteredUsers,
                Record::new().with("photo", "https://cdn.example/10.png"),
            ),
        );

        let report = resolver(&store).resolve(&id("10")).await;

        assert!(report.result.resolved);
        assert!(report.primary_profile.is_none());
        assert!(matches!(
            report.diagnostics.primary,
            Some(LookupOutcome::Failed(_))
        ));
    }

    #[tokio::test]
    async fn test_secondary_failure_is_unresolved() {
        let store = InMemoryProfileStore::new();
        store.set_fail_secondary(true);

        let report = resolver(&store).resolve(&id("11")).await;

        assert_eq!(report.state(), ResolutionState::Unresolved);
        assert!(matches!(
            report.diagnostics.secondary,
            Some(LookupOutcome::Failed(_))
        ));
        assert!(report.diagnostics.attempts.is_empty());
    }

    #[tokio::test]
    async fn test_rejected_primary_is_ignored() {
        let primary = RejectingPrimary::default();
        let store = InMemoryProfileStore::new();
        let resolver = AvatarResolver::new(
            Arc::new(primary.clone()),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
        );

        let report = resolver.resolve(&id("12")).await;

        assert_eq!(*primary.calls.lock().unwrap(), 1);
        assert_eq!(report.state(), ResolutionState::Unresolved);
        assert_eq!(store.secondary_calls(), 1);
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    #[tokio::test]
    async fn test_persistence_disabled() {
        let store = InMemoryProfileStore::new();
        store.set_sources(
            "13",
            SecondarySources::new().with(
                SourceCollection::HusbandUsers,
                Record::new().with("image_url", "https://cdn.example/13.png"),
            ),
        );
        let shared = Arc::new(store.clone());
        let resolver = AvatarResolver::with_config(
            shared.clone(),
            shared.clone(),
            shared,
            ResolverConfig {
                persist_discovered: false,
                ..Default::default()
            },
        );

        let report = resolver.resolve(&id("13")).await;

        assert!(report.result.resolved);
        assert!(!report.result.persisted);
        assert!(report.persist.is_none());
        assert!(store.writes().is_empty());
    }

    #[tokio::test]
    async fn test_write_failure_keeps_result() {
        let store = InMemoryProfileStore::new();
        store.set_fail_writes(true);
        store.set_sources(
            "14",
            SecondarySources::new().with(
                SourceCollection::RegisteredUsers,
                Record::new().with("avatar", "https://cdn.example/14.png"),
            ),
        );
        let resolver = resolver(&store);

        let mut report = resolver.resolve(&id("14")).await;

        assert!(report.result.resolved);
        assert!(report.result.persisted);
        assert!(matches!(
            report.wait_for_persistence().await,
            Some(PersistOutcome::Failed(_))
        ));
        assert_eq!(resolver.writer().consecutive_failures(), 1);
        assert!(store.writes().is_empty());
    }
}
