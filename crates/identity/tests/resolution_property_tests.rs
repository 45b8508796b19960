//! Property-based tests for avatar resolution.
//!
//! These tests verify that the validity predicate, the document scanner and the
//! prioritized search hold their properties across generated inputs.

use charms_identity::extract::AVATAR_FIELDS;
use charms_identity::validator::is_valid;
use charms_identity::{
    AvatarResolver, DocumentScanner, IdentityId, InMemoryProfileStore, Record, ResolutionSource,
    SecondarySources, SourceCollection,
};
use proptest::prelude::*;
use std::sync::Arc;

// =============================================================================
// Generators
// =============================================================================

/// Generates an https URL on a neutral CDN host.
fn arb_cdn_url() -> impl Strategy<Value = String> {
    ("[a-z]{3,10}", "[a-z0-9]{1,12}")
        .prop_map(|(host, file)| format!("https://{}.example/{}.png", host, file))
}

/// Generates a pair of distinct indices into the avatar field list, ordered.
fn arb_field_pair() -> impl Strategy<Value = (usize, usize)> {
    (0..AVATAR_FIELDS.len(), 0..AVATAR_FIELDS.len())
        .prop_filter("distinct fields", |(a, b)| a != b)
        .prop_map(|(a, b)| (a.min(b), a.max(b)))
}

/// Generates a collection position in priority order.
fn arb_rank() -> impl Strategy<Value = usize> {
    0..SourceCollection::PRIORITY.len()
}

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(future)
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #[test]
    fn prop_cdn_urls_are_valid(url in arb_cdn_url()) {
        prop_assert!(is_valid(&url));
    }

    #[test]
    fn prop_missing_scheme_is_invalid(scheme in "[a-z]{2,6}", rest in "[a-z0-9./]{1,20}") {
        prop_assume!(scheme != "http" && scheme != "https");
        let url = format!("{}://{}", scheme, rest);
        prop_assert!(!is_valid(&url));
        prop_assert!(!is_valid(&rest));
    }

    #[test]
    fn prop_placeholder_host_is_invalid(prefix in "[a-z]{0,8}", path in "[a-z0-9/]{0,16}") {
        let url = format!("https://{}picsum.photos/{}", prefix, path);
        prop_assert!(!is_valid(&url));
    }

    #[test]
    fn prop_local_asset_is_invalid(host in "[a-z]{3,10}", file in "[a-z0-9]{1,12}") {
        let url = format!("https://{}.example/static/{}.png", host, file);
        prop_assert!(!is_valid(&url));
    }

    /// The earliest field in the fixed list wins, whatever the storage order.
    #[test]
    fn prop_scanner_prefers_earliest_field(
        (early, late) in arb_field_pair(),
        early_url in arb_cdn_url(),
        late_url in arb_cdn_url(),
    ) {
        let doc = Record::new()
            .with(AVATAR_FIELDS[late], late_url.as_str())
            .with(AVATAR_FIELDS[early], early_url.as_str());

        let found = DocumentScanner::default().scan(&doc);
        prop_assert_eq!(found.map(|a| a.into_string()), Some(early_url));
    }

    /// Only the collection at rank k holds a candidate: it is returned and no
    /// lower-priority collection is scanned.
    #[test]
    fn prop_search_short_circuits(
        rank in arb_rank(),
        filler in 0usize..4,
        url in arb_cdn_url(),
    ) {
        let target = SourceCollection::PRIORITY[rank];
        let mut sources = SecondarySources::new();
        for collection in SourceCollection::PRIORITY {
            if collection == target {
                let mut records = vec![Record::new().with("name", "none"); filler];
                records.push(Record::new().with("avatar", url.as_str()));
                sources.insert(collection, records);
            } else {
                sources.insert(collection, vec![Record::new().with("name", "none"); filler + 1]);
            }
        }

        let store = InMemoryProfileStore::new();
        store.set_sources("p", sources);
        let shared = Arc::new(store.clone());
        let resolver = AvatarResolver::new(shared.clone(), shared.clone(), shared);

        let report = block_on(async { resolver.resolve(&IdentityId::from("p")).await });

        prop_assert_eq!(
            report.result.value.map(|a| a.into_string()),
            Some(url)
        );
        prop_assert_eq!(
            report.source,
            Some(ResolutionSource::Secondary { collection: target, record_index: filler })
        );
        for scanned in report.diagnostics.scanned_collections() {
            prop_assert!(scanned.rank() <= target.rank());
        }
        prop_assert_eq!(
            report.diagnostics.records_scanned(),
            rank * (filler + 1) + filler + 1
        );
    }
}
