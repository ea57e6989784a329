//! End-to-end autocomplete scenarios against an in-memory repository.

use std::sync::Arc;
use std::thread;

use pretty_assertions::assert_eq;

use strada_core::address::{AddressRecord, Municipality, RegionFilter};
use strada_core::engine::{AutocompleteEngine, Query, MAX_RESULTS};
use strada_core::repository::{
    AddressRepository, MemoryRepository, RepositoryError, RepositoryResult,
};
use strada_core::EngineError;

fn record(id: i64, house: &str, name: &str, kind: &str, muni: i64, state: &str) -> AddressRecord {
    AddressRecord {
        id,
        house_number: house.to_string(),
        street_name: name.to_string(),
        street_type: kind.to_string(),
        municipality_id: muni,
        state_code: state.to_string(),
    }
}

fn municipality(id: i64, name: &str, state: &str) -> Municipality {
    Municipality {
        id,
        name: name.to_string(),
        state_code: state.to_string(),
    }
}

/// Two municipalities; Los Angeles holds lexical, directional, and
/// phonetic-only neighbors of "Main".
fn repository() -> MemoryRepository {
    MemoryRepository::with_data(
        vec![
            record(1, "123", "Main", "Street", 10, "CA"),
            record(2, "456", "Main", "Street", 10, "CA"),
            record(3, "12", "North Main", "Street", 10, "CA"),
            record(4, "5", "Mane", "Street", 10, "CA"),
            record(5, "77", "Elm", "Road", 10, "CA"),
            record(6, "9", "Main", "Avenue", 20, "NY"),
            record(7, "8", "Oak", "Lane", 20, "NY"),
        ],
        vec![
            municipality(10, "Los Angeles", "CA"),
            municipality(20, "Albany", "NY"),
        ],
    )
}

fn ready_engine() -> AutocompleteEngine {
    init_tracing();
    let engine = AutocompleteEngine::new();
    engine.rebuild_index(&repository()).unwrap();
    engine
}

/// Honor RUST_LOG when running tests; harmless if already installed.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

#[test]
fn lexical_matches_outrank_phonetic_resemblance() {
    let engine = ready_engine();
    let results = engine
        .autocomplete(&Query::new("Main").state("CA").municipality(10))
        .unwrap();

    assert!(!results.is_empty());
    // every entry before the phonetic-only "Mane" hit names "Main"
    if let Some(mane) = results.iter().position(|r| r.contains("Mane")) {
        assert!(mane > 0, "phonetic match ranked first: {results:?}");
        assert!(
            results
                .iter()
                .take(mane)
                .all(|r| r.to_lowercase().contains("main")),
            "phonetic match ranked above a lexical match: {results:?}"
        );
    }
    // geographic filter respected
    assert!(results.iter().all(|r| r.contains("Los Angeles")));
}

#[test]
fn bare_street_type_query_is_low_confidence() {
    let engine = ready_engine();

    // "St" expands to "street" and matches almost everything a little;
    // whatever survives must score well below a real street-name query
    let generic = engine.street_suggestions(&Query::new("St")).unwrap();
    let specific = engine.street_suggestions(&Query::new("Main")).unwrap();

    let best_generic = generic.first().map(|s| s.score).unwrap_or(0.0);
    let best_specific = specific.first().map(|s| s.score).unwrap_or(0.0);
    assert!(
        best_generic < best_specific,
        "generic query {best_generic} should score below specific {best_specific}"
    );
}

#[test]
fn misspelled_query_recovers_via_phonetics() {
    let engine = ready_engine();
    let results = engine.autocomplete(&Query::new("Mane").state("CA")).unwrap();

    // the literally matching street wins, the phonetic neighbors follow
    assert!(results[0].contains("Mane Street"));
    assert!(
        results.iter().any(|r| r.contains("Main Street")),
        "no phonetic recovery in {results:?}"
    );
}

#[test]
fn sub_minimum_query_returns_empty() {
    let engine = ready_engine();
    assert_eq!(engine.autocomplete(&Query::new("M")).unwrap(), Vec::<String>::new());
    assert_eq!(engine.autocomplete(&Query::new("  M  ")).unwrap(), Vec::<String>::new());
}

#[test]
fn no_matches_is_distinct_from_no_index() {
    let cold = AutocompleteEngine::new();
    assert!(matches!(
        cold.autocomplete(&Query::new("Main")),
        Err(EngineError::IndexUnavailable)
    ));

    let engine = ready_engine();
    assert_eq!(engine.autocomplete(&Query::new("zzzz")).unwrap(), Vec::<String>::new());
}

#[test]
fn results_capped_at_ten_and_strictly_ordered() {
    // 15 addresses on similarly named streets in one municipality
    let mut repo = MemoryRepository::new();
    repo.add_municipality(municipality(1, "Springfield", "IL"));
    for i in 0..15 {
        repo.add_address(record(i, &format!("{}", 100 + i), "Main", "Street", 1, "IL"));
    }
    let engine = AutocompleteEngine::new();
    engine.rebuild_index(&repo).unwrap();

    let results = engine.autocomplete(&Query::new("Main").limit(25)).unwrap();
    assert_eq!(results.len(), MAX_RESULTS);

    // identical scores, so the order must be lexicographic
    let mut sorted = results.clone();
    sorted.sort();
    assert_eq!(results, sorted);
}

#[test]
fn duplicate_rows_collapse_to_one_suggestion() {
    let mut repo = MemoryRepository::new();
    repo.add_municipality(municipality(1, "Springfield", "IL"));
    // same address loaded twice under different ids
    repo.add_address(record(1, "100", "Main", "Street", 1, "IL"));
    repo.add_address(record(2, "100", "Main", "Street", 1, "IL"));
    let engine = AutocompleteEngine::new();
    engine.rebuild_index(&repo).unwrap();

    let results = engine.autocomplete(&Query::new("Main")).unwrap();
    assert_eq!(results, vec!["100 Main Street, Springfield, IL".to_string()]);
}

#[test]
fn concurrent_queries_see_identical_results() {
    let engine = Arc::new(ready_engine());
    let baseline = engine.autocomplete(&Query::new("Main")).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || engine.autocomplete(&Query::new("Main")).unwrap())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), baseline);
    }
}

#[test]
fn failed_rebuild_keeps_previous_generation_serving() {
    struct BrokenRepository;

    impl AddressRepository for BrokenRepository {
        fn fetch_addresses(&self, _filter: &RegionFilter) -> RepositoryResult<Vec<AddressRecord>> {
            Err(RepositoryError::Backend("connection refused".to_string()))
        }

        fn fetch_municipalities(&self) -> RepositoryResult<Vec<Municipality>> {
            Err(RepositoryError::Backend("connection refused".to_string()))
        }
    }

    let engine = ready_engine();
    let before = engine.index_fingerprint().unwrap();

    let result = engine.rebuild_index(&BrokenRepository);
    assert!(matches!(result, Err(EngineError::Repository(_))));

    // the old generation still answers
    assert_eq!(engine.index_fingerprint().unwrap(), before);
    assert!(!engine.autocomplete(&Query::new("Main")).unwrap().is_empty());
}

#[test]
fn rebuild_swaps_in_new_data() {
    let engine = ready_engine();
    assert!(!engine.autocomplete(&Query::new("Elm")).unwrap().is_empty());

    let mut next = MemoryRepository::new();
    next.add_municipality(municipality(30, "Portland", "OR"));
    next.add_address(record(100, "1", "Pine", "Court", 30, "OR"));
    engine.rebuild_index(&next).unwrap();

    assert_eq!(engine.autocomplete(&Query::new("Elm")).unwrap(), Vec::<String>::new());
    assert_eq!(
        engine.autocomplete(&Query::new("Pine")).unwrap(),
        vec!["1 Pine Court, Portland, OR".to_string()]
    );
}
