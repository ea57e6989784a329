//! Autocomplete engine
//!
//! Orchestrates the matching pipeline: normalize the query, encode its
//! phonetic code, retrieve a bounded candidate set from the published index
//! generation, score each candidate, threshold, rank, and format.
//!
//! The engine is stateless across calls; any number of queries may run
//! concurrently against the same generation. The only state transition is
//! the generation swap performed by [`rebuild_index`].
//!
//! [`rebuild_index`]: AutocompleteEngine::rebuild_index

use std::sync::atomic::AtomicBool;
use std::time::Instant;

use ahash::{AHashMap, AHashSet};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use crate::address::{self, parse_street_address, RegionFilter};
use crate::error::{EngineError, Result};
use crate::index::{Generation, IndexStats, SharedIndex};
use crate::normalize::Normalizer;
use crate::phonetic::Soundex;
use crate::repository::AddressRepository;
use crate::trigram;

/// Queries shorter than this (trimmed) return an empty result.
pub const MIN_QUERY_LENGTH: usize = 2;

/// Hard cap on returned results, regardless of the requested limit.
pub const MAX_RESULTS: usize = 10;

/// Scoring and truncation policy.
///
/// The weights and bonuses are policy, not algorithm: they ship as defaults
/// and are expected to be tuned against labeled query data.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Weight of trigram similarity in the combined score
    pub trigram_weight: f64,
    /// Weight added when the phonetic codes match exactly
    pub phonetic_weight: f64,
    /// Bonus added when one normalized street is a prefix of the other
    pub prefix_bonus: f64,
    /// Candidates scoring below this are discarded as noise
    pub min_score: f64,
    /// Engine-side result cap, itself capped at [`MAX_RESULTS`]
    pub max_results: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            trigram_weight: 0.7,
            phonetic_weight: 0.3,
            prefix_bonus: 0.15,
            min_score: 0.15,
            max_results: MAX_RESULTS,
        }
    }
}

/// Rejected engine configuration.
#[derive(Debug, Clone, Error)]
#[error("invalid engine config: {0}")]
pub struct ConfigError(String);

impl EngineConfig {
    /// Check that every knob is inside its domain.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        for (name, value) in [
            ("trigram_weight", self.trigram_weight),
            ("phonetic_weight", self.phonetic_weight),
            ("prefix_bonus", self.prefix_bonus),
            ("min_score", self.min_score),
        ] {
            if !(0.0..=1.0).contains(&value) || !value.is_finite() {
                return Err(ConfigError(format!(
                    "{name} must be in [0.0, 1.0], got {value}"
                )));
            }
        }
        if self.max_results == 0 {
            return Err(ConfigError("max_results must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// An autocomplete query.
#[derive(Debug, Clone)]
pub struct Query {
    /// Raw user input, possibly partial or misspelled
    pub raw_text: String,
    /// Requested result count, clamped to `[1, MAX_RESULTS]` at use
    pub limit: usize,
    /// Optional two-letter state filter
    pub state: Option<String>,
    /// Optional municipality filter, narrower than the state filter
    pub municipality: Option<i64>,
}

impl Query {
    pub fn new(raw_text: impl Into<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
            limit: MAX_RESULTS,
            state: None,
            municipality: None,
        }
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn state(mut self, code: impl Into<String>) -> Self {
        self.state = Some(code.into());
        self
    }

    pub fn municipality(mut self, id: i64) -> Self {
        self.municipality = Some(id);
        self
    }

    fn clamped_limit(&self) -> usize {
        self.limit.clamp(1, MAX_RESULTS)
    }

    fn region_filter(&self) -> RegionFilter {
        let mut filter = RegionFilter::new();
        if let Some(state) = &self.state {
            filter = filter.state(state.as_str());
        }
        if let Some(id) = self.municipality {
            filter = filter.municipality(id);
        }
        filter
    }
}

/// A street-name suggestion with corpus statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreetSuggestion {
    /// Street name with its type ("Main Street")
    pub street: String,
    /// Number of matching addresses on that street
    pub address_count: usize,
    /// Best combined score among those addresses
    pub score: f64,
}

/// A candidate with its combined score. Per-query and ephemeral.
struct ScoredCandidate {
    idx: u32,
    score: f64,
}

/// Address autocomplete engine.
///
/// Cheap to share behind an `Arc`; all methods take `&self`.
pub struct AutocompleteEngine {
    index: SharedIndex,
    normalizer: Normalizer,
    soundex: Soundex,
    config: EngineConfig,
}

impl Default for AutocompleteEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl AutocompleteEngine {
    /// Create an engine with default configuration and no published index.
    pub fn new() -> Self {
        Self {
            index: SharedIndex::new(),
            normalizer: Normalizer::new(),
            soundex: Soundex::new(),
            config: EngineConfig::default(),
        }
    }

    /// Create an engine with a custom configuration.
    pub fn with_config(config: EngineConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new()
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// True once an index generation has been published.
    pub fn is_ready(&self) -> bool {
        self.index.is_ready()
    }

    /// Fingerprint of the published generation, for change detection.
    pub fn index_fingerprint(&self) -> Option<String> {
        self.index.fingerprint()
    }

    /// Pull a fresh snapshot from the repository, build a new index
    /// generation, and publish it atomically.
    ///
    /// In-flight queries keep the generation they started with; a
    /// repository failure leaves the published generation untouched.
    pub fn rebuild_index(&self, repository: &dyn AddressRepository) -> Result<IndexStats> {
        let start = Instant::now();
        let addresses = repository.fetch_addresses(&RegionFilter::new())?;
        let municipalities = repository.fetch_municipalities()?;

        let generation =
            Generation::build(addresses, municipalities, &self.normalizer, &self.soundex);
        let stats = IndexStats {
            addresses: generation.len(),
            municipalities: generation.municipality_count(),
            build_ms: start.elapsed().as_millis() as u64,
            fingerprint: generation.fingerprint().to_string(),
        };
        self.index.publish(generation);

        info!(
            "published index generation {} ({} addresses, {} municipalities, {} ms)",
            stats.fingerprint, stats.addresses, stats.municipalities, stats.build_ms
        );
        Ok(stats)
    }

    /// Autocomplete a partial, possibly misspelled address fragment.
    ///
    /// Returns formatted address strings sorted by descending score, ties
    /// broken by ascending string order; never more than
    /// `min(query.limit, MAX_RESULTS)` entries. Too-short queries return an
    /// empty list, not an error.
    pub fn autocomplete(&self, query: &Query) -> Result<Vec<String>> {
        self.autocomplete_with_cancel(query, &AtomicBool::new(false))
    }

    /// [`autocomplete`](Self::autocomplete) with cooperative cancellation:
    /// setting `cancel` aborts candidate retrieval and surfaces
    /// [`EngineError::Cancelled`]. Nothing is mutated, so cancellation
    /// needs no rollback.
    pub fn autocomplete_with_cancel(
        &self,
        query: &Query,
        cancel: &AtomicBool,
    ) -> Result<Vec<String>> {
        let Some((generation, scored)) = self.scored_candidates(query, cancel)? else {
            return Ok(Vec::new());
        };

        let mut formatted: Vec<(String, f64)> = scored
            .into_iter()
            .map(|candidate| {
                let record = generation.record(candidate.idx);
                let municipality = generation.municipality(record.municipality_id);
                (address::full_address(record, municipality), candidate.score)
            })
            .collect();

        // score descending, then formatted string ascending for determinism
        formatted.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });

        let limit = self.clamp_limit(query);
        let mut seen: AHashSet<&str> = AHashSet::new();
        let mut out: Vec<String> = Vec::with_capacity(limit.min(formatted.len()));
        for (text, _) in &formatted {
            if seen.insert(text.as_str()) {
                out.push(text.clone());
                if out.len() == limit {
                    break;
                }
            }
        }
        Ok(out)
    }

    /// Street-name suggestions with per-street address counts, ranked by
    /// `(score desc, count desc, street asc)`.
    pub fn street_suggestions(&self, query: &Query) -> Result<Vec<StreetSuggestion>> {
        let Some((generation, scored)) =
            self.scored_candidates(query, &AtomicBool::new(false))?
        else {
            return Ok(Vec::new());
        };

        let mut groups: AHashMap<String, (usize, f64)> = AHashMap::new();
        for candidate in scored {
            let record = generation.record(candidate.idx);
            let entry = groups
                .entry(address::street_label(record))
                .or_insert((0, 0.0));
            entry.0 += 1;
            entry.1 = entry.1.max(candidate.score);
        }

        let mut suggestions: Vec<StreetSuggestion> = groups
            .into_iter()
            .map(|(street, (address_count, score))| StreetSuggestion {
                street,
                address_count,
                score,
            })
            .collect();
        suggestions.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| b.address_count.cmp(&a.address_count))
                .then_with(|| a.street.cmp(&b.street))
        });
        suggestions.truncate(self.clamp_limit(query));
        Ok(suggestions)
    }

    /// Shared front half of the pipeline. `Ok(None)` means the query was
    /// rejected locally (too short or empty after normalization).
    fn scored_candidates(
        &self,
        query: &Query,
        cancel: &AtomicBool,
    ) -> Result<Option<(Arc<Generation>, Vec<ScoredCandidate>)>> {
        let trimmed = query.raw_text.trim();
        if trimmed.chars().count() < MIN_QUERY_LENGTH {
            debug!("query {trimmed:?} below minimum length");
            return Ok(None);
        }

        // Strip a leading house number and trailing unit so "123 Main St"
        // scores against street forms, which carry neither.
        let parts = parse_street_address(trimmed);
        let normalized = self.normalizer.normalize(&parts.street_name);
        if normalized.is_empty() {
            return Ok(None);
        }

        let generation = self.index.snapshot().ok_or(EngineError::IndexUnavailable)?;

        let query_trigrams = trigram::trigram_counts(&normalized);
        let phonetic = self.soundex.encode_primary(&normalized);
        let hits = generation.candidates(
            &query.region_filter(),
            &query_trigrams,
            phonetic.as_deref(),
            cancel,
        )?;
        debug!("query {normalized:?}: {} candidates retrieved", hits.len());

        let mut scored = Vec::with_capacity(hits.len());
        for idx in hits {
            let form = generation.form(idx);
            let lexical = trigram::similarity_of_counts(
                &query_trigrams,
                &trigram::trigram_counts(&form.normalized_street),
            );
            let phonetic_hit = !form.phonetic_code.is_empty()
                && phonetic.as_deref() == Some(form.phonetic_code.as_str());

            let mut score = self.config.trigram_weight * lexical;
            if phonetic_hit {
                score += self.config.phonetic_weight;
            }
            if prefix_affinity(&normalized, &form.normalized_street) {
                score += self.config.prefix_bonus;
            }
            let score = score.min(1.0);
            debug_assert!((0.0..=1.0).contains(&score), "score out of range: {score}");

            if score >= self.config.min_score {
                scored.push(ScoredCandidate { idx, score });
            }
        }
        debug!("query {normalized:?}: {} candidates above threshold", scored.len());

        Ok(Some((generation, scored)))
    }

    fn clamp_limit(&self, query: &Query) -> usize {
        query.clamped_limit().min(self.config.max_results).max(1)
    }
}

/// True when either normalized street is a prefix of the other, the common
/// case of a user typing the start of a real street name.
fn prefix_affinity(query: &str, candidate: &str) -> bool {
    candidate.starts_with(query) || query.starts_with(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::{AddressRecord, Municipality};
    use crate::repository::MemoryRepository;

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

    fn repository() -> MemoryRepository {
        MemoryRepository::with_data(
            vec![
                record(1, "123", "Main", "Street", 10, "CA"),
                record(2, "456", "Main", "Street", 10, "CA"),
                record(3, "9", "Main", "Avenue", 20, "NY"),
                record(4, "77", "Elm", "Road", 10, "CA"),
                record(5, "8", "Oak", "Lane", 20, "NY"),
            ],
            vec![
                Municipality {
                    id: 10,
                    name: "Los Angeles".to_string(),
                    state_code: "CA".to_string(),
                },
                Municipality {
                    id: 20,
                    name: "Albany".to_string(),
                    state_code: "NY".to_string(),
                },
            ],
        )
    }

    fn ready_engine() -> AutocompleteEngine {
        let engine = AutocompleteEngine::new();
        engine.rebuild_index(&repository()).unwrap();
        engine
    }

    #[test]
    fn short_query_returns_empty_not_error() {
        let engine = ready_engine();
        assert!(engine.autocomplete(&Query::new("M")).unwrap().is_empty());
        assert!(engine.autocomplete(&Query::new(" ")).unwrap().is_empty());
        assert!(engine.autocomplete(&Query::new("")).unwrap().is_empty());
    }

    #[test]
    fn unpublished_index_is_an_error() {
        let engine = AutocompleteEngine::new();
        let result = engine.autocomplete(&Query::new("Main"));
        assert!(matches!(result, Err(EngineError::IndexUnavailable)));
    }

    #[test]
    fn exact_name_ranks_first_and_formats_fully() {
        let engine = ready_engine();
        let results = engine.autocomplete(&Query::new("Main Street")).unwrap();
        assert!(!results.is_empty());
        assert_eq!(results[0], "123 Main Street, Los Angeles, CA");
        // deterministic tie-break: same score, lexicographic order
        assert_eq!(results[1], "456 Main Street, Los Angeles, CA");
    }

    #[test]
    fn house_number_in_query_is_ignored_for_matching() {
        let engine = ready_engine();
        let results = engine.autocomplete(&Query::new("456 Main St")).unwrap();
        assert!(results.iter().any(|r| r.starts_with("123 Main Street")));
    }

    #[test]
    fn limit_clamped_to_valid_range() {
        let engine = ready_engine();
        let results = engine.autocomplete(&Query::new("Main").limit(50)).unwrap();
        assert!(results.len() <= MAX_RESULTS);
        let results = engine.autocomplete(&Query::new("Main").limit(0)).unwrap();
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn state_filter_restricts_results() {
        let engine = ready_engine();
        let results = engine.autocomplete(&Query::new("Main").state("NY")).unwrap();
        assert!(!results.is_empty());
        assert!(results.iter().all(|r| r.ends_with("NY")));
    }

    #[test]
    fn municipality_filter_restricts_results() {
        let engine = ready_engine();
        let results = engine
            .autocomplete(&Query::new("Main").municipality(10))
            .unwrap();
        assert!(!results.is_empty());
        assert!(results.iter().all(|r| r.contains("Los Angeles")));
    }

    #[test]
    fn unrelated_query_yields_nothing() {
        let engine = ready_engine();
        let results = engine.autocomplete(&Query::new("zzqqxx")).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn cancellation_surfaces_as_error() {
        let engine = ready_engine();
        let cancelled = AtomicBool::new(true);
        let result = engine.autocomplete_with_cancel(&Query::new("Main"), &cancelled);
        assert!(matches!(result, Err(EngineError::Cancelled)));
    }

    #[test]
    fn street_suggestions_group_and_count() {
        let engine = ready_engine();
        let suggestions = engine
            .street_suggestions(&Query::new("Main").state("CA"))
            .unwrap();
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].street, "Main Street");
        assert_eq!(suggestions[0].address_count, 2);
        assert!(suggestions[0].score > 0.5);
    }

    #[test]
    fn config_validation_rejects_out_of_range() {
        let config = EngineConfig {
            min_score: 1.5,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
        assert!(AutocompleteEngine::with_config(config).is_err());

        let config = EngineConfig {
            max_results: 0,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());

        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn rebuild_reports_stats_and_fingerprint() {
        let engine = AutocompleteEngine::new();
        assert!(!engine.is_ready());
        let stats = engine.rebuild_index(&repository()).unwrap();
        assert_eq!(stats.addresses, 5);
        assert_eq!(stats.municipalities, 2);
        assert!(engine.is_ready());
        assert_eq!(engine.index_fingerprint(), Some(stats.fingerprint));
    }
}
