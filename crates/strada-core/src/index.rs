//! Candidate index
//!
//! Inverted postings from trigrams and phonetic codes to record indices,
//! plus geographic partitions, so a query scores a bounded candidate set
//! instead of the whole corpus.
//!
//! A [`Generation`] is immutable once built. [`SharedIndex`] publishes
//! generations by swapping an `Arc` behind a lock: queries clone the `Arc`
//! once and read a consistent snapshot for their whole lifetime, while a
//! rebuild publishes the next generation without ever mutating the one in
//! service.

use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use ahash::{AHasher, AHashMap, AHashSet};
use parking_lot::RwLock;
use serde::Serialize;
use tracing::{debug, warn};

use crate::address::{
    normalize_state_code, AddressRecord, Municipality, NormalizedForm, RegionFilter,
};
use crate::error::{EngineError, Result};
use crate::normalize::Normalizer;
use crate::phonetic::Soundex;
use crate::trigram::{self, TrigramCounts};

/// One immutable index generation over a data snapshot.
pub struct Generation {
    records: Vec<AddressRecord>,
    forms: Vec<NormalizedForm>,
    municipalities: AHashMap<i64, Municipality>,

    by_trigram: AHashMap<String, Vec<u32>>,
    by_phonetic: AHashMap<String, Vec<u32>>,
    by_state: AHashMap<String, Vec<u32>>,
    by_municipality: AHashMap<i64, Vec<u32>>,

    fingerprint: String,
}

impl Generation {
    /// Build a generation from a data snapshot.
    ///
    /// Normalized forms are derived here, once per record, with the same
    /// normalizer and encoder the engine applies to queries.
    pub fn build(
        records: Vec<AddressRecord>,
        municipalities: Vec<Municipality>,
        normalizer: &Normalizer,
        soundex: &Soundex,
    ) -> Self {
        let municipalities: AHashMap<i64, Municipality> =
            municipalities.into_iter().map(|m| (m.id, m)).collect();

        let mut forms = Vec::with_capacity(records.len());
        let mut by_trigram: AHashMap<String, Vec<u32>> = AHashMap::new();
        let mut by_phonetic: AHashMap<String, Vec<u32>> = AHashMap::new();
        let mut by_state: AHashMap<String, Vec<u32>> = AHashMap::new();
        let mut by_municipality: AHashMap<i64, Vec<u32>> = AHashMap::new();

        for (i, record) in records.iter().enumerate() {
            let idx = i as u32;
            let form = derive_form(record, normalizer, soundex);

            // one posting per distinct trigram per record
            let unique: AHashSet<String> =
                trigram::trigrams(&form.normalized_street).into_iter().collect();
            for gram in unique {
                by_trigram.entry(gram).or_default().push(idx);
            }

            if !form.phonetic_code.is_empty() {
                by_phonetic
                    .entry(form.phonetic_code.clone())
                    .or_default()
                    .push(idx);
            }

            by_state
                .entry(normalize_state_code(&record.state_code))
                .or_default()
                .push(idx);
            by_municipality
                .entry(record.municipality_id)
                .or_default()
                .push(idx);

            if !municipalities.contains_key(&record.municipality_id) {
                warn!(
                    "address {} references unknown municipality {}",
                    record.id, record.municipality_id
                );
            }

            forms.push(form);
        }

        let fingerprint = compute_fingerprint(&records, &forms);
        debug!(
            "built index generation: {} addresses, {} municipalities, fingerprint {}",
            records.len(),
            municipalities.len(),
            fingerprint
        );

        Self {
            records,
            forms,
            municipalities,
            by_trigram,
            by_phonetic,
            by_state,
            by_municipality,
            fingerprint,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn record(&self, idx: u32) -> &AddressRecord {
        &self.records[idx as usize]
    }

    pub fn form(&self, idx: u32) -> &NormalizedForm {
        &self.forms[idx as usize]
    }

    pub fn municipality(&self, id: i64) -> Option<&Municipality> {
        self.municipalities.get(&id)
    }

    pub fn municipality_count(&self) -> usize {
        self.municipalities.len()
    }

    /// Content fingerprint of the indexed snapshot, for change detection.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Bounded candidate retrieval: records sharing at least one trigram
    /// with the query, united with records sharing its phonetic code,
    /// restricted to the narrowest geographic partition the filter names.
    ///
    /// Checks `cancel` between posting lists; a cancelled retrieval returns
    /// [`EngineError::Cancelled`] and nothing needs to be rolled back.
    pub(crate) fn candidates(
        &self,
        filter: &RegionFilter,
        query_trigrams: &TrigramCounts,
        phonetic_code: Option<&str>,
        cancel: &AtomicBool,
    ) -> Result<Vec<u32>> {
        let region = self.region_partition(filter);
        // an explicit filter naming an unknown region matches nothing
        if !filter.is_empty() && region.as_ref().is_some_and(|r| r.is_empty()) {
            return Ok(Vec::new());
        }

        let in_region = |idx: u32| region.as_ref().map_or(true, |r| r.contains(&idx));
        let mut out: AHashSet<u32> = AHashSet::new();

        for gram in query_trigrams.keys() {
            if cancel.load(Ordering::Relaxed) {
                return Err(EngineError::Cancelled);
            }
            if let Some(postings) = self.by_trigram.get(gram) {
                out.extend(postings.iter().copied().filter(|&idx| in_region(idx)));
            }
        }

        if let Some(code) = phonetic_code {
            if cancel.load(Ordering::Relaxed) {
                return Err(EngineError::Cancelled);
            }
            if let Some(postings) = self.by_phonetic.get(code) {
                out.extend(postings.iter().copied().filter(|&idx| in_region(idx)));
            }
        }

        Ok(out.into_iter().collect())
    }

    /// Record set of the narrowest geographic partition named by the
    /// filter, or `None` when the filter is empty.
    fn region_partition(&self, filter: &RegionFilter) -> Option<AHashSet<u32>> {
        if let Some(municipality_id) = filter.municipality {
            let ids = self
                .by_municipality
                .get(&municipality_id)
                .map(|v| v.iter().copied().collect())
                .unwrap_or_default();
            return Some(ids);
        }
        if let Some(state) = &filter.state {
            let ids = self
                .by_state
                .get(state)
                .map(|v| v.iter().copied().collect())
                .unwrap_or_default();
            return Some(ids);
        }
        None
    }
}

/// Derive the cached matching form of a record.
fn derive_form(record: &AddressRecord, normalizer: &Normalizer, soundex: &Soundex) -> NormalizedForm {
    let street = format!("{} {}", record.street_name, record.street_type);
    let normalized_street = normalizer.normalize(&street);
    debug_assert_eq!(
        normalizer.normalize(&normalized_street),
        normalized_street,
        "normalization must be idempotent"
    );
    let phonetic_code = soundex.encode_primary(&normalized_street).unwrap_or_default();
    NormalizedForm {
        normalized_street,
        phonetic_code,
    }
}

fn compute_fingerprint(records: &[AddressRecord], forms: &[NormalizedForm]) -> String {
    let mut hasher = AHasher::default();
    for (record, form) in records.iter().zip(forms) {
        record.id.hash(&mut hasher);
        form.normalized_street.hash(&mut hasher);
        form.phonetic_code.hash(&mut hasher);
    }
    format!("{:016x}", hasher.finish())
}

/// Build statistics reported after a rebuild.
#[derive(Debug, Clone, Serialize)]
pub struct IndexStats {
    pub addresses: usize,
    pub municipalities: usize,
    pub build_ms: u64,
    pub fingerprint: String,
}

/// Holder of the currently published generation.
///
/// Readers take a snapshot (`Arc` clone) and never block a publication;
/// publication replaces the `Arc` wholesale, so readers either see the old
/// generation or the new one, never a mix.
#[derive(Default)]
pub struct SharedIndex {
    current: RwLock<Option<Arc<Generation>>>,
}

impl SharedIndex {
    /// Create an index with no published generation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a generation, atomically replacing the current one.
    pub fn publish(&self, generation: Generation) -> Arc<Generation> {
        let generation = Arc::new(generation);
        *self.current.write() = Some(Arc::clone(&generation));
        generation
    }

    /// Snapshot of the current generation, if one has been published.
    pub fn snapshot(&self) -> Option<Arc<Generation>> {
        self.current.read().clone()
    }

    /// True once a generation has been published.
    pub fn is_ready(&self) -> bool {
        self.current.read().is_some()
    }

    /// Fingerprint of the published generation, for change detection.
    pub fn fingerprint(&self) -> Option<String> {
        self.current
            .read()
            .as_ref()
            .map(|generation| generation.fingerprint().to_string())
    }
}
