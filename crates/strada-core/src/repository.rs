//! Address repository boundary
//!
//! The engine pulls candidate data through this trait at index build and
//! refresh time only; query-time retrieval never touches the repository.
//! Backends may be anything that can enumerate addresses and
//! municipalities: a relational store, a flat file, or the in-memory
//! implementation below.

use thiserror::Error;

use crate::address::{normalize_state_code, AddressRecord, Municipality, RegionFilter};

/// Errors from a repository backend.
#[derive(Debug, Clone, Error)]
pub enum RepositoryError {
    /// Backend failure (database, filesystem, network, ...)
    #[error("repository backend error: {0}")]
    Backend(String),

    /// Fetched data failed basic shape checks
    #[error("invalid repository data: {0}")]
    InvalidData(String),
}

/// Result type for repository operations.
pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;

/// Read-only, pull-based source of address data.
pub trait AddressRepository {
    /// Address records eligible for indexing, restricted to the given
    /// geographic filter. An empty filter yields the full corpus.
    fn fetch_addresses(&self, filter: &RegionFilter) -> RepositoryResult<Vec<AddressRecord>>;

    /// All municipalities, used to resolve display names at build time.
    fn fetch_municipalities(&self) -> RepositoryResult<Vec<Municipality>>;
}

/// In-memory repository for tests and development.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    addresses: Vec<AddressRecord>,
    municipalities: Vec<Municipality>,
}

impl MemoryRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository with initial data.
    pub fn with_data(addresses: Vec<AddressRecord>, municipalities: Vec<Municipality>) -> Self {
        Self {
            addresses,
            municipalities,
        }
    }

    /// Add a single record.
    pub fn add_address(&mut self, record: AddressRecord) {
        self.addresses.push(record);
    }

    /// Add a single municipality.
    pub fn add_municipality(&mut self, municipality: Municipality) {
        self.municipalities.push(municipality);
    }
}

impl AddressRepository for MemoryRepository {
    fn fetch_addresses(&self, filter: &RegionFilter) -> RepositoryResult<Vec<AddressRecord>> {
        let records = self
            .addresses
            .iter()
            .filter(|record| {
                filter
                    .municipality
                    .map_or(true, |id| record.municipality_id == id)
                    && filter
                        .state
                        .as_ref()
                        .map_or(true, |state| normalize_state_code(&record.state_code) == *state)
            })
            .cloned()
            .collect();
        Ok(records)
    }

    fn fetch_municipalities(&self) -> RepositoryResult<Vec<Municipality>> {
        Ok(self.municipalities.clone())
    }
}
