//! Strada Core Engine
//!
//! Address fuzzy-matching and autocomplete: given a partial, possibly
//! misspelled street-address fragment and an optional geographic filter,
//! return a small ranked set of plausible full addresses from a large
//! candidate pool.
//!
//! Matching combines trigram (lexical) similarity with Soundex (phonetic)
//! similarity over normalized street strings. Candidates come from an
//! inverted index built ahead of time, so a query scores a bounded set
//! instead of scanning the corpus. Index generations are immutable and
//! published atomically; queries are stateless and run concurrently against
//! a consistent snapshot.
//!
//! # Example
//!
//! ```rust
//! use strada_core::address::{AddressRecord, Municipality};
//! use strada_core::engine::{AutocompleteEngine, Query};
//! use strada_core::repository::MemoryRepository;
//!
//! let repository = MemoryRepository::with_data(
//!     vec![AddressRecord {
//!         id: 1,
//!         house_number: "123".to_string(),
//!         street_name: "Main".to_string(),
//!         street_type: "Street".to_string(),
//!         municipality_id: 10,
//!         state_code: "CA".to_string(),
//!     }],
//!     vec![Municipality {
//!         id: 10,
//!         name: "Los Angeles".to_string(),
//!         state_code: "CA".to_string(),
//!     }],
//! );
//!
//! let engine = AutocompleteEngine::new();
//! engine.rebuild_index(&repository)?;
//!
//! let results = engine.autocomplete(&Query::new("main st"))?;
//! assert_eq!(results, vec!["123 Main Street, Los Angeles, CA".to_string()]);
//! # Ok::<(), strada_core::EngineError>(())
//! ```

pub mod address;
pub mod engine;
pub mod error;
pub mod index;
pub mod normalize;
pub mod phonetic;
pub mod repository;
pub mod trigram;

// Re-export main types at crate root
pub use address::{AddressRecord, Municipality, NormalizedForm, RegionFilter};
pub use engine::{
    AutocompleteEngine, EngineConfig, Query, StreetSuggestion, MAX_RESULTS, MIN_QUERY_LENGTH,
};
pub use error::{EngineError, Result};
pub use index::{Generation, IndexStats, SharedIndex};
pub use normalize::Normalizer;
pub use phonetic::Soundex;
pub use repository::{AddressRepository, MemoryRepository, RepositoryError};
