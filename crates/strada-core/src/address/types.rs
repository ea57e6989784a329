//! Address type definitions

use serde::{Deserialize, Serialize};

/// A single street address as delivered by the address repository.
///
/// Records are immutable once indexed: a generation owns its records and
/// never mutates them after build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressRecord {
    /// Repository-assigned identifier
    pub id: i64,

    /// House number, possibly with a letter or range suffix (e.g. "123", "456A", "12-14")
    pub house_number: String,

    /// Street name without its type suffix (e.g. "Main", "Oak")
    pub street_name: String,

    /// Street type in display form (e.g. "Street", "Avenue")
    pub street_type: String,

    /// Municipality the address belongs to
    pub municipality_id: i64,

    /// Two-letter state code (e.g. "CA")
    pub state_code: String,
}

/// A municipality, used to resolve `municipality_id` for display formatting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Municipality {
    pub id: i64,
    pub name: String,
    /// Two-letter state code
    pub state_code: String,
}

/// Derived matching form of a record, computed once at index build.
///
/// A pure function of the record's street fields; cached next to the record
/// inside a generation and never mutated independently of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedForm {
    /// Normalized "street name + street type" string
    pub normalized_street: String,
    /// Soundex code of the primary street-name token, empty when the
    /// street has no codeable token
    pub phonetic_code: String,
}

/// Geographic restriction applied at candidate retrieval.
///
/// A municipality filter is narrower than a state filter; when both are set
/// the municipality partition is used.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionFilter {
    pub state: Option<String>,
    pub municipality: Option<i64>,
}

impl RegionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(mut self, code: impl Into<String>) -> Self {
        self.state = Some(normalize_state_code(&code.into()));
        self
    }

    pub fn municipality(mut self, id: i64) -> Self {
        self.municipality = Some(id);
        self
    }

    /// True when no geographic restriction is set.
    pub fn is_empty(&self) -> bool {
        self.state.is_none() && self.municipality.is_none()
    }
}

/// Trim and uppercase a state code for comparison.
pub fn normalize_state_code(code: &str) -> String {
    code.trim().to_uppercase()
}
