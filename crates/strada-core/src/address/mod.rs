//! Address data model, parsing, and display formatting

mod format;
mod parse;
mod types;

pub use format::{full_address, street_label, street_line};
pub use parse::{parse_street_address, StreetAddressParts};
pub use types::{normalize_state_code, AddressRecord, Municipality, NormalizedForm, RegionFilter};
