//! Display formatting for address records

use super::types::{AddressRecord, Municipality};

/// Street line of a record: house number, street name, street type, with
/// empty fields skipped.
pub fn street_line(record: &AddressRecord) -> String {
    let mut parts: Vec<&str> = Vec::with_capacity(3);
    if !record.house_number.is_empty() {
        parts.push(&record.house_number);
    }
    if !record.street_name.is_empty() {
        parts.push(&record.street_name);
    }
    if !record.street_type.is_empty() {
        parts.push(&record.street_type);
    }
    parts.join(" ")
}

/// Street name with its type, no house number: the label suggestions group
/// under ("Main Street").
pub fn street_label(record: &AddressRecord) -> String {
    let mut parts: Vec<&str> = Vec::with_capacity(2);
    if !record.street_name.is_empty() {
        parts.push(&record.street_name);
    }
    if !record.street_type.is_empty() {
        parts.push(&record.street_type);
    }
    parts.join(" ")
}

/// Full display form: `"{street line}, {municipality}, {state}"`.
///
/// A record whose municipality is unknown is formatted without the
/// municipality segment rather than dropped.
pub fn full_address(record: &AddressRecord, municipality: Option<&Municipality>) -> String {
    let line = street_line(record);
    match municipality {
        Some(m) => format!("{line}, {}, {}", m.name, record.state_code),
        None => format!("{line}, {}", record.state_code),
    }
}
