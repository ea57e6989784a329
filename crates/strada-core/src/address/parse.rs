//! Street-address component parsing
//!
//! Splits a raw street address like "456A Oak Ave Apt 2B" into house
//! number, street name, and unit designator. Parsing never fails: tokens
//! that fit no component stay part of the street name.

/// Unit designator words, matched case-insensitively with an optional
/// trailing period ("Apt." counts).
const UNIT_DESIGNATORS: &[&str] = &[
    "apt",
    "apartment",
    "suite",
    "ste",
    "unit",
    "bldg",
    "building",
];

/// Parsed components of a raw street address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreetAddressParts {
    /// Leading house number ("123", "456A", "12-14"), when present
    pub house_number: Option<String>,
    /// Everything that is neither house number nor unit
    pub street_name: String,
    /// Trailing unit ("Apt 2B", "Suite 100", "#4"), when present
    pub unit: Option<String>,
}

/// Parse a raw street address into components.
///
/// ```
/// use strada_core::address::parse_street_address;
///
/// let parts = parse_street_address("456A Oak Ave Apt 2B");
/// assert_eq!(parts.house_number.as_deref(), Some("456A"));
/// assert_eq!(parts.street_name, "Oak Ave");
/// assert_eq!(parts.unit.as_deref(), Some("Apt 2B"));
/// ```
pub fn parse_street_address(raw: &str) -> StreetAddressParts {
    let tokens: Vec<&str> = raw.split_whitespace().collect();
    if tokens.is_empty() {
        return StreetAddressParts::default();
    }

    // A unit starts at the first designator token past the front; "#4" and
    // "# 4" both qualify.
    let mut unit = None;
    let mut base = &tokens[..];
    for i in 1..tokens.len() {
        if is_unit_designator(tokens[i], i + 1 < tokens.len()) {
            unit = Some(format_unit(&tokens[i..]));
            base = &tokens[..i];
            break;
        }
    }

    let (house_number, name_tokens) = match base {
        [first, rest @ ..] if !rest.is_empty() && is_house_number(first) => {
            (Some(first.to_string()), rest)
        }
        _ => (None, base),
    };

    StreetAddressParts {
        house_number,
        street_name: name_tokens.join(" "),
        unit,
    }
}

/// House numbers are digits, digits plus one letter, or a digit range.
fn is_house_number(token: &str) -> bool {
    if !token.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        return false;
    }
    if let Some((low, high)) = token.split_once('-') {
        return !low.is_empty()
            && !high.is_empty()
            && low.chars().all(|c| c.is_ascii_digit())
            && high.chars().all(|c| c.is_ascii_digit());
    }
    let digits = token.chars().take_while(char::is_ascii_digit).count();
    let suffix = &token[digits..];
    // "42nd" is a street name token, not a house number
    suffix.is_empty() || (suffix.len() == 1 && suffix.chars().all(|c| c.is_ascii_alphabetic()))
}

fn is_unit_designator(token: &str, has_following: bool) -> bool {
    if let Some(rest) = token.strip_prefix('#') {
        return !rest.is_empty() || has_following;
    }
    let word = token.trim_end_matches('.').to_lowercase();
    has_following && UNIT_DESIGNATORS.contains(&word.as_str())
}

/// "apt 2b" → "Apt 2b"; "#4" stays as written.
fn format_unit(tokens: &[&str]) -> String {
    let mut out = Vec::with_capacity(tokens.len());
    for (i, token) in tokens.iter().enumerate() {
        if i == 0 && !token.starts_with('#') {
            let word = token.trim_end_matches('.');
            out.push(capitalize(word));
        } else {
            out.push((*token).to_string());
        }
    }
    out.join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.as_str().to_lowercase().chars()).collect(),
        None => String::new(),
    }
}
