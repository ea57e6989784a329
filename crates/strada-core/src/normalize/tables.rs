//! Street-type and directional token tables
//!
//! The expansion tables are plain data so they can be unit-tested against
//! fixed vectors and revised without touching the normalization logic.
//! Long forms follow USPS Publication 28.

/// Table revision marker, bumped whenever entries change.
pub const TABLES_VERSION: &str = "2025.1";

/// Street-type variants mapped to their canonical long form (lowercase).
///
/// Canonical forms map to themselves so expansion is idempotent.
pub(crate) const STREET_TYPES: &[(&str, &str)] = &[
    // Street
    ("st", "street"),
    ("str", "street"),
    ("streets", "street"),
    ("street", "street"),
    // Avenue
    ("ave", "avenue"),
    ("av", "avenue"),
    ("avn", "avenue"),
    ("avenu", "avenue"),
    ("avnue", "avenue"),
    ("avenue", "avenue"),
    // Road
    ("rd", "road"),
    ("roads", "road"),
    ("road", "road"),
    // Boulevard
    ("blvd", "boulevard"),
    ("blv", "boulevard"),
    ("boul", "boulevard"),
    ("boulv", "boulevard"),
    ("boulevrd", "boulevard"),
    ("boulevard", "boulevard"),
    // Drive
    ("dr", "drive"),
    ("drv", "drive"),
    ("drives", "drive"),
    ("drive", "drive"),
    // Lane
    ("ln", "lane"),
    ("lanes", "lane"),
    ("lane", "lane"),
    // Place
    ("pl", "place"),
    ("places", "place"),
    ("place", "place"),
    // Court
    ("ct", "court"),
    ("crt", "court"),
    ("courts", "court"),
    ("court", "court"),
    // Parkway
    ("pkwy", "parkway"),
    ("pky", "parkway"),
    ("pkway", "parkway"),
    ("parkway", "parkway"),
    // Highway
    ("hwy", "highway"),
    ("hiway", "highway"),
    ("hiwy", "highway"),
    ("highways", "highway"),
    ("highway", "highway"),
    // Less common types kept in long form
    ("cir", "circle"),
    ("circle", "circle"),
    ("ter", "terrace"),
    ("terrace", "terrace"),
    ("way", "way"),
    ("trl", "trail"),
    ("trail", "trail"),
    ("path", "path"),
    ("walk", "walk"),
    ("aly", "alley"),
    ("alley", "alley"),
    ("plz", "plaza"),
    ("plaza", "plaza"),
    ("sq", "square"),
    ("square", "square"),
    ("loop", "loop"),
    ("ridge", "ridge"),
    ("run", "run"),
    ("crk", "creek"),
    ("creek", "creek"),
];

/// Directional variants mapped to their canonical token (lowercase).
pub(crate) const DIRECTIONALS: &[(&str, &str)] = &[
    ("n", "north"),
    ("no", "north"),
    ("north", "north"),
    ("s", "south"),
    ("so", "south"),
    ("south", "south"),
    ("e", "east"),
    ("east", "east"),
    ("w", "west"),
    ("west", "west"),
    ("ne", "northeast"),
    ("northeast", "northeast"),
    ("nw", "northwest"),
    ("northwest", "northwest"),
    ("se", "southeast"),
    ("southeast", "southeast"),
    ("sw", "southwest"),
    ("southwest", "southwest"),
];

/// Canonical long form for a street-type variant, if the token is one.
pub(crate) fn street_type_expansion(token: &str) -> Option<&'static str> {
    STREET_TYPES
        .iter()
        .find(|(variant, _)| *variant == token)
        .map(|(_, canonical)| *canonical)
}

/// Canonical form for a directional variant, if the token is one.
pub(crate) fn directional_expansion(token: &str) -> Option<&'static str> {
    DIRECTIONALS
        .iter()
        .find(|(variant, _)| *variant == token)
        .map(|(_, canonical)| *canonical)
}

/// True when the (lowercase) token is a street-type variant or long form.
pub(crate) fn is_street_type(token: &str) -> bool {
    street_type_expansion(token).is_some()
}

/// True when the (lowercase) token is a directional variant or long form.
pub(crate) fn is_directional(token: &str) -> bool {
    directional_expansion(token).is_some()
}
