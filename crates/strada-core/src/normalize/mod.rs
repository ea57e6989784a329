//! Street string normalization
//!
//! Canonicalizes free-text street strings so that the same street spelled
//! differently ("N Main St", "north main street") lands on one form before
//! trigram and phonetic comparison. Normalization is total and idempotent:
//! every input maps to some deterministic output, and re-normalizing an
//! already-normalized string is a no-op.

mod tables;

pub use tables::TABLES_VERSION;

pub(crate) use tables::{is_directional, is_street_type};

/// Street string normalizer.
///
/// Owns the street-type and directional expansion tables (see
/// [`tables::TABLES_VERSION`]). Stateless otherwise; cheap to share.
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer;

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    /// Normalize a street string.
    ///
    /// Steps, in order:
    /// 1. lowercase
    /// 2. strip punctuation: apostrophes vanish ("o'brien" → "obrien"),
    ///    hyphens survive between alphanumerics (house ranges like "12-14"),
    ///    everything else becomes a token break
    /// 3. canonicalize a directional first or last token ("n" → "north")
    /// 4. expand street-type abbreviations ("st" → "street") anywhere except
    ///    a leading token, which may be a name word ("St Charles")
    /// 5. collapse whitespace and trim
    ///
    /// `normalize(normalize(x)) == normalize(x)` holds for all inputs; empty
    /// input normalizes to the empty string.
    pub fn normalize(&self, text: &str) -> String {
        let cleaned = strip_punctuation(text);
        let tokens: Vec<&str> = cleaned.split_whitespace().collect();
        let count = tokens.len();

        let mut out: Vec<&str> = Vec::with_capacity(count);
        for (i, token) in tokens.iter().enumerate() {
            let edge = i == 0 || i + 1 == count;
            if edge {
                if let Some(dir) = tables::directional_expansion(token) {
                    out.push(dir);
                    continue;
                }
            }
            // A leading token in a multi-word string is a name word, not a
            // type suffix ("St Charles" stays "st charles").
            if i > 0 || count == 1 {
                if let Some(street_type) = tables::street_type_expansion(token) {
                    out.push(street_type);
                    continue;
                }
            }
            out.push(token);
        }

        out.join(" ")
    }
}

/// Lowercase and reduce to alphanumerics, kept hyphens, and spaces.
fn strip_punctuation(text: &str) -> String {
    let lower = text.to_lowercase();
    let chars: Vec<char> = lower.chars().collect();
    let mut out = String::with_capacity(lower.len());

    for (i, &c) in chars.iter().enumerate() {
        if c.is_alphanumeric() {
            out.push(c);
        } else if c == '\'' || c == '\u{2019}' {
            // dropped entirely so "o'brien" matches "obrien"
        } else if c == '-'
            && i > 0
            && chars[i - 1].is_alphanumeric()
            && chars.get(i + 1).is_some_and(|n| n.is_alphanumeric())
        {
            out.push('-');
        } else {
            out.push(' ');
        }
    }

    out
}
