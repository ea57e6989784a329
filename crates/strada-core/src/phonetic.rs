//! Soundex phonetic encoding
//!
//! Classic American Soundex: a 4-character code (first letter + 3 digits)
//! that collapses similar-sounding consonants, so "Main" and "Mane" or
//! "Robert" and "Rupert" encode identically. Used as a scoring signal next
//! to trigram similarity, which phonetic misspellings defeat.

use crate::normalize::{is_directional, is_street_type};

/// Consonant groups and their Soundex digits.
///
/// Letters absent from the table (vowels, h, w, y) emit no digit: h/w/y are
/// transparent and do not break a run of same-digit consonants, while
/// vowels reset the run so the digit may repeat.
const CODE_GROUPS: &[(&str, char)] = &[
    ("bfpv", '1'),
    ("cgjkqsxz", '2'),
    ("dt", '3'),
    ("l", '4'),
    ("mn", '5'),
    ("r", '6'),
];

/// Length of the emitted code: one letter plus three digits.
const CODE_LENGTH: usize = 4;

/// Soundex encoder.
///
/// Stateless; the digit table is the data above. All instances are
/// equivalent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Soundex;

impl Soundex {
    pub fn new() -> Self {
        Self
    }

    /// Encode a single token to its Soundex code.
    ///
    /// Non-ASCII-alphabetic characters are ignored; a token with no
    /// alphabetic characters encodes to the empty string. Identical input
    /// always yields an identical code.
    pub fn encode(&self, token: &str) -> String {
        let letters: Vec<char> = token
            .chars()
            .filter(char::is_ascii_alphabetic)
            .map(|c| c.to_ascii_lowercase())
            .collect();

        let Some(&first) = letters.first() else {
            return String::new();
        };

        let mut code = String::with_capacity(CODE_LENGTH);
        code.push(first.to_ascii_uppercase());

        // The first letter's digit counts for collapsing even though it is
        // emitted as a letter ("Pfister" → P236, not P1236).
        let mut last_digit = digit_of(first);

        for &c in &letters[1..] {
            if code.len() == CODE_LENGTH {
                break;
            }
            match digit_of(c) {
                Some(d) => {
                    if last_digit != Some(d) {
                        code.push(d);
                    }
                    last_digit = Some(d);
                }
                None => {
                    if !matches!(c, 'h' | 'w' | 'y') {
                        // vowel: the previous digit may repeat after it
                        last_digit = None;
                    }
                }
            }
        }

        while code.len() < CODE_LENGTH {
            code.push('0');
        }
        code
    }

    /// Encode the primary street-name token of a normalized street string.
    ///
    /// Directional and street-type tokens are skipped; they are compared
    /// separately by the scorer, and coding them would make "north main
    /// street" phonetically about "north". Returns `None` when no token
    /// remains (e.g. the query is a bare street type).
    pub fn encode_primary(&self, normalized_street: &str) -> Option<String> {
        normalized_street
            .split_whitespace()
            .find(|token| {
                !is_directional(token) && !is_street_type(token) && !is_house_number_like(token)
            })
            .map(|token| self.encode(token))
            .filter(|code| !code.is_empty())
    }
}

/// Soundex digit for a letter, or `None` for vowels and h/w/y.
fn digit_of(c: char) -> Option<char> {
    CODE_GROUPS
        .iter()
        .find(|(letters, _)| letters.contains(c))
        .map(|&(_, d)| d)
}

/// True for tokens that start with a digit (house numbers, ranges).
fn is_house_number_like(token: &str) -> bool {
    token.chars().next().is_some_and(|c| c.is_ascii_digit())
}
