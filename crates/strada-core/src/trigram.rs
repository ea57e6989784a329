//! Trigram similarity
//!
//! Lexical closeness via overlapping 3-character windows. Each whitespace
//! word is padded with boundary markers (two leading, one trailing) before
//! windowing, so even one-character words yield trigrams and word starts
//! weigh more than word interiors.
//!
//! Similarity is the Dice coefficient over trigram **multisets**: a shared
//! trigram counts up to the minimum multiplicity present on both sides, so
//! repeated substrings are rewarded proportionally without overcounting.

use ahash::AHashMap;

/// Word-boundary padding marker. A space cannot occur inside a word, so the
/// marker never collides with real characters.
const PAD: char = ' ';

/// Trigram multiplicities of a string.
pub(crate) type TrigramCounts = AHashMap<String, u32>;

/// All trigrams of a string, word-wise and boundary-padded, with repeats.
pub fn trigrams(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    for word in text.split_whitespace() {
        let padded: Vec<char> = std::iter::repeat(PAD)
            .take(2)
            .chain(word.chars())
            .chain(std::iter::once(PAD))
            .collect();
        for window in padded.windows(3) {
            out.push(window.iter().collect());
        }
    }
    out
}

/// Trigram multiset of a string as a count map.
pub(crate) fn trigram_counts(text: &str) -> TrigramCounts {
    let mut counts = TrigramCounts::new();
    for trigram in trigrams(text) {
        *counts.entry(trigram).or_insert(0) += 1;
    }
    counts
}

/// Dice similarity of two strings' trigram multisets, in `[0, 1]`.
///
/// Symmetric; 1.0 for identical non-empty strings; 0.0 when no trigram is
/// shared or either string is empty.
pub fn similarity(a: &str, b: &str) -> f64 {
    let counts_a = trigram_counts(a);
    let counts_b = trigram_counts(b);
    similarity_of_counts(&counts_a, &counts_b)
}

/// Dice similarity over precomputed count maps.
///
/// The engine computes the query's counts once and compares them against
/// every candidate through this.
pub(crate) fn similarity_of_counts(a: &TrigramCounts, b: &TrigramCounts) -> f64 {
    let total_a: u32 = a.values().sum();
    let total_b: u32 = b.values().sum();
    if total_a == 0 || total_b == 0 {
        return 0.0;
    }

    // Iterate the smaller side; intersection cannot exceed it.
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let shared: u32 = small
        .iter()
        .map(|(trigram, &count)| count.min(large.get(trigram).copied().unwrap_or(0)))
        .sum();

    f64::from(2 * shared) / f64::from(total_a + total_b)
}
