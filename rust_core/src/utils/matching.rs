//! Name normalization and similarity scoring.
//!
//! Both functions are pure and total. Normalization is only ever applied to
//! comparison keys; stored display names are left untouched.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Score for an exact normalized match
pub const EXACT_SCORE: u8 = 100;

/// Ceiling for containment and token-overlap matches (always below exact)
pub const PARTIAL_CEILING: f64 = 90.0;

/// Letters that do not decompose under NFD and would otherwise be dropped.
fn fold_special(c: char) -> Option<&'static str> {
    match c {
        'ł' => Some("l"),
        'ø' => Some("o"),
        'æ' => Some("ae"),
        'œ' => Some("oe"),
        'ß' => Some("ss"),
        'đ' | 'ð' => Some("d"),
        'þ' => Some("th"),
        'ı' => Some("i"),
        _ => None,
    }
}

/// Canonicalize a name for comparison.
///
/// Lower-cases, strips diacritics, keeps only `[a-z0-9 ]` and collapses
/// whitespace. Idempotent.
pub fn normalize(raw: &str) -> String {
    let mut folded = String::with_capacity(raw.len());
    for c in raw.to_lowercase().nfd() {
        if is_combining_mark(c) {
            continue;
        }
        if let Some(replacement) = fold_special(c) {
            folded.push_str(replacement);
        } else if c.is_whitespace() {
            folded.push(' ');
        } else if c.is_ascii_lowercase() || c.is_ascii_digit() || c == ' ' {
            folded.push(c);
        }
    }

    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Significant tokens of a normalized string: length > 1, deduplicated,
/// source order preserved.
fn significant_tokens(normalized: &str) -> Vec<&str> {
    let mut tokens: Vec<&str> = Vec::new();
    for token in normalized.split_whitespace() {
        if token.len() > 1 && !tokens.contains(&token) {
            tokens.push(token);
        }
    }
    tokens
}

fn tokens_related(a: &str, b: &str) -> bool {
    a == b || a.contains(b) || b.contains(a)
}

/// One-to-one greedy token hits: each token of `left` claims the first
/// unclaimed related token of `right`.
fn token_hits(left: &[&str], right: &[&str]) -> usize {
    let mut used = vec![false; right.len()];
    let mut hits = 0;
    for l in left {
        if let Some(idx) = (0..right.len()).find(|&i| !used[i] && tokens_related(l, right[i])) {
            used[idx] = true;
            hits += 1;
        }
    }
    hits
}

/// Similarity of two names on a 0..=100 scale.
///
/// Cascade, cheapest and strictest first:
/// 1. exact normalized match: 100
/// 2. one contains the other: `len(shorter) / len(longer)` scaled to 90
/// 3. token overlap: matched tokens / larger token count, scaled to 90
///
/// Token overlap is evaluated in both directions and the larger hit count
/// is kept, so `similarity(a, b) == similarity(b, a)`.
pub fn similarity(a: &str, b: &str) -> u8 {
    let a = normalize(a);
    let b = normalize(b);

    if a.is_empty() || b.is_empty() {
        return 0;
    }

    if a == b {
        return EXACT_SCORE;
    }

    let (shorter, longer) = if a.len() <= b.len() { (&a, &b) } else { (&b, &a) };
    if longer.contains(shorter.as_str()) {
        let ratio = shorter.len() as f64 / longer.len() as f64;
        return (ratio * PARTIAL_CEILING).round() as u8;
    }

    let a_tokens = significant_tokens(&a);
    let b_tokens = significant_tokens(&b);
    if a_tokens.is_empty() || b_tokens.is_empty() {
        return 0;
    }

    let hits = token_hits(&a_tokens, &b_tokens).max(token_hits(&b_tokens, &a_tokens));
    let denominator = a_tokens.len().max(b_tokens.len());

    ((hits as f64 / denominator as f64) * PARTIAL_CEILING).round() as u8
}

// =============================================================================
// UNIT TESTS
// =============================================================================
