use std::cmp::Ordering;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

fn fold(value: &str) -> String {
    value.nfkd().filter(|ch| !is_combining_mark(*ch)).flat_map(char::to_lowercase).collect()
}

/// Accent- and case-insensitive ordering, falling back to the raw strings so that
/// distinct inputs never compare equal.
pub(crate) fn compare_text(lhs: &str, rhs: &str) -> Ordering {
    fold(lhs).cmp(&fold(rhs)).then_with(|| lhs.cmp(rhs))
}

/// Case-insensitive containment on folded text.
pub(crate) fn contains_folded(haystack: &str, needle: &str) -> bool {
    fold(haystack).contains(&fold(needle))
}
