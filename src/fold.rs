//! Case folding for language-tag identity.
//!
//! Tags are compared case-insensitively for map-key identity and
//! case-sensitively for exact value equality; these helpers are the single
//! definition of the insensitive half.

/// Unicode-aware fold of a language tag. Full `char::to_lowercase`, so
/// one-to-many mappings expand.
#[inline]
pub fn case_fold(tag: &str) -> String {
    tag.chars().flat_map(char::to_lowercase).collect()
}

/// Allocation-free equality under [`case_fold`].
#[inline]
pub fn eq_fold(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

/// `true` when the tag is already in folded form.
#[inline]
pub fn is_folded(tag: &str) -> bool {
    tag.chars().all(|c| c.to_lowercase().next() == Some(c))
}
