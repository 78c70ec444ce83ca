//! Small value helpers.

use std::collections::HashMap;
use std::hash::Hash;

/// Return `default` if `value` is empty or only whitespace.
///
/// ```rust
/// use retrykit::util::default_if_blank;
///
/// assert_eq!(default_if_blank("  ", "fallback"), "fallback");
/// assert_eq!(default_if_blank("set", "fallback"), "set");
/// ```
pub fn default_if_blank<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.trim().is_empty() { default } else { value }
}

/// Whether `value` equals its type's default.
///
/// Covers `None`, `0`, `""`, empty collections and structs whose fields are
/// all at their defaults.
pub fn is_zero<T: Default + PartialEq>(value: &T) -> bool {
    *value == T::default()
}

/// Whether two slices hold the same elements with the same multiplicities,
/// in any order.
pub fn slices_equal_unordered<T: Eq + Hash>(a: &[T], b: &[T]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut counts: HashMap<&T, usize> = HashMap::with_capacity(a.len());
    for item in a {
        *counts.entry(item).or_default() += 1;
    }
    for item in b {
        match counts.get_mut(item) {
            Some(count) if *count > 0 => *count -= 1,
            _ => return false,
        }
    }
    true
}
