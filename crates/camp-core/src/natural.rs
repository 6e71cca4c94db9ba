//! Numeric-aware string ordering for names such as `Court 2` / `Court 10`.
//!
//! Names are compared with the Unicode collation algorithm (root locale) with
//! numeric ordering on: digit runs compare by value, accented letters sort next
//! to their base letter (`Álvaro` before `Bruno`), and spaces and punctuation
//! sort before digits (`Court 1` before `Court1`). Case is ignored by the
//! collator. Remaining ties fall back to case-insensitive, then raw, code-point
//! order, so two strings compare equal only when they are identical.

use std::cmp::Ordering;

use icu_collator::{Collator, CollatorOptions, Numeric, Strength};

thread_local! {
    static COLLATOR: Option<Collator> = build_collator();
}

/// Root-locale collator at secondary strength: base letters and accents
/// count, case does not.
fn build_collator() -> Option<Collator> {
    let mut options = CollatorOptions::new();
    options.strength = Some(Strength::Secondary);
    options.numeric = Some(Numeric::On);
    Collator::try_new(&Default::default(), options).ok()
}

fn collate(a: &str, b: &str) -> Ordering {
    COLLATOR.with(|collator| match collator {
        Some(collator) => collator.compare(a, b),
        None => Ordering::Equal,
    })
}

/// Compare two strings in natural order.
///
/// This is a total order: reflexive, antisymmetric and transitive, and
/// `Ordering::Equal` only for identical strings.
pub fn natural_compare(a: &str, b: &str) -> Ordering {
    collate(a, b)
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| a.cmp(b))
}

/// Sort `items` in natural order of the string returned by `key`.
pub fn sort_naturally<T, F>(items: &mut [T], key: F)
where
    F: Fn(&T) -> &str,
{
    items.sort_by(|a, b| natural_compare(key(a), key(b)));
}
