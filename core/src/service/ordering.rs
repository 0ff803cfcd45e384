use std::cmp::Ordering;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Decomposed, mark-stripped, lowercased form used as the primary sort key.
fn fold(name: &str) -> String {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Accent- and case-insensitive comparison with the raw text as tie-break, so
/// `"Ángel"` sorts with the A's and `"ann"` before `"Bob"`.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    fold(a).cmp(&fold(b)).then_with(|| a.cmp(b))
}

/// Resource first, then project. Stable, so rows that tie keep insertion order.
pub fn sort_by_resource_then_project<T, F>(rows: &mut [T], fields: F)
where
    F: Fn(&T) -> (&str, &str),
{
    rows.sort_by(|a, b| {
        let (res_a, proj_a) = fields(a);
        let (res_b, proj_b) = fields(b);
        compare_names(res_a, res_b).then_with(|| compare_names(proj_a, proj_b))
    });
}
