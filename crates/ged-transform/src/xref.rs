//! Cross-reference identifier normalization.

use std::borrow::Cow;

/// Canonical spelling of an identifier (`@ID@`), defining or pointer.
///
/// With `case_insensitive` the identifier is upper-cased, so every spelling of
/// the same identifier collapses to one. Otherwise it is returned unchanged.
/// The result depends only on the input text.
#[must_use]
pub fn normalize_xref(xref: &str, case_insensitive: bool) -> Cow<'_, str> {
    if !case_insensitive {
        return Cow::Borrowed(xref);
    }
    let upper = xref.to_uppercase();
    if upper == xref {
        Cow::Borrowed(xref)
    } else {
        Cow::Owned(upper)
    }
}
