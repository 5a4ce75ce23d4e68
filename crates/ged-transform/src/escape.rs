//! 5.5.1 at-sign escapes.
//!
//! | 5.5.1 text          | 7.0 text   |
//! |---------------------|------------|
//! | `@@`                | `@`        |
//! | `@#DJULIAN@ 1 JAN`  | `JULIAN 1 JAN` |
//! | `@#DFRENCH R@ AN 3` | `FRENCH_R AN 3` |
//! | `@#Xother@ text`    | `text`     |
//!
//! A `@` that starts no escape is kept as is.

use std::borrow::Cow;

/// Resolve at-sign escapes in a non-pointer value.
#[must_use]
pub fn unescape(value: &str) -> Cow<'_, str> {
    if !value.contains('@') {
        return Cow::Borrowed(value);
    }

    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(at) = rest.find('@') {
        out.push_str(&rest[..at]);
        let tail = &rest[at..];

        if let Some(after) = tail.strip_prefix("@@") {
            out.push('@');
            rest = after;
        } else if let Some(body_and_more) = tail.strip_prefix("@#")
            && let Some(close) = body_and_more.find('@')
        {
            let body = &body_and_more[..close];
            let after = &body_and_more[close + 1..];
            match body.strip_prefix(['D', 'd']) {
                Some(calendar) => {
                    out.push_str(&calendar.trim().to_uppercase().replace(' ', "_"));
                    rest = after;
                }
                // Unknown escapes vanish along with their delimiter.
                None => rest = after.strip_prefix(' ').unwrap_or(after),
            }
        } else {
            out.push('@');
            rest = &tail[1..];
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}
