//! Qualified-name helpers.
//!
//! Qualified names use `.` both between package segments and between an outer
//! type and its member types (`pkg.Outer.Inner`). Nothing here knows which
//! segments are packages; that is decided by the type solver.

/// Separator between qualified-name segments.
pub const SEPARATOR: char = '.';

/// Returns the last segment of a qualified name.
///
/// `java.util.List` → `List`, `List` → `List`.
pub fn simple_name(qualified: &str) -> &str {
    match qualified.rfind(SEPARATOR) {
        Some(pos) => &qualified[pos + 1..],
        None => qualified,
    }
}

/// Returns everything before the last segment, or `None` for a simple name.
///
/// `java.util.List` → `Some("java.util")`.
pub fn qualifier(qualified: &str) -> Option<&str> {
    qualified.rfind(SEPARATOR).map(|pos| &qualified[..pos])
}

/// Joins a (possibly empty) prefix and a simple name.
pub fn qualify(prefix: Option<&str>, simple: &str) -> String {
    match prefix {
        Some(prefix) if !prefix.is_empty() => {
            let mut out = String::with_capacity(prefix.len() + 1 + simple.len());
            out.push_str(prefix);
            out.push(SEPARATOR);
            out.push_str(simple);
            out
        }
        _ => simple.to_string(),
    }
}

/// Returns `true` if the name contains at least one separator.
pub fn is_qualified(name: &str) -> bool {
    name.contains(SEPARATOR)
}

/// Splits a qualified name into its segments, skipping empty ones.
pub fn segments(name: &str) -> impl Iterator<Item = &str> {
    name.split(SEPARATOR).filter(|s| !s.is_empty())
}

#[cfg(test)]
#[path = "../tests/names_tests.rs"]
mod tests;
