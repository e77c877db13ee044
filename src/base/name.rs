//! Entity-name primitives.
//!
//! Entity names are hierarchical, with segments separated by
//! [`NAMESPACE_SEPARATOR`] (`Foo\Bar\Baz`). Base directories are plain
//! filesystem paths using the platform separator.
//!
//! The shortest-form helpers encode the container convention: an entity
//! named `X\Y\Y` may also be referred to as `X\Y`.

use std::path::MAIN_SEPARATOR;

/// Separator between the segments of an entity name.
pub const NAMESPACE_SEPARATOR: char = '\\';

/// Normalizes a namespace prefix so it ends with exactly one separator and
/// has no leading separator.
///
/// `"Foo"`, `"Foo\\"` and `"\\Foo\\"` all normalize to `"Foo\\"`.
pub fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim_matches(NAMESPACE_SEPARATOR);
    let mut normalized = String::with_capacity(trimmed.len() + 1);
    normalized.push_str(trimmed);
    normalized.push(NAMESPACE_SEPARATOR);
    normalized
}

/// Normalizes a base directory so it ends with exactly one platform path
/// separator.
pub fn normalize_base_directory(directory: &str) -> String {
    let trimmed = directory.trim_end_matches(MAIN_SEPARATOR);
    let mut normalized = String::with_capacity(trimmed.len() + 1);
    normalized.push_str(trimmed);
    normalized.push(MAIN_SEPARATOR);
    normalized
}

/// Strips any leading separators (`\Foo\Bar` -> `Foo\Bar`).
#[inline]
pub fn trim_leading_separators(name: &str) -> &str {
    name.trim_start_matches(NAMESPACE_SEPARATOR)
}

/// The final segment of a name, or the whole name if it has no separator.
pub fn last_segment(name: &str) -> &str {
    match name.rfind(NAMESPACE_SEPARATOR) {
        Some(pos) => &name[pos + 1..],
        None => name,
    }
}

/// Returns the shortest form of an entity name.
///
/// When the last two segments are identical the final one is dropped,
/// otherwise the name is returned unchanged:
///
/// ```
/// use autoload::base::shortest_form;
///
/// assert_eq!(shortest_form("Foo\\Bar\\Bar"), "Foo\\Bar");
/// assert_eq!(shortest_form("Foo\\Bar"), "Foo\\Bar");
/// assert_eq!(shortest_form("Foo"), "Foo");
/// ```
pub fn shortest_form(name: &str) -> &str {
    let Some(last_sep) = name.rfind(NAMESPACE_SEPARATOR) else {
        return name;
    };
    let head = &name[..last_sep];
    let last = &name[last_sep + 1..];

    if last_segment(head) == last {
        head
    } else {
        name
    }
}

/// Whether a name cannot be shortened any further.
#[inline]
pub fn is_shortest_form(name: &str) -> bool {
    shortest_form(name) == name
}

/// The expanded (non-shortened) form of a name: the name followed by a
/// copy of its final segment (`X\Y` -> `X\Y\Y`).
///
/// Top-level names have no expanded form.
pub fn expanded_form(name: &str) -> Option<String> {
    name.rfind(NAMESPACE_SEPARATOR)?;

    let last = last_segment(name);
    let mut expanded = String::with_capacity(name.len() + last.len() + 1);
    expanded.push_str(name);
    expanded.push(NAMESPACE_SEPARATOR);
    expanded.push_str(last);
    Some(expanded)
}
