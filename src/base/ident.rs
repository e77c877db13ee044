//! Identifier validation for entity-name segments.

use super::name::NAMESPACE_SEPARATOR;

/// Returns `true` if `id` is a valid identifier: `_` or an XID_Start
/// character, followed by XID_Continue characters.
pub fn is_identifier(id: &str) -> bool {
    let mut chars = id.chars();
    match chars.next() {
        Some(first) if first == '_' || unicode_ident::is_xid_start(first) => {
            chars.all(unicode_ident::is_xid_continue)
        }
        _ => false,
    }
}

/// Returns `true` if `name` is a well-formed fully-qualified entity name.
///
/// Every segment must be an identifier, so leading, trailing or doubled
/// separators are rejected.
pub fn is_entity_name(name: &str) -> bool {
    !name.is_empty() && name.split(NAMESPACE_SEPARATOR).all(is_identifier)
}
