//! Foundation types for entity loading.
//!
//! This module provides the primitives used throughout the crate:
//! - [`EntityId`] - Handles to defined entities
//! - [`Name`], [`Interner`] - Entity-name interning
//! - Entity-name normalization and the shortest-form convention
//! - Identifier validation
//!
//! This module has NO dependencies on other crate modules.

mod entity_id;
mod ident;
mod intern;
mod name;

pub use entity_id::EntityId;
pub use ident::{is_entity_name, is_identifier};
pub use intern::{Interner, Name};
pub use name::{
    NAMESPACE_SEPARATOR, expanded_form, is_shortest_form, last_segment, normalize_base_directory,
    normalize_prefix, shortest_form, trim_leading_separators,
};

/// Generates a random (version 4) UUID in its hyphenated lowercase form.
///
/// ```
/// let id = autoload::base::uuid();
/// assert_eq!(id.len(), 36);
/// assert_eq!(id.as_bytes()[14], b'4');
/// ```
pub fn uuid() -> String {
    ::uuid::Uuid::new_v4().hyphenated().to_string()
}
