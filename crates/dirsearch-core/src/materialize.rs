//! Entry materializer — turns a [`RawEntry`] into a typed [`Person`].
//!
//! Attributes are resolved to fields through the [`SchemaRegistry`] in the
//! order the entry lists them. Unregistered attributes are skipped.

use crate::schema::SchemaRegistry;
use crate::types::{Person, RawEntry};

/// Build a [`Person`] from `entry`, consuming it.
///
/// The caller decides whether the result is acceptable; see
/// [`Person::has_surname`].
pub fn materialize(registry: &SchemaRegistry, entry: RawEntry) -> Person {
    let mut person = Person::new(entry.dn);
    for (attribute, values) in &entry.attributes {
        match registry.field_for(attribute) {
            Some(field) => person.apply(field, values),
            None => {
                tracing::trace!(dn = %person.dn, %attribute, "materialize: unmapped attribute ignored")
            }
        }
    }
    person
}
