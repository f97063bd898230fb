//! Map and helper traits used throughout the crate.
//!
//! Elements and properties are declared dynamically in the header and their order
//! matters. This module provides the [`KeyMap`] alias (backed by
//! [`indexmap::IndexMap`]), the [`PropertySchema`] built on it, and small helper
//! traits used to keep names consistent.

use indexmap::IndexMap;
use super::ElementDef;
use super::PropertyDef;

/// Alias to reduce coupling with map implementation
pub type KeyMap<V> = IndexMap<String, V>;

/// Ordered property declarations of one element.
///
/// Iteration order is declaration order, and `get_index_of(name)` is the
/// position of that property inside every record.
pub type PropertySchema = KeyMap<PropertyDef>;

/// Convenience trait to assure consistency between map key and name attribute of stored element.
pub trait Addable<V: Key> {
    /// Stores a value under its own key.
    ///
    /// Returns `false` if the key was already taken; the old value is replaced in place.
    fn add(&mut self, new_value: V) -> bool;
}

impl<V: Key> Addable<V> for KeyMap<V> {
    fn add(&mut self, value: V) -> bool {
        self.insert(value.get_key(), value).is_none()
    }
}

/// Convenience trait to assure consistency between the key used for storage and the name of the element.
pub trait Key {
    /// Returns a key under which the element should be stored in a key-value store.
    fn get_key(&self) -> String;
}
impl Key for ElementDef {
    fn get_key(&self) -> String {
        self.name.clone()
    }
}

impl Key for PropertyDef {
    fn get_key(&self) -> String {
        self.name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ply::{ PropertyType, ScalarType };

    #[test]
    fn schema_keeps_declaration_order() {
        let mut schema = PropertySchema::new();
        for name in ["z", "x", "y"] {
            assert!(schema.add(PropertyDef::new(name.to_string(), PropertyType::Scalar(ScalarType::Float))));
        }
        assert_eq!(schema.get_index_of("z"), Some(0));
        assert_eq!(schema.get_index_of("x"), Some(1));
        assert_eq!(schema.get_index_of("y"), Some(2));
    }

    #[test]
    fn duplicate_key_is_reported() {
        let mut schema = PropertySchema::new();
        assert!(schema.add(PropertyDef::new("x".to_string(), PropertyType::Scalar(ScalarType::Float))));
        assert!(!schema.add(PropertyDef::new("x".to_string(), PropertyType::Scalar(ScalarType::Double))));
        assert_eq!(schema.len(), 1);
    }
}
