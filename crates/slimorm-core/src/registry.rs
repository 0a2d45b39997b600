//! Explicit registry of declared record types, keyed by type name.

use crate::errors::{OrmError, Result};
use crate::record_type::RecordType;
use indexmap::IndexMap;
use std::sync::Arc;

/// Name-keyed registry of record types
///
/// Re-declaring a known name returns the existing type object. Registering
/// a different definition under a taken name is an error.
#[derive(Debug, Default)]
pub struct Registry {
    types: IndexMap<String, Arc<RecordType>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the type registered under `name`, declaring it with defaults
    /// (underscored table, `id` key) if it is not known yet.
    pub fn declare(&mut self, name: &str) -> Arc<RecordType> {
        self.types
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(RecordType::new(name)))
            .clone()
    }

    /// Register an explicitly built type
    ///
    /// Returns the already registered object when an identical definition
    /// exists under the same name.
    pub fn register(&mut self, record_type: RecordType) -> Result<Arc<RecordType>> {
        if let Some(existing) = self.types.get(record_type.name()) {
            if **existing == record_type {
                return Ok(existing.clone());
            }
            return Err(OrmError::RecordTypeConflict {
                name: record_type.name().to_string(),
            });
        }

        tracing::debug!(
            record_type = record_type.name(),
            table = record_type.table(),
            "registered record type"
        );
        let record_type = Arc::new(record_type);
        self.types
            .insert(record_type.name().to_string(), record_type.clone());
        Ok(record_type)
    }

    pub fn get(&self, name: &str) -> Option<Arc<RecordType>> {
        self.types.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Registered type names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declare_is_idempotent() {
        let mut registry = Registry::new();
        let a = registry.declare("Posts");
        let b = registry.declare("Posts");
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(registry.len(), 1);
        assert_eq!(a.table(), "posts");
    }

    #[test]
    fn test_register_identical_returns_existing() {
        let mut registry = Registry::new();
        let a = registry
            .register(RecordType::new("Person").with_table("people"))
            .unwrap();
        let b = registry
            .register(RecordType::new("Person").with_table("people"))
            .unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_register_conflict() {
        let mut registry = Registry::new();
        registry.declare("Person");
        let err = registry
            .register(RecordType::new("Person").with_table("people"))
            .unwrap_err();
        assert_eq!(
            err,
            OrmError::RecordTypeConflict {
                name: "Person".to_string()
            }
        );
    }

    #[test]
    fn test_declare_after_register_returns_registered() {
        let mut registry = Registry::new();
        registry
            .register(RecordType::new("Person").with_primary_key("pid"))
            .unwrap();
        assert_eq!(registry.declare("Person").primary_key(), "pid");
    }

    #[test]
    fn test_names_in_registration_order() {
        let mut registry = Registry::new();
        registry.declare("Users");
        registry.declare("Posts");
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["Users", "Posts"]);
        assert!(registry.get("Users").is_some());
        assert!(registry.get("Cats").is_none());
    }
}
