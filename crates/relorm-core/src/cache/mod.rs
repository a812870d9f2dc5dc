mod memory;


use crate::{
    error::{ErrorClass, ErrorOrigin, OrmError},
    model::EntityModel,
};
use std::{fmt, sync::Arc, time::Duration};

// re-exports
pub use memory::MemoryCache;

///
/// MaxAge
/// Lifetime of a cached entry.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MaxAge {
    Forever,
    For(Duration),
}

///
/// KvCache
///
/// Concurrent key-value cache contract. Implementations must tolerate
/// concurrent readers and writers.
///

pub trait KvCache<V>: Send + Sync {
    fn put(&self, key: &str, value: V, max_age: MaxAge);

    fn fetch(&self, key: &str) -> Option<V>;

    fn remove(&self, key: &str);

    fn clear_all(&self);
}

///
/// SchemaWitness
///
/// Proof that a table's schema was ensured, together with the type that
/// owns the table.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SchemaWitness {
    pub table: String,
    pub name: String,
    pub origin: String,
}

impl SchemaWitness {
    #[must_use]
    pub fn for_model(model: &EntityModel) -> Self {
        Self {
            table: model.table_name(),
            name: model.name(),
            origin: model.origin(),
        }
    }

    /// Witness for a relation table, owned by the relation's owner type.
    #[must_use]
    pub fn for_relation(table: String, owner: &EntityModel) -> Self {
        Self {
            table,
            name: owner.name(),
            origin: owner.origin(),
        }
    }
}

///
/// StructInfoCache
///
/// Table name → schema witness. Entries never expire; they are dropped
/// only through `remove` or `reset`. Clones share the same backend.
///

#[derive(Clone)]
pub struct StructInfoCache {
    backend: Arc<dyn KvCache<SchemaWitness>>,
}

impl StructInfoCache {
    #[must_use]
    pub fn new() -> Self {
        Self::with_backend(Arc::new(MemoryCache::<SchemaWitness>::new()))
    }

    #[must_use]
    pub fn with_backend(backend: Arc<dyn KvCache<SchemaWitness>>) -> Self {
        Self { backend }
    }

    pub fn put(&self, witness: SchemaWitness) {
        let key = witness.table.clone();
        self.backend.put(&key, witness, MaxAge::Forever);
    }

    #[must_use]
    pub fn fetch(&self, table: &str) -> Option<SchemaWitness> {
        self.backend.fetch(table)
    }

    /// Fetch the witness for `table`, rejecting one owned by another type.
    pub fn check(&self, table: &str, origin: &str) -> Result<bool, OrmError> {
        match self.fetch(table) {
            Some(witness) if witness.origin == origin => Ok(true),
            Some(witness) => Err(OrmError::new(
                ErrorClass::ConflictingType,
                ErrorOrigin::Cache,
                format!(
                    "table '{table}' was ensured for '{}', not '{origin}'",
                    witness.origin
                ),
            )),
            None => Ok(false),
        }
    }

    pub fn remove(&self, table: &str) {
        self.backend.remove(table);
    }

    pub fn reset(&self) {
        self.backend.clear_all();
    }
}

impl Default for StructInfoCache {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StructInfoCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructInfoCache").finish_non_exhaustive()
    }
}
