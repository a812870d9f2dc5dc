//! ## Crate layout
//! - `core`: entity models, values, the SQL builder, the schema cache and
//!   the `Orm` facade.
//! - `Entity`: derive macro that describes a record type at compile time.
//!
//! The `prelude` module mirrors what application code needs to declare
//! entities and run them through a `Manager` or an `Orm`.

pub use relorm_core as core;
pub use relorm_derive::Entity;

// the derive emits `::relorm::...` paths
pub use relorm_core::{
    builder, cache, config, error, executor, manager, model, orm, traits, value,
};

/// re-exports
///
/// entity fields use these types, stops the user having to add the
/// dependencies to the Cargo.toml file manually
pub mod __reexports {
    pub use time;
}

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use relorm_core::error::OrmError as Error;

///
/// Prelude
/// the derive and the trait share the `Entity` name in separate namespaces
///

pub mod prelude {
    pub use crate::Entity;
    pub use crate::core::{
        config::{OrmConfig, ServerConfig},
        executor::{Connector, DriverError, Executor},
        manager::Manager,
        orm::Orm,
        traits::{Column, Entity, Record},
        value::Value,
    };
    pub use time::PrimitiveDateTime;
}
