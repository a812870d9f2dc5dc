//! Core runtime for relorm: entity models, values, the SQL builder, the
//! schema cache and the `Orm` facade, plus the ergonomics exported via the
//! `prelude`.

extern crate self as relorm;

// public exports are one module level down
pub mod builder;
pub mod cache;
pub mod config;
pub mod error;
pub mod executor;
pub mod manager;
pub mod model;
pub mod orm;
pub mod traits;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_support;

///
/// Prelude
///
/// Prelude contains only domain vocabulary and the facade.
/// No builders, caches or errors are re-exported here.
///

pub mod prelude {
    pub use crate::{
        manager::Manager,
        model::EntityModel,
        orm::Orm,
        traits::{Column, Entity, Record},
        value::Value,
    };
}
