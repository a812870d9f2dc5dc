mod entity;
mod field;
mod info;
mod relation;
mod tag;


use crate::{error::OrmError, traits::Record};

// re-exports
pub use entity::EntityModel;
pub use field::{Depend, FieldDescriptor, FieldKind, FieldModel, FieldType};
pub use info::{FieldInfo, StructInfo};
pub use relation::RelationModel;
pub use tag::{FieldTag, TagError};

/// Describe a record and resolve every related model it reaches, leaves
/// first. Fails before anything is bound when a model in the closure is
/// malformed or two types claim one table.
pub fn introspect<'a>(
    record: &'a mut dyn Record,
) -> Result<(StructInfo<'a>, Vec<&'static EntityModel>), OrmError> {
    let dependencies = record.model().dependencies()?;
    let info = StructInfo::new(record)?;

    Ok((info, dependencies))
}
