mod column;


use crate::{
    model::{Depend, EntityModel, FieldKind, FieldType},
    value::{Value, ValueError},
};
use std::any::type_name;

// ============================================================================
// STORAGE TRAITS
// ============================================================================
//
// A record is a set of columns; an entity is a record with a static model.
// `Column` is object-safe so field accessors can hold `&mut dyn Column`.
//

///
/// Column
/// Storage for one field, readable and writable through `Value`.
///

pub trait Column {
    /// Classification of the implementing type.
    fn field_type() -> FieldType
    where
        Self: Sized;

    fn from_value(value: Value) -> Result<Self, ValueError>
    where
        Self: Sized;

    fn get_value(&self) -> Value;

    fn set_value(&mut self, value: Value) -> Result<(), ValueError>;

    /// Related records held by this column.
    fn records(&self) -> Vec<&dyn Record> {
        Vec::new()
    }

    fn records_mut(&mut self) -> Vec<&mut dyn Record> {
        Vec::new()
    }
}

///
/// Element
/// Types allowed as `Vec` elements: scalars and entities, never lists.
///

pub trait Element: Column {}

///
/// Record
/// Object-safe view of a derived entity.
///

pub trait Record {
    fn model(&self) -> &'static EntityModel;

    fn columns(&self) -> Vec<&dyn Column>;

    fn columns_mut(&mut self) -> Vec<&mut dyn Column>;
}

///
/// Entity
/// Record type with a compile-time model; implemented by `#[derive(Entity)]`.
///

pub trait Entity: Record + Element + Default + 'static {
    const MODEL: &'static EntityModel;

    #[must_use]
    fn entity_model() -> &'static EntityModel {
        Self::MODEL
    }
}

// ============================================================================
// DERIVE SUPPORT
// ============================================================================
//
// An entity used as a field stores only the related row's key; these
// helpers back the `Column` impl emitted for every entity.
//

#[doc(hidden)]
#[must_use]
pub fn entity_field_type<E: Entity>() -> FieldType {
    FieldType::relation(
        FieldKind::Struct,
        type_name::<E>(),
        Depend::new(E::entity_model),
    )
}

#[doc(hidden)]
#[must_use]
pub fn entity_get_value(record: &dyn Record) -> Value {
    let key = record
        .model()
        .primary_key_index()
        .and_then(|index| record.columns().get(index).map(|column| column.get_value()))
        .unwrap_or(Value::Nil);

    Value::Struct(Box::new(key))
}

#[doc(hidden)]
pub fn entity_set_value(record: &mut dyn Record, value: Value) -> Result<(), ValueError> {
    let index = record
        .model()
        .primary_key_index()
        .ok_or(ValueError::MissingPrimaryKey)?;

    match record.columns_mut().into_iter().nth(index) {
        Some(column) => column.set_value(value.into_key()),
        None => Err(ValueError::MissingPrimaryKey),
    }
}

#[doc(hidden)]
pub fn entity_from_value<E: Entity>(value: Value) -> Result<E, ValueError> {
    let mut entity = E::default();
    entity_set_value(&mut entity, value)?;

    Ok(entity)
}

/// Primary key value of any record, `Nil` when absent.
#[must_use]
pub fn primary_key_value(record: &dyn Record) -> Value {
    entity_get_value(record).into_key()
}
