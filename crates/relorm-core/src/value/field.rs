use crate::{
    traits::{Column, Record},
    value::{Value, ValueError},
};

///
/// FieldValue
///
/// Live accessor over one field's storage. Never owns data; every read and
/// write goes through the bound column.
///

pub struct FieldValue<'a> {
    column: &'a mut dyn Column,
}

impl<'a> FieldValue<'a> {
    pub const fn new(column: &'a mut dyn Column) -> Self {
        Self { column }
    }

    #[must_use]
    pub fn get_value(&self) -> Value {
        self.column.get_value()
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.get_value().is_nil()
    }

    /// SQL literal of the current value, `None` while the field is nil.
    pub fn get_value_str(&self) -> Result<Option<String>, ValueError> {
        self.column.get_value().to_literal()
    }

    /// Coerce `value` into the bound storage. A nil pointer materializes
    /// on the first successful assignment.
    pub fn set_value(&mut self, value: Value) -> Result<(), ValueError> {
        self.column.set_value(value)
    }

    /// Related records for traversal: one for a struct field, every element
    /// for a slice of structs, none otherwise.
    pub fn get_depend(&mut self) -> Vec<&mut dyn Record> {
        self.column.records_mut()
    }

    #[must_use]
    pub fn depend_refs(&self) -> Vec<&dyn Record> {
        self.column.records()
    }
}
