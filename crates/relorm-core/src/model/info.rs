use crate::{
    error::{ErrorOrigin, OrmError},
    model::{EntityModel, FieldDescriptor, FieldTag, FieldType},
    traits::Record,
    value::{FieldValue, Value},
};

///
/// StructInfo
///
/// Live descriptor of one record: its model plus every field bound to the
/// record's storage. Holds the record's mutable borrow for `'a`.
///

pub struct StructInfo<'a> {
    model: &'static EntityModel,
    fields: Vec<FieldInfo<'a>>,
    primary_key: Option<usize>,
}

impl<'a> StructInfo<'a> {
    pub fn new(record: &'a mut dyn Record) -> Result<Self, OrmError> {
        let model = record.model();
        let descriptors = model.describe()?;
        let columns = record.columns_mut();

        if columns.len() != descriptors.len() {
            return Err(OrmError::invalid_argument(
                ErrorOrigin::Model,
                format!(
                    "{} exposes {} columns for {} declared fields",
                    model.name(),
                    columns.len(),
                    descriptors.len()
                ),
            ));
        }

        let primary_key = descriptors.iter().position(FieldDescriptor::is_primary_key);
        let fields = descriptors
            .into_iter()
            .zip(columns)
            .map(|(descriptor, column)| FieldInfo {
                descriptor,
                value: FieldValue::new(column),
            })
            .collect();

        Ok(Self {
            model,
            fields,
            primary_key,
        })
    }

    #[must_use]
    pub const fn model(&self) -> &'static EntityModel {
        self.model
    }

    #[must_use]
    pub fn name(&self) -> String {
        self.model.name()
    }

    #[must_use]
    pub const fn path(&self) -> &'static str {
        self.model.path
    }

    #[must_use]
    pub fn table_name(&self) -> String {
        self.model.table_name()
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldInfo<'a>] {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut [FieldInfo<'a>] {
        &mut self.fields
    }

    /// Fields stored as columns of this record's table.
    pub fn columns(&self) -> impl Iterator<Item = &FieldInfo<'a>> {
        self.fields.iter().filter(|field| field.is_column())
    }

    /// Fields persisted through relation tables.
    pub fn relations(&self) -> impl Iterator<Item = &FieldInfo<'a>> {
        self.fields.iter().filter(|field| field.is_relation())
    }

    #[must_use]
    pub fn primary_key(&self) -> Option<&FieldInfo<'a>> {
        self.primary_key.map(|index| &self.fields[index])
    }

    pub fn primary_key_mut(&mut self) -> Option<&mut FieldInfo<'a>> {
        self.primary_key.map(|index| &mut self.fields[index])
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldInfo<'a>> {
        self.fields.iter().find(|field| field.name() == name)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut FieldInfo<'a>> {
        self.fields.iter_mut().find(|field| field.name() == name)
    }

    /// Assign through the named field's accessor.
    pub fn set_field_value(&mut self, name: &str, value: Value) -> Result<(), OrmError> {
        let entity = self.name();
        let field = self.field_mut(name).ok_or_else(|| {
            OrmError::invalid_argument(ErrorOrigin::Model, format!("{entity} has no field '{name}'"))
        })?;

        field.set_value(value)
    }

    /// Literal of the primary key, failing when there is no key field or
    /// the key is nil.
    pub fn primary_key_literal(&self) -> Result<String, OrmError> {
        self.primary_key()
            .map(FieldInfo::get_value_str)
            .transpose()?
            .flatten()
            .ok_or_else(|| OrmError::missing_primary_key(ErrorOrigin::Model, &self.name()))
    }
}

///
/// FieldInfo
/// One declared field bound to live storage.
///

pub struct FieldInfo<'a> {
    descriptor: FieldDescriptor,
    value: FieldValue<'a>,
}

impl<'a> FieldInfo<'a> {
    #[must_use]
    pub const fn index(&self) -> usize {
        self.descriptor.index
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.descriptor.name
    }

    #[must_use]
    pub const fn tag(&self) -> &FieldTag {
        &self.descriptor.tag
    }

    #[must_use]
    pub fn column(&self) -> &str {
        self.descriptor.column()
    }

    #[must_use]
    pub const fn field_type(&self) -> &FieldType {
        &self.descriptor.field_type
    }

    #[must_use]
    pub const fn descriptor(&self) -> &FieldDescriptor {
        &self.descriptor
    }

    #[must_use]
    pub const fn value(&self) -> &FieldValue<'a> {
        &self.value
    }

    pub const fn value_mut(&mut self) -> &mut FieldValue<'a> {
        &mut self.value
    }

    #[must_use]
    pub const fn is_primary_key(&self) -> bool {
        self.descriptor.is_primary_key()
    }

    #[must_use]
    pub const fn is_auto_increment(&self) -> bool {
        self.descriptor.is_auto_increment()
    }

    #[must_use]
    pub const fn is_column(&self) -> bool {
        self.descriptor.is_column()
    }

    #[must_use]
    pub const fn is_relation(&self) -> bool {
        self.descriptor.field_type.is_relation()
    }

    /// Nil pointer that has not been assigned yet.
    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.descriptor.field_type.nullable && self.value.is_nil()
    }

    #[must_use]
    pub fn dependency(&self) -> Option<&'static EntityModel> {
        self.descriptor.field_type.dependency()
    }

    pub fn get_value_str(&self) -> Result<Option<String>, OrmError> {
        Ok(self.value.get_value_str()?)
    }

    pub fn set_value(&mut self, value: Value) -> Result<(), OrmError> {
        Ok(self.value.set_value(value)?)
    }

    /// Related records reachable through this field, for writing.
    pub fn get_depend(&mut self) -> Vec<&mut dyn Record> {
        self.value.get_depend()
    }
}
