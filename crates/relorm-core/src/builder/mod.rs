mod mysql;


use crate::{
    error::{ErrorOrigin, OrmError},
    model::{EntityModel, FieldInfo, RelationModel, StructInfo},
    traits::{Record, primary_key_value},
};

// re-exports
pub use mysql::MysqlBuilder;

///
/// Builder
///
/// SQL dialect. Every method is pure: table and column names are derived
/// from the model on each call and values are embedded as literals.
///

pub trait Builder {
    /// Table name of a model: qualified name with `.` replaced by `_`.
    fn table_name(&self, model: &EntityModel) -> String {
        model.table_name()
    }

    /// Junction table name: `{ownerTable}{field}2{dependencyTable}`.
    fn relation_table_name(&self, relation: &RelationModel) -> String {
        format!(
            "{}{}2{}",
            self.table_name(relation.owner),
            relation.field,
            self.table_name(relation.dependency)
        )
    }

    fn build_create_schema(&self, model: &EntityModel) -> Result<String, OrmError>;

    fn build_create_relation_schema(&self, relation: &RelationModel) -> String;

    fn build_drop_schema(&self, model: &EntityModel) -> String;

    fn build_drop_relation_schema(&self, relation: &RelationModel) -> String;

    fn build_insert(&self, info: &StructInfo<'_>) -> Result<String, OrmError>;

    fn build_update(&self, info: &StructInfo<'_>) -> Result<String, OrmError>;

    fn build_delete(&self, info: &StructInfo<'_>) -> Result<String, OrmError>;

    fn build_query(&self, info: &StructInfo<'_>) -> Result<String, OrmError>;

    /// Link row between `owner` and one record held by `field`.
    fn build_insert_relation(
        &self,
        owner: &StructInfo<'_>,
        field: &FieldInfo<'_>,
        dependency: &dyn Record,
    ) -> Result<String, OrmError>;

    fn build_delete_relation(
        &self,
        owner: &StructInfo<'_>,
        field: &FieldInfo<'_>,
        dependency: &dyn Record,
    ) -> Result<String, OrmError>;

    /// Remove every link of `owner` through `field`.
    fn build_clear_relation(
        &self,
        owner: &StructInfo<'_>,
        field: &FieldInfo<'_>,
    ) -> Result<String, OrmError>;

    /// Select the related keys linked to `owner` through `field`.
    fn build_query_relation(
        &self,
        owner: &StructInfo<'_>,
        field: &FieldInfo<'_>,
    ) -> Result<String, OrmError>;
}

///
/// Helpers
///

/// Columns an UPDATE may set: stored columns other than the primary key.
pub fn updatable_columns<'s, 'a>(
    info: &'s StructInfo<'a>,
) -> impl Iterator<Item = &'s FieldInfo<'a>> {
    info.columns().filter(|field| !field.is_primary_key())
}

/// Relation declared by `field` on the owner, or `InvalidArgument`.
pub(crate) fn relation_of(
    owner: &StructInfo<'_>,
    field: &FieldInfo<'_>,
) -> Result<RelationModel, OrmError> {
    RelationModel::of(owner.model(), field.descriptor()).ok_or_else(|| {
        OrmError::invalid_argument(
            ErrorOrigin::Builder,
            format!("{}.{} is not a relation field", owner.name(), field.name()),
        )
    })
}

/// Primary key literal of a related record.
pub(crate) fn record_key_literal(record: &dyn Record) -> Result<String, OrmError> {
    primary_key_value(record)
        .to_literal()?
        .ok_or_else(|| OrmError::missing_primary_key(ErrorOrigin::Builder, &record.model().name()))
}
