use crate::{
    builder::{Builder, record_key_literal, relation_of, updatable_columns},
    error::{ErrorOrigin, OrmError},
    model::{EntityModel, FieldDescriptor, FieldInfo, FieldKind, RelationModel, StructInfo},
    traits::Record,
};

///
/// MysqlBuilder
/// MySQL dialect.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct MysqlBuilder;

impl MysqlBuilder {
    /// Column type for a stored kind; relation kinds have none.
    #[must_use]
    pub const fn column_type(kind: FieldKind) -> Option<&'static str> {
        let ty = match kind {
            FieldKind::Bool | FieldKind::Int8 => "TINYINT",
            FieldKind::Int16 | FieldKind::Uint8 => "SMALLINT",
            FieldKind::Int32 | FieldKind::Uint16 => "INT",
            FieldKind::Int64
            | FieldKind::Int
            | FieldKind::Uint32
            | FieldKind::Uint64
            | FieldKind::Uint => "BIGINT",
            FieldKind::Float => "FLOAT",
            FieldKind::Double => "DOUBLE",
            FieldKind::String | FieldKind::Slice => "TEXT",
            FieldKind::DateTime => "DATETIME",
            FieldKind::Struct | FieldKind::SliceStruct => return None,
        };

        Some(ty)
    }

    fn declare(column: &str, ty: &str, auto_increment: bool) -> String {
        let auto = if auto_increment { "AUTO_INCREMENT" } else { "" };

        format!("`{column}` {ty} NOT NULL {auto}")
    }

    fn declare_field(model: &EntityModel, field: &FieldDescriptor) -> Result<String, OrmError> {
        let ty = Self::column_type(field.field_type.kind).ok_or_else(|| {
            OrmError::invalid_argument(
                ErrorOrigin::Builder,
                format!("{}.{} has no column type", model.name(), field.name),
            )
        })?;

        Ok(Self::declare(field.column(), ty, field.is_auto_increment()))
    }

    fn create_table(table: &str, lines: &[String]) -> String {
        format!("CREATE TABLE `{table}` (\n\t{}\n)\n", lines.join(",\n\t"))
    }

    /// `pk`=literal clause, failing when the key field or its value is
    /// missing.
    fn key_clause(info: &StructInfo<'_>) -> Result<String, OrmError> {
        let key = info
            .primary_key()
            .ok_or_else(|| OrmError::missing_primary_key(ErrorOrigin::Builder, &info.name()))?;
        let literal = info.primary_key_literal()?;

        Ok(format!("`{}`={literal}", key.column()))
    }
}

impl Builder for MysqlBuilder {
    fn build_create_schema(&self, model: &EntityModel) -> Result<String, OrmError> {
        let fields = model.describe()?;
        let mut lines = fields
            .iter()
            .filter(|field| field.is_column())
            .map(|field| Self::declare_field(model, field))
            .collect::<Result<Vec<_>, _>>()?;

        if lines.is_empty() {
            return Err(OrmError::invalid_argument(
                ErrorOrigin::Builder,
                format!("{} has no stored columns", model.name()),
            ));
        }
        if let Some(key) = fields.iter().find(|field| field.is_primary_key()) {
            lines.push(format!("PRIMARY KEY (`{}`)", key.column()));
        }

        Ok(Self::create_table(&self.table_name(model), &lines))
    }

    fn build_create_relation_schema(&self, relation: &RelationModel) -> String {
        format!(
            "CREATE TABLE `{}` (\n\
             \t`id` INT NOT NULL AUTO_INCREMENT,\n\
             \t`left` INT NOT NULL,\n\
             \t`right` INT NOT NULL,\n\
             \tPRIMARY KEY (`id`)\n\
             )\n",
            self.relation_table_name(relation)
        )
    }

    fn build_drop_schema(&self, model: &EntityModel) -> String {
        format!("DROP TABLE IF EXISTS `{}`", self.table_name(model))
    }

    fn build_drop_relation_schema(&self, relation: &RelationModel) -> String {
        format!(
            "DROP TABLE IF EXISTS `{}`",
            self.relation_table_name(relation)
        )
    }

    fn build_insert(&self, info: &StructInfo<'_>) -> Result<String, OrmError> {
        let mut columns = Vec::new();
        let mut values = Vec::new();

        for field in info.columns() {
            if field.is_auto_increment() {
                continue;
            }
            // nil pointers are left to the column default
            let Some(literal) = field.get_value_str()? else {
                continue;
            };
            columns.push(format!("`{}`", field.column()));
            values.push(literal);
        }

        Ok(format!(
            "INSERT INTO `{}` ({}) VALUES ({})",
            self.table_name(info.model()),
            columns.join(","),
            values.join(",")
        ))
    }

    fn build_update(&self, info: &StructInfo<'_>) -> Result<String, OrmError> {
        let key = Self::key_clause(info)?;
        let mut assignments = Vec::new();

        for field in updatable_columns(info) {
            if let Some(literal) = field.get_value_str()? {
                assignments.push(format!("`{}`={literal}", field.column()));
            }
        }

        if assignments.is_empty() {
            return Err(OrmError::invalid_argument(
                ErrorOrigin::Builder,
                format!("{} has no columns to update", info.name()),
            ));
        }

        Ok(format!(
            "UPDATE `{}` SET {} WHERE {key}",
            self.table_name(info.model()),
            assignments.join(",")
        ))
    }

    fn build_delete(&self, info: &StructInfo<'_>) -> Result<String, OrmError> {
        let key = Self::key_clause(info)?;

        Ok(format!(
            "DELETE FROM `{}` WHERE {key}",
            self.table_name(info.model())
        ))
    }

    fn build_query(&self, info: &StructInfo<'_>) -> Result<String, OrmError> {
        let key = Self::key_clause(info)?;
        let columns = info
            .columns()
            .map(|field| format!("`{}`", field.column()))
            .collect::<Vec<_>>();

        Ok(format!(
            "SELECT {} FROM `{}` WHERE {key}",
            columns.join(","),
            self.table_name(info.model())
        ))
    }

    fn build_insert_relation(
        &self,
        owner: &StructInfo<'_>,
        field: &FieldInfo<'_>,
        dependency: &dyn Record,
    ) -> Result<String, OrmError> {
        let relation = relation_of(owner, field)?;
        let left = owner.primary_key_literal()?;
        let right = record_key_literal(dependency)?;

        Ok(format!(
            "INSERT INTO `{}` (`left`,`right`) VALUES ({left},{right})",
            self.relation_table_name(&relation)
        ))
    }

    fn build_delete_relation(
        &self,
        owner: &StructInfo<'_>,
        field: &FieldInfo<'_>,
        dependency: &dyn Record,
    ) -> Result<String, OrmError> {
        let relation = relation_of(owner, field)?;
        let left = owner.primary_key_literal()?;
        let right = record_key_literal(dependency)?;

        Ok(format!(
            "DELETE FROM `{}` WHERE `left`={left} AND `right`={right}",
            self.relation_table_name(&relation)
        ))
    }

    fn build_clear_relation(
        &self,
        owner: &StructInfo<'_>,
        field: &FieldInfo<'_>,
    ) -> Result<String, OrmError> {
        let relation = relation_of(owner, field)?;
        let left = owner.primary_key_literal()?;

        Ok(format!(
            "DELETE FROM `{}` WHERE `left`={left}",
            self.relation_table_name(&relation)
        ))
    }

    fn build_query_relation(
        &self,
        owner: &StructInfo<'_>,
        field: &FieldInfo<'_>,
    ) -> Result<String, OrmError> {
        let relation = relation_of(owner, field)?;
        let left = owner.primary_key_literal()?;

        Ok(format!(
            "SELECT `right` FROM `{}` WHERE `left`={left}",
            self.relation_table_name(&relation)
        ))
    }
}
