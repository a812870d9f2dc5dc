use crate::{
    builder::Builder,
    error::OrmError,
    executor::Executor,
    model::{FieldKind, StructInfo, introspect},
    orm::{
        Orm,
        operation::{Operation, OperationKind, Stage},
    },
    traits::Record,
    value::Value,
};

impl<E: Executor, B: Builder> Orm<E, B> {
    /// Load `record` by its primary key.
    ///
    /// Every stored column is overwritten from the row. Relation fields are
    /// reloaded from their links, and each related row's own columns are
    /// loaded; relations of related rows are not followed.
    pub fn query(&mut self, record: &mut dyn Record) -> Result<(), OrmError> {
        let mut op = Operation::begin(OperationKind::Query, record.model());
        let result = self.run_query(&mut op, record);

        op.finish(result)
    }

    fn run_query(&mut self, op: &mut Operation, record: &mut dyn Record) -> Result<(), OrmError> {
        let (mut info, dependencies) = introspect(record)?;
        op.advance(Stage::SchemaEnsuring);
        self.ensure_schema(info.model(), &dependencies)?;
        op.advance(Stage::Executing);
        let row = self.fetch_row(&info)?;
        op.advance(Stage::Hydrating);
        hydrate(&mut info, row)?;

        self.load_relations(&mut info)
    }

    /// Select the record's row into typed scratch slots, one per column.
    fn fetch_row(&mut self, info: &StructInfo<'_>) -> Result<Vec<Value>, OrmError> {
        let sql = self.builder.build_query(info)?;
        let mut scratch = info
            .columns()
            .map(|field| Value::zero(field.field_type().kind))
            .collect::<Vec<_>>();

        if !self.fetch_one(&sql, &mut scratch)? {
            return Err(OrmError::not_found(
                &info.table_name(),
                &info.primary_key_literal()?,
            ));
        }

        Ok(scratch)
    }

    fn load_relations(&mut self, info: &mut StructInfo<'_>) -> Result<(), OrmError> {
        let relations = info
            .relations()
            .map(|field| field.index())
            .collect::<Vec<_>>();

        for index in relations {
            let field = &info.fields()[index];
            let sql = self.builder.build_query_relation(info, field)?;
            let keys = self.fetch_column(&sql, &Value::Int(0))?;

            let linked = match field.field_type().kind {
                FieldKind::SliceStruct => Value::Slice(keys.into_iter().map(related).collect()),
                _ => keys.into_iter().next().map_or(Value::Nil, related),
            };
            // only `Option` storage takes nil; an unlinked owned or boxed
            // relation keeps its current value
            if linked.is_nil() && !field.field_type().nullable {
                continue;
            }

            let field = &mut info.fields_mut()[index];
            field.set_value(linked)?;
            for dependency in field.get_depend() {
                let mut child = StructInfo::new(dependency)?;
                let row = self.fetch_row(&child)?;
                hydrate(&mut child, row)?;
            }
        }

        Ok(())
    }
}

/// Copy scanned values into the record's stored columns, in select order.
fn hydrate(info: &mut StructInfo<'_>, row: Vec<Value>) -> Result<(), OrmError> {
    let columns = info.fields_mut().iter_mut().filter(|field| field.is_column());
    for (field, value) in columns.zip(row) {
        field.set_value(value)?;
    }

    Ok(())
}

fn related(key: Value) -> Value {
    Value::Struct(Box::new(key))
}
