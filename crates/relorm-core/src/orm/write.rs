use crate::{
    builder::{Builder, relation_of, updatable_columns},
    error::OrmError,
    executor::Executor,
    model::{StructInfo, introspect},
    orm::{
        Orm,
        operation::{Operation, OperationKind, Stage},
    },
    traits::Record,
    value::Value,
};
use tracing::{debug, warn};

impl<E: Executor, B: Builder> Orm<E, B> {
    // ======================================================================
    // Insert
    // ======================================================================

    /// Insert `record` with its related rows and links.
    ///
    /// Related rows are written leaves first, then the record, then one
    /// link per related row. Generated keys are written back into
    /// auto-increment primary keys as rows are inserted.
    pub fn insert(&mut self, record: &mut dyn Record) -> Result<(), OrmError> {
        let mut op = Operation::begin(OperationKind::Insert, record.model());
        let result = self.run_insert(&mut op, record);

        op.finish(result)
    }

    fn run_insert(&mut self, op: &mut Operation, record: &mut dyn Record) -> Result<(), OrmError> {
        let (mut info, dependencies) = introspect(record)?;
        op.advance(Stage::SchemaEnsuring);
        self.ensure_schema(info.model(), &dependencies)?;
        op.advance(Stage::Executing);

        self.insert_row(&mut info)
    }

    fn insert_row(&mut self, info: &mut StructInfo<'_>) -> Result<(), OrmError> {
        // related rows first; pointer relations only link
        for field in info.fields_mut() {
            if !field.is_relation() || field.field_type().is_pointer_relation() {
                continue;
            }
            for dependency in field.get_depend() {
                let mut child = StructInfo::new(dependency)?;
                self.insert_row(&mut child)?;
            }
        }

        let sql = self.builder.build_insert(info)?;
        let id = self.exec_insert(&sql)?;
        if let Some(key) = info.primary_key_mut()
            && key.is_auto_increment()
        {
            key.set_value(Value::Uint(id))?;
        }

        self.insert_links(info)
    }

    fn insert_links(&mut self, info: &StructInfo<'_>) -> Result<(), OrmError> {
        for field in info.relations() {
            for dependency in field.value().depend_refs() {
                let sql = self.builder.build_insert_relation(info, field, dependency)?;
                self.exec_insert(&sql)?;
            }
        }

        Ok(())
    }

    // ======================================================================
    // Update
    // ======================================================================

    /// Update `record`, its owned related rows, and refresh its links.
    ///
    /// Pointer relations are references: their rows are left untouched and
    /// only the links are rewritten.
    pub fn update(&mut self, record: &mut dyn Record) -> Result<(), OrmError> {
        let mut op = Operation::begin(OperationKind::Update, record.model());
        let result = self.run_update(&mut op, record);

        op.finish(result)
    }

    fn run_update(&mut self, op: &mut Operation, record: &mut dyn Record) -> Result<(), OrmError> {
        let (mut info, dependencies) = introspect(record)?;
        op.advance(Stage::SchemaEnsuring);
        self.ensure_schema(info.model(), &dependencies)?;
        op.advance(Stage::Executing);

        self.update_row(&mut info)
    }

    fn update_row(&mut self, info: &mut StructInfo<'_>) -> Result<(), OrmError> {
        if updatable_columns(info).any(|field| !field.is_nil()) {
            let sql = self.builder.build_update(info)?;
            let affected = self.exec_update(&sql)?;
            if affected != 1 {
                warn!(table = %info.table_name(), affected, "update touched an unexpected row count");
            }
        } else {
            debug!(entity = %info.name(), "no columns to update");
        }

        for field in info.fields_mut() {
            if !field.is_relation() || field.field_type().is_pointer_relation() {
                continue;
            }
            for dependency in field.get_depend() {
                let mut child = StructInfo::new(dependency)?;
                self.update_row(&mut child)?;
            }
        }

        // replace every link of this row
        for field in info.relations() {
            let sql = self.builder.build_clear_relation(info, field)?;
            self.exec_delete(&sql)?;
        }

        self.insert_links(info)
    }

    // ======================================================================
    // Delete
    // ======================================================================

    /// Delete `record`, then each related row (unless held by pointer)
    /// followed by its link.
    ///
    /// The record row goes first. Every row and link must affect exactly
    /// one row; a failure after the first statement leaves the remaining
    /// related rows and links in place.
    pub fn delete(&mut self, record: &mut dyn Record) -> Result<(), OrmError> {
        let mut op = Operation::begin(OperationKind::Delete, record.model());
        let result = self.run_delete(&mut op, record);

        op.finish(result)
    }

    fn run_delete(&mut self, op: &mut Operation, record: &mut dyn Record) -> Result<(), OrmError> {
        let (mut info, _) = introspect(record)?;
        op.advance(Stage::Executing);

        self.delete_row(&mut info)
    }

    fn delete_row(&mut self, info: &mut StructInfo<'_>) -> Result<(), OrmError> {
        let sql = self.builder.build_delete(info)?;
        let affected = self.exec_delete(&sql)?;
        if affected != 1 {
            return Err(OrmError::row_count_mismatch(&info.table_name(), 1, affected));
        }

        let relations = info
            .fields()
            .iter()
            .filter(|field| field.is_relation())
            .map(|field| field.index())
            .collect::<Vec<_>>();

        for index in relations {
            // links are rendered up front, while the related keys are
            // still readable through a shared borrow
            let field = &info.fields()[index];
            let links = field
                .value()
                .depend_refs()
                .into_iter()
                .map(|dependency| self.builder.build_delete_relation(info, field, dependency))
                .collect::<Result<Vec<_>, _>>()?;
            let owned = !field.field_type().is_pointer_relation();
            let table = self
                .builder
                .relation_table_name(&relation_of(info, field)?);

            let field = &mut info.fields_mut()[index];
            for (dependency, link) in field.get_depend().into_iter().zip(links) {
                if owned {
                    let mut child = StructInfo::new(dependency)?;
                    self.delete_row(&mut child)?;
                }

                let affected = self.exec_delete(&link)?;
                if affected != 1 {
                    return Err(OrmError::row_count_mismatch(&table, 1, affected));
                }
            }
        }

        Ok(())
    }
}
