use crate::{
    builder::Builder,
    cache::SchemaWitness,
    error::OrmError,
    executor::Executor,
    model::{EntityModel, RelationModel},
    orm::{
        Orm,
        operation::{Operation, OperationKind, Stage},
    },
    traits::Entity,
};
use std::iter;
use tracing::info;

impl<E: Executor, B: Builder> Orm<E, B> {
    /// Ensure the tables of `T`, every related type and every relation.
    pub fn create<T: Entity>(&mut self) -> Result<(), OrmError> {
        let model = T::entity_model();
        let mut op = Operation::begin(OperationKind::Create, model);
        let result = model.dependencies().and_then(|dependencies| {
            op.advance(Stage::SchemaEnsuring);
            self.ensure_schema(model, &dependencies)
        });

        op.finish(result)
    }

    /// Drop every table of `T` and its related types that this process
    /// ensured, then forget them.
    pub fn drop<T: Entity>(&mut self) -> Result<(), OrmError> {
        let model = T::entity_model();
        let mut op = Operation::begin(OperationKind::Drop, model);
        let result = model.dependencies().and_then(|dependencies| {
            op.advance(Stage::Executing);
            self.drop_schema(model, &dependencies)
        });

        op.finish(result)
    }

    // ======================================================================
    // Schema-ensure rule
    // ======================================================================

    /// Dependencies first, then the model, then every relation table of
    /// the whole closure. Each table is checked once per cache lifetime.
    pub(crate) fn ensure_schema(
        &mut self,
        model: &'static EntityModel,
        dependencies: &[&'static EntityModel],
    ) -> Result<(), OrmError> {
        let closure = || dependencies.iter().copied().chain(iter::once(model));

        for entity in closure() {
            self.ensure_table(entity)?;
        }
        for entity in closure() {
            for relation in entity.relations()? {
                self.ensure_relation_table(&relation)?;
            }
        }

        Ok(())
    }

    fn ensure_table(&mut self, model: &'static EntityModel) -> Result<(), OrmError> {
        let table = self.builder.table_name(model);
        if self.cache.check(&table, &model.origin())? {
            return Ok(());
        }

        if !self.executor.check_table_exist(&table)? {
            let sql = self.builder.build_create_schema(model)?;
            info!(%table, "creating table");
            self.execute(&sql)?;
        }
        self.cache.put(SchemaWitness::for_model(model));

        Ok(())
    }

    fn ensure_relation_table(&mut self, relation: &RelationModel) -> Result<(), OrmError> {
        let table = self.builder.relation_table_name(relation);
        if self.cache.check(&table, &relation.owner.origin())? {
            return Ok(());
        }

        if !self.executor.check_table_exist(&table)? {
            let sql = self.builder.build_create_relation_schema(relation);
            info!(%table, "creating relation table");
            self.execute(&sql)?;
        }
        self.cache
            .put(SchemaWitness::for_relation(table, relation.owner));

        Ok(())
    }

    fn drop_schema(
        &mut self,
        model: &'static EntityModel,
        dependencies: &[&'static EntityModel],
    ) -> Result<(), OrmError> {
        let closure = || iter::once(model).chain(dependencies.iter().copied());

        for entity in closure() {
            let table = self.builder.table_name(entity);
            if self.cache.check(&table, &entity.origin())? {
                let sql = self.builder.build_drop_schema(entity);
                info!(%table, "dropping table");
                self.execute(&sql)?;
                self.cache.remove(&table);
            }
        }
        for entity in closure() {
            for relation in entity.relations()? {
                let table = self.builder.relation_table_name(&relation);
                if self.cache.check(&table, &entity.origin())? {
                    let sql = self.builder.build_drop_relation_schema(&relation);
                    info!(%table, "dropping relation table");
                    self.execute(&sql)?;
                    self.cache.remove(&table);
                }
            }
        }

        Ok(())
    }
}
