use crate::{error::OrmError, model::EntityModel};
use derive_more::Display;
use tracing::{debug, trace};

///
/// OperationKind
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum OperationKind {
    Create,
    Insert,
    Update,
    Delete,
    Query,
    Drop,
}

///
/// Stage
///
/// Progress of one facade call. `Failed` is reachable from every stage;
/// `Hydrating` only from reads.
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum Stage {
    Introspecting,
    SchemaEnsuring,
    Executing,
    Hydrating,
    Done,
    Failed,
}

///
/// Operation
/// Stage tracker for one facade call, reported through `tracing`.
///

#[derive(Debug)]
pub(crate) struct Operation {
    kind: OperationKind,
    entity: String,
    stage: Stage,
}

impl Operation {
    pub(crate) fn begin(kind: OperationKind, model: &EntityModel) -> Self {
        let entity = model.name();
        trace!(op = %kind, entity = %entity, stage = %Stage::Introspecting, "begin");

        Self {
            kind,
            entity,
            stage: Stage::Introspecting,
        }
    }

    pub(crate) fn advance(&mut self, stage: Stage) {
        trace!(op = %self.kind, entity = %self.entity, from = %self.stage, to = %stage, "stage");
        self.stage = stage;
    }

    /// Close the operation, reporting the stage a failure happened in.
    pub(crate) fn finish<T>(mut self, result: Result<T, OrmError>) -> Result<T, OrmError> {
        match &result {
            Ok(_) => self.advance(Stage::Done),
            Err(err) => {
                debug!(
                    op = %self.kind,
                    entity = %self.entity,
                    stage = %self.stage,
                    class = %err.class,
                    error = %err,
                    "operation failed"
                );
                self.advance(Stage::Failed);
            }
        }

        result
    }
}
