use crate::model::{EntityModel, FieldDescriptor};

///
/// RelationModel
///
/// One relation field of an owner model. Each relation is persisted in its
/// own junction table linking owner keys (`left`) to related keys (`right`).
///

#[derive(Clone, Copy, Debug)]
pub struct RelationModel {
    pub owner: &'static EntityModel,
    pub field: &'static str,
    pub dependency: &'static EntityModel,
    pub is_pointer: bool,
}

impl RelationModel {
    /// Relation declared by `field` on `owner`, if `field` is a relation.
    #[must_use]
    pub fn of(owner: &'static EntityModel, field: &FieldDescriptor) -> Option<Self> {
        let depend = field.field_type.depend?;

        Some(Self {
            owner,
            field: field.name,
            dependency: depend.model(),
            is_pointer: depend.is_pointer,
        })
    }
}
