use crate::model::{EntityModel, FieldTag};
use derive_more::Display;
use std::fmt;

///
/// FieldModel
/// Static per-field metadata emitted by `#[derive(Entity)]`.
///

#[derive(Debug)]
pub struct FieldModel {
    /// Rust field identifier.
    pub name: &'static str,
    /// Raw tag text, parsed on demand.
    pub tag: &'static str,
    /// Classifier for the declared Rust type.
    pub ty: fn() -> FieldType,
}

impl FieldModel {
    #[must_use]
    pub fn field_type(&self) -> FieldType {
        (self.ty)()
    }
}

///
/// FieldKind
///
/// Storage classification of a field. Everything except the relation kinds
/// maps to exactly one column.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum FieldKind {
    Bool,
    String,
    DateTime,

    // signed
    Int8,
    Int16,
    Int32,
    Int64,
    Int,

    // unsigned
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uint,

    Float,
    Double,

    Struct,
    Slice,
    SliceStruct,
}

impl FieldKind {
    #[must_use]
    pub const fn is_integer(self) -> bool {
        matches!(
            self,
            Self::Int8
                | Self::Int16
                | Self::Int32
                | Self::Int64
                | Self::Int
                | Self::Uint8
                | Self::Uint16
                | Self::Uint32
                | Self::Uint64
                | Self::Uint
        )
    }

    #[must_use]
    pub const fn is_relation(self) -> bool {
        matches!(self, Self::Struct | Self::SliceStruct)
    }

    /// Struct and slice kinds can never hold a primary key.
    #[must_use]
    pub const fn is_composite(self) -> bool {
        matches!(self, Self::Struct | Self::Slice | Self::SliceStruct)
    }
}

///
/// Depend
///
/// Reference from a relation field to the model of the related type.
///

#[derive(Clone, Copy)]
pub struct Depend {
    model: fn() -> &'static EntityModel,
    pub is_pointer: bool,
}

impl Depend {
    #[must_use]
    pub const fn new(model: fn() -> &'static EntityModel) -> Self {
        Self {
            model,
            is_pointer: false,
        }
    }

    #[must_use]
    pub fn model(&self) -> &'static EntityModel {
        (self.model)()
    }
}

impl fmt::Debug for Depend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Depend")
            .field("model", &self.model().name())
            .field("is_pointer", &self.is_pointer)
            .finish()
    }
}

///
/// FieldType
///
/// Classification of one declared field: storage kind, pointer flag, and
/// for relation kinds the related model. Only `Option` storage is
/// `nullable`; a `Box` is a pointer that always holds a value.
///

#[derive(Clone, Copy, Debug)]
pub struct FieldType {
    pub kind: FieldKind,
    pub type_name: &'static str,
    pub is_pointer: bool,
    pub nullable: bool,
    pub depend: Option<Depend>,
}

impl FieldType {
    #[must_use]
    pub const fn scalar(kind: FieldKind, type_name: &'static str) -> Self {
        Self {
            kind,
            type_name,
            is_pointer: false,
            nullable: false,
            depend: None,
        }
    }

    #[must_use]
    pub const fn relation(kind: FieldKind, type_name: &'static str, depend: Depend) -> Self {
        Self {
            kind,
            type_name,
            is_pointer: false,
            nullable: false,
            depend: Some(depend),
        }
    }

    /// Same classification seen through a pointer (`Option` / `Box`).
    #[must_use]
    pub const fn into_pointer(self, type_name: &'static str) -> Self {
        let depend = match self.depend {
            Some(depend) => Some(Depend {
                is_pointer: true,
                ..depend
            }),
            None => None,
        };

        Self {
            type_name,
            is_pointer: true,
            depend,
            ..self
        }
    }

    /// Pointer that can hold nil (`Option`).
    #[must_use]
    pub const fn into_nullable(self, type_name: &'static str) -> Self {
        Self {
            nullable: true,
            ..self.into_pointer(type_name)
        }
    }

    #[must_use]
    pub const fn is_relation(&self) -> bool {
        self.depend.is_some()
    }

    /// Relation whose related rows are references only; their rows are
    /// never written through this field.
    #[must_use]
    pub const fn is_pointer_relation(&self) -> bool {
        matches!(self.depend, Some(Depend { is_pointer: true, .. }))
    }

    #[must_use]
    pub fn dependency(&self) -> Option<&'static EntityModel> {
        self.depend.as_ref().map(Depend::model)
    }
}

///
/// FieldDescriptor
/// Parsed and validated view of one `FieldModel`.
///

#[derive(Clone, Debug)]
pub struct FieldDescriptor {
    pub index: usize,
    pub name: &'static str,
    pub tag: FieldTag,
    pub field_type: FieldType,
}

impl FieldDescriptor {
    #[must_use]
    pub fn column(&self) -> &str {
        self.tag.name()
    }

    #[must_use]
    pub const fn is_primary_key(&self) -> bool {
        self.tag.is_primary_key()
    }

    #[must_use]
    pub const fn is_auto_increment(&self) -> bool {
        self.tag.is_auto_increment()
    }

    /// Stored as a column of the owning table.
    #[must_use]
    pub const fn is_column(&self) -> bool {
        !self.field_type.is_relation()
    }
}
