use crate::{
    model::{FieldKind, FieldType},
    traits::{Column, Element, Record},
    value::{Value, ValueError},
};
use std::any::type_name;
use time::PrimitiveDateTime;

///
/// Integers
///
/// Any integer value is accepted when it fits the target width.
///

macro_rules! impl_integer_column {
    ($variant:ident, $wide:ty, $($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl Column for $ty {
                fn field_type() -> FieldType {
                    FieldType::scalar(FieldKind::$kind, type_name::<Self>())
                }

                fn from_value(value: Value) -> Result<Self, ValueError> {
                    let wide = value.into_integer(FieldKind::$kind)?;

                    Self::try_from(wide).map_err(|_| ValueError::OutOfRange {
                        expected: FieldKind::$kind,
                        value: wide.to_string(),
                    })
                }

                #[allow(
                    clippy::cast_lossless,
                    clippy::cast_possible_wrap,
                    clippy::unnecessary_cast
                )]
                fn get_value(&self) -> Value {
                    Value::$variant(*self as $wide)
                }

                fn set_value(&mut self, value: Value) -> Result<(), ValueError> {
                    *self = Self::from_value(value)?;
                    Ok(())
                }
            }

            impl Element for $ty {}
        )*
    };
}

impl_integer_column!(Int, i64,
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    isize => Int,
);

impl_integer_column!(Uint, u64,
    u8 => Uint8,
    u16 => Uint16,
    u32 => Uint32,
    u64 => Uint64,
    usize => Uint,
);

///
/// Scalars
///

impl Column for bool {
    fn field_type() -> FieldType {
        FieldType::scalar(FieldKind::Bool, type_name::<Self>())
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        value.into_bool()
    }

    fn get_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn set_value(&mut self, value: Value) -> Result<(), ValueError> {
        *self = value.into_bool()?;
        Ok(())
    }
}

impl Element for bool {}

impl Column for f32 {
    fn field_type() -> FieldType {
        FieldType::scalar(FieldKind::Float, type_name::<Self>())
    }

    #[allow(clippy::cast_possible_truncation)]
    fn from_value(value: Value) -> Result<Self, ValueError> {
        Ok(value.into_float(FieldKind::Float)? as Self)
    }

    fn get_value(&self) -> Value {
        Value::Float(f64::from(*self))
    }

    fn set_value(&mut self, value: Value) -> Result<(), ValueError> {
        *self = Self::from_value(value)?;
        Ok(())
    }
}

impl Element for f32 {}

impl Column for f64 {
    fn field_type() -> FieldType {
        FieldType::scalar(FieldKind::Double, type_name::<Self>())
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        value.into_float(FieldKind::Double)
    }

    fn get_value(&self) -> Value {
        Value::Float(*self)
    }

    fn set_value(&mut self, value: Value) -> Result<(), ValueError> {
        *self = value.into_float(FieldKind::Double)?;
        Ok(())
    }
}

impl Element for f64 {}

impl Column for String {
    fn field_type() -> FieldType {
        FieldType::scalar(FieldKind::String, type_name::<Self>())
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        value.into_text()
    }

    fn get_value(&self) -> Value {
        Value::Text(self.clone())
    }

    fn set_value(&mut self, value: Value) -> Result<(), ValueError> {
        *self = value.into_text()?;
        Ok(())
    }
}

impl Element for String {}

impl Column for PrimitiveDateTime {
    fn field_type() -> FieldType {
        FieldType::scalar(FieldKind::DateTime, type_name::<Self>())
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        value.into_datetime()
    }

    fn get_value(&self) -> Value {
        Value::DateTime(*self)
    }

    fn set_value(&mut self, value: Value) -> Result<(), ValueError> {
        *self = value.into_datetime()?;
        Ok(())
    }
}

impl Element for PrimitiveDateTime {}

///
/// Pointers
///
/// `Option` is the nullable pointer: `None` reads as nil and is replaced by
/// a concrete value on the first non-nil assignment.
///

impl<T: Column> Column for Option<T> {
    fn field_type() -> FieldType {
        T::field_type().into_nullable(type_name::<Self>())
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Nil => Ok(None),
            value => T::from_value(value).map(Some),
        }
    }

    fn get_value(&self) -> Value {
        self.as_ref().map_or(Value::Nil, Column::get_value)
    }

    fn set_value(&mut self, value: Value) -> Result<(), ValueError> {
        if value.is_nil() {
            *self = None;
            return Ok(());
        }
        if let Some(inner) = self {
            return inner.set_value(value);
        }

        *self = Some(T::from_value(value)?);
        Ok(())
    }

    fn records(&self) -> Vec<&dyn Record> {
        self.iter().flat_map(|inner| inner.records()).collect()
    }

    fn records_mut(&mut self) -> Vec<&mut dyn Record> {
        self.iter_mut().flat_map(|inner| inner.records_mut()).collect()
    }
}

impl<T: Column> Column for Box<T> {
    fn field_type() -> FieldType {
        T::field_type().into_pointer(type_name::<Self>())
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        T::from_value(value).map(Self::new)
    }

    fn get_value(&self) -> Value {
        (**self).get_value()
    }

    fn set_value(&mut self, value: Value) -> Result<(), ValueError> {
        (**self).set_value(value)
    }

    fn records(&self) -> Vec<&dyn Record> {
        (**self).records()
    }

    fn records_mut(&mut self) -> Vec<&mut dyn Record> {
        (**self).records_mut()
    }
}

impl<T: Element> Element for Box<T> {}

///
/// Slices
///
/// Scalar elements are stored as one JSON text column; entity elements
/// become a slice-of-struct relation.
///

impl<T: Element> Column for Vec<T> {
    fn field_type() -> FieldType {
        match T::field_type().depend {
            Some(depend) => FieldType::relation(FieldKind::SliceStruct, type_name::<Self>(), depend),
            None => FieldType::scalar(FieldKind::Slice, type_name::<Self>()),
        }
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        value
            .into_list(Self::field_type().kind)?
            .into_iter()
            .map(T::from_value)
            .collect()
    }

    fn get_value(&self) -> Value {
        Value::Slice(self.iter().map(Column::get_value).collect())
    }

    fn set_value(&mut self, value: Value) -> Result<(), ValueError> {
        *self = Self::from_value(value)?;
        Ok(())
    }

    fn records(&self) -> Vec<&dyn Record> {
        self.iter().flat_map(|item| item.records()).collect()
    }

    fn records_mut(&mut self) -> Vec<&mut dyn Record> {
        self.iter_mut().flat_map(|item| item.records_mut()).collect()
    }
}
