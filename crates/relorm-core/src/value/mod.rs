mod field;


use crate::model::FieldKind;
use serde_json::Value as JsonValue;
use thiserror::Error as ThisError;
use time::{
    PrimitiveDateTime,
    format_description::BorrowedFormatItem,
    macros::{datetime, format_description},
};

// re-exports
pub use field::FieldValue;

///
/// CONSTANTS
///

/// Canonical date-time layout used for literals and text coercion.
pub const DATETIME_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

///
/// ValueError
///
/// Coercion and rendering failures raised while moving values in and out
/// of bound fields.
///

#[derive(Debug, ThisError)]
pub enum ValueError {
    #[error("cannot assign {found} value to {expected} field")]
    TypeMismatch {
        expected: FieldKind,
        found: &'static str,
    },

    #[error("value {value} does not fit a {expected} field")]
    OutOfRange { expected: FieldKind, value: String },

    #[error("invalid date-time '{text}': {reason}")]
    InvalidDateTime { text: String, reason: String },

    #[error("invalid json list '{text}': {reason}")]
    InvalidJson { text: String, reason: String },

    #[error("float {0} has no sql literal")]
    NonFinite(f64),

    #[error("relation list has no column literal")]
    RelationLiteral,

    #[error("related row has no primary key value")]
    MissingPrimaryKey,
}

///
/// Value
///
/// Owned, closed set of values that can flow between a bound field and
/// the database. `Struct` carries the related row's primary key.
///

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Text(String),
    DateTime(PrimitiveDateTime),
    Struct(Box<Self>),
    Slice(Vec<Self>),
    Nil,
}

impl Value {
    /// Typed zero value used as scan scratch for a column of `kind`.
    #[must_use]
    pub const fn zero(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Bool => Self::Bool(false),
            FieldKind::Int8
            | FieldKind::Int16
            | FieldKind::Int32
            | FieldKind::Int64
            | FieldKind::Int => Self::Int(0),
            FieldKind::Uint8
            | FieldKind::Uint16
            | FieldKind::Uint32
            | FieldKind::Uint64
            | FieldKind::Uint => Self::Uint(0),
            FieldKind::Float | FieldKind::Double => Self::Float(0.0),
            FieldKind::String | FieldKind::Slice => Self::Text(String::new()),
            FieldKind::DateTime => Self::DateTime(datetime!(1970-01-01 0:00)),
            FieldKind::Struct | FieldKind::SliceStruct => Self::Nil,
        }
    }

    #[must_use]
    pub const fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    /// Short label of the variant, used in mismatch diagnostics.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Uint(_) => "uint",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::DateTime(_) => "datetime",
            Self::Struct(_) => "struct",
            Self::Slice(_) => "slice",
            Self::Nil => "nil",
        }
    }

    const fn mismatch(&self, expected: FieldKind) -> ValueError {
        ValueError::TypeMismatch {
            expected,
            found: self.label(),
        }
    }

    // ======================================================================
    // Coercion
    // ======================================================================

    /// Widen any integer value so the caller can range-check it.
    pub fn into_integer(self, expected: FieldKind) -> Result<i128, ValueError> {
        match self {
            Self::Int(v) => Ok(i128::from(v)),
            Self::Uint(v) => Ok(i128::from(v)),
            other => Err(other.mismatch(expected)),
        }
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn into_float(self, expected: FieldKind) -> Result<f64, ValueError> {
        match self {
            Self::Float(v) => Ok(v),
            Self::Int(v) => Ok(v as f64),
            Self::Uint(v) => Ok(v as f64),
            other => Err(other.mismatch(expected)),
        }
    }

    /// Booleans are stored as TINYINT, so integers are accepted.
    pub fn into_bool(self) -> Result<bool, ValueError> {
        match self {
            Self::Bool(v) => Ok(v),
            Self::Int(v) => Ok(v != 0),
            Self::Uint(v) => Ok(v != 0),
            other => Err(other.mismatch(FieldKind::Bool)),
        }
    }

    pub fn into_text(self) -> Result<String, ValueError> {
        match self {
            Self::Text(v) => Ok(v),
            other => Err(other.mismatch(FieldKind::String)),
        }
    }

    pub fn into_datetime(self) -> Result<PrimitiveDateTime, ValueError> {
        match self {
            Self::DateTime(v) => Ok(v),
            Self::Text(text) => parse_datetime(&text),
            other => Err(other.mismatch(FieldKind::DateTime)),
        }
    }

    /// Accepts a list, its JSON text encoding, or nil for an empty list.
    pub fn into_list(self, expected: FieldKind) -> Result<Vec<Self>, ValueError> {
        match self {
            Self::Slice(items) => Ok(items),
            Self::Nil => Ok(Vec::new()),
            Self::Text(text) if text.trim().is_empty() => Ok(Vec::new()),
            Self::Text(text) => match serde_json::from_str::<JsonValue>(&text) {
                Ok(JsonValue::Array(items)) => Ok(items.into_iter().map(Self::from_json).collect()),
                Ok(_) => Err(ValueError::InvalidJson {
                    text,
                    reason: "expected an array".to_string(),
                }),
                Err(err) => Err(ValueError::InvalidJson {
                    reason: err.to_string(),
                    text,
                }),
            },
            other => Err(other.mismatch(expected)),
        }
    }

    /// Unwrap a relation value down to the related row's key.
    #[must_use]
    pub fn into_key(self) -> Self {
        match self {
            Self::Struct(inner) => inner.into_key(),
            other => other,
        }
    }

    // ======================================================================
    // Rendering
    // ======================================================================

    /// Render as an SQL literal; `None` means the value is nil.
    pub fn to_literal(&self) -> Result<Option<String>, ValueError> {
        let literal = match self {
            Self::Nil => return Ok(None),
            Self::Bool(v) => String::from(if *v { "1" } else { "0" }),
            Self::Int(v) => v.to_string(),
            Self::Uint(v) => v.to_string(),
            Self::Float(v) => {
                if !v.is_finite() {
                    return Err(ValueError::NonFinite(*v));
                }
                v.to_string()
            }
            Self::Text(v) => quote(v),
            Self::DateTime(v) => quote(&format_datetime(*v)?),
            Self::Struct(inner) => match inner.to_literal()? {
                Some(key) => key,
                None => return Err(ValueError::MissingPrimaryKey),
            },
            Self::Slice(_) => quote(&self.to_json()?.to_string()),
        };

        Ok(Some(literal))
    }

    /// JSON form used for slice-of-scalar columns.
    pub fn to_json(&self) -> Result<JsonValue, ValueError> {
        let json = match self {
            Self::Nil => JsonValue::Null,
            Self::Bool(v) => JsonValue::Bool(*v),
            Self::Int(v) => JsonValue::from(*v),
            Self::Uint(v) => JsonValue::from(*v),
            Self::Float(v) => serde_json::Number::from_f64(*v)
                .map(JsonValue::Number)
                .ok_or(ValueError::NonFinite(*v))?,
            Self::Text(v) => JsonValue::String(v.clone()),
            Self::DateTime(v) => JsonValue::String(format_datetime(*v)?),
            Self::Slice(items) => {
                JsonValue::Array(items.iter().map(Self::to_json).collect::<Result<_, _>>()?)
            }
            Self::Struct(_) => return Err(ValueError::RelationLiteral),
        };

        Ok(json)
    }

    /// Lift a decoded JSON node. Date-times stay text and are parsed by the
    /// receiving field.
    #[must_use]
    pub fn from_json(json: JsonValue) -> Self {
        match json {
            JsonValue::Null => Self::Nil,
            JsonValue::Bool(v) => Self::Bool(v),
            JsonValue::Number(n) => {
                if let Some(v) = n.as_u64() {
                    Self::Uint(v)
                } else if let Some(v) = n.as_i64() {
                    Self::Int(v)
                } else {
                    Self::Float(n.as_f64().unwrap_or_default())
                }
            }
            JsonValue::String(v) => Self::Text(v),
            JsonValue::Array(items) => Self::Slice(items.into_iter().map(Self::from_json).collect()),
            object @ JsonValue::Object(_) => Self::Text(object.to_string()),
        }
    }
}

///
/// Helpers
///

/// Single-quote a string literal. Quotes are doubled, which every sql_mode
/// reads back; backslashes are doubled for the default mode.
#[must_use]
pub fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('\'');
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("''"),
            _ => out.push(ch),
        }
    }
    out.push('\'');

    out
}

pub fn format_datetime(value: PrimitiveDateTime) -> Result<String, ValueError> {
    value
        .format(DATETIME_FORMAT)
        .map_err(|err| ValueError::InvalidDateTime {
            text: value.to_string(),
            reason: err.to_string(),
        })
}

pub fn parse_datetime(text: &str) -> Result<PrimitiveDateTime, ValueError> {
    PrimitiveDateTime::parse(text.trim(), DATETIME_FORMAT).map_err(|err| {
        ValueError::InvalidDateTime {
            text: text.to_string(),
            reason: err.to_string(),
        }
    })
}
