use thiserror::Error as ThisError;

///
/// TagError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum TagError {
    #[error("column name is empty")]
    EmptyName,

    #[error("column name '{0}' must be alphanumeric or '_'")]
    InvalidName(String),
}

///
/// FieldTag
///
/// Declared column attributes, parsed from `"name [key|auto] [key|auto]"`.
/// The two flag slots are order-insensitive; anything after them, or any
/// unknown flag, is ignored.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldTag {
    name: String,
    primary_key: bool,
    auto_increment: bool,
}

impl FieldTag {
    pub const KEY: &'static str = "key";
    pub const AUTO: &'static str = "auto";

    pub fn parse(tag: &str) -> Result<Self, TagError> {
        let mut tokens = tag.split(' ');
        let name = tokens.next().unwrap_or_default();

        if name.is_empty() {
            return Err(TagError::EmptyName);
        }
        if !name.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '_') {
            return Err(TagError::InvalidName(name.to_string()));
        }

        let mut parsed = Self {
            name: name.to_string(),
            primary_key: false,
            auto_increment: false,
        };
        for token in tokens.take(2) {
            match token {
                Self::KEY => parsed.primary_key = true,
                Self::AUTO => parsed.auto_increment = true,
                _ => {}
            }
        }

        Ok(parsed)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn is_primary_key(&self) -> bool {
        self.primary_key
    }

    #[must_use]
    pub const fn is_auto_increment(&self) -> bool {
        self.auto_increment
    }
}
