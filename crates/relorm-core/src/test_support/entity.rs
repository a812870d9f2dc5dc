//! Fixture entities shared by the core tests.

use relorm_derive::Entity;
use time::{PrimitiveDateTime, macros::datetime};

///
/// Unit
/// One column of every scalar kind, a list and a nullable column.
///

#[derive(Clone, Debug, Entity, PartialEq)]
#[orm(name = "pkg.Sub.Unit")]
pub struct Unit {
    #[orm("id key auto")]
    pub id: i64,
    pub name: String,
    pub score: f32,
    pub ratio: f64,
    pub active: bool,
    pub level: u8,
    pub small: i16,
    pub created: PrimitiveDateTime,
    pub tags: Vec<String>,
    pub note: Option<String>,
}

impl Default for Unit {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            score: 0.0,
            ratio: 0.0,
            active: false,
            level: 0,
            small: 0,
            created: datetime!(1970-01-01 0:00),
            tags: Vec::new(),
            note: None,
        }
    }
}

///
/// Relations
///

#[derive(Clone, Debug, Default, Entity, PartialEq)]
#[orm(name = "test.Child")]
pub struct Child {
    #[orm("id key auto")]
    pub id: i64,
    pub name: String,
}

impl Child {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug, Default, Entity, PartialEq)]
#[orm(name = "test.Parent")]
pub struct Parent {
    #[orm("id key auto")]
    pub id: i64,
    pub name: String,
    pub children: Vec<Child>,
}

/// Owns its members, only references its lead.
#[derive(Clone, Debug, Default, Entity, PartialEq)]
#[orm(name = "test.Team")]
pub struct Team {
    #[orm("id key auto")]
    pub id: i64,
    pub name: String,
    pub members: Vec<Child>,
    pub lead: Option<Child>,
}

#[derive(Clone, Debug, Default, Entity, PartialEq)]
#[orm(name = "test.Product")]
pub struct Product {
    #[orm("id key auto")]
    pub id: i64,
    pub name: String,
}

#[derive(Clone, Debug, Default, Entity, PartialEq)]
#[orm(name = "test.Item")]
pub struct Item {
    #[orm("id key auto")]
    pub id: i64,
    pub qty: u32,
    pub product: Product,
}

#[derive(Clone, Debug, Default, Entity, PartialEq)]
#[orm(name = "test.Order")]
pub struct Order {
    #[orm("id key auto")]
    pub id: i64,
    pub items: Vec<Item>,
}

/// Always holds an owner, referenced through a box.
#[derive(Clone, Debug, Default, Entity, PartialEq)]
#[orm(name = "test.Boxed")]
pub struct Boxed {
    #[orm("id key auto")]
    pub id: i64,
    pub name: String,
    pub owner: Box<Child>,
}

/// Caller-assigned text key.
#[derive(Clone, Debug, Default, Entity, PartialEq)]
#[orm(name = "test.Label")]
pub struct Label {
    #[orm("code key")]
    pub code: String,
    pub text: String,
}

/// Caller-assigned key with only a nullable column.
#[derive(Clone, Debug, Default, Entity, PartialEq)]
#[orm(name = "test.Marker")]
pub struct Marker {
    #[orm("id key")]
    pub id: u32,
    pub flag: Option<bool>,
}

/// No declared primary key; the name comes from the module path.
#[derive(Clone, Debug, Default, Entity, PartialEq)]
pub struct Note {
    pub body: String,
}

///
/// Malformed
///

#[derive(Debug, Default, Entity)]
#[orm(name = "bad.Empty")]
pub struct Empty {}

#[derive(Debug, Default, Entity)]
#[orm(name = "bad.AutoText")]
pub struct AutoText {
    #[orm("name auto")]
    pub name: String,
}

#[derive(Debug, Default, Entity)]
#[orm(name = "bad.KeyOnList")]
pub struct KeyOnList {
    #[orm("tags key")]
    pub tags: Vec<String>,
}

#[derive(Debug, Default, Entity)]
#[orm(name = "bad.TwoKeys")]
pub struct TwoKeys {
    #[orm("a key")]
    pub a: i64,
    #[orm("b key")]
    pub b: i64,
}

#[derive(Debug, Default, Entity)]
#[orm(name = "bad.DuplicateColumn")]
pub struct DuplicateColumn {
    #[orm("name")]
    pub first: String,
    #[orm("name")]
    pub second: String,
}

#[derive(Debug, Default, Entity)]
#[orm(name = "bad.BlankTag")]
pub struct BlankTag {
    #[orm(" id key")]
    pub id: i64,
}

/// Related type that is itself malformed.
#[derive(Debug, Default, Entity)]
#[orm(name = "bad.Wrapper")]
pub struct Wrapper {
    #[orm("id key auto")]
    pub id: i64,
    pub inner: Vec<TwoKeys>,
}

///
/// Conflicting
///
/// Two distinct types claiming the `dup_Thing` table.
///

pub mod left {
    use relorm_derive::Entity;

    #[derive(Debug, Default, Entity)]
    #[orm(name = "dup.Thing")]
    pub struct Thing {
        #[orm("id key auto")]
        pub id: i64,
    }
}

pub mod right {
    use relorm_derive::Entity;

    #[derive(Debug, Default, Entity)]
    #[orm(name = "dup.Thing")]
    pub struct Thing {
        #[orm("id key auto")]
        pub id: i64,
        pub extra: String,
    }
}

#[derive(Debug, Default, Entity)]
#[orm(name = "dup.Holder")]
pub struct Holder {
    #[orm("id key auto")]
    pub id: i64,
    pub left: left::Thing,
    pub right: right::Thing,
}
