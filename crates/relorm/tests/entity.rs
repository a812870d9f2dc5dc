//! End-to-end use of the public surface: derive, manager, facade.

use relorm::{
    builder::{Builder, MysqlBuilder},
    error::ErrorClass,
    model::StructInfo,
    prelude::*,
};
use std::{
    collections::BTreeSet,
    sync::{Arc, Mutex},
};

// ---- helpers -----------------------------------------------------------

#[derive(Debug, Default, Entity, PartialEq)]
#[orm(name = "shop.Tag")]
struct Tag {
    #[orm("id key auto")]
    id: u64,
    label: String,
}

#[derive(Debug, Default, Entity, PartialEq)]
#[orm(name = "shop.Post")]
struct Post {
    #[orm("post_id key auto")]
    id: u64,
    title: String,
    draft: Option<bool>,
    tags: Vec<Tag>,
}

type Journal = Arc<Mutex<Vec<String>>>;

/// Records statements into a shared journal; every table exists after its
/// CREATE statement.
#[derive(Default)]
struct JournalExecutor {
    journal: Journal,
    tables: BTreeSet<String>,
    next_id: u64,
}

impl JournalExecutor {
    fn note(&self, sql: &str) {
        self.journal.lock().unwrap().push(sql.to_string());
    }
}

impl Executor for JournalExecutor {
    fn release(&mut self) -> Result<(), DriverError> {
        Ok(())
    }

    fn begin_transaction(&mut self) -> Result<(), DriverError> {
        self.note("BEGIN");
        Ok(())
    }

    fn commit(&mut self) -> Result<(), DriverError> {
        self.note("COMMIT");
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), DriverError> {
        self.note("ROLLBACK");
        Ok(())
    }

    fn query(&mut self, sql: &str) -> Result<(), DriverError> {
        self.note(sql);
        Ok(())
    }

    fn next(&mut self) -> Result<bool, DriverError> {
        Ok(false)
    }

    fn finish(&mut self) -> Result<(), DriverError> {
        Ok(())
    }

    fn get_field(&mut self, _values: &mut [Value]) -> Result<(), DriverError> {
        Err(DriverError::new("no rows"))
    }

    fn insert(&mut self, sql: &str) -> Result<u64, DriverError> {
        self.note(sql);
        self.next_id += 1;
        Ok(self.next_id)
    }

    fn update(&mut self, sql: &str) -> Result<u64, DriverError> {
        self.note(sql);
        Ok(1)
    }

    fn delete(&mut self, sql: &str) -> Result<u64, DriverError> {
        self.note(sql);
        Ok(1)
    }

    fn execute(&mut self, sql: &str) -> Result<(), DriverError> {
        self.note(sql);
        if let Some(table) = sql.split('`').nth(1) {
            self.tables.insert(table.to_string());
        }
        Ok(())
    }

    fn check_table_exist(&mut self, table: &str) -> Result<bool, DriverError> {
        Ok(self.tables.contains(table))
    }
}

struct JournalConnector {
    journal: Journal,
}

impl Connector for JournalConnector {
    fn connect(&self, _config: &ServerConfig) -> Result<Box<dyn Executor>, DriverError> {
        Ok(Box::new(JournalExecutor {
            journal: Arc::clone(&self.journal),
            ..JournalExecutor::default()
        }))
    }
}

fn manager() -> (Manager, Journal) {
    let journal = Journal::default();
    let config = OrmConfig {
        server: ServerConfig {
            db_name: "shop".to_string(),
            ..ServerConfig::default()
        },
    };
    let connector = JournalConnector {
        journal: Arc::clone(&journal),
    };

    (Manager::new(config, connector).unwrap(), journal)
}

fn post() -> Post {
    Post {
        id: 0,
        title: "hello".to_string(),
        draft: None,
        tags: vec![
            Tag {
                id: 0,
                label: "rust".to_string(),
            },
            Tag {
                id: 0,
                label: "sql".to_string(),
            },
        ],
    }
}

// ---- tests -------------------------------------------------------------

#[test]
fn derived_model_describes_the_struct() {
    let model = Post::entity_model();

    assert_eq!(model.name(), "shop.Post");
    assert_eq!(model.table_name(), "shop_Post");
    assert_eq!(model.primary_key_index(), Some(0));
    assert_eq!(
        model
            .dependencies()
            .unwrap()
            .iter()
            .map(|dep| dep.name())
            .collect::<Vec<_>>(),
        vec!["shop.Tag"]
    );
}

#[test]
fn builder_renders_public_statements() {
    let mut post = Post {
        id: 3,
        ..post()
    };
    let info = StructInfo::new(&mut post).unwrap();

    assert_eq!(
        MysqlBuilder.build_update(&info).unwrap(),
        "UPDATE `shop_Post` SET `title`='hello' WHERE `post_id`=3"
    );
}

#[test]
fn insert_through_manager_persists_the_graph() {
    let (manager, journal) = manager();
    let mut orm = manager.open().unwrap();
    let mut post = post();

    orm.insert(&mut post).unwrap();
    orm.release().unwrap();

    assert_eq!(post.id, 3);
    assert_eq!(post.tags.iter().map(|tag| tag.id).collect::<Vec<_>>(), vec![1, 2]);

    let journal = journal.lock().unwrap();
    let inserts = journal
        .iter()
        .filter(|sql| sql.starts_with("INSERT"))
        .map(String::as_str)
        .collect::<Vec<_>>();
    assert_eq!(
        inserts,
        vec![
            "INSERT INTO `shop_Tag` (`label`) VALUES ('rust')",
            "INSERT INTO `shop_Tag` (`label`) VALUES ('sql')",
            "INSERT INTO `shop_Post` (`title`) VALUES ('hello')",
            "INSERT INTO `shop_Posttags2shop_Tag` (`left`,`right`) VALUES (3,1)",
            "INSERT INTO `shop_Posttags2shop_Tag` (`left`,`right`) VALUES (3,2)",
        ]
    );
}

#[test]
fn query_without_rows_is_not_found() {
    let (manager, _journal) = manager();
    let mut orm = manager.open().unwrap();

    let err = orm
        .query(&mut Tag {
            id: 42,
            label: String::new(),
        })
        .unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.class, ErrorClass::NotFound);
}

#[test]
fn transaction_wraps_writes() {
    let (manager, journal) = manager();
    let mut orm = manager.open().unwrap();

    orm.transaction(|orm| {
        orm.insert(&mut Tag {
            id: 0,
            label: "one".to_string(),
        })
    })
    .unwrap();

    let journal = journal.lock().unwrap();
    assert_eq!(journal.first().map(String::as_str), Some("BEGIN"));
    assert_eq!(journal.last().map(String::as_str), Some("COMMIT"));
}
