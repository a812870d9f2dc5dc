use crate::{
    cache::StructInfoCache,
    config::OrmConfig,
    error::OrmError,
    executor::{Connector, Executor},
    orm::Orm,
};
use std::fmt;
use tracing::debug;

///
/// Manager
///
/// Owns the connection settings, the driver connector and the schema cache
/// shared by every facade it opens. Dropping the manager drops the cache.
///

pub struct Manager {
    config: OrmConfig,
    connector: Box<dyn Connector>,
    cache: StructInfoCache,
}

impl Manager {
    pub fn new(config: OrmConfig, connector: impl Connector + 'static) -> Result<Self, OrmError> {
        Self::with_cache(config, connector, StructInfoCache::new())
    }

    pub fn with_cache(
        config: OrmConfig,
        connector: impl Connector + 'static,
        cache: StructInfoCache,
    ) -> Result<Self, OrmError> {
        config.validate()?;

        Ok(Self {
            config,
            connector: Box::new(connector),
            cache,
        })
    }

    /// Open a facade on a fresh executor.
    pub fn open(&self) -> Result<Orm<Box<dyn Executor>>, OrmError> {
        debug!(address = %self.config.server.address, db = %self.config.server.db_name, "connecting");
        let executor = self.connector.connect(&self.config.server)?;

        Ok(Orm::new(executor, self.cache.clone()))
    }

    #[must_use]
    pub const fn config(&self) -> &OrmConfig {
        &self.config
    }

    #[must_use]
    pub const fn cache(&self) -> &StructInfoCache {
        &self.cache
    }

    /// Forget every ensured schema; the next call re-checks each table.
    pub fn reset(&self) {
        self.cache.reset();
    }
}

impl fmt::Debug for Manager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Manager")
            .field("config", &self.config)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::ServerConfig,
        error::{ErrorClass, ErrorOrigin},
        test_support::{ScriptedConnector, entity::Parent},
    };
    use std::sync::{Arc, atomic::Ordering};

    fn config() -> OrmConfig {
        OrmConfig {
            server: ServerConfig {
                db_name: "app".to_string(),
                ..ServerConfig::default()
            },
        }
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let err = Manager::new(OrmConfig::default(), ScriptedConnector::default()).unwrap_err();

        assert_eq!(err.class, ErrorClass::InvalidArgument);
        assert_eq!(err.origin, ErrorOrigin::Config);
    }

    #[test]
    fn open_connects_once_per_facade() {
        let connector = ScriptedConnector::default();
        let connections = Arc::clone(&connector.connections);
        let manager = Manager::new(config(), connector).unwrap();

        let first = manager.open().unwrap();
        let second = manager.open().unwrap();

        assert_eq!(connections.load(Ordering::SeqCst), 2);
        first.release().unwrap();
        second.release().unwrap();
    }

    #[test]
    fn refused_connection_is_a_driver_error() {
        let manager = Manager::new(config(), ScriptedConnector::refusing()).unwrap();

        let err = manager.open().err().unwrap();
        assert_eq!(err.class, ErrorClass::Driver);
        assert!(err.message.contains("mysql://root@localhost:3306/app"), "{err}");
    }

    #[test]
    fn facades_share_the_schema_cache() {
        let manager = Manager::new(config(), ScriptedConnector::default()).unwrap();

        manager.open().unwrap().create::<Parent>().unwrap();
        assert!(manager.cache().fetch("test_Parent").is_some());

        manager.reset();
        assert!(manager.cache().fetch("test_Parent").is_none());
    }
}
