use crate::error::{ErrorOrigin, OrmError};
use serde::Deserialize;

///
/// OrmConfig
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct OrmConfig {
    pub server: ServerConfig,
}

impl OrmConfig {
    pub fn validate(&self) -> Result<(), OrmError> {
        self.server.validate()
    }
}

///
/// ServerConfig
/// Connection settings handed to the driver's `Connector`.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub user: String,
    pub password: String,
    pub address: String,
    pub db_name: String,
    pub charset: String,
}

impl ServerConfig {
    pub const DEFAULT_CHARSET: &'static str = "utf8";

    pub fn validate(&self) -> Result<(), OrmError> {
        if self.address.trim().is_empty() {
            return Err(OrmError::invalid_argument(
                ErrorOrigin::Config,
                "server address is empty",
            ));
        }
        if self.db_name.trim().is_empty() {
            return Err(OrmError::invalid_argument(
                ErrorOrigin::Config,
                "database name is empty",
            ));
        }

        Ok(())
    }

    /// Driver URL, e.g. `mysql://root:pw@localhost:3306/app?charset=utf8`.
    #[must_use]
    pub fn url(&self) -> String {
        let credentials = if self.password.is_empty() {
            self.user.clone()
        } else {
            format!("{}:{}", self.user, self.password)
        };

        format!(
            "mysql://{credentials}@{}/{}?charset={}",
            self.address, self.db_name, self.charset
        )
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            user: "root".to_string(),
            password: String::new(),
            address: "localhost:3306".to_string(),
            db_name: String::new(),
            charset: Self::DEFAULT_CHARSET.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorClass;

    fn server(db_name: &str) -> ServerConfig {
        ServerConfig {
            db_name: db_name.to_string(),
            ..ServerConfig::default()
        }
    }

    #[test]
    fn defaults_target_local_server() {
        let config = ServerConfig::default();

        assert_eq!(config.user, "root");
        assert_eq!(config.address, "localhost:3306");
        assert_eq!(config.charset, "utf8");
    }

    #[test]
    fn url_omits_empty_password() {
        assert_eq!(
            server("app").url(),
            "mysql://root@localhost:3306/app?charset=utf8"
        );

        let config = ServerConfig {
            password: "pw".to_string(),
            ..server("app")
        };
        assert_eq!(config.url(), "mysql://root:pw@localhost:3306/app?charset=utf8");
    }

    #[test]
    fn partial_documents_keep_defaults() {
        let config: OrmConfig =
            serde_json::from_str(r#"{ "server": { "db_name": "app", "user": "svc" } }"#).unwrap();

        assert_eq!(config.server.user, "svc");
        assert_eq!(config.server.db_name, "app");
        assert_eq!(config.server.charset, "utf8");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let parsed = serde_json::from_str::<OrmConfig>(r#"{ "server": { "host": "db" } }"#);

        assert!(parsed.is_err());
    }

    #[test]
    fn validate_requires_address_and_database() {
        let err = ServerConfig::default().validate().unwrap_err();
        assert_eq!(err.class, ErrorClass::InvalidArgument);
        assert_eq!(err.origin, ErrorOrigin::Config);

        let config = ServerConfig {
            address: " ".to_string(),
            ..server("app")
        };
        assert!(config.validate().is_err());
    }
}
