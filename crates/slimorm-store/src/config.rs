//! Connection configuration
//!
//! Read from YAML, e.g.
//!
//! ```yaml
//! connection:
//!   backend: sqlite
//!   path: blog.db
//! log_profile: dev
//! ```

use crate::errors::{config_io, config_parse, Result};
use serde::Deserialize;
use slimorm_core_types::Sensitive;
use std::path::{Path, PathBuf};

fn default_autocommit() -> bool {
    true
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    3306
}

/// Which backend to open and how
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum ConnectParams {
    /// Embedded database file; `:memory:` opens a private in-memory database
    Sqlite {
        path: PathBuf,
        #[serde(default = "default_autocommit")]
        autocommit: bool,
    },
    /// Networked MySQL/MariaDB server
    #[serde(rename = "mysql")]
    MySql {
        database: String,
        user: String,
        #[serde(default)]
        password: Sensitive<String>,
        #[serde(default = "default_host")]
        host: String,
        #[serde(default = "default_port")]
        port: u16,
    },
}

impl ConnectParams {
    /// Embedded database at `path`, autocommit on
    pub fn sqlite(path: impl Into<PathBuf>) -> Self {
        ConnectParams::Sqlite {
            path: path.into(),
            autocommit: true,
        }
    }

    /// MySQL server on localhost:3306
    pub fn mysql(
        database: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        ConnectParams::MySql {
            database: database.into(),
            user: user.into(),
            password: Sensitive::new(password.into()),
            host: default_host(),
            port: default_port(),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            ConnectParams::Sqlite { .. } => "sqlite",
            ConnectParams::MySql { .. } => "mysql",
        }
    }
}

/// Top-level configuration file
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConnectionConfig {
    pub connection: ConnectParams,
    /// Logging profile name (`dev`, `prod`, `test`)
    #[serde(default)]
    pub log_profile: Option<String>,
}

impl ConnectionConfig {
    /// Parse a configuration from YAML text
    ///
    /// # Errors
    ///
    /// Returns `OrmError::Config` for malformed YAML, an unknown backend or
    /// missing required fields.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(config_parse)
    }

    /// Read and parse a YAML configuration file
    ///
    /// # Errors
    ///
    /// Returns `OrmError::Config` if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| config_io(path, e))?;
        Self::from_yaml_str(&text)
    }
}
