use crate::error::{BadEnvVarSnafu, ParseNumberSnafu, RegistrarResult, UnknownDatabaseKindSnafu};
use dotenvy::var;
use secrecy::{ExposeSecret, SecretString};
use snafu::ResultExt;
use std::sync::Arc;

const DEFAULT_SERVER_IP: &str = "127.0.0.1:8080";
const DEFAULT_MAX_CONNECTIONS: u32 = 15;

#[derive(Clone, Debug)]
pub struct RuntimeConfiguration {
    server_ip: String,
    max_connections: u32,
    db_config: Arc<DbConfig>,
}

impl RuntimeConfiguration {
    pub fn new() -> RegistrarResult<Self> {
        let max_connections = match var("DB_MAX_CONNECTIONS") {
            Ok(raw) => raw.parse::<u32>().context(ParseNumberSnafu {
                name: "DB_MAX_CONNECTIONS",
            })?,
            Err(_) => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Self {
            server_ip: var("REGISTRAR_SERVER_IP").unwrap_or_else(|_| DEFAULT_SERVER_IP.to_string()),
            max_connections,
            db_config: Arc::new(DbConfig::new()?),
        })
    }

    pub fn server_ip(&self) -> &str {
        &self.server_ip
    }

    pub const fn max_connections(&self) -> u32 {
        self.max_connections
    }

    pub fn db_config(&self) -> Arc<DbConfig> {
        self.db_config.clone()
    }
}

/// Where the student table lives. Chosen with `DB_KIND`, defaulting to postgres.
#[derive(Debug)]
pub enum DbConfig {
    Postgres {
        user: String,
        password: SecretString,
        path: String,
        port: u16,
        database: String,
    },
    /// `path` is a file on disk, or `:memory:` for a throwaway database.
    Sqlite { path: String },
}

impl DbConfig {
    pub fn new() -> RegistrarResult<Self> {
        let get_env_var = |name| var(name).context(BadEnvVarSnafu { name });
        let kind = var("DB_KIND").unwrap_or_else(|_| "postgres".to_string());

        match kind.as_str() {
            "postgres" => Ok(Self::Postgres {
                user: get_env_var("DB_USER")?,
                password: SecretString::from(get_env_var("DB_PASSWORD")?),
                path: get_env_var("DB_PATH")?,
                port: get_env_var("DB_PORT")?
                    .parse()
                    .context(ParseNumberSnafu { name: "DB_PORT" })?,
                database: get_env_var("DB_NAME")?,
            }),
            "sqlite" => Ok(Self::Sqlite {
                path: get_env_var("DB_PATH")?,
            }),
            other => UnknownDatabaseKindSnafu { kind: other }.fail(),
        }
    }

    pub fn get_db_path(&self) -> String {
        match self {
            Self::Postgres {
                user,
                password,
                path,
                port,
                database,
            } => format!(
                "postgres://{}:{}@{}:{}/{}",
                user,
                password.expose_secret(),
                path,
                port,
                database
            ),
            Self::Sqlite { path } if path == ":memory:" => "sqlite::memory:".to_string(),
            Self::Sqlite { path } => format!("sqlite://{path}"),
        }
    }

    pub fn is_in_memory(&self) -> bool {
        matches!(self, Self::Sqlite { path } if path.as_str() == ":memory:")
    }
}
