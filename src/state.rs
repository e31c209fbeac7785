use crate::{
    config::{DbConfig, RuntimeConfiguration},
    data::{
        StudentStore,
        sql_store::{PostgresStudentStore, SqliteStudentStore},
    },
    error::{MigrateSnafu, OpenDatabaseSnafu, RegistrarResult},
};
use snafu::ResultExt;
use sqlx::{
    postgres::PgPoolOptions,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use std::{ops::Deref, str::FromStr, sync::Arc, time::Duration};

#[derive(Clone, Debug)]
pub struct RegistrarState {
    students: Arc<dyn StudentStore>,
}

impl RegistrarState {
    pub async fn new(config: &RuntimeConfiguration) -> RegistrarResult<Self> {
        let db_config = config.db_config();

        let students: Arc<dyn StudentStore> = match &*db_config {
            DbConfig::Postgres { .. } => {
                Arc::new(open_postgres(&db_config, config.max_connections()).await?)
            }
            DbConfig::Sqlite { .. } => {
                Arc::new(open_sqlite(&db_config, config.max_connections()).await?)
            }
        };

        Ok(Self::from_store(students))
    }

    pub fn from_store(students: Arc<dyn StudentStore>) -> Self {
        Self { students }
    }

    pub async fn sensible_shutdown(&self) {
        self.students.close().await;
        info!("Closed database pool");
    }
}

impl Deref for RegistrarState {
    type Target = dyn StudentStore;

    fn deref(&self) -> &Self::Target {
        &*self.students
    }
}

async fn open_postgres(
    db_config: &DbConfig,
    max_connections: u32,
) -> RegistrarResult<PostgresStudentStore> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(&db_config.get_db_path())
        .await
        .context(OpenDatabaseSnafu)?;

    sqlx::migrate!("migrations/postgres")
        .run(&pool)
        .await
        .context(MigrateSnafu)?;

    Ok(PostgresStudentStore::new(pool))
}

pub async fn open_sqlite(
    db_config: &DbConfig,
    max_connections: u32,
) -> RegistrarResult<SqliteStudentStore> {
    let options = SqliteConnectOptions::from_str(&db_config.get_db_path())
        .context(OpenDatabaseSnafu)?
        .create_if_missing(true);

    //every in-memory connection is its own database, so there can only be one
    let pool_options = if db_config.is_in_memory() {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(Option::<Duration>::None)
            .max_lifetime(Option::<Duration>::None)
    } else {
        SqlitePoolOptions::new().max_connections(max_connections)
    };

    let pool = pool_options
        .connect_with(options)
        .await
        .context(OpenDatabaseSnafu)?;

    sqlx::migrate!("migrations/sqlite")
        .run(&pool)
        .await
        .context(MigrateSnafu)?;

    info!(path = %db_config.get_db_path(), "Opened sqlite database");
    Ok(SqliteStudentStore::new(pool))
}
