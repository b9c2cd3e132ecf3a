use std::{env, error::Error};

use async_trait::async_trait;
use model::{spot::DroneSpot, WithId};
use spots::database::{Database, Result, SpotRepo};
use utility::id::Id;

pub mod data_model;
pub mod queries;

pub struct DatabaseConnectionInfo {
    pub username: String,
    pub password: String,
    pub hostname: String,
    pub port: u16,
    pub database: String,
}

impl DatabaseConnectionInfo {
    pub fn from_env() -> Option<Self> {
        let username = env::var("DATABASE_USER").ok()?;
        let password = env::var("DATABASE_PASSWORD").ok()?;
        let hostname = env::var("DATABASE_HOST").ok()?;
        let port: u16 = env::var("DATABASE_PORT").ok()?.parse().ok()?;
        let database = env::var("DATABASE_NAME").ok()?;
        Some(Self {
            username,
            password,
            hostname,
            port,
            database,
        })
    }

    pub(self) fn postgres_url(self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username, self.password, self.hostname, self.port, self.database
        )
    }
}

#[derive(Clone)]
pub struct PgDatabase {
    connection: sqlx::PgPool,
}

pub struct PgDatabaseAutocommit {
    pool: sqlx::PgPool,
}

impl PgDatabase {
    pub async fn connect(
        database_connection_info: DatabaseConnectionInfo,
    ) -> std::result::Result<Self, Box<dyn Error>> {
        log::info!(
            "connecting to postgres at {}:{}/{}",
            database_connection_info.hostname,
            database_connection_info.port,
            database_connection_info.database
        );
        let url = database_connection_info.postgres_url();
        let pool = sqlx::postgres::PgPool::connect(&url).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { connection: pool })
    }
}

impl Database for PgDatabase {
    type Autocommit = PgDatabaseAutocommit;

    fn auto(&self) -> Self::Autocommit {
        PgDatabaseAutocommit {
            pool: self.connection.clone(),
        }
    }
}

#[async_trait]
impl SpotRepo for PgDatabaseAutocommit {
    async fn insert(&mut self, spot: DroneSpot) -> Result<WithId<DroneSpot>> {
        queries::spot::insert(&self.pool, spot).await
    }

    async fn get_all(&mut self) -> Result<Vec<WithId<DroneSpot>>> {
        queries::spot::get_all(&self.pool).await
    }

    async fn get_many(
        &mut self,
        ids: &[Id<DroneSpot>],
    ) -> Result<Vec<WithId<DroneSpot>>> {
        queries::spot::get_many(&self.pool, ids).await
    }
}
