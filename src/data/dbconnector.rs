use anyhow::{Context, anyhow};
use log::debug;
use sea_orm::sea_query::Index;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, IdenStatic, Schema, Statement,
};

use crate::entity::{artist_calendar, artists, shows, venues};

pub(crate) trait DBConnection {
    async fn connect(&mut self) -> Result<(), anyhow::Error>;
    async fn check(&self) -> Result<(), anyhow::Error>;
    async fn close(&self) -> Result<(), anyhow::Error>;
    async fn is_initialized(&self) -> Result<bool, anyhow::Error>;
    async fn initialize(&self) -> Result<(), anyhow::Error>;
}

pub struct SQLConnector {
    url: String,
    database_connection: Option<DatabaseConnection>,
}

impl SQLConnector {
    /// Connector for `<path>/db.sqlite`, created on first connect.
    pub fn new(path: &str) -> Self {
        Self::from_url(format!("sqlite://{path}/db.sqlite?mode=rwc"))
    }

    pub fn from_url(url: impl Into<String>) -> Self {
        SQLConnector {
            url: url.into(),
            database_connection: None,
        }
    }

    pub fn connection(&self) -> Result<&DatabaseConnection, anyhow::Error> {
        self.database_connection
            .as_ref()
            .ok_or_else(|| anyhow!("database is not connected"))
    }
}

impl DBConnection for SQLConnector {
    async fn connect(&mut self) -> Result<(), anyhow::Error> {
        if let Some(dir) = self
            .url
            .strip_prefix("sqlite://")
            .and_then(|rest| rest.rsplit_once('/'))
            .map(|(dir, _)| dir)
        {
            std::fs::create_dir_all(dir).context("failed to create data directory")?;
        }

        let mut options = ConnectOptions::new(self.url.clone());
        // every pooled connection of an in-memory database would see its own empty schema
        if self.url.contains(":memory:") {
            options.max_connections(1).min_connections(1);
        }
        options.sqlx_logging(false);

        // sqlx opens every SQLite connection with foreign keys on, cascades rely on it
        let db = Database::connect(options)
            .await
            .with_context(|| format!("failed to open {}", self.url))?;

        self.database_connection = Some(db);
        Ok(())
    }

    async fn check(&self) -> Result<(), anyhow::Error> {
        if let Some(ref db) = self.database_connection {
            db.ping().await?;
        }
        Ok(())
    }

    async fn close(&self) -> Result<(), anyhow::Error> {
        if let Some(ref db) = self.database_connection {
            let db = db.clone();
            db.close().await?;
        }
        Ok(())
    }

    async fn is_initialized(&self) -> Result<bool, anyhow::Error> {
        let db = self.connection()?;
        let backend = db.get_database_backend();
        let wanted = [
            venues::Entity.as_str(),
            artists::Entity.as_str(),
            shows::Entity.as_str(),
            artist_calendar::Entity.as_str(),
        ];

        for table in wanted {
            let found = db
                .query_one(Statement::from_sql_and_values(
                    backend,
                    "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?",
                    [table.into()],
                ))
                .await
                .context("failed to inspect schema")?;
            if found.is_none() {
                debug!("Table {table} is missing");
                return Ok(false);
            }
        }
        Ok(true)
    }

    async fn initialize(&self) -> Result<(), anyhow::Error> {
        let db = self.connection()?;
        let backend = db.get_database_backend();
        let schema = Schema::new(backend);

        // parents before children so the foreign keys resolve
        let mut tables = vec![
            schema.create_table_from_entity(venues::Entity),
            schema.create_table_from_entity(artists::Entity),
            schema.create_table_from_entity(shows::Entity),
            schema.create_table_from_entity(artist_calendar::Entity),
        ];
        for table in tables.iter_mut() {
            table.if_not_exists();
            db.execute(backend.build(&*table))
                .await
                .context("failed to create table")?;
        }

        let calendar_index = Index::create()
            .name("idx_artist_calendar_artist_date")
            .table(artist_calendar::Entity)
            .col(artist_calendar::Column::ArtistId)
            .col(artist_calendar::Column::Date)
            .unique()
            .if_not_exists()
            .to_owned();
        db.execute(backend.build(&calendar_index))
            .await
            .context("failed to create calendar index")?;

        debug!("Schema created");
        Ok(())
    }
}

/// Fresh in-memory database with the schema applied.
#[cfg(test)]
pub(crate) async fn memory_connector() -> SQLConnector {
    let mut connector = SQLConnector::from_url("sqlite::memory:");
    connector.connect().await.unwrap();
    connector.initialize().await.unwrap();
    connector
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn initialize_is_detected_and_repeatable() {
        let mut connector = SQLConnector::from_url("sqlite::memory:");
        connector.connect().await.unwrap();
        connector.check().await.unwrap();
        assert!(!connector.is_initialized().await.unwrap());

        connector.initialize().await.unwrap();
        assert!(connector.is_initialized().await.unwrap());

        // IF NOT EXISTS everywhere
        connector.initialize().await.unwrap();
        connector.close().await.unwrap();
    }

    #[tokio::test]
    async fn foreign_keys_are_enforced() {
        let connector = memory_connector().await;
        let db = connector.connection().unwrap();
        let row = db
            .query_one(Statement::from_string(
                db.get_database_backend(),
                "PRAGMA foreign_keys",
            ))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(row.try_get::<i32>("", "foreign_keys").unwrap(), 1);
    }

    #[test]
    fn connection_requires_connect() {
        let connector = SQLConnector::new("data");
        assert!(connector.connection().is_err());
    }
}
