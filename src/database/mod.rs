mod user_store;

#[cfg(test)]
pub mod memory;

pub use user_store::*;

use crate::utils::AppError;
use mongodb::bson::doc;
use mongodb::{options::ClientOptions, Client, Collection, Database};
use std::time::Duration;

/// Database used when neither the URI path nor configuration names one.
pub const DEFAULT_DATABASE: &str = "test";

#[derive(Clone)]
pub struct MongoDB {
    db: Database,
}

impl MongoDB {
    /// Builds the shared client. The driver connects lazily, so this only
    /// fails on a malformed connection string; use [`MongoDB::ping`] to
    /// check that the server is reachable.
    pub async fn new(uri: &str, database_override: Option<&str>) -> Result<Self, AppError> {
        let mut client_options = ClientOptions::parse(uri).await?;

        client_options.app_name = Some(env!("CARGO_PKG_NAME").to_string());

        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(5);
        client_options.max_idle_time = Some(Duration::from_secs(300));

        client_options.connect_timeout = Some(Duration::from_secs(5));
        client_options.server_selection_timeout = Some(Duration::from_secs(5));

        let db_name = database_override
            .map(str::to_string)
            .or_else(|| client_options.default_database.clone())
            .unwrap_or_else(|| DEFAULT_DATABASE.to_string());

        let client = Client::with_options(client_options)?;
        let db = client.database(&db_name);

        Ok(Self { db })
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    pub fn name(&self) -> &str {
        self.db.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_database_name_from_uri() {
        let db = MongoDB::new("mongodb://localhost:27017/people", None).await.unwrap();
        assert_eq!(db.name(), "people");
    }

    #[tokio::test]
    async fn test_database_name_defaults() {
        let db = MongoDB::new("mongodb://localhost:27017", None).await.unwrap();
        assert_eq!(db.name(), DEFAULT_DATABASE);
    }

    #[tokio::test]
    async fn test_database_name_override() {
        let db = MongoDB::new("mongodb://localhost:27017/people", Some("staff")).await.unwrap();
        assert_eq!(db.name(), "staff");
    }

    #[tokio::test]
    async fn test_malformed_uri_is_rejected() {
        let result = MongoDB::new("not-a-mongodb-uri", None).await;
        assert!(matches!(result, Err(AppError::DatabaseError(_))));
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_mongodb_connection() {
        dotenv::dotenv().ok();
        let uri = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "mongodb://localhost:27017/test".to_string());

        let db = MongoDB::new(&uri, None).await.unwrap();
        assert!(db.ping().await.is_ok());
    }
}
