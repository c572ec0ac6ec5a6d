//! MongoDB database wrapper.

use mongodb::{options::ClientOptions, Client, Collection};
use tracing::info;

/// Connected MongoDB database.
#[derive(Debug, Clone)]
pub struct Database {
    db: mongodb::Database,
}

impl Database {
    /// Connect and ping.
    ///
    /// # Errors
    /// Returns error if the URI is invalid or the server does not answer.
    pub async fn connect(uri: &str, db_name: &str) -> anyhow::Result<Self> {
        let options = ClientOptions::parse(uri).await?;
        let client = Client::with_options(options)?;

        client
            .database("admin")
            .run_command(mongodb::bson::doc! { "ping": 1 })
            .await?;

        info!("Connected to MongoDB database '{}'", db_name);

        Ok(Self {
            db: client.database(db_name),
        })
    }

    /// Typed collection handle.
    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }
}
