pub mod entity_ref;
pub mod pipelines;
pub mod repository;

pub use repository::{Repository, StoredEntity};

use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::{Client, Database};
use std::time::Duration;
use thiserror::Error;

use crate::config::StoreConfig;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Duplicate(&'static str),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("store driver error: {0}")]
    Driver(#[from] mongodb::error::Error),
    #[error("failed to decode stored document: {0}")]
    Decode(#[from] mongodb::bson::de::Error),
    #[error("failed to encode document: {0}")]
    Encode(#[from] mongodb::bson::ser::Error),
    #[error("store returned a non-ObjectId key")]
    UnexpectedKey,
}

/// Handle to the backing MongoDB database.
#[derive(Clone)]
pub struct Store {
    db: Database,
}

impl Store {
    /// Build the client. The driver connects lazily, so this succeeds even
    /// when the database is down; individual operations surface the failure.
    pub async fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        let mut options = ClientOptions::parse(&config.uri).await?;
        options.app_name = Some("sgt-api".to_string());
        options.server_selection_timeout = Some(Duration::from_secs(config.selection_timeout_secs));

        let client = Client::with_options(options)?;
        Ok(Self {
            db: client.database(&config.database),
        })
    }

    /// Typed repository over the entity's collection.
    pub fn repository<D: StoredEntity>(&self) -> Repository<D> {
        Repository::new(self.db.collection::<D>(D::COLLECTION))
    }

    pub async fn ping(&self) -> Result<(), StoreError> {
        self.db.run_command(doc! { "ping": 1 }, None).await?;
        Ok(())
    }
}
