pub mod client;
pub mod config;
pub mod controllers;
pub mod database;
pub mod dates;
pub mod error;
pub mod models;
pub mod services;
pub mod store;
pub mod validation;

use std::sync::Arc;
use tracing::info;

use config::{Config, StorageBackend};
use database::Database;
use services::EventService;
use store::{EventStore, InMemoryEventStore, PgEventStore, StoreError};

// Shared state for the whole application
#[derive(Clone)]
pub struct AppState {
    pub events: EventService,
    pub config: Config,
    db: Option<Database>,
}

impl AppState {
    /// Builds the configured store: connects and migrates for postgres,
    /// starts empty for memory.
    pub async fn new(config: Config) -> Result<Arc<Self>, StoreError> {
        match config.database.clone() {
            Some(database) if config.storage.backend == StorageBackend::Postgres => {
                let db = Database::connect(&database).await?;
                db.migrate().await?;

                let store = Arc::new(PgEventStore::new(db.clone()));
                Ok(Arc::new(Self {
                    events: EventService::new(store),
                    config,
                    db: Some(db),
                }))
            }
            _ => {
                info!("Using in-memory event store");
                Ok(Self::with_store(config, Arc::new(InMemoryEventStore::new())))
            }
        }
    }

    pub fn with_store(config: Config, store: Arc<dyn EventStore>) -> Arc<Self> {
        Arc::new(Self {
            events: EventService::new(store),
            config,
            db: None,
        })
    }

    /// Releases storage resources. Call once the server has stopped.
    pub async fn shutdown(&self) {
        if let Some(db) = &self.db {
            db.close().await;
        }
    }
}
