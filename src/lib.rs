pub mod config;
pub mod error;
pub mod graphql;
pub mod phone_api;
pub mod server;
pub mod store;

use anyhow::Result;
use log::info;
use std::sync::Arc;

use phone_api::{ApiNinjas, PhoneApi};
use store::{ContactStore, MongoContactStore};

// Re-export commonly used types
pub use config::Config;
pub use error::{ContactError, ContactResult};
pub use graphql::{build_schema, ContactSchema};
pub use store::ContactRecord;

/// Wire up configuration, storage, and the phone service client, then serve
/// the GraphQL API until the process is stopped.
pub async fn run() -> Result<()> {
    let config = Config::from_env()?;

    let store = MongoContactStore::connect(&config).await?;
    store.ensure_indexes().await?;
    info!("Connected to MongoDB at {} (db '{}')", config.mongo_uri, config.database);

    let store: Arc<dyn ContactStore> = Arc::new(store);
    let phone_api: Arc<dyn PhoneApi> = Arc::new(ApiNinjas::new(&config));
    let schema = build_schema(store, phone_api);

    server::start_server(&config, schema).await
}
