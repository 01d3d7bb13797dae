use anyhow::{anyhow, Context, Result};
use std::env;
use std::net::SocketAddr;

pub const DEFAULT_MONGO_URI: &str = "mongodb://127.0.0.1:27017";
pub const DEFAULT_DATABASE: &str = "rolodex";
pub const DEFAULT_PHONE_API_BASE: &str = "https://api.api-ninjas.com/v1";
const DEFAULT_PORT: u16 = 3000;

/// Process configuration, read from the environment once at startup.
///
/// Resolvers that need the phone service credential get it from here rather
/// than re-reading the environment per call, so a missing key fails the
/// process at boot instead of failing individual requests later.
#[derive(Debug, Clone)]
pub struct Config {
    /// API Ninjas key used for phone validation and world-time lookups.
    pub api_key: String,
    /// MongoDB connection string.
    pub mongo_uri: String,
    /// Database holding the contacts collection.
    pub database: String,
    /// Base URL of the phone intelligence service.
    pub phone_api_base: String,
    /// Address the GraphQL server binds to.
    pub bind_addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("API_KEY").map_err(|_| {
            anyhow!(
                "API_KEY environment variable not set. Get a key from https://api-ninjas.com and set it using: export API_KEY='your-key-here'"
            )
        })?;

        let mongo_uri = env::var("MONGO_URI").unwrap_or_else(|_| DEFAULT_MONGO_URI.to_string());
        let database = env::var("MONGO_DB").unwrap_or_else(|_| DEFAULT_DATABASE.to_string());
        let phone_api_base =
            env::var("PHONE_API_BASE").unwrap_or_else(|_| DEFAULT_PHONE_API_BASE.to_string());

        let port = match env::var("PORT") {
            Ok(value) => value
                .parse::<u16>()
                .with_context(|| format!("PORT must be a number, got '{}'", value))?,
            Err(_) => DEFAULT_PORT,
        };

        Ok(Self {
            api_key,
            mongo_uri,
            database,
            phone_api_base,
            bind_addr: SocketAddr::from(([127, 0, 0, 1], port)),
        })
    }
}
