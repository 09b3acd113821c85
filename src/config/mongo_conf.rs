use serde::{Deserialize, Serialize};
use std::env;
use tracing::{debug, error, info, warn};

use crate::config::ConfigError;

/// MongoDB configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoConfig {
    /// MongoDB connection URI
    pub uri: String,
    /// Database name
    pub database: String,
    /// Username for authentication (optional)
    pub username: Option<String>,
    /// Password for authentication (optional)
    pub password: Option<String>,
    /// Collection name for users
    pub users_collection: String,
    /// Collection name for daily reports
    pub reports_collection: String,
    /// Connection pool size
    pub pool_size: u32,
    /// Connection timeout in seconds
    pub connection_timeout_secs: u64,
}

impl MongoConfig {
    /// Load MongoDB configuration from environment variables
    ///
    /// Expected environment variables:
    /// - MONGO_URI: MongoDB connection URI (required)
    /// - MONGO_DATABASE: Database name (required)
    /// - MONGO_USERS_COLLECTION: Collection name for users (defaults to "users")
    /// - MONGO_REPORTS_COLLECTION: Collection name for daily reports (defaults to "daily_reports")
    /// - MONGO_POOL_SIZE: Connection pool size (defaults to 10)
    /// - MONGO_CONNECTION_TIMEOUT: Connection timeout in seconds (defaults to 5)
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading MongoDB configuration from environment variables");

        let uri = env::var("MONGO_URI").map_err(|_| {
            error!("MONGO_URI environment variable not found");
            ConfigError::EnvVarNotFound("MONGO_URI".to_string())
        })?;

        let database = env::var("MONGO_DATABASE").map_err(|_| {
            error!("MONGO_DATABASE environment variable not found");
            ConfigError::EnvVarNotFound("MONGO_DATABASE".to_string())
        })?;
        debug!("MongoDB database: {}", database);

        let username = env::var("MONGO_USERNAME").ok();
        let password = env::var("MONGO_PASSWORD").ok();

        let users_collection =
            env::var("MONGO_USERS_COLLECTION").unwrap_or_else(|_| "users".to_string());
        let reports_collection =
            env::var("MONGO_REPORTS_COLLECTION").unwrap_or_else(|_| "daily_reports".to_string());

        let pool_size = env::var("MONGO_POOL_SIZE")
            .unwrap_or_else(|_| {
                warn!("MONGO_POOL_SIZE not set, using default: 10");
                "10".to_string()
            })
            .parse::<u32>()
            .map_err(|_| {
                error!("Invalid MONGO_POOL_SIZE value");
                ConfigError::InvalidValue("Invalid MONGO_POOL_SIZE value".to_string())
            })?;

        let connection_timeout_secs = env::var("MONGO_CONNECTION_TIMEOUT")
            .unwrap_or_else(|_| {
                warn!("MONGO_CONNECTION_TIMEOUT not set, using default: 5 seconds");
                "5".to_string()
            })
            .parse::<u64>()
            .map_err(|_| {
                error!("Invalid MONGO_CONNECTION_TIMEOUT value");
                ConfigError::InvalidValue("Invalid MONGO_CONNECTION_TIMEOUT value".to_string())
            })?;

        let config = MongoConfig {
            uri,
            database,
            username,
            password,
            users_collection,
            reports_collection,
            pool_size,
            connection_timeout_secs,
        };

        config.validate()?;
        info!("MongoDB configuration loaded successfully");
        Ok(config)
    }

    /// Create MongoConfig for testing
    pub fn from_test_env() -> Self {
        MongoConfig {
            uri: "mongodb://localhost:27017".to_string(),
            database: "medrep_test".to_string(),
            username: None,
            password: None,
            users_collection: "test_users".to_string(),
            reports_collection: "test_daily_reports".to_string(),
            pool_size: 2,
            connection_timeout_secs: 2,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.uri.is_empty() {
            error!("MongoDB URI is empty");
            return Err(ConfigError::ValidationError(
                "MongoDB URI cannot be empty".to_string(),
            ));
        }

        if self.database.is_empty() {
            error!("MongoDB database is empty");
            return Err(ConfigError::ValidationError(
                "MongoDB database cannot be empty".to_string(),
            ));
        }

        if self.users_collection.is_empty() || self.reports_collection.is_empty() {
            error!("MongoDB collection name is empty");
            return Err(ConfigError::ValidationError(
                "MongoDB collection names cannot be empty".to_string(),
            ));
        }

        if self.pool_size == 0 {
            error!("MongoDB pool size is 0");
            return Err(ConfigError::ValidationError(
                "MongoDB pool size must be greater than 0".to_string(),
            ));
        }

        if self.connection_timeout_secs == 0 {
            error!("MongoDB connection timeout is 0");
            return Err(ConfigError::ValidationError(
                "MongoDB connection timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Connect and return a handle to the configured database.
    ///
    /// The client is created once at startup and shared by every repository.
    pub async fn connect(&self) -> Result<mongodb::Database, mongodb::error::Error> {
        use mongodb::{
            options::{ClientOptions, Credential, ResolverConfig},
            Client,
        };

        let mut client_options =
            ClientOptions::parse_with_resolver_config(&self.uri, ResolverConfig::cloudflare())
                .await?;
        client_options.app_name = Some("MedrepBackend".to_string());
        client_options.max_pool_size = Some(self.pool_size);
        client_options.connect_timeout =
            Some(std::time::Duration::from_secs(self.connection_timeout_secs));

        if let (Some(ref username), Some(ref password)) = (&self.username, &self.password) {
            client_options.credential = Some(
                Credential::builder()
                    .username(username.clone())
                    .password(password.clone())
                    .build(),
            );
        }

        let client = Client::with_options(client_options)?;
        Ok(client.database(&self.database))
    }
}

impl Default for MongoConfig {
    fn default() -> Self {
        MongoConfig {
            uri: "mongodb://localhost:27017".to_string(),
            database: "medrep".to_string(),
            username: None,
            password: None,
            users_collection: "users".to_string(),
            reports_collection: "daily_reports".to_string(),
            pool_size: 10,
            connection_timeout_secs: 5,
        }
    }
}
