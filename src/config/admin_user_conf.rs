use serde::{Deserialize, Serialize};
use std::env;

use crate::config::ConfigError;

/// Credentials for the first admin account, seeded at startup when absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUserConfig {
    pub username: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub region: Option<String>,
}

impl AdminUserConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(AdminUserConfig {
            username: env::var("ADMIN_USERNAME")
                .map_err(|_| ConfigError::EnvVarNotFound("ADMIN_USERNAME".to_string()))?,
            name: env::var("ADMIN_NAME")
                .map_err(|_| ConfigError::EnvVarNotFound("ADMIN_NAME".to_string()))?,
            email: env::var("ADMIN_EMAIL")
                .map_err(|_| ConfigError::EnvVarNotFound("ADMIN_EMAIL".to_string()))?,
            password: env::var("ADMIN_PASSWORD")
                .map_err(|_| ConfigError::EnvVarNotFound("ADMIN_PASSWORD".to_string()))?,
            region: env::var("ADMIN_REGION").ok(),
        })
    }
}
