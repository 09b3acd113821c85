use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::config::JwtConfig;
use crate::model::user::User;

/// Session token claims. Carries the full profile the frontend renders
/// from, but identity and role are always re-resolved against the store by
/// the session middleware.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user id, ObjectId hex)
    pub sub: String,
    pub username: String,
    pub role: String,
    pub name: String,
    pub email: String,
    pub region: Option<String>,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
    /// JWT ID (unique identifier for the token)
    pub jti: String,
}

/// Error types for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("Failed to encode JWT token: {0}")]
    EncodingFailed(String),
    #[error("Failed to decode JWT token: {0}")]
    DecodingFailed(String),
    #[error("Token has expired")]
    TokenExpired,
    #[error("Invalid token format")]
    InvalidToken,
    #[error("Missing JWT secret")]
    MissingSecret,
}

pub trait JwtTokenUtils {
    fn generate_token(&self, user: &User) -> Result<String, JwtError>;
    fn validate_token(&self, token: &str) -> Result<Claims, JwtError>;
    fn extract_token_from_header(&self, auth_header: &str) -> Result<String, JwtError>;
}

#[derive(Debug, Clone)]
pub struct JwtTokenUtilsImpl {
    pub jwt_config: JwtConfig,
}

impl JwtTokenUtilsImpl {
    pub fn new(jwt_config: JwtConfig) -> Self {
        JwtTokenUtilsImpl { jwt_config }
    }

    /// Create JWT utils from environment variables
    pub fn from_env() -> Result<Self, JwtError> {
        let jwt_config = JwtConfig::from_env().map_err(|_| JwtError::MissingSecret)?;
        Ok(JwtTokenUtilsImpl::new(jwt_config))
    }
}

impl JwtTokenUtils for JwtTokenUtilsImpl {
    fn generate_token(&self, user: &User) -> Result<String, JwtError> {
        let user_id = user.id.as_ref().map(|id| id.to_hex()).unwrap_or_default();
        debug!(
            "Generating session token for user: {} with role: {}",
            user_id, user.role
        );

        let now = Utc::now();
        let expiration = now + Duration::minutes(self.jwt_config.token_expiration);

        let claims = Claims {
            sub: user_id.clone(),
            username: user.username.clone(),
            role: user.role.as_str().to_string(),
            name: user.name.clone(),
            email: user.email.clone(),
            region: user.region.clone(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let header = Header::new(Algorithm::HS256);
        let encoding_key = EncodingKey::from_secret(self.jwt_config.jwt_secret.as_ref());

        match encode(&header, &claims, &encoding_key) {
            Ok(token) => {
                debug!("Session token generated for user: {}", user_id);
                Ok(token)
            }
            Err(err) => {
                error!("Failed to encode JWT token: {}", err);
                Err(JwtError::EncodingFailed(err.to_string()))
            }
        }
    }

    fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let decoding_key = DecodingKey::from_secret(self.jwt_config.jwt_secret.as_ref());
        let validation = Validation::new(Algorithm::HS256);

        match decode::<Claims>(token, &decoding_key, &validation) {
            Ok(token_data) => {
                let claims = token_data.claims;
                if claims.exp < Utc::now().timestamp() {
                    warn!("Token has expired for user: {}", claims.sub);
                    return Err(JwtError::TokenExpired);
                }
                debug!("Token validation successful for user: {}", claims.sub);
                Ok(claims)
            }
            Err(err) => match err.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => Err(JwtError::TokenExpired),
                _ => {
                    warn!("Failed to decode JWT token: {}", err);
                    Err(JwtError::DecodingFailed(err.to_string()))
                }
            },
        }
    }

    fn extract_token_from_header(&self, auth_header: &str) -> Result<String, JwtError> {
        if !auth_header.starts_with("Bearer ") {
            return Err(JwtError::InvalidToken);
        }

        let token = auth_header.trim_start_matches("Bearer ").trim();
        if token.is_empty() {
            return Err(JwtError::InvalidToken);
        }

        Ok(token.to_string())
    }
}
