use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, instrument, warn};

use crate::dto::auth_dto::{LoginResponse, RegisterRequest, UserProfile};
use crate::repository::user_repo::UserRepository;
use crate::service::user_service::provision_user;
use crate::util::error::ServiceError;
use crate::util::jwt::{JwtTokenUtils, JwtTokenUtilsImpl};
use crate::util::password::{PasswordUtils, PasswordUtilsImpl};

#[async_trait]
pub trait AuthService: Send + Sync {
    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ServiceError>;
    async fn register(&self, req: RegisterRequest) -> Result<UserProfile, ServiceError>;
}

pub struct AuthServiceImpl {
    pub user_repo: Arc<dyn UserRepository>,
    pub jwt_utils: Arc<JwtTokenUtilsImpl>,
}

impl AuthServiceImpl {
    pub fn new(user_repo: Arc<dyn UserRepository>, jwt_utils: Arc<JwtTokenUtilsImpl>) -> Self {
        Self { user_repo, jwt_utils }
    }
}

#[async_trait]
impl AuthService for AuthServiceImpl {
    #[instrument(skip(self, password), fields(username = %username))]
    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ServiceError> {
        info!("Login attempt");

        // Absent, inactive, and wrong-password all collapse into the same
        // response so usernames cannot be probed.
        let user = self
            .user_repo
            .find_by_username(username)
            .await?
            .filter(|user| user.is_active)
            .ok_or_else(|| {
                warn!("Login rejected: unknown or inactive user");
                ServiceError::Unauthorized("Invalid username or password".to_string())
            })?;

        let valid = PasswordUtilsImpl::verify_password(password, &user.password_hash)
            .map_err(|e| ServiceError::InternalError(format!("Password verify error: {}", e)))?;
        if !valid {
            warn!("Login rejected: bad password");
            return Err(ServiceError::Unauthorized(
                "Invalid username or password".to_string(),
            ));
        }

        let token = self
            .jwt_utils
            .generate_token(&user)
            .map_err(|e| ServiceError::InternalError(format!("JWT error: {}", e)))?;

        info!("Login successful");
        Ok(LoginResponse {
            token,
            user: UserProfile::from(user),
        })
    }

    #[instrument(skip(self, req), fields(username = %req.username))]
    async fn register(&self, req: RegisterRequest) -> Result<UserProfile, ServiceError> {
        info!("Registering new account");
        let user = provision_user(self.user_repo.as_ref(), req).await?;
        info!("Account registered");
        Ok(UserProfile::from(user))
    }
}
