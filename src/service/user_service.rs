use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use tracing::{error, info, instrument};

use crate::dto::auth_dto::{RegisterRequest, UpdateUserRequest, UserProfile};
use crate::model::user::{User, UserRole};
use crate::repository::user_repo::UserRepository;
use crate::util::error::ServiceError;
use crate::util::password::{PasswordUtils, PasswordUtilsImpl};

/// Provision a new active account: duplicate-identity pre-checks, Argon2
/// hash, insert. Shared by self-registration and supervisor-initiated
/// creation so the two paths cannot diverge.
pub async fn provision_user(
    repo: &dyn UserRepository,
    req: RegisterRequest,
) -> Result<User, ServiceError> {
    if repo.find_by_username(&req.username).await?.is_some() {
        return Err(ServiceError::Conflict("Username already taken".to_string()));
    }
    if repo.find_by_email(&req.email).await?.is_some() {
        return Err(ServiceError::Conflict(
            "Email already registered".to_string(),
        ));
    }

    let password_hash = PasswordUtilsImpl::hash_password(&req.password)
        .map_err(|e| ServiceError::InternalError(format!("Password hash error: {}", e)))?;

    let user = User {
        id: None,
        username: req.username,
        name: req.name,
        email: req.email,
        password_hash,
        role: req.role.unwrap_or(UserRole::MedRep),
        region: req.region,
        is_active: true,
        created_at: None,
        updated_at: None,
    };

    // The unique index still backstops the pre-checks above.
    let inserted = repo.insert(user).await?;
    Ok(inserted)
}

#[async_trait]
pub trait UserService: Send + Sync {
    async fn list_users(
        &self,
        role: Option<UserRole>,
        active: Option<bool>,
    ) -> Result<Vec<UserProfile>, ServiceError>;
    async fn get_user(&self, id: &str) -> Result<UserProfile, ServiceError>;
    async fn create_user(&self, req: RegisterRequest) -> Result<UserProfile, ServiceError>;
    async fn update_user(
        &self,
        id: &str,
        req: UpdateUserRequest,
    ) -> Result<UserProfile, ServiceError>;
    async fn set_user_active(&self, id: &str, active: bool) -> Result<UserProfile, ServiceError>;
}

pub struct UserServiceImpl {
    pub user_repo: Arc<dyn UserRepository>,
}

impl UserServiceImpl {
    pub fn new(user_repo: Arc<dyn UserRepository>) -> Self {
        Self { user_repo }
    }
}

fn parse_user_id(id: &str) -> Result<ObjectId, ServiceError> {
    ObjectId::parse_str(id).map_err(|_| ServiceError::NotFound("User not found".to_string()))
}

#[async_trait]
impl UserService for UserServiceImpl {
    #[instrument(skip(self))]
    async fn list_users(
        &self,
        role: Option<UserRole>,
        active: Option<bool>,
    ) -> Result<Vec<UserProfile>, ServiceError> {
        let users = self.user_repo.list(role, active).await?;
        Ok(users.into_iter().map(UserProfile::from).collect())
    }

    #[instrument(skip(self))]
    async fn get_user(&self, id: &str) -> Result<UserProfile, ServiceError> {
        let oid = parse_user_id(id)?;
        let user = self
            .user_repo
            .find_by_id(&oid)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))?;
        Ok(UserProfile::from(user))
    }

    #[instrument(skip(self, req), fields(username = %req.username))]
    async fn create_user(&self, req: RegisterRequest) -> Result<UserProfile, ServiceError> {
        info!("Provisioning user account");
        let user = provision_user(self.user_repo.as_ref(), req).await?;
        Ok(UserProfile::from(user))
    }

    #[instrument(skip(self, req), fields(id = %id))]
    async fn update_user(
        &self,
        id: &str,
        req: UpdateUserRequest,
    ) -> Result<UserProfile, ServiceError> {
        let oid = parse_user_id(id)?;
        let mut user = self
            .user_repo
            .find_by_id(&oid)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))?;

        if let Some(email) = req.email {
            // Re-check identity uniqueness when the email changes.
            if !email.eq_ignore_ascii_case(&user.email) {
                if let Some(existing) = self.user_repo.find_by_email(&email).await? {
                    if existing.id != user.id {
                        return Err(ServiceError::Conflict(
                            "Email already registered".to_string(),
                        ));
                    }
                }
            }
            user.email = email;
        }
        if let Some(name) = req.name {
            user.name = name;
        }
        if let Some(role) = req.role {
            user.role = role;
        }
        if let Some(region) = req.region {
            user.region = Some(region);
        }
        if let Some(password) = req.password {
            user.password_hash = PasswordUtilsImpl::hash_password(&password)
                .map_err(|e| ServiceError::InternalError(format!("Password hash error: {}", e)))?;
        }

        let updated = self.user_repo.update(oid, user).await;
        match &updated {
            Ok(_) => info!("User updated"),
            Err(e) => error!("Failed to update user: {e}"),
        }
        Ok(UserProfile::from(updated?))
    }

    #[instrument(skip(self), fields(id = %id, active = active))]
    async fn set_user_active(&self, id: &str, active: bool) -> Result<UserProfile, ServiceError> {
        let oid = parse_user_id(id)?;
        let user = self.user_repo.set_active(oid, active).await?;
        info!("User active flag set");
        Ok(UserProfile::from(user))
    }
}
