use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::model::user::{User, UserRole};

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 32))]
    pub username: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    #[validate(length(min = 2, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    /// Defaults to medrep when absent.
    pub role: Option<UserRole>,
    pub region: Option<String>,
}

/// Profile update applied by a privileged caller. Only fields present in
/// the payload are touched; a new password is re-hashed.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub role: Option<UserRole>,
    pub region: Option<String>,
    #[validate(length(min = 8, max = 128))]
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UserListQuery {
    pub role: Option<UserRole>,
    pub active: Option<bool>,
}

/// User projection with the password hash stripped. The only user shape
/// that ever leaves the service layer.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub region: Option<String>,
    pub is_active: bool,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        UserProfile {
            id: user.id.map(|id| id.to_hex()).unwrap_or_default(),
            username: user.username,
            name: user.name,
            email: user.email,
            role: user.role,
            region: user.region,
            is_active: user.is_active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserProfile,
}
