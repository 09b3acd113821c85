use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Account role. Supervisors and admins hold cross-user read access and
/// reach the team/region analytics and user-management endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    MedRep,
    Supervisor,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::MedRep => "medrep",
            UserRole::Supervisor => "supervisor",
            UserRole::Admin => "admin",
        }
    }

    pub fn is_privileged(&self) -> bool {
        matches!(self, UserRole::Supervisor | UserRole::Admin)
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "medrep" => Ok(UserRole::MedRep),
            "supervisor" => Ok(UserRole::Supervisor),
            "admin" => Ok(UserRole::Admin),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Option<ObjectId>,
    pub username: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub region: Option<String>,
    /// Soft-delete flag. Inactive users cannot authenticate and fail
    /// session verification on every subsequent request.
    pub is_active: bool,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}
