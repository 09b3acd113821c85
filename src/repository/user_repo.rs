use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use futures::stream::StreamExt;
use mongodb::options::{Collation, CollationStrength, FindOneOptions, IndexOptions};
use mongodb::IndexModel;
use tracing::{error, info};

use crate::model::user::{User, UserRole};
use crate::repository::repository_error::{RepositoryError, RepositoryResult};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, user: User) -> RepositoryResult<User>;
    async fn update(&self, id: ObjectId, user: User) -> RepositoryResult<User>;
    async fn set_active(&self, id: ObjectId, active: bool) -> RepositoryResult<User>;
    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<User>>;
    /// Case-insensitive username lookup.
    async fn find_by_username(&self, username: &str) -> RepositoryResult<Option<User>>;
    /// Case-insensitive email lookup.
    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;
    async fn list(
        &self,
        role: Option<UserRole>,
        active: Option<bool>,
    ) -> RepositoryResult<Vec<User>>;
}

pub struct MongoUserRepository {
    collection: mongodb::Collection<User>,
}

/// Case-insensitive match for username/email lookups and their unique
/// indexes.
fn ci_collation() -> Collation {
    Collation::builder()
        .locale("en")
        .strength(CollationStrength::Secondary)
        .build()
}

impl MongoUserRepository {
    pub fn new(db: &mongodb::Database, collection_name: &str) -> Self {
        MongoUserRepository {
            collection: db.collection::<User>(collection_name),
        }
    }

    /// Create the unique username/email indexes. Called once at startup.
    pub async fn ensure_indexes(&self) -> RepositoryResult<()> {
        for field in ["username", "email"] {
            let index = IndexModel::builder()
                .keys(doc! { field: 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .collation(ci_collation())
                        .build(),
                )
                .build();
            self.collection.create_index(index, None).await?;
        }
        info!("User indexes ensured");
        Ok(())
    }

    async fn find_one_ci(&self, filter: bson::Document) -> RepositoryResult<Option<User>> {
        let options = FindOneOptions::builder().collation(ci_collation()).build();
        let user = self
            .collection
            .find_one(filter, options)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to find user: {}", e)))?;
        Ok(user)
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    #[tracing::instrument(skip(self, user), fields(username = %user.username))]
    async fn insert(&self, mut user: User) -> RepositoryResult<User> {
        user.id = Some(ObjectId::new());
        let now = chrono::Local::now().to_rfc3339();
        user.created_at = Some(now.clone());
        user.updated_at = Some(now);
        match self.collection.insert_one(user.clone(), None).await {
            Ok(_) => {
                info!("User inserted");
                Ok(user)
            }
            Err(e) => {
                error!("Failed to insert user: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self, user), fields(id = %id))]
    async fn update(&self, id: ObjectId, mut user: User) -> RepositoryResult<User> {
        user.updated_at = Some(chrono::Local::now().to_rfc3339());
        let filter = doc! { "_id": id };
        let mut document = bson::to_document(&user)
            .map_err(|e| RepositoryError::serialization(format!("Failed to serialize user: {}", e)))?;
        document.remove("_id");
        let update = doc! { "$set": document };
        match self.collection.update_one(filter, update, None).await {
            Ok(result) if result.matched_count > 0 => Ok(user),
            Ok(_) => Err(RepositoryError::not_found(format!(
                "No user found to update for ID: {}",
                id
            ))),
            Err(e) => {
                error!("Failed to update user: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(id = %id, active = active))]
    async fn set_active(&self, id: ObjectId, active: bool) -> RepositoryResult<User> {
        let filter = doc! { "_id": id };
        let update = doc! { "$set": {
            "is_active": active,
            "updated_at": chrono::Local::now().to_rfc3339(),
        } };
        match self.collection.update_one(filter, update, None).await {
            Ok(result) if result.matched_count > 0 => {
                self.find_by_id(&id).await?.ok_or_else(|| {
                    RepositoryError::not_found(format!("User disappeared after update: {}", id))
                })
            }
            Ok(_) => Err(RepositoryError::not_found(format!(
                "No user found for ID: {}",
                id
            ))),
            Err(e) => {
                error!("Failed to set user active flag: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<User>> {
        let user = self
            .collection
            .find_one(doc! { "_id": id }, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to find user by id: {}", e)))?;
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> RepositoryResult<Option<User>> {
        self.find_one_ci(doc! { "username": username }).await
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        self.find_one_ci(doc! { "email": email }).await
    }

    #[tracing::instrument(skip(self))]
    async fn list(
        &self,
        role: Option<UserRole>,
        active: Option<bool>,
    ) -> RepositoryResult<Vec<User>> {
        let mut filter = bson::Document::new();
        if let Some(role) = role {
            filter.insert("role", role.as_str());
        }
        if let Some(active) = active {
            filter.insert("is_active", active);
        }
        let mut cursor = self
            .collection
            .find(filter, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to list users: {}", e)))?;
        let mut users = Vec::new();
        while let Some(user) = cursor.next().await {
            match user {
                Ok(u) => users.push(u),
                Err(e) => {
                    error!("Failed to deserialize user: {}", e);
                    return Err(RepositoryError::serialization(format!(
                        "Failed to deserialize user: {}",
                        e
                    )));
                }
            }
        }
        Ok(users)
    }
}
