use async_trait::async_trait;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::options::ReturnDocument;

use super::{MongoDB, USERS};
use crate::models::{UpdateUserRequest, User};
use crate::utils::AppError;

/// Absence is `Ok(None)` everywhere; callers decide whether that is an error.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert_user(&self, user: User) -> Result<User, AppError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn find_user_by_id(&self, id: ObjectId) -> Result<Option<User>, AppError>;
    async fn update_user(
        &self,
        id: ObjectId,
        update: &UpdateUserRequest,
        now: i64,
    ) -> Result<Option<User>, AppError>;
}

#[async_trait]
impl UserRepository for MongoDB {
    async fn insert_user(&self, mut user: User) -> Result<User, AppError> {
        let result = self.collection::<User>(USERS).insert_one(&user).await?;
        user.id = result.inserted_id.as_object_id();
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .collection::<User>(USERS)
            .find_one(doc! { "email": email })
            .await?)
    }

    async fn find_user_by_id(&self, id: ObjectId) -> Result<Option<User>, AppError> {
        Ok(self.collection::<User>(USERS).find_one(doc! { "_id": id }).await?)
    }

    async fn update_user(
        &self,
        id: ObjectId,
        update: &UpdateUserRequest,
        now: i64,
    ) -> Result<Option<User>, AppError> {
        let set = update.to_set_document(now)?;

        Ok(self
            .collection::<User>(USERS)
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await?)
    }
}
