use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::options::ReturnDocument;

use super::{MongoDB, REVIEWS};
use crate::models::{Review, ReviewPage, UpdateReviewRequest};
use crate::utils::{AppError, Page};

/// Which reviews a listing covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewScope {
    Product(ObjectId),
    User(ObjectId),
}

impl ReviewScope {
    pub fn filter(&self) -> Document {
        match self {
            ReviewScope::Product(id) => doc! { "productId": id },
            ReviewScope::User(id) => doc! { "userId": id },
        }
    }
}

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn insert_review(&self, review: Review) -> Result<Review, AppError>;

    /// Newest first. `total_count` ignores the page window.
    async fn find_reviews(&self, scope: ReviewScope, page: Page) -> Result<ReviewPage, AppError>;

    async fn find_review(&self, id: ObjectId) -> Result<Option<Review>, AppError>;

    /// Returns the document as it is after the update.
    async fn update_review(
        &self,
        id: ObjectId,
        update: &UpdateReviewRequest,
        now: i64,
    ) -> Result<Option<Review>, AppError>;

    /// Returns the removed document.
    async fn delete_review(&self, id: ObjectId) -> Result<Option<Review>, AppError>;
}

#[async_trait]
impl ReviewRepository for MongoDB {
    async fn insert_review(&self, mut review: Review) -> Result<Review, AppError> {
        let result = self.collection::<Review>(REVIEWS).insert_one(&review).await?;
        review.id = result.inserted_id.as_object_id();
        Ok(review)
    }

    async fn find_reviews(&self, scope: ReviewScope, page: Page) -> Result<ReviewPage, AppError> {
        let collection = self.collection::<Review>(REVIEWS);
        let filter = scope.filter();

        let total_count = collection.count_documents(filter.clone()).await?;
        let reviews: Vec<Review> = collection
            .find(filter)
            .sort(doc! { "createdAt": -1 })
            .skip(page.skip)
            .limit(page.limit as i64)
            .await?
            .try_collect()
            .await?;

        Ok(ReviewPage { reviews, total_count })
    }

    async fn find_review(&self, id: ObjectId) -> Result<Option<Review>, AppError> {
        Ok(self
            .collection::<Review>(REVIEWS)
            .find_one(doc! { "_id": id })
            .await?)
    }

    async fn update_review(
        &self,
        id: ObjectId,
        update: &UpdateReviewRequest,
        now: i64,
    ) -> Result<Option<Review>, AppError> {
        Ok(self
            .collection::<Review>(REVIEWS)
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": update.to_set_document(now) })
            .return_document(ReturnDocument::After)
            .await?)
    }

    async fn delete_review(&self, id: ObjectId) -> Result<Option<Review>, AppError> {
        Ok(self
            .collection::<Review>(REVIEWS)
            .find_one_and_delete(doc! { "_id": id })
            .await?)
    }
}
