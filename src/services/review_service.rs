use mongodb::bson::oid::ObjectId;

use crate::{
    database::{reviews::ReviewScope, ReviewRepository},
    models::{CreateReviewRequest, Review, ReviewPage, UpdateReviewRequest},
    utils::{parse_object_id, AppError, Page, PageQuery},
};

pub const MISSING_FIELDS_MESSAGE: &str = "All fields are required: productId, title, content, starpoint, images";

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// POST /reviews - Cria review do usuário autenticado
pub async fn create_review(
    repo: &dyn ReviewRepository,
    user_id: ObjectId,
    request: CreateReviewRequest,
) -> Result<Review, AppError> {
    let (Some(product_id), Some(title), Some(content), Some(starpoint), Some(images)) = (
        present(&request.product_id),
        present(&request.title),
        present(&request.content),
        request.starpoint.filter(|s| *s != 0),
        request.images.as_ref(),
    ) else {
        return Err(AppError::Validation(MISSING_FIELDS_MESSAGE.into()));
    };

    let now = now_millis();
    let review = Review {
        id: None,
        user_id,
        product_id: parse_object_id(product_id, "productId")?,
        title: title.to_string(),
        content: content.to_string(),
        starpoint,
        images: images.clone(),
        created_at: now,
        updated_at: now,
    };

    let created = repo.insert_review(review).await?;
    log::info!("✅ Review created for product {} by user {}", created.product_id, user_id);

    Ok(created)
}

pub async fn get_reviews_by_product(
    repo: &dyn ReviewRepository,
    product_id: &str,
    query: PageQuery,
) -> Result<ReviewPage, AppError> {
    let product_id = parse_object_id(product_id, "productId")?;
    repo.find_reviews(ReviewScope::Product(product_id), Page::from(query)).await
}

pub async fn get_reviews_by_user(
    repo: &dyn ReviewRepository,
    user_id: &str,
    query: PageQuery,
) -> Result<ReviewPage, AppError> {
    let user_id = parse_object_id(user_id, "userId")?;
    repo.find_reviews(ReviewScope::User(user_id), Page::from(query)).await
}

pub async fn get_review_by_id(repo: &dyn ReviewRepository, review_id: &str) -> Result<Review, AppError> {
    let id = parse_object_id(review_id, "reviewId")?;

    repo.find_review(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Review not found".into()))
}

pub async fn update_review_by_id(
    repo: &dyn ReviewRepository,
    review_id: &str,
    update: UpdateReviewRequest,
) -> Result<Review, AppError> {
    let id = parse_object_id(review_id, "reviewId")?;
    update.validate()?;

    repo.update_review(id, &update, now_millis())
        .await?
        .ok_or_else(|| AppError::NotFound("Review not found".into()))
}

pub async fn delete_review_by_id(repo: &dyn ReviewRepository, review_id: &str) -> Result<Review, AppError> {
    let id = parse_object_id(review_id, "reviewId")?;

    let deleted = repo
        .delete_review(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Review not found".into()))?;

    log::info!("🗑️  Review {} deleted", id);
    Ok(deleted)
}
