use actix_web::{guard, web, HttpResponse, Responder};
use serde::Serialize;

use crate::api::failure;
use crate::database::ReviewRepository;
use crate::middleware::auth::{AuthMiddleware, Claims};
use crate::models::{CreateReviewRequest, ReviewPage, ReviewResponse, UpdateReviewRequest};
use crate::services::review_service;
use crate::utils::{AppError, PageQuery};

#[derive(Serialize, utoipa::ToSchema)]
pub struct ReviewEnvelope {
    pub message: String,
    pub review: ReviewResponse,
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductReviewsResponse {
    pub is_error: bool,
    pub message: String,
    pub product_id: String,
    pub reviews: Vec<ReviewResponse>,
    pub total_count: u64,
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserReviewsResponse {
    pub message: String,
    pub reviews: Vec<ReviewResponse>,
    pub total_count: u64,
}

fn envelope(message: &str, review: crate::models::Review) -> ReviewEnvelope {
    ReviewEnvelope {
        message: message.to_string(),
        review: ReviewResponse::from(review),
    }
}

fn responses(page: ReviewPage) -> (Vec<ReviewResponse>, u64) {
    (
        page.reviews.into_iter().map(ReviewResponse::from).collect(),
        page.total_count,
    )
}

/// 🔒 POST /api/v1/reviews
#[utoipa::path(
    post,
    path = "/api/v1/reviews",
    tag = "Reviews",
    request_body = CreateReviewRequest,
    responses(
        (status = 201, description = "Review created", body = ReviewEnvelope),
        (status = 400, description = "A required field is missing"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_review(
    repo: web::Data<dyn ReviewRepository>,
    user: web::ReqData<Claims>,
    body: web::Json<CreateReviewRequest>,
) -> impl Responder {
    const FAILED: &str = "Failed to create review";

    let user_id = match user.user_id() {
        Ok(id) => id,
        Err(e) => return failure(e, FAILED),
    };

    match review_service::create_review(repo.get_ref(), user_id, body.into_inner()).await {
        Ok(review) => HttpResponse::Created().json(envelope("Review created successfully", review)),
        Err(e) => failure(e, FAILED),
    }
}

/// GET /api/v1/reviews/product/{productId}
#[utoipa::path(
    get,
    path = "/api/v1/reviews/product/{productId}",
    tag = "Reviews",
    params(("productId" = String, Path, description = "Product ObjectId"), PageQuery),
    responses(
        (status = 200, description = "One page of the product's reviews", body = ProductReviewsResponse),
        (status = 400, description = "Malformed productId"),
        (status = 500, description = "Lookup failed")
    )
)]
pub async fn get_reviews_by_product(
    repo: web::Data<dyn ReviewRepository>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> impl Responder {
    let product_id = path.into_inner();

    match review_service::get_reviews_by_product(repo.get_ref(), &product_id, query.into_inner()).await {
        Ok(page) => {
            let (reviews, total_count) = responses(page);
            HttpResponse::Ok().json(ProductReviewsResponse {
                is_error: false,
                message: "Reviews fetched successfully".to_string(),
                product_id,
                reviews,
                total_count,
            })
        }
        Err(AppError::InvalidRequest(msg)) => HttpResponse::BadRequest().json(serde_json::json!({
            "isError": true,
            "message": msg
        })),
        Err(e) => {
            log::error!("❌ Failed to fetch reviews for product {}: {}", product_id, e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "isError": true,
                "message": "Failed to fetch reviews"
            }))
        }
    }
}

/// GET /api/v1/reviews/user/{userId}
#[utoipa::path(
    get,
    path = "/api/v1/reviews/user/{userId}",
    tag = "Reviews",
    params(("userId" = String, Path, description = "Author ObjectId"), PageQuery),
    responses(
        (status = 200, description = "One page of the user's reviews", body = UserReviewsResponse),
        (status = 400, description = "Malformed userId")
    )
)]
pub async fn get_reviews_by_user(
    repo: web::Data<dyn ReviewRepository>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> impl Responder {
    match review_service::get_reviews_by_user(repo.get_ref(), &path, query.into_inner()).await {
        Ok(page) => {
            let (reviews, total_count) = responses(page);
            HttpResponse::Ok().json(UserReviewsResponse {
                message: "User reviews fetched successfully".to_string(),
                reviews,
                total_count,
            })
        }
        Err(e) => failure(e, "Failed to fetch user reviews"),
    }
}

/// GET /api/v1/reviews/{reviewId}
#[utoipa::path(
    get,
    path = "/api/v1/reviews/{reviewId}",
    tag = "Reviews",
    params(("reviewId" = String, Path, description = "Review ObjectId")),
    responses(
        (status = 200, description = "Review found", body = ReviewEnvelope),
        (status = 404, description = "Review not found")
    )
)]
pub async fn get_review(repo: web::Data<dyn ReviewRepository>, path: web::Path<String>) -> impl Responder {
    match review_service::get_review_by_id(repo.get_ref(), &path).await {
        Ok(review) => HttpResponse::Ok().json(envelope("Review fetched successfully", review)),
        Err(e) => failure(e, "Failed to fetch review"),
    }
}

/// 🔒 PUT /api/v1/reviews/{reviewId}
#[utoipa::path(
    put,
    path = "/api/v1/reviews/{reviewId}",
    tag = "Reviews",
    params(("reviewId" = String, Path, description = "Review ObjectId")),
    request_body = UpdateReviewRequest,
    responses(
        (status = 200, description = "Review after the update", body = ReviewEnvelope),
        (status = 400, description = "Unknown or blank field"),
        (status = 404, description = "Review not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_review(
    repo: web::Data<dyn ReviewRepository>,
    path: web::Path<String>,
    body: web::Json<UpdateReviewRequest>,
) -> impl Responder {
    match review_service::update_review_by_id(repo.get_ref(), &path, body.into_inner()).await {
        Ok(review) => HttpResponse::Ok().json(envelope("Review updated successfully", review)),
        Err(e) => failure(e, "Failed to update review"),
    }
}

/// 🔒 DELETE /api/v1/reviews/{reviewId}
#[utoipa::path(
    delete,
    path = "/api/v1/reviews/{reviewId}",
    tag = "Reviews",
    params(("reviewId" = String, Path, description = "Review ObjectId")),
    responses(
        (status = 200, description = "The removed review", body = ReviewEnvelope),
        (status = 404, description = "Review not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_review(repo: web::Data<dyn ReviewRepository>, path: web::Path<String>) -> impl Responder {
    match review_service::delete_review_by_id(repo.get_ref(), &path).await {
        Ok(review) => HttpResponse::Ok().json(envelope("Review deleted successfully", review)),
        Err(e) => failure(e, "Failed to delete review"),
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/reviews")
            .service(
                web::resource("")
                    .wrap(AuthMiddleware)
                    .route(web::post().to(add_review)),
            )
            .route("/product/{productId}", web::get().to(get_reviews_by_product))
            .route("/user/{userId}", web::get().to(get_reviews_by_user))
            // Reads are public; writes on the same path go through the token check
            .service(
                web::resource("/{reviewId}")
                    .guard(guard::Get())
                    .route(web::get().to(get_review)),
            )
            .service(
                web::resource("/{reviewId}")
                    .wrap(AuthMiddleware)
                    .route(web::put().to(update_review))
                    .route(web::delete().to(delete_review)),
            ),
    );
}
