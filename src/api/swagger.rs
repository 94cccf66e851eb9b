use utoipa::OpenApi;
use utoipa::openapi::security::{SecurityScheme, HttpAuthScheme, HttpBuilder};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Commerce Service API",
        version = "1.0.0",
        description = "Storefront backend: product reviews, orders, OAuth user profiles and presigned S3 upload URLs.\n\n**Authentication:** review writes, orders and user profiles require a JWT Bearer token issued by the auth service.",
    ),
    paths(
        // Health
        crate::api::health::health_check,

        // Uploads
        crate::api::uploads::get_presigned_url,
        crate::api::uploads::get_multi_presigned_urls,

        // Reviews
        crate::api::reviews::add_review,
        crate::api::reviews::get_reviews_by_product,
        crate::api::reviews::get_reviews_by_user,
        crate::api::reviews::get_review,
        crate::api::reviews::update_review,
        crate::api::reviews::delete_review,

        // Users
        crate::api::users::provision_me,
        crate::api::users::get_me,
        crate::api::users::update_me,
        crate::api::users::get_user,

        // Orders
        crate::api::orders::create_order,
        crate::api::orders::list_orders,
        crate::api::orders::get_order,
    ),
    components(
        schemas(
            crate::api::health::HealthResponse,

            crate::api::uploads::PresignedUrlResponse,
            crate::api::uploads::PresignedUrlsResponse,

            crate::models::CreateReviewRequest,
            crate::models::UpdateReviewRequest,
            crate::models::ReviewResponse,
            crate::api::reviews::ReviewEnvelope,
            crate::api::reviews::ProductReviewsResponse,
            crate::api::reviews::UserReviewsResponse,

            crate::models::Address,
            crate::models::ProvisionUserRequest,
            crate::models::UpdateUserRequest,
            crate::models::UserResponse,
            crate::models::PublicUserResponse,
            crate::api::users::UserEnvelope,
            crate::api::users::PublicUserEnvelope,

            crate::models::OrderProductRequest,
            crate::models::CreateOrderRequest,
            crate::models::OrderResponse,
            crate::api::orders::OrderEnvelope,
            crate::api::orders::OrderListResponse,
        )
    ),
    tags(
        (name = "Health", description = "Liveness plus a MongoDB ping."),
        (name = "Uploads", description = "Presigned S3 PUT URLs. Clients upload bytes straight to the bucket."),
        (name = "Reviews", description = "Product reviews. Reads are public, writes need a token."),
        (name = "Users", description = "Profiles of OAuth users, keyed by the token's email."),
        (name = "Orders", description = "Orders of the authenticated user."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token issued by the auth service"))
                        .build()
                ),
            );
        }
    }
}
