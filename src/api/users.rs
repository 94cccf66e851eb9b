use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;

use crate::api::failure;
use crate::database::UserRepository;
use crate::middleware::auth::{AuthMiddleware, Claims};
use crate::models::{ProvisionUserRequest, PublicUserResponse, UpdateUserRequest, User, UserResponse};
use crate::services::user_service;
use crate::utils::{parse_object_id, AppError};

#[derive(Serialize, utoipa::ToSchema)]
pub struct UserEnvelope {
    pub message: String,
    pub user: UserResponse,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct PublicUserEnvelope {
    pub message: String,
    pub user: PublicUserResponse,
}

fn envelope(message: &str, user: User) -> UserEnvelope {
    UserEnvelope {
        message: message.to_string(),
        user: UserResponse::from(user),
    }
}

fn not_provisioned() -> AppError {
    AppError::NotFound("User not found".into())
}

/// Perfil do dono do token, procurado pelo email.
async fn current_user(repo: &dyn UserRepository, claims: &Claims) -> Result<User, AppError> {
    user_service::find_user_by_email(repo, &claims.email)
        .await?
        .ok_or_else(not_provisioned)
}

/// 🔒 POST /api/v1/users/me
/// Cria o perfil no primeiro login OAuth; se o email já existe devolve o atual.
#[utoipa::path(
    post,
    path = "/api/v1/users/me",
    tag = "Users",
    request_body = ProvisionUserRequest,
    responses(
        (status = 201, description = "Profile created", body = UserEnvelope),
        (status = 200, description = "Profile already existed", body = UserEnvelope),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn provision_me(
    repo: web::Data<dyn UserRepository>,
    user: web::ReqData<Claims>,
    body: web::Json<ProvisionUserRequest>,
) -> impl Responder {
    match user_service::provision_user(repo.get_ref(), &user, body.into_inner()).await {
        Ok((profile, true)) => HttpResponse::Created().json(envelope("User created successfully", profile)),
        Ok((profile, false)) => HttpResponse::Ok().json(envelope("User already exists", profile)),
        Err(e) => failure(e, "Failed to create user"),
    }
}

/// 🔒 GET /api/v1/users/me
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    tag = "Users",
    responses(
        (status = 200, description = "Caller's profile", body = UserEnvelope),
        (status = 404, description = "Profile not provisioned yet")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_me(repo: web::Data<dyn UserRepository>, user: web::ReqData<Claims>) -> impl Responder {
    match current_user(repo.get_ref(), &user).await {
        Ok(profile) => HttpResponse::Ok().json(envelope("User fetched successfully", profile)),
        Err(e) => failure(e, "Failed to fetch user"),
    }
}

/// 🔒 PUT /api/v1/users/me
#[utoipa::path(
    put,
    path = "/api/v1/users/me",
    tag = "Users",
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Profile after the update", body = UserEnvelope),
        (status = 400, description = "Unknown field or incomplete address"),
        (status = 404, description = "Profile not provisioned yet")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_me(
    repo: web::Data<dyn UserRepository>,
    user: web::ReqData<Claims>,
    body: web::Json<UpdateUserRequest>,
) -> impl Responder {
    const FAILED: &str = "Failed to update user";

    let existing = match current_user(repo.get_ref(), &user).await {
        Ok(existing) => existing,
        Err(e) => return failure(e, FAILED),
    };
    let Some(user_id) = existing.id else {
        return failure(not_provisioned(), FAILED);
    };

    match user_service::update_user_by_id(repo.get_ref(), user_id, body.into_inner()).await {
        Ok(Some(profile)) => HttpResponse::Ok().json(envelope("User updated successfully", profile)),
        Ok(None) => failure(not_provisioned(), FAILED),
        Err(e) => failure(e, FAILED),
    }
}

/// 🔒 GET /api/v1/users/{userId}
/// Perfil público (apelido e foto) de qualquer usuário.
#[utoipa::path(
    get,
    path = "/api/v1/users/{userId}",
    tag = "Users",
    params(("userId" = String, Path, description = "User ObjectId")),
    responses(
        (status = 200, description = "Public part of the profile", body = PublicUserEnvelope),
        (status = 400, description = "Malformed userId"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_user(repo: web::Data<dyn UserRepository>, path: web::Path<String>) -> impl Responder {
    const FAILED: &str = "Failed to fetch user";

    let user_id = match parse_object_id(&path, "userId") {
        Ok(id) => id,
        Err(e) => return failure(e, FAILED),
    };

    match user_service::find_user_by_id(repo.get_ref(), user_id).await {
        Ok(Some(profile)) => HttpResponse::Ok().json(PublicUserEnvelope {
            message: "User fetched successfully".to_string(),
            user: PublicUserResponse::from(profile),
        }),
        Ok(None) => failure(not_provisioned(), FAILED),
        Err(e) => failure(e, FAILED),
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/users")
            .wrap(AuthMiddleware)
            .route("/me", web::post().to(provision_me))
            .route("/me", web::get().to(get_me))
            .route("/me", web::put().to(update_me))
            .route("/{userId}", web::get().to(get_user)),
    );
}
