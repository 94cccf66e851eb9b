use mongodb::bson::oid::ObjectId;

use crate::{
    database::UserRepository,
    models::{NewUser, ProvisionUserRequest, UpdateUserRequest, User},
    services::auth_service::Claims,
    utils::AppError,
};

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Persiste o usuário como veio. Não verifica email duplicado.
pub async fn create_user(repo: &dyn UserRepository, new_user: NewUser) -> Result<User, AppError> {
    let user = repo.insert_user(new_user.into_user(now_millis())).await?;
    log::info!("✅ User created: {}", user.email);
    Ok(user)
}

pub async fn find_user_by_email(repo: &dyn UserRepository, email: &str) -> Result<Option<User>, AppError> {
    repo.find_user_by_email(email).await
}

pub async fn find_user_by_id(repo: &dyn UserRepository, user_id: ObjectId) -> Result<Option<User>, AppError> {
    repo.find_user_by_id(user_id).await
}

pub async fn update_user_by_id(
    repo: &dyn UserRepository,
    user_id: ObjectId,
    update: UpdateUserRequest,
) -> Result<Option<User>, AppError> {
    update.validate()?;
    repo.update_user(user_id, &update, now_millis()).await
}

/// Busca o perfil pelo email do token; cria se ainda não existir.
/// Retorna `(user, created)`.
pub async fn provision_user(
    repo: &dyn UserRepository,
    claims: &Claims,
    request: ProvisionUserRequest,
) -> Result<(User, bool), AppError> {
    if let Some(existing) = find_user_by_email(repo, &claims.email).await? {
        return Ok((existing, false));
    }

    let new_user = NewUser {
        id: Some(claims.user_id()?),
        email: claims.email.clone(),
        name: request.name,
        nickname: request.nickname,
        phone_number: request.phone_number,
        profile_image: request.profile_image,
        provider: request.provider,
        sns_id: request.sns_id,
        address: None,
    };

    Ok((create_user(repo, new_user).await?, true))
}
