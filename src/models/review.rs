use mongodb::bson::{doc, oid::ObjectId, Document};
use serde::{Deserialize, Serialize};

use crate::utils::AppError;

/// Avaliação de produto (collection "reviews")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    /// Autor (ref users)
    pub user_id: ObjectId,

    /// Produto avaliado (ref products)
    pub product_id: ObjectId,

    pub title: String,
    pub content: String,
    pub starpoint: i32,

    /// URLs das imagens enviadas via presigned URL
    #[serde(rename = "image", default)]
    pub images: Vec<String>,

    /// Unix millis
    pub created_at: i64,
    pub updated_at: i64,
}

/// Corpo do POST. Tudo opcional aqui para que a ausência vire 400 com mensagem própria.
#[derive(Debug, Default, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    pub product_id: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub starpoint: Option<i32>,
    pub images: Option<Vec<String>>,
}

/// Campos mutáveis de uma review. Chaves desconhecidas são rejeitadas.
#[derive(Debug, Default, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateReviewRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub starpoint: Option<i32>,
    pub images: Option<Vec<String>>,
}

impl UpdateReviewRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if matches!(&self.title, Some(t) if t.trim().is_empty()) {
            return Err(AppError::Validation("title cannot be blank".into()));
        }
        if matches!(&self.content, Some(c) if c.trim().is_empty()) {
            return Err(AppError::Validation("content cannot be blank".into()));
        }
        if self.starpoint == Some(0) {
            return Err(AppError::Validation("starpoint cannot be zero".into()));
        }
        Ok(())
    }

    /// `$set` body with only the supplied fields plus the new `updatedAt`.
    pub fn to_set_document(&self, updated_at: i64) -> Document {
        let mut set = doc! { "updatedAt": updated_at };

        if let Some(title) = &self.title { set.insert("title", title); }
        if let Some(content) = &self.content { set.insert("content", content); }
        if let Some(starpoint) = self.starpoint { set.insert("starpoint", starpoint); }
        if let Some(images) = &self.images { set.insert("image", images.clone()); }

        set
    }
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub id: String,
    pub user_id: String,
    pub product_id: String,
    pub title: String,
    pub content: String,
    pub starpoint: i32,
    pub images: Vec<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<Review> for ReviewResponse {
    fn from(r: Review) -> Self {
        ReviewResponse {
            id: r.id.map(|id| id.to_hex()).unwrap_or_default(),
            user_id: r.user_id.to_hex(),
            product_id: r.product_id.to_hex(),
            title: r.title,
            content: r.content,
            starpoint: r.starpoint,
            images: r.images,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Uma página de reviews + total para paginação no cliente
#[derive(Debug, Clone)]
pub struct ReviewPage {
    pub reviews: Vec<Review>,
    pub total_count: u64,
}
