use mongodb::bson::{doc, oid::ObjectId, to_bson, Document};
use serde::{Deserialize, Serialize};

use super::Address;
use crate::utils::AppError;

/// Conta OAuth (collection "users"). Chave de busca: email.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub email: String,
    pub name: Option<String>,
    pub nickname: Option<String>,
    pub phone_number: Option<String>,
    pub profile_image: Option<String>,
    /// "kakao", "google", "naver"...
    pub provider: Option<String>,
    /// ID do usuário no provedor OAuth
    pub sns_id: Option<String>,
    pub address: Option<Address>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Dados de criação, persistidos como vieram.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub id: Option<ObjectId>,
    pub email: String,
    pub name: Option<String>,
    pub nickname: Option<String>,
    pub phone_number: Option<String>,
    pub profile_image: Option<String>,
    pub provider: Option<String>,
    pub sns_id: Option<String>,
    pub address: Option<Address>,
}

impl NewUser {
    pub fn into_user(self, now: i64) -> User {
        User {
            id: self.id,
            email: self.email,
            name: self.name,
            nickname: self.nickname,
            phone_number: self.phone_number,
            profile_image: self.profile_image,
            provider: self.provider,
            sns_id: self.sns_id,
            address: self.address,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Corpo do POST /users/me. O email vem do token, não do corpo.
#[derive(Debug, Default, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionUserRequest {
    pub name: Option<String>,
    pub nickname: Option<String>,
    pub phone_number: Option<String>,
    pub profile_image: Option<String>,
    pub provider: Option<String>,
    pub sns_id: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub nickname: Option<String>,
    pub phone_number: Option<String>,
    pub profile_image: Option<String>,
    pub address: Option<Address>,
}

impl UpdateUserRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        match &self.address {
            Some(address) => address.validate(),
            None => Ok(()),
        }
    }

    pub fn to_set_document(&self, updated_at: i64) -> Result<Document, AppError> {
        let mut set = doc! { "updatedAt": updated_at };

        if let Some(name) = &self.name { set.insert("name", name); }
        if let Some(nickname) = &self.nickname { set.insert("nickname", nickname); }
        if let Some(phone) = &self.phone_number { set.insert("phoneNumber", phone); }
        if let Some(image) = &self.profile_image { set.insert("profileImage", image); }
        if let Some(address) = &self.address { set.insert("address", to_bson(address)?); }

        Ok(set)
    }
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub nickname: Option<String>,
    pub phone_number: Option<String>,
    pub profile_image: Option<String>,
    pub provider: Option<String>,
    pub address: Option<Address>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        UserResponse {
            id: u.id.map(|id| id.to_hex()).unwrap_or_default(),
            email: u.email,
            name: u.name,
            nickname: u.nickname,
            phone_number: u.phone_number,
            profile_image: u.profile_image,
            provider: u.provider,
            address: u.address,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

/// What other users may see of a profile: no email, phone or address.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicUserResponse {
    pub id: String,
    pub nickname: Option<String>,
    pub profile_image: Option<String>,
}

impl From<User> for PublicUserResponse {
    fn from(u: User) -> Self {
        PublicUserResponse {
            id: u.id.map(|id| id.to_hex()).unwrap_or_default(),
            nickname: u.nickname,
            profile_image: u.profile_image,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::address::sample_address;

    #[test]
    fn set_document_includes_address_as_subdocument() {
        let update = UpdateUserRequest {
            nickname: Some("민지".into()),
            address: Some(sample_address()),
            ..Default::default()
        };

        let set = update.to_set_document(7).unwrap();
        assert_eq!(set.get_str("nickname").unwrap(), "민지");
        assert_eq!(
            set.get_document("address").unwrap().get_str("zoneCode").unwrap(),
            "04524"
        );
        assert!(!set.contains_key("name"));
    }

    #[test]
    fn email_cannot_be_updated() {
        let parsed = serde_json::from_value::<UpdateUserRequest>(serde_json::json!({
            "email": "other@example.com"
        }));
        assert!(parsed.is_err());
    }

    #[test]
    fn sns_id_is_not_exposed() {
        let user = NewUser {
            email: "a@example.com".into(),
            sns_id: Some("kakao-123".into()),
            ..Default::default()
        }
        .into_user(1);

        let json = serde_json::to_value(UserResponse::from(user)).unwrap();
        assert!(json.get("snsId").is_none());
        assert_eq!(json["email"], "a@example.com");
    }
}
