use mongodb::bson::oid::ObjectId;

use super::AppError;

/// Parses a hex ObjectId coming from a path or body field.
pub fn parse_object_id(value: &str, field: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(value.trim())
        .map_err(|_| AppError::InvalidRequest(format!("Invalid {}", field)))
}
