use serde::{Deserialize, Serialize};

use crate::utils::AppError;

/// Endereço embutido (pedido e perfil do usuário). Não tem ciclo de vida próprio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub road_address: String,
    pub jibun_address: String,
    pub zone_code: String,
    pub detail_address: String,
}

impl Address {
    pub fn validate(&self) -> Result<(), AppError> {
        let fields = [
            ("roadAddress", &self.road_address),
            ("jibunAddress", &self.jibun_address),
            ("zoneCode", &self.zone_code),
            ("detailAddress", &self.detail_address),
        ];

        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(AppError::Validation(format!("Address field '{}' is required", name)));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn sample_address() -> Address {
    Address {
        road_address: "서울특별시 중구 세종대로 110".into(),
        jibun_address: "서울특별시 중구 태평로1가 31".into(),
        zone_code: "04524".into(),
        detail_address: "3층".into(),
    }
}
