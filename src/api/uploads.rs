use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::services::storage_service::{self, UploadUrlSigner};
use crate::utils::AppError;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct FileCountQuery {
    /// Number of URLs to mint (1-20)
    pub file_count: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct PresignedUrlResponse {
    pub url: String,
    pub message: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct PresignedUrlsResponse {
    pub urls: Vec<String>,
    pub message: String,
}

/// GET /api/v1/uploads/presigned-url
#[utoipa::path(
    get,
    path = "/api/v1/uploads/presigned-url",
    tag = "Uploads",
    responses(
        (status = 200, description = "One upload URL", body = PresignedUrlResponse),
        (status = 500, description = "Signing failed")
    )
)]
pub async fn get_presigned_url(
    signer: web::Data<dyn UploadUrlSigner>,
) -> Result<HttpResponse, AppError> {
    let url = storage_service::create_presigned_url(signer.get_ref()).await?;

    Ok(HttpResponse::Ok().json(PresignedUrlResponse {
        url,
        message: "Presigned URL created".to_string(),
    }))
}

/// GET /api/v1/uploads/presigned-urls?fileCount=n
#[utoipa::path(
    get,
    path = "/api/v1/uploads/presigned-urls",
    tag = "Uploads",
    params(FileCountQuery),
    responses(
        (status = 200, description = "fileCount upload URLs", body = PresignedUrlsResponse),
        (status = 400, description = "Missing, non-numeric or out-of-range fileCount"),
        (status = 500, description = "Signing failed")
    )
)]
pub async fn get_multi_presigned_urls(
    signer: web::Data<dyn UploadUrlSigner>,
    query: web::Query<FileCountQuery>,
) -> Result<HttpResponse, AppError> {
    let file_count = storage_service::parse_file_count(query.file_count.as_deref())?;
    let urls = storage_service::create_multi_presigned_urls(signer.get_ref(), file_count).await?;

    Ok(HttpResponse::Ok().json(PresignedUrlsResponse {
        urls,
        message: "Presigned URLs created".to_string(),
    }))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/uploads")
            .route("/presigned-url", web::get().to(get_presigned_url))
            .route("/presigned-urls", web::get().to(get_multi_presigned_urls)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeSigner;
    use actix_web::{http::StatusCode, test, App};
    use serde_json::Value;
    use std::sync::Arc;

    fn signer_data(signer: FakeSigner) -> web::Data<dyn UploadUrlSigner> {
        let signer: Arc<dyn UploadUrlSigner> = Arc::new(signer);
        web::Data::from(signer)
    }

    #[actix_web::test]
    async fn single_url() {
        let app = test::init_service(
            App::new().app_data(signer_data(FakeSigner::default())).configure(configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/v1/uploads/presigned-url").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert!(body["url"].as_str().unwrap().starts_with("https://fake-bucket.local/uploads/"));
        assert!(body["message"].is_string());
    }

    #[actix_web::test]
    async fn five_urls_for_file_count_five() {
        let app = test::init_service(
            App::new().app_data(signer_data(FakeSigner::default())).configure(configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/v1/uploads/presigned-urls?fileCount=5")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["urls"].as_array().unwrap().len(), 5);
    }

    #[actix_web::test]
    async fn bad_file_count_is_400() {
        let app = test::init_service(
            App::new().app_data(signer_data(FakeSigner::default())).configure(configure),
        )
        .await;

        for uri in [
            "/api/v1/uploads/presigned-urls",
            "/api/v1/uploads/presigned-urls?fileCount=lots",
            "/api/v1/uploads/presigned-urls?fileCount=500",
        ] {
            let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", uri);
        }
    }

    #[actix_web::test]
    async fn signer_failure_is_500_without_detail() {
        let app = test::init_service(
            App::new().app_data(signer_data(FakeSigner::failing())).configure(configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/v1/uploads/presigned-url").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Internal server error");
    }
}
