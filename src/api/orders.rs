use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;

use crate::api::failure;
use crate::database::OrderRepository;
use crate::middleware::auth::{AuthMiddleware, Claims};
use crate::models::{CreateOrderRequest, OrderResponse};
use crate::services::order_service;
use crate::utils::PageQuery;

// ==================== ORDERS API ====================
// Todas as rotas exigem JWT e só enxergam pedidos do próprio usuário

#[derive(Serialize, utoipa::ToSchema)]
pub struct OrderEnvelope {
    pub message: String,
    pub order: OrderResponse,
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderListResponse {
    pub message: String,
    pub orders: Vec<OrderResponse>,
    pub total_count: u64,
}

/// 🔒 POST /api/v1/orders
#[utoipa::path(
    post,
    path = "/api/v1/orders",
    tag = "Orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order stored", body = OrderEnvelope),
        (status = 400, description = "Missing or invalid field"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_order(
    repo: web::Data<dyn OrderRepository>,
    user: web::ReqData<Claims>,
    body: web::Json<CreateOrderRequest>,
) -> impl Responder {
    const FAILED: &str = "Failed to create order";

    let user_id = match user.user_id() {
        Ok(id) => id,
        Err(e) => return failure(e, FAILED),
    };

    match order_service::create_order(repo.get_ref(), user_id, body.into_inner()).await {
        Ok(order) => HttpResponse::Created().json(OrderEnvelope {
            message: "Order created successfully".to_string(),
            order: OrderResponse::from(order),
        }),
        Err(e) => failure(e, FAILED),
    }
}

/// 🔒 GET /api/v1/orders
#[utoipa::path(
    get,
    path = "/api/v1/orders",
    tag = "Orders",
    params(PageQuery),
    responses(
        (status = 200, description = "One page of the caller's orders", body = OrderListResponse),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_orders(
    repo: web::Data<dyn OrderRepository>,
    user: web::ReqData<Claims>,
    query: web::Query<PageQuery>,
) -> impl Responder {
    const FAILED: &str = "Failed to fetch orders";

    let user_id = match user.user_id() {
        Ok(id) => id,
        Err(e) => return failure(e, FAILED),
    };

    match order_service::get_orders_by_user(repo.get_ref(), user_id, query.into_inner()).await {
        Ok(page) => HttpResponse::Ok().json(OrderListResponse {
            message: "Orders fetched successfully".to_string(),
            orders: page.orders.into_iter().map(OrderResponse::from).collect(),
            total_count: page.total_count,
        }),
        Err(e) => failure(e, FAILED),
    }
}

/// 🔒 GET /api/v1/orders/{orderId}
#[utoipa::path(
    get,
    path = "/api/v1/orders/{orderId}",
    tag = "Orders",
    params(("orderId" = String, Path, description = "Order ObjectId")),
    responses(
        (status = 200, description = "Order found", body = OrderEnvelope),
        (status = 404, description = "Order not found for this user")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_order(
    repo: web::Data<dyn OrderRepository>,
    user: web::ReqData<Claims>,
    path: web::Path<String>,
) -> impl Responder {
    const FAILED: &str = "Failed to fetch order";

    let user_id = match user.user_id() {
        Ok(id) => id,
        Err(e) => return failure(e, FAILED),
    };

    match order_service::get_order_by_id(repo.get_ref(), user_id, &path).await {
        Ok(order) => HttpResponse::Ok().json(OrderEnvelope {
            message: "Order fetched successfully".to_string(),
            order: OrderResponse::from(order),
        }),
        Err(e) => failure(e, FAILED),
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/orders")
            .wrap(AuthMiddleware)
            .route("", web::post().to(create_order))
            .route("", web::get().to(list_orders))
            .route("/{orderId}", web::get().to(get_order)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{json_config, query_config};
    use crate::models::order::sample_order_request;
    use crate::test_support::{issue_token, MemoryStore};
    use actix_web::{http::StatusCode, test, App};
    use mongodb::bson::oid::ObjectId;
    use serde_json::Value;
    use std::sync::Arc;

    fn order_data(store: &Arc<MemoryStore>) -> web::Data<dyn OrderRepository> {
        let repo: Arc<dyn OrderRepository> = store.clone();
        web::Data::from(repo)
    }

    macro_rules! app {
        ($store:expr) => {
            test::init_service(
                App::new()
                    .app_data(order_data($store))
                    .app_data(json_config())
                    .app_data(query_config())
                    .configure(configure),
            )
            .await
        };
    }

    fn auth_for(user_id: &ObjectId) -> (&'static str, String) {
        ("Authorization", format!("Bearer {}", issue_token(user_id, "buyer@example.com")))
    }

    #[actix_web::test]
    async fn create_list_and_fetch_own_order() {
        let store = Arc::new(MemoryStore::default());
        let app = app!(&store);
        let buyer = ObjectId::new();

        let req = test::TestRequest::post()
            .uri("/api/v1/orders")
            .insert_header(auth_for(&buyer))
            .set_json(sample_order_request(&ObjectId::new()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: Value = test::read_body_json(resp).await;
        assert_eq!(created["order"]["userId"], buyer.to_hex());
        assert_eq!(created["order"]["imp_uid"], "imp_123456789");
        let id = created["order"]["id"].as_str().unwrap().to_string();

        let req = test::TestRequest::get().uri("/api/v1/orders").insert_header(auth_for(&buyer)).to_request();
        let listed: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(listed["totalCount"], 1);
        assert_eq!(listed["orders"][0]["id"], id);

        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/orders/{}", id))
            .insert_header(auth_for(&buyer))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/orders/{}", id))
            .insert_header(auth_for(&ObjectId::new()))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn incomplete_orders_are_400_and_not_stored() {
        let store = Arc::new(MemoryStore::default());
        let app = app!(&store);
        let buyer = ObjectId::new();

        let mut empty = serde_json::to_value(sample_order_request(&ObjectId::new())).unwrap();
        empty["products"] = serde_json::json!([]);

        let mut no_name = serde_json::to_value(sample_order_request(&ObjectId::new())).unwrap();
        no_name["products"][0].as_object_mut().unwrap().remove("name");

        let mut no_address = serde_json::to_value(sample_order_request(&ObjectId::new())).unwrap();
        no_address.as_object_mut().unwrap().remove("orderAddress");

        for body in [empty, no_name, no_address] {
            let req = test::TestRequest::post()
                .uri("/api/v1/orders")
                .insert_header(auth_for(&buyer))
                .set_json(body)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        }

        assert_eq!(store.order_count(), 0);
    }

    #[actix_web::test]
    async fn requires_token() {
        let store = Arc::new(MemoryStore::default());
        let app = app!(&store);

        let req = test::TestRequest::get().uri("/api/v1/orders").to_request();
        let err = test::try_call_service(&app, req).await.unwrap_err();
        assert_eq!(err.as_response_error().status_code(), StatusCode::UNAUTHORIZED);
    }
}
