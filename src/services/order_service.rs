use mongodb::bson::oid::ObjectId;

use crate::{
    database::OrderRepository,
    models::{CreateOrderRequest, Order, OrderPage},
    utils::{parse_object_id, AppError, Page, PageQuery},
};

pub async fn create_order(
    repo: &dyn OrderRepository,
    user_id: ObjectId,
    request: CreateOrderRequest,
) -> Result<Order, AppError> {
    let order = request.into_order(user_id, chrono::Utc::now().timestamp_millis())?;

    let created = repo.insert_order(order).await?;
    log::info!(
        "✅ Order created for user {} ({} items, total {})",
        user_id,
        created.products.len(),
        created.total_price
    );

    Ok(created)
}

pub async fn get_orders_by_user(
    repo: &dyn OrderRepository,
    user_id: ObjectId,
    query: PageQuery,
) -> Result<OrderPage, AppError> {
    repo.find_orders_by_user(user_id, Page::from(query)).await
}

pub async fn get_order_by_id(
    repo: &dyn OrderRepository,
    user_id: ObjectId,
    order_id: &str,
) -> Result<Order, AppError> {
    let id = parse_object_id(order_id, "orderId")?;

    repo.find_order(user_id, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".into()))
}
