use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId};

use super::{MongoDB, ORDERS};
use crate::models::{Order, OrderPage};
use crate::utils::{AppError, Page};

#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn insert_order(&self, order: Order) -> Result<Order, AppError>;

    /// Caller's orders, newest first.
    async fn find_orders_by_user(&self, user_id: ObjectId, page: Page) -> Result<OrderPage, AppError>;

    /// Scoped to the owner: another user's order is reported as absent.
    async fn find_order(&self, user_id: ObjectId, id: ObjectId) -> Result<Option<Order>, AppError>;
}

#[async_trait]
impl OrderRepository for MongoDB {
    async fn insert_order(&self, mut order: Order) -> Result<Order, AppError> {
        let result = self.collection::<Order>(ORDERS).insert_one(&order).await?;
        order.id = result.inserted_id.as_object_id();
        Ok(order)
    }

    async fn find_orders_by_user(&self, user_id: ObjectId, page: Page) -> Result<OrderPage, AppError> {
        let collection = self.collection::<Order>(ORDERS);
        let filter = doc! { "userId": user_id };

        let total_count = collection.count_documents(filter.clone()).await?;
        let orders: Vec<Order> = collection
            .find(filter)
            .sort(doc! { "createdAt": -1 })
            .skip(page.skip)
            .limit(page.limit as i64)
            .await?
            .try_collect()
            .await?;

        Ok(OrderPage { orders, total_count })
    }

    async fn find_order(&self, user_id: ObjectId, id: ObjectId) -> Result<Option<Order>, AppError> {
        Ok(self
            .collection::<Order>(ORDERS)
            .find_one(doc! { "_id": id, "userId": user_id })
            .await?)
    }
}
