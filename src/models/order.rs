use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use super::Address;
use crate::utils::{parse_object_id, AppError};

/// Pedido (collection "orders"). Nunca é gravado parcialmente.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub products: Vec<OrderProduct>,
    pub total_price: i64,
    pub order_address: Address,
    /// Referência do pagamento (iamport)
    #[serde(rename = "imp_uid")]
    pub imp_uid: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Item de linha embutido no pedido
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderProduct {
    pub product_id: ObjectId,
    pub name: String,
    pub introduce: String,
    pub quantity: i32,
    pub price: i64,
    pub image: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderProductRequest {
    pub product_id: String,
    pub name: String,
    pub introduce: String,
    pub quantity: i32,
    pub price: i64,
    pub image: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub products: Vec<OrderProductRequest>,
    pub total_price: i64,
    pub order_address: Address,
    #[serde(rename = "imp_uid")]
    pub imp_uid: String,
}

impl CreateOrderRequest {
    /// Checks every required field and builds the document to insert.
    pub fn into_order(self, user_id: ObjectId, now: i64) -> Result<Order, AppError> {
        if self.products.is_empty() {
            return Err(AppError::Validation("Order must contain at least one product".into()));
        }
        if self.imp_uid.trim().is_empty() {
            return Err(AppError::Validation("imp_uid is required".into()));
        }
        if self.total_price < 0 {
            return Err(AppError::Validation("totalPrice cannot be negative".into()));
        }
        self.order_address.validate()?;

        let mut products = Vec::with_capacity(self.products.len());
        for (i, item) in self.products.into_iter().enumerate() {
            for (field, value) in [("name", &item.name), ("introduce", &item.introduce), ("image", &item.image)] {
                if value.trim().is_empty() {
                    return Err(AppError::Validation(format!("products[{}].{} is required", i, field)));
                }
            }
            if item.quantity < 1 {
                return Err(AppError::Validation(format!("products[{}].quantity must be at least 1", i)));
            }
            if item.price < 0 {
                return Err(AppError::Validation(format!("products[{}].price cannot be negative", i)));
            }

            products.push(OrderProduct {
                product_id: parse_object_id(&item.product_id, "productId")?,
                name: item.name,
                introduce: item.introduce,
                quantity: item.quantity,
                price: item.price,
                image: item.image,
            });
        }

        Ok(Order {
            id: None,
            user_id,
            products,
            total_price: self.total_price,
            order_address: self.order_address,
            imp_uid: self.imp_uid,
            created_at: now,
            updated_at: now,
        })
    }
}

#[derive(Debug, Serialize, Clone, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: String,
    pub user_id: String,
    pub products: Vec<OrderProductRequest>,
    pub total_price: i64,
    pub order_address: Address,
    #[serde(rename = "imp_uid")]
    pub imp_uid: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<Order> for OrderResponse {
    fn from(o: Order) -> Self {
        OrderResponse {
            id: o.id.map(|id| id.to_hex()).unwrap_or_default(),
            user_id: o.user_id.to_hex(),
            products: o
                .products
                .into_iter()
                .map(|p| OrderProductRequest {
                    product_id: p.product_id.to_hex(),
                    name: p.name,
                    introduce: p.introduce,
                    quantity: p.quantity,
                    price: p.price,
                    image: p.image,
                })
                .collect(),
            total_price: o.total_price,
            order_address: o.order_address,
            imp_uid: o.imp_uid,
            created_at: o.created_at,
            updated_at: o.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OrderPage {
    pub orders: Vec<Order>,
    pub total_count: u64,
}

#[cfg(test)]
pub(crate) fn sample_order_request(product_id: &ObjectId) -> CreateOrderRequest {
    CreateOrderRequest {
        products: vec![OrderProductRequest {
            product_id: product_id.to_hex(),
            name: "제주 감귤 5kg".into(),
            introduce: "산지 직송".into(),
            quantity: 2,
            price: 19_900,
            image: "https://cdn.example.com/p/1.png".into(),
        }],
        total_price: 39_800,
        order_address: super::address::sample_address(),
        imp_uid: "imp_123456789".into(),
    }
}
