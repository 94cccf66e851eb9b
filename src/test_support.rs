//! In-memory stand-ins for MongoDB and S3, plus token helpers, shared by unit tests.

use async_trait::async_trait;
use jsonwebtoken::{encode, EncodingKey, Header};
use mongodb::bson::oid::ObjectId;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::database::{reviews::ReviewScope, OrderRepository, ReviewRepository, UserRepository};
use crate::models::{Order, OrderPage, Review, ReviewPage, UpdateReviewRequest, UpdateUserRequest, User};
use crate::services::auth_service::{get_jwt_audience, get_jwt_issuer, get_jwt_secret, Claims};
use crate::services::storage_service::UploadUrlSigner;
use crate::utils::{AppError, Page};

#[derive(Default)]
pub struct MemoryStore {
    reviews: Mutex<Vec<Review>>,
    users: Mutex<Vec<User>>,
    orders: Mutex<Vec<Order>>,
    /// Makes every call fail like an unreachable server.
    pub unavailable: bool,
}

impl MemoryStore {
    pub fn unavailable() -> Self {
        Self { unavailable: true, ..Default::default() }
    }

    fn check(&self) -> Result<(), AppError> {
        if self.unavailable {
            Err(AppError::DatabaseError("server selection timeout".into()))
        } else {
            Ok(())
        }
    }

    pub fn review_count(&self) -> usize {
        self.reviews.lock().unwrap().len()
    }

    pub fn user_count(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    pub fn order_count(&self) -> usize {
        self.orders.lock().unwrap().len()
    }
}

/// Newest first, like the `createdAt: -1` sort.
fn window<T: Clone>(items: &[T], keep: impl Fn(&T) -> bool, page: Page) -> (Vec<T>, u64) {
    let matching: Vec<&T> = items.iter().rev().filter(|i| keep(i)).collect();
    let total = matching.len() as u64;
    let slice = matching
        .into_iter()
        .skip(page.skip as usize)
        .take(page.limit as usize)
        .cloned()
        .collect();
    (slice, total)
}

#[async_trait]
impl ReviewRepository for MemoryStore {
    async fn insert_review(&self, mut review: Review) -> Result<Review, AppError> {
        self.check()?;
        review.id = Some(ObjectId::new());
        self.reviews.lock().unwrap().push(review.clone());
        Ok(review)
    }

    async fn find_reviews(&self, scope: ReviewScope, page: Page) -> Result<ReviewPage, AppError> {
        self.check()?;
        let reviews = self.reviews.lock().unwrap();
        let (reviews, total_count) = window(
            reviews.as_slice(),
            |r| match scope {
                ReviewScope::Product(id) => r.product_id == id,
                ReviewScope::User(id) => r.user_id == id,
            },
            page,
        );
        Ok(ReviewPage { reviews, total_count })
    }

    async fn find_review(&self, id: ObjectId) -> Result<Option<Review>, AppError> {
        self.check()?;
        Ok(self.reviews.lock().unwrap().iter().find(|r| r.id == Some(id)).cloned())
    }

    async fn update_review(
        &self,
        id: ObjectId,
        update: &UpdateReviewRequest,
        now: i64,
    ) -> Result<Option<Review>, AppError> {
        self.check()?;
        let mut reviews = self.reviews.lock().unwrap();
        let Some(review) = reviews.iter_mut().find(|r| r.id == Some(id)) else {
            return Ok(None);
        };

        if let Some(title) = &update.title { review.title = title.clone(); }
        if let Some(content) = &update.content { review.content = content.clone(); }
        if let Some(starpoint) = update.starpoint { review.starpoint = starpoint; }
        if let Some(images) = &update.images { review.images = images.clone(); }
        review.updated_at = now;

        Ok(Some(review.clone()))
    }

    async fn delete_review(&self, id: ObjectId) -> Result<Option<Review>, AppError> {
        self.check()?;
        let mut reviews = self.reviews.lock().unwrap();
        let position = reviews.iter().position(|r| r.id == Some(id));
        Ok(position.map(|i| reviews.remove(i)))
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert_user(&self, mut user: User) -> Result<User, AppError> {
        self.check()?;
        user.id.get_or_insert_with(ObjectId::new);
        self.users.lock().unwrap().push(user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        self.check()?;
        Ok(self.users.lock().unwrap().iter().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: ObjectId) -> Result<Option<User>, AppError> {
        self.check()?;
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == Some(id)).cloned())
    }

    async fn update_user(
        &self,
        id: ObjectId,
        update: &UpdateUserRequest,
        now: i64,
    ) -> Result<Option<User>, AppError> {
        self.check()?;
        let mut users = self.users.lock().unwrap();
        let Some(user) = users.iter_mut().find(|u| u.id == Some(id)) else {
            return Ok(None);
        };

        if let Some(name) = &update.name { user.name = Some(name.clone()); }
        if let Some(nickname) = &update.nickname { user.nickname = Some(nickname.clone()); }
        if let Some(phone) = &update.phone_number { user.phone_number = Some(phone.clone()); }
        if let Some(image) = &update.profile_image { user.profile_image = Some(image.clone()); }
        if let Some(address) = &update.address { user.address = Some(address.clone()); }
        user.updated_at = now;

        Ok(Some(user.clone()))
    }
}

#[async_trait]
impl OrderRepository for MemoryStore {
    async fn insert_order(&self, mut order: Order) -> Result<Order, AppError> {
        self.check()?;
        order.id = Some(ObjectId::new());
        self.orders.lock().unwrap().push(order.clone());
        Ok(order)
    }

    async fn find_orders_by_user(&self, user_id: ObjectId, page: Page) -> Result<OrderPage, AppError> {
        self.check()?;
        let orders = self.orders.lock().unwrap();
        let (orders, total_count) = window(orders.as_slice(), |o| o.user_id == user_id, page);
        Ok(OrderPage { orders, total_count })
    }

    async fn find_order(&self, user_id: ObjectId, id: ObjectId) -> Result<Option<Order>, AppError> {
        self.check()?;
        Ok(self
            .orders
            .lock()
            .unwrap()
            .iter()
            .find(|o| o.id == Some(id) && o.user_id == user_id)
            .cloned())
    }
}

/// Hands out `https://fake-bucket.local/<key>?sig=<n>`.
pub struct FakeSigner {
    prefix: String,
    fail: bool,
    issued: AtomicUsize,
}

impl Default for FakeSigner {
    fn default() -> Self {
        Self { prefix: "uploads".into(), fail: false, issued: AtomicUsize::new(0) }
    }
}

impl FakeSigner {
    pub fn failing() -> Self {
        Self { fail: true, ..Default::default() }
    }
}

#[async_trait]
impl UploadUrlSigner for FakeSigner {
    fn key_prefix(&self) -> &str {
        &self.prefix
    }

    async fn presign_upload(&self, key: &str) -> Result<String, AppError> {
        if self.fail {
            return Err(AppError::StorageError("credentials expired".into()));
        }
        let n = self.issued.fetch_add(1, Ordering::Relaxed);
        Ok(format!("https://fake-bucket.local/{}?sig={}", key, n))
    }
}

pub fn claims_for(user_id: &ObjectId, email: &str) -> Claims {
    let now = chrono::Utc::now().timestamp();
    Claims {
        sub: user_id.to_hex(),
        email: email.to_string(),
        iat: now as usize,
        exp: (now + 3600) as usize,
        aud: get_jwt_audience(),
        iss: get_jwt_issuer(),
    }
}

pub fn issue_token_with(user_id: &ObjectId, email: &str, audience: &str, ttl_secs: i64) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id.to_hex(),
        email: email.to_string(),
        iat: now as usize,
        exp: (now + ttl_secs) as usize,
        aud: audience.to_string(),
        iss: get_jwt_issuer(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(get_jwt_secret().as_ref()),
    )
    .unwrap()
}

pub fn issue_token(user_id: &ObjectId, email: &str) -> String {
    issue_token_with(user_id, email, &get_jwt_audience(), 3600)
}
