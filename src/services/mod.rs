pub mod auth_service;
pub mod order_service;
pub mod review_service;
pub mod storage_service;
pub mod user_service;
