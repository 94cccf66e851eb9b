pub mod address;
pub mod order;
pub mod review;
pub mod user;

pub use address::*;
pub use order::*;
pub use review::*;
pub use user::*;
