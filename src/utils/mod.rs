// Utility functions
pub mod error;
pub mod pagination;
pub mod object_id;

pub use error::*;
pub use pagination::*;
pub use object_id::*;
