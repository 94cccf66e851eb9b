use mongodb::{Client, Collection, Database};
use std::error::Error;

pub mod orders;
pub mod reviews;
pub mod users;

pub use orders::OrderRepository;
pub use reviews::ReviewRepository;
pub use users::UserRepository;

pub const USERS: &str = "users";
pub const REVIEWS: &str = "reviews";
pub const ORDERS: &str = "orders";

const DEFAULT_DB_NAME: &str = "commerce";

#[derive(Clone)]
pub struct MongoDB {
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str) -> Result<Self, Box<dyn Error>> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        // Connection pool
        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(5);
        client_options.max_idle_time = Some(std::time::Duration::from_secs(300));

        client_options.connect_timeout = Some(std::time::Duration::from_secs(5));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));

        let client = Client::with_options(client_options)?;
        let db = client.database(&database_name_from_uri(uri));

        // Test connection
        db.list_collection_names().await?;

        let mongodb = Self { db };
        mongodb.ensure_indexes().await?;

        Ok(mongodb)
    }

    /// Creates the indexes used by the paginated listings.
    async fn ensure_indexes(&self) -> Result<(), Box<dyn Error>> {
        use mongodb::bson::doc;
        use mongodb::IndexModel;

        log::info!("🔧 Creating database indexes...");

        // users(email) is intentionally not unique
        let indexes = [
            (USERS, doc! { "email": 1 }, "users(email)"),
            (REVIEWS, doc! { "productId": 1, "createdAt": -1 }, "reviews(productId, createdAt)"),
            (REVIEWS, doc! { "userId": 1, "createdAt": -1 }, "reviews(userId, createdAt)"),
            (ORDERS, doc! { "userId": 1, "createdAt": -1 }, "orders(userId, createdAt)"),
        ];

        for (collection, keys, label) in indexes {
            let index = IndexModel::builder().keys(keys).build();

            match self.collection::<mongodb::bson::Document>(collection).create_index(index).await {
                Ok(_) => log::info!("   ✅ Index created: {}", label),
                Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
            }
        }

        log::info!("✅ Database indexes ready");

        Ok(())
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    /// Pings the server.
    pub async fn health_check(&self) -> bool {
        self.db
            .run_command(mongodb::bson::doc! { "ping": 1 })
            .await
            .is_ok()
    }
}

/// `mongodb://host:27017/shop?retryWrites=true` -> `shop`
fn database_name_from_uri(uri: &str) -> String {
    let without_scheme = uri.split_once("://").map(|(_, rest)| rest).unwrap_or(uri);

    without_scheme
        .split_once('/')
        .map(|(_, path)| path.split('?').next().unwrap_or_default())
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_DB_NAME)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn takes_database_name_from_path() {
        assert_eq!(database_name_from_uri("mongodb://localhost:27017/shop"), "shop");
        assert_eq!(
            database_name_from_uri("mongodb+srv://u:p@cluster.example.net/shop?retryWrites=true"),
            "shop"
        );
    }

    #[test]
    fn falls_back_to_default_name() {
        assert_eq!(database_name_from_uri("mongodb://localhost:27017"), DEFAULT_DB_NAME);
        assert_eq!(database_name_from_uri("mongodb://localhost:27017/"), DEFAULT_DB_NAME);
        assert_eq!(database_name_from_uri("mongodb://localhost:27017/?w=majority"), DEFAULT_DB_NAME);
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_mongodb_connection() {
        dotenv::dotenv().ok();
        let uri = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "mongodb://localhost:27017/commerce_test".to_string());

        let db = MongoDB::new(&uri).await;
        assert!(db.is_ok());
        assert!(db.unwrap().health_check().await);
    }
}
