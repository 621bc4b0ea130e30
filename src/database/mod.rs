pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod store;

pub use manager::{DatabaseError, DatabaseManager, DatabaseResult};
pub use memory::MemoryStore;
pub use models::{Restaurant, RestaurantFields, Review, ReviewFields};
pub use postgres::PgStore;
pub use store::DataStore;
