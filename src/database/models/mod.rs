pub mod restaurant;
pub mod review;

pub use restaurant::{Restaurant, RestaurantFields};
pub use review::{Review, ReviewFields};
