pub mod health;
pub mod items;

pub use health::health_check;
pub use items::{create_item, read_all_items, read_item, read_item_manual};
