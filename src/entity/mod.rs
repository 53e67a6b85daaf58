mod item;
mod seed;

pub use item::{normalize_location, CartType, CodeCartItem, ItemData};
pub use seed::example_items;
