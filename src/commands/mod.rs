// Command handlers - one file per domain
pub mod market;
pub mod settings;

pub use market::{Delivery, InventoryQuery, MarketSession};
