// Data models (structs)
pub mod item;
pub mod price_history;
pub mod query;
pub mod raw;
pub mod response;
pub mod settings;

pub use item::*;
pub use price_history::*;
pub use query::*;
pub use raw::*;
pub use response::*;
pub use settings::*;
