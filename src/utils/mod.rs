pub mod dates;
pub mod paths;

pub use dates::*;
pub use paths::*;
