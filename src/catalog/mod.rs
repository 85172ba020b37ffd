// Item catalog: label parsing, classification and normalization
pub mod classifier;
pub mod name_parser;
pub mod normalizer;

pub use classifier::{categorize_weapon, classify, determine_rarity};
pub use name_parser::{parse_name, ParsedName};
pub use normalizer::{normalize, normalize_all, parse, DefaultReason, Defaulted};
