// What the query pipeline needs to know about a record, raw or normalized
use crate::catalog::{classify, parse_name, ParsedName};
use crate::models::{Exterior, Item, ItemCategory, Rarity, RawRecord};

pub trait Listing {
    fn category(&self) -> ItemCategory;
    fn rarity(&self) -> Rarity;
    fn exterior(&self) -> Exterior;
    fn price(&self) -> f64;
    fn float_value(&self) -> f64;
    /// Text the name sort compares.
    fn sort_name(&self) -> &str;
    fn sticker_count(&self) -> usize;
    fn is_stat_trak(&self) -> bool;
    fn is_souvenir(&self) -> bool;
}

impl Listing for Item {
    fn category(&self) -> ItemCategory {
        self.category
    }

    fn rarity(&self) -> Rarity {
        self.rarity
    }

    fn exterior(&self) -> Exterior {
        self.exterior
    }

    fn price(&self) -> f64 {
        self.price
    }

    fn float_value(&self) -> f64 {
        self.float
    }

    fn sort_name(&self) -> &str {
        &self.name
    }

    fn sticker_count(&self) -> usize {
        self.stickers.len()
    }

    fn is_stat_trak(&self) -> bool {
        self.is_stat_trak
    }

    fn is_souvenir(&self) -> bool {
        self.is_souvenir
    }
}

/// A raw record with the facets the pipeline filters and sorts on, derived
/// once up front. Records without a usable name get the same unknown
/// classification the normalizer gives them.
#[derive(Debug, Clone)]
pub struct RawListing {
    pub record: RawRecord,
    parsed: Option<ParsedName>,
    category: ItemCategory,
    rarity: Rarity,
    exterior: Exterior,
    price: f64,
    float: f64,
}

impl RawListing {
    pub fn new(record: RawRecord) -> Self {
        let parsed = if record.is_object {
            record.name_text().map(parse_name)
        } else {
            None
        };
        let (category, rarity, exterior) = match &parsed {
            Some(parsed) => {
                let (category, rarity) = classify(&parsed.weapon, &parsed.skin);
                (category, rarity, parsed.exterior_band())
            }
            None => (ItemCategory::Unknown, Rarity::Unknown, Exterior::Unknown),
        };
        let price = record.price_or_zero();
        let float = if parsed.is_some() {
            record.float_or_zero()
        } else {
            0.0
        };

        Self {
            record,
            parsed,
            category,
            rarity,
            exterior,
            price,
            float,
        }
    }
}

impl From<RawRecord> for RawListing {
    fn from(record: RawRecord) -> Self {
        RawListing::new(record)
    }
}

impl Listing for RawListing {
    fn category(&self) -> ItemCategory {
        self.category
    }

    fn rarity(&self) -> Rarity {
        self.rarity
    }

    fn exterior(&self) -> Exterior {
        self.exterior
    }

    fn price(&self) -> f64 {
        self.price
    }

    fn float_value(&self) -> f64 {
        self.float
    }

    fn sort_name(&self) -> &str {
        self.record.name_text().unwrap_or("")
    }

    fn sticker_count(&self) -> usize {
        if self.parsed.is_some() {
            self.record.sticker_count()
        } else {
            0
        }
    }

    fn is_stat_trak(&self) -> bool {
        self.parsed.as_ref().map_or(false, |p| p.is_stat_trak)
    }

    fn is_souvenir(&self) -> bool {
        self.parsed.as_ref().map_or(false, |p| p.is_souvenir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::normalize;
    use serde_json::json;

    #[test]
    fn test_raw_facets_agree_with_normalized_item() {
        let records = [
            json!({"name": "StatTrak™ AK-47 | Redline (Field-Tested)", "price": "12.5", "item_float": 0.25, "stickers": [{}]}),
            json!({"name": "Souvenir AWP | Dragon Lore (Factory New)", "price": 10325.75}),
            json!({"price": 3}),
            json!(null),
        ];
        for value in records {
            let raw = RawRecord::from_json(&value);
            let item = normalize(&raw);
            let listing = RawListing::new(raw);
            assert_eq!(listing.category(), Listing::category(&item));
            assert_eq!(listing.rarity(), Listing::rarity(&item));
            assert_eq!(listing.exterior(), Listing::exterior(&item));
            assert_eq!(listing.price(), Listing::price(&item));
            assert_eq!(listing.float_value(), item.float_value());
            assert_eq!(listing.sticker_count(), item.sticker_count());
            assert_eq!(listing.is_stat_trak(), Listing::is_stat_trak(&item));
            assert_eq!(listing.is_souvenir(), Listing::is_souvenir(&item));
        }
    }
}
