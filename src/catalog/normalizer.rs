//! Raw catalog record → display-ready [`Item`].
//!
//! [`parse`] has two outcomes: a fully derived item, or a [`Defaulted`]
//! carrying a minimal item built from safe defaults. [`normalize`] collapses
//! both into an item so one bad record never takes the listing down.

use super::classifier::classify;
use super::name_parser::parse_name;
use crate::models::{
    market_price, Exterior, Item, ItemCategory, Rarity, RawRecord, RawSticker, Sticker,
    PLACEHOLDER_IMAGE_URL,
};
use crate::utils::parse_date_like;
use log::debug;
use thiserror::Error;
use uuid::Uuid;

const ERROR_ITEM_NAME: &str = "Error Loading Skin";
const UNKNOWN_STICKER: &str = "Unknown Sticker";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DefaultReason {
    #[error("record is not an object")]
    NotAnObject,
    #[error("record has no usable name")]
    MissingName,
}

/// The fallback path of [`parse`]: the record could not be read cleanly, so
/// `item` holds zeroed numerics, unknown classifications and no stickers.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("record defaulted: {reason}")]
pub struct Defaulted {
    pub item: Item,
    pub reason: DefaultReason,
}

fn synthesize_id(prefix: &str) -> String {
    let uuid = Uuid::new_v4().simple().to_string();
    format!("{}-{}", prefix, &uuid[..9])
}

fn map_sticker(item_id: &str, index: usize, raw: &RawSticker) -> Sticker {
    Sticker {
        id: format!("{}-sticker-{}", item_id, index),
        name: raw
            .name
            .as_non_empty_text()
            .unwrap_or_else(|| UNKNOWN_STICKER.to_string()),
        wear: raw.wear.as_number().map(|w| w.clamp(0.0, 1.0)),
        image_url: raw.image.as_non_empty_text().unwrap_or_default(),
    }
}

fn defaulted(raw: &RawRecord, reason: DefaultReason) -> Defaulted {
    let price = raw.price_or_zero();
    let item = Item {
        id: synthesize_id("error"),
        name: raw
            .name_text()
            .filter(|n| !n.is_empty())
            .unwrap_or(ERROR_ITEM_NAME)
            .to_string(),
        weapon: "Unknown".to_string(),
        category: ItemCategory::Unknown,
        rarity: Rarity::Unknown,
        exterior: Exterior::Unknown,
        price,
        market_price: market_price(price),
        float: 0.0,
        image_url: String::new(),
        stickers: Vec::new(),
        is_stat_trak: false,
        is_souvenir: false,
        phase: None,
        pattern: None,
        name_tag: None,
        unlock_at: None,
    };
    Defaulted { item, reason }
}

/// Derives an item from one record, or explains why it fell back to defaults.
pub fn parse(raw: &RawRecord) -> Result<Item, Defaulted> {
    if !raw.is_object {
        return Err(defaulted(raw, DefaultReason::NotAnObject));
    }
    let label = match raw.name_text() {
        Some(label) => label,
        None => return Err(defaulted(raw, DefaultReason::MissingName)),
    };

    let parsed = parse_name(label);
    let (category, rarity) = classify(&parsed.weapon, &parsed.skin);

    let id = raw.id_text().unwrap_or_else(|| synthesize_id("item"));
    let price = raw.price_or_zero();

    let stickers = raw
        .stickers
        .as_ref()
        .map(|stickers| {
            stickers
                .iter()
                .enumerate()
                .map(|(index, sticker)| map_sticker(&id, index, sticker))
                .collect()
        })
        .unwrap_or_default();

    Ok(Item {
        name: parsed.display_name(),
        exterior: parsed.exterior_band(),
        weapon: parsed.weapon,
        category,
        rarity,
        price,
        market_price: market_price(price),
        float: raw.float_or_zero(),
        image_url: raw
            .image
            .as_non_empty_text()
            .unwrap_or_else(|| PLACEHOLDER_IMAGE_URL.to_string()),
        stickers,
        is_stat_trak: parsed.is_stat_trak,
        is_souvenir: parsed.is_souvenir,
        phase: raw.phase.as_non_empty_text(),
        pattern: raw.pattern.as_non_empty_text(),
        name_tag: raw.name_tag.as_non_empty_text(),
        unlock_at: parse_date_like(&raw.unlock_at),
        id,
    })
}

/// Always yields a displayable item.
pub fn normalize(raw: &RawRecord) -> Item {
    match parse(raw) {
        Ok(item) => item,
        Err(fallback) => {
            debug!("Using default item ({}): {:?}", fallback.reason, raw.name);
            fallback.item
        }
    }
}

pub fn normalize_all(records: &[RawRecord]) -> Vec<Item> {
    records.iter().map(normalize).collect()
}
