// Canonical listing models
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Multiplier applied to the upstream base price to get the displayed market price.
pub const MARKUP_FACTOR: f64 = 1.05;

/// Shown when the upstream record carries no image of its own.
pub const PLACEHOLDER_IMAGE_URL: &str = "https://steamcommunity-a.akamaihd.net/economy/image/-9a81dlWLwJ2UUGcVs_nsVtzdOEdtWwKGZZLQHTxDZ7I56KU0Zwwo4NUX4oFJZEHLbXH5ApeO4YmlhxYQknCRvCo04DEVlxkKgpot7HxfDhjxszJegJO7c6_NL-0m_7zO6-fw24HvcQi37nHpdii3lHj-UVoY2GlI4_EdwU9YFuC_FLvwevn0JXu75yfmXo37HfUyUbjgw/";

pub fn market_price(base_price: f64) -> f64 {
    base_price * MARKUP_FACTOR
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemCategory {
    Knife,
    Pistol,
    Rifle,
    #[serde(rename = "SMG")]
    Smg,
    Shotgun,
    Machinegun,
    #[serde(rename = "Sniper Rifle")]
    SniperRifle,
    Gloves,
    Other,
    /// Only produced for records that could not be normalized.
    Unknown,
}

impl ItemCategory {
    /// Categories offered in the filter picker.
    pub const SELECTABLE: [ItemCategory; 7] = [
        ItemCategory::Knife,
        ItemCategory::Pistol,
        ItemCategory::Rifle,
        ItemCategory::Smg,
        ItemCategory::Shotgun,
        ItemCategory::Machinegun,
        ItemCategory::SniperRifle,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ItemCategory::Knife => "Knife",
            ItemCategory::Pistol => "Pistol",
            ItemCategory::Rifle => "Rifle",
            ItemCategory::Smg => "SMG",
            ItemCategory::Shotgun => "Shotgun",
            ItemCategory::Machinegun => "Machinegun",
            ItemCategory::SniperRifle => "Sniper Rifle",
            ItemCategory::Gloves => "Gloves",
            ItemCategory::Other => "Other",
            ItemCategory::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rarity {
    #[serde(rename = "Consumer Grade")]
    ConsumerGrade,
    #[serde(rename = "Industrial Grade")]
    IndustrialGrade,
    #[serde(rename = "Mil-Spec")]
    MilSpec,
    Restricted,
    Classified,
    Covert,
    Contraband,
    Extraordinary,
    Unknown,
}

impl Rarity {
    pub const SELECTABLE: [Rarity; 7] = [
        Rarity::ConsumerGrade,
        Rarity::IndustrialGrade,
        Rarity::MilSpec,
        Rarity::Restricted,
        Rarity::Classified,
        Rarity::Covert,
        Rarity::Contraband,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Rarity::ConsumerGrade => "Consumer Grade",
            Rarity::IndustrialGrade => "Industrial Grade",
            Rarity::MilSpec => "Mil-Spec",
            Rarity::Restricted => "Restricted",
            Rarity::Classified => "Classified",
            Rarity::Covert => "Covert",
            Rarity::Contraband => "Contraband",
            Rarity::Extraordinary => "Extraordinary",
            Rarity::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Wear band of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Exterior {
    #[serde(rename = "Factory New")]
    FactoryNew,
    #[serde(rename = "Minimal Wear")]
    MinimalWear,
    #[serde(rename = "Field-Tested")]
    FieldTested,
    #[serde(rename = "Well-Worn")]
    WellWorn,
    #[serde(rename = "Battle-Scarred")]
    BattleScarred,
    #[serde(rename = "Not Specified")]
    NotSpecified,
    Unknown,
}

impl Exterior {
    pub const BANDS: [Exterior; 5] = [
        Exterior::FactoryNew,
        Exterior::MinimalWear,
        Exterior::FieldTested,
        Exterior::WellWorn,
        Exterior::BattleScarred,
    ];

    /// Maps a parsed exterior label onto a band. Labels that are not one of
    /// the five bands (sticker finishes like "Holo", for instance) are read
    /// as not specified.
    pub fn from_label(label: &str) -> Exterior {
        match label.trim() {
            "Factory New" => Exterior::FactoryNew,
            "Minimal Wear" => Exterior::MinimalWear,
            "Field-Tested" => Exterior::FieldTested,
            "Well-Worn" => Exterior::WellWorn,
            "Battle-Scarred" => Exterior::BattleScarred,
            _ => Exterior::NotSpecified,
        }
    }

    /// Band a float value falls into. Upper bounds are inclusive.
    pub fn from_float(float: f64) -> Exterior {
        if float <= 0.07 {
            Exterior::FactoryNew
        } else if float <= 0.15 {
            Exterior::MinimalWear
        } else if float <= 0.37 {
            Exterior::FieldTested
        } else if float <= 0.44 {
            Exterior::WellWorn
        } else {
            Exterior::BattleScarred
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Exterior::FactoryNew => "Factory New",
            Exterior::MinimalWear => "Minimal Wear",
            Exterior::FieldTested => "Field-Tested",
            Exterior::WellWorn => "Well-Worn",
            Exterior::BattleScarred => "Battle-Scarred",
            Exterior::NotSpecified => "Not Specified",
            Exterior::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Exterior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sticker {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wear: Option<f64>,
    pub image_url: String,
}

/// A display-ready listing. Built once by the normalizer (or the offline
/// dataset) and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub name: String,
    pub weapon: String,
    #[serde(rename = "type")]
    pub category: ItemCategory,
    pub rarity: Rarity,
    pub exterior: Exterior,
    pub price: f64,
    pub market_price: f64,
    pub float: f64,
    pub image_url: String,
    #[serde(default)]
    pub stickers: Vec<Sticker>,
    pub is_stat_trak: bool,
    pub is_souvenir: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlock_at: Option<DateTime<Utc>>,
}
