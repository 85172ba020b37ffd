use crate::models::{ItemCategory, Rarity};

const KNIVES: [&str; 18] = [
    "Karambit",
    "Bayonet",
    "Butterfly",
    "Flip",
    "Gut",
    "Huntsman",
    "Falchion",
    "Shadow Daggers",
    "Bowie",
    "Ursus",
    "Navaja",
    "Stiletto",
    "Talon",
    "Classic",
    "Paracord",
    "Survival",
    "Skeleton",
    "Nomad",
];

const GLOVES: [&str; 9] = [
    "Gloves",
    "Wraps",
    "Driver Gloves",
    "Moto Gloves",
    "Specialist Gloves",
    "Sport Gloves",
    "Bloodhound Gloves",
    "Hydra Gloves",
    "Broken Fang Gloves",
];

const RIFLES: [&str; 11] = [
    "AK-47", "M4A4", "M4A1-S", "FAMAS", "Galil AR", "AUG", "SG 553", "AWP", "SSG 08", "G3SG1",
    "SCAR-20",
];

const SMGS: [&str; 7] = ["P90", "MP7", "MP9", "MAC-10", "UMP-45", "PP-Bizon", "MP5-SD"];

const PISTOLS: [&str; 10] = [
    "Desert Eagle",
    "Five-SeveN",
    "Glock-18",
    "USP-S",
    "P2000",
    "P250",
    "CZ75-Auto",
    "Dual Berettas",
    "Tec-9",
    "R8 Revolver",
];

const SHOTGUNS: [&str; 4] = ["Nova", "XM1014", "MAG-7", "Sawed-Off"];

const MACHINEGUNS: [&str; 2] = ["M249", "Negev"];

/// Knife and glove names are matched by containment since market labels
/// decorate them ("★ Karambit", "★ Sport Gloves").
fn is_knife(weapon: &str) -> bool {
    KNIVES.iter().any(|knife| weapon.contains(knife))
}

fn is_gloves(weapon: &str) -> bool {
    GLOVES.iter().any(|glove| weapon.contains(glove))
}

pub fn categorize_weapon(weapon: &str) -> ItemCategory {
    if is_knife(weapon) {
        return ItemCategory::Knife;
    }

    if is_gloves(weapon) {
        return ItemCategory::Gloves;
    }

    if RIFLES.contains(&weapon) {
        return ItemCategory::Rifle;
    }

    if SMGS.contains(&weapon) {
        return ItemCategory::Smg;
    }

    if PISTOLS.contains(&weapon) {
        return ItemCategory::Pistol;
    }

    if SHOTGUNS.contains(&weapon) {
        return ItemCategory::Shotgun;
    }

    if MACHINEGUNS.contains(&weapon) {
        return ItemCategory::Machinegun;
    }

    ItemCategory::Other
}

/// Approximate rarity. There is no per-skin rarity table behind this: knives
/// are Covert, gloves Extraordinary, the Howl is Contraband, and every other
/// skin reads as Classified.
pub fn determine_rarity(weapon: &str, skin: &str) -> Rarity {
    if is_knife(weapon) {
        return Rarity::Covert;
    }

    if is_gloves(weapon) {
        return Rarity::Extraordinary;
    }

    if weapon == "M4A4" && skin == "Howl" {
        return Rarity::Contraband;
    }

    Rarity::Classified
}

/// Category and rarity in one pass.
pub fn classify(weapon: &str, skin: &str) -> (ItemCategory, Rarity) {
    (categorize_weapon(weapon), determine_rarity(weapon, skin))
}
