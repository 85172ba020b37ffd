// Static listings served while the data source is offline
use crate::catalog::categorize_weapon;
use crate::models::{market_price, Exterior, Item, ItemCategory, Rarity, Sticker};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Size of the offline catalog, curated listings included.
pub const OFFLINE_DATASET_SIZE: usize = 50;

const GENERATOR_SEED: u64 = 0x5EED_0CA7;

const STEAM_IMAGE_BASE: &str = "https://steamcommunity-a.akamaihd.net/economy/image/";

const GENERATED_WEAPONS: [&str; 10] = [
    "AK-47",
    "M4A4",
    "M4A1-S",
    "AWP",
    "Desert Eagle",
    "USP-S",
    "Glock-18",
    "P250",
    "Karambit",
    "Butterfly Knife",
];

const GENERATED_SKINS: [&str; 10] = [
    "Asiimov",
    "Fade",
    "Doppler",
    "Crimson Web",
    "Slaughter",
    "Case Hardened",
    "Hyper Beast",
    "Neo-Noir",
    "Dragon Lore",
    "Medusa",
];

struct Curated {
    id: &'static str,
    weapon: &'static str,
    skin: &'static str,
    category: ItemCategory,
    rarity: Rarity,
    exterior: Exterior,
    price: f64,
    float: f64,
    image: &'static str,
    is_stat_trak: bool,
    is_souvenir: bool,
    phase: Option<&'static str>,
    pattern: Option<&'static str>,
}

const CURATED: [Curated; 8] = [
    Curated {
        id: "1",
        weapon: "AK-47",
        skin: "Asiimov",
        category: ItemCategory::Rifle,
        rarity: Rarity::Covert,
        exterior: Exterior::FieldTested,
        price: 87.65,
        float: 0.21,
        image: "-9a81dlWLwJ2UUGcVs_nsVtzdOEdtWwKGZZLQHTxDZ7I56KU0Zwwo4NUX4oFJZEHLbXH5ApeO4YmlhxYQknCRvCo04DEVlxkKgpot7HxfDhjxszJemkV09-5lpKKqPrxN7LEmyVQ7MEpiLuSrYmnjQO3-UdsZGHyd4_Bd1RvNQ7T_FDrw-_ng5K4u57NmyAwpGB8spXSgVwr",
        is_stat_trak: true,
        is_souvenir: false,
        phase: None,
        pattern: None,
    },
    Curated {
        id: "2",
        weapon: "AWP",
        skin: "Dragon Lore",
        category: ItemCategory::SniperRifle,
        rarity: Rarity::Covert,
        exterior: Exterior::FactoryNew,
        price: 10325.75,
        float: 0.01,
        image: "-9a81dlWLwJ2UUGcVs_nsVtzdOEdtWwKGZZLQHTxDZ7I56KU0Zwwo4NUX4oFJZEHLbXH5ApeO4YmlhxYQknCRvCo04DEVlxkKgpot621FAR17P7NdTRH-t26q4SZlvD7PYTQgXtu5cB1g_zMyoD0mlrn_RVtZD_3ctOQew5vZg2E-wW3kO_t0J-4uZ7NzHI27CchtHva0hS_hxlSLrs4GzzPWDY",
        is_stat_trak: false,
        is_souvenir: true,
        phase: None,
        pattern: None,
    },
    Curated {
        id: "3",
        weapon: "Karambit",
        skin: "Doppler",
        category: ItemCategory::Knife,
        rarity: Rarity::Covert,
        exterior: Exterior::FactoryNew,
        price: 1234.56,
        float: 0.009,
        image: "-9a81dlWLwJ2UUGcVs_nsVtzdOEdtWwKGZZLQHTxDZ7I56KU0Zwwo4NUX4oFJZEHLbXH5ApeO4YmlhxYQknCRvCo04DEVlxkKgpovbSsLQJf2PLacDBA5ciJlY20k_jkI7fUhFRB4MRij7j--YXygED6-EtrNmihLYaXJABoNArRrFS3wOzogJa_u5-YzHM17ihw53_Ulwv330_FCJ4pDA",
        is_stat_trak: true,
        is_souvenir: false,
        phase: Some("Ruby"),
        pattern: None,
    },
    Curated {
        id: "4",
        weapon: "Glock-18",
        skin: "Fade",
        category: ItemCategory::Pistol,
        rarity: Rarity::Restricted,
        exterior: Exterior::FactoryNew,
        price: 875.23,
        float: 0.024,
        image: "-9a81dlWLwJ2UUGcVs_nsVtzdOEdtWwKGZZLQHTxDZ7I56KU0Zwwo4NUX4oFJZEHLbXH5ApeO4YmlhxYQknCRvCo04DEVlxkKgposbaqKAxf0v73dS9D69O4q4eHmPT_DLfYkWNF18lwmO7Eu4mh2lXj-RJtajjxJoWcIVA5ZA2G81W_lOe9jcPpus_MzXtg6CRzsX2LlxC0n1gSOaO9UE6N",
        is_stat_trak: false,
        is_souvenir: false,
        phase: None,
        pattern: Some("Full Fade"),
    },
    Curated {
        id: "5",
        weapon: "M4A4",
        skin: "Howl",
        category: ItemCategory::Rifle,
        rarity: Rarity::Contraband,
        exterior: Exterior::MinimalWear,
        price: 3568.29,
        float: 0.08,
        image: "-9a81dlWLwJ2UUGcVs_nsVtzdOEdtWwKGZZLQHTxDZ7I56KU0Zwwo4NUX4oFJZEHLbXH5ApeO4YmlhxYQknCRvCo04DEVlxkKgpou-6kejhjxszFJTwW09-vloWZh-L6OITZk2pH8fp9i_vG8MKs3VHi8kc_ZWrzI4CVJAY4NVHT-Fm7xO-81J61up7MzHZluCQq4XvYyUGpwUYbdFiGJiw",
        is_stat_trak: false,
        is_souvenir: false,
        phase: None,
        pattern: None,
    },
    Curated {
        id: "6",
        weapon: "USP-S",
        skin: "Kill Confirmed",
        category: ItemCategory::Pistol,
        rarity: Rarity::Covert,
        exterior: Exterior::WellWorn,
        price: 178.50,
        float: 0.41,
        image: "-9a81dlWLwJ2UUGcVs_nsVtzdOEdtWwKGZZLQHTxDZ7I56KU0Zwwo4NUX4oFJZEHLbXH5ApeO4YmlhxYQknCRvCo04DEVlxkKgpoo6m1FBRp3_bGcjhQ09-jq5WYh8j_OrfdqWhe5sN4mOTE8bP4jVC9vh5yYGvxdY6SIwA4aV7Y-Ae5wOft18C-tJubnXNqs3Jw7S3YgVXp1mIB25El",
        is_stat_trak: false,
        is_souvenir: false,
        phase: None,
        pattern: None,
    },
    Curated {
        id: "7",
        weapon: "Desert Eagle",
        skin: "Blaze",
        category: ItemCategory::Pistol,
        rarity: Rarity::Restricted,
        exterior: Exterior::FactoryNew,
        price: 456.78,
        float: 0.015,
        image: "-9a81dlWLwJ2UUGcVs_nsVtzdOEdtWwKGZZLQHTxDZ7I56KU0Zwwo4NUX4oFJZEHLbXH5ApeO4YmlhxYQknCRvCo04DEVlxkKgposr-kLAtl7PLZTjlH_9mkgIWKkPvxDLDEm2JS4Mp1mOjG-oLKhVKwogYxfTv3I4fGJFI3YA2F-VG-w-nohsPt78nKziRqvyJ34GGdwUJBSSPu4g",
        is_stat_trak: true,
        is_souvenir: false,
        phase: None,
        pattern: None,
    },
    Curated {
        id: "8",
        weapon: "AK-47",
        skin: "Fire Serpent",
        category: ItemCategory::Rifle,
        rarity: Rarity::Covert,
        exterior: Exterior::BattleScarred,
        price: 678.90,
        float: 0.68,
        image: "-9a81dlWLwJ2UUGcVs_nsVtzdOEdtWwKGZZLQHTxDZ7I56KU0Zwwo4NUX4oFJZEHLbXH5ApeO4YmlhxYQknCRvCo04DEVlxkKgpot7HxfDhjxszJemkV09-5gZKKkPLLMrfFqWdY781lteXA54vwxlew_hJvMGH2coCTIQU2ZQmF_FG8wunq15G17sjJznQ2unZ24SvD30vg7m-c9vE",
        is_stat_trak: false,
        is_souvenir: false,
        phase: None,
        pattern: None,
    },
];

const ASIIMOV_STICKER_IMAGE: &str = "-9a81dlWLwJ2UUGcVs_nsVtzdOEdtWwKGZZLQHTxDZ7I56KU0Zwwo4NUX4oFJZEHLbXQ9QVcJY8gulReQ0HdUuqkw9aDAhJkIAVNpbO3LR4uieMck21Lvoi--ImXksnlMoPSkGoJsZMn3OnEoNyjjVawrUVtNj2nLdCQc1c9Yg7TqFG_wbjm0MC_vIOJlyW55g8v";

fn image_url(hash: &str) -> String {
    format!("{}{}", STEAM_IMAGE_BASE, hash)
}

fn curated_stickers(id: &str) -> Vec<Sticker> {
    match id {
        "1" => vec![Sticker {
            id: format!("{}-sticker-0", id),
            name: "Ninjas in Pyjamas | Stockholm 2021".to_string(),
            wear: Some(0.08),
            image_url: image_url(ASIIMOV_STICKER_IMAGE),
        }],
        _ => Vec::new(),
    }
}

impl Curated {
    fn to_item(&self) -> Item {
        Item {
            id: self.id.to_string(),
            name: format!("{} | {}", self.weapon, self.skin),
            weapon: self.weapon.to_string(),
            category: self.category,
            rarity: self.rarity,
            exterior: self.exterior,
            price: self.price,
            market_price: market_price(self.price),
            float: self.float,
            image_url: image_url(self.image),
            stickers: curated_stickers(self.id),
            is_stat_trak: self.is_stat_trak,
            is_souvenir: self.is_souvenir,
            phase: self.phase.map(str::to_string),
            pattern: self.pattern.map(str::to_string),
            name_tag: None,
            unlock_at: None,
        }
    }
}

/// The hand-picked listings at the head of the offline catalog.
pub fn curated_items() -> Vec<Item> {
    CURATED.iter().map(Curated::to_item).collect()
}

fn pick<'a, T>(rng: &mut StdRng, values: &'a [T]) -> &'a T {
    &values[rng.gen_range(0..values.len())]
}

/// Extends the curated listings to `count` with generated ones. The same
/// `seed` always yields the same catalog.
pub fn generate_items(count: usize, seed: u64) -> Vec<Item> {
    let mut items = curated_items();
    let mut rng = StdRng::seed_from_u64(seed);

    for i in items.len()..count {
        let base_image = image_url(CURATED[i % CURATED.len()].image);
        let weapon = *pick(&mut rng, &GENERATED_WEAPONS);
        let skin = *pick(&mut rng, &GENERATED_SKINS);
        let rarity = *pick(&mut rng, &Rarity::SELECTABLE);
        let float: f64 = rng.gen();
        let price = rng.gen_range(1..=5000) as f64;

        items.push(Item {
            id: format!("generated-{}", i),
            name: format!("{} | {}", weapon, skin),
            weapon: weapon.to_string(),
            category: categorize_weapon(weapon),
            rarity,
            exterior: Exterior::from_float(float),
            price,
            market_price: market_price(price),
            float,
            image_url: base_image,
            stickers: Vec::new(),
            is_stat_trak: rng.gen_bool(0.3),
            is_souvenir: rng.gen_bool(0.1),
            phase: None,
            pattern: None,
            name_tag: None,
            unlock_at: None,
        });
    }

    items
}

/// The full offline catalog.
pub fn offline_items() -> Vec<Item> {
    generate_items(OFFLINE_DATASET_SIZE, GENERATOR_SEED)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_curated_items_are_consistent() {
        let items = curated_items();
        assert_eq!(items.len(), 8);
        for item in &items {
            assert_eq!(item.market_price, item.price * 1.05);
            assert_eq!(item.exterior, Exterior::from_float(item.float));
            assert!(item.name.starts_with(&item.weapon));
            assert!(item.image_url.starts_with(STEAM_IMAGE_BASE));
        }
        assert_eq!(items[0].stickers.len(), 1);
        assert_eq!(items[2].phase.as_deref(), Some("Ruby"));
        assert_eq!(items[3].pattern.as_deref(), Some("Full Fade"));
    }

    #[test]
    fn test_offline_catalog_size_and_ids() {
        let items = offline_items();
        assert_eq!(items.len(), OFFLINE_DATASET_SIZE);
        let ids: HashSet<&str> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids.len(), items.len());
        assert_eq!(items[8].id, "generated-8");
        assert_eq!(items[49].id, "generated-49");
    }

    #[test]
    fn test_generation_is_deterministic() {
        assert_eq!(generate_items(30, 7), generate_items(30, 7));
        assert_eq!(offline_items(), offline_items());
    }

    #[test]
    fn test_generated_items_hold_invariants() {
        for item in offline_items().iter().skip(8) {
            assert!((0.0..1.0).contains(&item.float));
            assert!((1.0..=5000.0).contains(&item.price));
            assert_eq!(item.market_price, item.price * 1.05);
            assert_eq!(item.exterior, Exterior::from_float(item.float));
            assert_eq!(item.category, categorize_weapon(&item.weapon));
            assert_ne!(item.rarity, Rarity::Unknown);
        }
    }

    #[test]
    fn test_small_counts_keep_curated_head() {
        assert_eq!(generate_items(3, 1).len(), 8);
        assert_eq!(generate_items(0, 1), curated_items());
    }
}
