use super::listing::Listing;
use crate::models::FilterSpec;

/// AND across dimensions, OR within a multi-valued one.
pub fn matches<L: Listing + ?Sized>(item: &L, spec: &FilterSpec) -> bool {
    if let Some(categories) = spec.active_categories() {
        if !categories.contains(&item.category()) {
            return false;
        }
    }

    if let Some(rarities) = spec.active_rarities() {
        if !rarities.contains(&item.rarity()) {
            return false;
        }
    }

    if let Some(exteriors) = spec.active_exteriors() {
        if !exteriors.contains(&item.exterior()) {
            return false;
        }
    }

    if let Some(range) = &spec.price_range {
        if !range.contains(item.price()) {
            return false;
        }
    }

    if let Some(range) = &spec.float_range {
        if !range.contains(item.float_value()) {
            return false;
        }
    }

    // Only an explicit "has stickers" narrows; unchecking it shows everything.
    if spec.has_stickers == Some(true) && item.sticker_count() == 0 {
        return false;
    }

    if let Some(stat_trak) = spec.is_stat_trak {
        if item.is_stat_trak() != stat_trak {
            return false;
        }
    }

    if let Some(souvenir) = spec.is_souvenir {
        if item.is_souvenir() != souvenir {
            return false;
        }
    }

    true
}

/// Records passing `spec`, in input order. No spec lets everything through.
pub fn filter_listings<'a, L: Listing>(items: &'a [L], spec: Option<&FilterSpec>) -> Vec<&'a L> {
    match spec {
        Some(spec) if !spec.is_empty() => items.iter().filter(|item| matches(*item, spec)).collect(),
        _ => items.iter().collect(),
    }
}
