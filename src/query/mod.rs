//! Filter → sort → paginate over raw or normalized listings.
//!
//! The stages always run in that order, and totals always come from the
//! filtered set before slicing.

pub mod filter;
pub mod listing;
pub mod sort;

pub use filter::{filter_listings, matches};
pub use listing::{Listing, RawListing};
pub use sort::{locale_cmp, sort_listings};

use crate::models::{page_count, FilterSpec, PageSpec, QueryResult, SortSpec};

/// Slice of `items` for `page`. Pages past the end are empty.
pub fn paginate<T: Clone>(items: &[T], page: PageSpec) -> Vec<T> {
    let start = page.offset();
    if start >= items.len() {
        return Vec::new();
    }
    let end = start.saturating_add(page.size()).min(items.len());
    items[start..end].to_vec()
}

pub fn run_query<'a, L: Listing>(
    items: &'a [L],
    filter: Option<&FilterSpec>,
    sort: Option<&SortSpec>,
    page: PageSpec,
) -> QueryResult<&'a L> {
    let page = PageSpec::new(page.page, page.limit);
    let mut selected = filter_listings(items, filter);
    sort_listings(&mut selected, sort);

    let total = selected.len();
    QueryResult {
        items: paginate(&selected, page),
        total,
        page: page.page,
        page_size: page.limit,
        total_pages: page_count(total, page.size()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::normalize;
    use crate::fallback::dataset::{curated_items, offline_items};
    use crate::models::{
        FilterSpec, Item, ItemCategory, NumericRange, RawRecord, SortDirection, SortField,
    };
    use serde_json::json;

    fn ids(result: &QueryResult<&Item>) -> Vec<String> {
        result.items.iter().map(|i| i.id.clone()).collect()
    }

    #[test]
    fn test_small_set_fits_on_first_page() {
        let items: Vec<Item> = offline_items().into_iter().take(10).collect();
        let first = run_query(&items, None, None, PageSpec::new(1, 24));
        assert_eq!(first.items.len(), 10);
        assert_eq!(first.total, 10);
        assert_eq!(first.total_pages, 1);

        let second = run_query(&items, None, None, PageSpec::new(2, 24));
        assert!(second.items.is_empty());
        assert_eq!(second.total, 10);
        assert_eq!(second.total_pages, 1);
        assert_eq!(second.page, 2);
    }

    #[test]
    fn test_totals_come_from_filtered_set() {
        let items = offline_items();
        let spec = FilterSpec {
            categories: Some(vec![ItemCategory::Pistol]),
            ..Default::default()
        };
        let expected = items.iter().filter(|i| i.category == ItemCategory::Pistol).count();
        let result = run_query(&items, Some(&spec), None, PageSpec::new(1, 2));
        assert_eq!(result.total, expected);
        assert_eq!(result.total_pages as usize, expected.div_ceil(2));
        assert!(result.items.len() <= 2);
    }

    #[test]
    fn test_slices_cover_the_sorted_set_exactly_once() {
        let items = offline_items();
        let sort = SortSpec::new(SortField::Price, SortDirection::Desc);
        let full = run_query(&items, None, Some(&sort), PageSpec::new(1, 1000));

        let mut stitched = Vec::new();
        for page in 1..=5 {
            stitched.extend(ids(&run_query(&items, None, Some(&sort), PageSpec::new(page, 12))));
        }
        assert_eq!(stitched, ids(&full));
        assert!(run_query(&items, None, Some(&sort), PageSpec::new(6, 12)).items.is_empty());
    }

    #[test]
    fn test_rerunning_on_reassembled_pages_is_idempotent() {
        let items = offline_items();
        let filter = FilterSpec {
            price_range: Some(NumericRange::new(100.0, 4000.0)),
            ..Default::default()
        };
        let sort = SortSpec::new(SortField::Float, SortDirection::Asc);
        let page = PageSpec::new(2, 5);

        let mut reassembled: Vec<Item> = Vec::new();
        let mut n = 1;
        loop {
            let slice = run_query(&items, Some(&filter), Some(&sort), PageSpec::new(n, 5));
            if slice.items.is_empty() {
                break;
            }
            reassembled.extend(slice.items.into_iter().cloned());
            n += 1;
        }

        let original = run_query(&items, Some(&filter), Some(&sort), page);
        let rerun = run_query(&reassembled, Some(&filter), Some(&sort), page);
        assert_eq!(ids(&original), ids(&rerun));
        assert_eq!(original.total, rerun.total);
    }

    #[test]
    fn test_zero_page_reads_as_first() {
        let items = curated_items();
        let result = run_query(&items, None, None, PageSpec { page: 0, limit: 0 });
        assert_eq!(result.page, 1);
        assert_eq!(result.page_size, 24);
        assert_eq!(result.items.len(), items.len());
    }

    #[test]
    fn test_raw_and_normalized_paths_agree() {
        let values = [
            json!({"id": 1, "name": "AK-47 | Redline (Field-Tested)", "price": "12.5", "item_float": 0.25}),
            json!({"id": 2, "name": "StatTrak™ Glock-18 | Fade (Factory New)", "price": 875.23, "item_float": "0.02"}),
            json!({"id": 3, "name": "★ Karambit | Doppler (Factory New)", "price": 1234.56}),
            json!({"id": 4, "name": "P250", "price": "3.1"}),
            json!({"id": 5, "name": "AWP | Asiimov (Battle-Scarred)", "price": 60}),
        ];
        let raws: Vec<RawRecord> = values.iter().map(RawRecord::from_json).collect();
        let listings: Vec<RawListing> = raws.iter().cloned().map(RawListing::new).collect();
        let items: Vec<Item> = raws.iter().map(normalize).collect();

        let filter = FilterSpec {
            price_range: Some(NumericRange::new(10.0, 2000.0)),
            ..Default::default()
        };
        let sort = SortSpec::new(SortField::Price, SortDirection::Desc);
        let page = PageSpec::new(1, 24);

        let from_raw: Vec<String> = run_query(&listings, Some(&filter), Some(&sort), page)
            .map(|l| normalize(&l.record))
            .items
            .into_iter()
            .map(|i| i.id)
            .collect();
        let from_items = ids(&run_query(&items, Some(&filter), Some(&sort), page));
        assert_eq!(from_raw, vec!["3", "2", "5", "1"]);
        assert_eq!(from_raw, from_items);
    }

    #[test]
    fn test_paginate_bounds() {
        let data: Vec<u32> = (0..7).collect();
        assert_eq!(paginate(&data, PageSpec::new(2, 3)), vec![3, 4, 5]);
        assert_eq!(paginate(&data, PageSpec::new(3, 3)), vec![6]);
        assert!(paginate(&data, PageSpec::new(4, 3)).is_empty());
        assert!(paginate(&data, PageSpec::new(u32::MAX, u32::MAX)).is_empty());
    }
}
