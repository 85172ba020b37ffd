use super::listing::Listing;
use crate::models::{SortDirection, SortField, SortSpec};
use std::cmp::Ordering;

/// Case-insensitive comparison first, then lowercase before uppercase, the
/// way an English collator orders "awp" < "AWP" < "Awp Mk2".
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
        .then_with(|| b.cmp(a))
}

fn compare<L: Listing + ?Sized>(a: &L, b: &L, field: SortField) -> Ordering {
    match field {
        SortField::Price => a.price().partial_cmp(&b.price()).unwrap_or(Ordering::Equal),
        SortField::Float => a
            .float_value()
            .partial_cmp(&b.float_value())
            .unwrap_or(Ordering::Equal),
        SortField::Name => locale_cmp(a.sort_name(), b.sort_name()),
    }
}

/// Stable sort in place. Without a spec the input order stands.
pub fn sort_listings<L: Listing + ?Sized>(items: &mut [&L], sort: Option<&SortSpec>) {
    let Some(sort) = sort else {
        return;
    };
    items.sort_by(|a, b| {
        let ordering = compare(*a, *b, sort.field);
        match sort.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}
