// Filter / sort / page selections handed in by the listing page, and the page handed back
use super::item::{Exterior, ItemCategory, Rarity};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: u32 = 24;

fn unbounded() -> f64 {
    f64::INFINITY
}

/// JSON has no infinity, so an unbounded maximum travels as `null` or is omitted.
mod upper_bound {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(max: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if max.is_finite() {
            serializer.serialize_some(max)
        } else {
            serializer.serialize_none()
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
    }
}

/// Inclusive numeric range. An infinite `max` means no upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericRange {
    #[serde(default)]
    pub min: f64,
    #[serde(default = "unbounded", with = "upper_bound")]
    pub max: f64,
}

impl NumericRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn at_least(min: f64) -> Self {
        Self { min, max: f64::INFINITY }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn is_bounded_above(&self) -> bool {
        self.max.is_finite()
    }
}

/// Every field is an independent, optional constraint. The listing page
/// replaces the whole spec on each change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSpec {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<ItemCategory>>,
    #[serde(rename = "rarity", default, skip_serializing_if = "Option::is_none")]
    pub rarities: Option<Vec<Rarity>>,
    #[serde(rename = "exterior", default, skip_serializing_if = "Option::is_none")]
    pub exteriors: Option<Vec<Exterior>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_range: Option<NumericRange>,
    #[serde(rename = "float", default, skip_serializing_if = "Option::is_none")]
    pub float_range: Option<NumericRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_stickers: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_stat_trak: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_souvenir: Option<bool>,
}

fn active_set<T>(set: &Option<Vec<T>>) -> Option<&[T]> {
    set.as_deref().filter(|values| !values.is_empty())
}

impl FilterSpec {
    pub fn active_categories(&self) -> Option<&[ItemCategory]> {
        active_set(&self.categories)
    }

    pub fn active_rarities(&self) -> Option<&[Rarity]> {
        active_set(&self.rarities)
    }

    pub fn active_exteriors(&self) -> Option<&[Exterior]> {
        active_set(&self.exteriors)
    }

    /// True when no field constrains anything.
    pub fn is_empty(&self) -> bool {
        self.active_categories().is_none()
            && self.active_rarities().is_none()
            && self.active_exteriors().is_none()
            && self.price_range.is_none()
            && self.float_range.is_none()
            && self.has_stickers != Some(true)
            && self.is_stat_trak.is_none()
            && self.is_souvenir.is_none()
    }

    /// Chip labels for the active-filters row.
    pub fn labels(&self) -> Vec<String> {
        let mut labels = Vec::new();
        if let Some(categories) = self.active_categories() {
            labels.extend(categories.iter().map(|c| c.label().to_string()));
        }
        if let Some(rarities) = self.active_rarities() {
            labels.extend(rarities.iter().map(|r| r.label().to_string()));
        }
        if let Some(exteriors) = self.active_exteriors() {
            labels.extend(exteriors.iter().map(|e| e.label().to_string()));
        }
        if let Some(range) = &self.price_range {
            let max = if range.is_bounded_above() {
                format!("${}", range.max)
            } else {
                "∞".to_string()
            };
            labels.push(format!("${} - {}", range.min, max));
        }
        if let Some(range) = &self.float_range {
            let max = if range.is_bounded_above() {
                range.max.to_string()
            } else {
                "∞".to_string()
            };
            labels.push(format!("Float: {} - {}", range.min, max));
        }
        if self.has_stickers == Some(true) {
            labels.push("Has Stickers".to_string());
        }
        if self.is_stat_trak == Some(true) {
            labels.push("StatTrak™".to_string());
        }
        if self.is_souvenir == Some(true) {
            labels.push("Souvenir".to_string());
        }
        labels
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Price,
    Float,
    Name,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Price => "price",
            SortField::Float => "float",
            SortField::Name => "name",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }
}

impl Default for SortSpec {
    fn default() -> Self {
        Self::new(SortField::Price, SortDirection::Asc)
    }
}

/// 1-based page selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSpec {
    pub page: u32,
    pub limit: u32,
}

impl PageSpec {
    /// A zero page reads as the first page and a zero size as the default size.
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: if limit == 0 { DEFAULT_PAGE_SIZE } else { limit },
        }
    }

    pub fn first(limit: u32) -> Self {
        Self::new(1, limit)
    }

    pub fn offset(&self) -> usize {
        (self.page.max(1) as usize - 1).saturating_mul(self.size())
    }

    pub fn size(&self) -> usize {
        if self.limit == 0 {
            DEFAULT_PAGE_SIZE as usize
        } else {
            self.limit as usize
        }
    }
}

impl Default for PageSpec {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE)
    }
}

pub fn page_count(total: usize, page_size: usize) -> u32 {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size) as u32
}

/// One page of results plus the filtered (pre-pagination) totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult<T = super::item::Item> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
}

impl<T> QueryResult<T> {
    pub fn empty(page: PageSpec) -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page: page.page,
            page_size: page.limit,
            total_pages: 0,
        }
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> QueryResult<U> {
        QueryResult {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            page_size: self.page_size,
            total_pages: self.total_pages,
        }
    }
}

/// Values offered by the filter pickers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterVocabulary {
    pub categories: Vec<ItemCategory>,
    pub rarities: Vec<Rarity>,
    pub exteriors: Vec<Exterior>,
}

impl Default for FilterVocabulary {
    fn default() -> Self {
        Self {
            categories: ItemCategory::SELECTABLE.to_vec(),
            rarities: Rarity::SELECTABLE.to_vec(),
            exteriors: Exterior::BANDS.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_range_without_max_is_unbounded() {
        let range: NumericRange = serde_json::from_value(json!({"min": 10})).unwrap();
        assert!(!range.is_bounded_above());
        assert!(range.contains(1_000_000.0));
        assert!(!range.contains(9.99));

        let nulled: NumericRange = serde_json::from_value(json!({"min": 0, "max": null})).unwrap();
        assert_eq!(nulled.max, f64::INFINITY);
        assert_eq!(serde_json::to_value(nulled).unwrap(), json!({"min": 0.0, "max": null}));
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        let range = NumericRange::new(0.07, 0.15);
        assert!(range.contains(0.07));
        assert!(range.contains(0.15));
        assert!(!range.contains(0.151));
    }

    #[test]
    fn test_filter_spec_wire_names() {
        let spec: FilterSpec = serde_json::from_value(json!({
            "type": ["Knife", "Sniper Rifle"],
            "rarity": ["Covert"],
            "exterior": ["Factory New"],
            "priceRange": {"min": 5, "max": 100},
            "float": {"min": 0, "max": 0.07},
            "isStatTrak": true
        }))
        .unwrap();
        assert_eq!(
            spec.categories,
            Some(vec![ItemCategory::Knife, ItemCategory::SniperRifle])
        );
        assert_eq!(spec.rarities, Some(vec![Rarity::Covert]));
        assert_eq!(spec.float_range, Some(NumericRange::new(0.0, 0.07)));
        assert_eq!(spec.is_stat_trak, Some(true));
        assert!(spec.is_souvenir.is_none());
    }

    #[test]
    fn test_empty_sets_do_not_count_as_constraints() {
        let spec = FilterSpec {
            categories: Some(vec![]),
            has_stickers: Some(false),
            ..Default::default()
        };
        assert!(spec.is_empty());
        assert!(spec.labels().is_empty());
        assert!(FilterSpec::default().is_empty());
    }

    #[test]
    fn test_filter_labels() {
        let spec = FilterSpec {
            categories: Some(vec![ItemCategory::Rifle]),
            price_range: Some(NumericRange::at_least(10.0)),
            is_stat_trak: Some(true),
            ..Default::default()
        };
        assert_eq!(spec.labels(), vec!["Rifle", "$10 - ∞", "StatTrak™"]);
    }

    #[test]
    fn test_page_spec_normalizes_zeroes() {
        let page = PageSpec::new(0, 0);
        assert_eq!(page.page, 1);
        assert_eq!(page.limit, DEFAULT_PAGE_SIZE);
        assert_eq!(PageSpec::new(3, 10).offset(), 20);
    }

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(0, 24), 0);
        assert_eq!(page_count(10, 24), 1);
        assert_eq!(page_count(48, 24), 2);
        assert_eq!(page_count(49, 24), 3);
    }
}
