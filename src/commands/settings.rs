// Settings handlers - JSON file storage with partial updates
use crate::error::StorageError;
use crate::file_manager::{read_json_file_or_default, update_json_file};
use crate::models::{Settings, SourceConfig, DEFAULT_PAGE_SIZE};
use crate::utils::get_settings_json_path;
use log::debug;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsParams {
    /// Explicit price list URL. An empty string falls back to the built-in lists.
    pub price_list_url: Option<String>,
    /// Switches to the inventory API. An empty string switches back to the price list.
    pub inventory_api_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub page_size: Option<u32>,
    pub unlocked_only: Option<bool>,
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn apply_update(current: &mut Settings, params: UpdateSettingsParams) {
    if let Some(price_list_url) = params.price_list_url {
        current.source = SourceConfig::PriceList {
            url: non_empty(price_list_url),
        };
    }
    if let Some(inventory_api_url) = params.inventory_api_url {
        match non_empty(inventory_api_url) {
            Some(base_url) => current.source = SourceConfig::InventoryApi { base_url },
            None => {
                if matches!(current.source, SourceConfig::InventoryApi { .. }) {
                    current.source = SourceConfig::PriceList { url: None };
                }
            }
        }
    }
    if let Some(request_timeout_secs) = params.request_timeout_secs {
        current.request_timeout_secs = request_timeout_secs.max(1);
    }
    if let Some(page_size) = params.page_size {
        current.page_size = if page_size == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            page_size
        };
    }
    if let Some(unlocked_only) = params.unlocked_only {
        current.unlocked_only = unlocked_only;
    }
}

pub fn load_settings_from(path: &Path) -> Result<Settings, StorageError> {
    read_json_file_or_default(path)
}

pub fn update_settings_at(
    path: &Path,
    params: UpdateSettingsParams,
) -> Result<Settings, StorageError> {
    let updated = update_json_file(path, |current: &mut Settings| apply_update(current, params))?;
    debug!("Updated settings: {:?}", updated);
    Ok(updated)
}

/// Get current settings from the JSON file
pub fn get_settings() -> Result<Settings, StorageError> {
    load_settings_from(&get_settings_json_path())
}

/// Update settings with partial update support
pub fn update_settings(params: UpdateSettingsParams) -> Result<Settings, StorageError> {
    update_settings_at(&get_settings_json_path(), params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UNLOCKED_PRICE_LIST_URL;

    #[test]
    fn test_missing_file_reads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings_from(&dir.path().join("settings.json")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_partial_update_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let updated = update_settings_at(
            &path,
            UpdateSettingsParams {
                inventory_api_url: Some("http://localhost:3001/api".to_string()),
                request_timeout_secs: Some(0),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(
            updated.source,
            SourceConfig::InventoryApi {
                base_url: "http://localhost:3001/api".to_string()
            }
        );
        assert_eq!(updated.request_timeout_secs, 1);
        assert_eq!(load_settings_from(&path).unwrap(), updated);

        let updated = update_settings_at(
            &path,
            UpdateSettingsParams {
                unlocked_only: Some(true),
                page_size: Some(48),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(updated.page_size, 48);
        assert!(matches!(updated.source, SourceConfig::InventoryApi { .. }));
    }

    #[test]
    fn test_empty_strings_clear() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        update_settings_at(
            &path,
            UpdateSettingsParams {
                inventory_api_url: Some("http://localhost:3001/api".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        let updated = update_settings_at(
            &path,
            UpdateSettingsParams {
                inventory_api_url: Some(String::new()),
                unlocked_only: Some(true),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(updated.source, SourceConfig::PriceList { url: None });
        assert_eq!(updated.price_list_url(), UNLOCKED_PRICE_LIST_URL);

        let updated = update_settings_at(
            &path,
            UpdateSettingsParams {
                price_list_url: Some("  ".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(updated.source, SourceConfig::PriceList { url: None });
    }
}
