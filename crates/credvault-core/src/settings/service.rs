//! Settings service with caching, validation, and permission checks

use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::sync::Arc;

use credvault_types::meta_adapter::MetaAdapter;

use super::types::{FrozenSettingsRegistry, Setting, SettingScope, SettingValue};
use crate::prelude::*;

const DEFAULT_CACHE_SIZE: NonZeroUsize = NonZeroUsize::MIN.saturating_add(99);

/// LRU cache for resolved settings values
pub struct SettingsCache {
	cache: Mutex<LruCache<String, SettingValue>>,
}

impl SettingsCache {
	pub fn new(capacity: usize) -> Self {
		let capacity = NonZeroUsize::new(capacity).unwrap_or(DEFAULT_CACHE_SIZE);
		Self { cache: Mutex::new(LruCache::new(capacity)) }
	}

	pub fn get(&self, key: &str) -> Option<SettingValue> {
		self.cache.lock().get(key).cloned()
	}

	pub fn put(&self, key: &str, value: SettingValue) {
		self.cache.lock().put(key.to_string(), value);
	}

	pub fn invalidate(&self, key: &str) {
		self.cache.lock().pop(key);
	}
}

/// Main interface for reading and changing settings
pub struct SettingsService {
	registry: Arc<FrozenSettingsRegistry>,
	cache: SettingsCache,
	meta: Arc<dyn MetaAdapter>,
}

fn type_error(key: &str, expected: &str, got: &SettingValue) -> Error {
	Error::ValidationError(format!(
		"Setting '{}' is not {}, got {}",
		key,
		expected,
		got.type_name()
	))
}

impl SettingsService {
	pub fn new(
		registry: Arc<FrozenSettingsRegistry>,
		meta: Arc<dyn MetaAdapter>,
		cache_size: usize,
	) -> Self {
		Self { registry, cache: SettingsCache::new(cache_size), meta }
	}

	/// Resolves a setting: stored value, then default
	pub async fn get(&self, key: &str) -> ClResult<SettingValue> {
		if let Some(value) = self.cache.get(key) {
			debug!("Setting cache hit: {}", key);
			return Ok(value);
		}

		let def = self
			.registry
			.get(key)
			.ok_or_else(|| Error::ValidationError(format!("Unknown setting: {}", key)))?;

		if def.scope != SettingScope::System
			&& let Some(json_value) = self.meta.read_setting(key).await?
		{
			let value = serde_json::from_value::<SettingValue>(json_value)
				.map_err(|e| Error::ValidationError(format!("Invalid setting value: {}", e)))?;
			self.cache.put(key, value.clone());
			return Ok(value);
		}

		match &def.default {
			Some(default) => {
				self.cache.put(key, default.clone());
				Ok(default.clone())
			}
			None => Err(Error::NotFound),
		}
	}

	/// Stores a new value after permission, type and validator checks
	pub async fn set(&self, key: &str, value: SettingValue, is_admin: bool) -> ClResult<Setting> {
		let def = self
			.registry
			.get(key)
			.ok_or_else(|| Error::ValidationError(format!("Unknown setting: {}", key)))?;

		if def.scope == SettingScope::System || !def.permission.check(is_admin) {
			warn!("Permission denied for setting '{}': requires {:?}", key, def.permission);
			return Err(Error::PermissionDenied);
		}

		if let Some(default) = &def.default
			&& !value.matches_type(default)
		{
			return Err(Error::ValidationError(format!(
				"Type mismatch for setting '{}': expected {}, got {}",
				key,
				default.type_name(),
				value.type_name()
			)));
		}

		if let Some(validator) = &def.validator {
			validator(&value)?;
		}

		let json_value = serde_json::to_value(&value)?;
		self.meta.update_setting(key, Some(json_value)).await?;
		self.cache.invalidate(key);

		info!(key = %key, "Setting updated");
		Ok(Setting { key: key.to_string(), value, updated_at: Timestamp::now() })
	}

	/// Removes a stored value, reads fall back to the default
	pub async fn delete(&self, key: &str, is_admin: bool) -> ClResult<()> {
		let def = self
			.registry
			.get(key)
			.ok_or_else(|| Error::ValidationError(format!("Unknown setting: {}", key)))?;
		if !def.permission.check(is_admin) {
			return Err(Error::PermissionDenied);
		}

		self.meta.update_setting(key, None).await?;
		self.cache.invalidate(key);
		info!(key = %key, "Setting deleted");
		Ok(())
	}

	/// Checks that every required setting (no default, not optional) is stored
	pub async fn validate_required_settings(&self) -> ClResult<()> {
		for def in self.registry.list() {
			if def.optional || def.default.is_some() {
				continue;
			}
			if self.meta.read_setting(&def.key).await?.is_none() {
				return Err(Error::ConfigError(format!(
					"Required setting '{}' is not configured",
					def.key
				)));
			}
		}
		Ok(())
	}

	pub async fn get_string(&self, key: &str) -> ClResult<String> {
		match self.get(key).await? {
			SettingValue::String(s) => Ok(s),
			v => Err(type_error(key, "a string", &v)),
		}
	}

	pub async fn get_int(&self, key: &str) -> ClResult<i64> {
		match self.get(key).await? {
			SettingValue::Int(i) => Ok(i),
			v => Err(type_error(key, "an integer", &v)),
		}
	}

	pub async fn get_bool(&self, key: &str) -> ClResult<bool> {
		match self.get(key).await? {
			SettingValue::Bool(b) => Ok(b),
			v => Err(type_error(key, "a boolean", &v)),
		}
	}

	/// Like `get_string`, but `None` if the setting is not configured
	pub async fn get_string_opt(&self, key: &str) -> ClResult<Option<String>> {
		match self.get(key).await {
			Ok(SettingValue::String(s)) => Ok(Some(s)),
			Ok(v) => Err(type_error(key, "a string", &v)),
			Err(Error::NotFound) => Ok(None),
			Err(e) => Err(e),
		}
	}

	pub async fn get_int_opt(&self, key: &str) -> ClResult<Option<i64>> {
		match self.get(key).await {
			Ok(SettingValue::Int(i)) => Ok(Some(i)),
			Ok(v) => Err(type_error(key, "an integer", &v)),
			Err(Error::NotFound) => Ok(None),
			Err(e) => Err(e),
		}
	}

	pub fn registry(&self) -> &Arc<FrozenSettingsRegistry> {
		&self.registry
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_cache_invalidate() {
		let cache = SettingsCache::new(2);
		cache.put("a.x", SettingValue::Int(1));
		cache.put("a.y", SettingValue::Int(2));
		assert_eq!(cache.get("a.x"), Some(SettingValue::Int(1)));

		cache.invalidate("a.x");
		assert_eq!(cache.get("a.x"), None);
		assert_eq!(cache.get("a.y"), Some(SettingValue::Int(2)));
	}

	#[test]
	fn test_cache_evicts_least_recent() {
		let cache = SettingsCache::new(2);
		cache.put("a.x", SettingValue::Int(1));
		cache.put("a.y", SettingValue::Int(2));
		cache.get("a.x");
		cache.put("a.z", SettingValue::Int(3));
		assert!(cache.get("a.y").is_none());
		assert!(cache.get("a.x").is_some());
	}

	#[test]
	fn test_zero_capacity_falls_back() {
		let cache = SettingsCache::new(0);
		cache.put("a.x", SettingValue::Bool(true));
		assert_eq!(cache.get("a.x"), Some(SettingValue::Bool(true)));
	}
}

// vim: ts=4
