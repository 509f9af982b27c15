//! Settings types and definitions
//!
//! A setting is declared once by the crate that owns it, with a scope (where
//! the value lives) and a permission level (who may change it).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Debug;

use crate::prelude::*;

pub type SettingValidator = Box<dyn Fn(&SettingValue) -> ClResult<()> + Send + Sync>;

/// Setting scope defines where a setting value applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SettingScope {
	/// Only the default value, cannot be changed at runtime
	#[serde(rename = "system")]
	System,
	/// Instance-wide value stored in the database
	#[serde(rename = "global")]
	Global,
}

/// Setting permission level defines who can modify a setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PermissionLevel {
	/// Read-only at runtime
	#[serde(rename = "system")]
	System,
	/// Only application administrators
	#[serde(rename = "admin")]
	Admin,
}

impl PermissionLevel {
	pub fn check(&self, is_admin: bool) -> bool {
		match self {
			PermissionLevel::System => false,
			PermissionLevel::Admin => is_admin,
		}
	}
}

/// Setting value types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
	Bool(bool), // must come before Int
	Int(i64),
	String(String),
	Json(serde_json::Value),
}

impl SettingValue {
	pub fn matches_type(&self, other: &SettingValue) -> bool {
		matches!(
			(self, other),
			(SettingValue::String(_), SettingValue::String(_))
				| (SettingValue::Int(_), SettingValue::Int(_))
				| (SettingValue::Bool(_), SettingValue::Bool(_))
				| (SettingValue::Json(_), SettingValue::Json(_))
		)
	}

	pub fn type_name(&self) -> &'static str {
		match self {
			SettingValue::String(_) => "string",
			SettingValue::Int(_) => "int",
			SettingValue::Bool(_) => "bool",
			SettingValue::Json(_) => "json",
		}
	}
}

pub struct SettingDefinition {
	/// Dot-separated key (e.g., "password.length")
	pub key: String,
	pub description: String,
	/// If None and optional=false, the setting MUST be configured
	pub default: Option<SettingValue>,
	pub scope: SettingScope,
	pub permission: PermissionLevel,
	pub optional: bool,
	pub validator: Option<SettingValidator>,
}

impl Debug for SettingDefinition {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SettingDefinition")
			.field("key", &self.key)
			.field("description", &self.description)
			.field("default", &self.default)
			.field("scope", &self.scope)
			.field("permission", &self.permission)
			.field("optional", &self.optional)
			.field("validator", &self.validator.is_some())
			.finish()
	}
}

impl SettingDefinition {
	pub fn builder(key: impl Into<String>) -> SettingDefinitionBuilder {
		SettingDefinitionBuilder::new(key)
	}
}

/// Builder for SettingDefinition
pub struct SettingDefinitionBuilder {
	key: String,
	description: Option<String>,
	default: Option<SettingValue>,
	scope: SettingScope,
	permission: PermissionLevel,
	optional: bool,
	validator: Option<SettingValidator>,
}

impl SettingDefinitionBuilder {
	pub fn new(key: impl Into<String>) -> Self {
		Self {
			key: key.into(),
			description: None,
			default: None,
			scope: SettingScope::Global,
			permission: PermissionLevel::Admin,
			optional: false,
			validator: None,
		}
	}

	pub fn description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());
		self
	}

	pub fn default(mut self, value: SettingValue) -> Self {
		self.default = Some(value);
		self
	}

	pub fn scope(mut self, scope: SettingScope) -> Self {
		self.scope = scope;
		self
	}

	pub fn permission(mut self, permission: PermissionLevel) -> Self {
		self.permission = permission;
		self
	}

	/// Mark this setting as optional (can be unconfigured)
	pub fn optional(mut self, optional: bool) -> Self {
		self.optional = optional;
		self
	}

	pub fn validator<F>(mut self, f: F) -> Self
	where
		F: Fn(&SettingValue) -> ClResult<()> + Send + Sync + 'static,
	{
		self.validator = Some(Box::new(f));
		self
	}

	pub fn build(self) -> ClResult<SettingDefinition> {
		let description = self
			.description
			.ok_or_else(|| Error::ConfigError("Setting description is required".into()))?;

		if self.scope == SettingScope::System && self.permission != PermissionLevel::System {
			return Err(Error::ConfigError(format!(
				"System scope setting '{}' must have System permission",
				self.key
			)));
		}
		if let (Some(default), Some(validator)) = (&self.default, &self.validator) {
			validator(default).map_err(|e| {
				Error::ConfigError(format!("Default of '{}' fails validation: {}", self.key, e))
			})?;
		}

		Ok(SettingDefinition {
			key: self.key,
			description,
			default: self.default,
			scope: self.scope,
			permission: self.permission,
			optional: self.optional,
			validator: self.validator,
		})
	}
}

/// Resolved setting as returned to API clients
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Setting {
	pub key: String,
	pub value: SettingValue,
	pub updated_at: Timestamp,
}

/// Mutable registry used during app initialization
#[derive(Default)]
pub struct SettingsRegistry {
	definitions: HashMap<String, SettingDefinition>,
}

impl SettingsRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn register(&mut self, def: SettingDefinition) -> ClResult<()> {
		if self.definitions.contains_key(&def.key) {
			return Err(Error::ConfigError(format!("Setting '{}' is already registered", def.key)));
		}

		debug!("Registering setting: {}", def.key);
		self.definitions.insert(def.key.clone(), def);
		Ok(())
	}

	pub fn freeze(self) -> FrozenSettingsRegistry {
		info!("Freezing settings registry with {} definitions", self.definitions.len());
		FrozenSettingsRegistry { definitions: self.definitions }
	}

	pub fn len(&self) -> usize {
		self.definitions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.definitions.is_empty()
	}
}

/// Immutable registry stored in AppState
pub struct FrozenSettingsRegistry {
	definitions: HashMap<String, SettingDefinition>,
}

impl FrozenSettingsRegistry {
	pub fn get(&self, key: &str) -> Option<&SettingDefinition> {
		self.definitions.get(key)
	}

	pub fn list(&self) -> impl Iterator<Item = &SettingDefinition> {
		self.definitions.values()
	}

	pub fn list_by_prefix<'a>(
		&'a self,
		prefix: &'a str,
	) -> impl Iterator<Item = &'a SettingDefinition> + 'a {
		self.definitions.values().filter(move |def| def.key.starts_with(prefix))
	}

	pub fn len(&self) -> usize {
		self.definitions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.definitions.is_empty()
	}
}


// vim: ts=4
