//! Core settings registration
//!
//! Password generator defaults, outgoing proxy, upload limits and grid paging.

use crate::prelude::*;
use crate::settings::{PermissionLevel, SettingDefinition, SettingValue, SettingsRegistry};

fn positive_int(value: &SettingValue) -> ClResult<()> {
	match value {
		SettingValue::Int(i) if *i > 0 => Ok(()),
		_ => Err(Error::ValidationError("value must be a positive integer".into())),
	}
}

fn port(value: &SettingValue) -> ClResult<()> {
	match value {
		SettingValue::Int(i) if (1..=65535).contains(i) => Ok(()),
		_ => Err(Error::ValidationError("port must be between 1 and 65535".into())),
	}
}

fn bool_setting(key: &str, description: &str, default: bool) -> ClResult<SettingDefinition> {
	SettingDefinition::builder(key)
		.description(description)
		.default(SettingValue::Bool(default))
		.build()
}

pub fn register_settings(registry: &mut SettingsRegistry) -> ClResult<()> {
	// Password generator
	registry.register(
		SettingDefinition::builder("password.length")
			.description("Length of generated passwords")
			.default(SettingValue::Int(16))
			.permission(PermissionLevel::Admin)
			.validator(|v| match v {
				SettingValue::Int(i) if (4..=1024).contains(i) => Ok(()),
				_ => Err(Error::ValidationError("password length must be 4..1024".into())),
			})
			.build()?,
	)?;
	registry.register(bool_setting(
		"password.numbers",
		"Include digits in generated passwords",
		true,
	)?)?;
	registry.register(bool_setting(
		"password.special",
		"Include symbols in generated passwords",
		true,
	)?)?;
	registry.register(bool_setting(
		"password.check_strength",
		"Generated passwords contain every enabled character class",
		true,
	)?)?;

	// Outgoing HTTP proxy
	registry.register(bool_setting("proxy.enabled", "Use an HTTP proxy for outgoing requests", false)?)?;
	registry.register(
		SettingDefinition::builder("proxy.server")
			.description("Proxy host name")
			.optional(true)
			.build()?,
	)?;
	registry.register(
		SettingDefinition::builder("proxy.port")
			.description("Proxy port")
			.default(SettingValue::Int(8080))
			.validator(port)
			.build()?,
	)?;
	registry.register(
		SettingDefinition::builder("proxy.user")
			.description("Proxy user, empty for no authentication")
			.optional(true)
			.build()?,
	)?;
	registry.register(
		SettingDefinition::builder("proxy.pass")
			.description("Proxy password")
			.optional(true)
			.build()?,
	)?;

	// Uploads
	registry.register(
		SettingDefinition::builder("upload.max_size_kb")
			.description("Maximum size of an uploaded file in kilobytes")
			.default(SettingValue::Int(1024))
			.validator(positive_int)
			.build()?,
	)?;
	registry.register(
		SettingDefinition::builder("upload.max_files")
			.description("Maximum number of files in one upload")
			.default(SettingValue::Int(5))
			.validator(positive_int)
			.build()?,
	)?;
	registry.register(
		SettingDefinition::builder("upload.allowed_exts")
			.description("Comma separated list of accepted file extensions")
			.default(SettingValue::String("CSV".into()))
			.build()?,
	)?;

	// Grids
	registry.register(
		SettingDefinition::builder("grid.page_size")
			.description("Rows per page in data grids")
			.default(SettingValue::Int(50))
			.validator(positive_int)
			.build()?,
	)?;

	Ok(())
}


// vim: ts=4
