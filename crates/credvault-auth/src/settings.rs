//! Authentication settings registration

use credvault_core::settings::{SettingDefinition, SettingValue, SettingsRegistry};

use crate::prelude::*;

fn optional_id(value: &SettingValue) -> ClResult<()> {
	match value {
		SettingValue::Int(i) if *i > 0 => Ok(()),
		_ => Err(Error::ValidationError("value must be a record id".into())),
	}
}

pub fn register_settings(registry: &mut SettingsRegistry) -> ClResult<()> {
	registry.register(
		SettingDefinition::builder("ldap.base_dn")
			.description("Search base of the LDAP directory")
			.default(SettingValue::String(String::new()))
			.build()?,
	)?;

	// Empty disables the group check, "*" accepts any group
	registry.register(
		SettingDefinition::builder("ldap.group")
			.description("Group (name or DN) whose members may log in")
			.default(SettingValue::String(String::new()))
			.build()?,
	)?;

	registry.register(
		SettingDefinition::builder("ldap.default_profile")
			.description("Profile id given to users created on their first login")
			.optional(true)
			.validator(optional_id)
			.build()?,
	)?;
	registry.register(
		SettingDefinition::builder("ldap.default_group")
			.description("User group id given to users created on their first login")
			.optional(true)
			.validator(optional_id)
			.build()?,
	)?;

	registry.register(
		SettingDefinition::builder("auth.token_expiry")
			.description("Access token lifetime in hours")
			.default(SettingValue::Int(8))
			.validator(|v| match v {
				SettingValue::Int(h) if (1..=720).contains(h) => Ok(()),
				_ => Err(Error::ValidationError("token expiry must be 1..720 hours".into())),
			})
			.build()?,
	)?;

	Ok(())
}

// vim: ts=4
