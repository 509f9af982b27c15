//! Import settings registration

use credvault_core::settings::{SettingDefinition, SettingValue, SettingsRegistry};

use crate::csv_import::parse_delimiter;
use crate::prelude::*;

pub fn register_settings(registry: &mut SettingsRegistry) -> ClResult<()> {
	registry.register(
		SettingDefinition::builder("import.csv_delimiter")
			.description("Field delimiter of imported CSV files")
			.default(SettingValue::String(";".into()))
			.validator(|v| match v {
				SettingValue::String(s) => parse_delimiter(s).map(|_| ()),
				_ => Err(Error::ValidationError("delimiter must be a string".into())),
			})
			.build()?,
	)?;

	Ok(())
}


// vim: ts=4
