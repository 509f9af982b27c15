//! Utility functions

/// Interprets a textual flag the way form fields and config files spell them.
///
/// `false`, `no`, `n`, `0`, `off` and the empty string are false. In strict
/// mode only `true`, `yes`, `y`, `1` and `on` are true and anything else
/// yields `None`; otherwise every other value counts as true.
pub fn boolval(value: &str, strict: bool) -> Option<bool> {
	let value = value.trim().to_ascii_lowercase();
	match value.as_str() {
		"" | "false" | "no" | "n" | "0" | "off" => Some(false),
		"true" | "yes" | "y" | "1" | "on" => Some(true),
		_ if strict => None,
		_ => Some(true),
	}
}

/// Splits a comma separated list, dropping empty items
pub fn split_list(value: &str) -> Vec<&str> {
	value.split(',').map(str::trim).filter(|s| !s.is_empty()).collect()
}


// vim: ts=4
