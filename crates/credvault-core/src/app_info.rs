//! Static application information

use serde::Serialize;

use crate::app::VERSION;

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppInfo {
	pub name: &'static str,
	pub description: &'static str,
	pub alias: &'static str,
	pub version: &'static str,
	pub website: &'static str,
	pub docs: &'static str,
	pub updates: &'static str,
	pub help: &'static str,
}

pub fn app_info() -> AppInfo {
	AppInfo {
		name: "credvault",
		description: "Systems Password Manager",
		alias: "CVM",
		version: VERSION,
		website: "https://credvault.dev",
		docs: "https://credvault.dev/docs",
		updates: "https://api.github.com/repos/credvault/credvault/releases/latest",
		help: "https://github.com/credvault/credvault/issues",
	}
}

// vim: ts=4
