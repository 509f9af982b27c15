//! App state type

use std::{path::Path, sync::Arc};

use crate::extensions::Extensions;
use crate::prelude::*;
use crate::request;
use crate::settings::service::SettingsService;
use crate::settings::types::FrozenSettingsRegistry;

use credvault_types::directory_adapter::DirectoryAdapter;
use credvault_types::meta_adapter::MetaAdapter;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub struct AppState {
	pub opts: AppBuilderOpts,
	pub request: request::Request,

	pub meta_adapter: Arc<dyn MetaAdapter>,
	pub directory_adapter: Arc<dyn DirectoryAdapter>,

	// Settings subsystem
	pub settings: Arc<SettingsService>,
	pub settings_registry: Arc<FrozenSettingsRegistry>,

	// Type-erased extension map for feature-specific state
	pub extensions: Extensions,
}

impl AppState {
	/// Get a registered extension by type. Returns error if not found.
	pub fn ext<T: Send + Sync + 'static>(&self) -> ClResult<&T> {
		self.extensions.get::<T>().ok_or_else(|| {
			Error::Internal(format!("Extension {} not registered", std::any::type_name::<T>()))
		})
	}
}

pub type App = Arc<AppState>;

impl AppBuilderOpts {
	pub fn is_admin_login(&self, login: &str) -> bool {
		self.admin_logins.iter().any(|admin| admin.eq_ignore_ascii_case(login))
	}
}

pub struct Adapters {
	pub meta_adapter: Option<Arc<dyn MetaAdapter>>,
	pub directory_adapter: Option<Arc<dyn DirectoryAdapter>>,
}

#[derive(Debug)]
pub struct AppBuilderOpts {
	pub listen: Box<str>,
	pub dist_dir: Box<Path>,
	pub tmp_dir: Box<Path>,
	/// File whose presence locks the application for maintenance
	pub lock_file: Box<Path>,
	/// Logins that are granted admin rights when they sign in
	pub admin_logins: Box<[Box<str>]>,
	/// Disable HTTP caching (for development)
	pub disable_cache: bool,
}

// vim: ts=4
