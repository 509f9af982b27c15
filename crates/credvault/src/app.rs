//! App builder - constructs and runs the credvault application

use axum::Router;
use std::{path::PathBuf, sync::Arc};

use crate::prelude::*;
use crate::settings::SettingsRegistry;
use crate::settings::service::SettingsService;
use crate::{routes, webserver};
pub use credvault_core::app::{Adapters, App, AppBuilderOpts, AppState, VERSION};
use credvault_core::extensions::Extensions;
use credvault_core::{request, tmp_dir};
use credvault_types::directory_adapter::DirectoryAdapter;
use credvault_types::meta_adapter::MetaAdapter;

const SETTINGS_CACHE_SIZE: usize = 200;

pub struct AppBuilder {
	opts: AppBuilderOpts,
	adapters: Adapters,
}

impl AppBuilder {
	pub fn new() -> Self {
		// A subscriber may already be installed (tests, embedding applications)
		let _ = tracing_subscriber::fmt()
			.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
			.with_target(false)
			.try_init();
		AppBuilder {
			opts: AppBuilderOpts {
				listen: "127.0.0.1:8080".into(),
				dist_dir: PathBuf::from("./dist").into(),
				tmp_dir: PathBuf::from("./data/tmp").into(),
				lock_file: PathBuf::from("./data/.lock").into(),
				admin_logins: Box::new([]),
				disable_cache: false,
			},
			adapters: Adapters { meta_adapter: None, directory_adapter: None },
		}
	}

	// Opts
	pub fn listen(&mut self, listen: impl Into<Box<str>>) -> &mut Self {
		self.opts.listen = listen.into();
		self
	}
	pub fn dist_dir(&mut self, dist_dir: impl Into<Box<std::path::Path>>) -> &mut Self {
		self.opts.dist_dir = dist_dir.into();
		self
	}
	pub fn tmp_dir(&mut self, tmp_dir: impl Into<Box<std::path::Path>>) -> &mut Self {
		self.opts.tmp_dir = tmp_dir.into();
		self
	}
	pub fn lock_file(&mut self, lock_file: impl Into<Box<std::path::Path>>) -> &mut Self {
		self.opts.lock_file = lock_file.into();
		self
	}
	pub fn admin_logins(
		&mut self,
		admin_logins: impl IntoIterator<Item = impl Into<Box<str>>>,
	) -> &mut Self {
		self.opts.admin_logins = admin_logins.into_iter().map(Into::into).collect();
		self
	}
	pub fn disable_cache(&mut self, disable: bool) -> &mut Self {
		self.opts.disable_cache = disable;
		self
	}

	// Adapters
	pub fn meta_adapter(&mut self, meta_adapter: Arc<dyn MetaAdapter>) -> &mut Self {
		self.adapters.meta_adapter = Some(meta_adapter);
		self
	}
	pub fn directory_adapter(&mut self, directory_adapter: Arc<dyn DirectoryAdapter>) -> &mut Self {
		self.adapters.directory_adapter = Some(directory_adapter);
		self
	}

	/// Builds the application state and its router without serving it
	pub async fn build(self) -> ClResult<(App, Router)> {
		let Some(meta_adapter) = self.adapters.meta_adapter else {
			error!("FATAL: No meta adapter configured");
			return Err(Error::Internal("No meta adapter configured".to_string()));
		};
		let Some(directory_adapter) = self.adapters.directory_adapter else {
			error!("FATAL: No directory adapter configured");
			return Err(Error::Internal("No directory adapter configured".to_string()));
		};

		// Initialize settings registry and service
		let mut settings_registry = SettingsRegistry::new();

		// Register settings from all modules
		credvault_core::register_settings(&mut settings_registry)?;
		credvault_auth::register_settings(&mut settings_registry)?;
		credvault_import::register_settings(&mut settings_registry)?;

		info!("Registered {} settings", settings_registry.len());

		let frozen_registry = Arc::new(settings_registry.freeze());
		let settings_service = Arc::new(SettingsService::new(
			frozen_registry.clone(),
			meta_adapter.clone(),
			SETTINGS_CACHE_SIZE,
		));
		settings_service.validate_required_settings().await?;
		info!("Settings subsystem initialized and validated");

		// Build extensions map for feature-specific state
		let mut extensions = Extensions::new();
		extensions.insert(credvault_auth::token::TokenKey::load_or_create(meta_adapter.as_ref()).await?);

		let mut opts = self.opts;
		match tmp_dir::find_tmp_dir(&opts.tmp_dir).await {
			Some(dir) => opts.tmp_dir = dir.into(),
			None => {
				error!("FATAL: No usable temporary directory");
				return Err(Error::ConfigError("no usable temporary directory".into()));
			}
		}
		info!("Using temporary directory {}", opts.tmp_dir.display());

		let app: App = Arc::new(AppState {
			opts,
			request: request::Request::new(),

			meta_adapter,
			directory_adapter,

			// Settings
			settings: settings_service,
			settings_registry: frozen_registry,

			// Extensions
			extensions,
		});

		let router = routes::init(app.clone());
		Ok((app, router))
	}

	pub async fn run(self) -> ClResult<()> {
		info!("                    _                 _ _");
		info!("  ___ _ __ ___  __| |_   ____ _ _   _| | |_");
		info!(" / __| '__/ _ \\/ _` \\ \\ / / _` | | | | | __|");
		info!("| (__| | |  __/ (_| |\\ V / (_| | |_| | | |_");
		info!(" \\___|_|  \\___|\\__,_| \\_/ \\__,_|\\__,_|_|\\__|");
		info!("V{}", VERSION);
		info!("");

		let (app, router) = self.build().await?;
		webserver::serve(&app.opts.listen, router).await
	}
}

impl Default for AppBuilder {
	fn default() -> Self {
		Self::new()
	}
}

// vim: ts=4
