use axum::{
	Router,
	extract::DefaultBodyLimit,
	http::{HeaderValue, header},
	middleware,
	routing::{get, post},
};
use tower_http::{
	compression::CompressionLayer,
	services::{ServeDir, ServeFile},
	set_header::SetResponseHeaderLayer,
	trace::TraceLayer,
};

use credvault_auth::middleware::{optional_auth, require_auth};

use crate::prelude::*;
use crate::{auth, grid, handler, import, profile};

fn init_api(app: &App) -> Router<App> {
	let protected_router = Router::new()
		// Session
		.route("/api/auth/me", get(auth::handler::get_session))
		// Profiles
		.route(
			"/api/profile",
			get(profile::handler::list_profiles).post(profile::handler::post_profile),
		)
		.route("/api/profile/delete", post(profile::handler::post_delete_profiles))
		.route(
			"/api/profile/{id}",
			get(profile::handler::get_profile)
				.patch(profile::handler::patch_profile)
				.delete(profile::handler::delete_profile),
		)
		// User groups
		.route("/api/group", post(grid::handler::post_group))
		.route("/api/group/grid", get(grid::handler::get_group_grid))
		.route(
			"/api/group/{id}",
			get(grid::handler::get_group)
				.patch(grid::handler::patch_group)
				.delete(grid::handler::delete_group),
		)
		// Import
		// Upload sizes are enforced per file by the import handler
		.route(
			"/api/import/csv",
			post(import::handler::post_import_csv).layer(DefaultBodyLimit::disable()),
		)
		.route("/api/account", get(import::handler::list_accounts))
		// Utilities
		.route("/api/password/random", get(handler::get_random_password))
		.route("/api/app-info/updates", get(handler::get_updates))
		.route(
			"/api/admin/lock",
			get(handler::get_lock).post(handler::post_lock).delete(handler::delete_lock),
		)
		// Settings
		.route("/api/settings", get(handler::list_settings))
		.route(
			"/api/settings/{key}",
			get(handler::get_setting).put(handler::put_setting).delete(handler::delete_setting),
		)
		.layer(middleware::from_fn_with_state(app.clone(), require_auth));

	let public_router = Router::new()
		.route("/api/auth/login", post(auth::handler::post_login))
		.route("/api/app-info", get(handler::get_app_info))
		.route_layer(middleware::from_fn_with_state(app.clone(), optional_auth));

	Router::new().merge(public_router).merge(protected_router)
}

fn init_static(app: &App) -> Router {
	let index = app.opts.dist_dir.join("index.html");
	let serve_dir = ServeDir::new(&*app.opts.dist_dir).fallback(ServeFile::new(index));

	let cache_control = if app.opts.disable_cache {
		HeaderValue::from_static("no-store")
	} else {
		HeaderValue::from_static("public, max-age=3600")
	};
	Router::new()
		.fallback_service(serve_dir)
		.layer(SetResponseHeaderLayer::if_not_present(header::CACHE_CONTROL, cache_control))
}

pub fn init(app: App) -> Router {
	init_api(&app)
		.with_state(app.clone())
		.merge(init_static(&app))
		.layer(CompressionLayer::new())
		.layer(TraceLayer::new_for_http())
}

// vim: ts=4
