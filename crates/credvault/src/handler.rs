//! Application level handlers: maintenance lock, password generator,
//! settings and application information

use axum::{
	Json,
	extract::{Path, Query, State},
	http::StatusCode,
};
use serde::{Deserialize, Serialize};

use credvault_core::app_info::{AppInfo, app_info};
use credvault_core::lock::{AppLock, get_app_lock, lock_app, unlock_app};
use credvault_core::password::{PasswordOptions, generate_password};
use credvault_core::request::{FetchOptions, ProxyConfig};
use credvault_core::settings::{PermissionLevel, SettingDefinition, SettingScope, SettingValue};
use credvault_core::{Admin, Auth, OptionalAuth};
use credvault_types::types::ApiResponse;
use credvault_types::utils::boolval;

use crate::prelude::*;

// Lock //
//******//
/// GET /api/admin/lock
pub async fn get_lock(
	State(app): State<App>,
	Auth(_auth): Auth,
) -> ClResult<(StatusCode, Json<ApiResponse<Option<AppLock>>>)> {
	let lock = get_app_lock(&app.opts.lock_file).await;
	Ok((StatusCode::OK, Json(ApiResponse::new(lock))))
}

#[derive(Debug, Deserialize)]
pub struct LockReq {
	pub subject: String,
}

/// POST /api/admin/lock
pub async fn post_lock(
	State(app): State<App>,
	Admin(auth): Admin,
	Json(req): Json<LockReq>,
) -> ClResult<(StatusCode, Json<ApiResponse<AppLock>>)> {
	let subject = req.subject.trim();
	if subject.is_empty() {
		return Err(Error::ValidationError("lock subject is required".into()));
	}
	if let Some(lock) = get_app_lock(&app.opts.lock_file).await
		&& lock.user_id != auth.user_id
	{
		return Err(Error::Conflict(format!("application already locked: {}", lock.subject)));
	}

	let lock = lock_app(&app.opts.lock_file, auth.user_id, subject).await?;
	Ok((StatusCode::CREATED, Json(ApiResponse::new(lock))))
}

#[derive(Debug, Serialize)]
pub struct UnlockRes {
	pub unlocked: bool,
}

/// DELETE /api/admin/lock
pub async fn delete_lock(
	State(app): State<App>,
	Admin(auth): Admin,
) -> ClResult<(StatusCode, Json<ApiResponse<UnlockRes>>)> {
	let unlocked = unlock_app(&app.opts.lock_file).await?;
	if unlocked {
		info!(login = %auth.login, "Lock removed");
	}
	Ok((StatusCode::OK, Json(ApiResponse::new(UnlockRes { unlocked }))))
}

// Password //
//**********//
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RandomPasswordQuery {
	pub length: Option<usize>,
	pub lower: Option<String>,
	pub upper: Option<String>,
	pub numbers: Option<String>,
	pub special: Option<String>,
	pub check_strength: Option<String>,
}

fn flag(name: &str, value: Option<&str>, default: bool) -> ClResult<bool> {
	match value {
		None => Ok(default),
		Some(value) => boolval(value, true)
			.ok_or_else(|| Error::ValidationError(format!("invalid value for {}", name))),
	}
}

impl RandomPasswordQuery {
	/// Overrides the configured defaults with the given query parameters
	fn apply(&self, defaults: PasswordOptions) -> ClResult<PasswordOptions> {
		Ok(PasswordOptions {
			length: self.length.unwrap_or(defaults.length),
			lower: flag("lower", self.lower.as_deref(), defaults.lower)?,
			upper: flag("upper", self.upper.as_deref(), defaults.upper)?,
			numbers: flag("numbers", self.numbers.as_deref(), defaults.numbers)?,
			special: flag("special", self.special.as_deref(), defaults.special)?,
			check_strength: flag(
				"checkStrength",
				self.check_strength.as_deref(),
				defaults.check_strength,
			)?,
		})
	}
}

#[derive(Debug, Serialize)]
pub struct RandomPasswordRes {
	pub password: String,
}

/// GET /api/password/random
pub async fn get_random_password(
	State(app): State<App>,
	Auth(_auth): Auth,
	Query(query): Query<RandomPasswordQuery>,
) -> ClResult<(StatusCode, Json<ApiResponse<RandomPasswordRes>>)> {
	let opts = query.apply(PasswordOptions::from_settings(&app.settings).await?)?;
	let password = generate_password(&opts)?;
	Ok((StatusCode::OK, Json(ApiResponse::new(RandomPasswordRes { password }))))
}

// Settings //
//**********//
#[derive(Debug, Serialize)]
pub struct SettingResponse {
	pub key: String,
	pub value: SettingValue,
	pub scope: SettingScope,
	pub permission: PermissionLevel,
	pub description: String,
}

fn setting_response(def: &SettingDefinition, value: SettingValue) -> SettingResponse {
	SettingResponse {
		key: def.key.clone(),
		value,
		scope: def.scope,
		permission: def.permission,
		description: def.description.clone(),
	}
}

#[derive(Debug, Default, Deserialize)]
pub struct ListSettingsQuery {
	#[serde(default)]
	pub prefix: String,
}

/// GET /api/settings[?prefix]
///
/// Settings hold the directory bind settings and proxy credentials, so only
/// admins may read them.
pub async fn list_settings(
	State(app): State<App>,
	Admin(_auth): Admin,
	Query(query): Query<ListSettingsQuery>,
) -> ClResult<(StatusCode, Json<ApiResponse<Vec<SettingResponse>>>)> {
	let mut defs: Vec<&SettingDefinition> =
		app.settings_registry.list_by_prefix(&query.prefix).collect();
	defs.sort_by(|a, b| a.key.cmp(&b.key));

	let mut res = Vec::with_capacity(defs.len());
	for def in defs {
		match app.settings.get(&def.key).await {
			Ok(value) => res.push(setting_response(def, value)),
			Err(Error::NotFound) => {}
			Err(err) => return Err(err),
		}
	}

	let total = res.len() as u64;
	let count = res.len();
	Ok((StatusCode::OK, Json(ApiResponse::with_pagination(res, 0, count, total))))
}

/// GET /api/settings/{key}
pub async fn get_setting(
	State(app): State<App>,
	Admin(_auth): Admin,
	Path(key): Path<String>,
) -> ClResult<(StatusCode, Json<ApiResponse<SettingResponse>>)> {
	let def = app.settings_registry.get(&key).ok_or(Error::NotFound)?;
	let value = app.settings.get(&key).await?;
	Ok((StatusCode::OK, Json(ApiResponse::new(setting_response(def, value)))))
}

#[derive(Debug, Deserialize)]
pub struct UpdateSettingReq {
	pub value: SettingValue,
}

/// PUT /api/settings/{key}
pub async fn put_setting(
	State(app): State<App>,
	Auth(auth): Auth,
	Path(key): Path<String>,
	Json(req): Json<UpdateSettingReq>,
) -> ClResult<(StatusCode, Json<ApiResponse<SettingResponse>>)> {
	let def = app.settings_registry.get(&key).ok_or(Error::NotFound)?;
	let setting = app.settings.set(&key, req.value, auth.is_admin).await?;
	info!(login = %auth.login, key = %key, "Setting changed");

	Ok((StatusCode::OK, Json(ApiResponse::new(setting_response(def, setting.value)))))
}

/// DELETE /api/settings/{key}
pub async fn delete_setting(
	State(app): State<App>,
	Auth(auth): Auth,
	Path(key): Path<String>,
) -> ClResult<StatusCode> {
	if app.settings_registry.get(&key).is_none() {
		return Err(Error::NotFound);
	}
	app.settings.delete(&key, auth.is_admin).await?;
	Ok(StatusCode::NO_CONTENT)
}

// App info //
//**********//
#[derive(Debug, Serialize)]
pub struct AppInfoRes {
	#[serde(flatten)]
	pub info: AppInfo,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub lock: Option<AppLock>,
}

/// GET /api/app-info
///
/// The lock state is only reported to signed in users.
pub async fn get_app_info(
	State(app): State<App>,
	OptionalAuth(auth): OptionalAuth,
) -> ClResult<(StatusCode, Json<ApiResponse<AppInfoRes>>)> {
	let lock = match auth {
		Some(_) => get_app_lock(&app.opts.lock_file).await,
		None => None,
	};
	Ok((StatusCode::OK, Json(ApiResponse::new(AppInfoRes { info: app_info(), lock }))))
}

#[derive(Debug, Deserialize)]
struct Release {
	tag_name: String,
	html_url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInfo {
	pub current: &'static str,
	pub latest: String,
	pub url: Option<String>,
	pub update_available: bool,
}

fn version_parts(version: &str) -> Vec<u64> {
	version
		.trim()
		.trim_start_matches(['v', 'V'])
		.split(['.', '-', '+'])
		.map_while(|part| part.parse().ok())
		.collect()
}

/// Compares dotted version numbers, ignoring a leading `v` and any suffix.
/// Missing components count as zero, so `1.0` and `1.0.0` are equal.
pub fn is_newer(latest: &str, current: &str) -> bool {
	let mut latest = version_parts(latest);
	let mut current = version_parts(current);
	let len = latest.len().max(current.len());
	latest.resize(len, 0);
	current.resize(len, 0);
	latest > current
}

/// GET /api/app-info/updates
pub async fn get_updates(
	State(app): State<App>,
	Auth(auth): Auth,
) -> ClResult<(StatusCode, Json<ApiResponse<UpdateInfo>>)> {
	let info = app_info();
	let opts = FetchOptions {
		proxy: ProxyConfig::from_settings(&app.settings).await?,
		..Default::default()
	};
	let body = app.request.fetch(info.updates, opts).await?;
	let release: Release = serde_json::from_str(&body)?;
	debug!(login = %auth.login, latest = %release.tag_name, "Checked for updates");

	let res = UpdateInfo {
		current: info.version,
		update_available: is_newer(&release.tag_name, info.version),
		latest: release.tag_name,
		url: release.html_url,
	};
	Ok((StatusCode::OK, Json(ApiResponse::new(res))))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_is_newer() {
		assert!(is_newer("v0.4.0", "0.3.1"));
		assert!(is_newer("0.3.10", "0.3.9"));
		assert!(is_newer("1.0", "0.9.9"));
		assert!(!is_newer("v0.3.1", "0.3.1"));
		assert!(!is_newer("0.3.0", "0.3.1"));
		assert!(!is_newer("garbage", "0.3.1"));
		assert!(!is_newer("1.0.0", "1.0"));
		assert!(!is_newer("1.0", "1.0.0"));
		assert!(is_newer("1.0.1", "1.0"));
		assert!(!is_newer("1.0", "1.0.1"));
	}

	#[test]
	fn test_password_query_overrides() {
		let query: RandomPasswordQuery =
			serde_urlencoded::from_str("length=8&special=no&checkStrength=off").unwrap();
		let opts = query.apply(PasswordOptions::default()).unwrap();
		assert_eq!(opts.length, 8);
		assert!(!opts.special);
		assert!(!opts.check_strength);
		assert!(opts.numbers);
		assert!(opts.lower);

		let query: RandomPasswordQuery = serde_urlencoded::from_str("numbers=maybe").unwrap();
		assert!(matches!(query.apply(PasswordOptions::default()), Err(Error::ValidationError(_))));
	}
}

// vim: ts=4
