//! Login handlers

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use credvault_core::{Auth, AuthCtx};
use credvault_types::meta_adapter::{NewUser, User};
use credvault_types::types::ApiResponse;

use crate::ldap::{LdapAuthData, LdapParams, LdapStd};
use crate::prelude::*;
use crate::token::TokenKey;

#[derive(Deserialize)]
pub struct LoginReq {
	login: String,
	password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRes {
	pub token: Box<str>,
	pub login: Box<str>,
	pub name: Box<str>,
	pub is_admin: bool,
}

/// Local user for a directory login, created on the first successful login
async fn ensure_user(app: &App, login: &str, data: &LdapAuthData) -> ClResult<User> {
	match app.meta_adapter.read_user_by_login(login).await {
		Ok(user) => return Ok(user),
		Err(Error::NotFound) => {}
		Err(err) => return Err(err),
	}

	let profile_id = app.settings.get_int_opt("ldap.default_profile").await?;
	let group_id = app.settings.get_int_opt("ldap.default_group").await?;
	let new_user = NewUser {
		login,
		name: &data.user.name,
		email: data.user.email.as_deref(),
		profile_id,
		group_id,
		is_admin: app.opts.is_admin_login(login),
		is_ldap: true,
	};
	app.meta_adapter.create_user(&new_user).await?;
	info!(login = %login, dn = %data.user.dn, "Provisioned LDAP user");

	app.meta_adapter.read_user_by_login(login).await
}

/// POST /api/auth/login
pub async fn post_login(
	State(app): State<App>,
	Json(req): Json<LoginReq>,
) -> ClResult<(StatusCode, Json<ApiResponse<LoginRes>>)> {
	let login = req.login.trim();
	if login.is_empty() {
		return Err(Error::ValidationError("login is required".into()));
	}

	let params = LdapParams::from_settings(&app.settings).await?;
	let ldap = LdapStd::new(params, app.directory_adapter.clone());
	let data = ldap.authenticate(login, &req.password).await?;
	if !data.in_group {
		warn!(login = %login, "Login refused, user not in group");
		return Err(Error::PermissionDenied);
	}

	let user = ensure_user(&app, login, &data).await?;
	let auth = AuthCtx {
		is_admin: user.is_admin || app.opts.is_admin_login(&user.login),
		login: user.login,
		user_id: user.id,
		group_id: user.group_id,
		name: user.name,
	};
	let expiry = app.settings.get_int("auth.token_expiry").await?;
	let token = app.ext::<TokenKey>()?.generate(&auth, expiry)?;
	info!(login = %auth.login, "User logged in");

	let res = LoginRes { token, login: auth.login, name: auth.name, is_admin: auth.is_admin };
	Ok((StatusCode::OK, Json(ApiResponse::new(res))))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
	pub login: Box<str>,
	pub name: Box<str>,
	pub user_id: ItemId,
	pub group_id: Option<ItemId>,
	pub is_admin: bool,
}

/// GET /api/auth/me
pub async fn get_session(Auth(auth): Auth) -> ClResult<Json<ApiResponse<SessionInfo>>> {
	Ok(Json(ApiResponse::new(SessionInfo {
		login: auth.login,
		name: auth.name,
		user_id: auth.user_id,
		group_id: auth.group_id,
		is_admin: auth.is_admin,
	})))
}

// vim: ts=4
