//! Custom extractors for credvault-specific data

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::prelude::*;

/// Authenticated user, placed into request extensions by the auth middleware
#[derive(Debug, Clone)]
pub struct AuthCtx {
	pub login: Box<str>,
	pub user_id: ItemId,
	pub group_id: Option<ItemId>,
	pub name: Box<str>,
	pub is_admin: bool,
}

// Auth //
//******//
#[derive(Debug, Clone)]
pub struct Auth(pub AuthCtx);

impl<S> FromRequestParts<S> for Auth
where
	S: Send + Sync,
{
	type Rejection = Error;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		if let Some(auth) = parts.extensions.get::<Auth>().cloned() {
			Ok(auth)
		} else {
			Err(Error::Unauthorized)
		}
	}
}

// OptionalAuth //
//***************//
/// Optional auth extractor that doesn't fail if auth is missing
#[derive(Debug, Clone)]
pub struct OptionalAuth(pub Option<AuthCtx>);

impl<S> FromRequestParts<S> for OptionalAuth
where
	S: Send + Sync,
{
	type Rejection = Error;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		let auth = parts.extensions.get::<Auth>().cloned().map(|a| a.0);
		Ok(OptionalAuth(auth))
	}
}

// Admin //
//*******//
/// Like `Auth`, but rejects users without the admin flag
#[derive(Debug, Clone)]
pub struct Admin(pub AuthCtx);

impl<S> FromRequestParts<S> for Admin
where
	S: Send + Sync,
{
	type Rejection = Error;

	async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
		let Auth(auth) = Auth::from_request_parts(parts, state).await?;
		if auth.is_admin {
			Ok(Admin(auth))
		} else {
			warn!("Admin access denied for {}", auth.login);
			Err(Error::PermissionDenied)
		}
	}
}

// vim: ts=4
