//! Authentication middleware

use axum::{
	body::Body,
	extract::State,
	http::{Request, Response, header},
	middleware::Next,
};

use credvault_core::lock::get_app_lock;
use credvault_core::{Auth, AuthCtx};

use crate::prelude::*;
use crate::token::TokenKey;

fn bearer_token(req: &Request<Body>) -> Option<&str> {
	req.headers()
		.get(header::AUTHORIZATION)
		.and_then(|h| h.to_str().ok())
		.and_then(|h| h.strip_prefix("Bearer "))
		.map(str::trim)
}

/// Rejects everybody except admins and the lock owner while the app is locked
async fn check_app_lock(app: &App, auth: &AuthCtx) -> ClResult<()> {
	if let Some(lock) = get_app_lock(&app.opts.lock_file).await
		&& lock.user_id != auth.user_id
		&& !auth.is_admin
	{
		debug!(login = %auth.login, "Request refused, application locked");
		return Err(Error::ServiceUnavailable(format!("application locked: {}", lock.subject)));
	}
	Ok(())
}

pub async fn require_auth(
	State(app): State<App>,
	mut req: Request<Body>,
	next: Next,
) -> ClResult<Response<Body>> {
	let token = bearer_token(&req).ok_or(Error::Unauthorized)?;
	let auth = app.ext::<TokenKey>()?.validate(token)?;
	check_app_lock(&app, &auth).await?;

	req.extensions_mut().insert(Auth(auth));
	Ok(next.run(req).await)
}

pub async fn optional_auth(
	State(app): State<App>,
	mut req: Request<Body>,
	next: Next,
) -> ClResult<Response<Body>> {
	if let Some(token) = bearer_token(&req)
		&& let Ok(auth) = app.ext::<TokenKey>()?.validate(token)
	{
		req.extensions_mut().insert(Auth(auth));
	}

	Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_bearer_token() {
		let req = Request::builder()
			.header("Authorization", "Bearer abc.def.ghi")
			.body(Body::empty())
			.unwrap();
		assert_eq!(bearer_token(&req), Some("abc.def.ghi"));

		let req = Request::builder().header("Authorization", "Basic Zm9v").body(Body::empty()).unwrap();
		assert_eq!(bearer_token(&req), None);

		let req = Request::builder().body(Body::empty()).unwrap();
		assert_eq!(bearer_token(&req), None);
	}
}

// vim: ts=4
