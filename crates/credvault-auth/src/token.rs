//! Access tokens
//!
//! HS256 JWTs signed with an instance secret that is generated on first start
//! and kept in the `vars` table.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use credvault_core::AuthCtx;
use credvault_core::password::random_bytes_hex;
use credvault_types::meta_adapter::MetaAdapter;

use crate::prelude::*;

const SECRET_VAR: &str = "jwt_secret";
const SECRET_BYTES: usize = 32;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct AccessToken {
	/// Login
	pub sub: Box<str>,
	pub exp: i64,
	/// Display name
	pub n: Box<str>,
	pub uid: ItemId,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub gid: Option<ItemId>,
	#[serde(default)]
	pub adm: bool,
}

/// Signing secret, stored in the app extensions
pub struct TokenKey {
	encoding: EncodingKey,
	decoding: DecodingKey,
}

impl TokenKey {
	pub fn new(secret: &[u8]) -> Self {
		Self { encoding: EncodingKey::from_secret(secret), decoding: DecodingKey::from_secret(secret) }
	}

	/// Loads the instance secret, creating it on first use
	pub async fn load_or_create(meta: &dyn MetaAdapter) -> ClResult<Self> {
		if let Some(secret) = meta.read_var(SECRET_VAR).await? {
			return Ok(Self::new(secret.as_bytes()));
		}

		let secret = random_bytes_hex(SECRET_BYTES);
		meta.update_var(SECRET_VAR, &secret).await?;
		info!("Generated new token secret");
		Ok(Self::new(secret.as_bytes()))
	}

	pub fn generate(&self, auth: &AuthCtx, expiry_hours: i64) -> ClResult<Box<str>> {
		let claims = AccessToken {
			sub: auth.login.clone(),
			exp: Timestamp::now().add_seconds(expiry_hours * 3600).0,
			n: auth.name.clone(),
			uid: auth.user_id,
			gid: auth.group_id,
			adm: auth.is_admin,
		};
		let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
			.map_err(|e| Error::Internal(format!("cannot sign token: {}", e)))?;
		Ok(token.into())
	}

	pub fn validate(&self, token: &str) -> ClResult<AuthCtx> {
		let data = jsonwebtoken::decode::<AccessToken>(
			token,
			&self.decoding,
			&Validation::new(Algorithm::HS256),
		)
		.map_err(|e| {
			debug!("Token rejected: {}", e);
			Error::Unauthorized
		})?;

		let claims = data.claims;
		Ok(AuthCtx {
			login: claims.sub,
			user_id: claims.uid,
			group_id: claims.gid,
			name: claims.n,
			is_admin: claims.adm,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn auth() -> AuthCtx {
		AuthCtx {
			login: "alice".into(),
			user_id: 3,
			group_id: Some(2),
			name: "Alice".into(),
			is_admin: true,
		}
	}

	#[test]
	fn test_token_roundtrip() {
		let key = TokenKey::new(b"0123456789abcdef0123456789abcdef");
		let token = key.generate(&auth(), 8).unwrap();
		let ctx = key.validate(&token).unwrap();
		assert_eq!(&*ctx.login, "alice");
		assert_eq!(ctx.user_id, 3);
		assert_eq!(ctx.group_id, Some(2));
		assert!(ctx.is_admin);
	}

	#[test]
	fn test_wrong_secret() {
		let token = TokenKey::new(b"one secret").generate(&auth(), 8).unwrap();
		let res = TokenKey::new(b"another secret").validate(&token);
		assert!(matches!(res, Err(Error::Unauthorized)));
	}

	#[test]
	fn test_expired_token() {
		let key = TokenKey::new(b"secret");
		// Beyond the default 60 second leeway
		let token = key.generate(&auth(), -1).unwrap();
		assert!(matches!(key.validate(&token), Err(Error::Unauthorized)));
	}

	#[test]
	fn test_garbage_token() {
		let key = TokenKey::new(b"secret");
		assert!(key.validate("not.a.token").is_err());
	}
}

// vim: ts=4
