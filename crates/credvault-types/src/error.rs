//! Error type shared by every credvault crate.

use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

pub type ClResult<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
	NotFound,
	PermissionDenied,
	Unauthorized,
	DbError,
	Parse,
	ValidationError(String),
	ConfigError(String),
	Conflict(String),
	Internal(String),
	NetworkError(String),
	LdapError(String),
	ServiceUnavailable(String),

	// externals
	Io(std::io::Error),
}

impl Error {
	/// Stable machine readable code, used in API error bodies
	pub fn code(&self) -> &'static str {
		match self {
			Error::NotFound => "E-CORE-NOTFOUND",
			Error::PermissionDenied => "E-AUTH-NOPERM",
			Error::Unauthorized => "E-AUTH-UNAUTH",
			Error::DbError => "E-CORE-DBERR",
			Error::Parse => "E-CORE-PARSE",
			Error::ValidationError(_) => "E-VAL-INVALID",
			Error::ConfigError(_) => "E-CORE-CONFIG",
			Error::Conflict(_) => "E-CORE-CONFLICT",
			Error::Internal(_) => "E-CORE-INTERNAL",
			Error::NetworkError(_) => "E-NET-FAILED",
			Error::LdapError(_) => "E-LDAP-FAILED",
			Error::ServiceUnavailable(_) => "E-CORE-UNAVAIL",
			Error::Io(_) => "E-CORE-IO",
		}
	}

	pub fn status(&self) -> StatusCode {
		match self {
			Error::NotFound => StatusCode::NOT_FOUND,
			Error::PermissionDenied => StatusCode::FORBIDDEN,
			Error::Unauthorized => StatusCode::UNAUTHORIZED,
			Error::Parse | Error::ValidationError(_) => StatusCode::BAD_REQUEST,
			Error::Conflict(_) => StatusCode::CONFLICT,
			Error::NetworkError(_) | Error::LdapError(_) => StatusCode::BAD_GATEWAY,
			Error::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
			Error::DbError | Error::ConfigError(_) | Error::Internal(_) | Error::Io(_) => {
				StatusCode::INTERNAL_SERVER_ERROR
			}
		}
	}
}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self {
			Error::NotFound => write!(f, "not found"),
			Error::PermissionDenied => write!(f, "permission denied"),
			Error::Unauthorized => write!(f, "unauthorized"),
			Error::DbError => write!(f, "database error"),
			Error::Parse => write!(f, "parse error"),
			Error::ValidationError(msg) => write!(f, "validation error: {}", msg),
			Error::ConfigError(msg) => write!(f, "config error: {}", msg),
			Error::Conflict(msg) => write!(f, "conflict: {}", msg),
			Error::Internal(msg) => write!(f, "internal error: {}", msg),
			Error::NetworkError(msg) => write!(f, "network error: {}", msg),
			Error::LdapError(msg) => write!(f, "ldap error: {}", msg),
			Error::ServiceUnavailable(msg) => write!(f, "service unavailable: {}", msg),
			Error::Io(err) => write!(f, "io error: {}", err),
		}
	}
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
	fn from(err: std::io::Error) -> Self {
		Self::Io(err)
	}
}

impl From<serde_json::Error> for Error {
	fn from(err: serde_json::Error) -> Self {
		tracing::warn!("JSON error: {}", err);
		Self::Parse
	}
}

impl IntoResponse for Error {
	fn into_response(self) -> axum::response::Response {
		let status = self.status();
		// Internal details stay in the log
		let message = if status.is_server_error() {
			tracing::error!("Request failed: {}", self);
			match self {
				Error::NetworkError(_) | Error::LdapError(_) | Error::ServiceUnavailable(_) => {
					self.to_string()
				}
				_ => "internal server error".to_string(),
			}
		} else {
			self.to_string()
		};
		let body = json!({ "error": { "code": self.code(), "message": message } });
		(status, Json(body)).into_response()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_status_mapping() {
		assert_eq!(Error::NotFound.status(), StatusCode::NOT_FOUND);
		assert_eq!(Error::Unauthorized.status(), StatusCode::UNAUTHORIZED);
		assert_eq!(Error::Conflict("x".into()).status(), StatusCode::CONFLICT);
		assert_eq!(Error::ValidationError("x".into()).status(), StatusCode::BAD_REQUEST);
		assert_eq!(Error::DbError.status(), StatusCode::INTERNAL_SERVER_ERROR);
		assert_eq!(Error::LdapError("down".into()).status(), StatusCode::BAD_GATEWAY);
	}

	#[test]
	fn test_display() {
		assert_eq!(Error::Conflict("name taken".into()).to_string(), "conflict: name taken");
		assert_eq!(Error::NotFound.to_string(), "not found");
	}

	#[test]
	fn test_into_response_status() {
		let res = Error::PermissionDenied.into_response();
		assert_eq!(res.status(), StatusCode::FORBIDDEN);
	}
}

// vim: ts=4
