//! Outgoing HTTP requests
//!
//! Requests honour the proxy settings and can keep cookies per user for the
//! lifetime of the process.

use parking_lot::Mutex;
use reqwest::cookie::Jar;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::prelude::*;
use crate::settings::service::SettingsService;

pub const USER_AGENT: &str = "credvault-app";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProxyConfig {
	pub server: String,
	pub port: u16,
	pub user: Option<String>,
	pub pass: Option<String>,
}

impl ProxyConfig {
	/// Proxy from the `proxy.*` settings, `None` when disabled
	pub async fn from_settings(settings: &SettingsService) -> ClResult<Option<Self>> {
		if !settings.get_bool("proxy.enabled").await? {
			return Ok(None);
		}
		let server = settings
			.get_string_opt("proxy.server")
			.await?
			.filter(|s| !s.is_empty())
			.ok_or_else(|| Error::ConfigError("proxy.server is not set".into()))?;
		let port = u16::try_from(settings.get_int("proxy.port").await?)
			.map_err(|_| Error::ConfigError("invalid proxy.port".into()))?;
		let user = settings.get_string_opt("proxy.user").await?.filter(|s| !s.is_empty());
		let pass = settings.get_string_opt("proxy.pass").await?;
		Ok(Some(Self { server, port, user, pass }))
	}

	fn to_proxy(&self) -> ClResult<reqwest::Proxy> {
		let url = if self.server.contains("://") {
			format!("{}:{}", self.server, self.port)
		} else {
			format!("http://{}:{}", self.server, self.port)
		};
		let proxy = reqwest::Proxy::all(&url)
			.map_err(|e| Error::ConfigError(format!("invalid proxy {}: {}", url, e)))?;
		Ok(match &self.user {
			Some(user) => proxy.basic_auth(user, self.pass.as_deref().unwrap_or_default()),
			None => proxy,
		})
	}
}

/// Request body for a POST
#[derive(Clone, Debug)]
pub struct PostData {
	pub content_type: String,
	pub body: Vec<u8>,
}

#[derive(Clone, Debug, Default)]
pub struct FetchOptions<'a> {
	pub post: Option<PostData>,
	/// Keep cookies in the jar of this user
	pub use_cookie: Option<&'a str>,
	/// Accept invalid TLS certificates
	pub weak_tls: bool,
	pub proxy: Option<ProxyConfig>,
}

#[derive(Debug, Default)]
pub struct Request {
	cookie_jars: Mutex<HashMap<Box<str>, Arc<Jar>>>,
}

fn network_error(url: &str, err: &reqwest::Error) -> Error {
	warn!("Request to {} failed: {}", url, err);
	Error::NetworkError(format!("{}: {}", url, err))
}

impl Request {
	pub fn new() -> Self {
		Self::default()
	}

	/// Cookie jar of a user, created on first use
	pub fn cookie_jar(&self, login: &str) -> Arc<Jar> {
		self.cookie_jars.lock().entry(login.into()).or_default().clone()
	}

	fn client(&self, opts: &FetchOptions<'_>) -> ClResult<reqwest::Client> {
		let mut builder = reqwest::Client::builder()
			.user_agent(USER_AGENT)
			.connect_timeout(CONNECT_TIMEOUT)
			.timeout(TIMEOUT);

		if let Some(proxy) = &opts.proxy {
			builder = builder.proxy(proxy.to_proxy()?);
		}
		if let Some(login) = opts.use_cookie {
			builder = builder.cookie_provider(self.cookie_jar(login));
		}
		if opts.weak_tls {
			builder = builder.danger_accept_invalid_certs(true);
		}

		builder.build().map_err(|e| Error::Internal(format!("cannot build HTTP client: {}", e)))
	}

	/// Fetches a URL and returns the body. Any status other than 200 is an error.
	pub async fn fetch(&self, url: &str, opts: FetchOptions<'_>) -> ClResult<String> {
		let client = self.client(&opts)?;
		let req = match opts.post {
			Some(post) => client
				.post(url)
				.header(reqwest::header::CONTENT_TYPE, post.content_type)
				.body(post.body),
			None => client.get(url),
		};

		let res = req.send().await.map_err(|e| network_error(url, &e))?;
		if res.status() != reqwest::StatusCode::OK {
			warn!("Request to {} returned {}", url, res.status());
			return Err(Error::NetworkError(format!("{}: HTTP {}", url, res.status())));
		}
		res.text().await.map_err(|e| network_error(url, &e))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use axum::{Router, http::HeaderMap, routing::get, routing::post};

	async fn serve() -> String {
		let app = Router::new()
			.route("/ping", get(|| async { "pong" }))
			.route("/echo", post(|headers: HeaderMap, body: String| async move {
				let ct = headers
					.get("content-type")
					.and_then(|v| v.to_str().ok())
					.unwrap_or_default()
					.to_string();
				format!("{}|{}", ct, body)
			}))
			.route("/set", get(|| async { ([("set-cookie", "sid=abc; Path=/")], "ok") }))
			.route("/cookie", get(|headers: HeaderMap| async move {
				headers
					.get("cookie")
					.and_then(|v| v.to_str().ok())
					.unwrap_or("none")
					.to_string()
			}));
		let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
		let addr = listener.local_addr().unwrap();
		tokio::spawn(async move { axum::serve(listener, app).await });
		format!("http://{}", addr)
	}

	#[tokio::test]
	async fn test_fetch_get_and_post() {
		let base = serve().await;
		let req = Request::new();

		let body = req.fetch(&format!("{}/ping", base), FetchOptions::default()).await.unwrap();
		assert_eq!(body, "pong");

		let opts = FetchOptions {
			post: Some(PostData {
				content_type: "application/json".into(),
				body: br#"{"a":1}"#.to_vec(),
			}),
			..Default::default()
		};
		let body = req.fetch(&format!("{}/echo", base), opts).await.unwrap();
		assert_eq!(body, r#"application/json|{"a":1}"#);
	}

	#[tokio::test]
	async fn test_fetch_non_200_is_error() {
		let base = serve().await;
		let res = Request::new().fetch(&format!("{}/missing", base), FetchOptions::default()).await;
		assert!(matches!(res, Err(Error::NetworkError(_))));
	}

	#[tokio::test]
	async fn test_cookie_jar_per_user() {
		let base = serve().await;
		let req = Request::new();
		let alice = FetchOptions { use_cookie: Some("alice"), ..Default::default() };

		req.fetch(&format!("{}/set", base), alice.clone()).await.unwrap();
		let cookie = req.fetch(&format!("{}/cookie", base), alice).await.unwrap();
		assert_eq!(cookie, "sid=abc");

		let bob = FetchOptions { use_cookie: Some("bob"), ..Default::default() };
		let cookie = req.fetch(&format!("{}/cookie", base), bob).await.unwrap();
		assert_eq!(cookie, "none");

		let cookie = req.fetch(&format!("{}/cookie", base), FetchOptions::default()).await.unwrap();
		assert_eq!(cookie, "none");
	}

	#[test]
	fn test_proxy_config() {
		let cfg = ProxyConfig {
			server: "proxy.local".into(),
			port: 3128,
			user: Some("u".into()),
			pass: None,
		};
		assert!(cfg.to_proxy().is_ok());
	}
}

// vim: ts=4
