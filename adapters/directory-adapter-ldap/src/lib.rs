//! LDAP implementation of the credvault directory adapter.
//!
//! Every operation opens its own connection, binds and unbinds. The service
//! account (if any) is used for searches, user credentials only for
//! `check_bind`.

use async_trait::async_trait;
use ldap3::{Ldap, LdapConnAsync, LdapConnSettings, LdapError, Scope, SearchEntry};
use std::time::Duration;

use credvault_types::directory_adapter::{DirectoryAdapter, DirectoryEntry};
use credvault_types::prelude::*;

const CONN_TIMEOUT: Duration = Duration::from_secs(10);

// LDAP result codes
const RC_SUCCESS: u32 = 0;
const RC_NO_SUCH_OBJECT: u32 = 32;
const RC_INAPPROPRIATE_AUTH: u32 = 48;
const RC_INVALID_CREDENTIALS: u32 = 49;
const RC_UNWILLING_TO_PERFORM: u32 = 53;

fn ldap_err(err: &LdapError) -> Error {
	warn!("LDAP: {}", err);
	Error::LdapError(err.to_string())
}

#[derive(Clone, Default)]
pub struct LdapConfig {
	/// Server URL, `ldap://` or `ldaps://`
	pub url: Box<str>,
	/// Service account DN, anonymous searches when empty
	pub bind_dn: Option<Box<str>>,
	pub bind_pass: Option<Box<str>>,
	/// Skip TLS certificate verification
	pub no_tls_verify: bool,
}

impl std::fmt::Debug for LdapConfig {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("LdapConfig")
			.field("url", &self.url)
			.field("bind_dn", &self.bind_dn)
			.field("bind_pass", &self.bind_pass.as_ref().map(|_| "***"))
			.field("no_tls_verify", &self.no_tls_verify)
			.finish()
	}
}

#[derive(Debug)]
pub struct DirectoryAdapterLdap {
	config: LdapConfig,
}

impl DirectoryAdapterLdap {
	pub fn new(config: LdapConfig) -> ClResult<Self> {
		if config.url.is_empty() {
			return Err(Error::ConfigError("LDAP server URL is not set".into()));
		}
		Ok(Self { config })
	}

	async fn connect(&self) -> ClResult<Ldap> {
		let settings = LdapConnSettings::new()
			.set_conn_timeout(CONN_TIMEOUT)
			.set_no_tls_verify(self.config.no_tls_verify);
		let (conn, ldap) = LdapConnAsync::with_settings(settings, &self.config.url)
			.await
			.map_err(|err| ldap_err(&err))?;

		tokio::spawn(async move {
			if let Err(err) = conn.drive().await {
				warn!("LDAP connection error: {}", err);
			}
		});
		Ok(ldap)
	}

	async fn service_bind(&self, ldap: &mut Ldap) -> ClResult<()> {
		let Some(bind_dn) = self.config.bind_dn.as_deref().filter(|dn| !dn.is_empty()) else {
			return Ok(());
		};
		let bind_pass = self.config.bind_pass.as_deref().unwrap_or_default();

		let res = ldap.simple_bind(bind_dn, bind_pass).await.map_err(|err| ldap_err(&err))?;
		if res.rc != RC_SUCCESS {
			error!(rc = res.rc, dn = bind_dn, "LDAP service bind rejected: {}", res.text);
			return Err(Error::LdapError("service bind rejected".into()));
		}
		Ok(())
	}
}

#[async_trait]
impl DirectoryAdapter for DirectoryAdapterLdap {
	async fn search(
		&self,
		base: &str,
		filter: &str,
		attrs: &[&str],
	) -> ClResult<Vec<DirectoryEntry>> {
		let mut ldap = self.connect().await?;
		self.service_bind(&mut ldap).await?;

		debug!(base, filter, "LDAP search");
		let res = ldap
			.search(base, Scope::Subtree, filter, attrs.to_vec())
			.await
			.map_err(|err| ldap_err(&err))?;
		let _ignore_err = ldap.unbind().await;

		let entries = match res.success() {
			Ok((entries, _)) => entries,
			Err(LdapError::LdapResult { result }) if result.rc == RC_NO_SUCH_OBJECT => {
				return Ok(Vec::new());
			}
			Err(err) => return Err(ldap_err(&err)),
		};

		Ok(entries
			.into_iter()
			.map(|entry| {
				let entry = SearchEntry::construct(entry);
				DirectoryEntry {
					dn: entry.dn.into(),
					attrs: entry
						.attrs
						.into_iter()
						.map(|(key, values)| {
							(key.into(), values.into_iter().map(Into::into).collect())
						})
						.collect(),
				}
			})
			.collect())
	}

	async fn check_bind(&self, dn: &str, password: &str) -> ClResult<bool> {
		// An empty password would be an unauthenticated bind
		if dn.is_empty() || password.is_empty() {
			return Ok(false);
		}

		let mut ldap = self.connect().await?;
		let res = ldap.simple_bind(dn, password).await.map_err(|err| ldap_err(&err))?;
		let _ignore_err = ldap.unbind().await;

		match res.rc {
			RC_SUCCESS => Ok(true),
			RC_INAPPROPRIATE_AUTH | RC_INVALID_CREDENTIALS | RC_UNWILLING_TO_PERFORM => {
				info!(dn, rc = res.rc, "LDAP bind rejected");
				Ok(false)
			}
			rc => {
				warn!(dn, rc, "LDAP bind failed: {}", res.text);
				Err(Error::LdapError(format!("bind failed with result code {}", rc)))
			}
		}
	}
}


// vim: ts=4
