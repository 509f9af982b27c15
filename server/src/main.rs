use std::{env, path::PathBuf, process::ExitCode, sync::Arc};

use credvault::AppBuilder;
use credvault_directory_adapter_ldap::{DirectoryAdapterLdap, LdapConfig};
use credvault_meta_adapter_sqlite::MetaAdapterSqlite;
use credvault_types::error::ClResult;
use credvault_types::utils::{boolval, split_list};

/// Process configuration, read from the environment
pub struct Config {
	pub listen: String,
	pub db_dir: PathBuf,
	pub dist_dir: PathBuf,
	pub tmp_dir: PathBuf,
	pub lock_file: PathBuf,
	pub ldap_url: String,
	pub ldap_bind_dn: Option<String>,
	pub ldap_bind_pass: Option<String>,
	pub ldap_no_tls_verify: bool,
	pub admin_logins: String,
	pub disable_cache: bool,
}

fn var(name: &str) -> Option<String> {
	env::var(name).ok().filter(|v| !v.is_empty())
}

fn var_or(name: &str, default: &str) -> String {
	var(name).unwrap_or_else(|| default.to_string())
}

fn flag(name: &str) -> bool {
	var(name).and_then(|v| boolval(&v, true)).unwrap_or(false)
}

impl Config {
	fn from_env() -> Self {
		let db_dir = PathBuf::from(var_or("DB_DIR", "./data"));
		Config {
			listen: var_or("LISTEN", "127.0.0.1:8080"),
			dist_dir: PathBuf::from(var_or("DIST_DIR", "./dist")),
			tmp_dir: var("TMP_DIR").map_or_else(|| db_dir.join("tmp"), PathBuf::from),
			lock_file: var("LOCK_FILE").map_or_else(|| db_dir.join(".lock"), PathBuf::from),
			db_dir,
			ldap_url: var_or("LDAP_URL", ""),
			ldap_bind_dn: var("LDAP_BIND_DN"),
			ldap_bind_pass: var("LDAP_BIND_PASS"),
			ldap_no_tls_verify: flag("LDAP_NO_TLS_VERIFY"),
			admin_logins: var_or("ADMIN_LOGINS", ""),
			disable_cache: flag("DISABLE_CACHE"),
		}
	}
}

async fn run(config: Config) -> ClResult<()> {
	let mut builder = AppBuilder::new();

	let meta_adapter = MetaAdapterSqlite::new(&config.db_dir).await?;
	let directory_adapter = DirectoryAdapterLdap::new(LdapConfig {
		url: config.ldap_url.into(),
		bind_dn: config.ldap_bind_dn.map(Into::into),
		bind_pass: config.ldap_bind_pass.map(Into::into),
		no_tls_verify: config.ldap_no_tls_verify,
	})?;

	builder
		.listen(config.listen)
		.dist_dir(config.dist_dir)
		.tmp_dir(config.tmp_dir)
		.lock_file(config.lock_file)
		.admin_logins(split_list(&config.admin_logins))
		.disable_cache(config.disable_cache)
		.meta_adapter(Arc::new(meta_adapter))
		.directory_adapter(Arc::new(directory_adapter));
	builder.run().await
}

#[tokio::main]
async fn main() -> ExitCode {
	match run(Config::from_env()).await {
		Ok(()) => ExitCode::SUCCESS,
		Err(err) => {
			tracing::error!("FATAL: {}", err);
			ExitCode::FAILURE
		}
	}
}

// vim: ts=4
