//! Database schema initialization

use sqlx::SqlitePool;

pub(crate) const SCHEMA_VERSION: i64 = 1;

pub(crate) async fn init_db(db: &SqlitePool) -> Result<(), sqlx::Error> {
	let mut tx = db.begin().await?;

	sqlx::query(
		"CREATE TABLE IF NOT EXISTS vars (
			key text NOT NULL,
			value text,
			PRIMARY KEY(key)
	)",
	)
	.execute(&mut *tx)
	.await?;

	sqlx::query(
		"CREATE TABLE IF NOT EXISTS settings (
		name text NOT NULL,
		value text,
		PRIMARY KEY(name)
	)",
	)
	.execute(&mut *tx)
	.await?;

	// Profiles, users, groups
	//*************************
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS profiles (
		profile_id integer NOT NULL,
		name text NOT NULL COLLATE NOCASE UNIQUE,
		profile json NOT NULL DEFAULT '{}',
		PRIMARY KEY(profile_id)
	)",
	)
	.execute(&mut *tx)
	.await?;

	sqlx::query(
		"CREATE TABLE IF NOT EXISTS user_groups (
		group_id integer NOT NULL,
		name text NOT NULL COLLATE NOCASE UNIQUE,
		description text,
		PRIMARY KEY(group_id)
	)",
	)
	.execute(&mut *tx)
	.await?;

	sqlx::query(
		"CREATE TABLE IF NOT EXISTS users (
		user_id integer NOT NULL,
		login text NOT NULL COLLATE NOCASE UNIQUE,
		name text NOT NULL,
		email text,
		profile_id integer REFERENCES profiles(profile_id),
		group_id integer REFERENCES user_groups(group_id),
		is_admin boolean NOT NULL DEFAULT 0,
		is_ldap boolean NOT NULL DEFAULT 0,
		created_at datetime DEFAULT (unixepoch()),
		PRIMARY KEY(user_id)
	)",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query("CREATE INDEX IF NOT EXISTS idx_users_profile ON users(profile_id)")
		.execute(&mut *tx)
		.await?;
	sqlx::query("CREATE INDEX IF NOT EXISTS idx_users_group ON users(group_id)")
		.execute(&mut *tx)
		.await?;

	// Accounts
	//**********
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS customers (
		customer_id integer NOT NULL,
		name text NOT NULL COLLATE NOCASE UNIQUE,
		PRIMARY KEY(customer_id)
	)",
	)
	.execute(&mut *tx)
	.await?;

	sqlx::query(
		"CREATE TABLE IF NOT EXISTS categories (
		category_id integer NOT NULL,
		name text NOT NULL COLLATE NOCASE UNIQUE,
		PRIMARY KEY(category_id)
	)",
	)
	.execute(&mut *tx)
	.await?;

	sqlx::query(
		"CREATE TABLE IF NOT EXISTS accounts (
		account_id integer NOT NULL,
		name text NOT NULL,
		customer_id integer NOT NULL REFERENCES customers(customer_id),
		category_id integer NOT NULL REFERENCES categories(category_id),
		url text,
		login text,
		pass text,
		notes text,
		user_id integer NOT NULL,
		user_group_id integer REFERENCES user_groups(group_id),
		created_at datetime DEFAULT (unixepoch()),
		PRIMARY KEY(account_id)
	)",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query("CREATE INDEX IF NOT EXISTS idx_accounts_group ON accounts(user_group_id)")
		.execute(&mut *tx)
		.await?;

	sqlx::query("INSERT OR IGNORE INTO vars (key, value) VALUES ('schema_version', ?)")
		.bind(SCHEMA_VERSION.to_string())
		.execute(&mut *tx)
		.await?;

	tx.commit().await?;
	Ok(())
}

// vim: ts=4
