//! Settings and internal variables
//!
//! Setting values are stored as JSON text.

use sqlx::{Row, SqlitePool};

use crate::utils::inspect;
use credvault_types::prelude::*;

pub(crate) async fn read(db: &SqlitePool, name: &str) -> ClResult<Option<serde_json::Value>> {
	let row = sqlx::query("SELECT value FROM settings WHERE name = ?")
		.bind(name)
		.fetch_optional(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;

	Ok(row.and_then(|r| {
		let value: Option<String> = r.get("value");
		value.and_then(|v| serde_json::from_str(&v).ok())
	}))
}

/// Update or create a setting, `None` deletes it
pub(crate) async fn update(
	db: &SqlitePool,
	name: &str,
	value: Option<serde_json::Value>,
) -> ClResult<()> {
	if let Some(val) = value {
		sqlx::query("INSERT OR REPLACE INTO settings (name, value) VALUES (?, ?)")
			.bind(name)
			.bind(val.to_string())
			.execute(db)
			.await
			.inspect_err(inspect)
			.map_err(|_| Error::DbError)?;
	} else {
		sqlx::query("DELETE FROM settings WHERE name = ?")
			.bind(name)
			.execute(db)
			.await
			.inspect_err(inspect)
			.map_err(|_| Error::DbError)?;
	}

	Ok(())
}

pub(crate) async fn read_var(db: &SqlitePool, key: &str) -> ClResult<Option<Box<str>>> {
	let row = sqlx::query("SELECT value FROM vars WHERE key = ?")
		.bind(key)
		.fetch_optional(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;

	match row {
		Some(row) => row.try_get("value").inspect_err(inspect).or(Err(Error::DbError)),
		None => Ok(None),
	}
}

pub(crate) async fn update_var(db: &SqlitePool, key: &str, value: &str) -> ClResult<()> {
	sqlx::query("INSERT OR REPLACE INTO vars (key, value) VALUES (?, ?)")
		.bind(key)
		.bind(value)
		.execute(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;
	Ok(())
}

// vim: ts=4
