//! Users

use sqlx::{Row, SqlitePool};

use crate::utils::*;
use credvault_types::meta_adapter::*;
use credvault_types::prelude::*;

pub(crate) async fn read_by_login(db: &SqlitePool, login: &str) -> ClResult<User> {
	let res = sqlx::query(
		"SELECT user_id, login, name, email, profile_id, group_id, is_admin, is_ldap
		FROM users WHERE login = ?",
	)
	.bind(login)
	.fetch_one(db)
	.await;

	map_res(res, |row| {
		Ok(User {
			id: row.try_get("user_id")?,
			login: row.try_get("login")?,
			name: row.try_get("name")?,
			email: row.try_get("email")?,
			profile_id: row.try_get("profile_id")?,
			group_id: row.try_get("group_id")?,
			is_admin: row.try_get("is_admin")?,
			is_ldap: row.try_get("is_ldap")?,
		})
	})
}

pub(crate) async fn create(db: &SqlitePool, user: &NewUser<'_>) -> ClResult<ItemId> {
	let res = sqlx::query(
		"INSERT INTO users (login, name, email, profile_id, group_id, is_admin, is_ldap)
		VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING user_id",
	)
	.bind(user.login)
	.bind(user.name)
	.bind(user.email)
	.bind(user.profile_id)
	.bind(user.group_id)
	.bind(user.is_admin)
	.bind(user.is_ldap)
	.fetch_one(db)
	.await
	.map_err(write_err)?;

	res.try_get("user_id").inspect_err(inspect).map_err(|_| Error::DbError)
}

// vim: ts=4
