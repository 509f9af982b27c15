//! User profiles

use sqlx::{Row, SqlitePool, sqlite::SqliteRow};

use crate::utils::*;
use credvault_types::meta_adapter::*;
use credvault_types::prelude::*;
use credvault_types::types::{ItemSearch, QueryResult};

fn profile_row(row: &SqliteRow) -> Result<UserProfile, sqlx::Error> {
	let profile: String = row.try_get("profile")?;
	Ok(UserProfile {
		id: row.try_get("profile_id")?,
		name: row.try_get("name")?,
		profile: json_col(&profile)?,
	})
}

fn list_row(row: &SqliteRow) -> Result<ProfileListItem, sqlx::Error> {
	Ok(ProfileListItem { id: row.try_get("profile_id")?, name: row.try_get("name")? })
}

pub(crate) async fn list(db: &SqlitePool) -> ClResult<Vec<ProfileListItem>> {
	let res = sqlx::query("SELECT profile_id, name FROM profiles ORDER BY name")
		.fetch_all(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;

	collect_res(res.iter().map(list_row))
}

pub(crate) async fn search(
	db: &SqlitePool,
	search: &ItemSearch,
) -> ClResult<QueryResult<ProfileListItem>> {
	let pattern = search.term().map(like_pattern);

	let mut query = sqlx::QueryBuilder::new("SELECT count(*) AS cnt FROM profiles");
	if let Some(pattern) = &pattern {
		query.push(" WHERE name LIKE ").push_bind(pattern.as_str()).push(" ESCAPE '\\'");
	}
	let total: i64 = map_res(query.build().fetch_one(db).await, |row| row.try_get("cnt"))?;

	let mut query = sqlx::QueryBuilder::new("SELECT profile_id, name FROM profiles");
	if let Some(pattern) = &pattern {
		query.push(" WHERE name LIKE ").push_bind(pattern.as_str()).push(" ESCAPE '\\'");
	}
	query.push(" ORDER BY name");
	push_limit(&mut query, search);

	let res = query
		.build()
		.fetch_all(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;

	Ok(QueryResult::new(collect_res(res.iter().map(list_row))?, total as u64))
}

pub(crate) async fn read(db: &SqlitePool, id: ItemId) -> ClResult<UserProfile> {
	let res = sqlx::query("SELECT profile_id, name, profile FROM profiles WHERE profile_id = ?")
		.bind(id)
		.fetch_one(db)
		.await;

	map_res(res, |row| profile_row(&row))
}

pub(crate) async fn read_many(db: &SqlitePool, ids: &[ItemId]) -> ClResult<Vec<UserProfile>> {
	if ids.is_empty() {
		return Ok(Vec::new());
	}

	let mut query =
		sqlx::QueryBuilder::new("SELECT profile_id, name, profile FROM profiles WHERE profile_id IN ");
	push_in(&mut query, ids);
	query.push(" ORDER BY name");

	let res = query
		.build()
		.fetch_all(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;

	collect_res(res.iter().map(profile_row))
}

pub(crate) async fn create(db: &SqlitePool, data: &CreateProfileData) -> ClResult<ItemId> {
	let profile = serde_json::to_string(&data.profile)?;
	let res = sqlx::query("INSERT INTO profiles (name, profile) VALUES (?, ?) RETURNING profile_id")
		.bind(data.name.as_ref())
		.bind(profile)
		.fetch_one(db)
		.await
		.map_err(write_err)?;

	res.try_get("profile_id").inspect_err(inspect).map_err(|_| Error::DbError)
}

pub(crate) async fn update(db: &SqlitePool, id: ItemId, data: &UpdateProfileData) -> ClResult<()> {
	let profile = data.profile.as_ref().map(serde_json::to_string).transpose()?;
	if data.name.is_none() && profile.is_none() {
		// Nothing to change, only check that the profile exists
		read(db, id).await?;
		return Ok(());
	}

	let mut query = sqlx::QueryBuilder::new("UPDATE profiles SET ");
	let mut fields = query.separated(", ");
	if let Some(name) = &data.name {
		fields.push("name=").push_bind_unseparated(name.as_ref());
	}
	if let Some(profile) = &profile {
		fields.push("profile=").push_bind_unseparated(profile.as_str());
	}
	query.push(" WHERE profile_id=").push_bind(id);

	let res = query.build().execute(db).await.map_err(write_err)?;
	if res.rows_affected() == 0 {
		return Err(Error::NotFound);
	}
	Ok(())
}

pub(crate) async fn delete(db: &SqlitePool, id: ItemId) -> ClResult<()> {
	let res = sqlx::query("DELETE FROM profiles WHERE profile_id = ?")
		.bind(id)
		.execute(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;

	if res.rows_affected() == 0 {
		return Err(Error::NotFound);
	}
	Ok(())
}

pub(crate) async fn delete_many(db: &SqlitePool, ids: &[ItemId]) -> ClResult<u64> {
	if ids.is_empty() {
		return Ok(0);
	}

	let mut query = sqlx::QueryBuilder::new("DELETE FROM profiles WHERE profile_id IN ");
	push_in(&mut query, ids);

	let res = query
		.build()
		.execute(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;
	Ok(res.rows_affected())
}

pub(crate) async fn count_users(db: &SqlitePool, id: ItemId) -> ClResult<u64> {
	let res = sqlx::query("SELECT count(*) AS cnt FROM users WHERE profile_id = ?")
		.bind(id)
		.fetch_one(db)
		.await;

	let cnt: i64 = map_res(res, |row| row.try_get("cnt"))?;
	Ok(cnt as u64)
}

pub(crate) async fn name_exists(
	db: &SqlitePool,
	name: &str,
	exclude_id: Option<ItemId>,
) -> ClResult<bool> {
	let mut query = sqlx::QueryBuilder::new("SELECT count(*) AS cnt FROM profiles WHERE name=");
	query.push_bind(name);
	if let Some(id) = exclude_id {
		query.push(" AND profile_id<>").push_bind(id);
	}

	let cnt: i64 = map_res(query.build().fetch_one(db).await, |row| row.try_get("cnt"))?;
	Ok(cnt > 0)
}

// vim: ts=4
