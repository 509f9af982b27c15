//! User groups

use sqlx::{Row, SqlitePool, sqlite::SqliteRow};

use crate::utils::*;
use credvault_types::meta_adapter::*;
use credvault_types::prelude::*;
use credvault_types::types::{ItemSearch, QueryResult};

fn group_row(row: &SqliteRow) -> Result<UserGroup, sqlx::Error> {
	Ok(UserGroup {
		id: row.try_get("group_id")?,
		name: row.try_get("name")?,
		description: row.try_get("description")?,
	})
}

fn push_filter<'a>(query: &mut sqlx::QueryBuilder<'a, sqlx::Sqlite>, pattern: Option<&'a str>) {
	if let Some(pattern) = pattern {
		query.push(" WHERE name LIKE ").push_bind(pattern).push(" ESCAPE '\\'");
		query.push(" OR description LIKE ").push_bind(pattern).push(" ESCAPE '\\'");
	}
}

pub(crate) async fn search(db: &SqlitePool, search: &ItemSearch) -> ClResult<QueryResult<UserGroup>> {
	let pattern = search.term().map(like_pattern);

	let mut query = sqlx::QueryBuilder::new("SELECT count(*) AS cnt FROM user_groups");
	push_filter(&mut query, pattern.as_deref());
	let total: i64 = map_res(query.build().fetch_one(db).await, |row| row.try_get("cnt"))?;

	let mut query = sqlx::QueryBuilder::new("SELECT group_id, name, description FROM user_groups");
	push_filter(&mut query, pattern.as_deref());
	query.push(" ORDER BY name");
	push_limit(&mut query, search);

	let res = query
		.build()
		.fetch_all(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;

	Ok(QueryResult::new(collect_res(res.iter().map(group_row))?, total as u64))
}

pub(crate) async fn read(db: &SqlitePool, id: ItemId) -> ClResult<UserGroup> {
	let res = sqlx::query("SELECT group_id, name, description FROM user_groups WHERE group_id = ?")
		.bind(id)
		.fetch_one(db)
		.await;

	map_res(res, |row| group_row(&row))
}

pub(crate) async fn create(db: &SqlitePool, data: &CreateUserGroupData) -> ClResult<ItemId> {
	let res =
		sqlx::query("INSERT INTO user_groups (name, description) VALUES (?, ?) RETURNING group_id")
			.bind(data.name.as_ref())
			.bind(data.description.as_deref())
			.fetch_one(db)
			.await
			.map_err(write_err)?;

	res.try_get("group_id").inspect_err(inspect).map_err(|_| Error::DbError)
}

pub(crate) async fn update(db: &SqlitePool, id: ItemId, data: &UpdateUserGroupData) -> ClResult<()> {
	let mut query = sqlx::QueryBuilder::new("UPDATE user_groups SET ");
	let mut has_updates = false;
	has_updates = push_patch!(query, has_updates, "name", &data.name);
	has_updates = push_patch!(query, has_updates, "description", &data.description);

	if !has_updates {
		read(db, id).await?;
		return Ok(());
	}

	query.push(" WHERE group_id=").push_bind(id);
	let res = query.build().execute(db).await.map_err(write_err)?;
	if res.rows_affected() == 0 {
		return Err(Error::NotFound);
	}
	Ok(())
}

pub(crate) async fn delete(db: &SqlitePool, id: ItemId) -> ClResult<()> {
	let res = sqlx::query("DELETE FROM user_groups WHERE group_id = ?")
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

pub(crate) async fn count_refs(db: &SqlitePool, id: ItemId) -> ClResult<u64> {
	let res = sqlx::query(
		"SELECT (SELECT count(*) FROM users WHERE group_id = ?1)
			+ (SELECT count(*) FROM accounts WHERE user_group_id = ?1) AS cnt",
	)
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
	let mut query = sqlx::QueryBuilder::new("SELECT count(*) AS cnt FROM user_groups WHERE name=");
	query.push_bind(name);
	if let Some(id) = exclude_id {
		query.push(" AND group_id<>").push_bind(id);
	}

	let cnt: i64 = map_res(query.build().fetch_one(db).await, |row| row.try_get("cnt"))?;
	Ok(cnt > 0)
}

// vim: ts=4
