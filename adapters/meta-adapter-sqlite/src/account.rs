//! Accounts and their customer / category lookups

use sqlx::{Row, SqlitePool, sqlite::SqliteRow};

use crate::utils::*;
use credvault_types::meta_adapter::*;
use credvault_types::prelude::*;
use credvault_types::types::{ItemSearch, QueryResult};

async fn find_or_create_named(db: &SqlitePool, table: &str, id_col: &str, name: &str) -> ClResult<ItemId> {
	let mut tx = db.begin().await.inspect_err(inspect).map_err(|_| Error::DbError)?;

	sqlx::query(&format!("INSERT INTO {table} (name) VALUES (?) ON CONFLICT(name) DO NOTHING"))
		.bind(name)
		.execute(&mut *tx)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;

	let res = sqlx::query(&format!("SELECT {id_col} FROM {table} WHERE name = ?"))
		.bind(name)
		.fetch_one(&mut *tx)
		.await;
	let id = map_res(res, |row| row.try_get(id_col))?;

	tx.commit().await.inspect_err(inspect).map_err(|_| Error::DbError)?;
	Ok(id)
}

pub(crate) async fn find_or_create_customer(db: &SqlitePool, name: &str) -> ClResult<ItemId> {
	find_or_create_named(db, "customers", "customer_id", name).await
}

pub(crate) async fn find_or_create_category(db: &SqlitePool, name: &str) -> ClResult<ItemId> {
	find_or_create_named(db, "categories", "category_id", name).await
}

pub(crate) async fn create(db: &SqlitePool, account: &NewAccount<'_>) -> ClResult<ItemId> {
	let res = sqlx::query(
		"INSERT INTO accounts (name, customer_id, category_id, url, login, pass, notes,
			user_id, user_group_id)
		VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING account_id",
	)
	.bind(account.name)
	.bind(account.customer_id)
	.bind(account.category_id)
	.bind(account.url)
	.bind(account.login)
	.bind(account.pass)
	.bind(account.notes)
	.bind(account.user_id)
	.bind(account.user_group_id)
	.fetch_one(db)
	.await
	.inspect_err(inspect)
	.map_err(|_| Error::DbError)?;

	res.try_get("account_id").inspect_err(inspect).map_err(|_| Error::DbError)
}

fn list_row(row: &SqliteRow) -> Result<AccountListItem, sqlx::Error> {
	let url: Option<Box<str>> = row.try_get("url")?;
	let login: Option<Box<str>> = row.try_get("login")?;
	Ok(AccountListItem {
		id: row.try_get("account_id")?,
		name: row.try_get("name")?,
		customer: row.try_get("customer")?,
		category: row.try_get("category")?,
		url: url.filter(|s| !s.is_empty()),
		login: login.filter(|s| !s.is_empty()),
		user_id: row.try_get("user_id")?,
		user_group_id: row.try_get("user_group_id")?,
	})
}

fn push_filter<'a>(query: &mut sqlx::QueryBuilder<'a, sqlx::Sqlite>, pattern: Option<&'a str>) {
	query.push(
		" FROM accounts a
		JOIN customers cu ON cu.customer_id = a.customer_id
		JOIN categories ca ON ca.category_id = a.category_id",
	);
	if let Some(pattern) = pattern {
		query.push(" WHERE a.name LIKE ").push_bind(pattern).push(" ESCAPE '\\'");
		query.push(" OR cu.name LIKE ").push_bind(pattern).push(" ESCAPE '\\'");
		query.push(" OR ca.name LIKE ").push_bind(pattern).push(" ESCAPE '\\'");
	}
}

pub(crate) async fn search(
	db: &SqlitePool,
	search: &ItemSearch,
) -> ClResult<QueryResult<AccountListItem>> {
	let pattern = search.term().map(like_pattern);

	let mut query = sqlx::QueryBuilder::new("SELECT count(*) AS cnt");
	push_filter(&mut query, pattern.as_deref());
	let total: i64 = map_res(query.build().fetch_one(db).await, |row| row.try_get("cnt"))?;

	let mut query = sqlx::QueryBuilder::new(
		"SELECT a.account_id, a.name, cu.name AS customer, ca.name AS category, a.url, a.login,
			a.user_id, a.user_group_id",
	);
	push_filter(&mut query, pattern.as_deref());
	query.push(" ORDER BY cu.name, a.name");
	push_limit(&mut query, search);

	let res = query
		.build()
		.fetch_all(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;

	Ok(QueryResult::new(collect_res(res.iter().map(list_row))?, total as u64))
}

// vim: ts=4
