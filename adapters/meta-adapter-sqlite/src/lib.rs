//! SQLite implementation of the credvault metadata adapter.

use async_trait::async_trait;
use sqlx::sqlite::{self, SqlitePool};
use std::path::Path;

use credvault_types::meta_adapter::*;
use credvault_types::prelude::*;
use credvault_types::types::{ItemSearch, QueryResult};

mod account;
mod profile;
mod schema;
mod setting;
mod user;
mod user_group;
mod utils;

#[derive(Debug)]
pub struct MetaAdapterSqlite {
	db: SqlitePool,
}

impl MetaAdapterSqlite {
	/// Opens (or creates) `meta.db` in the given directory
	pub async fn new(path: impl AsRef<Path>) -> ClResult<Self> {
		tokio::fs::create_dir_all(path.as_ref()).await?;
		let db_path = path.as_ref().join("meta.db");

		let opts = sqlite::SqliteConnectOptions::new()
			.filename(&db_path)
			.create_if_missing(true)
			.foreign_keys(true)
			.journal_mode(sqlite::SqliteJournalMode::Wal);
		let db = sqlite::SqlitePoolOptions::new()
			.max_connections(5)
			.connect_with(opts)
			.await
			.inspect_err(|err| error!("DbError: {:#?}", err))
			.or(Err(Error::DbError))?;

		schema::init_db(&db)
			.await
			.inspect_err(|err| error!("DbError: {:#?}", err))
			.or(Err(Error::DbError))?;
		info!("Metadata database opened: {}", db_path.display());

		Ok(Self { db })
	}
}

#[async_trait]
impl MetaAdapter for MetaAdapterSqlite {
	// Settings
	//**********
	async fn read_setting(&self, key: &str) -> ClResult<Option<serde_json::Value>> {
		setting::read(&self.db, key).await
	}

	async fn update_setting(&self, key: &str, value: Option<serde_json::Value>) -> ClResult<()> {
		setting::update(&self.db, key, value).await
	}

	async fn read_var(&self, key: &str) -> ClResult<Option<Box<str>>> {
		setting::read_var(&self.db, key).await
	}

	async fn update_var(&self, key: &str, value: &str) -> ClResult<()> {
		setting::update_var(&self.db, key, value).await
	}

	// Profiles
	//**********
	async fn list_profiles(&self) -> ClResult<Vec<ProfileListItem>> {
		profile::list(&self.db).await
	}

	async fn search_profiles(&self, search: &ItemSearch) -> ClResult<QueryResult<ProfileListItem>> {
		profile::search(&self.db, search).await
	}

	async fn read_profile(&self, id: ItemId) -> ClResult<UserProfile> {
		profile::read(&self.db, id).await
	}

	async fn read_profiles(&self, ids: &[ItemId]) -> ClResult<Vec<UserProfile>> {
		profile::read_many(&self.db, ids).await
	}

	async fn create_profile(&self, data: &CreateProfileData) -> ClResult<ItemId> {
		profile::create(&self.db, data).await
	}

	async fn update_profile(&self, id: ItemId, data: &UpdateProfileData) -> ClResult<()> {
		profile::update(&self.db, id, data).await
	}

	async fn delete_profile(&self, id: ItemId) -> ClResult<()> {
		profile::delete(&self.db, id).await
	}

	async fn delete_profiles(&self, ids: &[ItemId]) -> ClResult<u64> {
		profile::delete_many(&self.db, ids).await
	}

	async fn count_profile_users(&self, id: ItemId) -> ClResult<u64> {
		profile::count_users(&self.db, id).await
	}

	async fn profile_name_exists(&self, name: &str, exclude_id: Option<ItemId>) -> ClResult<bool> {
		profile::name_exists(&self.db, name, exclude_id).await
	}

	// Users
	//*******
	async fn read_user_by_login(&self, login: &str) -> ClResult<User> {
		user::read_by_login(&self.db, login).await
	}

	async fn create_user(&self, data: &NewUser<'_>) -> ClResult<ItemId> {
		user::create(&self.db, data).await
	}

	// User groups
	//*************
	async fn search_user_groups(&self, search: &ItemSearch) -> ClResult<QueryResult<UserGroup>> {
		user_group::search(&self.db, search).await
	}

	async fn read_user_group(&self, id: ItemId) -> ClResult<UserGroup> {
		user_group::read(&self.db, id).await
	}

	async fn create_user_group(&self, data: &CreateUserGroupData) -> ClResult<ItemId> {
		user_group::create(&self.db, data).await
	}

	async fn update_user_group(&self, id: ItemId, data: &UpdateUserGroupData) -> ClResult<()> {
		user_group::update(&self.db, id, data).await
	}

	async fn delete_user_group(&self, id: ItemId) -> ClResult<()> {
		user_group::delete(&self.db, id).await
	}

	async fn count_user_group_refs(&self, id: ItemId) -> ClResult<u64> {
		user_group::count_refs(&self.db, id).await
	}

	async fn user_group_name_exists(
		&self,
		name: &str,
		exclude_id: Option<ItemId>,
	) -> ClResult<bool> {
		user_group::name_exists(&self.db, name, exclude_id).await
	}

	// Accounts
	//**********
	async fn find_or_create_customer(&self, name: &str) -> ClResult<ItemId> {
		account::find_or_create_customer(&self.db, name).await
	}

	async fn find_or_create_category(&self, name: &str) -> ClResult<ItemId> {
		account::find_or_create_category(&self.db, name).await
	}

	async fn create_account(&self, data: &NewAccount<'_>) -> ClResult<ItemId> {
		account::create(&self.db, data).await
	}

	async fn search_accounts(&self, search: &ItemSearch) -> ClResult<QueryResult<AccountListItem>> {
		account::search(&self.db, search).await
	}
}

// vim: ts=4
