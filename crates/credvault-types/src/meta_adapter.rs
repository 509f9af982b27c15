//! Adapter that stores the credential manager's relational data: user
//! profiles, user groups, customers, categories, accounts and settings.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::fmt::Debug;

use crate::prelude::*;
use crate::types::{ItemSearch, QueryResult};

// Profiles //
//**********//
/// Permissions granted by a user profile
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileFlags {
	pub acc_view: bool,
	pub acc_view_pass: bool,
	pub acc_view_history: bool,
	pub acc_add: bool,
	pub acc_edit: bool,
	pub acc_edit_pass: bool,
	pub acc_delete: bool,
	pub acc_files: bool,
	pub acc_public_links: bool,
	pub mgm_users: bool,
	pub mgm_groups: bool,
	pub mgm_profiles: bool,
	pub mgm_customers: bool,
	pub mgm_categories: bool,
	pub config_general: bool,
	pub config_import: bool,
	pub config_backup: bool,
	pub evl: bool,
}

/// Row returned by profile listings
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProfileListItem {
	pub id: ItemId,
	pub name: Box<str>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UserProfile {
	pub id: ItemId,
	pub name: Box<str>,
	pub profile: ProfileFlags,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CreateProfileData {
	pub name: Box<str>,
	#[serde(default)]
	pub profile: ProfileFlags,
}

#[skip_serializing_none]
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct UpdateProfileData {
	pub name: Option<Box<str>>,
	pub profile: Option<ProfileFlags>,
}

// User groups //
//*************//
#[skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UserGroup {
	pub id: ItemId,
	pub name: Box<str>,
	pub description: Option<Box<str>>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CreateUserGroupData {
	pub name: Box<str>,
	pub description: Option<Box<str>>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct UpdateUserGroupData {
	#[serde(default)]
	pub name: Patch<Box<str>>,
	#[serde(default)]
	pub description: Patch<Box<str>>,
}

// Users //
//*******//
#[skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
	pub id: ItemId,
	pub login: Box<str>,
	pub name: Box<str>,
	pub email: Option<Box<str>>,
	pub profile_id: Option<ItemId>,
	pub group_id: Option<ItemId>,
	pub is_admin: bool,
	pub is_ldap: bool,
}

#[derive(Clone, Debug, Default)]
pub struct NewUser<'a> {
	pub login: &'a str,
	pub name: &'a str,
	pub email: Option<&'a str>,
	pub profile_id: Option<ItemId>,
	pub group_id: Option<ItemId>,
	pub is_admin: bool,
	pub is_ldap: bool,
}

// Accounts //
//**********//
/// Account row of a listing, without secrets
#[skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountListItem {
	pub id: ItemId,
	pub name: Box<str>,
	pub customer: Box<str>,
	pub category: Box<str>,
	pub url: Option<Box<str>>,
	pub login: Option<Box<str>>,
	pub user_id: ItemId,
	pub user_group_id: Option<ItemId>,
}

/// Account row produced by an import
#[derive(Clone, Debug, PartialEq)]
pub struct NewAccount<'a> {
	pub name: &'a str,
	pub customer_id: ItemId,
	pub category_id: ItemId,
	pub url: &'a str,
	pub login: &'a str,
	pub pass: &'a str,
	pub notes: &'a str,
	pub user_id: ItemId,
	pub user_group_id: Option<ItemId>,
}

#[async_trait]
pub trait MetaAdapter: Debug + Send + Sync {
	// Settings
	//**********
	/// Reads a stored setting value, `None` if it was never set
	async fn read_setting(&self, key: &str) -> ClResult<Option<serde_json::Value>>;
	/// Stores a setting value, `None` removes it
	async fn update_setting(&self, key: &str, value: Option<serde_json::Value>) -> ClResult<()>;

	/// Reads an internal variable (secrets, schema version, ...)
	async fn read_var(&self, key: &str) -> ClResult<Option<Box<str>>>;
	async fn update_var(&self, key: &str, value: &str) -> ClResult<()>;

	// Profiles
	//**********
	/// Lists every profile ordered by name
	async fn list_profiles(&self) -> ClResult<Vec<ProfileListItem>>;
	/// Searches profiles by name, returning one page and the total match count
	async fn search_profiles(&self, search: &ItemSearch) -> ClResult<QueryResult<ProfileListItem>>;
	async fn read_profile(&self, id: ItemId) -> ClResult<UserProfile>;
	/// Reads the profiles with the given ids, silently skipping unknown ids
	async fn read_profiles(&self, ids: &[ItemId]) -> ClResult<Vec<UserProfile>>;
	async fn create_profile(&self, data: &CreateProfileData) -> ClResult<ItemId>;
	async fn update_profile(&self, id: ItemId, data: &UpdateProfileData) -> ClResult<()>;
	async fn delete_profile(&self, id: ItemId) -> ClResult<()>;
	/// Deletes the given profiles, returns the number of deleted rows
	async fn delete_profiles(&self, ids: &[ItemId]) -> ClResult<u64>;
	/// Number of users assigned to a profile
	async fn count_profile_users(&self, id: ItemId) -> ClResult<u64>;
	/// Checks whether a profile name is taken, ignoring `exclude_id`
	async fn profile_name_exists(&self, name: &str, exclude_id: Option<ItemId>) -> ClResult<bool>;

	// Users
	//*******
	async fn read_user_by_login(&self, login: &str) -> ClResult<User>;
	async fn create_user(&self, user: &NewUser<'_>) -> ClResult<ItemId>;

	// User groups
	//*************
	async fn search_user_groups(&self, search: &ItemSearch) -> ClResult<QueryResult<UserGroup>>;
	async fn read_user_group(&self, id: ItemId) -> ClResult<UserGroup>;
	async fn create_user_group(&self, data: &CreateUserGroupData) -> ClResult<ItemId>;
	async fn update_user_group(&self, id: ItemId, data: &UpdateUserGroupData) -> ClResult<()>;
	async fn delete_user_group(&self, id: ItemId) -> ClResult<()>;
	/// Number of users and accounts referring to a user group
	async fn count_user_group_refs(&self, id: ItemId) -> ClResult<u64>;
	async fn user_group_name_exists(&self, name: &str, exclude_id: Option<ItemId>)
	-> ClResult<bool>;

	// Import support
	//****************
	/// Returns the id of the customer with the given name, creating it if needed
	async fn find_or_create_customer(&self, name: &str) -> ClResult<ItemId>;
	/// Returns the id of the category with the given name, creating it if needed
	async fn find_or_create_category(&self, name: &str) -> ClResult<ItemId>;
	async fn create_account(&self, account: &NewAccount<'_>) -> ClResult<ItemId>;
	/// Searches accounts by name, customer or category
	async fn search_accounts(&self, search: &ItemSearch) -> ClResult<QueryResult<AccountListItem>>;
}

// vim: ts=4
