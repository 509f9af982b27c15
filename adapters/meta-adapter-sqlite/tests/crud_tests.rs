//! Meta adapter CRUD operation tests
//!
//! Tests Create, Read, Update, Delete operations for profiles, users and user groups

use credvault_meta_adapter_sqlite::MetaAdapterSqlite;
use credvault_types::error::Error;
use credvault_types::meta_adapter::*;
use credvault_types::types::Patch;
use serde_json::json;
use tempfile::TempDir;

async fn create_test_adapter() -> (MetaAdapterSqlite, TempDir) {
	let temp_dir = TempDir::new().expect("Failed to create temp directory");
	let adapter = MetaAdapterSqlite::new(temp_dir.path()).await.expect("Failed to create adapter");

	(adapter, temp_dir)
}

fn profile_data(name: &str) -> CreateProfileData {
	CreateProfileData { name: name.into(), profile: ProfileFlags::default() }
}

#[tokio::test]
async fn test_settings_and_vars() {
	let (adapter, _temp) = create_test_adapter().await;

	assert_eq!(adapter.read_setting("password.length").await.unwrap(), None);
	adapter.update_setting("password.length", Some(json!(24))).await.unwrap();
	assert_eq!(adapter.read_setting("password.length").await.unwrap(), Some(json!(24)));

	adapter.update_setting("password.length", None).await.unwrap();
	assert_eq!(adapter.read_setting("password.length").await.unwrap(), None);

	assert_eq!(adapter.read_var("jwt_secret").await.unwrap(), None);
	adapter.update_var("jwt_secret", "abc").await.unwrap();
	adapter.update_var("jwt_secret", "def").await.unwrap();
	assert_eq!(adapter.read_var("jwt_secret").await.unwrap().as_deref(), Some("def"));
	assert_eq!(adapter.read_var("schema_version").await.unwrap().as_deref(), Some("1"));
}

#[tokio::test]
async fn test_create_and_read_profile() {
	let (adapter, _temp) = create_test_adapter().await;

	let mut data = profile_data("Operators");
	data.profile.acc_view = true;
	data.profile.acc_edit = true;
	let id = adapter.create_profile(&data).await.unwrap();

	let profile = adapter.read_profile(id).await.unwrap();
	assert_eq!(profile.name.as_ref(), "Operators");
	assert!(profile.profile.acc_view);
	assert!(profile.profile.acc_edit);
	assert!(!profile.profile.acc_delete);

	assert!(matches!(adapter.read_profile(id + 100).await, Err(Error::NotFound)));
}

#[tokio::test]
async fn test_duplicate_profile_name_conflicts() {
	let (adapter, _temp) = create_test_adapter().await;

	adapter.create_profile(&profile_data("Operators")).await.unwrap();
	let res = adapter.create_profile(&profile_data("operators")).await;
	assert!(matches!(res, Err(Error::Conflict(_))));
}

#[tokio::test]
async fn test_update_profile() {
	let (adapter, _temp) = create_test_adapter().await;
	let id = adapter.create_profile(&profile_data("Operators")).await.unwrap();
	let other = adapter.create_profile(&profile_data("Auditors")).await.unwrap();

	let flags = ProfileFlags { mgm_users: true, ..ProfileFlags::default() };
	let upd = UpdateProfileData { name: Some("Ops".into()), profile: Some(flags) };
	adapter.update_profile(id, &upd).await.unwrap();

	let profile = adapter.read_profile(id).await.unwrap();
	assert_eq!(profile.name.as_ref(), "Ops");
	assert!(profile.profile.mgm_users);

	// Renaming onto an existing name
	let upd = UpdateProfileData { name: Some("Auditors".into()), profile: None };
	assert!(matches!(adapter.update_profile(id, &upd).await, Err(Error::Conflict(_))));

	assert!(adapter.profile_name_exists("auditors", None).await.unwrap());
	assert!(!adapter.profile_name_exists("auditors", Some(other)).await.unwrap());

	let upd = UpdateProfileData::default();
	assert!(matches!(adapter.update_profile(999, &upd).await, Err(Error::NotFound)));
}

#[tokio::test]
async fn test_delete_profiles() {
	let (adapter, _temp) = create_test_adapter().await;
	let a = adapter.create_profile(&profile_data("A")).await.unwrap();
	let b = adapter.create_profile(&profile_data("B")).await.unwrap();
	let c = adapter.create_profile(&profile_data("C")).await.unwrap();

	adapter.delete_profile(a).await.unwrap();
	assert!(matches!(adapter.delete_profile(a).await, Err(Error::NotFound)));

	assert_eq!(adapter.delete_profiles(&[b, c, 999]).await.unwrap(), 2);
	assert_eq!(adapter.delete_profiles(&[]).await.unwrap(), 0);
	assert!(adapter.list_profiles().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_users_and_profile_usage() {
	let (adapter, _temp) = create_test_adapter().await;
	let profile_id = adapter.create_profile(&profile_data("Operators")).await.unwrap();
	assert_eq!(adapter.count_profile_users(profile_id).await.unwrap(), 0);

	let user = NewUser {
		login: "jdoe",
		name: "John Doe",
		email: Some("jdoe@example.com"),
		profile_id: Some(profile_id),
		is_ldap: true,
		..NewUser::default()
	};
	let user_id = adapter.create_user(&user).await.unwrap();

	let read = adapter.read_user_by_login("JDOE").await.unwrap();
	assert_eq!(read.id, user_id);
	assert_eq!(read.name.as_ref(), "John Doe");
	assert_eq!(read.email.as_deref(), Some("jdoe@example.com"));
	assert_eq!(read.group_id, None);
	assert!(read.is_ldap);
	assert!(!read.is_admin);

	assert_eq!(adapter.count_profile_users(profile_id).await.unwrap(), 1);
	assert!(matches!(adapter.create_user(&user).await, Err(Error::Conflict(_))));
	assert!(matches!(adapter.read_user_by_login("nobody").await, Err(Error::NotFound)));
}

#[tokio::test]
async fn test_user_group_crud() {
	let (adapter, _temp) = create_test_adapter().await;

	let data = CreateUserGroupData { name: "Admins".into(), description: Some("IT".into()) };
	let id = adapter.create_user_group(&data).await.unwrap();
	assert!(matches!(adapter.create_user_group(&data).await, Err(Error::Conflict(_))));

	let upd = UpdateUserGroupData { name: Patch::Value("Sysadmins".into()), description: Patch::Null };
	adapter.update_user_group(id, &upd).await.unwrap();
	let group = adapter.read_user_group(id).await.unwrap();
	assert_eq!(group.name.as_ref(), "Sysadmins");
	assert_eq!(group.description, None);

	let upd = UpdateUserGroupData { description: Patch::Value("Unix".into()), ..Default::default() };
	adapter.update_user_group(id, &upd).await.unwrap();
	let group = adapter.read_user_group(id).await.unwrap();
	assert_eq!(group.name.as_ref(), "Sysadmins");
	assert_eq!(group.description.as_deref(), Some("Unix"));

	assert!(adapter.user_group_name_exists("SYSADMINS", None).await.unwrap());
	assert!(!adapter.user_group_name_exists("sysadmins", Some(id)).await.unwrap());

	adapter.delete_user_group(id).await.unwrap();
	assert!(matches!(adapter.read_user_group(id).await, Err(Error::NotFound)));
	assert!(matches!(adapter.delete_user_group(id).await, Err(Error::NotFound)));
}

#[tokio::test]
async fn test_user_group_refs() {
	let (adapter, _temp) = create_test_adapter().await;
	let data = CreateUserGroupData { name: "Ops".into(), description: None };
	let group_id = adapter.create_user_group(&data).await.unwrap();
	assert_eq!(adapter.count_user_group_refs(group_id).await.unwrap(), 0);

	let user = NewUser { login: "ops", name: "Ops", group_id: Some(group_id), ..NewUser::default() };
	let user_id = adapter.create_user(&user).await.unwrap();

	let customer_id = adapter.find_or_create_customer("Acme").await.unwrap();
	let category_id = adapter.find_or_create_category("Servers").await.unwrap();
	let account = NewAccount {
		name: "db01",
		customer_id,
		category_id,
		url: "",
		login: "root",
		pass: "secret",
		notes: "",
		user_id,
		user_group_id: Some(group_id),
	};
	adapter.create_account(&account).await.unwrap();

	assert_eq!(adapter.count_user_group_refs(group_id).await.unwrap(), 2);
}

#[tokio::test]
async fn test_find_or_create_is_idempotent() {
	let (adapter, _temp) = create_test_adapter().await;

	let a = adapter.find_or_create_customer("Acme").await.unwrap();
	let b = adapter.find_or_create_customer("ACME").await.unwrap();
	let c = adapter.find_or_create_customer("Globex").await.unwrap();
	assert_eq!(a, b);
	assert_ne!(a, c);

	let a = adapter.find_or_create_category("Servers").await.unwrap();
	let b = adapter.find_or_create_category("Servers").await.unwrap();
	assert_eq!(a, b);
}

// vim: ts=4
