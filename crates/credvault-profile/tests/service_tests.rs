//! Profile service tests against a temporary SQLite database

use std::sync::Arc;

use credvault_meta_adapter_sqlite::MetaAdapterSqlite;
use credvault_profile::ProfileService;
use credvault_types::error::Error;
use credvault_types::meta_adapter::*;
use credvault_types::types::{ItemId, ItemSearch};
use tempfile::TempDir;

async fn create_test_service() -> (ProfileService, Arc<MetaAdapterSqlite>, TempDir) {
	let temp_dir = TempDir::new().expect("Failed to create temp directory");
	let adapter =
		Arc::new(MetaAdapterSqlite::new(temp_dir.path()).await.expect("Failed to create adapter"));
	let service = ProfileService::new(adapter.clone());

	(service, adapter, temp_dir)
}

fn new_profile(name: &str) -> CreateProfileData {
	CreateProfileData { name: name.into(), profile: ProfileFlags::default() }
}

async fn assign_user(adapter: &MetaAdapterSqlite, login: &str, profile_id: ItemId) {
	let user = NewUser { login, name: login, profile_id: Some(profile_id), ..NewUser::default() };
	adapter.create_user(&user).await.unwrap();
}

#[tokio::test]
async fn test_create_trims_and_rejects_duplicates() {
	let (service, _adapter, _temp) = create_test_service().await;

	let id = service.create(&new_profile("  Operators ")).await.unwrap();
	assert_eq!(service.get_by_id(id).await.unwrap().name.as_ref(), "Operators");

	let res = service.create(&new_profile("OPERATORS")).await;
	assert!(matches!(res, Err(Error::Conflict(_))));

	let res = service.create(&new_profile("   ")).await;
	assert!(matches!(res, Err(Error::ValidationError(_))));
}

#[tokio::test]
async fn test_update_checks_other_names() {
	let (service, _adapter, _temp) = create_test_service().await;
	let ops = service.create(&new_profile("Operators")).await.unwrap();
	service.create(&new_profile("Auditors")).await.unwrap();

	// Keeping its own name is not a duplicate
	let upd = UpdateProfileData { name: Some("operators".into()), profile: None };
	service.update(ops, &upd).await.unwrap();
	assert!(!service.check_duplicated_on_update(ops, "Operators").await.unwrap());

	let upd = UpdateProfileData { name: Some("Auditors".into()), profile: None };
	assert!(matches!(service.update(ops, &upd).await, Err(Error::Conflict(_))));
	assert!(service.check_duplicated_on_update(ops, "auditors").await.unwrap());
	assert!(service.check_duplicated_on_add("auditors").await.unwrap());
	assert!(!service.check_duplicated_on_add("Developers").await.unwrap());
}

#[tokio::test]
async fn test_delete_refuses_profiles_in_use() {
	let (service, adapter, _temp) = create_test_service().await;
	let used = service.create(&new_profile("Operators")).await.unwrap();
	let unused = service.create(&new_profile("Auditors")).await.unwrap();
	assign_user(&adapter, "jdoe", used).await;

	assert!(service.check_in_use(used).await.unwrap());
	assert!(!service.check_in_use(unused).await.unwrap());

	assert!(matches!(service.delete(used).await, Err(Error::Conflict(_))));
	service.delete(unused).await.unwrap();
	assert!(matches!(service.delete(unused).await, Err(Error::NotFound)));
}

#[tokio::test]
async fn test_delete_batch_skips_profiles_in_use() {
	let (service, adapter, _temp) = create_test_service().await;
	let a = service.create(&new_profile("A")).await.unwrap();
	let b = service.create(&new_profile("B")).await.unwrap();
	let c = service.create(&new_profile("C")).await.unwrap();
	assign_user(&adapter, "jdoe", b).await;

	assert_eq!(service.delete_by_id_batch(&[a, b, c]).await.unwrap(), 2);

	let left = service.get_all().await.unwrap();
	assert_eq!(left.len(), 1);
	assert_eq!(left[0].id, b);
}

#[tokio::test]
async fn test_search_and_batch_read() {
	let (service, _adapter, _temp) = create_test_service().await;
	let mut ids = Vec::new();
	for name in ["Admins", "Auditors", "Operators", "Sysadmins"] {
		ids.push(service.create(&new_profile(name)).await.unwrap());
	}

	let res = service.search(&ItemSearch::new("admin", 0, 1)).await.unwrap();
	assert_eq!(res.total, 2);
	assert_eq!(res.items.len(), 1);
	assert_eq!(res.items[0].name.as_ref(), "Admins");

	let batch = service.get_by_id_batch(&ids[1..3]).await.unwrap();
	let names: Vec<&str> = batch.iter().map(|p| p.name.as_ref()).collect();
	assert_eq!(names, vec!["Auditors", "Operators"]);
}

// vim: ts=4
