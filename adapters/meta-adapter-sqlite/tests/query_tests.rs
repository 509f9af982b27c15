//! Meta adapter search and paging tests

use credvault_meta_adapter_sqlite::MetaAdapterSqlite;
use credvault_types::meta_adapter::*;
use credvault_types::types::ItemSearch;
use tempfile::TempDir;

async fn create_test_adapter() -> (MetaAdapterSqlite, TempDir) {
	let temp_dir = TempDir::new().expect("Failed to create temp directory");
	let adapter = MetaAdapterSqlite::new(temp_dir.path()).await.expect("Failed to create adapter");

	(adapter, temp_dir)
}

async fn create_groups(adapter: &MetaAdapterSqlite, names: &[&str]) {
	for name in names {
		let data = CreateUserGroupData { name: (*name).into(), description: None };
		adapter.create_user_group(&data).await.unwrap();
	}
}

#[tokio::test]
async fn test_search_user_groups_paging() {
	let (adapter, _temp) = create_test_adapter().await;
	let names: Vec<String> = (1..=12).map(|i| format!("group{:02}", i)).collect();
	let names: Vec<&str> = names.iter().map(String::as_str).collect();
	create_groups(&adapter, &names).await;

	let page = adapter.search_user_groups(&ItemSearch::new("", 0, 5)).await.unwrap();
	assert_eq!(page.total, 12);
	assert_eq!(page.len(), 5);
	assert_eq!(page.items[0].name.as_ref(), "group01");

	let page = adapter.search_user_groups(&ItemSearch::new("", 10, 5)).await.unwrap();
	assert_eq!(page.total, 12);
	assert_eq!(page.len(), 2);
	assert_eq!(page.items[1].name.as_ref(), "group12");

	// Zero count returns every row
	let page = adapter.search_user_groups(&ItemSearch::new("", 0, 0)).await.unwrap();
	assert_eq!(page.len(), 12);
}

#[tokio::test]
async fn test_search_user_groups_term() {
	let (adapter, _temp) = create_test_adapter().await;
	create_groups(&adapter, &["Admins", "Developers", "Operators"]).await;
	let data = CreateUserGroupData { name: "Helpdesk".into(), description: Some("admin support".into()) };
	adapter.create_user_group(&data).await.unwrap();

	let page = adapter.search_user_groups(&ItemSearch::new("ADMIN", 0, 10)).await.unwrap();
	assert_eq!(page.total, 2);
	let names: Vec<&str> = page.items.iter().map(|g| g.name.as_ref()).collect();
	assert_eq!(names, vec!["Admins", "Helpdesk"]);

	let page = adapter.search_user_groups(&ItemSearch::new("nothing", 0, 10)).await.unwrap();
	assert_eq!(page.total, 0);
	assert!(page.is_empty());
}

#[tokio::test]
async fn test_search_wildcards_are_literal() {
	let (adapter, _temp) = create_test_adapter().await;
	create_groups(&adapter, &["100%", "1000", "a_b", "axb"]).await;

	let page = adapter.search_user_groups(&ItemSearch::new("0%", 0, 10)).await.unwrap();
	assert_eq!(page.total, 1);
	assert_eq!(page.items[0].name.as_ref(), "100%");

	let page = adapter.search_user_groups(&ItemSearch::new("a_b", 0, 10)).await.unwrap();
	assert_eq!(page.total, 1);
}

#[tokio::test]
async fn test_search_profiles_and_batch_read() {
	let (adapter, _temp) = create_test_adapter().await;
	let mut ids = Vec::new();
	for name in ["Operators", "Auditors", "Operations lead"] {
		let data = CreateProfileData { name: name.into(), profile: ProfileFlags::default() };
		ids.push(adapter.create_profile(&data).await.unwrap());
	}

	let page = adapter.search_profiles(&ItemSearch::new("oper", 0, 10)).await.unwrap();
	assert_eq!(page.total, 2);
	assert_eq!(page.items[0].name.as_ref(), "Operations lead");

	let all = adapter.list_profiles().await.unwrap();
	let names: Vec<&str> = all.iter().map(|p| p.name.as_ref()).collect();
	assert_eq!(names, vec!["Auditors", "Operations lead", "Operators"]);

	let batch = adapter.read_profiles(&[ids[0], ids[1], 999]).await.unwrap();
	assert_eq!(batch.len(), 2);
	assert!(adapter.read_profiles(&[]).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_search_accounts() {
	let (adapter, _temp) = create_test_adapter().await;
	let user = NewUser { login: "admin", name: "Admin", is_admin: true, ..NewUser::default() };
	let user_id = adapter.create_user(&user).await.unwrap();

	let acme = adapter.find_or_create_customer("Acme").await.unwrap();
	let globex = adapter.find_or_create_customer("Globex").await.unwrap();
	let servers = adapter.find_or_create_category("Servers").await.unwrap();

	for (name, customer_id, url) in [("db01", acme, "db01.acme.local"), ("web01", globex, ""), ("db02", globex, "")] {
		let account = NewAccount {
			name,
			customer_id,
			category_id: servers,
			url,
			login: "root",
			pass: "secret",
			notes: "",
			user_id,
			user_group_id: None,
		};
		adapter.create_account(&account).await.unwrap();
	}

	let page = adapter.search_accounts(&ItemSearch::new("", 0, 0)).await.unwrap();
	assert_eq!(page.total, 3);
	let names: Vec<&str> = page.items.iter().map(|a| a.name.as_ref()).collect();
	assert_eq!(names, vec!["db01", "db02", "web01"]);
	assert_eq!(page.items[0].customer.as_ref(), "Acme");
	assert_eq!(page.items[0].url.as_deref(), Some("db01.acme.local"));
	assert_eq!(page.items[1].url, None);

	let page = adapter.search_accounts(&ItemSearch::new("globex", 0, 10)).await.unwrap();
	assert_eq!(page.total, 2);

	let page = adapter.search_accounts(&ItemSearch::new("serv", 0, 1)).await.unwrap();
	assert_eq!(page.total, 3);
	assert_eq!(page.len(), 1);
}

// vim: ts=4
