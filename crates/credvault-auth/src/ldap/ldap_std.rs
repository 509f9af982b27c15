//! Authentication against a standard LDAP directory (OpenLDAP, 389-ds and
//! anything else speaking the inetOrgPerson / groupOfNames schema)

use serde::Serialize;
use std::sync::Arc;
use tokio::sync::OnceCell;

use credvault_core::settings::service::SettingsService;
use credvault_types::directory_adapter::{DirectoryAdapter, DirectoryEntry};

use super::filter::{
	FILTER_GROUP_ATTRIBUTES, FILTER_GROUP_OBJECT, FILTER_USER_ATTRIBUTES, FILTER_USER_OBJECT,
	attributes_for_filter, escape_filter, group_name_from_dn,
};
use crate::prelude::*;

const USER_SEARCH_ATTRS: &[&str] =
	&["displayName", "fullname", "cn", "mail", "memberOf", "groupMembership"];

#[derive(Clone, Debug, Default)]
pub struct LdapParams {
	pub base_dn: String,
	/// Group name or DN. Empty disables the check, "*" accepts any group.
	pub group: String,
}

impl LdapParams {
	pub async fn from_settings(settings: &SettingsService) -> ClResult<Self> {
		Ok(Self {
			base_dn: settings.get_string("ldap.base_dn").await?,
			group: settings.get_string("ldap.group").await?.trim().to_string(),
		})
	}
}

/// Directory data of a user
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LdapUser {
	pub dn: Box<str>,
	pub name: Box<str>,
	pub email: Option<Box<str>>,
	/// DNs of the groups the directory lists for the user
	pub groups: Vec<Box<str>>,
}

impl LdapUser {
	fn from_entry(entry: DirectoryEntry, login: &str) -> Self {
		let name = ["displayName", "fullname", "cn"]
			.iter()
			.find_map(|attr| entry.first(attr))
			.unwrap_or(login)
			.into();
		let email = entry.first("mail").map(Box::from);
		let groups = FILTER_GROUP_ATTRIBUTES
			.iter()
			.flat_map(|attr| entry.values(attr).iter().cloned())
			.collect();
		Self { dn: entry.dn, name, email, groups }
	}
}

#[derive(Clone, Debug)]
pub struct LdapAuthData {
	pub user: LdapUser,
	pub in_group: bool,
}

pub struct LdapStd {
	params: LdapParams,
	directory: Arc<dyn DirectoryAdapter>,
	group_dn: OnceCell<Box<str>>,
}

impl LdapStd {
	pub fn new(params: LdapParams, directory: Arc<dyn DirectoryAdapter>) -> Self {
		Self { params, directory, group_dn: OnceCell::new() }
	}

	pub fn group_object_filter(&self) -> &'static str {
		FILTER_GROUP_OBJECT
	}

	/// Filter matching the users allowed to log in
	pub async fn group_membership_filter(&self) -> ClResult<String> {
		if self.params.group.is_empty() {
			return Ok(FILTER_USER_OBJECT.to_string());
		}

		let group_dn = self.group_dn().await?;
		Ok(format!(
			"(&(|{}){})",
			attributes_for_filter(FILTER_GROUP_ATTRIBUTES, group_dn),
			FILTER_USER_OBJECT
		))
	}

	pub fn user_dn_filter(&self, login: &str) -> String {
		format!("(&(|{}){})", attributes_for_filter(FILTER_USER_ATTRIBUTES, login), FILTER_USER_OBJECT)
	}

	/// Configured group, reduced to its common name when given as a DN
	pub fn group_from_params(&self) -> Option<&str> {
		let group = self.params.group.as_str();
		if group.is_empty() {
			return None;
		}
		Some(group_name_from_dn(group).unwrap_or(group))
	}

	async fn search_group_dn(&self) -> ClResult<Box<str>> {
		let group = self
			.group_from_params()
			.ok_or_else(|| Error::ConfigError("no LDAP group configured".into()))?;
		let filter = format!("(cn={})", escape_filter(group));
		let entries = self.directory.search(&self.params.base_dn, &filter, &["dn"]).await?;
		match entries.into_iter().next() {
			Some(entry) => Ok(entry.dn),
			None => {
				warn!(group = %group, filter = %filter, "LDAP group not found");
				Err(Error::LdapError("group not found".into()))
			}
		}
	}

	/// DN of the configured group, looked up once
	pub async fn group_dn(&self) -> ClResult<&str> {
		let dn = self.group_dn.get_or_try_init(|| self.search_group_dn()).await?;
		Ok(dn)
	}

	/// Checks whether a user belongs to the configured group, first by the
	/// user's own group list and then by asking the directory
	pub async fn is_user_in_group(&self, user_dn: &str, groups_dn: &[Box<str>]) -> ClResult<bool> {
		let group = self.params.group.as_str();
		if group.is_empty() || group == "*" {
			info!(user = %user_dn, group = %group, "User verified in group");
			return Ok(true);
		}

		let group_dn = self.group_dn().await?;
		if groups_dn.iter().any(|dn| dn.eq_ignore_ascii_case(group_dn)) {
			info!(user = %user_dn, group = %group_dn, "User verified in group");
			return Ok(true);
		}

		self.check_user_in_group_by_filter(user_dn).await
	}

	/// Searches the group object listing the user as a member
	pub async fn check_user_in_group_by_filter(&self, user_dn: &str) -> ClResult<bool> {
		let group_name = escape_filter(self.group_from_params().unwrap_or_default());
		let user = escape_filter(user_dn);
		let filter = format!(
			"(&(cn={group_name})(|(memberUid={user})(member={user})(uniqueMember={user})){})",
			FILTER_GROUP_OBJECT
		);

		let entries = self.directory.search(&self.params.base_dn, &filter, &["dn"]).await?;
		if entries.is_empty() {
			warn!(user = %user_dn, group = %group_name, filter = %filter, "User not in group");
			return Ok(false);
		}
		info!(user = %user_dn, group = %group_name, "User verified in group");
		Ok(true)
	}

	pub async fn find_user(&self, login: &str) -> ClResult<LdapUser> {
		let filter = self.user_dn_filter(login);
		let mut entries =
			self.directory.search(&self.params.base_dn, &filter, USER_SEARCH_ATTRS).await?;

		match entries.len() {
			0 => Err(Error::NotFound),
			1 => {
				let entry = entries.remove(0);
				Ok(LdapUser::from_entry(entry, login))
			}
			n => {
				warn!(login = %login, count = n, "Login matches several LDAP objects");
				Err(Error::LdapError(format!("{} directory objects match the login", n)))
			}
		}
	}

	/// Verifies the password with a bind as the user and checks the group
	pub async fn authenticate(&self, login: &str, password: &str) -> ClResult<LdapAuthData> {
		if password.is_empty() {
			return Err(Error::Unauthorized);
		}

		let user = match self.find_user(login).await {
			Ok(user) => user,
			Err(Error::NotFound) => {
				warn!(login = %login, "LDAP user not found");
				return Err(Error::Unauthorized);
			}
			Err(err) => return Err(err),
		};

		if !self.directory.check_bind(&user.dn, password).await? {
			warn!(login = %login, dn = %user.dn, "LDAP bind rejected");
			return Err(Error::Unauthorized);
		}

		let in_group = self.is_user_in_group(&user.dn, &user.groups).await?;
		Ok(LdapAuthData { user, in_group })
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use async_trait::async_trait;
	use std::collections::HashMap;
	use std::sync::Mutex;

	const BASE: &str = "dc=example,dc=org";
	const GROUP_DN: &str = "cn=vault,ou=groups,dc=example,dc=org";
	const ALICE_DN: &str = "uid=alice,ou=people,dc=example,dc=org";

	/// Directory answering canned results per filter
	#[derive(Debug, Default)]
	struct MockDirectory {
		results: HashMap<String, Vec<DirectoryEntry>>,
		passwords: HashMap<String, String>,
		searches: Mutex<Vec<String>>,
	}

	impl MockDirectory {
		fn with(mut self, filter: &str, entries: Vec<DirectoryEntry>) -> Self {
			self.results.insert(filter.to_string(), entries);
			self
		}

		fn search_count(&self) -> usize {
			self.searches.lock().unwrap().len()
		}
	}

	#[async_trait]
	impl DirectoryAdapter for MockDirectory {
		async fn search(
			&self,
			base: &str,
			filter: &str,
			_attrs: &[&str],
		) -> ClResult<Vec<DirectoryEntry>> {
			assert_eq!(base, BASE);
			self.searches.lock().unwrap().push(filter.to_string());
			Ok(self.results.get(filter).cloned().unwrap_or_default())
		}

		async fn check_bind(&self, dn: &str, password: &str) -> ClResult<bool> {
			Ok(self.passwords.get(dn).is_some_and(|p| p == password))
		}
	}

	fn entry(dn: &str, attrs: &[(&str, &str)]) -> DirectoryEntry {
		let mut res = DirectoryEntry { dn: dn.into(), attrs: HashMap::new() };
		for (name, value) in attrs {
			res.attrs.entry((*name).into()).or_insert_with(Vec::new).push((*value).into());
		}
		res
	}

	fn provider(group: &str, dir: MockDirectory) -> (LdapStd, Arc<MockDirectory>) {
		let dir = Arc::new(dir);
		let params = LdapParams { base_dn: BASE.into(), group: group.into() };
		(LdapStd::new(params, dir.clone()), dir)
	}

	fn alice_filter() -> String {
		format!(
			"(&(|(samaccountname=alice)(cn=alice)(uid=alice)(userPrincipalName=alice)){})",
			FILTER_USER_OBJECT
		)
	}

	fn by_filter(group: &str, user: &str) -> String {
		format!(
			"(&(cn={group})(|(memberUid={user})(member={user})(uniqueMember={user})){})",
			FILTER_GROUP_OBJECT
		)
	}

	#[test]
	fn test_user_dn_filter() {
		let (ldap, _) = provider("", MockDirectory::default());
		assert_eq!(ldap.user_dn_filter("alice"), alice_filter());
		assert!(ldap.user_dn_filter("a)(uid=*").contains("(uid=a\\29\\28uid=\\2a)"));
	}

	#[test]
	fn test_group_from_params() {
		let (ldap, _) = provider(GROUP_DN, MockDirectory::default());
		assert_eq!(ldap.group_from_params(), Some("vault"));
		let (ldap, _) = provider("vault", MockDirectory::default());
		assert_eq!(ldap.group_from_params(), Some("vault"));
		let (ldap, _) = provider("", MockDirectory::default());
		assert_eq!(ldap.group_from_params(), None);
	}

	#[tokio::test]
	async fn test_group_membership_filter() {
		let (ldap, _) = provider("", MockDirectory::default());
		assert_eq!(ldap.group_membership_filter().await.unwrap(), FILTER_USER_OBJECT);

		let dir = MockDirectory::default().with("(cn=vault)", vec![entry(GROUP_DN, &[])]);
		let (ldap, _) = provider("vault", dir);
		assert_eq!(
			ldap.group_membership_filter().await.unwrap(),
			format!("(&(|(memberOf={GROUP_DN})(groupMembership={GROUP_DN})){FILTER_USER_OBJECT})")
		);
	}

	#[tokio::test]
	async fn test_group_dn_is_memoised() {
		let dir = MockDirectory::default().with("(cn=vault)", vec![entry(GROUP_DN, &[])]);
		let (ldap, dir) = provider("vault", dir);
		assert_eq!(ldap.group_dn().await.unwrap(), GROUP_DN);
		assert_eq!(ldap.group_dn().await.unwrap(), GROUP_DN);
		assert_eq!(dir.search_count(), 1);
	}

	#[tokio::test]
	async fn test_group_not_found() {
		let (ldap, _) = provider("missing", MockDirectory::default());
		assert!(matches!(ldap.group_dn().await, Err(Error::LdapError(_))));
	}

	#[tokio::test]
	async fn test_in_group_without_group_configured() {
		let (ldap, dir) = provider("", MockDirectory::default());
		assert!(ldap.is_user_in_group(ALICE_DN, &[]).await.unwrap());
		let (ldap_any, _) = provider("*", MockDirectory::default());
		assert!(ldap_any.is_user_in_group(ALICE_DN, &[]).await.unwrap());
		assert_eq!(dir.search_count(), 0);
	}

	#[tokio::test]
	async fn test_in_group_by_member_of() {
		let dir = MockDirectory::default().with("(cn=vault)", vec![entry(GROUP_DN, &[])]);
		let (ldap, dir) = provider("vault", dir);
		let groups = vec![Box::from("CN=Vault,OU=Groups,DC=example,DC=org")];
		assert!(ldap.is_user_in_group(ALICE_DN, &groups).await.unwrap());
		// Only the group DN lookup
		assert_eq!(dir.search_count(), 1);
	}

	#[tokio::test]
	async fn test_in_group_by_filter() {
		let dir = MockDirectory::default()
			.with("(cn=vault)", vec![entry(GROUP_DN, &[])])
			.with(&by_filter("vault", ALICE_DN), vec![entry(GROUP_DN, &[])]);
		let (ldap, _) = provider(GROUP_DN, dir);
		assert!(ldap.is_user_in_group(ALICE_DN, &[]).await.unwrap());
		assert!(!ldap.is_user_in_group("uid=bob,ou=people,dc=example,dc=org", &[]).await.unwrap());
	}

	#[tokio::test]
	async fn test_find_user() {
		let dir = MockDirectory::default().with(
			&alice_filter(),
			vec![entry(
				ALICE_DN,
				&[
					("cn", "alice"),
					("displayName", "Alice Smith"),
					("mail", "alice@example.org"),
					("memberOf", GROUP_DN),
				],
			)],
		);
		let (ldap, _) = provider("", dir);
		let user = ldap.find_user("alice").await.unwrap();
		assert_eq!(&*user.dn, ALICE_DN);
		assert_eq!(&*user.name, "Alice Smith");
		assert_eq!(user.email.as_deref(), Some("alice@example.org"));
		assert_eq!(user.groups, vec![Box::from(GROUP_DN)]);

		assert!(matches!(ldap.find_user("bob").await, Err(Error::NotFound)));
	}

	#[tokio::test]
	async fn test_find_user_ambiguous() {
		let dir = MockDirectory::default()
			.with(&alice_filter(), vec![entry(ALICE_DN, &[]), entry("uid=alice,ou=old", &[])]);
		let (ldap, _) = provider("", dir);
		assert!(matches!(ldap.find_user("alice").await, Err(Error::LdapError(_))));
	}

	#[tokio::test]
	async fn test_authenticate() {
		let mut dir = MockDirectory::default()
			.with("(cn=vault)", vec![entry(GROUP_DN, &[])])
			.with(&alice_filter(), vec![entry(ALICE_DN, &[("cn", "alice")])]);
		dir.passwords.insert(ALICE_DN.into(), "s3cret".into());
		let (ldap, _) = provider("vault", dir);

		let data = ldap.authenticate("alice", "s3cret").await.unwrap();
		assert_eq!(&*data.user.name, "alice");
		assert!(!data.in_group);

		assert!(matches!(ldap.authenticate("alice", "wrong").await, Err(Error::Unauthorized)));
		assert!(matches!(ldap.authenticate("alice", "").await, Err(Error::Unauthorized)));
		assert!(matches!(ldap.authenticate("bob", "s3cret").await, Err(Error::Unauthorized)));
	}
}

// vim: ts=4
