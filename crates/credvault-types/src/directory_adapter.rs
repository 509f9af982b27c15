//! Adapter that talks to a user directory (LDAP).
//!
//! Filters are passed as ready-made RFC 4515 strings; building and escaping
//! them is the caller's job.

use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt::Debug;

use crate::prelude::*;

/// One object returned by a directory search
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DirectoryEntry {
	pub dn: Box<str>,
	/// Attribute values keyed by attribute name as returned by the server
	pub attrs: HashMap<Box<str>, Vec<Box<str>>>,
}

impl DirectoryEntry {
	/// All values of an attribute, matching the name case-insensitively
	pub fn values(&self, name: &str) -> &[Box<str>] {
		self.attrs
			.iter()
			.find(|(key, _)| key.eq_ignore_ascii_case(name))
			.map_or(&[], |(_, values)| values.as_slice())
	}

	/// First value of an attribute
	pub fn first(&self, name: &str) -> Option<&str> {
		self.values(name).first().map(AsRef::as_ref)
	}
}

#[async_trait]
pub trait DirectoryAdapter: Debug + Send + Sync {
	/// Runs a subtree search below `base` and returns the matching entries
	async fn search(&self, base: &str, filter: &str, attrs: &[&str])
	-> ClResult<Vec<DirectoryEntry>>;

	/// Tries a simple bind with the given credentials.
	///
	/// Returns `Ok(false)` when the server rejects the credentials and an error
	/// only when the server could not be reached.
	async fn check_bind(&self, dn: &str, password: &str) -> ClResult<bool>;
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_entry_attribute_lookup() {
		let mut attrs = HashMap::new();
		attrs.insert("memberOf".into(), vec!["cn=ops,dc=example,dc=org".into()]);
		attrs.insert("mail".into(), vec!["a@example.org".into(), "b@example.org".into()]);
		let entry = DirectoryEntry { dn: "uid=alice,dc=example,dc=org".into(), attrs };

		assert_eq!(entry.values("MEMBEROF").len(), 1);
		assert_eq!(entry.first("mail"), Some("a@example.org"));
		assert_eq!(entry.first("cn"), None);
		assert!(entry.values("cn").is_empty());
	}
}

// vim: ts=4
