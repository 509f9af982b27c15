//! LDAP search filter construction (RFC 4515)

use std::fmt::Write;

pub const FILTER_USER_OBJECT: &str =
	"(|(objectClass=inetOrgPerson)(objectClass=person)(objectClass=simpleSecurityObject))";
pub const FILTER_GROUP_OBJECT: &str =
	"(|(objectClass=groupOfNames)(objectClass=groupOfUniqueNames)(objectClass=group))";
pub const FILTER_USER_ATTRIBUTES: &[&str] = &["samaccountname", "cn", "uid", "userPrincipalName"];
pub const FILTER_GROUP_ATTRIBUTES: &[&str] = &["memberOf", "groupMembership"];

/// Escapes a value for use inside a filter assertion
pub fn escape_filter(value: &str) -> String {
	ldap3::ldap_escape(value).into_owned()
}

/// `(attr=value)` for every attribute, with the value escaped
pub fn attributes_for_filter(attrs: &[&str], value: &str) -> String {
	let value = escape_filter(value);
	let mut res = String::new();
	for attr in attrs {
		let _ = write!(res, "({}={})", attr, value);
	}
	res
}

/// Group name of a `cn=<name>,...` DN, `None` for anything else
///
/// The name is the value of the first RDN up to the first unescaped comma,
/// escape sequences are kept as they are.
pub fn group_name_from_dn(dn: &str) -> Option<&str> {
	let prefix = dn.get(..3)?;
	if !prefix.eq_ignore_ascii_case("cn=") {
		return None;
	}
	let value = &dn[3..];
	let mut escaped = false;
	let mut end = value.len();
	for (i, c) in value.char_indices() {
		match c {
			_ if escaped => escaped = false,
			'\\' => escaped = true,
			',' => {
				end = i;
				break;
			}
			_ => {}
		}
	}
	let name = value[..end].trim();
	(!name.is_empty()).then_some(name)
}


// vim: ts=4
