//! LDAP directory authentication

pub mod filter;
pub mod ldap_std;

pub use ldap_std::{LdapAuthData, LdapParams, LdapStd, LdapUser};

// vim: ts=4
