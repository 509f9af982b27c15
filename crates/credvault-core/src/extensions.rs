//! Type-erased extension map for AppState
//!
//! Feature crates register their own state here (token keys, caches) so the
//! core AppState does not depend on feature-specific types.

use std::any::{Any, TypeId};
use std::collections::HashMap;

pub struct Extensions {
	map: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl Extensions {
	pub fn new() -> Self {
		Self { map: HashMap::new() }
	}

	pub fn insert<T: Send + Sync + 'static>(&mut self, val: T) {
		self.map.insert(TypeId::of::<T>(), Box::new(val));
	}

	pub fn get<T: Send + Sync + 'static>(&self) -> Option<&T> {
		self.map.get(&TypeId::of::<T>())?.downcast_ref::<T>()
	}
}

impl Default for Extensions {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	struct TokenKey(&'static str);

	#[test]
	fn test_insert_and_get() {
		let mut ext = Extensions::new();
		assert!(ext.get::<TokenKey>().is_none());
		ext.insert(TokenKey("secret"));
		assert_eq!(ext.get::<TokenKey>().map(|k| k.0), Some("secret"));
	}
}

// vim: ts=4
