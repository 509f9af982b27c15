//! User group service

use std::sync::Arc;

use credvault_types::meta_adapter::{
	CreateUserGroupData, MetaAdapter, UpdateUserGroupData, UserGroup,
};
use credvault_types::types::{ItemSearch, QueryResult};

use crate::prelude::*;

fn check_name(name: &str) -> ClResult<&str> {
	let name = name.trim();
	if name.is_empty() {
		return Err(Error::ValidationError("group name is required".into()));
	}
	Ok(name)
}

#[derive(Debug, Clone)]
pub struct UserGroupService {
	meta: Arc<dyn MetaAdapter>,
}

impl UserGroupService {
	pub fn new(meta: Arc<dyn MetaAdapter>) -> Self {
		Self { meta }
	}

	pub async fn search(&self, search: &ItemSearch) -> ClResult<QueryResult<UserGroup>> {
		self.meta.search_user_groups(search).await
	}

	pub async fn get_by_id(&self, id: ItemId) -> ClResult<UserGroup> {
		self.meta.read_user_group(id).await
	}

	pub async fn create(&self, data: &CreateUserGroupData) -> ClResult<ItemId> {
		let name = check_name(&data.name)?;
		if self.meta.user_group_name_exists(name, None).await? {
			return Err(Error::Conflict(format!("group '{}' already exists", name)));
		}

		let data = CreateUserGroupData {
			name: name.into(),
			description: data.description.as_deref().map(str::trim).map(Into::into),
		};
		let id = self.meta.create_user_group(&data).await?;
		info!(id, name = %data.name, "User group created");
		Ok(id)
	}

	pub async fn update(&self, id: ItemId, data: &UpdateUserGroupData) -> ClResult<()> {
		let name = match &data.name {
			Patch::Null => return Err(Error::ValidationError("group name is required".into())),
			Patch::Undefined => Patch::Undefined,
			Patch::Value(name) => {
				let name = check_name(name)?;
				if self.meta.user_group_name_exists(name, Some(id)).await? {
					return Err(Error::Conflict(format!("group '{}' already exists", name)));
				}
				Patch::Value(name.into())
			}
		};

		let data = UpdateUserGroupData { name, description: data.description.clone() };
		self.meta.update_user_group(id, &data).await?;
		info!(id, "User group updated");
		Ok(())
	}

	/// Deletes a group unless users or accounts still refer to it
	pub async fn delete(&self, id: ItemId) -> ClResult<()> {
		self.meta.read_user_group(id).await?;
		let refs = self.meta.count_user_group_refs(id).await?;
		if refs > 0 {
			warn!(id, refs, "User group in use, not deleted");
			return Err(Error::Conflict("group is in use".into()));
		}

		self.meta.delete_user_group(id).await?;
		info!(id, "User group deleted");
		Ok(())
	}
}

// vim: ts=4
