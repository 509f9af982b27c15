//! Profile service
//!
//! Business rules over the metadata adapter: names are unique
//! (case-insensitively) and a profile assigned to users cannot be deleted.

use std::sync::Arc;

use credvault_types::meta_adapter::{
	CreateProfileData, MetaAdapter, ProfileListItem, UpdateProfileData, UserProfile,
};
use credvault_types::types::{ItemSearch, QueryResult};

use crate::prelude::*;

fn check_name(name: &str) -> ClResult<&str> {
	let name = name.trim();
	if name.is_empty() {
		return Err(Error::ValidationError("profile name is required".into()));
	}
	Ok(name)
}

#[derive(Debug, Clone)]
pub struct ProfileService {
	meta: Arc<dyn MetaAdapter>,
}

impl ProfileService {
	pub fn new(meta: Arc<dyn MetaAdapter>) -> Self {
		Self { meta }
	}

	pub async fn get_all(&self) -> ClResult<Vec<ProfileListItem>> {
		self.meta.list_profiles().await
	}

	pub async fn search(&self, search: &ItemSearch) -> ClResult<QueryResult<ProfileListItem>> {
		self.meta.search_profiles(search).await
	}

	pub async fn get_by_id(&self, id: ItemId) -> ClResult<UserProfile> {
		self.meta.read_profile(id).await
	}

	pub async fn get_by_id_batch(&self, ids: &[ItemId]) -> ClResult<Vec<UserProfile>> {
		self.meta.read_profiles(ids).await
	}

	pub async fn create(&self, data: &CreateProfileData) -> ClResult<ItemId> {
		let name = check_name(&data.name)?;
		if self.check_duplicated_on_add(name).await? {
			return Err(Error::Conflict(format!("profile '{}' already exists", name)));
		}

		let data = CreateProfileData { name: name.into(), profile: data.profile.clone() };
		let id = self.meta.create_profile(&data).await?;
		info!(id, name = %data.name, "Profile created");
		Ok(id)
	}

	pub async fn update(&self, id: ItemId, data: &UpdateProfileData) -> ClResult<()> {
		let name = data.name.as_deref().map(check_name).transpose()?;
		if let Some(name) = name
			&& self.check_duplicated_on_update(id, name).await?
		{
			return Err(Error::Conflict(format!("profile '{}' already exists", name)));
		}

		let data = UpdateProfileData { name: name.map(Into::into), profile: data.profile.clone() };
		self.meta.update_profile(id, &data).await?;
		info!(id, "Profile updated");
		Ok(())
	}

	pub async fn delete(&self, id: ItemId) -> ClResult<()> {
		// Missing profiles are reported as such, not as "in use"
		self.meta.read_profile(id).await?;
		if self.check_in_use(id).await? {
			return Err(Error::Conflict("profile is in use".into()));
		}

		self.meta.delete_profile(id).await?;
		info!(id, "Profile deleted");
		Ok(())
	}

	/// Deletes the profiles that are not assigned to any user, returns the
	/// number of deleted profiles
	pub async fn delete_by_id_batch(&self, ids: &[ItemId]) -> ClResult<u64> {
		let mut free = Vec::with_capacity(ids.len());
		for &id in ids {
			if self.check_in_use(id).await? {
				debug!(id, "Profile in use, skipped");
			} else {
				free.push(id);
			}
		}

		let deleted = self.meta.delete_profiles(&free).await?;
		info!(requested = ids.len(), deleted, "Profiles deleted");
		Ok(deleted)
	}

	pub async fn check_in_use(&self, id: ItemId) -> ClResult<bool> {
		Ok(self.meta.count_profile_users(id).await? > 0)
	}

	pub async fn check_duplicated_on_add(&self, name: &str) -> ClResult<bool> {
		self.meta.profile_name_exists(name.trim(), None).await
	}

	pub async fn check_duplicated_on_update(&self, id: ItemId, name: &str) -> ClResult<bool> {
		self.meta.profile_name_exists(name.trim(), Some(id)).await
	}
}

// vim: ts=4
