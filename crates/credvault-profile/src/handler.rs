//! Profile API handlers

use axum::{
	Json,
	extract::{Path, Query, State},
	http::StatusCode,
};
use serde::{Deserialize, Serialize};

use credvault_core::{Admin, Auth};
use credvault_types::meta_adapter::{
	CreateProfileData, ProfileListItem, UpdateProfileData, UserProfile,
};
use credvault_types::types::{ApiResponse, ItemSearch};

use crate::ProfileService;
use crate::prelude::*;

/// GET /api/profile
pub async fn list_profiles(
	State(app): State<App>,
	Auth(_auth): Auth,
	Query(search): Query<ItemSearch>,
) -> ClResult<(StatusCode, Json<ApiResponse<Vec<ProfileListItem>>>)> {
	let service = ProfileService::new(app.meta_adapter.clone());
	let res = service.search(&search).await?;

	let response = ApiResponse::with_pagination(
		res.items,
		search.limit_start as usize,
		search.limit_count as usize,
		res.total,
	);
	Ok((StatusCode::OK, Json(response)))
}

/// GET /api/profile/{id}
pub async fn get_profile(
	State(app): State<App>,
	Auth(_auth): Auth,
	Path(id): Path<ItemId>,
) -> ClResult<(StatusCode, Json<ApiResponse<UserProfile>>)> {
	let profile = ProfileService::new(app.meta_adapter.clone()).get_by_id(id).await?;
	Ok((StatusCode::OK, Json(ApiResponse::new(profile))))
}

/// POST /api/profile
pub async fn post_profile(
	State(app): State<App>,
	Admin(auth): Admin,
	Json(data): Json<CreateProfileData>,
) -> ClResult<(StatusCode, Json<ApiResponse<UserProfile>>)> {
	let service = ProfileService::new(app.meta_adapter.clone());
	let id = service.create(&data).await?;
	info!(id, by = %auth.login, "Profile created via API");

	let profile = service.get_by_id(id).await?;
	Ok((StatusCode::CREATED, Json(ApiResponse::new(profile))))
}

/// PATCH /api/profile/{id}
pub async fn patch_profile(
	State(app): State<App>,
	Admin(_auth): Admin,
	Path(id): Path<ItemId>,
	Json(data): Json<UpdateProfileData>,
) -> ClResult<(StatusCode, Json<ApiResponse<UserProfile>>)> {
	let service = ProfileService::new(app.meta_adapter.clone());
	service.update(id, &data).await?;

	let profile = service.get_by_id(id).await?;
	Ok((StatusCode::OK, Json(ApiResponse::new(profile))))
}

/// DELETE /api/profile/{id}
pub async fn delete_profile(
	State(app): State<App>,
	Admin(_auth): Admin,
	Path(id): Path<ItemId>,
) -> ClResult<(StatusCode, Json<ApiResponse<()>>)> {
	ProfileService::new(app.meta_adapter.clone()).delete(id).await?;
	Ok((StatusCode::OK, Json(ApiResponse::new(()))))
}

#[derive(Debug, Deserialize)]
pub struct DeleteProfilesReq {
	pub ids: Vec<ItemId>,
}

#[derive(Debug, Serialize)]
pub struct DeleteProfilesRes {
	pub deleted: u64,
}

/// POST /api/profile/delete
pub async fn post_delete_profiles(
	State(app): State<App>,
	Admin(_auth): Admin,
	Json(req): Json<DeleteProfilesReq>,
) -> ClResult<(StatusCode, Json<ApiResponse<DeleteProfilesRes>>)> {
	if req.ids.is_empty() {
		return Err(Error::ValidationError("no profiles selected".into()));
	}

	let deleted = ProfileService::new(app.meta_adapter.clone()).delete_by_id_batch(&req.ids).await?;
	Ok((StatusCode::OK, Json(ApiResponse::new(DeleteProfilesRes { deleted }))))
}

// vim: ts=4
