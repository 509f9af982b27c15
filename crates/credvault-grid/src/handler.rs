//! User group API handlers

use axum::{
	Json,
	extract::{Path, Query, State},
	http::StatusCode,
};
use std::time::Instant;

use credvault_core::{Admin, Auth};
use credvault_types::meta_adapter::{CreateUserGroupData, UpdateUserGroupData, UserGroup};
use credvault_types::types::{ApiResponse, ItemSearch};

use crate::UserGroupGrid;
use crate::data_grid::DataGridTab;
use crate::group::UserGroupService;
use crate::prelude::*;

/// GET /api/group/grid
pub async fn get_group_grid(
	State(app): State<App>,
	Auth(_auth): Auth,
	Query(mut search): Query<ItemSearch>,
) -> ClResult<(StatusCode, Json<ApiResponse<DataGridTab>>)> {
	let started = Instant::now();
	if search.limit_count == 0 {
		let page_size = app.settings.get_int("grid.page_size").await?;
		search.limit_count = u32::try_from(page_size).unwrap_or(u32::MAX);
	}

	let res = UserGroupService::new(app.meta_adapter.clone()).search(&search).await?;
	let grid = UserGroupGrid::new(started).get_grid(&res, &search)?;

	let response = ApiResponse::with_pagination(
		grid,
		search.limit_start as usize,
		search.limit_count as usize,
		res.total,
	);
	Ok((StatusCode::OK, Json(response)))
}

/// GET /api/group/{id}
pub async fn get_group(
	State(app): State<App>,
	Auth(_auth): Auth,
	Path(id): Path<ItemId>,
) -> ClResult<(StatusCode, Json<ApiResponse<UserGroup>>)> {
	let group = UserGroupService::new(app.meta_adapter.clone()).get_by_id(id).await?;
	Ok((StatusCode::OK, Json(ApiResponse::new(group))))
}

/// POST /api/group
pub async fn post_group(
	State(app): State<App>,
	Admin(auth): Admin,
	Json(data): Json<CreateUserGroupData>,
) -> ClResult<(StatusCode, Json<ApiResponse<UserGroup>>)> {
	let service = UserGroupService::new(app.meta_adapter.clone());
	let id = service.create(&data).await?;
	info!(id, by = %auth.login, "User group created via API");

	let group = service.get_by_id(id).await?;
	Ok((StatusCode::CREATED, Json(ApiResponse::new(group))))
}

/// PATCH /api/group/{id}
pub async fn patch_group(
	State(app): State<App>,
	Admin(_auth): Admin,
	Path(id): Path<ItemId>,
	Json(data): Json<UpdateUserGroupData>,
) -> ClResult<(StatusCode, Json<ApiResponse<UserGroup>>)> {
	let service = UserGroupService::new(app.meta_adapter.clone());
	service.update(id, &data).await?;

	let group = service.get_by_id(id).await?;
	Ok((StatusCode::OK, Json(ApiResponse::new(group))))
}

/// DELETE /api/group/{id}
pub async fn delete_group(
	State(app): State<App>,
	Admin(_auth): Admin,
	Path(id): Path<ItemId>,
) -> ClResult<(StatusCode, Json<ApiResponse<()>>)> {
	UserGroupService::new(app.meta_adapter.clone()).delete(id).await?;
	Ok((StatusCode::OK, Json(ApiResponse::new(()))))
}

// vim: ts=4
