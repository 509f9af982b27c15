//! Import and account listing handlers

use axum::{
	Json,
	extract::{
		Multipart, Query, State,
		multipart::{Field, MultipartError},
	},
	http::StatusCode,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

use credvault_core::Auth;
use credvault_core::password::random_bytes_hex;
use credvault_core::upload::{UploadFile, UploadPolicy, UploadRejection};
use credvault_types::meta_adapter::AccountListItem;
use credvault_types::types::{ApiResponse, ItemSearch};

use crate::csv_import::{CsvImport, ImportResult, parse_delimiter};
use crate::prelude::*;

/// Uploaded file, spooled to the temporary directory unless its extension
/// was rejected. The spool file is removed on drop.
struct Upload {
	name: String,
	size: u64,
	path: Option<PathBuf>,
}

impl Drop for Upload {
	fn drop(&mut self) {
		if let Some(path) = &self.path
			&& let Err(err) = std::fs::remove_file(path)
			&& err.kind() != std::io::ErrorKind::NotFound
		{
			warn!("Cannot remove upload spool file {}: {}", path.display(), err);
		}
	}
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRes {
	pub files: Vec<FileImportRes>,
	pub rejected: Vec<UploadRejection>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileImportRes {
	pub name: String,
	#[serde(flatten)]
	pub result: ImportResult,
}

fn multipart_err(err: &MultipartError) -> Error {
	warn!("Multipart error: {}", err);
	Error::ValidationError(err.body_text())
}

/// Streams a file field to `path`, writing at most `limit` bytes.
/// Returns the number of bytes read, reading stops once it is over the limit.
async fn spool_field(field: &mut Field<'_>, path: &Path, limit: u64) -> ClResult<u64> {
	let mut file = tokio::fs::File::create(path).await?;
	let mut size: u64 = 0;

	while let Some(chunk) = field.chunk().await.map_err(|err| multipart_err(&err))? {
		size += chunk.len() as u64;
		if size > limit {
			break;
		}
		file.write_all(&chunk).await?;
	}
	file.flush().await?;

	Ok(size)
}

/// POST /api/import/csv
///
/// Multipart form: one or more `file` parts, optional `delimiter` and
/// `userGroupId` fields. Files are spooled to the temporary directory and
/// checked against the upload policy while they arrive.
pub async fn post_import_csv(
	State(app): State<App>,
	Auth(auth): Auth,
	mut multipart: Multipart,
) -> ClResult<(StatusCode, Json<ApiResponse<ImportRes>>)> {
	let policy = UploadPolicy::from_settings(&app.settings).await?;
	let mut delimiter = app.settings.get_string("import.csv_delimiter").await?;
	let mut user_group_id = auth.group_id;
	let mut uploads: Vec<Upload> = Vec::new();

	while let Some(mut field) = multipart.next_field().await.map_err(|err| multipart_err(&err))? {
		let field_name = field.name().unwrap_or_default().to_string();
		match field_name.as_str() {
			"delimiter" => {
				delimiter = field.text().await.map_err(|err| multipart_err(&err))?;
			}
			"userGroupId" => {
				let value = field.text().await.map_err(|err| multipart_err(&err))?;
				let value = value.trim();
				user_group_id = if value.is_empty() {
					None
				} else {
					Some(value.parse().map_err(|_| {
						Error::ValidationError("userGroupId must be a number".into())
					})?)
				};
			}
			_ => {
				let Some(name) = field.file_name().map(ToString::to_string) else {
					debug!(field = %field_name, "Ignoring unknown form field");
					continue;
				};
				policy.check_count(uploads.len() + 1)?;

				if policy.check_file(&UploadFile { name: &name, size: 0 }).is_err() {
					debug!(file = %name, "Upload skipped, extension not allowed");
					uploads.push(Upload { name, size: 0, path: None });
					continue;
				}

				let path = app
					.opts
					.tmp_dir
					.join(format!("import_{}_{}.csv", auth.user_id, random_bytes_hex(8)));
				let mut upload = Upload { name, size: 0, path: Some(path.clone()) };
				upload.size = spool_field(&mut field, &path, policy.max_size_bytes()).await?;
				debug!(file = %upload.name, size = upload.size, "Upload spooled");
				uploads.push(upload);
			}
		}
	}

	if uploads.is_empty() {
		return Err(Error::ValidationError("no file uploaded".into()));
	}
	let delimiter = parse_delimiter(&delimiter)?;
	if let Some(group_id) = user_group_id {
		app.meta_adapter.read_user_group(group_id).await?;
	}

	let files: Vec<UploadFile<'_>> =
		uploads.iter().map(|u| UploadFile { name: &u.name, size: u.size }).collect();
	let rejected = policy.check(&files)?;

	let import = CsvImport::new(app.meta_adapter.clone(), delimiter, auth.user_id, user_group_id);
	let mut results = Vec::new();
	for upload in &uploads {
		let Some(path) = &upload.path else { continue };
		if rejected.iter().any(|r| rejection_name(r) == upload.name) {
			continue;
		}
		info!(file = %upload.name, login = %auth.login, "Importing accounts");
		let data = tokio::fs::read(path).await?;
		let result = import.do_import(&data).await?;
		results.push(FileImportRes { name: upload.name.clone(), result });
	}

	Ok((StatusCode::OK, Json(ApiResponse::new(ImportRes { files: results, rejected }))))
}

fn rejection_name(rejection: &UploadRejection) -> &str {
	match rejection {
		UploadRejection::TooLarge { name, .. } | UploadRejection::ExtensionNotAllowed { name } => {
			name
		}
	}
}

/// GET /api/account
pub async fn list_accounts(
	State(app): State<App>,
	Auth(_auth): Auth,
	Query(search): Query<ItemSearch>,
) -> ClResult<(StatusCode, Json<ApiResponse<Vec<AccountListItem>>>)> {
	let res = app.meta_adapter.search_accounts(&search).await?;

	let response = ApiResponse::with_pagination(
		res.items,
		search.limit_start as usize,
		search.limit_count as usize,
		res.total,
	);
	Ok((StatusCode::OK, Json(response)))
}

// vim: ts=4
