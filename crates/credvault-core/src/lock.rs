//! Application lock file
//!
//! While the lock file exists only its owner may use the application, e.g.
//! during a backup or a configuration change.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::prelude::*;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppLock {
	pub time: Timestamp,
	pub user_id: ItemId,
	pub subject: String,
}

pub async fn lock_app(path: &Path, user_id: ItemId, subject: &str) -> ClResult<AppLock> {
	let lock = AppLock { time: Timestamp::now(), user_id, subject: subject.to_string() };
	tokio::fs::write(path, serde_json::to_vec(&lock)?).await?;
	info!(user_id = user_id, subject = %subject, "Application locked");
	Ok(lock)
}

/// Removes the lock, returns whether one existed
pub async fn unlock_app(path: &Path) -> ClResult<bool> {
	match tokio::fs::remove_file(path).await {
		Ok(()) => {
			info!("Application unlocked");
			Ok(true)
		}
		Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
		Err(err) => Err(err.into()),
	}
}

/// Current lock, `None` if the file is missing or unreadable
pub async fn get_app_lock(path: &Path) -> Option<AppLock> {
	let data = tokio::fs::read(path).await.ok()?;
	match serde_json::from_slice(&data) {
		Ok(lock) => Some(lock),
		Err(err) => {
			warn!("Ignoring invalid lock file {}: {}", path.display(), err);
			None
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn test_lock_cycle() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join(".lock");

		assert_eq!(get_app_lock(&path).await, None);

		let lock = lock_app(&path, 7, "backup").await.unwrap();
		let read = get_app_lock(&path).await.unwrap();
		assert_eq!(read, lock);
		assert_eq!(read.user_id, 7);

		let raw: serde_json::Value =
			serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
		assert_eq!(raw["userId"], 7);
		assert_eq!(raw["subject"], "backup");

		assert!(unlock_app(&path).await.unwrap());
		assert!(!unlock_app(&path).await.unwrap());
		assert_eq!(get_app_lock(&path).await, None);
	}

	#[tokio::test]
	async fn test_invalid_lock_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join(".lock");
		std::fs::write(&path, b"not json").unwrap();
		assert_eq!(get_app_lock(&path).await, None);
	}
}

// vim: ts=4
