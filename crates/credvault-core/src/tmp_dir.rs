//! Temporary directory discovery

use std::path::{Path, PathBuf};

use crate::prelude::*;

/// Marker file proving a directory is writable
pub const PROBE_FILE: &str = "credvault.test";

async fn check_dir(dir: &Path) -> bool {
	let probe = dir.join(PROBE_FILE);
	if tokio::fs::try_exists(&probe).await.unwrap_or(false) {
		return true;
	}

	if let Err(err) = tokio::fs::create_dir_all(dir).await {
		debug!("Cannot create temp dir {}: {}", dir.display(), err);
		return false;
	}
	match tokio::fs::write(&probe, b"").await {
		Ok(()) => true,
		Err(err) => {
			debug!("Cannot write probe file in {}: {}", dir.display(), err);
			false
		}
	}
}

/// Returns the application temp dir if usable, else the system temp dir
pub async fn find_tmp_dir(app_tmp: &Path) -> Option<PathBuf> {
	if check_dir(app_tmp).await {
		return Some(app_tmp.to_path_buf());
	}

	let sys_tmp = std::env::temp_dir();
	warn!("Temp dir {} is not usable, falling back to {}", app_tmp.display(), sys_tmp.display());
	if check_dir(&sys_tmp).await { Some(sys_tmp) } else { None }
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn test_creates_app_tmp() {
		let base = tempfile::tempdir().unwrap();
		let app_tmp = base.path().join("temp");

		let found = find_tmp_dir(&app_tmp).await.unwrap();
		assert_eq!(found, app_tmp);
		assert!(app_tmp.join(PROBE_FILE).exists());

		// Second call finds the probe
		assert_eq!(find_tmp_dir(&app_tmp).await, Some(app_tmp));
	}

	#[tokio::test]
	async fn test_falls_back_to_system_tmp() {
		let base = tempfile::tempdir().unwrap();
		let file = base.path().join("plain-file");
		std::fs::write(&file, b"x").unwrap();

		// A path below a regular file can never be created
		let found = find_tmp_dir(&file.join("temp")).await;
		assert_eq!(found, Some(std::env::temp_dir()));
	}
}

// vim: ts=4
