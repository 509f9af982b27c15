//! Upload policy checks

use serde::Serialize;

use crate::prelude::*;
use crate::settings::service::SettingsService;

#[derive(Clone, Debug)]
pub struct UploadPolicy {
	pub max_files: usize,
	pub max_size_kb: u64,
	/// Upper-case extensions without the dot
	pub allowed_exts: Vec<String>,
}

/// File as seen by the policy
#[derive(Clone, Debug)]
pub struct UploadFile<'a> {
	pub name: &'a str,
	pub size: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "reason")]
pub enum UploadRejection {
	TooLarge { name: String, max_size_kb: u64 },
	ExtensionNotAllowed { name: String },
}

impl UploadPolicy {
	pub fn new(max_files: usize, max_size_kb: u64, allowed_exts: &str) -> Self {
		let allowed_exts = credvault_types::utils::split_list(allowed_exts)
			.into_iter()
			.map(|ext| ext.trim_start_matches('.').to_ascii_uppercase())
			.collect();
		Self { max_files, max_size_kb, allowed_exts }
	}

	pub async fn from_settings(settings: &SettingsService) -> ClResult<Self> {
		let max_files = settings.get_int("upload.max_files").await?;
		let max_size_kb = settings.get_int("upload.max_size_kb").await?;
		let exts = settings.get_string("upload.allowed_exts").await?;
		Ok(Self::new(max_files.max(0) as usize, max_size_kb.max(0) as u64, &exts))
	}

	pub fn max_size_bytes(&self) -> u64 {
		self.max_size_kb.saturating_mul(1024)
	}

	pub fn check_count(&self, count: usize) -> ClResult<()> {
		if count > self.max_files {
			return Err(Error::ValidationError(format!(
				"too many files: {} (max {})",
				count, self.max_files
			)));
		}
		Ok(())
	}

	pub fn check_file(&self, file: &UploadFile<'_>) -> Result<(), UploadRejection> {
		let ext = file.name.rsplit_once('.').map(|(_, ext)| ext.to_ascii_uppercase());
		if !ext.is_some_and(|ext| self.allowed_exts.contains(&ext)) {
			return Err(UploadRejection::ExtensionNotAllowed { name: file.name.to_string() });
		}
		if file.size > self.max_size_bytes() {
			return Err(UploadRejection::TooLarge {
				name: file.name.to_string(),
				max_size_kb: self.max_size_kb,
			});
		}
		Ok(())
	}

	/// Checks a whole upload. Too many files fails the upload, otherwise the
	/// per-file rejections are returned.
	pub fn check(&self, files: &[UploadFile<'_>]) -> ClResult<Vec<UploadRejection>> {
		self.check_count(files.len())?;
		Ok(files.iter().filter_map(|f| self.check_file(f).err()).collect())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn file(name: &str, size: u64) -> UploadFile<'_> {
		UploadFile { name, size }
	}

	#[test]
	fn test_allowed_file() {
		let policy = UploadPolicy::new(5, 1024, "csv, .xml");
		assert_eq!(policy.allowed_exts, vec!["CSV", "XML"]);
		assert!(policy.check_file(&file("export.CSV", 1000)).is_ok());
		assert!(policy.check_file(&file("backup.xml", 1024 * 1024)).is_ok());
	}

	#[test]
	fn test_rejections() {
		let policy = UploadPolicy::new(5, 1, "CSV");
		let res = policy
			.check(&[file("a.csv", 100), file("b.csv", 2048), file("c.exe", 10), file("noext", 1)])
			.unwrap();
		assert_eq!(
			res,
			vec![
				UploadRejection::TooLarge { name: "b.csv".into(), max_size_kb: 1 },
				UploadRejection::ExtensionNotAllowed { name: "c.exe".into() },
				UploadRejection::ExtensionNotAllowed { name: "noext".into() },
			]
		);
	}

	#[test]
	fn test_too_many_files() {
		let policy = UploadPolicy::new(1, 1024, "CSV");
		let res = policy.check(&[file("a.csv", 1), file("b.csv", 1)]);
		assert!(matches!(res, Err(Error::ValidationError(_))));
		assert!(policy.check_count(1).is_ok());
		assert!(policy.check_count(2).is_err());
	}

	#[test]
	fn test_size_limit() {
		let policy = UploadPolicy::new(5, 2, "CSV");
		assert_eq!(policy.max_size_bytes(), 2048);
		assert!(policy.check_file(&file("a.csv", 2048)).is_ok());
		assert!(policy.check_file(&file("a.csv", 2049)).is_err());
		assert_eq!(UploadPolicy::new(5, u64::MAX, "CSV").max_size_bytes(), u64::MAX);
	}
}

// vim: ts=4
