//! CSV account import
//!
//! Every record holds seven fields: account name, customer, category, URL,
//! login, password and notes. There is no header row and blank lines are
//! skipped.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

use credvault_core::eta::eta;
use credvault_types::meta_adapter::{MetaAdapter, NewAccount};

use crate::prelude::*;

pub const CSV_FIELDS: usize = 7;

const PROGRESS_EVERY: u64 = 100;

/// Parses a single-character ASCII delimiter
pub fn parse_delimiter(s: &str) -> ClResult<u8> {
	match s.as_bytes() {
		[b] if b.is_ascii() && !b.is_ascii_alphanumeric() && *b != b'"' && *b != b'\n' => Ok(*b),
		[b'\\', b't'] => Ok(b'\t'),
		_ => Err(Error::ValidationError(format!("invalid CSV delimiter: {:?}", s))),
	}
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ImportError {
	/// 1-based line number in the file
	pub line: u64,
	pub reason: String,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct ImportResult {
	pub imported: u64,
	pub errors: Vec<ImportError>,
}

#[derive(Debug)]
pub struct CsvImport {
	meta: Arc<dyn MetaAdapter>,
	delimiter: u8,
	user_id: ItemId,
	user_group_id: Option<ItemId>,
}

impl CsvImport {
	pub fn new(
		meta: Arc<dyn MetaAdapter>,
		delimiter: u8,
		user_id: ItemId,
		user_group_id: Option<ItemId>,
	) -> Self {
		Self { meta, delimiter, user_id, user_group_id }
	}

	pub async fn do_import(&self, content: &[u8]) -> ClResult<ImportResult> {
		info!(format = "CSV", user_id = self.user_id, "Detected format: CSV");

		let records: Vec<_> = csv::ReaderBuilder::new()
			.delimiter(self.delimiter)
			.has_headers(false)
			.flexible(true)
			.from_reader(content)
			.into_records()
			.collect();
		let total = records.len() as u64;
		let start = Timestamp::now();

		let mut result = ImportResult::default();
		let mut customers: HashMap<String, ItemId> = HashMap::new();
		let mut categories: HashMap<String, ItemId> = HashMap::new();

		for (done, record) in records.into_iter().enumerate() {
			let done = done as u64;
			if done > 0 && done % PROGRESS_EVERY == 0 {
				let (eta_secs, rate) = eta(start, done, total, Timestamp::now());
				info!(done, total, eta_secs, rate, "CSV import progress");
			}

			let record = match record {
				Ok(record) => record,
				Err(err) => {
					let line = err.position().map_or(0, csv::Position::line);
					warn!(line, "CSV record unreadable: {}", err);
					result.errors.push(ImportError { line, reason: err.to_string() });
					continue;
				}
			};
			let line = record.position().map_or(0, csv::Position::line);

			if record.len() != CSV_FIELDS {
				warn!(line, fields = record.len(), "CSV record skipped, wrong number of fields");
				result.errors.push(ImportError {
					line,
					reason: format!("expected {} fields, found {}", CSV_FIELDS, record.len()),
				});
				continue;
			}

			let field = |i: usize| record.get(i).unwrap_or_default().trim();
			let (name, customer, category) = (field(0), field(1), field(2));
			if name.is_empty() || customer.is_empty() || category.is_empty() {
				result.errors.push(ImportError {
					line,
					reason: "account name, customer and category are required".into(),
				});
				continue;
			}

			let customer_id = match customers.get(&customer.to_ascii_lowercase()) {
				Some(id) => *id,
				None => {
					let id = self.meta.find_or_create_customer(customer).await?;
					customers.insert(customer.to_ascii_lowercase(), id);
					id
				}
			};
			let category_id = match categories.get(&category.to_ascii_lowercase()) {
				Some(id) => *id,
				None => {
					let id = self.meta.find_or_create_category(category).await?;
					categories.insert(category.to_ascii_lowercase(), id);
					id
				}
			};

			let account = NewAccount {
				name,
				customer_id,
				category_id,
				url: field(3),
				login: field(4),
				pass: record.get(5).unwrap_or_default(),
				notes: field(6),
				user_id: self.user_id,
				user_group_id: self.user_group_id,
			};
			self.meta.create_account(&account).await?;
			result.imported += 1;
		}

		info!(
			imported = result.imported,
			errors = result.errors.len(),
			"CSV import finished"
		);
		Ok(result)
	}
}


// vim: ts=4
