//! Random password generation
//!
//! Characters are drawn uniformly from the union of the enabled alphabets.
//! With `check_strength` the whole password is redrawn until every enabled
//! character class occurs at least once.

use rand::{Rng, RngExt};
use serde::Deserialize;

use crate::prelude::*;
use crate::settings::service::SettingsService;

pub const CHARS_LOWER: &str = "abcdefghijklmnopqrstuvwxyz";
pub const CHARS_UPPER: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const CHARS_NUMBERS: &str = "0123456789";
pub const CHARS_SPECIAL: &str = "@$%&/()!_:.;{}^";

pub const DEFAULT_LENGTH: usize = 16;
pub const MAX_LENGTH: usize = 1024;

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PasswordOptions {
	pub length: usize,
	pub lower: bool,
	pub upper: bool,
	pub numbers: bool,
	pub special: bool,
	pub check_strength: bool,
}

impl Default for PasswordOptions {
	fn default() -> Self {
		Self {
			length: DEFAULT_LENGTH,
			lower: true,
			upper: true,
			numbers: true,
			special: true,
			check_strength: true,
		}
	}
}

impl PasswordOptions {
	/// Options built from the `password.*` settings
	pub async fn from_settings(settings: &SettingsService) -> ClResult<Self> {
		let length = settings.get_int("password.length").await?;
		Ok(Self {
			length: usize::try_from(length)
				.map_err(|_| Error::ConfigError("password.length is negative".into()))?,
			lower: true,
			upper: true,
			numbers: settings.get_bool("password.numbers").await?,
			special: settings.get_bool("password.special").await?,
			check_strength: settings.get_bool("password.check_strength").await?,
		})
	}

	fn classes(&self) -> Vec<&'static [u8]> {
		[
			(self.lower, CHARS_LOWER),
			(self.upper, CHARS_UPPER),
			(self.special, CHARS_SPECIAL),
			(self.numbers, CHARS_NUMBERS),
		]
		.into_iter()
		.filter_map(|(enabled, chars)| enabled.then_some(chars.as_bytes()))
		.collect()
	}
}

fn covers_all(pass: &[u8], classes: &[&[u8]]) -> bool {
	classes.iter().all(|class| pass.iter().any(|c| class.contains(c)))
}

pub fn generate_password(opts: &PasswordOptions) -> ClResult<String> {
	let classes = opts.classes();
	if classes.is_empty() {
		return Err(Error::ValidationError("no character class enabled".into()));
	}
	if opts.length == 0 || opts.length > MAX_LENGTH {
		return Err(Error::ValidationError(format!(
			"password length must be between 1 and {}",
			MAX_LENGTH
		)));
	}
	if opts.check_strength && opts.length < classes.len() {
		return Err(Error::ValidationError(format!(
			"password length {} cannot hold {} character classes",
			opts.length,
			classes.len()
		)));
	}

	let alphabet: Vec<u8> = classes.concat();
	let mut rng = rand::rng();
	let mut pass = vec![0u8; opts.length];
	loop {
		for c in &mut pass {
			*c = alphabet[rng.random_range(0..alphabet.len())];
		}
		if !opts.check_strength || covers_all(&pass, &classes) {
			break;
		}
	}

	// Every alphabet is ASCII
	Ok(pass.into_iter().map(char::from).collect())
}

/// `len` random bytes, hex encoded
pub fn random_bytes_hex(len: usize) -> String {
	let mut bytes = vec![0u8; len];
	rand::rng().fill_bytes(&mut bytes);
	hex::encode(bytes)
}


// vim: ts=4
