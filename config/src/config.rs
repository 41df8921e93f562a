// Copyright 2026 The Parityfleet Contributors
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Building and validating a [`NodeConfig`] from already-parsed command line
//! arguments. Parsing the arguments themselves (flag names, `--help` text)
//! is the CLI's job; this module only turns already-extracted values into a
//! config the node can trust, surfacing the checks spec.md §6.4/§7.1
//! require as a single typed [`ConfigError`] rather than an assertion
//! failure.

use std::fs;
use std::path::PathBuf;

use parityfleet_util::LoggingConfig;

use crate::types::{ConfigError, NodeConfig};

/// Exact length every data file (and the byte store itself) must have.
pub const STORE_LEN: u64 = 1_000_000;

/// Raw arguments as handed over by the CLI layer, before validation.
pub struct RawArgs {
	/// directory host
	pub directory_host: String,
	/// directory port
	pub directory_port: u16,
	/// this node's listening port (0 == any free port)
	pub node_port: u16,
	/// host to advertise to the directory
	pub advertise_host: String,
	/// optional pre-loaded payload file path
	pub data_file: Option<PathBuf>,
	/// number of correction-loop scanners
	pub scanner_count: usize,
	/// logging configuration, already parsed
	pub logging: LoggingConfig,
}

/// Validates raw CLI input and produces a [`NodeConfig`], or a
/// [`ConfigError`] describing exactly what was wrong.
pub fn build(raw: RawArgs) -> Result<NodeConfig, ConfigError> {
	if raw.directory_port == 0 {
		return Err(ConfigError::InvalidPort(
			"directory port must be strictly positive".to_string(),
		));
	}
	if raw.scanner_count == 0 {
		return Err(ConfigError::InvalidPort(
			"scanner count must be at least 1".to_string(),
		));
	}

	if let Some(path) = &raw.data_file {
		let metadata = fs::metadata(path).map_err(|e| ConfigError::Io(path.clone(), e))?;
		if metadata.len() != STORE_LEN {
			return Err(ConfigError::DataFileSize {
				path: path.clone(),
				actual: metadata.len(),
				expected: STORE_LEN,
			});
		}
	}

	Ok(NodeConfig {
		directory_host: raw.directory_host,
		directory_port: raw.directory_port,
		node_port: raw.node_port,
		advertise_host: raw.advertise_host,
		data_file: raw.data_file,
		scanner_count: raw.scanner_count,
		logging: raw.logging,
	})
}

#[cfg(test)]
mod test {
	use super::*;
	use std::io::Write;

	fn raw(data_file: Option<PathBuf>) -> RawArgs {
		RawArgs {
			directory_host: "127.0.0.1".to_string(),
			directory_port: 9000,
			node_port: 0,
			advertise_host: "127.0.0.1".to_string(),
			data_file,
			scanner_count: 2,
			logging: LoggingConfig::default(),
		}
	}

	#[test]
	fn rejects_zero_directory_port() {
		let mut args = raw(None);
		args.directory_port = 0;
		match build(args) {
			Err(ConfigError::InvalidPort(_)) => {}
			other => panic!("expected InvalidPort, got {:?}", other),
		}
	}

	#[test]
	fn rejects_wrong_size_data_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		file.write_all(&[0u8; 100]).unwrap();
		let args = raw(Some(file.path().to_path_buf()));
		match build(args) {
			Err(ConfigError::DataFileSize { actual, expected, .. }) => {
				assert_eq!(actual, 100);
				assert_eq!(expected, STORE_LEN);
			}
			other => panic!("expected DataFileSize, got {:?}", other),
		}
	}

	#[test]
	fn accepts_exact_size_data_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		file.write_all(&vec![0u8; STORE_LEN as usize]).unwrap();
		let args = raw(Some(file.path().to_path_buf()));
		assert!(build(args).is_ok());
	}

	#[test]
	fn accepts_no_data_file() {
		assert!(build(raw(None)).is_ok());
	}
}
