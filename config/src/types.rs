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

//! Public types for the config module.

use std::fmt;
use std::io;
use std::path::PathBuf;

use parityfleet_util::LoggingConfig;

/// Error produced while building or validating a [`NodeConfig`].
#[derive(Debug)]
pub enum ConfigError {
	/// A port value (directory or node) fell outside `0..=65535`, or the
	/// directory port was given as zero (only a node's own listening port
	/// may be "any free port").
	InvalidPort(String),
	/// A data file was given but is not exactly `STORE_LEN` bytes.
	DataFileSize {
		/// path to the offending file
		path: PathBuf,
		/// length actually observed
		actual: u64,
		/// length required
		expected: u64,
	},
	/// The data file could not be opened or read.
	Io(PathBuf, io::Error),
}

impl fmt::Display for ConfigError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ConfigError::InvalidPort(msg) => write!(f, "invalid port: {}", msg),
			ConfigError::DataFileSize {
				path,
				actual,
				expected,
			} => write!(
				f,
				"data file {} is {} bytes, expected exactly {}",
				path.display(),
				actual,
				expected
			),
			ConfigError::Io(path, e) => write!(f, "error reading data file {}: {}", path.display(), e),
		}
	}
}

impl std::error::Error for ConfigError {}

/// Fully validated configuration for one node process.
#[derive(Debug, Clone)]
pub struct NodeConfig {
	/// Directory service host, as given on the command line.
	pub directory_host: String,
	/// Directory service port. Always non-zero.
	pub directory_port: u16,
	/// This node's desired listening port. Zero means "assign any free
	/// port"; the lifecycle resolves this to a concrete port at bind time.
	pub node_port: u16,
	/// Host string this node advertises to the directory for itself.
	pub advertise_host: String,
	/// Optional pre-loaded payload file. When present, it seeds the byte
	/// store directly and bootstrap is skipped.
	pub data_file: Option<PathBuf>,
	/// Number of parallel correction-loop scanners (spec.md §4.6: "two or
	/// more").
	pub scanner_count: usize,
	/// Logging configuration.
	pub logging: LoggingConfig,
}
