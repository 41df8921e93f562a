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

//! Public types for the directory client.

use std::fmt;
use std::io;

/// A `(host, port)` pair as returned by the directory or used to register
/// this node with it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PeerEndpoint {
	/// remote host, as given by the directory
	pub host: String,
	/// remote port
	pub port: u16,
}

impl fmt::Display for PeerEndpoint {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}:{}", self.host, self.port)
	}
}

/// Errors produced talking to the directory. Fatal during the lifecycle's
/// startup sequence; recoverable at steady state, where the error corrector
/// simply counts the attempt as failed and retries on a later pass.
#[derive(Debug)]
pub enum DirectoryError {
	/// transport-level failure connecting to or talking with the directory
	Io(io::Error),
	/// the directory sent something that didn't parse as the line protocol
	/// expects, or closed the connection mid-response
	Protocol(String),
}

impl fmt::Display for DirectoryError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			DirectoryError::Io(e) => write!(f, "directory I/O error: {}", e),
			DirectoryError::Protocol(msg) => write!(f, "directory protocol error: {}", msg),
		}
	}
}

impl std::error::Error for DirectoryError {}

impl From<io::Error> for DirectoryError {
	fn from(e: io::Error) -> Self {
		DirectoryError::Io(e)
	}
}
