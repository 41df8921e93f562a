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

//! Shared constants and the error type for the p2p layer.

use std::fmt;
use std::io;

/// Number of bytes in the store. Exact, fixed, never resized.
pub const STORE_LEN: usize = 1_000_000;

/// Length of one block transferred as a single request/response pair.
/// Interop constant: peers with a different value cannot talk to each
/// other. 100 blocks of 10,000 bytes each cover the whole store.
pub const BLOCK_SIZE: usize = 10_000;

/// Errors produced by the peer protocol layer: opening connections, framing
/// requests and responses, and serving them.
#[derive(Debug)]
pub enum Error {
	/// transport-level failure: connection refused, reset, or any other I/O
	/// error on a peer socket
	Io(io::Error),
	/// the remote sent bytes that don't parse as the wire protocol expects
	Protocol(String),
	/// a block request fell outside `0..STORE_LEN`
	OutOfRange,
	/// the remote answered with the null sentinel, or didn't answer at all
	NoResponse,
}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Error::Io(e) => write!(f, "peer I/O error: {}", e),
			Error::Protocol(msg) => write!(f, "peer protocol error: {}", msg),
			Error::OutOfRange => write!(f, "block request out of range"),
			Error::NoResponse => write!(f, "peer returned no usable response"),
		}
	}
}

impl std::error::Error for Error {}

impl From<io::Error> for Error {
	fn from(e: io::Error) -> Error {
		Error::Io(e)
	}
}
