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

//! An immutable `(startIndex, length)` request for a range of the byte
//! store. Used both for bootstrap block transfers and for the corrector's
//! single-byte peer queries.

use crate::types::STORE_LEN;

/// A request for `length` bytes starting at `start`. Signed on the wire
/// (`int32`) so an out-of-range or negative request round-trips and can be
/// rejected by the server rather than silently wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRequest {
	start: i32,
	length: i32,
}

impl BlockRequest {
	/// Builds a request. Does not validate; use [`is_valid`](Self::is_valid)
	/// before acting on one received from the wire.
	pub fn new(start: i32, length: i32) -> BlockRequest {
		BlockRequest { start, length }
	}

	/// Start index of the requested range.
	pub fn start(&self) -> i32 {
		self.start
	}

	/// Number of bytes requested.
	pub fn length(&self) -> i32 {
		self.length
	}

	/// True iff `0 <= start`, `0 <= length` and `start + length <=
	/// STORE_LEN`.
	pub fn is_valid(&self) -> bool {
		if self.start < 0 || self.length < 0 {
			return false;
		}
		let end = self.start as i64 + self.length as i64;
		end <= STORE_LEN as i64
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn boundary_requests_are_valid() {
		assert!(BlockRequest::new(0, 1).is_valid());
		assert!(BlockRequest::new(999_999, 1).is_valid());
		assert!(BlockRequest::new(0, STORE_LEN as i32).is_valid());
	}

	#[test]
	fn negative_start_is_invalid() {
		assert!(!BlockRequest::new(-1, 10).is_valid());
	}

	#[test]
	fn range_past_end_is_invalid() {
		assert!(!BlockRequest::new(2_000_000, 10).is_valid());
		assert!(!BlockRequest::new(999_995, 10).is_valid());
	}
}
