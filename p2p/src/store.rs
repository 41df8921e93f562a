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

//! The shared byte store: exactly [`STORE_LEN`] parity bytes, one lock per
//! byte rather than one lock for the whole array. This is what makes
//! byte-granularity concurrent reads and writes safe without a coarse lock:
//! a bootstrap worker writing index 41,000 never contends with a scanner
//! reading index 12.

use parityfleet_util::RwLock;

use crate::byte::ParityByte;
use crate::types::STORE_LEN;

/// Fixed-length, fixed-identity store of parity bytes. Constructed once per
/// node and shared (via `Arc`) by every worker, handler and scanner thread.
pub struct ByteStore {
	bytes: Vec<RwLock<ParityByte>>,
}

impl ByteStore {
	/// A fresh store of `STORE_LEN` zero bytes, all parity-ok.
	pub fn new() -> ByteStore {
		let bytes = (0..STORE_LEN).map(|_| RwLock::new(ParityByte::new(0))).collect();
		ByteStore { bytes }
	}

	/// Seeds the store from a pre-loaded payload. `data` must be exactly
	/// `STORE_LEN` bytes; validating that is the config layer's job, not
	/// this one.
	pub fn from_bytes(data: &[u8]) -> ByteStore {
		assert_eq!(data.len(), STORE_LEN, "data file must be exactly STORE_LEN bytes");
		let bytes = data.iter().map(|&b| RwLock::new(ParityByte::new(b))).collect();
		ByteStore { bytes }
	}

	/// Number of bytes in the store. Always `STORE_LEN`.
	pub fn len(&self) -> usize {
		self.bytes.len()
	}

	/// Reads the parity byte at `index`.
	pub fn get(&self, index: usize) -> ParityByte {
		*self.bytes[index].read()
	}

	/// Overwrites the byte at `index` with a freshly parity-checked value.
	/// Used by bootstrap workers and the error corrector — both only ever
	/// write values they've already validated on receipt.
	pub fn set(&self, index: usize, value: u8) {
		*self.bytes[index].write() = ParityByte::new(value);
	}

	/// Flips a data bit at `index` without touching its parity bit, so the
	/// byte becomes suspect. Used by the injection console.
	pub fn corrupt(&self, index: usize) {
		self.bytes[index].write().corrupt();
	}

	/// Writes a contiguous range, one byte at a time (spec requires each
	/// individual byte write be atomic, not the whole range).
	pub fn write_range(&self, start: usize, values: &[u8]) {
		for (offset, &v) in values.iter().enumerate() {
			self.set(start + offset, v);
		}
	}

	/// Reads a contiguous range of raw byte values.
	pub fn read_values(&self, start: usize, length: usize) -> Vec<u8> {
		(start..start + length).map(|i| self.get(i).value()).collect()
	}
}

impl Default for ByteStore {
	fn default() -> ByteStore {
		ByteStore::new()
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn fresh_store_is_all_zero_and_parity_ok() {
		let store = ByteStore::new();
		assert_eq!(store.len(), STORE_LEN);
		assert_eq!(store.get(0).value(), 0);
		assert_eq!(store.get(STORE_LEN - 1).value(), 0);
		assert!(store.get(500_000).is_parity_ok());
	}

	#[test]
	fn set_then_get_round_trips() {
		let store = ByteStore::new();
		store.set(42, 0x7a);
		assert_eq!(store.get(42).value(), 0x7a);
		assert!(store.get(42).is_parity_ok());
	}

	#[test]
	fn corrupt_makes_byte_suspect() {
		let store = ByteStore::new();
		store.corrupt(10);
		assert!(!store.get(10).is_parity_ok());
	}

	#[test]
	fn write_range_and_read_values_round_trip() {
		let store = ByteStore::new();
		let block: Vec<u8> = (0..100u16).map(|v| v as u8).collect();
		store.write_range(1_000, &block);
		assert_eq!(store.read_values(1_000, 100), block);
	}

	#[test]
	fn from_bytes_seeds_every_index() {
		let data = vec![0x33u8; STORE_LEN];
		let store = ByteStore::from_bytes(&data);
		assert_eq!(store.get(0).value(), 0x33);
		assert_eq!(store.get(STORE_LEN - 1).value(), 0x33);
	}
}
