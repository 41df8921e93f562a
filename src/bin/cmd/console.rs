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

//! Operator console (spec.md §6.3): reads `ERROR <index>` lines from stdin
//! and flips one bit at that index so its parity check starts failing.
//! Test aid only; not part of the peer protocol.

use std::io::{self, BufRead};

use parityfleet_p2p::store::ByteStore;
use parityfleet_p2p::types::STORE_LEN;

/// Reads lines from stdin until it closes, corrupting whichever index each
/// valid `ERROR <index>` line names.
pub fn run(store: &ByteStore) {
	let stdin = io::stdin();
	for line in stdin.lock().lines() {
		let line = match line {
			Ok(l) => l,
			Err(_) => return,
		};
		match parse_error_line(&line) {
			Some(index) if index < STORE_LEN => {
				store.corrupt(index);
				info!("injected single-bit error at index {}", index);
			}
			Some(index) => {
				eprintln!("index {} is out of range [0, {})", index, STORE_LEN);
			}
			None => {
				eprintln!("unrecognized console command: {:?} (expected 'ERROR <index>')", line);
			}
		}
	}
}

fn parse_error_line(line: &str) -> Option<usize> {
	let mut parts = line.trim().split_whitespace();
	let tag = parts.next()?;
	if !tag.eq_ignore_ascii_case("error") {
		return None;
	}
	parts.next()?.parse().ok()
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn parses_valid_command() {
		assert_eq!(parse_error_line("ERROR 42"), Some(42));
		assert_eq!(parse_error_line("error 0"), Some(0));
	}

	#[test]
	fn rejects_malformed_lines() {
		assert_eq!(parse_error_line("ERROR"), None);
		assert_eq!(parse_error_line("ERROR abc"), None);
		assert_eq!(parse_error_line("PING 1"), None);
		assert_eq!(parse_error_line(""), None);
	}
}
