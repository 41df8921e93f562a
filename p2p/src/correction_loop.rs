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

//! Background scanners that walk the byte store end to end, looking for
//! suspect bytes and handing them to the corrector. Two or more scanners
//! run concurrently; the ticket mechanism in [`ErrorCorrector`] makes sure
//! only one of them actually queries peers for any given index.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::corrector::ErrorCorrector;
use crate::types::STORE_LEN;

/// How long a scanner sleeps once it has scanned every index.
const PASS_SLEEP: Duration = Duration::from_secs(1);

/// Runs one scanner to completion of `stop`. Intended to be spawned on its
/// own thread; spawn `scanner_count` of these to match spec.md §4.6's "two
/// or more".
pub fn run(corrector: Arc<ErrorCorrector>, stop: Arc<AtomicBool>) {
	while !stop.load(Ordering::Relaxed) {
		for i in 0..STORE_LEN {
			if stop.load(Ordering::Relaxed) {
				return;
			}
			if corrector.store().get(i).is_parity_ok() {
				continue;
			}
			if corrector.try_correct(i) {
				continue;
			}
			// either another scanner already owns this index
			// (corrector.is_correcting(i)) or the attempt failed outright (no
			// majority, no peers); either way this pass leaves the byte
			// suspect and a later pass retries it.
		}
		thread::sleep(PASS_SLEEP);
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::store::ByteStore;
	use parityfleet_directory::{DirectoryClient, PeerEndpoint};
	use std::io::{Read, Write};
	use std::net::TcpListener;

	fn directory_with_peer(peer: PeerEndpoint) -> DirectoryClient {
		let listener = TcpListener::bind("127.0.0.1:0").unwrap();
		let addr = listener.local_addr().unwrap();
		thread::spawn(move || loop {
			let (mut sock, _) = match listener.accept() {
				Ok(a) => a,
				Err(_) => return,
			};
			let mut buf = [0u8; 64];
			let _ = sock.read(&mut buf).unwrap();
			loop {
				let mut buf = [0u8; 64];
				let n = sock.read(&mut buf).unwrap();
				if n == 0 {
					break;
				}
				sock.write_all(format!("node {} {}\n", peer.host, peer.port).as_bytes())
					.unwrap();
				sock.write_all(b"end\n").unwrap();
			}
		});
		let local = PeerEndpoint {
			host: "127.0.0.1".to_string(),
			port: 1,
		};
		DirectoryClient::connect(addr, local).unwrap()
	}

	fn spawn_byte_server(value: u8) -> PeerEndpoint {
		let listener = TcpListener::bind("127.0.0.1:0").unwrap();
		let addr = listener.local_addr().unwrap();
		thread::spawn(move || loop {
			let (mut sock, _) = match listener.accept() {
				Ok(a) => a,
				Err(_) => return,
			};
			let mut buf = [0u8; 8];
			if sock.read_exact(&mut buf).is_err() {
				continue;
			}
			let _ = sock.write_all(&[1, 0, 0, 0, 1, value]);
		});
		PeerEndpoint {
			host: addr.ip().to_string(),
			port: addr.port(),
		}
	}

	#[test]
	fn scanner_repairs_an_injected_error_within_one_pass() {
		let store = ByteStore::new();
		store.set(42, 0x55);
		store.corrupt(42);
		assert!(!store.get(42).is_parity_ok());

		let peer = spawn_byte_server(0x55);
		let directory = directory_with_peer(peer);
		let corrector = Arc::new(ErrorCorrector::new(store, directory));
		let stop = Arc::new(AtomicBool::new(false));

		let scanner = {
			let corrector = corrector.clone();
			let stop = stop.clone();
			thread::spawn(move || run(corrector, stop))
		};

		let deadline = std::time::Instant::now() + Duration::from_secs(5);
		while std::time::Instant::now() < deadline && !corrector.store().get(42).is_parity_ok() {
			thread::sleep(Duration::from_millis(20));
		}
		assert!(corrector.store().get(42).is_parity_ok());
		assert_eq!(corrector.store().get(42).value(), 0x55);

		stop.store(true, Ordering::Relaxed);
		scanner.join().unwrap();
	}
}
