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

//! Repairs a single suspect byte by majority vote across peers. Queried by
//! both the background correction scanners (non-blocking) and node server
//! handlers (blocking, on the serving path).

use std::collections::HashMap;
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use parityfleet_directory::{DirectoryClient, PeerEndpoint};

use crate::byte::ParityByte;
use crate::codec;
use crate::request::BlockRequest;
use crate::store::ByteStore;
use crate::ticket::TicketMap;

/// How long to wait for a peer's TCP connect before giving up on it during
/// a correction query. Bounded because an unresponsive peer must not stall
/// the whole vote.
const PEER_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Coordinates peer-majority repair of suspect bytes.
pub struct ErrorCorrector {
	store: ByteStore,
	directory: DirectoryClient,
	tickets: TicketMap,
}

impl ErrorCorrector {
	/// Builds a corrector over `store`, using `directory` to look up the
	/// current peer list on every repair attempt.
	pub fn new(store: ByteStore, directory: DirectoryClient) -> ErrorCorrector {
		ErrorCorrector {
			store,
			directory,
			tickets: TicketMap::new(),
		}
	}

	/// The byte store this corrector repairs. Shared with the server and
	/// the correction loop.
	pub fn store(&self) -> &ByteStore {
		&self.store
	}

	/// Non-blocking attempt: returns `false` immediately if another
	/// correction is already in progress for `index`, or if the attempt
	/// itself fails to reach a majority. Returns `true` iff `index` ends
	/// the call parity-ok.
	pub fn try_correct(&self, index: usize) -> bool {
		if self.store.get(index).is_parity_ok() {
			return true;
		}
		if !self.tickets.try_acquire(index) {
			return false;
		}
		let result = self.repair(index);
		self.tickets.release(index);
		result
	}

	/// True iff a correction is currently in progress for `index`.
	pub fn is_correcting(&self, index: usize) -> bool {
		self.tickets.is_ticketed(index)
	}

	/// Closes the directory connection, used during node shutdown.
	pub fn close_directory(&self) {
		self.directory.close();
	}

	/// Blocking variant used by the node server before serving a byte: if
	/// already parity-ok, returns immediately; otherwise either joins an
	/// in-progress correction and re-checks, or runs one itself.
	pub fn correct(&self, index: usize) -> bool {
		if self.store.get(index).is_parity_ok() {
			return true;
		}
		if self.tickets.try_acquire(index) {
			let result = self.repair(index);
			self.tickets.release(index);
			result
		} else {
			self.tickets.wait_for_release(index);
			self.store.get(index).is_parity_ok()
		}
	}

	/// Runs the peer consultation and, on majority, commits the result.
	/// Caller must already hold the ticket for `index`.
	fn repair(&self, index: usize) -> bool {
		let peers = match self.directory.list_peers() {
			Ok(peers) => peers,
			Err(e) => {
				warn!("correction of index {} failed: directory error: {}", index, e);
				return false;
			}
		};
		if peers.is_empty() {
			debug!("correction of index {} failed: no peers", index);
			return false;
		}

		let mut tally: HashMap<u8, usize> = HashMap::new();
		let mut responders = 0usize;
		for peer in &peers {
			match query_peer_byte(peer, index) {
				Ok(Some(value)) => {
					responders += 1;
					*tally.entry(value).or_insert(0) += 1;
				}
				Ok(None) => {}
				Err(e) => debug!("peer {} did not answer correction query for {}: {}", peer, index, e),
			}
		}

		if responders == 0 {
			return false;
		}
		let winner = tally.iter().max_by_key(|&(_, &count)| count);
		match winner {
			Some((&value, &count)) if count * 2 > responders => {
				self.store.set(index, value);
				info!("corrected index {} to {:#04x} ({}/{} peers agreed)", index, value, count, responders);
				true
			}
			_ => {
				debug!("correction of index {} failed: no majority among {} responders", index, responders);
				false
			}
		}
	}
}

/// Opens a short-lived connection to `peer`, requests the single byte at
/// `index`, and returns it if the peer answered with parity-valid data.
fn query_peer_byte(peer: &PeerEndpoint, index: usize) -> Result<Option<u8>, crate::types::Error> {
	let addr = (peer.host.as_str(), peer.port)
		.to_socket_addrs()?
		.next()
		.ok_or_else(|| crate::types::Error::Protocol(format!("could not resolve {}", peer)))?;
	let mut stream = TcpStream::connect_timeout(&addr, PEER_CONNECT_TIMEOUT)?;

	let request = BlockRequest::new(index as i32, 1);
	codec::write_request(&mut stream, &request)?;
	let response = codec::read_response(&mut stream)?;

	match response {
		Some(bytes) if bytes.len() == 1 => {
			let byte = ParityByte::new(bytes[0]);
			if byte.is_parity_ok() {
				Ok(Some(byte.value()))
			} else {
				Ok(None)
			}
		}
		_ => Ok(None),
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use std::io::{Read, Write};
	use std::net::TcpListener;
	use std::thread;

	fn spawn_byte_server(value: u8) -> (String, u16, thread::JoinHandle<()>) {
		let listener = TcpListener::bind("127.0.0.1:0").unwrap();
		let addr = listener.local_addr().unwrap();
		let handle = thread::spawn(move || {
			let (mut sock, _) = listener.accept().unwrap();
			let mut buf = [0u8; 8];
			sock.read_exact(&mut buf).unwrap();
			sock.write_all(&[1, 0, 0, 0, 1, value]).unwrap();
		});
		(addr.ip().to_string(), addr.port(), handle)
	}

	#[test]
	fn query_peer_byte_returns_value_on_valid_response() {
		let (host, port, handle) = spawn_byte_server(0x42);
		let peer = PeerEndpoint { host, port };
		let value = query_peer_byte(&peer, 5).unwrap();
		assert_eq!(value, Some(0x42));
		handle.join().unwrap();
	}

	fn directory_returning(peers: Vec<PeerEndpoint>) -> (DirectoryClient, thread::JoinHandle<()>) {
		let listener = TcpListener::bind("127.0.0.1:0").unwrap();
		let addr = listener.local_addr().unwrap();
		let handle = thread::spawn(move || loop {
			let (mut sock, _) = match listener.accept() {
				Ok(a) => a,
				Err(_) => return,
			};
			let mut buf = [0u8; 64];
			let _ = sock.read(&mut buf).unwrap();
			let _ = sock.read(&mut buf).unwrap();
			for p in &peers {
				sock.write_all(format!("node {} {}\n", p.host, p.port).as_bytes()).unwrap();
			}
			sock.write_all(b"end\n").unwrap();
			return;
		});
		let local = PeerEndpoint {
			host: "127.0.0.1".to_string(),
			port: 1,
		};
		let client = DirectoryClient::connect(addr, local).unwrap();
		(client, handle)
	}

	#[test]
	fn try_correct_is_idempotent_on_parity_ok_index() {
		let store = ByteStore::new();
		let (directory, handle) = directory_returning(vec![]);
		let corrector = ErrorCorrector::new(store, directory);
		assert!(corrector.try_correct(0));
		assert!(corrector.try_correct(0));
		handle.join().unwrap();
	}

	#[test]
	fn try_correct_fails_with_no_peers() {
		let store = ByteStore::new();
		store.corrupt(0);
		let (directory, handle) = directory_returning(vec![]);
		let corrector = ErrorCorrector::new(store, directory);
		assert!(!corrector.try_correct(0));
		handle.join().unwrap();
	}

	#[test]
	fn majority_commits_the_agreed_value() {
		let store = ByteStore::new();
		store.corrupt(99);
		let (h1_host, h1_port, h1) = spawn_byte_server(0x41);
		let (h2_host, h2_port, h2) = spawn_byte_server(0x41);
		let (h3_host, h3_port, h3) = spawn_byte_server(0x42);
		let peers = vec![
			PeerEndpoint { host: h1_host, port: h1_port },
			PeerEndpoint { host: h2_host, port: h2_port },
			PeerEndpoint { host: h3_host, port: h3_port },
		];
		let (directory, dir_handle) = directory_returning(peers);
		let corrector = ErrorCorrector::new(store, directory);
		assert!(corrector.try_correct(99));
		assert_eq!(corrector.store().get(99).value(), 0x41);
		h1.join().unwrap();
		h2.join().unwrap();
		h3.join().unwrap();
		dir_handle.join().unwrap();
	}

	#[test]
	fn no_majority_leaves_byte_suspect() {
		let store = ByteStore::new();
		store.corrupt(7);
		let (h1_host, h1_port, h1) = spawn_byte_server(0x41);
		let (h2_host, h2_port, h2) = spawn_byte_server(0x42);
		let (h3_host, h3_port, h3) = spawn_byte_server(0x43);
		let peers = vec![
			PeerEndpoint { host: h1_host, port: h1_port },
			PeerEndpoint { host: h2_host, port: h2_port },
			PeerEndpoint { host: h3_host, port: h3_port },
		];
		let (directory, dir_handle) = directory_returning(peers);
		let corrector = ErrorCorrector::new(store, directory);
		assert!(!corrector.try_correct(7));
		assert!(!corrector.store().get(7).is_parity_ok());
		h1.join().unwrap();
		h2.join().unwrap();
		h3.join().unwrap();
		dir_handle.join().unwrap();
	}
}
