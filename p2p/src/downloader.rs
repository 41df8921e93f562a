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

//! One downloader per bootstrap peer: opens exactly one connection, drains
//! the shared queue, and gives up on the first error rather than retrying.
//! Liveness during bootstrap comes from there being more workers than
//! simultaneous peer failures, not from any one worker's persistence.

use std::net::TcpStream;

use parityfleet_directory::PeerEndpoint;

use crate::byte::ParityByte;
use crate::codec;
use crate::queue::RequestQueue;
use crate::request::BlockRequest;
use crate::store::ByteStore;

/// Drains `queue` against a single peer connection, writing every
/// successfully downloaded block into `store`. Always calls
/// `queue.mark_worker_done()` exactly once before returning, requeuing its
/// outstanding request first if it has to give up mid-transfer.
pub fn run(peer: &PeerEndpoint, store: &ByteStore, queue: &RequestQueue) {
	let mut stream = match TcpStream::connect((peer.host.as_str(), peer.port)) {
		Ok(s) => s,
		Err(e) => {
			warn!("downloader for {} could not connect: {}", peer, e);
			queue.mark_worker_done();
			return;
		}
	};

	loop {
		let request = match queue.take() {
			Some(r) => r,
			None => break,
		};
		if let Err(e) = download_one(&mut stream, store, request) {
			warn!("downloader for {} failed on block {}: {}", peer, request.start(), e);
			queue.requeue(request);
			break;
		}
	}
	queue.mark_worker_done();
}

fn download_one(
	stream: &mut TcpStream,
	store: &ByteStore,
	request: BlockRequest,
) -> Result<(), crate::types::Error> {
	codec::write_request(stream, &request)?;
	let response = codec::read_response(stream)?;
	let bytes = response.ok_or(crate::types::Error::NoResponse)?;
	if bytes.len() != request.length() as usize {
		return Err(crate::types::Error::Protocol(format!(
			"expected {} bytes, got {}",
			request.length(),
			bytes.len()
		)));
	}
	for &b in &bytes {
		if !ParityByte::new(b).is_parity_ok() {
			return Err(crate::types::Error::Protocol("received byte failed parity check".to_string()));
		}
	}
	store.write_range(request.start() as usize, &bytes);
	Ok(())
}

#[cfg(test)]
mod test {
	use super::*;
	use std::io::Read;
	use std::net::TcpListener;
	use std::sync::Arc;
	use std::thread;

	fn spawn_block_server(payload: Vec<u8>) -> (PeerEndpoint, thread::JoinHandle<()>) {
		let listener = TcpListener::bind("127.0.0.1:0").unwrap();
		let addr = listener.local_addr().unwrap();
		let handle = thread::spawn(move || {
			let (mut sock, _) = listener.accept().unwrap();
			loop {
				let request = match codec::read_request(&mut sock) {
					Ok(r) => r,
					Err(_) => return,
				};
				let start = request.start() as usize;
				let length = request.length() as usize;
				let slice = &payload[start..start + length];
				codec::write_response(&mut sock, Some(slice)).unwrap();
			}
		});
		(
			PeerEndpoint {
				host: addr.ip().to_string(),
				port: addr.port(),
			},
			handle,
		)
	}

	#[test]
	fn downloads_all_blocks_into_store() {
		let payload: Vec<u8> = (0..1_000u32).map(|i| (i % 256) as u8).collect();
		let (peer, server) = spawn_block_server(payload.clone());

		let store = ByteStore::new();
		let requests: Vec<_> = (0..10).map(|i| BlockRequest::new(i * 100, 100)).collect();
		let queue = RequestQueue::new(requests, 1);

		run(&peer, &store, &queue);
		queue.await_completion();
		assert!(queue.is_complete());
		assert_eq!(store.read_values(0, 1_000), payload);

		server.join().unwrap();
	}

	#[test]
	fn unreachable_peer_reports_done_without_panicking() {
		let peer = PeerEndpoint {
			host: "127.0.0.1".to_string(),
			port: 1, // nothing listens on a privileged port we didn't bind
		};
		let store = ByteStore::new();
		let requests = vec![BlockRequest::new(0, 10)];
		let queue = RequestQueue::new(requests, 1);

		run(&peer, &store, &queue);
		queue.await_completion();
		assert!(!queue.is_complete());
	}

	#[test]
	fn two_workers_share_a_queue() {
		let payload: Vec<u8> = (0..1_000u32).map(|i| (i % 256) as u8).collect();
		let (peer_a, server_a) = spawn_block_server(payload.clone());
		let (peer_b, server_b) = spawn_block_server(payload.clone());

		let store = Arc::new(ByteStore::new());
		let requests: Vec<_> = (0..10).map(|i| BlockRequest::new(i * 100, 100)).collect();
		let queue = Arc::new(RequestQueue::new(requests, 2));

		let t1 = {
			let store = store.clone();
			let queue = queue.clone();
			thread::spawn(move || run(&peer_a, &store, &queue))
		};
		let t2 = {
			let store = store.clone();
			let queue = queue.clone();
			thread::spawn(move || run(&peer_b, &store, &queue))
		};
		t1.join().unwrap();
		t2.join().unwrap();

		queue.await_completion();
		assert!(queue.is_complete());
		assert_eq!(store.read_values(0, 1_000), payload);

		server_a.join().unwrap();
		server_b.join().unwrap();
	}
}
