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

//! Node lifecycle (spec.md §4.7): bind, register, bootstrap-or-load,
//! start the background scanners and console, install the shutdown hook,
//! then accept peer connections until asked to stop.

use std::fs;
use std::net::TcpListener;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use parityfleet_config::NodeConfig;
use parityfleet_directory::{DirectoryClient, PeerEndpoint};
use parityfleet_p2p::corrector::ErrorCorrector;
use parityfleet_p2p::correction_loop;
use parityfleet_p2p::downloader;
use parityfleet_p2p::queue::RequestQueue;
use parityfleet_p2p::request::BlockRequest;
use parityfleet_p2p::server::NodeServer;
use parityfleet_p2p::store::ByteStore;
use parityfleet_p2p::types::{BLOCK_SIZE, STORE_LEN};

use crate::cmd::console;

/// Runs one node to completion (until shutdown). Any error returned here is
/// fatal: the caller prints it to stderr and exits non-zero.
pub fn run(config: NodeConfig) -> Result<(), String> {
	let listener =
		TcpListener::bind(("0.0.0.0", config.node_port)).map_err(|e| format!("could not bind listener: {}", e))?;
	let local_port = listener.local_addr().map_err(|e| e.to_string())?.port();
	info!("listening on port {}", local_port);

	let local = PeerEndpoint {
		host: config.advertise_host.clone(),
		port: local_port,
	};
	let directory = DirectoryClient::connect((config.directory_host.as_str(), config.directory_port), local)
		.map_err(|e| format!("could not register with directory: {}", e))?;
	info!("registered with directory at {}:{}", config.directory_host, config.directory_port);

	let store = match &config.data_file {
		Some(path) => {
			let bytes = fs::read(path).map_err(|e| format!("could not read data file: {}", e))?;
			info!("loaded payload from {}, bootstrap skipped", path.display());
			ByteStore::from_bytes(&bytes)
		}
		None => {
			let store = ByteStore::new();
			bootstrap(&store, &directory)?;
			store
		}
	};

	let corrector = Arc::new(ErrorCorrector::new(store, directory));

	let scanner_stop = Arc::new(AtomicBool::new(false));
	let mut scanner_handles = Vec::new();
	for n in 0..config.scanner_count {
		let corrector = corrector.clone();
		let stop = scanner_stop.clone();
		let handle = thread::Builder::new()
			.name(format!("correction-scanner-{}", n))
			.spawn(move || correction_loop::run(corrector, stop))
			.map_err(|e| e.to_string())?;
		scanner_handles.push(handle);
	}

	let console_corrector = corrector.clone();
	let _ = thread::Builder::new()
		.name("injection-console".to_string())
		.spawn(move || console::run(console_corrector.store()));

	let server = NodeServer::from_listener(listener, corrector.clone());
	let server_stop = server.stop_handle();

	let running = Arc::new(AtomicBool::new(true));
	{
		let running = running.clone();
		ctrlc::set_handler(move || running.store(false, Ordering::SeqCst))
			.map_err(|e| format!("could not install shutdown handler: {}", e))?;
	}

	let accept_handle = thread::Builder::new()
		.name("acceptor".to_string())
		.spawn(move || {
			if let Err(e) = server.serve() {
				warn!("accept loop exited with error: {}", e);
			}
		})
		.map_err(|e| e.to_string())?;

	while running.load(Ordering::SeqCst) {
		thread::sleep(Duration::from_millis(200));
	}

	info!("shutting down...");
	scanner_stop.store(true, Ordering::Relaxed);
	server_stop.store(true, Ordering::Relaxed);
	let _ = accept_handle.join();
	for handle in scanner_handles {
		let _ = handle.join();
	}
	corrector.close_directory();
	Ok(())
}

/// Requests the peer list and drains the full-store block queue, one
/// downloader per peer, using scoped threads so each downloader can borrow
/// `store` and `queue` directly instead of needing an `Arc`.
fn bootstrap(store: &ByteStore, directory: &DirectoryClient) -> Result<(), String> {
	let peers = directory
		.list_peers()
		.map_err(|e| format!("could not fetch peer list for bootstrap: {}", e))?;
	if peers.is_empty() {
		return Err("bootstrap failed: directory returned no peers".to_string());
	}
	info!("bootstrapping from {} peer(s)", peers.len());

	let requests: Vec<BlockRequest> = (0..STORE_LEN / BLOCK_SIZE)
		.map(|i| BlockRequest::new((i * BLOCK_SIZE) as i32, BLOCK_SIZE as i32))
		.collect();
	let queue = RequestQueue::new(requests, peers.len());

	thread::scope(|scope| {
		for peer in &peers {
			let queue = &queue;
			scope.spawn(move || downloader::run(peer, store, queue));
		}
	});

	queue.await_completion();
	if !queue.is_complete() {
		return Err("bootstrap failed: store is incomplete after all workers exited".to_string());
	}
	info!("bootstrap complete");
	Ok(())
}
