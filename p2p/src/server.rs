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

//! Accepts peer connections and serves block requests. The accept loop
//! polls a non-blocking listener on an interval rather than blocking
//! forever in `accept()`, so a shutdown flag can stop it between attempts
//! without leaking a thread.

use std::io;
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::codec;
use crate::corrector::ErrorCorrector;

const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Serves the byte store to peer connections.
pub struct NodeServer {
	listener: TcpListener,
	corrector: Arc<ErrorCorrector>,
	stop: Arc<AtomicBool>,
}

impl NodeServer {
	/// Binds `addr` (port 0 resolves to any free port) and builds a server
	/// around `corrector`.
	pub fn bind(addr: &str, corrector: Arc<ErrorCorrector>) -> io::Result<NodeServer> {
		let listener = TcpListener::bind(addr)?;
		Ok(NodeServer::from_listener(listener, corrector))
	}

	/// Wraps an already-bound listener. Used by the node lifecycle, which
	/// must bind before it knows the concrete port to register with the
	/// directory (spec.md §4.7 steps 1-2).
	pub fn from_listener(listener: TcpListener, corrector: Arc<ErrorCorrector>) -> NodeServer {
		NodeServer {
			listener,
			corrector,
			stop: Arc::new(AtomicBool::new(false)),
		}
	}

	/// The concrete address this server is bound to, useful when `addr` was
	/// given with port 0.
	pub fn local_addr(&self) -> io::Result<std::net::SocketAddr> {
		self.listener.local_addr()
	}

	/// A handle that, when set, stops the next [`serve`](Self::serve) poll
	/// iteration.
	pub fn stop_handle(&self) -> Arc<AtomicBool> {
		self.stop.clone()
	}

	/// Runs the accept loop until `stop_handle()` is set. Blocking; spawn it
	/// on its own thread.
	pub fn serve(&self) -> io::Result<()> {
		self.listener.set_nonblocking(true)?;
		loop {
			match self.listener.accept() {
				Ok((stream, peer_addr)) => {
					let corrector = self.corrector.clone();
					let builder = thread::Builder::new().name(format!("peer-handler-{}", peer_addr));
					if let Err(e) = builder.spawn(move || handle_connection(stream, &corrector)) {
						warn!("could not spawn handler for {}: {}", peer_addr, e);
					}
				}
				Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => {}
				Err(e) => {
					warn!("accept() failed: {}", e);
				}
			}
			if self.stop.load(Ordering::Relaxed) {
				break;
			}
			thread::sleep(ACCEPT_POLL_INTERVAL);
		}
		Ok(())
	}
}

/// Serves requests on one accepted connection until the peer closes it or
/// sends something that can't be decoded. Every request that is fully read
/// off the wire produces exactly one response frame.
fn handle_connection(mut stream: TcpStream, corrector: &ErrorCorrector) {
	loop {
		let request = match codec::read_request(&mut stream) {
			Ok(r) => r,
			Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return,
			Err(e) => {
				debug!("closing connection after read error: {}", e);
				return;
			}
		};

		if !request.is_valid() {
			if let Err(e) = codec::write_response(&mut stream, None) {
				debug!("closing connection after write error: {}", e);
				return;
			}
			continue;
		}

		let start = request.start() as usize;
		let length = request.length() as usize;
		let mut all_corrected = true;
		for i in start..start + length {
			if !corrector.correct(i) {
				all_corrected = false;
				break;
			}
		}

		let response = if all_corrected {
			Some(corrector.store().read_values(start, length))
		} else {
			None
		};
		if let Err(e) = codec::write_response(&mut stream, response.as_deref()) {
			debug!("closing connection after write error: {}", e);
			return;
		}
	}
}
