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

//! Line-oriented client for the external directory service (spec.md §6.1).
//! The directory itself is out of scope; this is the contract the node
//! consumes: register once on connect, then ask for the current peer list
//! as many times as needed over the life of the process.

use std::io::{BufRead, BufReader, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};

use parityfleet_util::Mutex;

use crate::types::{DirectoryError, PeerEndpoint};

/// A registered connection to the directory. Calls on one `DirectoryClient`
/// serialize against each other (spec.md §5: "only the corrector and
/// bootstrap driver invoke it, and callers must serialize against each
/// other") by holding a single mutex for the whole round trip of a call.
pub struct DirectoryClient {
	conn: Mutex<TcpStream>,
	local: PeerEndpoint,
}

impl DirectoryClient {
	/// Opens the directory connection and registers `local` with it.
	pub fn connect<A: ToSocketAddrs>(
		directory_addr: A,
		local: PeerEndpoint,
	) -> Result<DirectoryClient, DirectoryError> {
		let stream = TcpStream::connect(directory_addr)?;
		let client = DirectoryClient {
			conn: Mutex::new(stream),
			local,
		};
		client.register()?;
		Ok(client)
	}

	fn register(&self) -> Result<(), DirectoryError> {
		let mut stream = self.conn.lock();
		let line = format!("INSC {} {}\n", self.local.host, self.local.port);
		stream.write_all(line.as_bytes())?;
		debug!("registered with directory as {}", self.local);
		Ok(())
	}

	/// Requests the current peer list, filtering out this node's own
	/// endpoint (spec.md §6.1).
	pub fn list_peers(&self) -> Result<Vec<PeerEndpoint>, DirectoryError> {
		let stream = self.conn.lock();
		let mut writer = &*stream;
		writer.write_all(b"nodes\n")?;

		let mut reader = BufReader::new(&*stream);
		let mut peers = Vec::new();
		loop {
			let mut line = String::new();
			let read = reader.read_line(&mut line)?;
			if read == 0 {
				return Err(DirectoryError::Protocol(
					"connection closed before 'end' line".to_string(),
				));
			}
			let line = line.trim();
			if line.eq_ignore_ascii_case("end") {
				break;
			}
			match parse_node_line(line) {
				Some(ep) if ep != self.local => peers.push(ep),
				Some(_) => { /* our own endpoint, filtered */ }
				None => warn!("ignoring malformed directory line: {:?}", line),
			}
		}
		Ok(peers)
	}

	/// Closes the directory connection, used during shutdown.
	pub fn close(&self) {
		let stream = self.conn.lock();
		let _ = stream.shutdown(Shutdown::Both);
	}
}

fn parse_node_line(line: &str) -> Option<PeerEndpoint> {
	let mut parts = line.split_whitespace();
	let tag = parts.next()?;
	if !tag.eq_ignore_ascii_case("node") {
		return None;
	}
	let host = parts.next()?.to_string();
	let port: u16 = parts.next()?.parse().ok()?;
	Some(PeerEndpoint { host, port })
}
