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

//! Wire framing for the peer protocol (spec.md §6.2): a
//! [`BlockRequest`](crate::request::BlockRequest) travels as two big-endian
//! `i32`s; a response is a one-byte tag followed by a length-prefixed
//! payload, or nothing, for the null sentinel.

use std::io::{self, Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::request::BlockRequest;
use crate::types::Error;

const RESPONSE_NULL: u8 = 0;
const RESPONSE_DATA: u8 = 1;

/// Writes a request: `start: i32`, `length: i32`.
pub fn write_request<W: Write>(w: &mut W, req: &BlockRequest) -> io::Result<()> {
	w.write_i32::<BigEndian>(req.start())?;
	w.write_i32::<BigEndian>(req.length())?;
	w.flush()
}

/// Reads a request. Returns an `UnexpectedEof` error when the peer closed
/// the connection instead of sending another request — the caller's cue to
/// close cleanly rather than log a decoding failure.
pub fn read_request<R: Read>(r: &mut R) -> io::Result<BlockRequest> {
	let start = r.read_i32::<BigEndian>()?;
	let length = r.read_i32::<BigEndian>()?;
	Ok(BlockRequest::new(start, length))
}

/// Writes a response: either the null sentinel (one zero byte) or a data
/// tag followed by a 4-byte length and the raw bytes.
pub fn write_response<W: Write>(w: &mut W, data: Option<&[u8]>) -> io::Result<()> {
	match data {
		None => w.write_u8(RESPONSE_NULL)?,
		Some(bytes) => {
			w.write_u8(RESPONSE_DATA)?;
			w.write_i32::<BigEndian>(bytes.len() as i32)?;
			w.write_all(bytes)?;
		}
	}
	w.flush()
}

/// Reads a response frame. An unrecognized tag is a protocol error, not an
/// I/O error — the connection itself is intact, the peer just sent
/// nonsense.
pub fn read_response<R: Read>(r: &mut R) -> Result<Option<Vec<u8>>, Error> {
	let tag = r.read_u8()?;
	match tag {
		RESPONSE_NULL => Ok(None),
		RESPONSE_DATA => {
			let length = r.read_i32::<BigEndian>()?;
			if length < 0 {
				return Err(Error::Protocol(format!("negative response length {}", length)));
			}
			let mut buf = vec![0u8; length as usize];
			r.read_exact(&mut buf)?;
			Ok(Some(buf))
		}
		other => Err(Error::Protocol(format!("unknown response tag {}", other))),
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use std::io::Cursor;

	#[test]
	fn request_round_trips() {
		let req = BlockRequest::new(10_000, 10_000);
		let mut buf = Vec::new();
		write_request(&mut buf, &req).unwrap();
		let mut cursor = Cursor::new(buf);
		let decoded = read_request(&mut cursor).unwrap();
		assert_eq!(decoded, req);
	}

	#[test]
	fn negative_start_round_trips_without_erroring() {
		let req = BlockRequest::new(-1, 10);
		let mut buf = Vec::new();
		write_request(&mut buf, &req).unwrap();
		let mut cursor = Cursor::new(buf);
		assert_eq!(read_request(&mut cursor).unwrap(), req);
	}

	#[test]
	fn data_response_round_trips() {
		let payload = vec![1u8, 2, 3, 4, 5];
		let mut buf = Vec::new();
		write_response(&mut buf, Some(&payload)).unwrap();
		let mut cursor = Cursor::new(buf);
		assert_eq!(read_response(&mut cursor).unwrap(), Some(payload));
	}

	#[test]
	fn null_response_round_trips() {
		let mut buf = Vec::new();
		write_response(&mut buf, None).unwrap();
		let mut cursor = Cursor::new(buf);
		assert_eq!(read_response(&mut cursor).unwrap(), None);
	}

	#[test]
	fn unknown_tag_is_protocol_error() {
		let mut cursor = Cursor::new(vec![0x7fu8]);
		match read_response(&mut cursor) {
			Err(Error::Protocol(_)) => {}
			other => panic!("expected Protocol error, got {:?}", other),
		}
	}

	#[test]
	fn empty_stream_read_request_is_eof() {
		let mut cursor = Cursor::new(Vec::<u8>::new());
		let err = read_request(&mut cursor).unwrap_err();
		assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
	}
}
