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

//! The parity-protected byte store, peer wire protocol, bootstrap
//! coordination and error correction that make up one parityfleet node.

#![deny(non_upper_case_globals)]
#![deny(non_camel_case_types)]
#![deny(non_snake_case)]
#![deny(unused_mut)]

#[macro_use]
extern crate log;

pub mod byte;
pub mod codec;
pub mod corrector;
pub mod correction_loop;
pub mod downloader;
pub mod queue;
pub mod request;
pub mod server;
pub mod store;
pub mod ticket;
pub mod types;

pub use byte::ParityByte;
pub use corrector::ErrorCorrector;
pub use queue::RequestQueue;
pub use request::BlockRequest;
pub use server::NodeServer;
pub use store::ByteStore;
pub use ticket::TicketMap;
pub use types::{Error, BLOCK_SIZE, STORE_LEN};
