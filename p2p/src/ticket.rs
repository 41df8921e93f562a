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

//! A small index -> in-progress marker map, guarded by one lock, that
//! replaces any reliance on per-index monitor semantics. At most one
//! ticket exists per index at any instant; `wait_for_release` lets a
//! second thread block on the first thread's outcome instead of racing it.

use std::collections::HashSet;

use parityfleet_util::{Condvar, Mutex};

/// Coalesces concurrent correction attempts on the same byte index.
pub struct TicketMap {
	inflight: Mutex<HashSet<usize>>,
	released: Condvar,
}

impl TicketMap {
	/// An empty ticket map.
	pub fn new() -> TicketMap {
		TicketMap {
			inflight: Mutex::new(HashSet::new()),
			released: Condvar::new(),
		}
	}

	/// Tries to claim the ticket for `index`. Returns `true` if this call
	/// claimed it, `false` if another thread already holds it.
	pub fn try_acquire(&self, index: usize) -> bool {
		self.inflight.lock().insert(index)
	}

	/// Releases the ticket for `index` and wakes any threads blocked in
	/// [`wait_for_release`](Self::wait_for_release).
	pub fn release(&self, index: usize) {
		self.inflight.lock().remove(&index);
		self.released.notify_all();
	}

	/// True iff a ticket currently exists for `index`.
	pub fn is_ticketed(&self, index: usize) -> bool {
		self.inflight.lock().contains(&index)
	}

	/// Blocks until the ticket for `index` is released (or was never held).
	pub fn wait_for_release(&self, index: usize) {
		let mut guard = self.inflight.lock();
		while guard.contains(&index) {
			self.released.wait(&mut guard);
		}
	}
}

impl Default for TicketMap {
	fn default() -> TicketMap {
		TicketMap::new()
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use std::sync::Arc;
	use std::thread;
	use std::time::Duration;

	#[test]
	fn second_acquire_on_same_index_is_rejected() {
		let tickets = TicketMap::new();
		assert!(tickets.try_acquire(7));
		assert!(!tickets.try_acquire(7));
		tickets.release(7);
		assert!(tickets.try_acquire(7));
	}

	#[test]
	fn different_indices_do_not_collide() {
		let tickets = TicketMap::new();
		assert!(tickets.try_acquire(1));
		assert!(tickets.try_acquire(2));
	}

	#[test]
	fn wait_for_release_unblocks_after_release() {
		let tickets = Arc::new(TicketMap::new());
		assert!(tickets.try_acquire(3));

		let waiter = {
			let tickets = tickets.clone();
			thread::spawn(move || {
				tickets.wait_for_release(3);
			})
		};

		thread::sleep(Duration::from_millis(20));
		tickets.release(3);
		waiter.join().unwrap();
	}
}
