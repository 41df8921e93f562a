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

//! The bootstrap work queue: a multiset of block requests drained by `W`
//! downloader workers, with a completion barrier so the bootstrap driver
//! can block until every worker has either finished or given up.

use std::collections::VecDeque;

use parityfleet_util::{Condvar, Mutex};

use crate::request::BlockRequest;

struct Inner {
	pending: VecDeque<BlockRequest>,
	workers_remaining: usize,
	/// set once, when the last worker reports done; true iff the queue was
	/// empty at that point
	complete: Option<bool>,
}

/// Shared work queue for one bootstrap run. Constructed once with the full
/// set of block requests and the number of workers that will drain it;
/// discarded once the barrier releases.
pub struct RequestQueue {
	inner: Mutex<Inner>,
	barrier: Condvar,
}

impl RequestQueue {
	/// Builds a queue already holding `requests`, to be drained by
	/// `worker_count` workers.
	pub fn new(requests: Vec<BlockRequest>, worker_count: usize) -> RequestQueue {
		RequestQueue {
			inner: Mutex::new(Inner {
				pending: requests.into_iter().collect(),
				workers_remaining: worker_count,
				complete: None,
			}),
			barrier: Condvar::new(),
		}
	}

	/// Atomically removes and returns one request, or `None` if the queue
	/// is currently empty.
	pub fn take(&self) -> Option<BlockRequest> {
		self.inner.lock().pending.pop_front()
	}

	/// Pushes a request back to the tail. Used when a worker's peer
	/// connection fails with the request still outstanding.
	pub fn requeue(&self, request: BlockRequest) {
		self.inner.lock().pending.push_back(request);
	}

	/// Reports that a worker has exited. Releases the barrier once every
	/// worker has reported in.
	pub fn mark_worker_done(&self) {
		let mut inner = self.inner.lock();
		inner.workers_remaining -= 1;
		if inner.workers_remaining == 0 {
			let empty = inner.pending.is_empty();
			inner.complete = Some(empty);
			self.barrier.notify_all();
		}
	}

	/// Blocks the caller until every worker has reported done.
	pub fn await_completion(&self) {
		let mut inner = self.inner.lock();
		while inner.complete.is_none() {
			self.barrier.wait(&mut inner);
		}
	}

	/// True iff the barrier has released with the queue empty. Must be
	/// called after [`await_completion`](Self::await_completion).
	pub fn is_complete(&self) -> bool {
		self.inner.lock().complete.unwrap_or(false)
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use std::sync::Arc;
	use std::thread;

	#[test]
	fn single_worker_drains_to_completion() {
		let requests = vec![BlockRequest::new(0, 10), BlockRequest::new(10, 10)];
		let queue = RequestQueue::new(requests, 1);

		let mut seen = 0;
		while queue.take().is_some() {
			seen += 1;
		}
		assert_eq!(seen, 2);
		queue.mark_worker_done();
		queue.await_completion();
		assert!(queue.is_complete());
	}

	#[test]
	fn requeue_before_done_keeps_queue_non_empty() {
		let requests = vec![BlockRequest::new(0, 10)];
		let queue = RequestQueue::new(requests, 1);

		let req = queue.take().unwrap();
		queue.requeue(req);
		queue.mark_worker_done();
		queue.await_completion();
		assert!(!queue.is_complete());
	}

	#[test]
	fn two_workers_both_must_report_before_barrier_releases() {
		let requests: Vec<_> = (0..10).map(|i| BlockRequest::new(i * 10, 10)).collect();
		let queue = Arc::new(RequestQueue::new(requests, 2));

		let handles: Vec<_> = (0..2)
			.map(|_| {
				let queue = queue.clone();
				thread::spawn(move || {
					while let Some(_req) = queue.take() {
						// pretend to download
					}
					queue.mark_worker_done();
				})
			})
			.collect();

		for h in handles {
			h.join().unwrap();
		}
		queue.await_completion();
		assert!(queue.is_complete());
	}

	#[test]
	fn dead_peer_requeue_still_completes_via_surviving_worker() {
		let requests: Vec<_> = (0..5).map(|i| BlockRequest::new(i * 10, 10)).collect();
		let queue = Arc::new(RequestQueue::new(requests, 2));

		// worker A takes one request then "dies": requeues it and reports done
		let first = queue.take().unwrap();
		queue.requeue(first);
		queue.mark_worker_done();

		// worker B drains the rest, including the requeued one
		while queue.take().is_some() {}
		queue.mark_worker_done();

		queue.await_completion();
		assert!(queue.is_complete());
	}
}
