use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, Weak};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// In-process leases serializing resyncs of the same event.
#[derive(Default)]
pub struct ResyncLeases {
	leases: Mutex<HashMap<String, Weak<AsyncMutex<()>>>>,
}

/// Held for the duration of one resync. Dropping it releases the event.
pub struct ResyncLease {
	_guard: OwnedMutexGuard<()>,
	contended: bool,
}

impl ResyncLease {
	/// Whether another resync of the same event held the lease while this one
	/// waited for it.
	pub fn contended(&self) -> bool {
		self.contended
	}
}

impl ResyncLeases {
	pub fn new() -> Self {
		Self::default()
	}

	pub async fn acquire(&self, event_id: &str) -> ResyncLease {
		let lock = {
			let mut leases = self.leases.lock().unwrap_or_else(PoisonError::into_inner);
			leases.retain(|_, lease| lease.strong_count() > 0);

			match leases.get(event_id).and_then(Weak::upgrade) {
				Some(lock) => lock,
				None => {
					let lock = Arc::new(AsyncMutex::new(()));
					leases.insert(event_id.to_string(), Arc::downgrade(&lock));
					lock
				}
			}
		};

		match lock.clone().try_lock_owned() {
			Ok(guard) => ResyncLease {
				_guard: guard,
				contended: false,
			},
			Err(_) => ResyncLease {
				_guard: lock.lock_owned().await,
				contended: true,
			},
		}
	}

	/// Number of events with a lease currently held or awaited.
	pub fn active(&self) -> usize {
		self.leases
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.values()
			.filter(|lease| lease.strong_count() > 0)
			.count()
	}
}
