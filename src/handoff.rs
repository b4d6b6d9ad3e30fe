use std::sync::{Arc, Mutex, PoisonError};

/// Single-producer/single-consumer snapshot slot.
///
/// The estimation thread publishes whole immutable snapshots; the render
/// thread takes a reference-counted copy of the latest one at the top of a
/// frame. The lock is only held for the pointer swap or clone, never while a
/// frame is being composed. Last write wins and a reader can never observe a
/// half-written value.
pub struct SnapshotHandoff<T> {
    slot: Arc<Mutex<Arc<T>>>,
}

impl<T> SnapshotHandoff<T> {
    pub fn new(initial: T) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Arc::new(initial))),
        }
    }

    pub fn publish(&self, value: T) {
        let next = Arc::new(value);
        // Snapshots are immutable, so a poisoned slot still holds a whole value.
        let mut guard = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = next;
    }

    pub fn latest(&self) -> Arc<T> {
        let guard = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }
}

impl<T> Clone for SnapshotHandoff<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T: Default> Default for SnapshotHandoff<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn latest_reflects_last_publish() {
        let handoff = SnapshotHandoff::new(1u32);
        assert_eq!(*handoff.latest(), 1);
        handoff.publish(2);
        handoff.publish(3);
        assert_eq!(*handoff.latest(), 3);
    }

    #[test]
    fn previously_taken_snapshot_is_unaffected_by_publish() {
        let handoff = SnapshotHandoff::new(vec![1, 2, 3]);
        let held = handoff.latest();
        handoff.publish(vec![9]);
        assert_eq!(*held, vec![1, 2, 3]);
        assert_eq!(*handoff.latest(), vec![9]);
    }

    #[test]
    fn clones_share_one_slot_across_threads() {
        let handoff = SnapshotHandoff::new((0u64, 0u64));
        let producer = handoff.clone();
        let writer = thread::spawn(move || {
            for i in 1..=1000u64 {
                producer.publish((i, i * 2));
            }
        });
        for _ in 0..1000 {
            let (a, b) = *handoff.latest();
            assert_eq!(b, a * 2);
        }
        writer.join().unwrap();
        assert_eq!(*handoff.latest(), (1000, 2000));
    }
}
