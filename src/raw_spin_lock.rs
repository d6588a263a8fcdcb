use core::sync::atomic::{AtomicBool, Ordering};
use lock_api::{GuardSend, Mutex, RawMutex};

/// Test-and-set spinlock guarding the block table.
///
/// Operations never block or yield while holding it, so contention only
/// lasts as long as one split or merge cascade.
pub struct RawSpinlock(AtomicBool);

pub type SpinMutex<T> = Mutex<RawSpinlock, T>;

unsafe impl RawMutex for RawSpinlock {
    const INIT: RawSpinlock = RawSpinlock(AtomicBool::new(false));
    type GuardMarker = GuardSend;

    fn lock(&self) {
        while !self.try_lock() {
            while self.0.load(Ordering::Relaxed) {
                core::hint::spin_loop();
            }
        }
    }

    fn try_lock(&self) -> bool {
        self.0
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
    }

    unsafe fn unlock(&self) {
        self.0.store(false, Ordering::Release);
    }

    fn is_locked(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_releases_on_drop() {
        let mutex: SpinMutex<usize> = SpinMutex::new(0);
        {
            let mut guard = mutex.lock();
            *guard += 1;
            assert!(mutex.is_locked());
            assert!(mutex.try_lock().is_none());
        }
        assert!(!mutex.is_locked());
        assert_eq!(*mutex.lock(), 1);
    }
}
