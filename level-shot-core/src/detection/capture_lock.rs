use std::sync::atomic::{AtomicBool, Ordering};

/// Guard ensuring at most one capture is in flight.
#[derive(Debug, Default)]
pub struct CaptureLock {
    held: AtomicBool,
}

impl CaptureLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::SeqCst)
    }

    /// Acquire the lock if it is free. The lock is released when the guard drops.
    pub fn try_acquire(&self) -> Option<CaptureGuard<'_>> {
        self.held
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| CaptureGuard { lock: self })
    }
}

/// Held for the duration of one capture attempt.
#[derive(Debug)]
pub struct CaptureGuard<'a> {
    lock: &'a CaptureLock,
}

impl Drop for CaptureGuard<'_> {
    fn drop(&mut self) {
        self.lock.held.store(false, Ordering::SeqCst);
    }
}
