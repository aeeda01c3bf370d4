use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use crate::models::error::CaptureError;
use crate::models::state::TimerToken;

struct TimerShared {
    cancelled: Mutex<bool>,
    wake: Condvar,
}

/// One-shot countdown running on its own thread.
///
/// Cancelling (or dropping) the timer before the deadline guarantees the
/// callback never runs. The thread is detached, so dropping the timer from
/// inside its own callback is fine.
pub struct DelayTimer {
    token: TimerToken,
    shared: Arc<TimerShared>,
}

impl DelayTimer {
    /// Run `on_expired` on a new thread once `delay` has elapsed.
    pub fn schedule<F>(token: TimerToken, delay: Duration, on_expired: F) -> Result<Self, CaptureError>
    where
        F: FnOnce(TimerToken) + Send + 'static,
    {
        let deadline = Instant::now()
            .checked_add(delay)
            .ok_or_else(|| CaptureError::TimerFailed(format!("delay {:?} out of range", delay)))?;
        let shared = Arc::new(TimerShared {
            cancelled: Mutex::new(false),
            wake: Condvar::new(),
        });

        let thread_shared = Arc::clone(&shared);
        thread::Builder::new()
            .name(format!("arm-delay-{}", token.0))
            .spawn(move || {
                let mut cancelled = thread_shared.cancelled.lock();
                while !*cancelled {
                    if thread_shared.wake.wait_until(&mut cancelled, deadline).timed_out() {
                        break;
                    }
                }
                if *cancelled {
                    return;
                }
                drop(cancelled);
                on_expired(token);
            })
            .map_err(|e| CaptureError::TimerFailed(format!("failed to spawn delay thread: {}", e)))?;

        log::debug!("delay timer {} scheduled for {:?}", token.0, delay);
        Ok(Self {
            token,
            shared,
        })
    }

    pub fn token(&self) -> TimerToken {
        self.token
    }

    pub fn cancel(&self) {
        let mut cancelled = self.shared.cancelled.lock();
        if !*cancelled {
            *cancelled = true;
            self.shared.wake.notify_all();
            log::debug!("delay timer {} cancelled", self.token.0);
        }
    }
}

impl Drop for DelayTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
