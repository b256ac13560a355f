use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Single-flight ingestion state: an "in progress" flag plus the lock that
/// guards it.
///
/// The flag only changes while the lock is held. `try_begin` never waits; a
/// second caller gets `None` right away.
#[derive(Default)]
pub struct IngestState {
    running: Arc<AtomicBool>,
    lock: Arc<Mutex<()>>,
}

impl IngestState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the lock without blocking and marks ingestion as running.
    ///
    /// The guard owns its permit, so it can be moved into the tasks doing the
    /// work and outlive the caller's future.
    pub fn try_begin(&self) -> Option<IngestGuard> {
        let permit = self.lock.clone().try_lock_owned().ok()?;
        self.running.store(true, Ordering::SeqCst);

        Some(IngestGuard {
            running: self.running.clone(),
            _permit: permit,
        })
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

/// Held for the whole ingestion run.
///
/// Dropping it (normal return, `?`, panic unwinding, or the task that owns it
/// finishing) clears the flag and then releases the lock.
pub struct IngestGuard {
    running: Arc<AtomicBool>,
    _permit: OwnedMutexGuard<()>,
}

impl IngestGuard {
    /// Ends the run explicitly. Equivalent to dropping the guard.
    pub fn end(self) {}
}

impl Drop for IngestGuard {
    fn drop(&mut self) {
        // Runs before `_permit` is dropped, so the flag is cleared under the lock.
        self.running.store(false, Ordering::SeqCst);
    }
}
