//! Save debouncing
//!
//! Workspace mutations arrive in bursts (a drag generates dozens of
//! resizes) while the on-disk state only needs to reflect where things
//! settled. The store marks itself dirty synchronously; the save path asks
//! a [`SaveDebouncer`] whether enough quiet time has passed before
//! actually writing, and keeps a pending flag so a trailing save is never
//! lost. Callers that need durability immediately bypass the debouncer
//! and flush directly.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Default delay between coalesced workspace saves.
pub const DEFAULT_SAVE_DELAY_MS: u64 = 1000;

/// Rate limiter for coalesced state saves.
pub struct SaveDebouncer {
    /// Minimum delay between saves
    delay: Duration,
    /// Last save instant
    last_save: Mutex<Option<Instant>>,
    /// Pending save flag
    pending: AtomicBool,
}

impl SaveDebouncer {
    /// Creates a debouncer with the specified delay.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_save: Mutex::new(None),
            pending: AtomicBool::new(false),
        }
    }

    /// Creates a debouncer with the default save delay.
    #[must_use]
    pub const fn for_autosave() -> Self {
        Self::new(Duration::from_millis(DEFAULT_SAVE_DELAY_MS))
    }

    /// Checks whether enough time has passed since the last save.
    ///
    /// Returns `true` if the save should proceed now; `false` if it should
    /// be skipped, in which case the pending flag is raised so the caller
    /// can retry on its next tick.
    #[must_use]
    pub fn should_save(&self) -> bool {
        let now = Instant::now();
        let mut last = match self.last_save.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        match *last {
            None => {
                *last = Some(now);
                self.pending.store(false, Ordering::SeqCst);
                true
            }
            Some(last_time) if now.duration_since(last_time) >= self.delay => {
                *last = Some(now);
                self.pending.store(false, Ordering::SeqCst);
                true
            }
            _ => {
                self.pending.store(true, Ordering::SeqCst);
                false
            }
        }
    }

    /// Marks that a save is pending.
    pub fn mark_pending(&self) {
        self.pending.store(true, Ordering::SeqCst);
    }

    /// Checks whether a save is pending.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.load(Ordering::SeqCst)
    }

    /// Resets the debouncer, e.g. after a forced flush.
    pub fn reset(&self) {
        let mut last = match self.last_save.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *last = None;
        self.pending.store(false, Ordering::SeqCst);
    }

    /// Returns the configured delay.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }
}
