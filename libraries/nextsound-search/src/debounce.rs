//! Keystroke debouncing

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Lets only the last of a burst of inputs through
///
/// Each call to [`settle`](Self::settle) takes a new generation and waits
/// out the delay; it yields its value only if no later call arrived.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    generation: Arc<AtomicU64>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub async fn settle<T>(&self, value: T) -> Option<T> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.delay).await;
        (self.generation.load(Ordering::SeqCst) == generation).then_some(value)
    }

    /// Supersede any pending input
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}
