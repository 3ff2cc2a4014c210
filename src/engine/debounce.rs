// src/engine/debounce.rs

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::trace;

/// Single-slot debouncer: last call wins.
///
/// The debouncer holds the newest argument itself. The timer task only
/// announces that a quiet period ended by calling `on_fire` with the
/// generation it was armed for; the owner then claims the argument with
/// [`take_fired`](Debouncer::take_fired) on its own loop. Every
/// [`call`](Debouncer::call) and [`cancel`](Debouncer::cancel) starts a new
/// generation, so an announcement that was already in flight when the
/// debouncer was re-armed or cancelled claims nothing.
///
/// The timer is a Tokio task, so `call` must run inside a runtime. Dropping
/// the debouncer aborts the pending timer.
pub struct Debouncer<T> {
    delay: Duration,
    on_fire: Arc<dyn Fn(u64) + Send + Sync>,
    generation: u64,
    latest: Option<T>,
    timer: Option<JoinHandle<()>>,
}

impl<T> fmt::Debug for Debouncer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Debouncer")
            .field("delay", &self.delay)
            .field("generation", &self.generation)
            .field("pending", &self.is_pending())
            .finish_non_exhaustive()
    }
}

impl<T> Debouncer<T> {
    pub fn new<F>(on_fire: F, delay: Duration) -> Self
    where
        F: Fn(u64) + Send + Sync + 'static,
    {
        Self {
            delay,
            on_fire: Arc::new(on_fire),
            generation: 0,
            latest: None,
            timer: None,
        }
    }

    /// Store `arg` as the newest argument and re-arm the timer.
    pub fn call(&mut self, arg: T) {
        self.abort_timer();
        self.generation = self.generation.wrapping_add(1);
        self.latest = Some(arg);

        let on_fire = Arc::clone(&self.on_fire);
        let generation = self.generation;
        let deadline = Instant::now() + self.delay;
        self.timer = Some(tokio::spawn(async move {
            sleep_until(deadline).await;
            on_fire(generation);
        }));
    }

    /// Claim the argument for a fired timer.
    ///
    /// Returns `None` if `generation` has been superseded by a later
    /// `call` or by `cancel`.
    pub fn take_fired(&mut self, generation: u64) -> Option<T> {
        if generation != self.generation {
            trace!(generation, current = self.generation, "stale debounce timer");
            return None;
        }
        self.timer = None;
        self.latest.take()
    }

    /// Drop the pending argument. Returns true if one was waiting.
    pub fn cancel(&mut self) -> bool {
        self.abort_timer();
        self.generation = self.generation.wrapping_add(1);
        let was_pending = self.latest.take().is_some();
        if was_pending {
            trace!("cancelled pending debounced call");
        }
        was_pending
    }

    pub fn is_pending(&self) -> bool {
        self.latest.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    fn abort_timer(&mut self) {
        if let Some(handle) = self.timer.take() {
            handle.abort();
        }
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.abort_timer();
    }
}
