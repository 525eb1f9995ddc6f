//! Tween scheduler
//!
//! Owns the registry of active runs and drives the shared step routine.
//! Instances register their contexts through a [`SchedulerHandle`]; the
//! host either calls [`TweenScheduler::tick`] from its own loop or lets the
//! scheduler tick itself on a background thread at a fixed cadence.

use crate::tween::{StepSlot, TweenContext};
use slotmap::{new_key_type, SlotMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Tick interval of the background driver, shared by all instances
/// (~50 ticks/second).
pub const DEFAULT_CADENCE: Duration = Duration::from_millis(20);

new_key_type! {
    /// Handle to a registered tween run
    pub struct TweenId;
}

/// Internal state of the scheduler: the registry of active runs.
struct SchedulerInner {
    tweens: SlotMap<TweenId, TweenContext>,
}

impl SchedulerInner {
    /// Remove a run for completion delivery. If its callback is checked
    /// out by an in-flight delivery, flag the entry instead and return
    /// `None`; that delivery completes the run when the callback returns.
    fn finish_entry(&mut self, id: TweenId) -> Option<TweenContext> {
        if let Some(ctx) = self.tweens.get_mut(id) {
            if let StepSlot::Delivering { finish_requested } = &mut ctx.step {
                *finish_requested = true;
                return None;
            }
        }
        self.tweens.remove(id)
    }
}

/// The scheduler that ticks all active tween runs.
///
/// The registry is empty at construction; entries are added when an
/// instance starts and removed on cancel, finish, restart, completion, or
/// instance drop. Keys are versioned, so an instance holding a stale id
/// after its run completed can never touch a newer run.
///
/// # Background mode
///
/// ```ignore
/// let mut scheduler = TweenScheduler::new();
/// scheduler.run_background(); // ticks every 20ms until stopped or dropped
/// ```
pub struct TweenScheduler {
    inner: Arc<Mutex<SchedulerInner>>,
    cadence: Duration,
    /// Background thread and its stop signal (if running). Each
    /// `run_background` call gets its own flag, so only the scheduler that
    /// owns the thread can stop it.
    background: Option<(Arc<AtomicBool>, JoinHandle<()>)>,
}

impl TweenScheduler {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(SchedulerInner {
                tweens: SlotMap::with_key(),
            })),
            cadence: DEFAULT_CADENCE,
            background: None,
        }
    }

    /// Get a handle to this scheduler for binding instances to it.
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// The tick interval used by the background driver.
    pub fn cadence(&self) -> Duration {
        self.cadence
    }

    /// Set the tick interval. Applies to the next `run_background()` call;
    /// cooperative `tick()` callers pace themselves.
    pub fn set_cadence(&mut self, cadence: Duration) {
        self.cadence = cadence;
    }

    /// Run the step routine once for every registered run.
    ///
    /// Returns true if any runs remain registered (i.e. another tick is
    /// needed).
    pub fn tick(&self) -> bool {
        Self::tick_registry(&self.inner)
    }

    fn tick_registry(inner: &Arc<Mutex<SchedulerInner>>) -> bool {
        let now = Instant::now();

        // Phase 1: compute each run's value and advance its clock under the
        // lock. Elapsed advances only after the value for this tick is
        // taken, so the first tick reports exactly `from` (no jump from
        // scheduler latency) and the final tick reports exactly `to`.
        let mut due: Vec<(TweenId, f32, bool)> = Vec::new();
        {
            let mut guard = inner.lock().unwrap();
            due.reserve(guard.tweens.len());
            for (id, ctx) in guard.tweens.iter_mut() {
                let value = ctx.value();
                ctx.elapsed = now.duration_since(ctx.started).as_secs_f32() * 1000.0;
                due.push((id, value, value == ctx.to));
            }
        }

        // Phase 2: deliver callbacks with the lock released, so a callback
        // may start, cancel, or finish tweens re-entrantly. A run cancelled
        // since its value was computed gets no callback; a run finished
        // while its callback was checked out gets its completion delivered
        // here, with the checked-out callback.
        for (id, value, done) in due {
            if done {
                // Deregister first: the completion callback always observes
                // an idle instance and always receives exactly the target.
                let removed = inner.lock().unwrap().finish_entry(id);
                if let Some(ctx) = removed {
                    tracing::trace!(?id, to = ctx.to, "tween complete");
                    if let Some(mut on_step) = ctx.step.into_parked() {
                        on_step(ctx.to);
                    }
                }
            } else {
                let checked_out = inner
                    .lock()
                    .unwrap()
                    .tweens
                    .get_mut(id)
                    .and_then(|ctx| ctx.step.check_out());
                if let Some(mut on_step) = checked_out {
                    on_step(value);

                    // Park the callback again, honoring teardown requested
                    // while it was out: a finish gets its completion now, a
                    // cancel leaves nothing to deliver.
                    let mut guard = inner.lock().unwrap();
                    let finish_requested = matches!(
                        guard.tweens.get(id).map(|ctx| &ctx.step),
                        Some(StepSlot::Delivering {
                            finish_requested: true
                        })
                    );
                    if finish_requested {
                        let removed = guard.tweens.remove(id);
                        drop(guard);
                        if let Some(ctx) = removed {
                            tracing::trace!(?id, to = ctx.to, "tween complete");
                            on_step(ctx.to);
                        }
                    } else if let Some(ctx) = guard.tweens.get_mut(id) {
                        ctx.step = StepSlot::Parked(on_step);
                    }
                }
            }
        }

        !inner.lock().unwrap().tweens.is_empty()
    }

    /// Start ticking on a background thread at the configured cadence.
    ///
    /// Runs until `stop_background()` or drop. Use this when the host has
    /// no loop of its own to call `tick()` from.
    pub fn run_background(&mut self) {
        if self.background.is_some() {
            return; // Already running
        }

        tracing::debug!(
            cadence_ms = self.cadence.as_millis() as u64,
            "tween scheduler: background driver started"
        );

        let inner = Arc::clone(&self.inner);
        let stop_flag = Arc::new(AtomicBool::new(false));
        let thread_flag = Arc::clone(&stop_flag);
        let cadence = self.cadence;

        let handle = thread::spawn(move || {
            while !thread_flag.load(Ordering::Relaxed) {
                let tick_start = Instant::now();
                Self::tick_registry(&inner);

                // Sleep for the remaining cadence time
                let spent = tick_start.elapsed();
                if spent < cadence {
                    thread::sleep(cadence - spent);
                }
            }
        });
        self.background = Some((stop_flag, handle));
    }

    /// Stop the background thread. No-op on a scheduler that doesn't own
    /// one (never started, or a clone).
    pub fn stop_background(&mut self) {
        if let Some((stop_flag, handle)) = self.background.take() {
            stop_flag.store(true, Ordering::Relaxed);
            let _ = handle.join();
            tracing::debug!("tween scheduler: background driver stopped");
        }
    }

    /// Check if this scheduler owns a running background thread.
    pub fn is_background_running(&self) -> bool {
        self.background.is_some()
    }

    /// Number of runs currently registered.
    pub fn tween_count(&self) -> usize {
        self.inner.lock().unwrap().tweens.len()
    }

    /// Check if any runs are registered.
    pub fn has_active_tweens(&self) -> bool {
        !self.inner.lock().unwrap().tweens.is_empty()
    }
}

impl Default for TweenScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for TweenScheduler {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            cadence: self.cadence,
            // Cloned scheduler doesn't own the background thread
            background: None,
        }
    }
}

impl Drop for TweenScheduler {
    fn drop(&mut self) {
        self.stop_background();
    }
}

/// A weak handle to the scheduler's registry.
///
/// Instances use it to register and deregister their contexts; it won't
/// prevent the scheduler from being dropped. Operations on a dead handle
/// are no-ops, so an instance bound to a dropped scheduler simply never
/// becomes busy.
#[derive(Clone)]
pub struct SchedulerHandle {
    inner: Weak<Mutex<SchedulerInner>>,
}

impl SchedulerHandle {
    /// Register a run and return its id.
    pub(crate) fn register(&self, ctx: TweenContext) -> Option<TweenId> {
        self.inner
            .upgrade()
            .map(|inner| inner.lock().unwrap().tweens.insert(ctx))
    }

    /// Remove a run, returning its context if it was still registered.
    pub(crate) fn deregister(&self, id: TweenId) -> Option<TweenContext> {
        self.inner
            .upgrade()
            .and_then(|inner| inner.lock().unwrap().tweens.remove(id))
    }

    /// Remove a run for completion. Returns the context for the caller to
    /// deliver; `None` when nothing is registered, or when the callback is
    /// checked out by an in-flight delivery (then that delivery completes
    /// the run itself).
    pub(crate) fn finish(&self, id: TweenId) -> Option<TweenContext> {
        self.inner
            .upgrade()
            .and_then(|inner| inner.lock().unwrap().finish_entry(id))
    }

    /// Check whether a run is still registered.
    pub(crate) fn is_registered(&self, id: TweenId) -> bool {
        self.inner
            .upgrade()
            .map(|inner| inner.lock().unwrap().tweens.contains_key(id))
            .unwrap_or(false)
    }

    /// Check if the scheduler is still alive.
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}
