//! Tween instances
//!
//! A [`Tween`] owns at most one run at a time. Starting it normalizes the
//! caller's [`TweenSettings`] into a context, registers the context with
//! the scheduler, and the scheduler's tick loop drives the run from there.
//! Cancel, finish, restart, and drop all tear the registration down; only
//! `finish` (or internal completion) delivers the one-shot callback with
//! the exact target value.

use std::time::{Duration, Instant};

use crate::ease::{self, EasingFn};
use crate::scheduler::{SchedulerHandle, TweenId};

/// Per-tick callback. Receives the current interpolated value; any other
/// state the callback needs is captured by the closure.
pub type StepFn = Box<dyn FnMut(f32) + Send>;

/// Where a run's callback currently is.
///
/// The tick loop checks the callback out of the registry before delivering
/// so user code runs without the lock held. Teardown during delivery has to
/// stay observable through the registry entry: a `finish()` that finds the
/// callback checked out (a reentrant call, or another thread mid-tick)
/// flags the entry, and the delivery in flight completes the run when the
/// callback comes back.
pub(crate) enum StepSlot {
    /// No callback was supplied.
    Empty,
    /// Callback parked in the registry between ticks.
    Parked(StepFn),
    /// Callback checked out by an in-flight delivery.
    Delivering { finish_requested: bool },
}

impl StepSlot {
    /// Take the parked callback out, leaving a `Delivering` marker. Returns
    /// `None` (slot untouched) if nothing is parked.
    pub(crate) fn check_out(&mut self) -> Option<StepFn> {
        match std::mem::replace(
            self,
            StepSlot::Delivering {
                finish_requested: false,
            },
        ) {
            StepSlot::Parked(on_step) => Some(on_step),
            other => {
                *self = other;
                None
            }
        }
    }

    /// Consume the slot, yielding the callback if one is parked.
    pub(crate) fn into_parked(self) -> Option<StepFn> {
        match self {
            StepSlot::Parked(on_step) => Some(on_step),
            _ => None,
        }
    }
}

/// Run configuration accepted by [`Tween::start`].
///
/// `from`, `time` (milliseconds), and the easing function are required.
/// Exactly one of [`to`](Self::to) / [`delta`](Self::delta) is expected;
/// when both are supplied `to` wins and `delta` is recomputed. Settings are
/// not validated for conforming values; a zero duration or a NaN simply
/// produces the arithmetic it produces.
///
/// # Example
///
/// ```ignore
/// let settings = TweenSettings::new(0.0, 250.0, ease::quad_out)
///     .to(1.0)
///     .on_step(|v| println!("{v}"));
/// ```
pub struct TweenSettings {
    from: f32,
    to: Option<f32>,
    delta: Option<f32>,
    time: f32,
    elapsed: f32,
    easing: EasingFn,
    on_step: Option<StepFn>,
}

impl TweenSettings {
    /// Create settings for a run starting at `from` lasting `time`
    /// milliseconds under `easing`.
    pub fn new(from: f32, time: f32, easing: EasingFn) -> Self {
        Self {
            from,
            to: None,
            delta: None,
            time,
            elapsed: 0.0,
            easing,
            on_step: None,
        }
    }

    /// Target value. Takes precedence over [`delta`](Self::delta) when both
    /// are supplied.
    pub fn to(mut self, to: f32) -> Self {
        self.to = Some(to);
        self
    }

    /// Change in value relative to `from`.
    pub fn delta(mut self, delta: f32) -> Self {
        self.delta = Some(delta);
        self
    }

    /// Time already consumed, in milliseconds. A nonzero value resumes the
    /// run mid-transition: the first reported value is the eased value at
    /// this offset rather than `from`.
    pub fn elapsed(mut self, elapsed: f32) -> Self {
        self.elapsed = elapsed;
        self
    }

    /// Callback invoked once per tick with the current value, and one final
    /// time with exactly the target value when the run completes.
    pub fn on_step<F>(mut self, on_step: F) -> Self
    where
        F: FnMut(f32) + Send + 'static,
    {
        self.on_step = Some(Box::new(on_step));
        self
    }
}

/// The normalized configuration and progress state of one active run.
///
/// Created by `start`, stored in the scheduler's registry, mutated by the
/// tick loop (its `elapsed` field and the callback slot), and destroyed by
/// cancel, finish, restart, or completion.
pub(crate) struct TweenContext {
    pub(crate) from: f32,
    pub(crate) to: f32,
    pub(crate) delta: f32,
    pub(crate) time: f32,
    pub(crate) elapsed: f32,
    pub(crate) started: Instant,
    pub(crate) easing: EasingFn,
    pub(crate) step: StepSlot,
}

impl TweenContext {
    pub(crate) fn normalize(settings: TweenSettings, now: Instant) -> Self {
        let TweenSettings {
            from,
            to,
            delta,
            time,
            elapsed,
            easing,
            on_step,
        } = settings;

        // `to` wins when both are supplied; the other is always derived so
        // the pair stays consistent for the whole run.
        let (to, delta) = match (to, delta) {
            (Some(to), _) => (to, to - from),
            (None, Some(delta)) => (from + delta, delta),
            (None, None) => (from, 0.0),
        };

        // The start epoch is backdated by any supplied `elapsed` so every
        // tick can recompute elapsed from the wall clock, immune to tick
        // jitter.
        let started = if elapsed > 0.0 && elapsed.is_finite() {
            now.checked_sub(Duration::from_secs_f32(elapsed / 1000.0))
                .unwrap_or(now)
        } else {
            now
        };

        Self {
            from,
            to,
            delta,
            time,
            elapsed,
            started,
            easing,
            step: match on_step {
                Some(on_step) => StepSlot::Parked(on_step),
                None => StepSlot::Empty,
            },
        }
    }

    /// Value for the current tick, computed from the elapsed time recorded
    /// at the previous tick boundary. Past the duration the value clamps to
    /// exactly `to`, guarding against overshoot from an inexact final tick.
    pub(crate) fn value(&self) -> f32 {
        if self.elapsed < self.time {
            (self.easing)(self.elapsed, self.from, self.delta, self.time)
        } else {
            self.to
        }
    }
}

/// A controllable interpolation of one numeric value over time.
///
/// Use this type alone or to build higher-level animation code on top of
/// it. An instance is either idle or busy; at most one run is registered
/// with the scheduler at any time, and restarting while busy tears the
/// previous run down without invoking its callback.
///
/// # Example
///
/// ```ignore
/// let scheduler = TweenScheduler::new();
/// let mut fade = Tween::new(scheduler.handle());
/// fade.start(
///     TweenSettings::new(1.0, 300.0, ease::cubic_out)
///         .to(0.0)
///         .on_step(|v| set_opacity(v)),
/// );
/// // host loop:
/// scheduler.tick();
/// ```
pub struct Tween {
    handle: SchedulerHandle,
    id: Option<TweenId>,
}

impl Tween {
    /// Create an idle instance bound to a scheduler.
    pub fn new(handle: SchedulerHandle) -> Self {
        Self { handle, id: None }
    }

    /// Commence a run. If a run is already in flight it is cancelled first
    /// (full teardown, no callback), so the old run's pending ticks can
    /// never fire.
    pub fn start(&mut self, settings: TweenSettings) {
        self.cancel();
        let ctx = TweenContext::normalize(settings, Instant::now());
        self.id = self.handle.register(ctx);
    }

    /// Destroy the current run without invoking its callback. No-op when
    /// idle. Effective immediately: a tick already in progress will find
    /// the registration gone and deliver nothing.
    pub fn cancel(&mut self) {
        if let Some(id) = self.id.take() {
            self.handle.deregister(id);
        }
    }

    /// Destroy the current run, then invoke its callback exactly once with
    /// exactly the target value. No-op when idle.
    ///
    /// Delivery is synchronous except when the run's callback is currently
    /// checked out by a tick (a reentrant call from inside `on_step`, or
    /// another thread mid-delivery); then the completion is delivered by
    /// that tick as soon as the callback returns.
    pub fn finish(&mut self) {
        if let Some(id) = self.id.take() {
            if let Some(ctx) = self.handle.finish(id) {
                if let Some(mut on_step) = ctx.step.into_parked() {
                    on_step(ctx.to);
                }
            }
        }
    }

    /// True exactly while a run is registered for this instance. Internal
    /// completion is observed immediately: this consults the registry, not
    /// a local flag.
    pub fn busy(&self) -> bool {
        self.id.is_some_and(|id| self.handle.is_registered(id))
    }
}

impl Drop for Tween {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Create a fresh instance and start it with the default cubic ease-in/out.
///
/// The returned instance retains `cancel`/`finish` control over the run.
pub fn tween<F>(handle: SchedulerHandle, from: f32, to: f32, time: f32, on_step: F) -> Tween
where
    F: FnMut(f32) + Send + 'static,
{
    tween_with(
        handle,
        TweenSettings::new(from, time, ease::cubic_in_out)
            .to(to)
            .on_step(on_step),
    )
}

/// Create a fresh instance and start it from full settings.
pub fn tween_with(handle: SchedulerHandle, settings: TweenSettings) -> Tween {
    let mut tween = Tween::new(handle);
    tween.start(settings);
    tween
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ease;
    use crate::scheduler::TweenScheduler;
    use std::sync::{Arc, Mutex};
    use std::thread;
    use std::time::Duration;

    fn recorder() -> (Arc<Mutex<Vec<f32>>>, impl FnMut(f32) + Send + 'static) {
        let values = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&values);
        (values, move |v: f32| sink.lock().unwrap().push(v))
    }

    #[test]
    fn linear_run_ascends_from_zero_to_one() {
        let scheduler = TweenScheduler::new();
        let (values, record) = recorder();

        let tween = tween_with(
            scheduler.handle(),
            TweenSettings::new(0.0, 50.0, ease::linear)
                .to(1.0)
                .on_step(record),
        );
        assert!(tween.busy());

        for _ in 0..200 {
            if !scheduler.tick() {
                break;
            }
            thread::sleep(Duration::from_millis(5));
        }

        let values = values.lock().unwrap();
        assert_eq!(*values.first().unwrap(), 0.0);
        assert_eq!(*values.last().unwrap(), 1.0);
        assert_eq!(values.iter().filter(|v| **v == 1.0).count(), 1);
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
        assert!(!tween.busy());
    }

    #[test]
    fn delta_run_descends_to_negative_target() {
        let scheduler = TweenScheduler::new();
        let (values, record) = recorder();

        let _tween = tween_with(
            scheduler.handle(),
            TweenSettings::new(0.0, 10.0, ease::linear)
                .delta(-1.0)
                .on_step(record),
        );

        thread::sleep(Duration::from_millis(30));
        scheduler.tick();
        scheduler.tick();

        let values = values.lock().unwrap();
        assert_eq!(*values.first().unwrap(), 0.0);
        assert_eq!(*values.last().unwrap(), -1.0);
    }

    #[test]
    fn to_wins_when_both_to_and_delta_are_supplied() {
        let scheduler = TweenScheduler::new();
        let (values, record) = recorder();

        let mut tween = tween_with(
            scheduler.handle(),
            TweenSettings::new(0.0, 50.0, ease::linear)
                .to(1.0)
                .delta(5.0)
                .on_step(record),
        );
        tween.finish();

        assert_eq!(*values.lock().unwrap(), vec![1.0]);
    }

    #[test]
    fn omitting_both_to_and_delta_completes_at_from() {
        let scheduler = TweenScheduler::new();
        let (values, record) = recorder();

        let _tween = tween_with(
            scheduler.handle(),
            TweenSettings::new(3.0, 50.0, ease::linear).on_step(record),
        );

        // First tick: value == from == to, so the run completes right away
        // with a single callback carrying the target.
        scheduler.tick();
        assert_eq!(*values.lock().unwrap(), vec![3.0]);
        assert_eq!(scheduler.tween_count(), 0);
    }

    #[test]
    fn nonzero_elapsed_resumes_mid_transition() {
        let scheduler = TweenScheduler::new();
        let (values, record) = recorder();

        let _tween = tween_with(
            scheduler.handle(),
            TweenSettings::new(0.0, 1000.0, ease::linear)
                .to(1.0)
                .elapsed(500.0)
                .on_step(record),
        );
        scheduler.tick();

        assert_eq!(*values.lock().unwrap(), vec![0.5]);
    }

    #[test]
    fn finish_after_completion_is_a_noop() {
        let scheduler = TweenScheduler::new();
        let (values, record) = recorder();

        let mut tween = tween_with(
            scheduler.handle(),
            TweenSettings::new(0.0, 10.0, ease::linear)
                .to(1.0)
                .on_step(record),
        );

        thread::sleep(Duration::from_millis(30));
        scheduler.tick();
        scheduler.tick();
        assert_eq!(*values.lock().unwrap().last().unwrap(), 1.0);

        let delivered = values.lock().unwrap().len();
        tween.finish();
        tween.cancel();
        assert_eq!(values.lock().unwrap().len(), delivered);
    }

    #[test]
    fn factory_starts_with_cubic_in_out_default() {
        let scheduler = TweenScheduler::new();
        let (values, record) = recorder();

        let t = tween(scheduler.handle(), 0.0, 1.0, 1000.0, record);
        assert!(t.busy());

        scheduler.tick();
        // cubic in/out at t=0 is exactly the starting value
        assert_eq!(*values.lock().unwrap(), vec![0.0]);
    }
}
