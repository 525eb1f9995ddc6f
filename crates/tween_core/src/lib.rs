//! Tween Engine
//!
//! Timed interpolation of single numeric values with pluggable easing.
//!
//! # Features
//!
//! - **Tween Instances**: Idle/busy lifecycle with at most one run each
//! - **Pluggable Easing**: Penner preset library, or any `fn(f32, f32, f32, f32) -> f32`
//! - **From/To/Delta**: Target either absolutely or relative to the start value
//! - **Mid-Run Resume**: Start a run with time already elapsed
//! - **Cancel/Finish**: Silent teardown, or one synchronous callback with the target
//! - **Scheduler**: Cooperative `tick()` or a fixed-cadence background thread

pub mod ease;
pub mod scheduler;
pub mod tween;

pub use ease::EasingFn;
pub use scheduler::{SchedulerHandle, TweenId, TweenScheduler, DEFAULT_CADENCE};
pub use tween::{tween, tween_with, StepFn, Tween, TweenSettings};
