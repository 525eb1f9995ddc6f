//! Easing preset library
//!
//! Penner-style easing equations in `(t, b, c, d)` form: `t` is the elapsed
//! time, `b` the beginning value, `c` the change in value, `d` the total
//! duration. `t` and `d` share a unit (the engine uses milliseconds).
//!
//! Every preset is a plain `fn` so it can be stored in a
//! [`TweenSettings`](crate::tween::TweenSettings) directly; callers may
//! supply their own function with the same shape instead.

/// Pure easing function mapping `(elapsed, from, delta, duration)` to the
/// current value.
pub type EasingFn = fn(f32, f32, f32, f32) -> f32;

/// No easing; constant velocity.
pub fn linear(t: f32, b: f32, c: f32, d: f32) -> f32 {
    c * t / d + b
}

// ============================================================================
// Quadratic
// ============================================================================

/// Quadratic ease-in; accelerating from zero velocity.
pub fn quad_in(t: f32, b: f32, c: f32, d: f32) -> f32 {
    let t = t / d;
    c * t * t + b
}

/// Quadratic ease-out; decelerating to zero velocity.
pub fn quad_out(t: f32, b: f32, c: f32, d: f32) -> f32 {
    let t = t / d;
    -c * t * (t - 2.0) + b
}

/// Quadratic ease-in/out; acceleration until halfway, then deceleration.
pub fn quad_in_out(t: f32, b: f32, c: f32, d: f32) -> f32 {
    let t = t / (d / 2.0);
    if t < 1.0 {
        c / 2.0 * t * t + b
    } else {
        let t = t - 1.0;
        -c / 2.0 * (t * (t - 2.0) - 1.0) + b
    }
}

// ============================================================================
// Cubic
// ============================================================================

/// Cubic ease-in.
pub fn cubic_in(t: f32, b: f32, c: f32, d: f32) -> f32 {
    let t = t / d;
    c * t * t * t + b
}

/// Cubic ease-out.
pub fn cubic_out(t: f32, b: f32, c: f32, d: f32) -> f32 {
    let t = t / d - 1.0;
    c * (t * t * t + 1.0) + b
}

/// Cubic ease-in/out. The factory default.
pub fn cubic_in_out(t: f32, b: f32, c: f32, d: f32) -> f32 {
    let t = t / (d / 2.0);
    if t < 1.0 {
        c / 2.0 * t * t * t + b
    } else {
        let t = t - 2.0;
        c / 2.0 * (t * t * t + 2.0) + b
    }
}

// ============================================================================
// Quartic
// ============================================================================

/// Quartic ease-in.
pub fn quart_in(t: f32, b: f32, c: f32, d: f32) -> f32 {
    let t = t / d;
    c * t * t * t * t + b
}

/// Quartic ease-out.
pub fn quart_out(t: f32, b: f32, c: f32, d: f32) -> f32 {
    let t = t / d - 1.0;
    -c * (t * t * t * t - 1.0) + b
}

/// Quartic ease-in/out.
pub fn quart_in_out(t: f32, b: f32, c: f32, d: f32) -> f32 {
    let t = t / (d / 2.0);
    if t < 1.0 {
        c / 2.0 * t * t * t * t + b
    } else {
        let t = t - 2.0;
        -c / 2.0 * (t * t * t * t - 2.0) + b
    }
}

// ============================================================================
// Quintic
// ============================================================================

/// Quintic ease-in.
pub fn quint_in(t: f32, b: f32, c: f32, d: f32) -> f32 {
    let t = t / d;
    c * t * t * t * t * t + b
}

/// Quintic ease-out.
pub fn quint_out(t: f32, b: f32, c: f32, d: f32) -> f32 {
    let t = t / d - 1.0;
    c * (t * t * t * t * t + 1.0) + b
}

/// Quintic ease-in/out.
pub fn quint_in_out(t: f32, b: f32, c: f32, d: f32) -> f32 {
    let t = t / (d / 2.0);
    if t < 1.0 {
        c / 2.0 * t * t * t * t * t + b
    } else {
        let t = t - 2.0;
        c / 2.0 * (t * t * t * t * t + 2.0) + b
    }
}

// ============================================================================
// Sinusoidal
// ============================================================================

/// Sinusoidal ease-in.
pub fn sine_in(t: f32, b: f32, c: f32, d: f32) -> f32 {
    -c * (t / d * std::f32::consts::FRAC_PI_2).cos() + c + b
}

/// Sinusoidal ease-out.
pub fn sine_out(t: f32, b: f32, c: f32, d: f32) -> f32 {
    c * (t / d * std::f32::consts::FRAC_PI_2).sin() + b
}

/// Sinusoidal ease-in/out.
pub fn sine_in_out(t: f32, b: f32, c: f32, d: f32) -> f32 {
    -c / 2.0 * ((std::f32::consts::PI * t / d).cos() - 1.0) + b
}

// ============================================================================
// Exponential
// ============================================================================

/// Exponential ease-in. Exact at `t == 0`.
pub fn expo_in(t: f32, b: f32, c: f32, d: f32) -> f32 {
    if t == 0.0 {
        b
    } else {
        c * 2.0_f32.powf(10.0 * (t / d - 1.0)) + b
    }
}

/// Exponential ease-out. Exact at `t == d`.
pub fn expo_out(t: f32, b: f32, c: f32, d: f32) -> f32 {
    if t == d {
        b + c
    } else {
        c * (-(2.0_f32.powf(-10.0 * t / d)) + 1.0) + b
    }
}

/// Exponential ease-in/out. Exact at both endpoints.
pub fn expo_in_out(t: f32, b: f32, c: f32, d: f32) -> f32 {
    if t == 0.0 {
        return b;
    }
    if t == d {
        return b + c;
    }
    let t = t / (d / 2.0);
    if t < 1.0 {
        c / 2.0 * 2.0_f32.powf(10.0 * (t - 1.0)) + b
    } else {
        c / 2.0 * (-(2.0_f32.powf(-10.0 * (t - 1.0))) + 2.0) + b
    }
}

// ============================================================================
// Circular
// ============================================================================

/// Circular ease-in.
pub fn circ_in(t: f32, b: f32, c: f32, d: f32) -> f32 {
    let t = t / d;
    -c * ((1.0 - t * t).sqrt() - 1.0) + b
}

/// Circular ease-out.
pub fn circ_out(t: f32, b: f32, c: f32, d: f32) -> f32 {
    let t = t / d - 1.0;
    c * (1.0 - t * t).sqrt() + b
}

/// Circular ease-in/out.
pub fn circ_in_out(t: f32, b: f32, c: f32, d: f32) -> f32 {
    let t = t / (d / 2.0);
    if t < 1.0 {
        -c / 2.0 * ((1.0 - t * t).sqrt() - 1.0) + b
    } else {
        let t = t - 2.0;
        c / 2.0 * ((1.0 - t * t).sqrt() + 1.0) + b
    }
}

// ============================================================================
// Bounce
// ============================================================================

/// Bounce ease-in.
pub fn bounce_in(t: f32, b: f32, c: f32, d: f32) -> f32 {
    c - bounce_out(d - t, 0.0, c, d) + b
}

/// Bounce ease-out.
pub fn bounce_out(t: f32, b: f32, c: f32, d: f32) -> f32 {
    let i = 7.5625;
    let j = 2.75;
    let t = t / d;
    if t < 1.0 / j {
        c * (i * t * t) + b
    } else if t < 2.0 / j {
        let t = t - 1.5 / j;
        c * (i * t * t + 0.75) + b
    } else if t < 2.5 / j {
        let t = t - 2.25 / j;
        c * (i * t * t + 0.9375) + b
    } else {
        let t = t - 2.625 / j;
        c * (i * t * t + 0.984375) + b
    }
}

/// Bounce ease-in/out.
pub fn bounce_in_out(t: f32, b: f32, c: f32, d: f32) -> f32 {
    if t < d / 2.0 {
        bounce_in(t * 2.0, 0.0, c, d) * 0.5 + b
    } else {
        bounce_out(t * 2.0 - d, 0.0, c, d) * 0.5 + c * 0.5 + b
    }
}
