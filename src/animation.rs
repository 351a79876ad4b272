/// Linearly interpolates a value between `[min, max]`, given a `t` between
/// `[0, 1]`.
///
/// Unlike a clamped lerp, `t` is used as-is so the caller decides how to
/// handle the bounds.
#[inline]
pub fn lerp(min: f64, max: f64, t: f64) -> f64 {
    min + (max - min) * t
}

/// Maps a value `x` in `[0, 1]` onto an ease-in-out curve in `[0, 1]`.
///
/// The curve is
///
/// ```text
///             x^p
/// f(x) = ---------------
///        x^p + (1 - x)^p
/// ```
///
/// where `p` is `power`. A power of `1` is linear, and higher powers give a
/// steeper middle with flatter ends. `f(0) = 0`, `f(0.5) = 0.5` and
/// `f(1) = 1` for every positive power.
///
/// Only defined for `x` in `[0, 1]` and `power > 0`.
#[inline]
pub fn parameterized_ease_in_out(x: f64, power: f64) -> f64 {
    let num = x.powf(power);
    num / (num + (1. - x).powf(power))
}

/// Eases from `v1` to `v2` based on how much of `duration` has elapsed.
///
/// An `elapsed` of zero or less yields exactly `v1`, and anything at or past
/// `duration` yields exactly `v2`.
pub fn ease_in_out(power: f64, v1: f64, v2: f64, duration: f64, elapsed: f64) -> f64 {
    if elapsed <= 0. {
        return v1;
    }
    if elapsed >= duration {
        return v2;
    }

    let t = parameterized_ease_in_out(elapsed / duration, power);
    lerp(v1, v2, t)
}
