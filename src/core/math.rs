// Math utilities and helper functions

use glam::Vec2;

/// Check if two f32 values are approximately equal
pub fn approx_equal(a: f32, b: f32, epsilon: f32) -> bool {
    (a - b).abs() < epsilon
}

/// Sign of a value as a facing multiplier: 1, -1, or 0 for zero input
pub fn sign_or_zero(value: f32) -> i32 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}

/// Critically damped approach of `current` toward `target`.
///
/// `velocity` is the reference-velocity accumulator and must be kept by the
/// caller between calls. The result never overshoots the target.
pub fn smooth_damp(
    current: Vec2,
    target: Vec2,
    velocity: &mut Vec2,
    smooth_time: f32,
    dt: f32,
) -> Vec2 {
    if dt <= 0.0 {
        return current;
    }

    let smooth_time = smooth_time.max(0.0001);
    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    let exp = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (*velocity + omega * change) * dt;
    *velocity = (*velocity - omega * temp) * exp;
    let mut output = target + (change + temp) * exp;

    // Clamp if we stepped past the target
    if (target - current).dot(output - target) > 0.0 {
        output = target;
        *velocity = (output - target) / dt;
    }

    output
}
