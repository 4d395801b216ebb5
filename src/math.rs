//! Vector helpers layered over [`glam::Vec2`].
//!
//! Componentwise arithmetic comes from glam's operators. The `const_*`
//! variants can be evaluated at compile time, which `f32::sqrt` cannot, so
//! they fall back to Newton-Raphson.

use glam::Vec2;

// Newton-Raphson from above converges in well under this many steps for
// any finite f32; the cap only guards against a two-value oscillation.
const NEWTON_MAX_ITERATIONS: u32 = 256;

#[inline]
pub const fn dot(a: Vec2, b: Vec2) -> f32 {
    a.x * b.x + a.y * b.y
}

#[inline]
pub fn square_root(x: f32) -> f32 {
    x.sqrt()
}

/// Square root usable in const contexts.
///
/// Returns NaN for negative, NaN and infinite inputs.
pub const fn const_square_root(x: f32) -> f32 {
    if !(x >= 0.0 && x < f32::INFINITY) {
        return f32::NAN;
    }
    if x == 0.0 {
        return 0.0;
    }

    let mut curr = x;
    let mut prev = 0.0;
    let mut i = 0;
    while curr != prev && i < NEWTON_MAX_ITERATIONS {
        let next = 0.5 * (curr + x / curr);
        if next == prev {
            // flip-flopping between two neighbours; take the smaller
            return if next < curr { next } else { curr };
        }
        prev = curr;
        curr = next;
        i += 1;
    }
    curr
}

#[inline]
pub fn mag(v: Vec2) -> f32 {
    square_root(dot(v, v))
}

pub const fn const_mag(v: Vec2) -> f32 {
    const_square_root(dot(v, v))
}

/// Scale `v` to unit length. A zero vector yields NaN components.
#[inline]
pub fn normalize(v: Vec2) -> Vec2 {
    v / mag(v)
}

pub const fn const_normalize(v: Vec2) -> Vec2 {
    let m = const_mag(v);
    Vec2::new(v.x / m, v.y / m)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    const DIAGONAL: Vec2 = const_normalize(Vec2::new(1.0, 1.0));

    #[test]
    fn const_sqrt_matches_hardware_sqrt() {
        let samples = [
            1e-30, 1e-6, 0.01, 0.5, 1.0, 2.0, 3.0, 10.0, 1234.5, 1e10, 3.4e38,
        ];
        for x in samples {
            assert_relative_eq!(const_square_root(x), square_root(x), max_relative = 1e-6);
        }
        for i in 1..1000 {
            let x = i as f32 * 0.37;
            assert_relative_eq!(const_square_root(x), x.sqrt(), max_relative = 1e-6);
        }
    }

    #[test]
    fn const_sqrt_rejects_bad_input() {
        assert_eq!(const_square_root(0.0), 0.0);
        assert!(const_square_root(-1.0).is_nan());
        assert!(const_square_root(f32::INFINITY).is_nan());
        assert!(const_square_root(f32::NAN).is_nan());
    }

    #[test]
    fn normalize_in_const_context() {
        assert_relative_eq!(DIAGONAL.x, std::f32::consts::FRAC_1_SQRT_2, epsilon = 1e-6);
        assert_relative_eq!(DIAGONAL.y, std::f32::consts::FRAC_1_SQRT_2, epsilon = 1e-6);

        let runtime = normalize(Vec2::new(1.0, 1.0));
        assert_relative_eq!(runtime.x, DIAGONAL.x, epsilon = 1e-6);
        assert_relative_eq!(runtime.y, DIAGONAL.y, epsilon = 1e-6);
    }

    #[test]
    fn dot_and_mag() {
        assert_eq!(dot(Vec2::new(1.0, 2.0), Vec2::new(3.0, -4.0)), -5.0);
        assert_eq!(mag(Vec2::new(3.0, 4.0)), 5.0);
        assert_relative_eq!(const_mag(Vec2::new(3.0, 4.0)), 5.0, epsilon = 1e-6);
    }

    #[test]
    fn normalize_zero_is_nan() {
        let n = normalize(Vec2::ZERO);
        assert!(n.x.is_nan() && n.y.is_nan());
    }
}
