/// The fixed value of π used by [`rand2`]. Any other approximation (including
/// `std::f64::consts::PI`) would shift every seed downstream of it, so the
/// reference implementation's literal is reproduced verbatim rather than
/// swapped for the standard-library constant.
const RAND2_PI: f64 = 3.14159265;

/// Deterministic, symmetric pseudo-random hash of two seeds into `[-1, 1)`.
///
/// `rand2(p, q) == rand2(q, p)` for all `p, q` — required so a midpoint's seed
/// does not depend on which endpoint of an edge is visited first during
/// subdivision.
pub fn rand2(p: f64, q: f64) -> f64 {
    let r = (p + RAND2_PI) * (q + RAND2_PI);
    2.0 * (r - r.trunc()) - 1.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn symmetric_for_arbitrary_inputs() {
        for (p, q) in [(0.123, 0.456), (-1.0, 1.0), (0.0, 0.0), (3.7, -2.2)] {
            assert_abs_diff_eq!(rand2(p, q), rand2(q, p), epsilon = 0.0);
        }
    }

    #[test]
    fn stays_within_expected_range() {
        for i in 0..1000 {
            let p = i as f64 * 0.037 - 10.0;
            let v = rand2(p, p * 1.3);
            assert!((-1.0..1.0).contains(&v), "rand2({p}, ..) = {v} out of range");
        }
    }

    #[test]
    fn is_pure_and_deterministic() {
        assert_eq!(rand2(0.123, 0.123), rand2(0.123, 0.123));
    }
}
