/// Values this close to a rounding candidate are treated as already on it.
pub const FLOATING_POINT_NOISE: f64 = 1e-6;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundDirection {
    Up,
    Down,
    /// Nearest candidate; exact ties go up.
    Any,
}

/// Round `orig` to the nearest value congruent to `modulus` modulo `multiple`.
///
/// `round_to(14.0, Any, 2.0, 1.0)` is `15.0` (tie, rounds up); `round_to(35.0, Any, 2.0, 0.0)`
/// is `36.0`.
pub fn round_to(orig: f64, direction: RoundDirection, multiple: f64, modulus: f64) -> f64 {
    let base = (orig / multiple).floor() * multiple;

    let lower = if base + modulus <= orig {
        base + modulus
    } else {
        base - multiple + modulus
    };

    let mut upper = base;
    if upper < orig {
        upper += multiple;
    }
    let upper = if upper - multiple + modulus >= orig {
        upper - multiple + modulus
    } else {
        upper + modulus
    };

    if (upper - orig).abs() < FLOATING_POINT_NOISE {
        return upper;
    }
    if (orig - lower).abs() < FLOATING_POINT_NOISE {
        return lower;
    }

    match direction {
        RoundDirection::Up => upper,
        RoundDirection::Down => lower,
        RoundDirection::Any => {
            if orig - lower < upper - orig {
                lower
            } else {
                upper
            }
        }
    }
}

/// Nearest odd integer, ties up.
pub fn round_to_odd(orig: f64) -> f64 {
    round_to(orig, RoundDirection::Any, 2.0, 1.0)
}

/// Nearest even integer, ties up.
pub fn round_to_even(orig: f64) -> f64 {
    round_to(orig, RoundDirection::Any, 2.0, 0.0)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
