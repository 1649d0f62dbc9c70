// Inverse of Minkowski's question-mark function.
//
// ?(x) maps the continued fraction [a0; a1, a2, ...] of x to a binary
// expansion made of alternating runs of 0s and 1s of lengths a1, a2, ....
// The inverse reads the runs of x's binary expansion back as continued
// fraction terms. Dyadic rationals therefore map to rationals and other
// rationals map to quadratic irrationals: ?⁻¹(7/5) = √2 and ?⁻¹(5/3) = φ.
//
// The FM catalog uses this to turn simple harmonic ratios into related
// inharmonic ones.

/// Most continued-fraction terms collected from a non-terminating expansion.
/// Reaching it gives a truncated approximation.
pub const MAX_TERMS: usize = 150;

/// Compute ?⁻¹(x).
pub fn inverse_question_mark(x: f64) -> f64 {
    if !x.is_finite() {
        return x;
    }
    let whole = x.floor();
    let mut frac = x - whole;
    if frac == 0.0 {
        return x;
    }

    let mut terms: Vec<u32> = Vec::new();
    let mut digit_is_one = false;
    let mut run = 1u32;

    loop {
        frac *= 2.0;
        if !digit_is_one {
            if frac < 1.0 {
                run += 1;
            } else {
                terms.push(run);
                run = 1;
                digit_is_one = true;
                frac -= 1.0;
            }
        } else if frac > 1.0 {
            run += 1;
            frac -= 1.0;
        } else {
            terms.push(run);
            run = 1;
            digit_is_one = false;
        }

        if frac == frac.floor() {
            terms.push(run);
            break;
        }
        if terms.len() >= MAX_TERMS {
            break;
        }
    }

    // Fold [a1; a2, ..., an] back to front, then invert to get [0; a1, ...].
    let mut back_to_front = terms.iter().rev();
    let mut value = back_to_front.next().map_or(1.0, |&term| term as f64);
    for &term in back_to_front {
        value = term as f64 + 1.0 / value;
    }
    whole + 1.0 / value
}
