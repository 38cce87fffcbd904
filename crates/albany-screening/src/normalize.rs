//! Min-max normalization of signal values across a candidate pool.

/// Spans narrower than this are treated as a constant signal.
pub const DEGENERATE_SPAN: f64 = 1e-10;

/// Scale `raw` to `[0, 1]` by min-max.
///
/// With `invert`, lower raw values score higher: `(max - v) / span`.
/// A constant signal carries no ranking information and maps to all zeros.
pub fn normalize_scores(raw: &[f64], invert: bool) -> Vec<f64> {
    if raw.is_empty() {
        return Vec::new();
    }
    let min = raw.iter().copied().fold(f64::INFINITY, f64::min);
    let max = raw.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;
    if span.abs() < DEGENERATE_SPAN {
        return vec![0.0; raw.len()];
    }

    if invert {
        raw.iter().map(|v| (max - v) / span).collect()
    } else {
        raw.iter().map(|v| (v - min) / span).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rstest::rstest;

    #[rstest]
    #[case(false, vec![0.0, 0.5, 1.0])]
    #[case(true, vec![1.0, 0.5, 0.0])]
    fn test_min_max(#[case] invert: bool, #[case] expected: Vec<f64>) {
        let scores = normalize_scores(&[0.2, 0.4, 0.6], invert);
        for (a, b) in scores.iter().zip(expected.iter()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_degenerate_and_empty() {
        assert_eq!(normalize_scores(&[0.3, 0.3, 0.3 + 1e-12], false), vec![0.0; 3]);
        assert_eq!(normalize_scores(&[0.7], true), vec![0.0]);
        assert!(normalize_scores(&[], false).is_empty());
    }
}
