//! Shared math utilities.

/// Index of the largest value, first one on ties. `None` for an empty slice.
pub fn argmax(v: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &x) in v.iter().enumerate() {
        match best {
            Some((_, max)) if x <= max => {}
            _ => best = Some((i, x)),
        }
    }
    best.map(|(i, _)| i)
}

/// Divide, returning `sentinel` when the denominator is zero.
pub fn ratio_or(numerator: u64, denominator: u64, sentinel: f64) -> f64 {
    if denominator == 0 {
        sentinel
    } else {
        numerator as f64 / denominator as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argmax() {
        assert_eq!(argmax(&[0.1, 0.7, 0.2]), Some(1));
        assert_eq!(argmax(&[-3.0, -1.0]), Some(1));
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn test_argmax_first_on_ties() {
        assert_eq!(argmax(&[0.5, 0.5, 0.1]), Some(0));
    }

    #[test]
    fn test_ratio_or_sentinel() {
        assert_eq!(ratio_or(3, 4, -1.0), 0.75);
        assert_eq!(ratio_or(0, 0, -1.0), -1.0);
    }
}
