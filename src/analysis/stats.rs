/// Arithmetic mean of a slice, defined as 0.0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1 divisor).
///
/// Defined as 0.0 for fewer than two values, where the sample formula
/// would divide by zero.
pub fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance = values
        .iter()
        .map(|v| {
            let d = v - m;
            d * d
        })
        .sum::<f64>()
        / (values.len() - 1) as f64;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_empty() {
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn test_mean_single() {
        assert_eq!(mean(&[0.4]), 0.4);
    }

    #[test]
    fn test_mean_several() {
        assert_eq!(mean(&[0.5, 0.3]), 0.4);
    }

    #[test]
    fn test_std_dev_empty_and_single_are_zero() {
        assert_eq!(sample_std_dev(&[]), 0.0);
        assert_eq!(sample_std_dev(&[1.5]), 0.0);
    }

    #[test]
    fn test_std_dev_two_values() {
        // ((0.5-0.4)^2 + (0.3-0.4)^2) / 1 = 0.02, sqrt = 0.1414...
        let sd = sample_std_dev(&[0.5, 0.3]);
        assert!((sd - 0.02f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_std_dev_identical_values() {
        assert_eq!(sample_std_dev(&[2.0, 2.0, 2.0]), 0.0);
    }
}
