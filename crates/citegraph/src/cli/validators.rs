//! CLI input validation functions.
//!
//! Used by clap's `value_parser` attribute so bad values are rejected at
//! parse time with a specific message.

/// Validate a similarity threshold in `(0, 1]`.
pub fn validate_threshold(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("'{s}' is not a number"))?;
    if !value.is_finite() || value <= 0.0 || value > 1.0 {
        return Err(format!("threshold must be within (0, 1], got {value}"));
    }
    Ok(value)
}

/// Validate a strictly positive count.
pub fn validate_positive(s: &str) -> Result<usize, String> {
    let value: usize = s
        .trim()
        .parse()
        .map_err(|_| format!("'{s}' is not a non-negative integer"))?;
    if value == 0 {
        return Err("value must be at least 1".to_string());
    }
    Ok(value)
}

/// Validate a non-empty title fragment.
pub fn validate_fragment(s: &str) -> Result<String, String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err("title fragment cannot be empty".to_string());
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::lower_bound_excluded("0", false)]
    #[case::typical("0.35", true)]
    #[case::upper_bound("1", true)]
    #[case::above("1.5", false)]
    #[case::garbage("high", false)]
    #[case::padded(" 0.5 ", true)]
    fn threshold_validation(#[case] input: &str, #[case] ok: bool) {
        assert_eq!(validate_threshold(input).is_ok(), ok);
    }

    #[rstest]
    #[case::zero("0", false)]
    #[case::one("1", true)]
    #[case::negative("-3", false)]
    fn positive_validation(#[case] input: &str, #[case] ok: bool) {
        assert_eq!(validate_positive(input).is_ok(), ok);
    }

    #[test]
    fn blank_fragment_is_rejected() {
        assert!(validate_fragment("   ").is_err());
        assert_eq!(validate_fragment(" graph ").unwrap(), "graph");
    }
}
