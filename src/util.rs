/// Round half away from zero to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Count non-empty space-separated tokens.
pub fn word_count(text: &str) -> usize {
    text.split(' ').filter(|w| !w.is_empty()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(16.0), 16.0);
        assert_eq!(round2(16.004), 16.0);
        assert_eq!(round2(16.005), 16.01);
        assert_eq!(round2(87.5), 87.5);
        assert_eq!(round2(33.333333), 33.33);
        assert_eq!(round2(66.666666), 66.67);
    }

    #[test]
    fn test_round2_half_away_from_zero() {
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(-0.125), -0.13);
    }

    #[test]
    fn test_round2_zero() {
        assert_eq!(round2(0.0), 0.0);
    }

    #[test]
    fn test_word_count() {
        assert_eq!(word_count("the quick brown fox"), 4);
        assert_eq!(word_count("one"), 1);
    }

    #[test]
    fn test_word_count_empty() {
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("   "), 0);
    }

    #[test]
    fn test_word_count_consecutive_spaces() {
        assert_eq!(word_count("pack  my   box"), 3);
        assert_eq!(word_count(" leading and trailing "), 3);
    }
}
