//! Integer helpers shared by the matcher and the projectors.

/// `numerator / denominator` rounded to the nearest integer, halves rounding
/// up. Returns `None` for a zero denominator.
pub fn rounded_ratio(numerator: usize, denominator: usize) -> Option<usize> {
    if denominator == 0 {
        return None;
    }
    Some((2 * numerator + denominator) / (2 * denominator))
}

/// `part / whole` as a whole percentage, halves rounding up.
pub fn rounded_percent(part: usize, whole: usize) -> Option<u32> {
    rounded_ratio(part * 100, whole).map(|percent| percent as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_halves_up() {
        assert_eq!(rounded_ratio(1, 2), Some(1));
        assert_eq!(rounded_ratio(5, 2), Some(3));
        assert_eq!(rounded_ratio(4, 3), Some(1));
        assert_eq!(rounded_ratio(5, 3), Some(2));
        assert_eq!(rounded_ratio(0, 7), Some(0));
        assert_eq!(rounded_ratio(3, 0), None);
    }

    #[test]
    fn percentages() {
        assert_eq!(rounded_percent(1, 2), Some(50));
        assert_eq!(rounded_percent(1, 3), Some(33));
        assert_eq!(rounded_percent(2, 3), Some(67));
        assert_eq!(rounded_percent(5, 7), Some(71));
        assert_eq!(rounded_percent(1, 8), Some(13));
        assert_eq!(rounded_percent(0, 0), None);
    }
}
