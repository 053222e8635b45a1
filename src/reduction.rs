// 🔢 Reduction Algorithm - digital root with master-number exceptions
//
// 38 → 3+8 = 11 → stop (master number)
// 1990 → 19 → 10 → 1

/// Numbers exempt from further reduction
pub const MASTER_NUMBERS: [u32; 3] = [11, 22, 33];

/// Totals that carry a karmic debt when they show up before the final digit
pub const KARMIC_DEBT_NUMBERS: [u32; 4] = [13, 14, 16, 19];

pub fn is_master(n: u32) -> bool {
    MASTER_NUMBERS.contains(&n)
}

/// Sum of decimal digits
pub fn digit_sum(mut n: u32) -> u32 {
    let mut sum = 0;
    while n > 0 {
        sum += n % 10;
        n /= 10;
    }
    sum
}

/// Collapse `n` to a single digit, stopping early on 11, 22 or 33.
pub fn reduce(mut n: u32) -> u32 {
    while n > 9 && !is_master(n) {
        n = digit_sum(n);
    }
    n
}

/// Collapse `n` all the way to one digit, master numbers included.
///
/// Used where a field must stay in `[0,9]`: challenge operands and the
/// universal day number.
pub fn reduce_to_digit(mut n: u32) -> u32 {
    while n > 9 {
        n = digit_sum(n);
    }
    n
}

/// First karmic-debt number met while reducing `n`, if any.
///
/// The chain is walked the same way [`reduce`] walks it, so 13 inside
/// 931 → 13 → 4 counts, while 38 → 11 stops before anything else is seen.
pub fn karmic_debt(mut n: u32) -> Option<u32> {
    loop {
        if KARMIC_DEBT_NUMBERS.contains(&n) {
            return Some(n);
        }
        if n <= 9 || is_master(n) {
            return None;
        }
        n = digit_sum(n);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_digits_unchanged() {
        for n in 0..=9 {
            assert_eq!(reduce(n), n);
        }
    }

    #[test]
    fn test_master_numbers_preserved() {
        assert_eq!(reduce(11), 11);
        assert_eq!(reduce(22), 22);
        assert_eq!(reduce(33), 33);
        // 3+8 = 11, stop
        assert_eq!(reduce(38), 11);
        assert_eq!(reduce(29), 11);
        assert_eq!(reduce(499), 22);
    }

    #[test]
    fn test_multi_step_reduction() {
        assert_eq!(reduce(1990), 1);
        assert_eq!(reduce(15), 6);
        assert_eq!(reduce(99), 9);
        // 44 is not a master number here
        assert_eq!(reduce(44), 8);
    }

    #[test]
    fn test_range_and_fixed_point() {
        for n in 1..999_999 {
            let r = reduce(n);
            assert!(
                (1..=9).contains(&r) || is_master(r),
                "reduce({}) = {} out of range",
                n,
                r
            );
            assert_eq!(reduce(r), r, "reduce is not idempotent at {}", n);
        }
    }

    #[test]
    fn test_reduce_to_digit_ignores_masters() {
        assert_eq!(reduce_to_digit(11), 2);
        assert_eq!(reduce_to_digit(22), 4);
        assert_eq!(reduce_to_digit(29), 2);
        assert_eq!(reduce_to_digit(2055), 3);
        assert_eq!(reduce_to_digit(7), 7);
        for n in 1..10_000 {
            assert!((1..=9).contains(&reduce_to_digit(n)));
        }
    }

    #[test]
    fn test_karmic_debt_detection() {
        assert_eq!(karmic_debt(13), Some(13));
        assert_eq!(karmic_debt(931), Some(13));
        assert_eq!(karmic_debt(19), Some(19));
        assert_eq!(karmic_debt(38), None);
        assert_eq!(karmic_debt(7), None);
        assert_eq!(karmic_debt(1990), Some(19));
    }
}
