use tracing::debug;

/// Minutes in a calendar day, the default cap for [`normalize_day_minutes`].
pub const DAY_MINUTES: u32 = 24 * 60;

/// Scales the minute allocations of one day down so they fit `cap`.
///
/// Allocations whose total is already within the cap are returned unchanged.
/// Otherwise every value is scaled by `cap / total` and floored, and the
/// minutes lost to flooring go one at a time to the allocations with the
/// largest fractional remainder, so the result sums to exactly `cap`.
/// Equal remainders are served in input order.
///
/// Only meant for summaries; the recorded hours of an entry are never
/// rewritten with the result.
#[must_use]
pub fn normalize_day_minutes(minutes: &[u32], cap: u32) -> Vec<u32> {
    let total: u64 = minutes.iter().copied().map(u64::from).sum();
    if total == 0 || total <= u64::from(cap) {
        return minutes.to_vec();
    }

    #[allow(clippy::cast_precision_loss)]
    let scale = f64::from(cap) / total as f64;
    let scaled = minutes
        .iter()
        .map(|&m| f64::from(m) * scale)
        .collect::<Vec<_>>();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let mut result = scaled.iter().map(|s| s.floor() as u32).collect::<Vec<_>>();

    let floored: u32 = result.iter().sum();
    let remaining = cap.saturating_sub(floored) as usize;
    debug!(total, cap, remaining, "scaling day minutes down to cap");

    let mut order = (0..scaled.len()).collect::<Vec<_>>();
    order.sort_by(|&a, &b| {
        let (a, b) = (scaled[a].fract(), scaled[b].fract());
        b.total_cmp(&a)
    });
    for &index in order.iter().cycle().take(remaining) {
        result[index] += 1;
    }
    result
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;

    use crate::normalize::{normalize_day_minutes, DAY_MINUTES};

    #[test]
    fn test_within_cap_is_unchanged() {
        assert_eq!(normalize_day_minutes(&[], DAY_MINUTES), Vec::<u32>::new());
        assert_eq!(normalize_day_minutes(&[0, 0], DAY_MINUTES), vec![0, 0]);
        assert_eq!(
            normalize_day_minutes(&[480, 480, 480], DAY_MINUTES),
            vec![480, 480, 480]
        );
        assert_eq!(normalize_day_minutes(&[100, 20], 120), vec![100, 20]);
    }

    #[test]
    fn test_scales_down_to_cap() {
        assert_eq!(
            normalize_day_minutes(&[960, 960], DAY_MINUTES),
            vec![720, 720]
        );
        assert_eq!(normalize_day_minutes(&[2880], DAY_MINUTES), vec![1440]);
        // 10 * 10/3 = 3.33.., 20 * 10/3 = 6.66..
        assert_eq!(normalize_day_minutes(&[10, 20], 10), vec![3, 7]);
    }

    #[test]
    fn test_largest_remainder() {
        // scaled: 3.5, 3.5, 3.0 -> one leftover minute, first of the tied entries wins
        assert_eq!(normalize_day_minutes(&[7, 7, 6], 10), vec![4, 3, 3]);
        // scaled: 2.5, 3.75, 3.75 -> two leftover minutes
        assert_eq!(normalize_day_minutes(&[10, 15, 15], 10), vec![2, 4, 4]);
        assert_eq!(normalize_day_minutes(&[0, 30, 0], 10), vec![0, 10, 0]);
    }

    proptest! {
        #[test]
        fn proptest_sum_is_min_of_total_and_cap(
            minutes in proptest::collection::vec(0..=DAY_MINUTES, 0..12),
            cap in 1..=DAY_MINUTES,
        ) {
            let total: u32 = minutes.iter().sum();
            let normalized = normalize_day_minutes(&minutes, cap);
            prop_assert_eq!(normalized.len(), minutes.len());
            prop_assert_eq!(normalized.iter().sum::<u32>(), total.min(cap));
            if total <= cap {
                prop_assert_eq!(&normalized, &minutes);
            } else {
                for (n, m) in normalized.iter().zip(&minutes) {
                    prop_assert!(n <= m);
                }
            }
        }
    }
}
