use crate::model::Streak;
use chrono::NaiveDate;

/// Longest and current runs of consecutive calendar days.
///
/// `days` must be sorted ascending and free of duplicates. The current run
/// is the one ending at the most recent active day, not at today.
pub fn compute_streak(days: &[NaiveDate]) -> Streak {
    let Some(last) = days.last() else {
        return Streak::default();
    };

    let mut longest = 1u32;
    let mut run = 1u32;
    for pair in days.windows(2) {
        if pair[0].succ_opt() == Some(pair[1]) {
            run += 1;
        } else {
            run = 1;
        }
        longest = longest.max(run);
    }

    let mut current = 1u32;
    let mut cursor = *last;
    while let Some(prev) = cursor.pred_opt() {
        if days.binary_search(&prev).is_err() {
            break;
        }
        current += 1;
        cursor = prev;
    }

    Streak { longest, current }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn empty_has_no_streak() {
        assert_eq!(compute_streak(&[]), Streak { longest: 0, current: 0 });
    }

    #[test]
    fn single_day() {
        assert_eq!(compute_streak(&[d("2024-05-01")]), Streak { longest: 1, current: 1 });
    }

    #[test]
    fn three_consecutive_days() {
        let days = [d("2024-05-01"), d("2024-05-02"), d("2024-05-03")];
        assert_eq!(compute_streak(&days), Streak { longest: 3, current: 3 });
    }

    #[test]
    fn current_run_can_be_shorter_than_longest() {
        let days = [
            d("2024-02-27"),
            d("2024-02-28"),
            d("2024-02-29"),
            d("2024-03-01"),
            d("2024-03-05"),
            d("2024-03-06"),
        ];
        assert_eq!(compute_streak(&days), Streak { longest: 4, current: 2 });
    }

    #[test]
    fn runs_cross_year_boundaries() {
        let days = [d("2023-12-30"), d("2023-12-31"), d("2024-01-01")];
        assert_eq!(compute_streak(&days), Streak { longest: 3, current: 3 });
    }

    #[test]
    fn gaps_reset_the_run() {
        let days = [d("2024-01-01"), d("2024-01-03"), d("2024-01-05")];
        assert_eq!(compute_streak(&days), Streak { longest: 1, current: 1 });
    }
}
