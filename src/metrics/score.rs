use super::ImpactWeights;
use crate::model::{ProductiveSlot, WeekendRatio};

pub fn weekend_ratio(by_weekday: &[u32; 7], total: u32) -> WeekendRatio {
    let weekend = by_weekday[0] + by_weekday[6];
    let weekend_pct = if total == 0 {
        0.0
    } else {
        ((weekend as f64 / total as f64) * 1000.0).round() / 10.0
    };
    WeekendRatio {
        weekday: total - weekend,
        weekend,
        weekend_pct,
    }
}

/// `min(ceiling, round(log10(raw + 1) * scale))` with
/// `raw = commits*cw + files*fw + days*dw`.
pub fn impact_score(commits: u64, changed_files: u64, active_days: u64, weights: &ImpactWeights) -> u32 {
    let raw = commits
        .saturating_mul(weights.commit_weight)
        .saturating_add(changed_files.saturating_mul(weights.file_weight))
        .saturating_add(active_days.saturating_mul(weights.day_weight));
    let score = ((raw as f64 + 1.0).log10() * weights.scale).round();
    (score as u32).min(weights.ceiling)
}

/// First cell with the highest count, scanning weekday-major.
pub fn most_productive(heat: &[[u32; 24]; 7]) -> ProductiveSlot {
    let mut best = ProductiveSlot::default();
    let mut best_count: i64 = -1;
    for (weekday, hours) in heat.iter().enumerate() {
        for (hour, &count) in hours.iter().enumerate() {
            if i64::from(count) > best_count {
                best_count = i64::from(count);
                best = ProductiveSlot {
                    weekday: weekday as u8,
                    hour: hour as u8,
                };
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn weekend_ratio_rounds_to_one_decimal() {
        let mut by_weekday = [0u32; 7];
        by_weekday[0] = 1;
        by_weekday[3] = 2;
        let ratio = weekend_ratio(&by_weekday, 3);
        assert_eq!(ratio.weekend, 1);
        assert_eq!(ratio.weekday, 2);
        assert_eq!(ratio.weekend_pct, 33.3);
    }

    #[test]
    fn weekend_ratio_of_nothing() {
        let ratio = weekend_ratio(&[0; 7], 0);
        assert_eq!(ratio, WeekendRatio::default());
    }

    #[test]
    fn impact_score_examples() {
        let w = ImpactWeights::default();
        assert_eq!(impact_score(0, 0, 0, &w), 0);
        // raw = 5 + 2 + 10 = 17 -> log10(18) * 25 = 31.38
        assert_eq!(impact_score(1, 1, 1, &w), 31);
        assert_eq!(impact_score(1_000_000, 1_000_000, 10_000, &w), 100);
    }

    #[test]
    fn huge_weights_saturate_at_the_ceiling() {
        let w = ImpactWeights {
            commit_weight: u64::MAX,
            file_weight: u64::MAX,
            ..ImpactWeights::default()
        };
        assert_eq!(impact_score(3, 3, 3, &w), 100);
    }

    #[test]
    fn most_productive_prefers_first_maximum() {
        let mut heat = [[0u32; 24]; 7];
        heat[2][9] = 4;
        heat[5][1] = 4;
        heat[1][23] = 3;
        assert_eq!(most_productive(&heat), ProductiveSlot { weekday: 2, hour: 9 });
    }

    #[test]
    fn most_productive_of_empty_grid() {
        assert_eq!(most_productive(&[[0; 24]; 7]), ProductiveSlot { weekday: 0, hour: 0 });
    }

    proptest! {
        #[test]
        fn impact_score_is_monotonic_in_commits(
            commits in 0u64..100_000,
            extra in 0u64..100_000,
            files in 0u64..100_000,
            days in 0u64..10_000,
        ) {
            let w = ImpactWeights::default();
            let base = impact_score(commits, files, days, &w);
            let more = impact_score(commits + extra, files, days, &w);
            prop_assert!(more >= base);
            prop_assert!(more <= 100);
        }
    }
}
