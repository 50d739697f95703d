use serde::Serialize;

use crate::{aggregate::UpsellRow, segment};

/// Best and worst upselling segments, or the "not enough data" state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UpsellInsight {
    Available { best: UpsellRow, worst: UpsellRow },
    Unavailable,
}

impl UpsellInsight {
    pub fn is_available(&self) -> bool {
        matches!(self, UpsellInsight::Available { .. })
    }
}

/// Picks the segments with the highest and lowest bundled share.
///
/// Fewer than two segments is not an error, just [`UpsellInsight::Unavailable`].
/// Ties go to the segment that comes first in canonical time-of-day order,
/// whatever order `summary` arrives in.
pub fn select_best_worst(summary: &[UpsellRow]) -> UpsellInsight {
    if summary.len() < 2 {
        return UpsellInsight::Unavailable;
    }
    let mut ordered = summary.iter().collect::<Vec<_>>();
    ordered.sort_by(|a, b| segment::compare_segments(&a.time_of_day, &b.time_of_day));

    let mut best = ordered[0];
    let mut worst = ordered[0];
    for row in ordered.iter().copied().skip(1) {
        if row.bundled_share > best.bundled_share {
            best = row;
        }
        if row.bundled_share < worst.bundled_share {
            worst = row;
        }
    }
    UpsellInsight::Available {
        best: best.clone(),
        worst: worst.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(time_of_day: &str, bundled_share: f64) -> UpsellRow {
        UpsellRow {
            time_of_day: time_of_day.to_string(),
            revenue: 0.0,
            conversions: 0,
            avg_revenue_per_conversion: 0.0,
            bundled_share,
        }
    }

    fn names(insight: &UpsellInsight) -> (String, String) {
        match insight {
            UpsellInsight::Available { best, worst } => {
                (best.time_of_day.clone(), worst.time_of_day.clone())
            }
            UpsellInsight::Unavailable => panic!("expected an insight"),
        }
    }

    #[test]
    fn picks_highest_and_lowest_bundled_share() {
        let insight = select_best_worst(&[row("Morning", 0.2), row("Evening", 0.6)]);
        assert_eq!(names(&insight), ("Evening".into(), "Morning".into()));
    }

    #[test]
    fn fewer_than_two_segments_is_unavailable() {
        assert_eq!(select_best_worst(&[]), UpsellInsight::Unavailable);
        assert_eq!(
            select_best_worst(&[row("Night", 0.4)]),
            UpsellInsight::Unavailable
        );
    }

    #[test]
    fn ties_resolve_to_first_canonical_segment() {
        let summary = [
            row("Night", 0.5),
            row("Afternoon", 0.5),
            row("Morning", 0.1),
            row("Evening", 0.1),
        ];
        let insight = select_best_worst(&summary);
        assert_eq!(names(&insight), ("Afternoon".into(), "Morning".into()));
    }

    #[test]
    fn all_equal_shares_pick_the_same_segment() {
        let insight = select_best_worst(&[row("Evening", 0.3), row("Morning", 0.3)]);
        assert_eq!(names(&insight), ("Morning".into(), "Morning".into()));
    }
}
