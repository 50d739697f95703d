//! Canonical ordering of time-of-day segments.
//!
//! `Morning < Afternoon < Evening < Night`, matched after trimming and
//! ignoring case. Any other label ranks after `Night`; unrecognized labels are
//! ordered among themselves by their raw text, which makes the order total.

use std::cmp::Ordering;

pub const CANONICAL_SEGMENTS: [&str; 4] = ["Morning", "Afternoon", "Evening", "Night"];

/// Position of a label in the canonical order, or `None` when unrecognized.
pub fn canonical_rank(label: &str) -> Option<usize> {
    let trimmed = label.trim();
    CANONICAL_SEGMENTS
        .iter()
        .position(|segment| segment.eq_ignore_ascii_case(trimmed))
}

pub fn is_canonical(label: &str) -> bool {
    canonical_rank(label).is_some()
}

pub fn compare_segments(left: &str, right: &str) -> Ordering {
    let rank = |label: &str| canonical_rank(label).unwrap_or(CANONICAL_SEGMENTS.len());
    rank(left)
        .cmp(&rank(right))
        .then_with(|| left.cmp(right))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_labels_sort_in_day_order() {
        let mut labels = vec!["Night", "Morning", "Evening", "Afternoon"];
        labels.sort_by(|a, b| compare_segments(a, b));
        assert_eq!(labels, vec!["Morning", "Afternoon", "Evening", "Night"]);
    }

    #[test]
    fn unrecognized_labels_sort_last_alphabetically() {
        let mut labels = vec!["Overnight", "Night", "Brunch", "Morning"];
        labels.sort_by(|a, b| compare_segments(a, b));
        assert_eq!(labels, vec!["Morning", "Night", "Brunch", "Overnight"]);
    }

    #[test]
    fn rank_ignores_case_and_padding() {
        assert_eq!(canonical_rank(" evening "), Some(2));
        assert_eq!(canonical_rank("EVENING"), Some(2));
        assert!(!is_canonical("Late Night"));
    }
}
