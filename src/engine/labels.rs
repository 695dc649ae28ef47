//! Threshold labels and the choice of which one an issue should carry.

use std::collections::HashSet;

use tracing::warn;

use crate::data::{Label, LABEL_PREFIX};
use crate::error::LabelError;

impl Label {
    /// Read a repository label name.
    ///
    /// Returns `Ok(None)` for labels that are not threshold labels at all.
    pub fn parse(name: &str) -> Result<Option<Label>, LabelError> {
        let Some(days) = name.strip_prefix(LABEL_PREFIX) else {
            return Ok(None);
        };
        let days: i64 = days.parse().map_err(|source| LabelError::InvalidDays {
            name: name.to_string(),
            source,
        })?;
        if days < 0 {
            return Err(LabelError::NegativeDays {
                name: name.to_string(),
            });
        }
        Ok(Some(Label {
            name: name.to_string(),
            days,
        }))
    }
}

/// The threshold labels of a repository, unique by name and sorted by
/// ascending day count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSet {
    labels: Vec<Label>,
}

impl LabelSet {
    /// Build the set from every label name in a repository. Names that carry
    /// the prefix but no valid day count are logged and left out.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut labels = Vec::new();

        for name in names {
            match Label::parse(name.as_ref()) {
                Ok(Some(label)) => {
                    if seen.insert(label.name.clone()) {
                        labels.push(label);
                    }
                }
                Ok(None) => {}
                Err(err) => warn!("skipping label: {err}"),
            }
        }

        labels.sort_by_key(|l| l.days);
        Self { labels }
    }

    pub fn as_slice(&self) -> &[Label] {
        &self.labels
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn select(&self, days_until_deadline: f64) -> Selection<'_> {
        select(&self.labels, days_until_deadline)
    }
}

/// Outcome of [`select`]: at most one label to hold, and every other one to strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection<'a> {
    pub keep: Option<&'a Label>,
    pub remove: Vec<&'a Label>,
}

/// Pick the label for a deadline `days_until_deadline` days away.
///
/// `labels` must be sorted by ascending `days`. The kept label is the first
/// one whose ceiling is strictly greater than the truncated day count.
/// Deadlines more than a day in the past, or beyond every ceiling, keep
/// nothing.
pub fn select(labels: &[Label], days_until_deadline: f64) -> Selection<'_> {
    if days_until_deadline <= -1.0 {
        return Selection {
            keep: None,
            remove: labels.iter().collect(),
        };
    }

    let days = days_until_deadline.trunc() as i64;
    let idx = labels.partition_point(|l| l.days <= days);

    Selection {
        keep: labels.get(idx),
        remove: labels
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != idx)
            .map(|(_, l)| l)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(names: &[&str]) -> LabelSet {
        LabelSet::from_names(names.iter().copied())
    }

    fn names<'a>(labels: &[&'a Label]) -> Vec<&'a str> {
        labels.iter().map(|l| l.name.as_str()).collect()
    }

    #[test]
    fn parse_reads_the_day_count() {
        let label = Label::parse("deadline < 14").unwrap().unwrap();
        assert_eq!(label.days, 14);
        assert_eq!(label.name, "deadline < 14");
        assert!(Label::parse("bug").unwrap().is_none());
        assert!(Label::parse("deadline<14").unwrap().is_none());
    }

    #[test]
    fn parse_rejects_bad_day_counts() {
        assert!(matches!(
            Label::parse("deadline < soon"),
            Err(LabelError::InvalidDays { .. })
        ));
        assert!(matches!(
            Label::parse("deadline < -3"),
            Err(LabelError::NegativeDays { .. })
        ));
    }

    #[test]
    fn set_is_filtered_deduplicated_and_sorted() {
        let labels = set(&[
            "deadline < 30",
            "bug",
            "deadline < 5",
            "deadline < x",
            "deadline < 30",
            "deadline < 10",
        ]);
        let days: Vec<_> = labels.as_slice().iter().map(|l| l.days).collect();
        assert_eq!(days, vec![5, 10, 30]);
        assert_eq!(labels.len(), 3);
    }

    #[test]
    fn repository_without_threshold_labels_has_an_empty_set() {
        let labels = set(&["bug", "deadline < ?", "help wanted"]);
        assert!(labels.is_empty());
        assert!(!set(&["deadline < 3"]).is_empty());
    }

    #[test]
    fn empty_set_selects_nothing() {
        for days in [-5.0, 0.0, 3.5, 100.0] {
            let selection = select(&[], days);
            assert_eq!(selection.keep, None);
            assert!(selection.remove.is_empty());
        }
    }

    #[test]
    fn smallest_covering_ceiling_is_kept() {
        let labels = set(&["deadline < 5", "deadline < 30"]);

        let selection = labels.select(3.0);
        assert_eq!(selection.keep.map(|l| l.name.as_str()), Some("deadline < 5"));
        assert_eq!(names(&selection.remove), vec!["deadline < 30"]);

        let selection = labels.select(10.0);
        assert_eq!(selection.keep.map(|l| l.name.as_str()), Some("deadline < 30"));
        assert_eq!(names(&selection.remove), vec!["deadline < 5"]);
    }

    #[test]
    fn far_or_past_deadlines_strip_everything() {
        let labels = set(&["deadline < 5", "deadline < 30"]);

        for days in [40.0, -2.0, -1.0] {
            let selection = labels.select(days);
            assert_eq!(selection.keep, None, "days {days}");
            assert_eq!(names(&selection.remove), vec!["deadline < 5", "deadline < 30"]);
        }
    }

    #[test]
    fn exact_ceiling_moves_to_the_next_label() {
        let labels = set(&["deadline < 5", "deadline < 30"]);
        let selection = labels.select(5.0);
        assert_eq!(selection.keep.map(|l| l.name.as_str()), Some("deadline < 30"));

        let selection = labels.select(4.9);
        assert_eq!(selection.keep.map(|l| l.name.as_str()), Some("deadline < 5"));
    }

    #[test]
    fn deadline_earlier_today_keeps_the_smallest_label() {
        let labels = set(&["deadline < 1", "deadline < 7"]);
        let selection = labels.select(-0.5);
        assert_eq!(selection.keep.map(|l| l.name.as_str()), Some("deadline < 1"));
    }
}
