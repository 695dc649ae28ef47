//! Keyword-triggered date extraction.
//!
//! A mention is a trigger keyword followed, on the same line, by a date in
//! one of [`DATE_LAYOUTS`]: `deadline: 2024/03/01` or `Reminder March 1, 2024`.

use chrono::NaiveDate;
use std::iter::FusedIterator;

/// Accepted date layouts, tried in this order. The first one that parses wins.
pub const DATE_LAYOUTS: [&str; 8] = [
    "%Y/%m/%d",
    "%Y-%m-%d",
    "%Y %B %d",
    "%Y %b %d",
    "%B %d %Y",
    "%b %d %Y",
    "%B %d, %Y",
    "%b %d, %Y",
];

/// Find every date mentioned after `keyword` in `text`.
///
/// Matching is case-insensitive. Occurrences whose line remainder is not a
/// date are skipped.
pub fn find(text: &str, keyword: &str) -> Mentions {
    Mentions {
        text: text.to_lowercase(),
        keyword: keyword.to_lowercase(),
        cursor: 0,
    }
}

/// Parse the text following a keyword, ignoring surrounding whitespace and
/// an optional colon.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim().trim_matches(':').trim();
    if s.is_empty() {
        return None;
    }
    DATE_LAYOUTS.iter().find_map(|layout| {
        let date = NaiveDate::parse_from_str(s, layout).ok()?;
        is_literal(s, date, layout).then_some(date)
    })
}

// chrono accepts single digit months, signed years and missing spaces; the
// input must render back exactly. Named-month layouts allow an unpadded day.
fn is_literal(s: &str, date: NaiveDate, layout: &str) -> bool {
    if date.format(layout).to_string().eq_ignore_ascii_case(s) {
        return true;
    }
    let named_month = layout.contains("%B") || layout.contains("%b");
    named_month
        && date
            .format(&layout.replace("%d", "%-d"))
            .to_string()
            .eq_ignore_ascii_case(s)
}

/// Iterator returned by [`find`].
#[derive(Debug, Clone)]
pub struct Mentions {
    text: String,
    keyword: String,
    cursor: usize,
}

impl Iterator for Mentions {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        if self.keyword.is_empty() {
            return None;
        }

        loop {
            let found = self.text[self.cursor..].find(&self.keyword)?;
            self.cursor += found + self.keyword.len();

            let rest = &self.text[self.cursor..];
            let line = rest.find('\n').map_or(rest, |end| &rest[..end]);
            if let Some(date) = parse_date(line) {
                return Some(date);
            }
        }
    }
}

impl FusedIterator for Mentions {}
