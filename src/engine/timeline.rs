use chrono::NaiveDate;

use crate::data::Issue;

use super::dates::find;

/// A piece of text on an issue together with whoever wrote it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mention<'a> {
    pub author: &'a str,
    pub body: &'a str,
}

/// The issue body followed by every comment, in platform order.
pub fn mentions(issue: &Issue) -> impl Iterator<Item = Mention<'_>> {
    std::iter::once(Mention {
        author: &issue.author,
        body: &issue.body,
    })
    .chain(issue.comments.iter().map(|c| Mention {
        author: &c.author,
        body: &c.body,
    }))
}

/// All dates following `keyword` across the body and comments, in order of
/// appearance. Nothing is sorted or deduplicated, so the last element is the
/// most recent mention.
pub fn extract(issue: &Issue, keyword: &str) -> Vec<NaiveDate> {
    mentions(issue)
        .flat_map(|mention| find(mention.body, keyword))
        .collect()
}
