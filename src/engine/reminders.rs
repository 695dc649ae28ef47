use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::debug;

use crate::config::BotIdentity;
use crate::data::{Action, Issue, REMINDER_KEYWORD};

use super::dates::find;
use super::timeline::mentions;

/// Text of the comment posted when a reminder date arrives.
pub fn reminder_text(author: &str) -> String {
    format!("hi @{author}, it's reminder day!")
}

/// Days on which the bot already commented on the issue.
pub fn reminded_on(issue: &Issue, bot: &BotIdentity) -> HashSet<NaiveDate> {
    issue
        .comments
        .iter()
        .filter(|c| bot.authored(c))
        .map(|c| c.created_at.date_naive())
        .collect()
}

/// Reminder comments due on the issue today.
///
/// A reminder is due when its date is today's UTC date and the bot has not
/// commented on that date yet. Each body is attributed to its own author and
/// a date is reminded at most once per evaluation.
pub fn evaluate(issue: &Issue, now: DateTime<Utc>, bot: &BotIdentity) -> Vec<Action> {
    let today = now.date_naive();
    let mut reminded = reminded_on(issue, bot);
    let mut actions = Vec::new();

    for mention in mentions(issue) {
        for date in find(mention.body, REMINDER_KEYWORD) {
            if date != today {
                continue;
            }
            if !reminded.insert(date) {
                debug!(
                    "{}#{}: already reminded on {date}",
                    issue.repo, issue.number
                );
                continue;
            }
            actions.push(Action::PostComment(reminder_text(mention.author)));
        }
    }

    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Comment, IssueState, Repository};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 3, 15, 30, 0).unwrap()
    }

    fn comment(author: &str, body: &str, created_at: DateTime<Utc>) -> Comment {
        Comment {
            author: author.to_string(),
            body: body.to_string(),
            created_at,
        }
    }

    fn issue(body: &str, comments: Vec<Comment>) -> Issue {
        Issue {
            repo: Repository::new("foo", "bar"),
            number: 1,
            title: "Test".to_string(),
            body: body.to_string(),
            author: "deadline-reminder[bot]".to_string(),
            state: IssueState::Open,
            comments,
        }
    }

    #[test]
    fn reminder_for_today_is_posted_once() {
        let issue = issue(
            "Nothing to be seen here",
            vec![comment(
                "francesc",
                "reminder: 2024-06-03\n",
                now() - Duration::hours(2),
            )],
        );

        let actions = evaluate(&issue, now(), &BotIdentity::default());
        assert_eq!(
            actions,
            vec![Action::PostComment(
                "hi @francesc, it's reminder day!".to_string()
            )]
        );
    }

    #[test]
    fn second_evaluation_after_posting_is_silent() {
        let mut issue = issue(
            "",
            vec![comment("francesc", "reminder: 2024-06-03", now() - Duration::days(4))],
        );
        let bot = BotIdentity::default();

        let actions = evaluate(&issue, now(), &bot);
        assert_eq!(actions.len(), 1);

        issue.comments.push(comment(
            bot.login(),
            &reminder_text("francesc"),
            now() + Duration::minutes(1),
        ));
        assert!(evaluate(&issue, now(), &bot).is_empty());
    }

    #[test]
    fn other_days_are_not_due() {
        let issue = issue(
            "reminder 2024/06/02\nreminder 2024/06/04",
            vec![comment("bob", "reminder June 10, 2024", now())],
        );
        assert!(evaluate(&issue, now(), &BotIdentity::default()).is_empty());
    }

    #[test]
    fn same_date_in_several_bodies_is_reminded_once() {
        let issue = issue(
            "",
            vec![
                comment("alice", "reminder 2024-06-03", now()),
                comment("bob", "Reminder: June 3, 2024", now()),
            ],
        );
        let actions = evaluate(&issue, now(), &BotIdentity::default());
        assert_eq!(
            actions,
            vec![Action::PostComment(reminder_text("alice"))]
        );
    }

    #[test]
    fn issue_author_is_addressed_for_body_mentions() {
        let mut issue = issue("reminder: 2024/06/03", Vec::new());
        issue.author = "carol".to_string();
        let actions = evaluate(&issue, now(), &BotIdentity::default());
        assert_eq!(actions, vec![Action::PostComment(reminder_text("carol"))]);
    }

    #[test]
    fn bot_comment_on_another_day_does_not_count() {
        let bot = BotIdentity::default();
        let issue = issue(
            "",
            vec![
                comment("francesc", "reminder: 2024-06-03", now() - Duration::days(4)),
                comment(bot.login(), "hi @francesc, it's reminder day!", now() - Duration::days(1)),
            ],
        );
        assert_eq!(evaluate(&issue, now(), &bot).len(), 1);
    }

    #[test]
    fn only_bot_comments_count_as_reminded() {
        let issue = issue(
            "",
            vec![
                comment("alice", "reminder 2024-06-03", now()),
                comment("bob", "noted", now()),
            ],
        );
        assert!(reminded_on(&issue, &BotIdentity::default()).is_empty());
        assert_eq!(evaluate(&issue, now(), &BotIdentity::default()).len(), 1);
    }
}
