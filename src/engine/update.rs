use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use tracing::debug;

use crate::config::BotIdentity;
use crate::data::{Action, Issue, DEADLINE_KEYWORD};

use super::labels::LabelSet;
use super::{reminders, timeline};

/// Days from `now` until UTC midnight of `deadline`, as a real number.
pub fn days_until(deadline: NaiveDate, now: DateTime<Utc>) -> f64 {
    let midnight = deadline.and_time(NaiveTime::MIN).and_utc();
    let hours = (midnight - now).num_milliseconds() as f64 / 3_600_000.0;
    hours / 24.0
}

/// Work out everything that should change on an issue.
///
/// Reminder comments come first, then label removals, then the label to add.
/// Closed issues are left alone, and so are the labels of issues that never
/// mention a deadline.
pub fn plan_actions(
    issue: &Issue,
    labels: &LabelSet,
    now: DateTime<Utc>,
    bot: &BotIdentity,
) -> Vec<Action> {
    if !issue.is_open() {
        debug!("{}#{} is not open, skipping", issue.repo, issue.number);
        return Vec::new();
    }

    let mut actions = reminders::evaluate(issue, now, bot);

    let Some(deadline) = timeline::extract(issue, DEADLINE_KEYWORD).pop() else {
        return actions;
    };

    let days = days_until(deadline, now);
    debug!(
        "{}#{} deadline {deadline} in {days:.2} days",
        issue.repo, issue.number
    );

    let selection = labels.select(days);
    actions.extend(
        selection
            .remove
            .iter()
            .map(|label| Action::RemoveLabel(label.name.clone())),
    );
    if let Some(label) = selection.keep {
        debug!("applying {} to {}#{}", label.name, issue.repo, issue.number);
        actions.push(Action::AddLabel(label.name.clone()));
    }

    actions
}
