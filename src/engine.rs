pub mod dates;
pub mod labels;
pub mod reminders;
pub mod timeline;
pub mod update;

pub use dates::{find, parse_date, Mentions, DATE_LAYOUTS};
pub use labels::{select, LabelSet, Selection};
pub use reminders::{reminder_text, reminded_on};
pub use timeline::{extract, mentions, Mention};
pub use update::{days_until, plan_actions};
