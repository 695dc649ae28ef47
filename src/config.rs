use clap::Args;

use crate::data::{Comment, DEFAULT_BOT_LOGIN};

pub const DEFAULT_ADDRESS: &str = "0.0.0.0:8080";

/// Settings shared by every subcommand. Each flag falls back to a
/// `GITHUB_REMINDER_*` environment variable.
#[derive(Debug, Clone, Args)]
pub struct Config {
    /// GitHub application id
    #[arg(long, env = "GITHUB_REMINDER_APP_ID")]
    pub app_id: u64,

    /// Contents of the GitHub application private key (PEM)
    #[arg(
        long,
        env = "GITHUB_REMINDER_PRIVATE_KEY",
        hide_env_values = true,
        default_value = ""
    )]
    pub private_key: String,

    /// Webhook secret; leave empty to accept unsigned deliveries
    #[arg(
        long,
        env = "GITHUB_REMINDER_SECRET",
        hide_env_values = true,
        default_value = ""
    )]
    pub secret: String,

    /// Address the server listens on
    #[arg(long, env = "GITHUB_REMINDER_ADDRESS", default_value = DEFAULT_ADDRESS)]
    pub address: String,

    /// Login the App comments as
    #[arg(long, env = "GITHUB_REMINDER_BOT_LOGIN", default_value = DEFAULT_BOT_LOGIN)]
    pub bot_login: String,

    /// Log planned actions without executing them
    #[arg(long)]
    pub dry_run: bool,

    /// Enable debug logging
    #[arg(short, long, env = "GITHUB_REMINDER_VERBOSE")]
    pub verbose: bool,
}

impl Config {
    pub fn private_key(&self) -> anyhow::Result<&[u8]> {
        if self.private_key.trim().is_empty() {
            anyhow::bail!("GITHUB_REMINDER_PRIVATE_KEY (--private-key) is required");
        }
        Ok(self.private_key.as_bytes())
    }

    /// The webhook secret, if signature checks are enabled.
    pub fn secret(&self) -> Option<Vec<u8>> {
        (!self.secret.is_empty()).then(|| self.secret.as_bytes().to_vec())
    }

    pub fn bot(&self) -> BotIdentity {
        BotIdentity::new(&self.bot_login)
    }
}

/// The account whose comments count as reminders already sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotIdentity {
    login: String,
}

impl BotIdentity {
    pub fn new(login: impl Into<String>) -> Self {
        Self {
            login: login.into(),
        }
    }

    pub fn login(&self) -> &str {
        &self.login
    }

    /// GitHub logins are case-insensitive.
    pub fn authored(&self, comment: &Comment) -> bool {
        comment.author.eq_ignore_ascii_case(&self.login)
    }
}

impl Default for BotIdentity {
    fn default() -> Self {
        Self::new(DEFAULT_BOT_LOGIN)
    }
}
