//! Error types for the alert bot.

use thiserror::Error;

/// Startup configuration problems. The only fatal errors in the process.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("alert file io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("alert file is not valid json: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// The quote source could not produce a usable answer. The whole fetch is void.
#[derive(Error, Debug)]
pub enum FeedUnavailable {
    #[error("price request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("price request returned status {0}")]
    Status(u16),

    #[error("price request timed out")]
    Timeout,
}

/// A message could not be delivered to a chat.
#[derive(Error, Debug)]
pub enum DispatchFailure {
    #[error("send failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("telegram rejected message: {0}")]
    Rejected(String),

    #[error("send timed out")]
    Timeout,

    #[error("owner {0:?} is not a chat id")]
    BadChatId(String),
}

/// Bad user input on the command surface.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("unsupported coin {0:?}")]
    UnsupportedCoin(String),

    #[error("invalid price {0:?}")]
    InvalidPrice(String),

    #[error("invalid direction {0:?}")]
    InvalidDirection(String),

    #[error("alert limit reached")]
    AlertLimitReached,

    #[error("no alert to remove")]
    NothingToRemove,

    #[error("no alert at position {0}")]
    NoAlertAt(usize),
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("user {0} is not on the allow-list")]
pub struct AuthorizationError(pub i64);

/// Everything a chat command can fail with.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Unauthorized(#[from] AuthorizationError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Feed(#[from] FeedUnavailable),
}

impl CommandError {
    /// Text sent back to the user for this failure.
    pub fn reply(&self) -> String {
        match self {
            CommandError::Validation(v) => match v {
                ValidationError::Usage(usage) => format!("Usage: {usage}"),
                ValidationError::UnsupportedCoin(_) => "❗ Unsupported coin.".to_string(),
                ValidationError::InvalidPrice(_) => "❗ Invalid price.".to_string(),
                ValidationError::InvalidDirection(_) => {
                    "❗ Direction must be above or below.".to_string()
                }
                ValidationError::AlertLimitReached => {
                    "❗ You can only have 1 alert in beta.".to_string()
                }
                ValidationError::NothingToRemove => "No alert to remove.".to_string(),
                ValidationError::NoAlertAt(n) => format!("❗ No alert at position {n}."),
            },
            CommandError::Unauthorized(_) => "❌ Not authorized.".to_string(),
            CommandError::Store(_) => "⚠️ Could not access alert storage.".to_string(),
            CommandError::Feed(_) => "Failed to fetch prices.".to_string(),
        }
    }
}
