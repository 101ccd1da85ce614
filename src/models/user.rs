use std::collections::BTreeSet;

use crate::errors::AuthorizationError;

pub const DEFAULT_ALLOWED_USERS: &[i64] = &[5817239686, 5274796002];

/// Telegram user ids allowed to change alert state.
#[derive(Debug, Clone, PartialEq)]
pub struct AllowList(BTreeSet<i64>);

impl AllowList {
    pub fn new(ids: impl IntoIterator<Item = i64>) -> Self {
        Self(ids.into_iter().collect())
    }

    pub fn contains(&self, user_id: i64) -> bool {
        self.0.contains(&user_id)
    }

    pub fn check(&self, user_id: i64) -> Result<(), AuthorizationError> {
        if self.contains(user_id) {
            Ok(())
        } else {
            Err(AuthorizationError(user_id))
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for AllowList {
    fn default() -> Self {
        Self::new(DEFAULT_ALLOWED_USERS.iter().copied())
    }
}

/// The sender of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sender {
    pub user_id: i64,
    pub chat_id: i64,
}

impl Sender {
    /// Key under which this user's alerts are stored.
    pub fn owner(&self) -> String {
        self.user_id.to_string()
    }
}
