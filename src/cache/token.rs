use serde::{Deserialize, Serialize};

use crate::helpers::time::now_u64;

/// Bearer token obtained from the OAuth exchange. Replaced wholesale, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub value: String,
    pub exp_unix_ts: u64,        // UNIX TIMESTAMP
    pub refresh_at_unix_ts: u64, // token is treated as absent from here on
}

impl Token {
    pub fn new(value: String, exp_unix_ts: u64, refresh_at_unix_ts: u64) -> Self {
        Self { value, exp_unix_ts, refresh_at_unix_ts: refresh_at_unix_ts.min(exp_unix_ts) }
    }

    /// Build a token from an `expires_in` lifetime. The safety margin never eats
    /// more than half of the lifetime, so a freshly issued token is usable.
    pub fn from_expires_in(value: String, expires_in: u64, safety_margin_seconds: u64) -> Self {
        let now = now_u64();
        let margin = safety_margin_seconds.min(expires_in / 2);
        let exp_unix_ts = now.saturating_add(expires_in);
        Self::new(value, exp_unix_ts, exp_unix_ts - margin)
    }

    pub fn is_valid_at(&self, unix_ts: u64) -> bool {
        !self.value.is_empty() && unix_ts < self.refresh_at_unix_ts
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(now_u64())
    }
}
