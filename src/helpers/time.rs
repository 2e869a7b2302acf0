use chrono::Utc;

use crate::utils::constants::SAFETY_MARGIN_SECONDS_DEFAULT;

pub fn get_token_safety_margin_seconds(safety_margin_seconds_settings: Option<u64>) -> u64 {
    safety_margin_seconds_settings.unwrap_or(SAFETY_MARGIN_SECONDS_DEFAULT)
}

pub fn now_u64() -> u64 {
    now_i64().max(0) as u64
}

pub fn now_i64() -> i64 {
    Utc::now().timestamp()
}
