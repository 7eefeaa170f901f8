//! Temporal awareness: the clock tool.

use chrono::{DateTime, Utc};

use super::base_tool::Tool;

/// Registered tool name for the clock.
pub const GET_CURRENT_TIME: &str = "get_current_time";

/// Command marker bound to [`GET_CURRENT_TIME`] in the default registry.
pub const GET_TIME_MARKER: &str = "GET TIME";

/// Prefix of the tool-role message carrying the clock reading.
pub const TIME_RESULT_PREFIX: &str = "Current Time: ";

/// RFC 1123 rendering, e.g. `Sun, 18 Oct 2026 09:30:00 GMT`.
pub fn format_rfc1123(time: DateTime<Utc>) -> String {
    time.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// The current UTC time in RFC 1123 form.
pub fn current_utc_time() -> String {
    format_rfc1123(Utc::now())
}

/// Clock tool reading the system time.
pub fn clock_tool() -> Tool {
    Tool::from_fn(GET_CURRENT_TIME, "Retrieves the current time in UTC.", || {
        Ok(current_utc_time())
    })
}
