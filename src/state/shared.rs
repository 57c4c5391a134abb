//! Helpers shared by every screen: session-driven navigation, date text and
//! list placeholders.

use chrono::{Datelike, NaiveDate, Weekday};
use tourney_api::AuthStatus;
use tourney_api::client::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavVisibility {
    pub login: bool,
    pub logout: bool,
    pub admin: bool,
}

/// Which header actions are shown for a session.
pub fn nav_visibility(auth: &AuthStatus) -> NavVisibility {
    if auth.authenticated {
        NavVisibility {
            login: false,
            logout: true,
            admin: auth.is_admin(),
        }
    } else {
        NavVisibility {
            login: true,
            logout: false,
            admin: false,
        }
    }
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// `2024-01-05` -> `Jan 5, 2024`. Unparseable input is returned unchanged.
pub fn format_date(value: &str) -> String {
    match parse_date(value) {
        Some(date) => date.format("%b %-d, %Y").to_string(),
        None => value.to_string(),
    }
}

/// English weekday name of a `YYYY-MM-DD` date.
pub fn weekday_name(value: &str) -> Option<&'static str> {
    let date = parse_date(value)?;
    Some(match date.weekday() {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadStatus {
    #[default]
    Loading,
    Loaded,
    /// The last refresh failed; the table still shows the previous fetch.
    Stale,
}

/// Text to show in place of an empty table, if any.
pub fn list_placeholder(status: LoadStatus, len: usize, empty_message: &str) -> Option<String> {
    match (status, len) {
        (_, n) if n > 0 => None,
        (LoadStatus::Loading, _) => Some("Loading...".to_string()),
        _ => Some(empty_message.to_string()),
    }
}

pub fn error_alert(message: &str) -> String {
    format!("Error: {message}")
}

/// Alert text for a failed mutation: the backend's own message when it sent
/// one, the fixed fallback for other non-OK responses, and `transport` when
/// the request never produced a response.
pub fn mutation_error_text(err: &ApiError, fallback: &str, transport: &str) -> String {
    if err.is_transport() {
        return transport.to_string();
    }
    error_alert(err.backend_message().unwrap_or(fallback))
}
