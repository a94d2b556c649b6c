//! Input normalizers
//!
//! Pure functions converting loosely-typed host input into the wire shapes
//! the Postscript API expects: phone numbers to E.164, dates to ISO-8601
//! instants, filter maps to query parameters, and message bodies to the
//! `/messages` payload. Everything here fails before any network I/O.

use crate::error::{Error, Result};
use crate::params::{JsonObject, ParamSource, Query};
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Maximum body length for a plain SMS
pub const SMS_MAX_LENGTH: usize = 160;

/// Maximum body length for a multimedia message
pub const MMS_MAX_LENGTH: usize = 1600;

static E164_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+[1-9]\d{1,14}$").expect("E.164 pattern is valid"));

/// Normalize a raw phone number to E.164.
///
/// Strips every non-digit character, then: 10 digits get a `+1` prefix,
/// 11 digits starting with `1` get a `+`, and anything longer than 10 digits
/// is assumed to already carry a country code and gets a `+` as-is. Shorter
/// inputs are rejected. Deliberately permissive beyond the digit count;
/// callers needing strict E.164 use [`is_valid_e164`].
pub fn normalize_phone_number(raw: &str) -> Result<String> {
    if raw.is_empty() {
        return Err(Error::invalid_argument("Phone number is required"));
    }

    let cleaned: String = raw.chars().filter(char::is_ascii_digit).collect();

    if cleaned.len() == 10 {
        return Ok(format!("+1{cleaned}"));
    }
    if cleaned.len() == 11 && cleaned.starts_with('1') {
        return Ok(format!("+{cleaned}"));
    }
    if cleaned.len() > 10 {
        return Ok(format!("+{cleaned}"));
    }

    Err(Error::invalid_argument(format!(
        "Invalid phone number format: {raw}. Expected 10+ digits."
    )))
}

/// True iff `s` is strict E.164: `+`, a nonzero leading digit, at most 15
/// digits total.
pub fn is_valid_e164(s: &str) -> bool {
    E164_RE.is_match(s)
}

/// Serialize an instant as UTC ISO-8601 with millisecond precision
pub fn format_datetime(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a date string and re-serialize it as a UTC ISO-8601 instant with
/// millisecond precision.
///
/// Accepts RFC 3339 timestamps, naive date-times (assumed UTC), and bare
/// dates (midnight UTC). An already-ISO input round-trips unchanged.
pub fn format_date(input: &str) -> Result<String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(format_datetime(dt.with_timezone(&Utc)));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(format_datetime(naive.and_utc()));
    }
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        let midnight = date.and_hms_opt(0, 0, 0).expect("midnight is valid");
        return Ok(format_datetime(midnight.and_utc()));
    }

    Err(Error::invalid_argument(format!("Invalid date: {input}")))
}

/// Build query parameters for subscriber list filtering.
///
/// Copies only the recognized filter keys; date bounds are normalized to
/// ISO-8601. Unrecognized keys are dropped, not errors.
pub fn subscriber_query(filters: &JsonObject) -> Result<Query> {
    let mut query = Query::new();

    if let Some(tag) = filters.string_opt("tag") {
        query.insert("tag".to_string(), tag);
    }
    if let Some(origin) = filters.string_opt("origin") {
        query.insert("origin".to_string(), origin);
    }
    if let Some(subscribed) = filters.bool_opt("subscribed") {
        query.insert("subscribed".to_string(), subscribed.to_string());
    }
    if let Some(after) = filters.string_opt("created_after") {
        query.insert("created_after".to_string(), format_date(&after)?);
    }
    if let Some(before) = filters.string_opt("created_before") {
        query.insert("created_before".to_string(), format_date(&before)?);
    }

    Ok(query)
}

/// Optional fields of a `/messages` payload
#[derive(Debug, Clone, Default)]
pub struct MessageOptions {
    pub media_url: Option<String>,
    pub keyword_id: Option<String>,
    pub skip_fatigue: Option<bool>,
    pub use_short_links: Option<bool>,
}

impl MessageOptions {
    /// Read message options from a host parameter bag
    pub fn from_params(options: &JsonObject) -> Self {
        Self {
            media_url: options.string_opt("mediaUrl"),
            keyword_id: options.string_opt("keywordId"),
            skip_fatigue: options.bool_opt("skipFatigue"),
            use_short_links: options.bool_opt("useShortLinks"),
        }
    }

    /// Override the media URL (used by the MMS send path)
    #[must_use]
    pub fn with_media_url(mut self, url: impl Into<String>) -> Self {
        self.media_url = Some(url.into());
        self
    }
}

/// Build a `/messages` request body.
///
/// `subscriber_id` and `body` are always present; each option is included
/// only when explicitly set, so `false` and `0` survive while absent fields
/// stay off the wire.
pub fn build_message_payload(
    subscriber_id: &str,
    text: &str,
    options: &MessageOptions,
) -> JsonObject {
    let mut body = JsonObject::new();
    body.insert(
        "subscriber_id".to_string(),
        Value::String(subscriber_id.to_string()),
    );
    body.insert("body".to_string(), Value::String(text.to_string()));

    if let Some(media_url) = &options.media_url {
        body.insert("media_url".to_string(), Value::String(media_url.clone()));
    }
    if let Some(keyword_id) = &options.keyword_id {
        body.insert("keyword_id".to_string(), Value::String(keyword_id.clone()));
    }
    if let Some(skip_fatigue) = options.skip_fatigue {
        body.insert("skip_fatigue".to_string(), Value::Bool(skip_fatigue));
    }
    if let Some(use_short_links) = options.use_short_links {
        body.insert("use_short_links".to_string(), Value::Bool(use_short_links));
    }

    body
}

/// Enforce the message length limit: 160 characters for plain SMS, 1600 for
/// multimedia.
pub fn check_message_length(text: &str, is_multimedia: bool) -> Result<()> {
    let limit = if is_multimedia {
        MMS_MAX_LENGTH
    } else {
        SMS_MAX_LENGTH
    };
    let length = text.chars().count();
    if length > limit {
        return Err(Error::MessageTooLong { limit, length });
    }
    Ok(())
}
