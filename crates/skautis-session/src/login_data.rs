// SPDX-FileCopyrightText: 2026 SkautIS Client Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The persisted login record and the timestamp formats SkautIS uses.
//!
//! SkautIS reports local Prague time without an offset, both in the fields
//! posted back after login (`1. 2. 2024 13:05:09`) and in refresh responses
//! (`2024-02-01T13:05:09.123`). Everything is stored as UTC.

use std::collections::HashMap;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::{Europe::Prague, Tz};
use regex::Regex;
use serde::{Deserialize, Serialize};

use skautis_core::SkautisError;

/// Session key the login record is stored under.
pub const SESSION_KEY: &str = "skautis_user_data";

/// Posted field carrying the login token.
pub const FIELD_TOKEN: &str = "skautIS_Token";
/// Posted field carrying the role id.
pub const FIELD_ROLE: &str = "skautIS_IDRole";
/// Posted field carrying the unit id.
pub const FIELD_UNIT: &str = "skautIS_IDUnit";
/// Posted field carrying the automatic logout time.
pub const FIELD_DATE_LOGOUT: &str = "skautIS_DateLogout";

const POSTED_FORMAT: &str = "%d. %m. %Y %H:%M:%S";
const REFRESH_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

static FRACTIONAL_SECONDS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.(\d*)$").unwrap());

/// Login state of one user, as kept in the session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginData {
    #[serde(rename = "ID_Login", default, skip_serializing_if = "Option::is_none")]
    pub login_id: Option<String>,

    #[serde(rename = "ID_Role", default, skip_serializing_if = "Option::is_none")]
    pub role_id: Option<i64>,

    #[serde(rename = "ID_Unit", default, skip_serializing_if = "Option::is_none")]
    pub unit_id: Option<i64>,

    #[serde(rename = "LOGOUT_Date", default, skip_serializing_if = "Option::is_none")]
    pub logout_date: Option<DateTime<Utc>>,

    #[serde(rename = "AUTH_Confirmed", default)]
    pub auth_confirmed: bool,
}

impl LoginData {
    /// Parses the fields SkautIS posts back to the application after login.
    ///
    /// Missing fields stay absent; a logout date that does not match
    /// `j. n. Y H:i:s` is an error rather than a silent default.
    pub fn from_posted(fields: &HashMap<String, String>) -> Result<Self, SkautisError> {
        let number = |key: &str| fields.get(key).and_then(|raw| raw.trim().parse().ok());
        let logout_date = fields
            .get(FIELD_DATE_LOGOUT)
            .map(|raw| parse_posted_logout(raw))
            .transpose()?;
        Ok(Self {
            login_id: fields.get(FIELD_TOKEN).cloned(),
            role_id: number(FIELD_ROLE),
            unit_id: number(FIELD_UNIT),
            logout_date,
            auth_confirmed: false,
        })
    }

    /// Logout time in Prague local time.
    pub fn local_logout_date(&self) -> Option<DateTime<Tz>> {
        self.logout_date.map(|date| date.with_timezone(&Prague))
    }
}

fn prague_to_utc(naive: NaiveDateTime, raw: &str) -> Result<DateTime<Utc>, SkautisError> {
    Prague
        .from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| SkautisError::date_parse(raw, None))
}

/// Parses a posted logout date such as `1. 2. 2024 13:05:09`.
pub fn parse_posted_logout(raw: &str) -> Result<DateTime<Utc>, SkautisError> {
    let naive = NaiveDateTime::parse_from_str(raw.trim(), POSTED_FORMAT)
        .map_err(|e| SkautisError::date_parse(raw, Some(e)))?;
    prague_to_utc(naive, raw)
}

/// Parses a refresh timestamp, ignoring any fractional seconds.
pub fn parse_refresh_timestamp(raw: &str) -> Result<DateTime<Utc>, SkautisError> {
    let whole_seconds = FRACTIONAL_SECONDS.replace(raw, "");
    let naive = NaiveDateTime::parse_from_str(&whole_seconds, REFRESH_FORMAT)
        .map_err(|e| SkautisError::date_parse(raw, Some(e)))?;
    prague_to_utc(naive, raw)
}

/// Formats a timestamp the way SkautIS posts it.
pub fn format_posted_logout(date: DateTime<Utc>) -> String {
    date.with_timezone(&Prague)
        .format("%-d. %-m. %Y %H:%M:%S")
        .to_string()
}
