// SPDX-FileCopyrightText: 2026 SkautIS Client Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Canned remote responses shaped like the SkautIS web services return them.

use serde_json::{Value, json};

/// Application id used throughout the tests.
pub const APP_ID: &str = "11111111-2222-3333-4444-555555555555";

/// Login token used throughout the tests.
pub const TOKEN: &str = "aaaaaaaa-bbbb-cccc-dddd-eeeeeeeeeeee";

/// `LoginUpdateRefresh` answer carrying a new logout time.
pub fn refresh_response(date_logout: &str) -> Value {
    json!({ "LoginUpdateRefreshResult": { "DateLogout": date_logout } })
}

/// `UserDetail` answer for a user with the given login name.
pub fn user_detail_response(user_name: &str, person_id: i64) -> Value {
    json!({
        "UserDetailResult": {
            "ID": 42,
            "UserName": user_name,
            "ID_Person": person_id,
        }
    })
}

/// `PersonDetail` answer.
pub fn person_detail_response(display_name: &str, email: &str) -> Value {
    json!({
        "PersonDetailResult": {
            "DisplayName": display_name,
            "Email": email,
        }
    })
}
