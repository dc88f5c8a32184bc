// SPDX-FileCopyrightText: 2026 SkautIS Client Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Login state of a SkautIS user and where it is kept between requests.

pub mod adapter;
pub mod login_data;
pub mod user;

pub use adapter::{FileSession, MemorySession};
pub use login_data::{
    LoginData, SESSION_KEY, format_posted_logout, parse_posted_logout, parse_refresh_timestamp,
};
pub use user::User;
