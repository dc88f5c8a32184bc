// SPDX-FileCopyrightText: 2026 SkautIS Client Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the SkautIS client.
//!
//! This crate provides the error taxonomy, call argument types, the call
//! record used by the debug log, the event dispatcher, and the trait seams
//! (transport, session storage, identity store) that the other crates are
//! built on.

pub mod error;
pub mod events;
pub mod query;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{RemoteFault, SkautisError};
pub use events::{EventDispatcher, Listener};
pub use query::{PendingQuery, SkautisQuery};
pub use types::{CallArgs, CallOptions, EventKind, ID_APPLICATION, ID_LOGIN, short_token};

pub use traits::{
    Connector, IdentityStore, LocalUser, NewUser, SessionAdapter, StatusProbe, Transport,
    UserChanges, WebService,
};
