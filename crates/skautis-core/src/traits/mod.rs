// SPDX-FileCopyrightText: 2026 SkautIS Client Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams between the client core and its collaborators.
//!
//! The core never talks to the network, the session store, or the local
//! user database directly; it goes through these traits so hosts and tests
//! can plug in their own implementations.

pub mod identity;
pub mod session;
pub mod transport;
pub mod web_service;

pub use identity::{IdentityStore, LocalUser, NewUser, UserChanges};
pub use session::SessionAdapter;
pub use transport::{Connector, StatusProbe, Transport};
pub use web_service::WebService;
