// SPDX-FileCopyrightText: 2026 SkautIS Client Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session-backed client for the SkautIS identity provider.
//!
//! ```no_run
//! use std::sync::Arc;
//! use skautis::{MemorySession, SkautisRegistry};
//!
//! let registry = SkautisRegistry::soap(Some(Arc::new(MemorySession::new())))?;
//! let skautis = registry.get_instance("my-app-id", true, false, false)?;
//! let skautis = skautis.lock().unwrap();
//! println!("log in at {}", skautis.login_url(Some("https://example.org/back")));
//! # Ok::<(), skautis::SkautisError>(())
//! ```

pub mod auth;
pub mod facade;
pub mod registry;

pub use auth::{AuthError, AuthenticatedUser, ExternalAuth};
pub use facade::Skautis;
pub use registry::SkautisRegistry;

pub use skautis_config::{Config, URL_PRODUCTION, URL_TEST};
pub use skautis_core::{
    CallArgs, EventKind, IdentityStore, SessionAdapter, SkautisError, SkautisQuery, WebService,
};
pub use skautis_session::{FileSession, MemorySession, User};
pub use skautis_wsdl::{SUPPORTED_SERVICES, WsdlManager};
