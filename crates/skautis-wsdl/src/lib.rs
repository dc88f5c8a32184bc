// SPDX-FileCopyrightText: 2026 SkautIS Client Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Web service layer of the SkautIS client.
//!
//! [`WsdlManager`] hands out memoized services built by a
//! [`WebServiceFactory`]. Each service is a [`RemoteWebService`] that shapes
//! envelopes and unwraps responses, optionally wrapped in a
//! [`CacheDecorator`].

pub mod cache;
pub mod envelope;
pub mod factory;
pub mod manager;
pub mod web_service;

pub use cache::{ArrayCache, CacheBackend, CacheDecorator, CheckedLogins, UNCACHED_FUNCTIONS};
pub use factory::{StandardFactory, WebServiceFactory};
pub use manager::{SUPPORTED_SERVICES, WsdlManager, resolve_service_name};
pub use web_service::RemoteWebService;
