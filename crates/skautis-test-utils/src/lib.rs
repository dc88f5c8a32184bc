// SPDX-FileCopyrightText: 2026 SkautIS Client Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for SkautIS client tests.
//!
//! Provides scripted adapters so the whole call path can be exercised
//! without a network connection.
//!
//! # Components
//!
//! - [`MockTransport`] - scripted responses and faults per operation
//! - [`MockConnector`] - hands out one shared [`MockTransport`]
//! - [`FixedProbe`] - availability probe with a canned status
//! - [`MockWebService`] - counting service for decorator tests
//! - [`MemoryIdentityStore`] - local account store kept in memory

pub mod fixtures;
pub mod mock_identity;
pub mod mock_service;
pub mod mock_transport;

pub use mock_identity::MemoryIdentityStore;
pub use mock_service::MockWebService;
pub use mock_transport::{FixedProbe, MockConnector, MockTransport};
