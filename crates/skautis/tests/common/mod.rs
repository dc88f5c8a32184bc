// SPDX-FileCopyrightText: 2026 SkautIS Client Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared wiring for the facade integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{Duration, Utc};
use chrono_tz::Europe::Prague;

use skautis::{MemorySession, SkautisRegistry};
use skautis_test_utils::{FixedProbe, MockConnector, MockTransport};

pub struct Harness {
    pub transport: Arc<MockTransport>,
    pub probe: Arc<FixedProbe>,
    pub session: Arc<MemorySession>,
    pub registry: SkautisRegistry,
}

pub fn harness_with_probe(probe: FixedProbe) -> Harness {
    let transport = Arc::new(MockTransport::new());
    let probe = Arc::new(probe);
    let session = Arc::new(MemorySession::new());
    let registry = SkautisRegistry::new(
        Arc::new(MockConnector::new(transport.clone())),
        probe.clone(),
        Some(session.clone()),
    );
    Harness {
        transport,
        probe,
        session,
        registry,
    }
}

pub fn harness() -> Harness {
    harness_with_probe(FixedProbe::new(200))
}

/// Prague local time `offset` from now, formatted like a refresh response.
pub fn prague_timestamp(offset: Duration) -> String {
    (Utc::now() + offset)
        .with_timezone(&Prague)
        .format("%Y-%m-%dT%H:%M:%S%.3f")
        .to_string()
}
