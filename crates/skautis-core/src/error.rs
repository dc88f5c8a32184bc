// SPDX-FileCopyrightText: 2026 SkautIS Client Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the SkautIS client.

use std::error::Error as StdError;
use std::sync::Arc;

use thiserror::Error;

/// A fault reported by the remote side (or by the transport on its behalf).
///
/// Carries the original fault code and message. Transport-level failures
/// (HTTP status, IO, malformed XML) are reported as faults too, so every
/// remote failure goes through the same classification.
#[derive(Debug, Clone, Error)]
#[error("[{code}] {message}")]
pub struct RemoteFault {
    /// Fault code, e.g. `soap:Receiver` or `HTTP`.
    pub code: String,
    /// Human-readable fault reason as sent by the server.
    pub message: String,
    /// Underlying cause, if the fault was raised locally.
    #[source]
    pub source: Option<Arc<dyn StdError + Send + Sync>>,
}

impl RemoteFault {
    /// Creates a fault with no underlying cause.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Attaches an underlying cause.
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Arc::new(source));
        self
    }
}

/// The primary error type used across the SkautIS client crates.
#[derive(Debug, Clone, Error)]
pub enum SkautisError {
    /// Invalid settings detected at construction time (e.g. empty application id).
    #[error("configuration error: {0}")]
    Config(String),

    /// Generic remote fault that matched no specific pattern.
    #[error("web service call failed: {fault}")]
    Protocol {
        #[source]
        fault: RemoteFault,
    },

    /// The remote session was invalidated server-side; callers should log the user off.
    #[error("remote session invalidated: {fault}")]
    Authentication {
        #[source]
        fault: RemoteFault,
    },

    /// The remote side refused the call for lack of permission.
    #[error("insufficient permission: {fault}")]
    Permission {
        #[source]
        fault: RemoteFault,
    },

    /// A remote or posted timestamp did not match the expected format.
    #[error("could not parse date '{value}'")]
    DateParse {
        value: String,
        #[source]
        source: Option<chrono::ParseError>,
    },

    /// Unknown logical service name or alias.
    #[error("web service '{name}' not found")]
    ServiceNotFound { name: String },

    /// Session storage failed to load or persist login state.
    #[error("session storage error: {0}")]
    Session(String),

    /// Local identity store failure.
    #[error("identity store error: {0}")]
    Identity(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SkautisError {
    /// Stable class name of the error kind.
    ///
    /// Serialized call records keep this instead of the live error value.
    pub fn kind_name(&self) -> &'static str {
        match self {
            SkautisError::Config(_) => "ConfigurationError",
            SkautisError::Protocol { .. } => "ProtocolError",
            SkautisError::Authentication { .. } => "AuthenticationError",
            SkautisError::Permission { .. } => "PermissionError",
            SkautisError::DateParse { .. } => "DateParseError",
            SkautisError::ServiceNotFound { .. } => "ServiceNotFoundError",
            SkautisError::Session(_) => "SessionError",
            SkautisError::Identity(_) => "IdentityError",
            SkautisError::Internal(_) => "InternalError",
        }
    }

    /// The remote fault behind a classified protocol error, if any.
    pub fn fault(&self) -> Option<&RemoteFault> {
        match self {
            SkautisError::Protocol { fault }
            | SkautisError::Authentication { fault }
            | SkautisError::Permission { fault } => Some(fault),
            _ => None,
        }
    }

    /// Builds a date parse error for the given raw value.
    pub fn date_parse(value: impl Into<String>, source: Option<chrono::ParseError>) -> Self {
        SkautisError::DateParse {
            value: value.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn fault_is_chained_as_source() {
        let err = SkautisError::Authentication {
            fault: RemoteFault::new("soap:Receiver", "Uživatel byl odhlášen"),
        };
        let source = err.source().expect("fault should be chained");
        assert_eq!(source.to_string(), "[soap:Receiver] Uživatel byl odhlášen");
        assert_eq!(err.fault().map(|f| f.code.as_str()), Some("soap:Receiver"));
    }

    #[test]
    fn local_cause_is_chained_below_fault() {
        let io = std::io::Error::other("connection reset");
        let err = SkautisError::Protocol {
            fault: RemoteFault::new("HTTP", "connection reset").with_source(io),
        };
        let fault = err.source().unwrap();
        assert_eq!(fault.source().unwrap().to_string(), "connection reset");
    }

    #[test]
    fn kind_names_are_distinct() {
        let fault = RemoteFault::new("c", "m");
        let errors = [
            SkautisError::Config("x".into()),
            SkautisError::Protocol { fault: fault.clone() },
            SkautisError::Authentication { fault: fault.clone() },
            SkautisError::Permission { fault },
            SkautisError::date_parse("x", None),
            SkautisError::ServiceNotFound { name: "x".into() },
            SkautisError::Session("x".into()),
            SkautisError::Identity("x".into()),
            SkautisError::Internal("x".into()),
        ];
        let mut names: Vec<_> = errors.iter().map(|e| e.kind_name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), errors.len());
    }
}
