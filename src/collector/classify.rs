//! Upstream failure classification.

use crate::hetzner::ApiError;
use crate::metrics::MetricDesc;

use super::descriptors::{AUTH_ERRORS, CLIENT_ERRORS, NETWORK_ERRORS, RATE_LIMIT_ERRORS, SERVER_ERRORS};

/// Category of an upstream failure, derived only from its HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// 401 or 403.
    Auth,
    /// 429.
    RateLimit,
    /// 5xx.
    Server,
    /// Any other status, in practice 4xx.
    Client,
    /// No HTTP status at all: transport failure, timeout, undecodable body.
    Network,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 5] = [
        Self::Auth,
        Self::RateLimit,
        Self::Server,
        Self::Client,
        Self::Network,
    ];

    /// Classify by status code; `None` always yields [`ErrorKind::Network`].
    pub fn classify(status: Option<u16>) -> Self {
        match status {
            None => Self::Network,
            Some(401 | 403) => Self::Auth,
            Some(429) => Self::RateLimit,
            Some(500..=599) => Self::Server,
            Some(_) => Self::Client,
        }
    }

    pub fn of(err: &ApiError) -> Self {
        Self::classify(err.status_code())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auth => "auth",
            Self::RateLimit => "rate_limit",
            Self::Server => "server",
            Self::Client => "client",
            Self::Network => "network",
        }
    }

    /// Counter incremented for failures of this kind.
    pub fn counter_desc(&self) -> &'static MetricDesc {
        match self {
            Self::Auth => &AUTH_ERRORS,
            Self::RateLimit => &RATE_LIMIT_ERRORS,
            Self::Server => &SERVER_ERRORS,
            Self::Client => &CLIENT_ERRORS,
            Self::Network => &NETWORK_ERRORS,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
