//! Dependency handles
//!
//! A handle is either a live client acquired at startup or a permanent
//! `Unavailable` marker. Handles are never replaced once created.

use serde::Serialize;
use std::fmt;

/// External dependencies the service talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dependency {
    Redis,
    Postgres,
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dependency::Redis => write!(f, "Redis"),
            Dependency::Postgres => write!(f, "PostgreSQL"),
        }
    }
}

/// Network location of a dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub host: String,
    pub port: u16,
}

impl Target {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Startup acquisition result, as reported by the root endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    Available,
    Unavailable,
}

/// Owned connection to a dependency, or the marker left behind when
/// acquisition gave up.
#[derive(Debug, Clone)]
pub enum Handle<T> {
    Live(T),
    Unavailable,
}

impl<T> Handle<T> {
    pub fn live(&self) -> Option<&T> {
        match self {
            Handle::Live(client) => Some(client),
            Handle::Unavailable => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Handle<U> {
        match self {
            Handle::Live(client) => Handle::Live(f(client)),
            Handle::Unavailable => Handle::Unavailable,
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, Handle::Live(_))
    }

    pub fn availability(&self) -> Availability {
        if self.is_live() {
            Availability::Available
        } else {
            Availability::Unavailable
        }
    }
}
