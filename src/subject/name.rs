//! Observer identities.
//!
//! Observers are registered under an [`ObserverName`], either a plain string
//! or an [`ObserverToken`]. Tokens are unique for the life of the process, so
//! independent callers sharing one subject cannot overwrite each other by
//! picking the same string.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_TOKEN: AtomicU64 = AtomicU64::new(1);

/// Opaque unique key for an observer.
///
/// Two tokens compare equal only if one is a copy of the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverToken(u64);

impl ObserverToken {
    /// Mint a fresh token.
    pub fn new() -> Self {
        ObserverToken(NEXT_TOKEN.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for ObserverToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Key an observer is registered under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ObserverName {
    Named(String),
    Token(ObserverToken),
}

impl From<&str> for ObserverName {
    fn from(name: &str) -> Self {
        ObserverName::Named(name.to_owned())
    }
}

impl From<String> for ObserverName {
    fn from(name: String) -> Self {
        ObserverName::Named(name)
    }
}

impl From<ObserverToken> for ObserverName {
    fn from(token: ObserverToken) -> Self {
        ObserverName::Token(token)
    }
}

impl fmt::Display for ObserverName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObserverName::Named(name) => write!(f, "{}", name),
            ObserverName::Token(token) => write!(f, "token#{}", token.0),
        }
    }
}
