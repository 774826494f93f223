//! Google service-account authentication for tasklog.
//!
//! Implements the OAuth2 JWT bearer flow used by service accounts:
//! - Key file loading and validation ([`ServiceAccountKey`])
//! - RS256 assertion signing and token exchange
//! - Per-scope access token caching with early refresh
//!
//! Clients depend on the [`TokenProvider`] trait so tests can substitute
//! a [`StaticTokenProvider`].

#![forbid(unsafe_code)]

pub mod error;
pub mod key;
pub mod token;

pub use error::{AuthError, Result};
pub use key::ServiceAccountKey;
pub use token::{
    SCOPE_SPREADSHEETS, SCOPE_SPREADSHEETS_READONLY, ServiceAccountTokenProvider,
    StaticTokenProvider, TokenProvider,
};
