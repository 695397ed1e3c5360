//! # token-guard
//!
//! In-memory bearer-token cache with single-flight refresh coordination.
//!
//! Any number of concurrent callers can ask for the current token; at most
//! one credential refresh is ever in flight, tokens are refreshed proactively
//! before expiry, and callers holding a fresh token never suspend.
//!
//! Modules:
//! - `cache` — the token cache and refresh-window policy
//! - `supplier` — the asynchronous token source trait and the OAuth2
//!   client-credentials implementation
//! - `resilience` — retry decorator for suppliers (the cache never retries)
//! - `policy` — bearer `Authorization` header attachment for outgoing requests
//! - `helpers` — injectable clock
//! - `utils` — logging setup

pub mod cache;
pub mod helpers;
pub mod policy;
pub mod resilience;
pub mod supplier;
pub mod utils;

#[cfg(test)]
pub mod tests;

pub use crate::cache::error::RefreshError;
pub use crate::cache::refresh_window::RefreshWindow;
pub use crate::cache::token::Token;
pub use crate::cache::token_cache::TokenCache;
pub use crate::supplier::SupplyToken;
