/// Supplier module
///
/// Defines the asynchronous token source the cache delegates to, plus the
/// production OAuth2 client-credentials implementation.
use anyhow::Result;

use crate::cache::token::Token;

pub mod oauth2;

/// Asynchronous token source: one call, one token or one error.
///
/// Implementations perform the actual network round trip to an identity
/// provider. The cache only requires a bearer value and an absolute expiry;
/// it never retries a failed call and imposes no timeout of its own — wrap
/// the supplier (see `resilience`) for either.
pub trait SupplyToken: Send + Sync + 'static {
    fn supply_token(&self) -> impl std::future::Future<Output = Result<Token>> + Send;
}
