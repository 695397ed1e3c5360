use anyhow::{Context, Result};
use http::header::AUTHORIZATION;
use http::HeaderValue;

use crate::cache::token_cache::TokenCache;
use crate::supplier::SupplyToken;

/// Outgoing-request authentication backed by a `TokenCache`.
///
/// Pulls the current token from the cache before each request and attaches it
/// as `Authorization: Bearer <value>`. When the cache cannot produce a token
/// the request is never sent; the authentication error surfaces to the
/// request's caller.
pub struct BearerAuthPolicy<S> {
    cache: TokenCache<S>,
}

impl<S> Clone for BearerAuthPolicy<S> {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
        }
    }
}

impl<S: SupplyToken> BearerAuthPolicy<S> {
    pub fn new(cache: TokenCache<S>) -> Self {
        Self { cache }
    }

    /// The `Authorization` header value for the current token.
    ///
    /// Marked sensitive so it is redacted from header debug output.
    pub async fn header_value(&self) -> Result<HeaderValue> {
        let token = self
            .cache
            .get_token()
            .await
            .context("bearer authentication failed")?;
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token.value))
            .context("token value is not a valid header value")?;
        value.set_sensitive(true);
        Ok(value)
    }

    /// Attach the bearer header to an outgoing request.
    pub async fn authorize(&self, request: reqwest::RequestBuilder) -> Result<reqwest::RequestBuilder> {
        Ok(request.header(AUTHORIZATION, self.header_value().await?))
    }
}
