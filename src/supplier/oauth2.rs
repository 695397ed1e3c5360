use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::cache::token::Token;
use crate::helpers::time::{Clock, SystemClock};
use crate::supplier::SupplyToken;

#[derive(Debug, Clone)]
pub struct OAuth2Config {
    pub token_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub scope: Option<String>,
}

/// Client-credentials token supplier.
///
/// POSTs a form grant to the token endpoint and converts the relative
/// `expires_in` of the response into an absolute expiry timestamp.
#[derive(Clone)]
pub struct OAuth2Supplier {
    config: OAuth2Config,
    client: Client,
    clock: Arc<dyn Clock>,
}

#[derive(Debug, Deserialize)]
struct OAuth2Response {
    access_token: String,
    expires_in: i64,
}

impl OAuth2Supplier {
    pub fn new(config: OAuth2Config) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self::with_client(config, client))
    }

    /// Use a caller-provided client, e.g. one with timeouts configured.
    pub fn with_client(config: OAuth2Config, client: Client) -> Self {
        Self {
            config,
            client,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

impl SupplyToken for OAuth2Supplier {
    async fn supply_token(&self) -> Result<Token> {
        let mut form = HashMap::new();
        form.insert("grant_type", "client_credentials");
        form.insert("client_id", self.config.client_id.as_str());
        form.insert("client_secret", self.config.client_secret.as_str());
        if let Some(scope) = &self.config.scope {
            form.insert("scope", scope.as_str());
        }

        debug!(url = %self.config.token_url, "requesting OAuth2 token");
        let response = self
            .client
            .post(&self.config.token_url)
            .form(&form)
            .send()
            .await
            .context("OAuth2 token request failed")?;
        if !response.status().is_success() {
            return Err(anyhow!(
                "OAuth2 token request failed: {}",
                response.status()
            ));
        }

        let body: OAuth2Response = response
            .json()
            .await
            .context("malformed OAuth2 token response")?;
        let expires_at = self.clock.now_unix_ts() + body.expires_in;
        Ok(Token::new(body.access_token, expires_at))
    }
}
