use crate::cache::refresh_window::RefreshWindow;
use crate::cache::token::Token;

/// Cached token plus its resolved refresh deadline.
///
/// Built once per successful supplier call and replaced wholesale on the next
/// refresh; never mutated in place, so a reader observes either the previous
/// context or the new one, never a mix.
#[derive(Debug, Clone)]
pub struct TokenContext {
    pub token: Token,
    /// Refresh after this UNIX timestamp. Always <= token.expires_at_unix_ts.
    pub refresh_at_unix_ts: i64,
}

impl TokenContext {
    pub fn new(token: Token, window: RefreshWindow, now_unix_ts: i64) -> Self {
        let refresh_at_unix_ts = token
            .refresh_at_unix_ts
            .unwrap_or_else(|| window.refresh_at(now_unix_ts, token.expires_at_unix_ts))
            .min(token.expires_at_unix_ts);
        Self {
            token,
            refresh_at_unix_ts,
        }
    }

    /// Check if token should be refreshed at `now_unix_ts`.
    pub fn should_refresh(&self, now_unix_ts: i64) -> bool {
        now_unix_ts >= self.refresh_at_unix_ts
    }

    /// Check if token is past its hard expiry.
    pub fn is_expired(&self, now_unix_ts: i64) -> bool {
        now_unix_ts >= self.token.expires_at_unix_ts
    }
}
