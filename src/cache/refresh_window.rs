pub const REFRESH_CEILING_SECONDS_DEFAULT: i64 = 300;

/// Proactive refresh policy: how long before expiry a refresh should start.
///
/// The offset is half the remaining token lifetime, capped at `ceiling_seconds`.
/// A long-lived token is refreshed `ceiling_seconds` before expiry; a short-lived
/// one halfway through its life so there is always a usable window left.
#[derive(Debug, Clone, Copy)]
pub struct RefreshWindow {
    pub ceiling_seconds: i64,
}

impl Default for RefreshWindow {
    fn default() -> Self {
        Self {
            ceiling_seconds: REFRESH_CEILING_SECONDS_DEFAULT,
        }
    }
}

impl RefreshWindow {
    pub fn new(ceiling_seconds: i64) -> Self {
        Self { ceiling_seconds }
    }

    /// Compute the refresh timestamp for a token issued at `now_unix_ts`.
    ///
    /// Never later than `expires_at_unix_ts`; for a token that arrives already
    /// expired this returns `expires_at_unix_ts` itself, so the next lookup
    /// triggers a refetch instead of looping inside the current one.
    pub fn refresh_at(&self, now_unix_ts: i64, expires_at_unix_ts: i64) -> i64 {
        let remaining = expires_at_unix_ts - now_unix_ts;
        if remaining <= 0 {
            return expires_at_unix_ts;
        }
        let offset = (remaining / 2).min(self.ceiling_seconds);
        expires_at_unix_ts - offset
    }
}
