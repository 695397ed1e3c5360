/// Bearer token as produced by a supplier.
///
/// `value` is opaque to the cache; only the timestamps drive refresh decisions.
#[derive(Debug, Clone)]
pub struct Token {
    pub value: String,
    /// UNIX timestamp after which the token is invalid.
    pub expires_at_unix_ts: i64,
    /// Optional supplier-provided proactive refresh point. When absent the
    /// cache derives one from its `RefreshWindow`.
    pub refresh_at_unix_ts: Option<i64>,
}

impl Token {
    pub fn new(value: String, expires_at_unix_ts: i64) -> Self {
        Self {
            value,
            expires_at_unix_ts,
            refresh_at_unix_ts: None,
        }
    }

    pub fn with_refresh_at(mut self, refresh_at_unix_ts: i64) -> Self {
        self.refresh_at_unix_ts = Some(refresh_at_unix_ts);
        self
    }
}
