use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use crate::cache::error::RefreshError;
use crate::cache::refresh_window::RefreshWindow;
use crate::cache::token::Token;
use crate::cache::token_context::TokenContext;
use crate::helpers::time::{Clock, SystemClock};
use crate::supplier::SupplyToken;

type RefreshOutcome = Result<Token, RefreshError>;

/// Shared mutable state: the current token and the in-flight refresh marker.
/// Both are only touched under the one mutex, so a claim of the refresh slot
/// and the publication of its result are atomic with respect to readers.
struct State {
    current: Option<TokenContext>,
    in_flight: Option<watch::Receiver<Option<RefreshOutcome>>>,
}

/// Single-flight bearer-token cache.
///
/// Serves the cached token to any number of concurrent callers and guarantees
/// at most one supplier call is in flight at a time: the first caller to find
/// the cache empty or stale claims the refresh slot and spawns the supplier
/// call; everyone else attaches to the same attempt and observes its one
/// outcome. Callers holding a fresh token never suspend.
///
/// The supplier runs in a detached task, so a caller dropping its own
/// `get_token` future detaches only itself; the refresh keeps running and the
/// remaining waiters still get its result.
///
/// Instantiate one cache per credential; cheap to clone and share.
pub struct TokenCache<S> {
    supplier: Arc<S>,
    window: RefreshWindow,
    clock: Arc<dyn Clock>,
    state: Arc<Mutex<State>>,
}

impl<S> Clone for TokenCache<S> {
    fn clone(&self) -> Self {
        Self {
            supplier: Arc::clone(&self.supplier),
            window: self.window,
            clock: Arc::clone(&self.clock),
            state: Arc::clone(&self.state),
        }
    }
}

impl<S: SupplyToken> TokenCache<S> {
    pub fn new(supplier: S) -> Self {
        Self {
            supplier: Arc::new(supplier),
            window: RefreshWindow::default(),
            clock: Arc::new(SystemClock),
            state: Arc::new(Mutex::new(State {
                current: None,
                in_flight: None,
            })),
        }
    }

    pub fn with_window(mut self, window: RefreshWindow) -> Self {
        self.window = window;
        self
    }

    /// Replace the system clock, for deterministic time in tests.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Get the current token, refreshing it if needed.
    ///
    /// Fresh cached token: returned immediately, no supplier call. Empty or
    /// stale cache: exactly one refresh is started among all concurrent
    /// callers and every caller resolves to its outcome. A supplier failure
    /// is delivered to every attached caller and clears the in-flight slot,
    /// so the next call starts a new attempt; the cache never retries on its
    /// own.
    pub async fn get_token(&self) -> Result<Token, RefreshError> {
        let mut rx = {
            let mut state = self.state.lock().await;

            // Attach to an in-flight refresh before looking at freshness, so
            // a stale reader can never start a second attempt.
            if let Some(rx) = &state.in_flight {
                debug!("attaching to in-flight token refresh");
                rx.clone()
            } else {
                let now = self.clock.now_unix_ts();
                if let Some(ctx) = state.current.as_ref().filter(|c| !c.should_refresh(now)) {
                    debug!(
                        refresh_at = ctx.refresh_at_unix_ts,
                        "serving cached token"
                    );
                    return Ok(ctx.token.clone());
                }

                // Claim the refresh slot. Holding the lock makes the claim
                // exclusive; the receiver stored in the slot is what later
                // callers attach to.
                let (tx, rx) = watch::channel(None);
                state.in_flight = Some(rx.clone());
                info!(
                    cold_start = state.current.is_none(),
                    "starting token refresh"
                );
                self.spawn_refresh(tx);
                rx
            }
        };

        loop {
            if let Some(outcome) = rx.borrow_and_update().clone() {
                return outcome;
            }
            if rx.changed().await.is_err() {
                // Sender dropped without a result: the refresh task died.
                // Clear the slot if it still points at this attempt so the
                // next caller can start over.
                let mut state = self.state.lock().await;
                if state
                    .in_flight
                    .as_ref()
                    .is_some_and(|cur| cur.same_channel(&rx))
                {
                    state.in_flight = None;
                }
                return Err(RefreshError::refresh_task_died());
            }
        }
    }

    fn spawn_refresh(&self, tx: watch::Sender<Option<RefreshOutcome>>) {
        let supplier = Arc::clone(&self.supplier);
        let state = Arc::clone(&self.state);
        let clock = Arc::clone(&self.clock);
        let window = self.window;

        // Detached on purpose: the attempt's lifecycle is independent of any
        // single waiter's cancellation.
        tokio::spawn(async move {
            let result = supplier.supply_token().await;

            let outcome = {
                let mut state = state.lock().await;
                state.in_flight = None;
                match result {
                    Ok(token) => {
                        let now = clock.now_unix_ts();
                        let ctx = TokenContext::new(token.clone(), window, now);
                        if ctx.is_expired(now) {
                            // Clock-skewed upstream; serve it once, the next
                            // call refetches.
                            warn!(
                                expires_at = token.expires_at_unix_ts,
                                "supplier returned an already-expired token"
                            );
                        } else {
                            info!(
                                expires_at = token.expires_at_unix_ts,
                                refresh_at = ctx.refresh_at_unix_ts,
                                "token refreshed"
                            );
                        }
                        state.current = Some(ctx);
                        Ok(token)
                    }
                    Err(err) => {
                        warn!("token refresh failed: {err:#}");
                        Err(RefreshError::from_supplier(err))
                    }
                }
            };

            // Publish after the slot is cleared; waiters read the outcome
            // through the channel, later callers through `state.current`.
            let _ = tx.send(Some(outcome));
        });
    }
}
