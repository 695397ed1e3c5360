// tests/common/mod.rs
pub use tokio::task::JoinHandle;

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Result};
use axum::Router;
use reqwest::Client;

use crate::cache::token::Token;
use crate::supplier::SupplyToken;

/// Spawn an Axum router on an ephemeral port and return (JoinHandle, SocketAddr)
pub async fn spawn_axum(router: Router) -> (JoinHandle<()>, SocketAddr) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind failed");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server failed");
    });
    (handle, addr)
}

pub fn build_reqwest_client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .expect("reqwest client")
}

/// Supplier fed from a script of canned outcomes, one per invocation.
///
/// Cheap to clone; the test keeps one handle to push outcomes and inspect the
/// invocation count while the cache owns another.
#[derive(Clone)]
pub struct ScriptedSupplier {
    inner: Arc<Inner>,
}

struct Inner {
    outcomes: Mutex<VecDeque<Result<Token, String>>>,
    calls: AtomicUsize,
    delay: Duration,
}

impl ScriptedSupplier {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                outcomes: Mutex::new(VecDeque::new()),
                calls: AtomicUsize::new(0),
                delay,
            }),
        }
    }

    pub fn push_token(&self, token: Token) {
        self.inner.outcomes.lock().unwrap().push_back(Ok(token));
    }

    pub fn push_value(&self, value: &str, expires_at_unix_ts: i64) {
        self.push_token(Token::new(value.to_string(), expires_at_unix_ts));
    }

    pub fn push_error(&self, message: &str) {
        self.inner
            .outcomes
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
    }

    pub fn calls(&self) -> usize {
        self.inner.calls.load(Ordering::SeqCst)
    }
}

impl SupplyToken for ScriptedSupplier {
    async fn supply_token(&self) -> Result<Token> {
        self.inner.calls.fetch_add(1, Ordering::SeqCst);
        if !self.inner.delay.is_zero() {
            tokio::time::sleep(self.inner.delay).await;
        }
        let next = self
            .inner
            .outcomes
            .lock()
            .unwrap()
            .pop_front()
            .expect("scripted supplier ran out of outcomes");
        next.map_err(|message| anyhow!(message))
    }
}
