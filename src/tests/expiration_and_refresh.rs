#[cfg(test)]
mod test {

    use std::sync::Arc;
    use std::time::Duration;

    use crate::cache::token_cache::TokenCache;
    use crate::helpers::time::ManualClock;
    use crate::tests::common::ScriptedSupplier;

    const T0: i64 = 1_700_000_000;

    #[tokio::test]
    async fn fresh_token_short_circuits_without_supplier_calls() {
        let supplier = ScriptedSupplier::new(Duration::ZERO);
        // lifetime 3600s, default window -> refresh at expiry minus 300s
        supplier.push_value("token-a", T0 + 3600);

        let clock = Arc::new(ManualClock::new(T0));
        let cache = TokenCache::new(supplier.clone()).with_clock(clock.clone());

        assert_eq!(cache.get_token().await.unwrap().value, "token-a");
        clock.advance(3299);
        for _ in 0..100 {
            assert_eq!(cache.get_token().await.unwrap().value, "token-a");
        }

        assert_eq!(supplier.calls(), 1, "no supplier call before refresh_at");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn stale_token_triggers_exactly_one_refresh() {
        let supplier = ScriptedSupplier::new(Duration::from_millis(50));
        supplier.push_value("token-a", T0 + 3600);
        supplier.push_value("token-b", T0 + 7200);

        let clock = Arc::new(ManualClock::new(T0));
        let cache = TokenCache::new(supplier.clone()).with_clock(clock.clone());

        assert_eq!(cache.get_token().await.unwrap().value, "token-a");

        // past refresh_at (T0 + 3300) but before expiry
        clock.set(T0 + 3500);

        let mut handles = Vec::new();
        for _ in 0..10 {
            let cache = cache.clone();
            handles.push(tokio::spawn(async move { cache.get_token().await }));
        }
        for handle in handles {
            assert_eq!(handle.await.unwrap().expect("token").value, "token-b");
        }

        assert_eq!(supplier.calls(), 2);
    }

    #[tokio::test]
    async fn already_expired_token_is_served_once_then_refetched() {
        let supplier = ScriptedSupplier::new(Duration::ZERO);
        supplier.push_value("dead-token", T0 - 10);
        supplier.push_value("live-token", T0 + 3600);

        let clock = Arc::new(ManualClock::new(T0));
        let cache = TokenCache::new(supplier.clone()).with_clock(clock);

        // the call that performed the fetch observes the expired token as-is
        assert_eq!(cache.get_token().await.unwrap().value, "dead-token");
        assert_eq!(supplier.calls(), 1);

        // the next call refetches instead of serving the dead token
        assert_eq!(cache.get_token().await.unwrap().value, "live-token");
        assert_eq!(supplier.calls(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn supplier_calls_bounded_by_refresh_intervals() {
        let intervals: i64 = 5;
        let supplier = ScriptedSupplier::new(Duration::ZERO);
        let clock = Arc::new(ManualClock::new(T0));
        let cache = TokenCache::new(supplier.clone()).with_clock(clock.clone());

        // token issued at interval i lives 100s, so refresh_at is issue+50 and
        // the 60s step below is always past it
        supplier.push_value("token-0", T0 + 100);

        for i in 0..=intervals {
            if i > 0 {
                clock.advance(60);
                supplier.push_value(&format!("token-{i}"), T0 + i * 60 + 100);
            }

            let mut handles = Vec::new();
            for _ in 0..20 {
                let cache = cache.clone();
                handles.push(tokio::spawn(async move { cache.get_token().await }));
            }
            for handle in handles {
                assert_eq!(
                    handle.await.unwrap().expect("token").value,
                    format!("token-{i}")
                );
            }

            assert_eq!(supplier.calls() as i64, i + 1);
        }
    }
}
