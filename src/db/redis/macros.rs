/// Read-through caching for async computations returning `AppResult`.
///
/// Returns the cached value for `$key` when present. Otherwise awaits
/// `$block`, queues the result for caching with `$ttl` seconds and returns it.
/// A failed cache read is logged and treated as a miss, so an unreachable
/// cache never fails the caller. Errors from `$block` are propagated with
/// `?`, so the macro must be used inside a function returning `AppResult`.
///
/// # Example
/// ```rust,ignore
/// let products: Vec<Product> = cached!(cache, key, 300, async {
///     inner.products().await
/// })?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let key = $key;
        let hit = match $cache.get_from_cache(&key).await {
            Ok(hit) => hit,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Cache read failed, reading through");
                None
            }
        };

        if let Some(cached) = hit {
            tracing::debug!(key = %key, "Cache hit");
            Ok(cached)
        } else {
            tracing::debug!(key = %key, "Cache miss");
            let value = $block.await?;
            $cache.set_in_background(&key, &value, $ttl);
            Ok(value)
        }
    }};
}
