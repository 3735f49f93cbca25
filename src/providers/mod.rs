//! Provider clients for the upstream capabilities
//!
//! One client per upstream capability: geocoding, weather, news and
//! chat completion. Each wraps a single HTTP call and maps the raw body to a
//! narrow output type; the shared [`timed`] wrapper bounds every call with the
//! configured ceiling, records latency, and converts failures into a
//! [`ProviderResult`] carrying the documented default.

pub mod chat;
pub mod geocoding;
pub mod news;
pub mod weather;

pub use chat::{ChatApi, ChatClient};
pub use geocoding::GeocodingClient;
pub use news::NewsClient;
pub use weather::WeatherClient;

use crate::models::ProviderResult;
use std::future::Future;
use std::time::Instant;
use tokio::time::Duration;
use tracing::{info, warn};

/// Run one provider call under the timeout ceiling.
///
/// The call resolves to `Ok(Some(value))` when the expected field was present,
/// `Ok(None)` when upstream answered but the field was absent, and `Err` on
/// transport failure, non-2xx status or a malformed body. A call that outlives
/// the ceiling is abandoned and treated as failed; nothing is retried and no
/// cancellation is sent upstream. The log line is observability only and never
/// affects control flow.
pub async fn timed<T, F>(provider: &str, ceiling: Duration, default: T, call: F) -> ProviderResult<T>
where
    F: Future<Output = anyhow::Result<Option<T>>>,
{
    let start = Instant::now();
    let outcome = tokio::time::timeout(ceiling, call).await;
    let elapsed_ms = start.elapsed().as_millis() as u64;

    match outcome {
        Ok(Ok(Some(value))) => {
            info!(provider, elapsed_ms, outcome = "ok", "provider call finished");
            ProviderResult::ok(value, elapsed_ms)
        }
        Ok(Ok(None)) => {
            info!(
                provider,
                elapsed_ms,
                outcome = "fallback",
                "expected field absent, substituting default"
            );
            ProviderResult::fallback(default, elapsed_ms)
        }
        Ok(Err(error)) => {
            warn!(
                provider,
                elapsed_ms,
                error = %error,
                "provider call failed, substituting default"
            );
            ProviderResult::failed(default, elapsed_ms)
        }
        Err(_) => {
            warn!(
                provider,
                elapsed_ms,
                ceiling_ms = ceiling.as_millis() as u64,
                "provider call timed out, substituting default"
            );
            ProviderResult::failed(default, elapsed_ms)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Outcome;
    use anyhow::anyhow;

    #[tokio::test]
    async fn test_timed_ok_keeps_upstream_value() {
        let result = timed("test", Duration::from_secs(1), "default".to_string(), async {
            Ok(Some("upstream".to_string()))
        })
        .await;
        assert_eq!(result.outcome, Outcome::Ok);
        assert_eq!(result.value, "upstream");
    }

    #[tokio::test]
    async fn test_timed_absent_field_falls_back() {
        let result = timed("test", Duration::from_secs(1), "default".to_string(), async {
            Ok(None)
        })
        .await;
        assert_eq!(result.outcome, Outcome::Fallback);
        assert_eq!(result.value, "default");
    }

    #[tokio::test]
    async fn test_timed_error_substitutes_default() {
        let result = timed("test", Duration::from_secs(1), 7_u32, async {
            Err(anyhow!("connection refused"))
        })
        .await;
        assert_eq!(result.outcome, Outcome::Failed);
        assert_eq!(result.value, 7);
    }

    #[tokio::test]
    async fn test_timed_timeout_substitutes_default() {
        let result = timed("test", Duration::from_millis(10), 7_u32, async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok(Some(42))
        })
        .await;
        assert_eq!(result.outcome, Outcome::Failed);
        assert_eq!(result.value, 7);
    }
}
