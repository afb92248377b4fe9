use std::time::Duration;

use rand::Rng;
use reqwest::{RequestBuilder, Response};
use trendstitch_core::StitchError;

use crate::config::RetryConfig;
use crate::error::{is_retryable_status, is_retryable_transport, map_http_err, status_err};

/// Add up to `jitter_percent` of `base_ms` as random jitter.
pub fn jitter_wait(base_ms: u64, jitter_percent: u8) -> u64 {
    let jitter_range = if jitter_percent == 0 {
        1
    } else {
        std::cmp::max(1, (base_ms.saturating_mul(u64::from(jitter_percent))) / 100)
    };
    let mut rng = rand::rng();
    base_ms + rng.random_range(0..jitter_range)
}

/// Send `req`, retrying transport errors, 429 and 5xx with exponential backoff.
///
/// Other 4xx responses fail immediately. The final error of an exhausted retry budget is
/// returned as-is, so a timeout on the last attempt surfaces as `ProviderTimeout`.
///
/// # Errors
/// `Connector` for failed statuses and transport errors, `ProviderTimeout` for client
/// timeouts, `Data` if the request cannot be replayed.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "trendstitch_http::send_with_retry",
        skip(req, retry),
        fields(max_retries = retry.max_retries),
    )
)]
pub async fn send_with_retry(
    connector: &str,
    capability: &str,
    req: RequestBuilder,
    retry: &RetryConfig,
) -> Result<Response, StitchError> {
    let mut attempt: u32 = 0;
    loop {
        let Some(this_try) = req.try_clone() else {
            return Err(StitchError::Data(format!(
                "{capability} request to {connector} cannot be replayed"
            )));
        };
        let err = match this_try.send().await {
            Ok(resp) if resp.status().is_success() => return Ok(resp),
            Ok(resp) => {
                let status = resp.status();
                let body = resp.text().await.unwrap_or_default();
                let err = status_err(connector, status, &body);
                if !is_retryable_status(status) {
                    return Err(err);
                }
                err
            }
            Err(e) => {
                let err = map_http_err(connector, capability, &e);
                if !is_retryable_transport(&e) {
                    return Err(err);
                }
                err
            }
        };

        if attempt >= retry.max_retries {
            return Err(err);
        }
        let delay = jitter_wait(
            retry.backoff.base_delay_ms(attempt),
            retry.backoff.jitter_percent,
        );
        #[cfg(feature = "tracing")]
        tracing::warn!(attempt, delay_ms = delay, error = %err, "retrying upstream request");
        tokio::time::sleep(Duration::from_millis(delay)).await;
        attempt += 1;
    }
}
