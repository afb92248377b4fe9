use reqwest::StatusCode;
use trendstitch_core::StitchError;

/// Normalize a `reqwest` failure into the workspace error type.
///
/// Client-side timeouts become `ProviderTimeout`; body decoding failures become `Data`;
/// everything else is a `Connector` error tagged with `connector`.
pub fn map_http_err(connector: &str, capability: &str, e: &reqwest::Error) -> StitchError {
    if e.is_timeout() {
        return StitchError::provider_timeout(connector, capability);
    }
    if e.is_decode() {
        return StitchError::Data(format!("{connector} sent an undecodable {capability} body: {e}"));
    }
    if let Some(status) = e.status() {
        return status_err(connector, status, &e.to_string());
    }
    StitchError::connector(connector, e.to_string())
}

/// Error for a non-success HTTP status.
pub fn status_err(connector: &str, status: StatusCode, body: &str) -> StitchError {
    let snippet: String = body.chars().take(200).collect();
    StitchError::connector(
        connector,
        format!("http status {}: {}", status.as_u16(), snippet.trim()),
    )
}

/// Whether a response status is worth another attempt.
pub(crate) fn is_retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// Whether a transport error is worth another attempt.
pub(crate) fn is_retryable_transport(e: &reqwest::Error) -> bool {
    e.is_timeout() || e.is_connect() || e.is_request()
}
