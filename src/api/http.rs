//! HTTP plumbing shared by the endpoint modules.

use std::time::Duration;

use crate::error::DocentError;

/// Build the reqwest client used for every backend call.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client, DocentError> {
    Ok(reqwest::Client::builder()
        .timeout(timeout)
        .pool_max_idle_per_host(10)
        .build()?)
}

/// Map a non-success HTTP status to an error.
///
/// 401/403 become [`DocentError::Authentication`], which callers escalate to
/// a full session teardown.
pub fn status_to_error(status: u16, body: &str) -> DocentError {
    let message = extract_detail(body).unwrap_or_else(|| body.to_string());
    match status {
        401 | 403 => DocentError::Authentication(message),
        _ => DocentError::api(status, message),
    }
}

/// Pull the `detail` message out of a backend error payload, if present.
fn extract_detail(body: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()?
        .get("detail")?
        .as_str()
        .map(|s| s.to_string())
}
