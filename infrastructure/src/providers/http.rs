//! Shared HTTP plumbing for the provider adapters
//!
//! Every adapter posts one JSON body and reads one JSON answer. Non-2xx
//! answers are classified here, in one place, so the taxonomy is identical
//! across providers.

use newsroom_application::ports::provider::ProviderError;
use newsroom_domain::core::string::truncate_chars;
use regex::Regex;
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::debug;

/// Error bodies are cut to this many characters
pub const ERROR_BODY_LIMIT: usize = 300;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Structured error codes that mean "out of money"
const BILLING_CODES: &[&str] = &[
    "insufficient_quota",
    "insufficient_balance",
    "insufficient_credits",
    "billing_error",
    "billing_hard_limit_reached",
    "payment_required",
];

static BILLING_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(credit balance|insufficient (funds|credits?|balance|quota)|billing|payment required|exceeded your current quota|out of credits)",
    )
    .ok()
});

/// Shared client for all adapters; per-call deadlines are set by the router
pub fn http_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .user_agent(concat!("newsroom/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Map a non-2xx answer onto the provider error taxonomy.
///
/// Checked in order: 401, billing (402, structured code or vocabulary),
/// 403, 404, 429, 5xx, anything else.
pub fn classify(status: u16, body: &str) -> ProviderError {
    let detail = truncate_chars(body.trim(), ERROR_BODY_LIMIT);
    if status == 401 {
        return ProviderError::Auth(detail);
    }
    if status == 402 || is_billing(body) {
        return ProviderError::Billing(detail);
    }
    match status {
        403 => ProviderError::Auth(detail),
        404 => ProviderError::ModelNotFound(detail),
        429 => ProviderError::RateLimited(detail),
        500..=599 => ProviderError::Overloaded(detail),
        _ => ProviderError::Provider {
            status,
            body: detail,
        },
    }
}

fn is_billing(body: &str) -> bool {
    if let Some(code) = structured_code(body)
        && BILLING_CODES.contains(&code.as_str())
    {
        return true;
    }
    BILLING_PATTERN
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(body))
}

/// `error.code` / `error.type` / `error.status` of a JSON error body
fn structured_code(body: &str) -> Option<String> {
    let json: Value = serde_json::from_str(body).ok()?;
    let error = json.get("error")?;
    ["code", "type", "status"]
        .iter()
        .find_map(|k| error.get(*k).and_then(Value::as_str))
        .map(str::to_lowercase)
}

fn transport(error: reqwest::Error) -> ProviderError {
    if error.is_timeout() {
        ProviderError::Transport(format!("request timed out: {error}"))
    } else {
        ProviderError::Transport(error.to_string())
    }
}

/// Send `body` as JSON and decode a 2xx answer as `T`
pub(crate) async fn send_json<T, B>(builder: RequestBuilder, body: &B) -> Result<T, ProviderError>
where
    T: DeserializeOwned,
    B: Serialize + ?Sized,
{
    let response = builder.json(body).send().await.map_err(transport)?;
    let status = response.status();
    let text = response.text().await.map_err(transport)?;
    if !status.is_success() {
        debug!(status = status.as_u16(), "Provider returned an error status");
        return Err(classify(status.as_u16(), &text));
    }
    serde_json::from_str(&text)
        .map_err(|e| ProviderError::Transport(format!("malformed response body: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert!(matches!(classify(401, "nope"), ProviderError::Auth(_)));
        assert!(matches!(classify(403, "forbidden"), ProviderError::Auth(_)));
        assert!(matches!(classify(404, "no model"), ProviderError::ModelNotFound(_)));
        assert!(matches!(classify(429, "slow down"), ProviderError::RateLimited(_)));
        assert!(matches!(classify(503, "busy"), ProviderError::Overloaded(_)));
        assert!(matches!(classify(529, "overloaded"), ProviderError::Overloaded(_)));
        assert!(matches!(
            classify(418, "teapot"),
            ProviderError::Provider { status: 418, .. }
        ));
    }

    #[test]
    fn test_billing_detection() {
        assert!(matches!(classify(402, ""), ProviderError::Billing(_)));
        assert!(matches!(
            classify(
                400,
                r#"{"type":"error","error":{"type":"invalid_request_error","message":"Your credit balance is too low"}}"#
            ),
            ProviderError::Billing(_)
        ));
        assert!(matches!(
            classify(429, r#"{"error":{"code":"insufficient_quota","message":"x"}}"#),
            ProviderError::Billing(_)
        ));
        // 401 wins over billing vocabulary
        assert!(matches!(
            classify(401, "billing account disabled"),
            ProviderError::Auth(_)
        ));
    }

    #[test]
    fn test_generic_error_body_is_truncated() {
        let body = "x".repeat(1000);
        match classify(400, &body) {
            ProviderError::Provider { body, .. } => {
                assert_eq!(body.chars().count(), ERROR_BODY_LIMIT + 1);
                assert!(body.ends_with('…'));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
