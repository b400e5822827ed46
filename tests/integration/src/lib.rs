//! Integration tests for HookGuard server.
//!
//! These tests require a running HookGuard server at `localhost:8080`
//! started with `WEBHOOK_SECRET` matching [`webhook_secret`].
//! They are marked `#[ignore]` so they don't run during normal `cargo test`.
//!
//! Run them with:
//! ```text
//! WEBHOOK_SECRET=integration-secret cargo run -p hookguard-server &
//! cargo test -p hookguard-integration -- --ignored
//! ```

use std::sync::Once;

mod test_health;
mod test_webhook;

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Base URL of the server under test.
#[must_use]
pub fn endpoint_url() -> String {
    std::env::var("HOOKGUARD_ENDPOINT_URL").unwrap_or_else(|_| "http://localhost:8080".to_owned())
}

/// Secret the server under test was started with.
#[must_use]
pub fn webhook_secret() -> String {
    std::env::var("WEBHOOK_SECRET").unwrap_or_else(|_| "integration-secret".to_owned())
}

/// Create an HTTP client for the server.
#[must_use]
pub fn client() -> reqwest::Client {
    init_tracing();
    reqwest::Client::new()
}

/// Current Unix time in seconds.
#[must_use]
pub fn now_secs() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp()).expect("clock is after the epoch")
}

/// POST `body` to the webhook endpoint with the given signature header.
pub async fn post_webhook(
    client: &reqwest::Client,
    signature: Option<&str>,
    body: &'static str,
) -> reqwest::Response {
    let mut request = client
        .post(format!("{}/webhooks/paddle", endpoint_url()))
        .header("content-type", "application/json")
        .body(body);
    if let Some(signature) = signature {
        request = request.header("Paddle-Signature", signature);
    }
    request.send().await.expect("request should reach the server")
}
