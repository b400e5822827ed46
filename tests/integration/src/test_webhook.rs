//! Webhook signature integration tests.

#[cfg(test)]
mod tests {
    use hookguard_auth::sign_payload;

    use crate::{client, now_secs, post_webhook, webhook_secret};

    const EVENT: &str = r#"{"event_id":"evt_01hv8x","event_type":"transaction.completed","occurred_at":"2024-04-12T10:18:49.621022Z","data":{"id":"txn_01hv8w"}}"#;

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_accept_signed_event() {
        let signature = sign_payload(webhook_secret().as_bytes(), now_secs(), EVENT.as_bytes());
        let resp = post_webhook(&client(), Some(&signature), EVENT).await;

        assert_eq!(resp.status(), reqwest::StatusCode::OK);
        assert!(resp.headers().contains_key("x-request-id"));
        let json: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(json["received"], true);
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_unsigned_event() {
        let resp = post_webhook(&client(), None, EVENT).await;
        assert_eq!(resp.status(), reqwest::StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_event_signed_with_other_secret() {
        let signature = sign_payload(b"not-the-secret", now_secs(), EVENT.as_bytes());
        let resp = post_webhook(&client(), Some(&signature), EVENT).await;
        assert_eq!(resp.status(), reqwest::StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_replayed_event() {
        let signature = sign_payload(
            webhook_secret().as_bytes(),
            now_secs() - 10 * 60,
            EVENT.as_bytes(),
        );
        let resp = post_webhook(&client(), Some(&signature), EVENT).await;
        assert_eq!(resp.status(), reqwest::StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_malformed_header() {
        let resp = post_webhook(&client(), Some("garbage"), EVENT).await;
        assert_eq!(resp.status(), reqwest::StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_get_on_webhook_endpoint() {
        let resp = client()
            .get(format!("{}/webhooks/paddle", crate::endpoint_url()))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::METHOD_NOT_ALLOWED);
    }
}
