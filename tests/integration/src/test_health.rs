//! Health endpoint integration tests.

#[cfg(test)]
mod tests {
    use crate::{client, endpoint_url};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_report_running() {
        let resp = client()
            .get(format!("{}/health", endpoint_url()))
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status(), reqwest::StatusCode::OK);
        let json: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(json["status"], "running");
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_not_require_signature_for_health() {
        let resp = client()
            .get(format!("{}/_health", endpoint_url()))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);
    }
}
