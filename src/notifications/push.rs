/**
 * Push Gateway Client
 *
 * Outbound client for the third-party push gateway. Delivery is a
 * best-effort side effect: the gateway's response is logged and any
 * failure is swallowed, never propagated to the request that triggered
 * the push.
 */

use serde::Serialize;

/// Message body accepted by the push gateway.
#[derive(Debug, Serialize)]
struct PushMessage<'a> {
    to: &'a str,
    sound: &'a str,
    title: &'a str,
    body: &'a str,
}

/// Client for the push gateway.
#[derive(Clone)]
pub struct PushClient {
    http: reqwest::Client,
    gateway_url: String,
}

impl PushClient {
    pub fn new(gateway_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            gateway_url,
        }
    }

    pub fn gateway_url(&self) -> &str {
        &self.gateway_url
    }

    /// Send a push message to a device token.
    ///
    /// Never fails from the caller's perspective; errors and non-success
    /// gateway responses are logged only.
    pub async fn send(&self, expo_token: &str, title: &str, body: &str) {
        let message = PushMessage {
            to: expo_token,
            sound: "default",
            title,
            body,
        };

        match self.http.post(&self.gateway_url).json(&message).send().await {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    tracing::debug!("Push notification accepted by gateway");
                } else {
                    tracing::warn!("Push gateway returned {}", status);
                }
            }
            Err(e) => {
                tracing::warn!("Failed to send push notification: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_send_posts_expected_payload() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/push"))
            .and(body_json(serde_json::json!({
                "to": "ExponentPushToken[abc]",
                "sound": "default",
                "title": "New Follower",
                "body": "Asha started following you",
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = PushClient::new(format!("{}/push", server.uri()));
        client
            .send(
                "ExponentPushToken[abc]",
                "New Follower",
                "Asha started following you",
            )
            .await;
    }

    #[tokio::test]
    async fn test_gateway_failure_is_swallowed() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = PushClient::new(server.uri());
        // Must complete without panicking or surfacing an error.
        client.send("ExponentPushToken[abc]", "title", "body").await;
    }

    #[tokio::test]
    async fn test_unreachable_gateway_is_swallowed() {
        let client = PushClient::new("http://127.0.0.1:1/push".to_string());
        client.send("ExponentPushToken[abc]", "title", "body").await;
    }
}
