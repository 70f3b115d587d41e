use crate::{
    config::{Config, ResponseMode},
    constants::FEEDBACK_PATH,
    errors::{ReviewBotError, ReviewBotResult},
    logging::{log_request, RequestLog},
};
use reqwest::Client;
use serde_json::{json, Value};
use std::time::{Duration, Instant};

/// One entry of a structured reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackEntry {
    pub key: String,
    pub content: String,
}

/// A settled, successful `/feedback` exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackReply {
    File(Vec<u8>),
    Entries(Vec<FeedbackEntry>),
}

/// HTTP client for the review service.
#[derive(Debug, Clone)]
pub struct FeedbackClient {
    http: Client,
    endpoint: String,
    mode: ResponseMode,
}

impl FeedbackClient {
    pub fn new(config: &Config) -> ReviewBotResult<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            http: builder.build()?,
            endpoint: feedback_endpoint(&config.server_url),
            mode: config.response_mode,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn mode(&self) -> ResponseMode {
        self.mode
    }

    /// Posts `{"url": repo_url}` and decodes the reply according to the
    /// configured response mode. Any non-2xx status is an error.
    pub async fn request_feedback(&self, repo_url: &str) -> ReviewBotResult<FeedbackReply> {
        let started = Instant::now();
        let request_log = RequestLog::new(&self.endpoint, format!("url={}", repo_url));

        let result = self.send(repo_url).await;

        let status = match &result {
            Ok((status, _)) => Some(*status),
            Err(e) => e.status(),
        };
        log_request(&request_log.finish(status, started.elapsed()));

        let (_, reply) = result?;
        Ok(reply)
    }

    async fn send(&self, repo_url: &str) -> ReviewBotResult<(u16, FeedbackReply)> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(&json!({ "url": repo_url }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ReviewBotError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let reply = match self.mode {
            ResponseMode::Download => FeedbackReply::File(response.bytes().await?.to_vec()),
            ResponseMode::Structured => {
                let value: Value = response.json().await?;
                FeedbackReply::Entries(parse_entries(value)?)
            }
        };

        Ok((status.as_u16(), reply))
    }
}

fn feedback_endpoint(server_url: &str) -> String {
    format!("{}{}", server_url.trim().trim_end_matches('/'), FEEDBACK_PATH)
}

/// Turns a JSON object into entries, keeping the object's key order.
pub fn parse_entries(value: Value) -> ReviewBotResult<Vec<FeedbackEntry>> {
    let Value::Object(map) = value else {
        return Err(ReviewBotError::api_error(
            "Structured reply must be a JSON object",
        ));
    };

    Ok(map
        .into_iter()
        .map(|(key, value)| {
            let content = match value {
                Value::String(s) => s,
                other => other.to_string(),
            };
            FeedbackEntry { key, content }
        })
        .collect())
}

/// Base URL of a local port with nothing listening on it.
#[cfg(test)]
pub(crate) fn unused_server_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        matchers::{body_json, header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn client_for(server_url: &str, mode: ResponseMode) -> FeedbackClient {
        let config = Config {
            server_url: server_url.to_string(),
            response_mode: mode,
            ..Config::default()
        };
        FeedbackClient::new(&config).unwrap()
    }

    #[test]
    fn test_feedback_endpoint_joins_path() {
        assert_eq!(
            feedback_endpoint("http://localhost:5000/"),
            "http://localhost:5000/feedback"
        );
        assert_eq!(
            feedback_endpoint("http://localhost:5000"),
            "http://localhost:5000/feedback"
        );
    }

    #[test]
    fn test_parse_entries_keeps_key_order() {
        let value: Value = serde_json::from_str(r#"{"b": "y", "a": "x", "n": 3}"#).unwrap();
        let entries = parse_entries(value).unwrap();
        let keys: Vec<&str> = entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["b", "a", "n"]);
        assert_eq!(entries[0].content, "y");
        assert_eq!(entries[2].content, "3");
    }

    #[test]
    fn test_parse_entries_rejects_array() {
        assert!(parse_entries(json!(["x", "y"])).is_err());
    }

    #[tokio::test]
    async fn test_download_reply_returns_body_bytes() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/feedback"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({ "url": "https://github.com/octo/repo" })))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/html")
                    .set_body_bytes(b"<html>review</html>".to_vec()),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server.uri(), ResponseMode::Download);
        let reply = client
            .request_feedback("https://github.com/octo/repo")
            .await
            .unwrap();

        assert_eq!(reply, FeedbackReply::File(b"<html>review</html>".to_vec()));
    }

    #[tokio::test]
    async fn test_url_is_sent_untrimmed() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/feedback"))
            .and(body_json(json!({ "url": "  https://github.com/octo/repo " })))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server.uri(), ResponseMode::Download);
        assert!(client
            .request_feedback("  https://github.com/octo/repo ")
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_structured_reply_returns_entries() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/feedback"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "application/json")
                    .set_body_string(r#"{"a": "x", "b": "y"}"#),
            )
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server.uri(), ResponseMode::Structured);
        let reply = client.request_feedback("https://github.com/a/b").await.unwrap();

        assert_eq!(
            reply,
            FeedbackReply::Entries(vec![
                FeedbackEntry {
                    key: "a".to_string(),
                    content: "x".to_string()
                },
                FeedbackEntry {
                    key: "b".to_string(),
                    content: "y".to_string()
                },
            ])
        );
    }

    #[tokio::test]
    async fn test_non_success_status_is_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/feedback"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(json!({ "message": "Please provide a GitHub repository URL" })),
            )
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server.uri(), ResponseMode::Download);
        let err = client.request_feedback("").await.unwrap_err();

        assert_eq!(err.status(), Some(400));
        assert!(matches!(err, ReviewBotError::Http { .. }));
    }

    #[tokio::test]
    async fn test_connection_failure_is_error() {
        let client = client_for(&unused_server_url(), ResponseMode::Download);
        let err = client
            .request_feedback("https://github.com/a/b")
            .await
            .unwrap_err();

        assert!(matches!(err, ReviewBotError::Transport(_)));
        assert_eq!(err.status(), None);
    }

    #[tokio::test]
    async fn test_timeout_is_transport_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/feedback"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("late")
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&mock_server)
            .await;

        let config = Config {
            server_url: mock_server.uri(),
            request_timeout_secs: Some(1),
            ..Config::default()
        };
        let client = FeedbackClient::new(&config).unwrap();
        let err = client
            .request_feedback("https://github.com/a/b")
            .await
            .unwrap_err();

        match err {
            ReviewBotError::Transport(e) => assert!(e.is_timeout()),
            other => panic!("expected timeout, got {:?}", other),
        }
    }
}
