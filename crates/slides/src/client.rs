use crate::error::SlidesError;
use deckbot_core::AppConfig;
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use tracing::{debug, info};

/// Opaque presentation identifier assigned by SlidesGPT.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobId(String);

impl JobId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug)]
pub enum Download {
    Ready(Vec<u8>),
    /// The API knows the job but the file is not there yet (HTTP 202 or 404).
    Pending,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    prompt: &'a str,
    format: &'a str,
}

#[derive(Clone)]
pub struct SlidesClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl SlidesClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.api_url, &config.api_key)
    }

    /// `base_url` with `segments` appended, each one percent-encoded as a single path segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, SlidesError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| SlidesError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| SlidesError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Submits a generation job. Never retried: a second POST would start a second deck.
    pub async fn generate(&self, prompt: &str, format: &str) -> Result<JobId, SlidesError> {
        info!("📡 SlidesGPT: submitting {} job for prompt: {}", format, prompt);

        let res = self
            .client
            .post(self.endpoint(&["presentations", "generate"])?)
            .bearer_auth(&self.api_key)
            .json(&GenerateRequest { prompt, format })
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;
        let json: Value = serde_json::from_str(&body)?;

        let id = match json.get("id") {
            Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
            Some(Value::Number(n)) => n.to_string(),
            _ => {
                debug!("SlidesGPT response without id: {}", body);
                return Err(SlidesError::MissingId { status: status.as_u16() });
            }
        };

        info!("✅ SlidesGPT: job {} accepted", id);
        Ok(JobId(id))
    }

    /// Fetches the finished file for `job`, or reports that it is still being rendered.
    pub async fn download(&self, job: &JobId) -> Result<Download, SlidesError> {
        let res = self
            .client
            .get(self.endpoint(&["presentations", job.as_str(), "download"])?)
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        match res.status() {
            StatusCode::OK => {
                let bytes = res.bytes().await?;
                info!("📥 SlidesGPT: downloaded {} ({} bytes)", job, bytes.len());
                Ok(Download::Ready(bytes.to_vec()))
            }
            StatusCode::ACCEPTED | StatusCode::NOT_FOUND => Ok(Download::Pending),
            other => Err(SlidesError::Status(other.as_u16())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn generate_posts_prompt_with_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/presentations/generate"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_json(json!({ "prompt": "AI in schools", "format": "pptx" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "job-1" })))
            .expect(1)
            .mount(&server)
            .await;

        let client = SlidesClient::new(&format!("{}/", server.uri()), "sk-test");
        let job = client.generate("AI in schools", "pptx").await.unwrap();

        assert_eq!(job, JobId::from("job-1"));
    }

    #[tokio::test]
    async fn numeric_ids_are_accepted() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 981 })))
            .mount(&server)
            .await;

        let job = SlidesClient::new(&server.uri(), "k").generate("x", "pptx").await.unwrap();
        assert_eq!(job.as_str(), "981");
    }

    #[tokio::test]
    async fn response_without_id_is_missing_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(402).set_body_json(json!({ "error": "no credits" })))
            .mount(&server)
            .await;

        let err = SlidesClient::new(&server.uri(), "k").generate("x", "pptx").await.unwrap_err();
        assert!(matches!(err, SlidesError::MissingId { status: 402 }));
    }

    #[tokio::test]
    async fn non_json_body_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad gateway</html>"))
            .mount(&server)
            .await;

        let err = SlidesClient::new(&server.uri(), "k").generate("x", "pptx").await.unwrap_err();
        assert!(matches!(err, SlidesError::Decode(_)));
    }

    #[tokio::test]
    async fn download_distinguishes_ready_pending_and_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/presentations/ready/download"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"PK\x03\x04".to_vec()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/presentations/rendering/download"))
            .respond_with(ResponseTemplate::new(202))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/presentations/broken/download"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = SlidesClient::new(&server.uri(), "k");

        match client.download(&JobId::from("ready")).await.unwrap() {
            Download::Ready(bytes) => assert_eq!(bytes, b"PK\x03\x04"),
            Download::Pending => panic!("expected a ready download"),
        }
        assert!(matches!(client.download(&JobId::from("rendering")).await.unwrap(), Download::Pending));
        assert!(matches!(
            client.download(&JobId::from("broken")).await.unwrap_err(),
            SlidesError::Status(500)
        ));
    }

    #[tokio::test]
    async fn job_ids_are_encoded_as_one_path_segment() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/presentations/a%2Fb%3Fc%23d/download"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"deck".to_vec()))
            .expect(1)
            .mount(&server)
            .await;

        let client = SlidesClient::new(&format!("{}/v1", server.uri()), "k");
        let download = client.download(&JobId::from("a/b?c#d")).await.unwrap();

        assert!(matches!(download, Download::Ready(_)));
    }

    #[tokio::test]
    async fn unusable_base_url_is_reported() {
        let err = SlidesClient::new("not a url", "k").generate("x", "pptx").await.unwrap_err();
        assert!(matches!(err, SlidesError::InvalidUrl(_)));
    }
}
