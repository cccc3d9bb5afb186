use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{ensure_success, read_json, HttpApi, Result};
use crate::domain::post::PostId;

#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    query: &'a str,
    top_k: usize,
}

/// Answer of the retrieval-augmented assistant
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Answer {
    pub answer: String,
    /// Seconds spent answering
    #[serde(default)]
    pub processing_time: f64,
}

#[derive(Debug, Serialize)]
struct PromptRequest<'a> {
    user_input: &'a str,
}

#[derive(Debug, Deserialize)]
struct PromptResponse {
    image_url: String,
}

/// Client of the assistant services: question answering, image generation and indexing
#[derive(Debug, Clone)]
pub struct AssistantClient {
    api: HttpApi,
}

impl AssistantClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            api: HttpApi::new(base_url, timeout)?,
        })
    }

    /// `POST /query`
    pub async fn ask(&self, query: &str, top_k: usize) -> Result<Answer> {
        let response = self
            .api
            .http
            .post(self.api.url("query")?)
            .json(&QueryRequest { query, top_k })
            .send()
            .await?;
        read_json(response).await
    }

    /// `POST /generate`, returning the URL of the generated image
    pub async fn generate_image(&self, prompt: &str) -> Result<String> {
        let response = self
            .api
            .http
            .post(self.api.url("generate")?)
            .json(&PromptRequest { user_input: prompt })
            .send()
            .await?;
        let generated: PromptResponse = read_json(response).await?;
        Ok(generated.image_url)
    }

    /// `DELETE /delete-blog/{id}`: drop a deleted post from the search index
    pub async fn deindex_post(&self, id: PostId) -> Result<()> {
        let response = self
            .api
            .http
            .delete(self.api.url(&format!("delete-blog/{id}"))?)
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::{
        matchers::{body_json, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    use super::*;
    use crate::infrastructure::api::ApiError;

    async fn client(server: &MockServer) -> AssistantClient {
        AssistantClient::new(&server.uri(), Duration::from_secs(5)).expect("valid mock server url")
    }

    #[tokio::test]
    async fn test_ask() -> Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/query"))
            .and(body_json(json!({"query": "what is rust?", "top_k": 3})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "query": "what is rust?",
                "answer": "A language.",
                "processing_time": 1.25,
            })))
            .expect(1)
            .mount(&server)
            .await;

        let answer = client(&server).await.ask("what is rust?", 3).await?;
        assert_eq!(
            answer,
            Answer {
                answer: "A language.".into(),
                processing_time: 1.25,
            }
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_ask_service_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/query"))
            .respond_with(
                ResponseTemplate::new(503)
                    .set_body_json(json!({"detail": "Services not initialized"})),
            )
            .mount(&server)
            .await;

        let error = client(&server)
            .await
            .ask("q", 3)
            .await
            .expect_err("503 is an error");
        assert!(matches!(error, ApiError::Status { .. }));
        assert_eq!(error.to_string(), "Services not initialized");
    }

    #[tokio::test]
    async fn test_generate_image() -> Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/generate"))
            .and(body_json(json!({"user_input": "a cat"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "summary": "cat",
                "image_file": "https://img.example/cat.png",
                "image_url": "https://img.example/cat.png",
            })))
            .mount(&server)
            .await;

        let url = client(&server).await.generate_image("a cat").await?;
        assert_eq!(url, "https://img.example/cat.png");
        Ok(())
    }

    #[tokio::test]
    async fn test_deindex_post() -> Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/delete-blog/9"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
            .expect(1)
            .mount(&server)
            .await;

        client(&server).await.deindex_post(PostId(9)).await
    }
}
