use crate::backend::{
    BackendError, ChatRequest, ChatResponse, GenerateRequest, GenerateResponse, HealthResponse,
    WorkflowBackend,
};
use crate::workflow::WorkflowArtifact;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, BackendError> {
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        Ok(serde_json::from_str(&text)?)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, BackendError> {
        let response = self.client.get(self.url(path)).send().await?;
        Self::decode(response).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, BackendError> {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        Self::decode(response).await
    }
}

#[async_trait]
impl WorkflowBackend for HttpBackend {
    async fn ping(&self) -> Result<HealthResponse, BackendError> {
        self.get("/").await
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, BackendError> {
        self.post("/chat", &request).await
    }

    async fn generate_workflow(
        &self,
        request: GenerateRequest,
    ) -> Result<GenerateResponse, BackendError> {
        self.post("/generate-workflow", &request).await
    }

    async fn list_workflows(
        &self,
        session_id: &str,
    ) -> Result<Vec<WorkflowArtifact>, BackendError> {
        self.get(&format!("/workflows/{session_id}")).await
    }
}
