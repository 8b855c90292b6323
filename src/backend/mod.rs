//! Contract with the workflow-generation service.

use crate::workflow::{WorkflowArtifact, WorkflowBody};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub mod http;

pub use http::HttpBackend;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("request task aborted: {0}")]
    Aborted(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub message: String,
    pub session_id: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    #[serde(default)]
    pub workflow_json: Option<Value>,
    #[serde(default)]
    pub has_workflow: bool,
}

impl ChatResponse {
    /// The workflow payload, only when flagged and shaped like a workflow body.
    pub fn into_parts(self) -> (String, Option<WorkflowBody>) {
        let workflow = match self.workflow_json {
            Some(value) if self.has_workflow => match serde_json::from_value(value) {
                Ok(body) => Some(body),
                Err(err) => {
                    tracing::warn!(error = %err, "chat workflow payload is not a workflow body");
                    None
                }
            },
            _ => None,
        };
        (self.response, workflow)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateRequest {
    pub description: String,
    pub session_id: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GenerateResponse {
    pub explanation: String,
    pub workflow_json: WorkflowBody,
    pub workflow_id: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HealthResponse {
    pub message: String,
}

#[async_trait]
pub trait WorkflowBackend: Send + Sync {
    /// `GET /`
    async fn ping(&self) -> Result<HealthResponse, BackendError>;

    /// `POST /chat`
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, BackendError>;

    /// `POST /generate-workflow`
    async fn generate_workflow(
        &self,
        request: GenerateRequest,
    ) -> Result<GenerateResponse, BackendError>;

    /// `GET /workflows/{session_id}`
    async fn list_workflows(&self, session_id: &str)
        -> Result<Vec<WorkflowArtifact>, BackendError>;
}

#[cfg(test)]
mod tests {
    use super::{ChatResponse, GenerateResponse};
    use serde_json::json;

    #[test]
    fn chat_response_drops_payload_when_not_flagged() {
        let response: ChatResponse = serde_json::from_value(json!({
            "response": "Tell me more about the trigger.",
            "workflow_json": {},
            "session_id": "session-1-abc",
            "has_workflow": false
        }))
        .expect("chat response should deserialize");

        let (reply, workflow) = response.into_parts();
        assert_eq!(reply, "Tell me more about the trigger.");
        assert!(workflow.is_none());
    }

    #[test]
    fn chat_response_keeps_flagged_payload() {
        let response: ChatResponse = serde_json::from_value(json!({
            "response": "Here you go",
            "workflow_json": {"name": "Backup", "nodes": [{}]},
            "has_workflow": true
        }))
        .expect("chat response should deserialize");

        let (_, workflow) = response.into_parts();
        let workflow = workflow.expect("flagged workflow should be kept");
        assert_eq!(workflow.display_name(), Some("Backup"));
    }

    #[test]
    fn chat_response_tolerates_null_workflow() {
        let response: ChatResponse = serde_json::from_value(json!({
            "response": "ok",
            "workflow_json": null,
            "has_workflow": false
        }))
        .expect("null workflow should deserialize");
        assert!(response.workflow_json.is_none());
    }

    #[test]
    fn chat_response_with_array_payload_keeps_reply_text() {
        let response: ChatResponse = serde_json::from_value(json!({
            "response": "x",
            "workflow_json": [{}],
            "has_workflow": true
        }))
        .expect("array payload should still deserialize");

        let (reply, workflow) = response.into_parts();
        assert_eq!(reply, "x");
        assert!(workflow.is_none());
    }

    #[test]
    fn chat_response_with_mistyped_fields_drops_payload() {
        let response: ChatResponse = serde_json::from_value(json!({
            "response": "here",
            "workflow_json": {"name": {"first": "x"}, "nodes": {"a": 1}},
            "has_workflow": true
        }))
        .expect("mistyped payload should still deserialize");

        let (reply, workflow) = response.into_parts();
        assert_eq!(reply, "here");
        assert!(workflow.is_none());
    }

    #[test]
    fn generate_response_requires_workflow_id() {
        let missing = serde_json::from_value::<GenerateResponse>(json!({
            "explanation": "Done",
            "workflow_json": {"nodes": []}
        }));
        assert!(missing.is_err());
    }
}
