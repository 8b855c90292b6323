use crate::backend::{BackendError, ChatResponse, GenerateResponse, HealthResponse};
use crate::workflow::WorkflowArtifact;

#[derive(Debug)]
pub enum ControllerEvent {
    ChatSettled(Result<ChatResponse, BackendError>),
    GenerateSettled(Result<GenerateResponse, BackendError>),
    WorkflowsLoaded(Result<Vec<WorkflowArtifact>, BackendError>),
    BackendProbed(Result<HealthResponse, BackendError>),
}
