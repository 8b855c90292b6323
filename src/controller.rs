use crate::backend::{BackendError, ChatRequest, GenerateRequest, WorkflowBackend};
use crate::event::ControllerEvent;
use crate::session::{SessionContext, Transcript};
use crate::workflow::export::{encode_export, ExportError};
use crate::workflow::{WorkflowArtifact, WorkflowBody};
use chrono::Utc;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use tokio::runtime::Handle;

pub const CHAT_ERROR_MESSAGE: &str =
    "Sorry, there was an error processing your request. Please try again.";
pub const GENERATE_ERROR_MESSAGE: &str =
    "Sorry, there was an error generating the workflow. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendStatus {
    Unknown,
    Reachable,
    Unreachable,
}

type Waker = Arc<dyn Fn() + Send + Sync>;

pub struct ConversationController {
    session: SessionContext,
    backend: Arc<dyn WorkflowBackend>,
    runtime: Handle,
    tx: Sender<ControllerEvent>,
    rx: Receiver<ControllerEvent>,
    waker: Option<Waker>,
    transcript: Transcript,
    busy: bool,
    workflows: Vec<WorkflowArtifact>,
    backend_status: BackendStatus,
    export_dir: PathBuf,
    diagnostics_log: Vec<String>,
}

impl ConversationController {
    pub fn new(
        session: SessionContext,
        backend: Arc<dyn WorkflowBackend>,
        runtime: Handle,
        export_dir: PathBuf,
    ) -> Self {
        let (tx, rx) = mpsc::channel();
        tracing::info!(session_id = session.session_id(), "conversation started");
        Self {
            session,
            backend,
            runtime,
            tx,
            rx,
            waker: None,
            transcript: Transcript::new(),
            busy: false,
            workflows: Vec::new(),
            backend_status: BackendStatus::Unknown,
            export_dir,
            diagnostics_log: Vec::new(),
        }
    }

    pub fn set_waker(&mut self, waker: impl Fn() + Send + Sync + 'static) {
        self.waker = Some(Arc::new(waker));
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn workflows(&self) -> &[WorkflowArtifact] {
        &self.workflows
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn backend_status(&self) -> BackendStatus {
        self.backend_status
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    pub fn diagnostics(&self) -> &[String] {
        &self.diagnostics_log
    }

    pub fn log_diagnostic(&mut self, message: impl Into<String>) {
        self.diagnostics_log.push(format!(
            "[{}] {}",
            Utc::now().format("%H:%M:%S"),
            message.into()
        ));
    }

    /// Returns `false` for blank text or while a request is outstanding.
    pub fn submit(&mut self, text: &str) -> bool {
        let message = text.trim();
        if message.is_empty() {
            return false;
        }
        if self.busy {
            tracing::debug!("submit ignored while a request is outstanding");
            return false;
        }

        self.transcript.push_user(text);
        self.busy = true;

        let request = ChatRequest {
            message: message.to_string(),
            session_id: self.session.session_id().to_string(),
        };
        let backend = Arc::clone(&self.backend);
        self.dispatch(
            async move { ControllerEvent::ChatSettled(backend.chat(request).await) },
            |err| ControllerEvent::ChatSettled(Err(err)),
        );
        true
    }

    pub fn generate(&mut self, description: &str) -> bool {
        let trimmed = description.trim();
        if trimmed.is_empty() {
            return false;
        }
        if self.busy {
            tracing::debug!("generate ignored while a request is outstanding");
            return false;
        }

        self.transcript.push_user(description);
        self.busy = true;

        let request = GenerateRequest {
            description: trimmed.to_string(),
            session_id: self.session.session_id().to_string(),
        };
        let backend = Arc::clone(&self.backend);
        self.dispatch(
            async move {
                ControllerEvent::GenerateSettled(backend.generate_workflow(request).await)
            },
            |err| ControllerEvent::GenerateSettled(Err(err)),
        );
        true
    }

    pub fn refresh_workflows(&mut self) {
        let backend = Arc::clone(&self.backend);
        let session_id = self.session.session_id().to_string();
        self.dispatch(
            async move {
                ControllerEvent::WorkflowsLoaded(backend.list_workflows(&session_id).await)
            },
            |err| ControllerEvent::WorkflowsLoaded(Err(err)),
        );
    }

    pub fn probe_backend(&mut self) {
        let backend = Arc::clone(&self.backend);
        self.dispatch(
            async move { ControllerEvent::BackendProbed(backend.ping().await) },
            |err| ControllerEvent::BackendProbed(Err(err)),
        );
    }

    pub fn export(&self, workflow: &WorkflowBody) -> Result<PathBuf, ExportError> {
        let file = encode_export(workflow)?;
        let path = file.write_to(&self.export_dir)?;
        tracing::info!(path = %path.display(), "workflow exported");
        Ok(path)
    }

    pub fn poll_events(&mut self) -> usize {
        let mut applied = 0;
        loop {
            match self.rx.try_recv() {
                Ok(event) => {
                    self.apply_event(event);
                    applied += 1;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.log_diagnostic("event channel disconnected");
                    break;
                }
            }
        }
        applied
    }

    // A request task that dies still reports through `on_abort`.
    fn dispatch<F>(&self, request: F, on_abort: fn(BackendError) -> ControllerEvent)
    where
        F: Future<Output = ControllerEvent> + Send + 'static,
    {
        let tx = self.tx.clone();
        let waker = self.waker.clone();
        let runtime = self.runtime.clone();
        self.runtime.spawn(async move {
            let event = match runtime.spawn(request).await {
                Ok(event) => event,
                Err(err) => on_abort(BackendError::Aborted(err.to_string())),
            };
            if tx.send(event).is_err() {
                tracing::debug!("controller dropped before request settled");
                return;
            }
            if let Some(waker) = waker {
                waker();
            }
        });
    }

    fn apply_event(&mut self, event: ControllerEvent) {
        match event {
            ControllerEvent::ChatSettled(Ok(response)) => {
                let has_workflow = response.has_workflow;
                let (reply, workflow) = response.into_parts();
                self.transcript.push_assistant(reply, workflow);
                if has_workflow {
                    self.refresh_workflows();
                }
                self.busy = false;
            }
            ControllerEvent::ChatSettled(Err(err)) => {
                tracing::error!(error = %err, "chat request failed");
                self.log_diagnostic(format!("chat failed: {err}"));
                self.transcript.push_error(CHAT_ERROR_MESSAGE);
                self.busy = false;
            }
            ControllerEvent::GenerateSettled(Ok(response)) => {
                tracing::info!(workflow_id = %response.workflow_id, "workflow generated");
                self.transcript.push_workflow(
                    response.explanation,
                    response.workflow_json,
                    response.workflow_id,
                );
                self.refresh_workflows();
                self.busy = false;
            }
            ControllerEvent::GenerateSettled(Err(err)) => {
                tracing::error!(error = %err, "workflow generation failed");
                self.log_diagnostic(format!("generation failed: {err}"));
                self.transcript.push_error(GENERATE_ERROR_MESSAGE);
                self.busy = false;
            }
            ControllerEvent::WorkflowsLoaded(Ok(workflows)) => {
                tracing::debug!(count = workflows.len(), "workflow cache refreshed");
                self.workflows = workflows;
            }
            ControllerEvent::WorkflowsLoaded(Err(err)) => {
                tracing::warn!(error = %err, "workflow refresh failed; keeping cached list");
                self.log_diagnostic(format!("workflow refresh failed: {err}"));
            }
            ControllerEvent::BackendProbed(Ok(health)) => {
                self.backend_status = BackendStatus::Reachable;
                self.log_diagnostic(format!("backend reachable: {}", health.message));
            }
            ControllerEvent::BackendProbed(Err(err)) => {
                self.backend_status = BackendStatus::Unreachable;
                tracing::warn!(error = %err, "backend probe failed");
                self.log_diagnostic(format!("backend unreachable: {err}"));
            }
        }
    }
}
