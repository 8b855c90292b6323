use crate::workflow::WorkflowBody;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryId(u64);

impl EntryId {
    pub fn value(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    UserInput,
    AssistantReply,
    WorkflowResult,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub id: EntryId,
    pub kind: EntryKind,
    pub content: String,
    pub workflow: Option<WorkflowBody>,
    pub workflow_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

// Append-only: entries are never reordered, edited or removed.
#[derive(Debug, Default)]
pub struct Transcript {
    entries: Vec<Entry>,
    next_id: u64,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push(
        &mut self,
        kind: EntryKind,
        content: String,
        workflow: Option<WorkflowBody>,
        workflow_id: Option<String>,
    ) -> EntryId {
        self.next_id += 1;
        let id = EntryId(self.next_id);
        self.entries.push(Entry {
            id,
            kind,
            content,
            workflow,
            workflow_id,
            created_at: Utc::now(),
        });
        id
    }

    pub fn push_user(&mut self, content: impl Into<String>) -> EntryId {
        self.push(EntryKind::UserInput, content.into(), None, None)
    }

    pub fn push_assistant(
        &mut self,
        content: impl Into<String>,
        workflow: Option<WorkflowBody>,
    ) -> EntryId {
        self.push(EntryKind::AssistantReply, content.into(), workflow, None)
    }

    pub fn push_workflow(
        &mut self,
        explanation: impl Into<String>,
        workflow: WorkflowBody,
        workflow_id: impl Into<String>,
    ) -> EntryId {
        self.push(
            EntryKind::WorkflowResult,
            explanation.into(),
            Some(workflow),
            Some(workflow_id.into()),
        )
    }

    pub fn push_error(&mut self, content: impl Into<String>) -> EntryId {
        self.push(EntryKind::Error, content.into(), None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::{EntryKind, Transcript};
    use crate::workflow::WorkflowBody;

    #[test]
    fn ids_strictly_increase_in_append_order() {
        let mut transcript = Transcript::new();
        let first = transcript.push_user("hello");
        let second = transcript.push_error("boom");
        let third = transcript.push_assistant("hi", None);

        assert!(first < second && second < third);
        let ids: Vec<u64> = transcript.entries().iter().map(|e| e.id.value()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn workflow_entry_carries_payload_and_backend_id() {
        let mut transcript = Transcript::new();
        transcript.push_workflow(
            "Done",
            WorkflowBody {
                name: Some("CSV Export".to_string()),
                ..Default::default()
            },
            "w1",
        );

        let entry = transcript.entries().last().expect("entry should be appended");
        assert_eq!(entry.kind, EntryKind::WorkflowResult);
        assert_eq!(entry.content, "Done");
        assert_eq!(entry.workflow_id.as_deref(), Some("w1"));
        assert!(entry.workflow.is_some());
    }

    #[test]
    fn user_and_error_entries_have_no_payload() {
        let mut transcript = Transcript::new();
        transcript.push_user("make me a workflow");
        transcript.push_error("nope");

        assert!(transcript.entries().iter().all(|e| e.workflow.is_none()));
        assert_eq!(transcript.len(), 2);
        assert!(transcript.entries()[0].created_at <= transcript.entries()[1].created_at);
    }
}
