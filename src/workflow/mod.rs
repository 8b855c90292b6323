use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub mod export;

pub const DEFAULT_WORKFLOW_NAME: &str = "workflow";

// Keys other than `name` and `nodes` keep their values but are re-serialized
// in sorted order after them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WorkflowBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub nodes: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WorkflowBody {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn display_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowArtifact {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub ai_model_used: String,
    pub workflow_json: WorkflowBody,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::{WorkflowArtifact, WorkflowBody};
    use serde_json::json;

    #[test]
    fn body_keeps_unknown_keys_alongside_nodes() {
        let body: WorkflowBody = serde_json::from_value(json!({
            "name": "Backup",
            "nodes": [{"type": "n8n-nodes-base.start"}, {"type": "n8n-nodes-base.s3"}],
            "connections": {"Start": {"main": []}},
            "active": false
        }))
        .expect("body should deserialize");

        assert_eq!(body.display_name(), Some("Backup"));
        assert_eq!(body.node_count(), 2);
        assert!(body.extra.contains_key("connections"));
        assert_eq!(body.extra.get("active"), Some(&json!(false)));
    }

    #[test]
    fn body_without_nodes_defaults_to_empty_list() {
        let body: WorkflowBody =
            serde_json::from_value(json!({})).expect("empty object should deserialize");
        assert_eq!(body, WorkflowBody::default());
        assert_eq!(body.node_count(), 0);
        assert_eq!(body.display_name(), None);
    }

    #[test]
    fn blank_name_has_no_display_name() {
        let body = WorkflowBody {
            name: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(body.display_name(), None);
    }

    #[test]
    fn artifact_parses_listing_entry_with_extra_backend_fields() {
        let artifact: WorkflowArtifact = serde_json::from_value(json!({
            "id": "3f1c",
            "user_id": "demo-user",
            "session_id": "session-1-abc",
            "name": "CSV Export",
            "description": "daily CSV export",
            "workflow_json": {"name": "CSV Export", "nodes": [{}, {}]},
            "ai_model_used": "gemini-2.0-flash",
            "status": "generated",
            "created_at": "2026-10-18T08:59:00.123456"
        }))
        .expect("listing entry should deserialize");

        assert_eq!(artifact.status, "generated");
        assert_eq!(artifact.workflow_json.node_count(), 2);
        assert_eq!(artifact.session_id.as_deref(), Some("session-1-abc"));
    }
}
