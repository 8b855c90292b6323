use chrono::Utc;

pub mod transcript;

pub use transcript::{Entry, EntryKind, Transcript};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    session_id: String,
}

impl SessionContext {
    pub fn new() -> Self {
        let suffix: String = uuid::Uuid::new_v4()
            .simple()
            .to_string()
            .chars()
            .take(9)
            .collect();
        Self {
            session_id: format!("session-{}-{suffix}", Utc::now().timestamp_millis()),
        }
    }

    #[cfg(test)]
    pub fn with_id(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}
