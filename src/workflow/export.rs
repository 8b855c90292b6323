use crate::workflow::{WorkflowBody, DEFAULT_WORKFLOW_NAME};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to encode workflow: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: String,
    pub contents: String,
}

fn sanitize_file_stem(raw: &str) -> String {
    let stem: String = raw
        .trim()
        .chars()
        .map(|ch| match ch {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            ch if ch.is_control() => '_',
            ch => ch,
        })
        .collect();

    if stem.is_empty() || stem.chars().all(|ch| ch == '.') {
        DEFAULT_WORKFLOW_NAME.to_string()
    } else {
        stem
    }
}

pub fn encode_export(body: &WorkflowBody) -> Result<ExportFile, ExportError> {
    let stem = body
        .display_name()
        .map(sanitize_file_stem)
        .unwrap_or_else(|| DEFAULT_WORKFLOW_NAME.to_string());
    let contents = serde_json::to_string_pretty(body)?;

    Ok(ExportFile {
        file_name: format!("{stem}.json"),
        contents,
    })
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> ExportError {
    let path = path.to_path_buf();
    move |source| ExportError::Io { path, source }
}

pub fn default_export_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

impl ExportFile {
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        fs::create_dir_all(dir).map_err(io_error(dir))?;
        let final_path = dir.join(&self.file_name);
        let tmp_path = dir.join(format!("{}.tmp", self.file_name));

        fs::write(&tmp_path, self.contents.as_bytes()).map_err(io_error(&tmp_path))?;
        match fs::rename(&tmp_path, &final_path) {
            Ok(()) => Ok(final_path),
            Err(rename_err) => {
                if final_path.exists() {
                    fs::remove_file(&final_path).map_err(io_error(&final_path))?;
                    fs::rename(&tmp_path, &final_path).map_err(io_error(&final_path))?;
                    Ok(final_path)
                } else {
                    Err(ExportError::Io {
                        path: final_path,
                        source: rename_err,
                    })
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{encode_export, sanitize_file_stem};
    use crate::workflow::WorkflowBody;
    use serde_json::json;
    use std::fs;

    fn csv_export_body() -> WorkflowBody {
        serde_json::from_value(json!({
            "name": "CSV Export",
            "nodes": [{"name": "Cron"}, {"name": "Email"}],
            "connections": {}
        }))
        .expect("fixture body should deserialize")
    }

    #[test]
    fn encode_uses_workflow_name_for_file_name() {
        let file = encode_export(&csv_export_body()).expect("export should encode");
        assert_eq!(file.file_name, "CSV Export.json");
    }

    #[test]
    fn encode_falls_back_to_default_name() {
        let unnamed = WorkflowBody::default();
        let blank = WorkflowBody {
            name: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(
            encode_export(&unnamed).expect("export should encode").file_name,
            "workflow.json"
        );
        assert_eq!(
            encode_export(&blank).expect("export should encode").file_name,
            "workflow.json"
        );
    }

    #[test]
    fn encode_is_byte_identical_across_calls() {
        let body = csv_export_body();
        let first = encode_export(&body).expect("first export should encode");
        let second = encode_export(&body).expect("second export should encode");
        assert_eq!(first, second);
    }

    #[test]
    fn encode_pretty_prints_with_two_space_indent() {
        let file = encode_export(&csv_export_body()).expect("export should encode");
        assert!(file.contents.starts_with("{\n  \"name\": \"CSV Export\""));

        let parsed: serde_json::Value =
            serde_json::from_str(&file.contents).expect("export should be valid json");
        assert_eq!(parsed["nodes"].as_array().map(Vec::len), Some(2));
        assert!(parsed.get("connections").is_some());
    }

    #[test]
    fn encode_writes_extra_keys_sorted_after_nodes() {
        let body: WorkflowBody = serde_json::from_str(
            r#"{"settings": {}, "nodes": [], "active": false, "name": "Sorted"}"#,
        )
        .expect("body should deserialize");
        let file = encode_export(&body).expect("export should encode");

        let name = file.contents.find("\"name\"").expect("name should be written");
        let nodes = file.contents.find("\"nodes\"").expect("nodes should be written");
        let active = file.contents.find("\"active\"").expect("active should be kept");
        let settings = file.contents.find("\"settings\"").expect("settings should be kept");
        assert!(name < nodes && nodes < active && active < settings);
        assert_eq!(
            encode_export(&body).expect("export should encode").contents,
            file.contents
        );
    }

    #[test]
    fn sanitize_replaces_path_separators() {
        assert_eq!(sanitize_file_stem("daily/backup: S3"), "daily_backup_ S3");
        assert_eq!(sanitize_file_stem(".."), "workflow");
    }

    #[test]
    fn write_to_replaces_existing_export() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let file = encode_export(&csv_export_body()).expect("export should encode");

        let path = file.write_to(dir.path()).expect("first write should succeed");
        let path_again = file.write_to(dir.path()).expect("second write should succeed");
        assert_eq!(path, path_again);

        let written = fs::read_to_string(&path).expect("export should be readable");
        assert_eq!(written, file.contents);
        assert!(!dir.path().join("CSV Export.json.tmp").exists());
    }
}
