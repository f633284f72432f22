//! Reading and writing roadmap documents
//!
//! JSON is the canonical form (2-space indentation). YAML documents with the
//! same field names are accepted as well; file operations pick the format
//! from the file extension.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::debug;
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::models::Roadmap;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised while reading, parsing or writing a roadmap document
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("failed to read roadmap file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse roadmap{}: {source}", in_path(.path))]
    Parse {
        path: Option<PathBuf>,
        #[source]
        source: BoxError,
    },

    #[error("failed to write roadmap: {source}")]
    Write {
        #[source]
        source: BoxError,
    },
}

/// Discriminates codec failures without looking at messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecErrorKind {
    Read,
    Parse,
    Write,
}

impl CodecError {
    pub fn kind(&self) -> CodecErrorKind {
        match self {
            CodecError::Read { .. } => CodecErrorKind::Read,
            CodecError::Parse { .. } => CodecErrorKind::Parse,
            CodecError::Write { .. } => CodecErrorKind::Write,
        }
    }

    fn parse(source: impl Into<BoxError>) -> Self {
        CodecError::Parse {
            path: None,
            source: source.into(),
        }
    }

    /// Attaches the file a parse failure came from
    fn at_path(self, file: &Path) -> Self {
        match self {
            CodecError::Parse { source, .. } => CodecError::Parse {
                path: Some(file.to_path_buf()),
                source,
            },
            other => other,
        }
    }

    fn write(source: impl Into<BoxError>) -> Self {
        CodecError::Write {
            source: source.into(),
        }
    }
}

fn in_path(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" {}", p.display()))
        .unwrap_or_default()
}

/// Serialization format of a roadmap document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Json,
    Yaml,
}

impl Format {
    /// Infers the format from the file extension, defaulting to JSON
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Format::Yaml,
            _ => Format::Json,
        }
    }
}

/// Parses a JSON document
pub fn decode(data: &[u8]) -> Result<Roadmap, CodecError> {
    decode_as(data, Format::Json)
}

/// Parses a document in the given format
pub fn decode_as(data: &[u8], format: Format) -> Result<Roadmap, CodecError> {
    debug!("decoding {} bytes as {:?}", data.len(), format);
    match format {
        Format::Json => serde_json::from_slice(data).map_err(CodecError::parse),
        Format::Yaml => serde_yaml::from_slice(data).map_err(CodecError::parse),
    }
}

/// Reads and parses a roadmap file
pub fn decode_file<P: AsRef<Path>>(path: P) -> Result<Roadmap, CodecError> {
    let path = path.as_ref();
    let data = fs::read(path).map_err(|source| CodecError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    decode_as(&data, Format::from_path(path)).map_err(|e| e.at_path(path))
}

/// Serializes a roadmap as indented JSON
pub fn encode(roadmap: &Roadmap) -> Result<Vec<u8>, CodecError> {
    encode_as(roadmap, Format::Json)
}

/// Serializes a roadmap in the given format
pub fn encode_as(roadmap: &Roadmap, format: Format) -> Result<Vec<u8>, CodecError> {
    let mut data = match format {
        Format::Json => serde_json::to_vec_pretty(roadmap).map_err(CodecError::write)?,
        Format::Yaml => serde_yaml::to_string(roadmap)
            .map_err(CodecError::write)?
            .into_bytes(),
    };
    if !data.ends_with(b"\n") {
        data.push(b'\n');
    }
    debug!("encoded roadmap {:?} as {:?} ({} bytes)", roadmap.project, format, data.len());
    Ok(data)
}

/// Writes a roadmap to `path`, replacing any existing file
///
/// The document is written to a temporary file next to the target and then
/// renamed over it, so a failed write never leaves a truncated file behind.
/// The file is readable and writable by the owner only.
pub fn encode_to_file<P: AsRef<Path>>(path: P, roadmap: &Roadmap) -> Result<(), CodecError> {
    let path = path.as_ref();
    let data = encode_as(roadmap, Format::from_path(path))?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    // NamedTempFile is created with 0600 permissions on unix
    let mut tmp = NamedTempFile::new_in(dir).map_err(CodecError::write)?;
    tmp.write_all(&data).map_err(CodecError::write)?;
    tmp.as_file().sync_all().map_err(CodecError::write)?;
    tmp.persist(path).map_err(|e| CodecError::write(e.error))?;

    debug!("wrote roadmap to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Area, ContentBlock, Dependencies, ExternalDependency, Item, LegendEntry, Phase, Priority,
        Section, Status, Task, VersionEntry,
    };
    use crate::validate::{validate, FieldErrorKind};
    use chrono::{TimeZone, Utc};
    use tempfile::tempdir;

    fn full_roadmap() -> Roadmap {
        let mut roadmap = Roadmap::new("test-project");
        roadmap.repository = Some("https://github.com/example/test".into());
        roadmap.generated_at = Some(Utc.with_ymd_and_hms(2026, 1, 15, 10, 30, 0).unwrap());
        roadmap
            .legend
            .insert(Status::Completed, LegendEntry::new("✓", "Done"));
        roadmap.areas.push(Area {
            id: "core".into(),
            name: "Core".into(),
            priority: Some(1),
        });
        roadmap.phases.push(Phase {
            id: "phase-1".into(),
            name: "Phase 1".into(),
            status: Some(Status::InProgress),
            order: Some(1),
            description: None,
        });

        let mut item = Item::new("item-1", "Feature 1", Status::Planned);
        item.area = Some("core".into());
        item.phase = Some("phase-1".into());
        item.change_type = Some("Added".into());
        item.priority = Some(Priority::High);
        item.target_quarter = Some("Q2 2026".into());
        item.depends_on = vec!["item-2".into()];
        item.tasks.push(Task {
            id: None,
            description: "Write code".into(),
            completed: true,
            file_path: Some("src/lib.rs".into()),
        });
        item.content.push(ContentBlock::code("rust", "fn main() {}"));
        item.content.push(ContentBlock::table(
            vec!["A".into(), "B".into()],
            vec![vec!["1".into(), "2".into()]],
        ));
        roadmap.items.push(item);
        roadmap
            .items
            .push(Item::new("item-2", "Feature 2", Status::Completed));

        roadmap.sections.push(Section {
            id: "intro".into(),
            title: "Intro".into(),
            order: Some(1),
            content: vec![ContentBlock::text("Hello")],
        });
        roadmap.version_history.push(VersionEntry {
            version: "v0.1.0".into(),
            date: Some("2026-01-01".into()),
            status: Some(Status::Completed),
            summary: None,
        });
        roadmap.dependencies = Some(Dependencies {
            external: vec![ExternalDependency {
                name: "serde".into(),
                status: Some("stable".into()),
                note: None,
            }],
            internal: Vec::new(),
        });
        roadmap
    }

    #[test]
    fn test_decode_minimal() {
        let roadmap = decode(br#"{"ir_version": "1.0", "project": "test-project"}"#).unwrap();
        assert_eq!(roadmap.ir_version, "1.0");
        assert_eq!(roadmap.project, "test-project");
        assert!(roadmap.items.is_empty());
    }

    #[test]
    fn test_decode_items_and_areas() {
        let roadmap = decode(
            br#"{
                "ir_version": "1.0",
                "project": "test-project",
                "areas": [{"id": "core", "name": "Core", "priority": 1}],
                "items": [
                    {"id": "item-1", "title": "Feature 1", "status": "completed"},
                    {"id": "item-2", "title": "Feature 2", "status": "planned"}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(roadmap.areas[0].priority, Some(1));
        assert_eq!(roadmap.items.len(), 2);
        assert_eq!(roadmap.items[1].status, Status::Planned);
    }

    #[test]
    fn test_decode_ignores_unknown_keys() {
        let roadmap =
            decode(br#"{"ir_version": "1.0", "project": "p", "unexpected": {"a": 1}}"#).unwrap();
        assert_eq!(roadmap.project, "p");
    }

    #[test]
    fn test_decode_invalid_json_is_parse_error() {
        let err = decode(b"{invalid}").unwrap_err();
        assert_eq!(err.kind(), CodecErrorKind::Parse);
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_decode_file_malformed_names_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ROADMAP.json");
        fs::write(&path, "{invalid}").unwrap();

        let err = decode_file(&path).unwrap_err();
        assert_eq!(err.kind(), CodecErrorKind::Parse);
        assert!(err.to_string().contains(&*path.to_string_lossy()));
        match err {
            CodecError::Parse { path: Some(p), .. } => assert_eq!(p, path),
            other => panic!("unexpected error: {:?}", other),
        }

        // in-memory input has no path to report
        assert!(matches!(
            decode(b"{invalid}").unwrap_err(),
            CodecError::Parse { path: None, .. }
        ));
    }

    #[test]
    fn test_decode_null_values_reach_validator() {
        let roadmap = decode(
            br#"{
                "ir_version": "1.0",
                "project": "p",
                "items": [
                    {"id": "a", "title": "A", "status": null},
                    {"id": "b", "title": "B", "status": "planned",
                     "content": [{"type": null, "value": "x"}]}
                ]
            }"#,
        )
        .unwrap();

        let result = validate(&roadmap);
        let fields: Vec<&str> = result.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["items[0].status", "items[1].content[0].type"]);
        assert!(result
            .errors
            .iter()
            .all(|e| e.kind == FieldErrorKind::MissingRequiredField));
    }

    #[test]
    fn test_decode_null_collections() {
        let roadmap = decode(
            br#"{"ir_version": "1.0", "project": "p", "legend": null, "items": null, "sections": null}"#,
        )
        .unwrap();
        assert!(roadmap.items.is_empty());
        assert!(roadmap.legend.is_empty());
        assert!(validate(&roadmap).valid);
    }

    #[test]
    fn test_decode_file_missing_is_read_error() {
        let err = decode_file("/nonexistent/file.json").unwrap_err();
        assert_eq!(err.kind(), CodecErrorKind::Read);
        assert!(err.to_string().contains("/nonexistent/file.json"));
    }

    #[test]
    fn test_encode_is_sparse_and_indented() {
        let mut roadmap = Roadmap::new("test-project");
        roadmap
            .items
            .push(Item::new("item-1", "Test Item", Status::Completed));

        let text = String::from_utf8(encode(&roadmap).unwrap()).unwrap();
        assert!(text.starts_with("{\n  \"ir_version\": \"1.0\",\n  \"project\": \"test-project\""));
        assert!(!text.contains("repository"));
        assert!(!text.contains("legend"));
        assert!(!text.contains("depends_on"));
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_json_round_trip() {
        let roadmap = full_roadmap();
        let decoded = decode(&encode(&roadmap).unwrap()).unwrap();
        assert_eq!(decoded, roadmap);
    }

    #[test]
    fn test_yaml_round_trip() {
        let roadmap = full_roadmap();
        let data = encode_as(&roadmap, Format::Yaml).unwrap();
        let decoded = decode_as(&data, Format::Yaml).unwrap();
        assert_eq!(decoded, roadmap);
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(Format::from_path(Path::new("ROADMAP.json")), Format::Json);
        assert_eq!(Format::from_path(Path::new("roadmap.yaml")), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("roadmap.yml")), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("ROADMAP")), Format::Json);
    }

    #[test]
    fn test_write_and_read_file() -> Result<(), CodecError> {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ROADMAP.json");

        encode_to_file(&path, &full_roadmap())?;
        let loaded = decode_file(&path)?;
        assert_eq!(loaded.project, "test-project");
        assert_eq!(loaded.items.len(), 2);

        // overwrite in place
        encode_to_file(&path, &Roadmap::new("other"))?;
        assert_eq!(decode_file(&path)?.project, "other");

        let leftovers = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_written_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("ROADMAP.json");
        encode_to_file(&path, &Roadmap::new("test")).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_write_to_missing_dir_is_write_error() {
        let err = encode_to_file("/nonexistent/dir/ROADMAP.json", &Roadmap::new("test")).unwrap_err();
        assert_eq!(err.kind(), CodecErrorKind::Write);
    }
}
