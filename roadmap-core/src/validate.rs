//! Structural and referential validation of a roadmap
//!
//! Validation never fails: every problem is collected as a [`FieldError`]
//! carrying the path of the offending field. Checks run in a fixed order
//! (root fields, items, item dependencies, areas, phases, item area/phase
//! references, sections) and consumers may rely on that order.

use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

use log::debug;
use regex::Regex;
use thiserror::Error;

use crate::changelog::{ChangeTypeRegistry, ChangeTypes};
use crate::models::{ContentBlock, ContentType, Roadmap, Status, SCHEMA_VERSION};

const MISSING: &str = "required field is missing";

static QUARTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Q[1-4] [0-9]{4}$").unwrap());

/// Classifies a validation problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldErrorKind {
    MissingRequiredField,
    UnsupportedVersion,
    DuplicateId,
    InvalidStatus,
    InvalidFormat,
    InvalidChangeType,
    UnknownReference,
    UnknownContentType,
    /// A content block lacks the payload its type requires
    MissingContent,
}

/// A single validation problem
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct FieldError {
    /// Field path, e.g. `items[2].content[0].headers`
    pub field: String,
    pub kind: FieldErrorKind,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, kind: FieldErrorKind, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind,
            message: message.into(),
        }
    }

    fn missing(field: impl Into<String>) -> Self {
        Self::new(field, FieldErrorKind::MissingRequiredField, MISSING)
    }
}

/// Outcome of validating a roadmap
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    /// True iff `errors` is empty
    pub valid: bool,
    pub errors: Vec<FieldError>,
}

impl ValidationResult {
    fn new() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
        }
    }

    fn push(&mut self, error: FieldError) {
        self.errors.push(error);
        self.valid = false;
    }

    /// Errors of the given kind, in report order
    pub fn errors_of(&self, kind: FieldErrorKind) -> impl Iterator<Item = &FieldError> {
        self.errors.iter().filter(move |e| e.kind == kind)
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.valid {
            return write!(f, "valid");
        }
        writeln!(f, "{} validation error(s):", self.errors.len())?;
        for error in &self.errors {
            writeln!(f, "  {}", error)?;
        }
        Ok(())
    }
}

/// Validates a roadmap against the built-in change-type registry
pub fn validate(roadmap: &Roadmap) -> ValidationResult {
    validate_with(roadmap, &ChangeTypes::default())
}

/// Validates a roadmap, checking item types against `registry`
pub fn validate_with(roadmap: &Roadmap, registry: &dyn ChangeTypeRegistry) -> ValidationResult {
    let mut result = ValidationResult::new();

    check_root(roadmap, &mut result);
    let item_ids = check_items(roadmap, registry, &mut result);
    check_dependencies(roadmap, &item_ids, &mut result);
    let area_ids = check_areas(roadmap, &mut result);
    let phase_ids = check_phases(roadmap, &mut result);
    check_item_references(roadmap, &area_ids, &phase_ids, &mut result);
    check_sections(roadmap, &mut result);

    debug!(
        "validated roadmap {:?}: {} error(s)",
        roadmap.project,
        result.errors.len()
    );
    result
}

fn check_root(roadmap: &Roadmap, result: &mut ValidationResult) {
    if roadmap.ir_version.is_empty() {
        result.push(FieldError::missing("ir_version"));
    } else if roadmap.ir_version != SCHEMA_VERSION {
        result.push(FieldError::new(
            "ir_version",
            FieldErrorKind::UnsupportedVersion,
            format!("unsupported version: {}", roadmap.ir_version),
        ));
    }

    if roadmap.project.is_empty() {
        result.push(FieldError::missing("project"));
    }
}

/// Records `id` in `seen`, reporting a missing or duplicate id
fn check_unique_id<'a>(
    id: &'a str,
    prefix: &str,
    seen: &mut HashSet<&'a str>,
    result: &mut ValidationResult,
) {
    if id.is_empty() {
        result.push(FieldError::missing(format!("{}.id", prefix)));
    } else if !seen.insert(id) {
        result.push(FieldError::new(
            format!("{}.id", prefix),
            FieldErrorKind::DuplicateId,
            format!("duplicate ID: {}", id),
        ));
    }
}

fn check_status(status: &Status, field: String, result: &mut ValidationResult) {
    if !status.is_known() {
        result.push(FieldError::new(
            field,
            FieldErrorKind::InvalidStatus,
            format!("invalid status: {}", status),
        ));
    }
}

fn check_items<'a>(
    roadmap: &'a Roadmap,
    registry: &dyn ChangeTypeRegistry,
    result: &mut ValidationResult,
) -> HashSet<&'a str> {
    let mut ids = HashSet::new();

    for (i, item) in roadmap.items.iter().enumerate() {
        let prefix = format!("items[{}]", i);

        check_unique_id(&item.id, &prefix, &mut ids, result);

        if item.title.is_empty() {
            result.push(FieldError::missing(format!("{}.title", prefix)));
        }

        if item.status.is_empty() {
            result.push(FieldError::missing(format!("{}.status", prefix)));
        } else {
            check_status(&item.status, format!("{}.status", prefix), result);
        }

        if let Some(quarter) = item.target_quarter() {
            if !QUARTER_RE.is_match(quarter) {
                result.push(FieldError::new(
                    format!("{}.target_quarter", prefix),
                    FieldErrorKind::InvalidFormat,
                    format!("invalid format: {} (expected 'Q1 2026')", quarter),
                ));
            }
        }

        if let Some(change_type) = item.change_type() {
            if !registry.is_valid_name(change_type) {
                result.push(FieldError::new(
                    format!("{}.type", prefix),
                    FieldErrorKind::InvalidChangeType,
                    format!(
                        "invalid change type: {} (see structured-changelog for valid types)",
                        change_type
                    ),
                ));
            }
        }

        for (j, task) in item.tasks.iter().enumerate() {
            if task.description.is_empty() {
                result.push(FieldError::missing(format!(
                    "{}.tasks[{}].description",
                    prefix, j
                )));
            }
        }

        check_content(&item.content, &prefix, result);
    }

    ids
}

// Runs after every item id is known, so forward references resolve.
fn check_dependencies(roadmap: &Roadmap, item_ids: &HashSet<&str>, result: &mut ValidationResult) {
    for (i, item) in roadmap.items.iter().enumerate() {
        for dep in &item.depends_on {
            if !item_ids.contains(dep.as_str()) {
                result.push(FieldError::new(
                    format!("items[{}].depends_on", i),
                    FieldErrorKind::UnknownReference,
                    format!("references unknown item: {}", dep),
                ));
            }
        }
    }
}

fn check_areas<'a>(roadmap: &'a Roadmap, result: &mut ValidationResult) -> HashSet<&'a str> {
    let mut ids = HashSet::new();
    for (i, area) in roadmap.areas.iter().enumerate() {
        let prefix = format!("areas[{}]", i);
        check_unique_id(&area.id, &prefix, &mut ids, result);
        if area.name.is_empty() {
            result.push(FieldError::missing(format!("{}.name", prefix)));
        }
    }
    ids
}

fn check_phases<'a>(roadmap: &'a Roadmap, result: &mut ValidationResult) -> HashSet<&'a str> {
    let mut ids = HashSet::new();
    for (i, phase) in roadmap.phases.iter().enumerate() {
        let prefix = format!("phases[{}]", i);
        check_unique_id(&phase.id, &prefix, &mut ids, result);
        if phase.name.is_empty() {
            result.push(FieldError::missing(format!("{}.name", prefix)));
        }
        if let Some(status) = phase.status.as_ref().filter(|s| !s.is_empty()) {
            check_status(status, format!("{}.status", prefix), result);
        }
    }
    ids
}

// An empty areas/phases collection disables the corresponding check.
fn check_item_references(
    roadmap: &Roadmap,
    area_ids: &HashSet<&str>,
    phase_ids: &HashSet<&str>,
    result: &mut ValidationResult,
) {
    for (i, item) in roadmap.items.iter().enumerate() {
        if let Some(area) = item.area() {
            if !roadmap.areas.is_empty() && !area_ids.contains(area) {
                result.push(FieldError::new(
                    format!("items[{}].area", i),
                    FieldErrorKind::UnknownReference,
                    format!("references unknown area: {}", area),
                ));
            }
        }
        if let Some(phase) = item.phase() {
            if !roadmap.phases.is_empty() && !phase_ids.contains(phase) {
                result.push(FieldError::new(
                    format!("items[{}].phase", i),
                    FieldErrorKind::UnknownReference,
                    format!("references unknown phase: {}", phase),
                ));
            }
        }
    }
}

fn check_sections(roadmap: &Roadmap, result: &mut ValidationResult) {
    let mut ids = HashSet::new();
    for (i, section) in roadmap.sections.iter().enumerate() {
        let prefix = format!("sections[{}]", i);
        check_unique_id(&section.id, &prefix, &mut ids, result);
        if section.title.is_empty() {
            result.push(FieldError::missing(format!("{}.title", prefix)));
        }
        check_content(&section.content, &prefix, result);
    }
}

fn check_content(blocks: &[ContentBlock], prefix: &str, result: &mut ValidationResult) {
    for (j, block) in blocks.iter().enumerate() {
        let block_prefix = format!("{}.content[{}]", prefix, j);
        if let Some(error) = check_content_block(block, &block_prefix) {
            result.push(error);
        }
    }
}

/// Checks the payload a content block's type requires; at most one error
/// per block
pub fn check_content_block(block: &ContentBlock, prefix: &str) -> Option<FieldError> {
    let required = |field: &str| {
        Some(FieldError::new(
            format!("{}.{}", prefix, field),
            FieldErrorKind::MissingContent,
            format!("required for type {}", block.content_type),
        ))
    };

    match &block.content_type {
        ContentType::Text | ContentType::Code | ContentType::Diagram | ContentType::Blockquote => {
            if block.value().is_none() {
                return required("value");
            }
        }
        ContentType::Table => {
            if block.headers.is_empty() {
                return required("headers");
            }
        }
        ContentType::List => {
            if block.items.is_empty() {
                return required("items");
            }
        }
        ContentType::Other(name) if name.is_empty() => {
            return Some(FieldError::missing(format!("{}.type", prefix)));
        }
        ContentType::Other(name) => {
            return Some(FieldError::new(
                format!("{}.type", prefix),
                FieldErrorKind::UnknownContentType,
                format!("unknown type: {}", name),
            ));
        }
    }
    None
}
