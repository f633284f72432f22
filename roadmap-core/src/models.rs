use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The only `ir_version` this crate understands
pub const SCHEMA_VERSION: &str = "1.0";

/// Represents the status of a roadmap item or phase
///
/// Unrecognized text is kept in `Other` so that decoding never fails on an
/// unexpected value; the validator reports it instead.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    Completed,
    InProgress,
    Planned,
    Future,
    /// Any value outside the four known statuses (including the empty string)
    Other(String),
}

impl Status {
    /// Canonical display order of the known statuses
    pub const ORDER: [Status; 4] = [
        Status::Completed,
        Status::InProgress,
        Status::Planned,
        Status::Future,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Status::Completed => "completed",
            Status::InProgress => "in_progress",
            Status::Planned => "planned",
            Status::Future => "future",
            Status::Other(s) => s,
        }
    }

    /// True for one of the four known statuses
    pub fn is_known(&self) -> bool {
        !matches!(self, Status::Other(_))
    }

    /// True when no status was given at all
    pub fn is_empty(&self) -> bool {
        matches!(self, Status::Other(s) if s.is_empty())
    }
}

impl Default for Status {
    fn default() -> Self {
        Status::Other(String::new())
    }
}

impl From<String> for Status {
    fn from(s: String) -> Self {
        match s.as_str() {
            "completed" => Status::Completed,
            "in_progress" => Status::InProgress,
            "planned" => Status::Planned,
            "future" => Status::Future,
            _ => Status::Other(s),
        }
    }
}

impl From<&str> for Status {
    fn from(s: &str) -> Self {
        Status::from(s.to_string())
    }
}

impl From<Status> for String {
    fn from(status: Status) -> Self {
        match status {
            Status::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Represents the priority of a roadmap item
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
    Other(String),
}

impl Priority {
    /// Canonical display order, highest priority first
    pub const ORDER: [Priority; 4] = [
        Priority::Critical,
        Priority::High,
        Priority::Medium,
        Priority::Low,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Priority::Critical => "critical",
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
            Priority::Other(s) => s,
        }
    }

    /// True when the priority text is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, Priority::Other(s) if s.is_empty())
    }

    /// Sort rank (lower = higher priority); unknown values rank last
    pub fn rank(&self) -> u8 {
        match self {
            Priority::Critical => 1,
            Priority::High => 2,
            Priority::Medium => 3,
            Priority::Low => 4,
            Priority::Other(_) => 5,
        }
    }

    /// Concise label for table cells where the column header gives context
    pub fn label(&self) -> &'static str {
        match self {
            Priority::Critical => "Critical",
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
            Priority::Other(_) => "-",
        }
    }

    /// Full label for section headers and standalone contexts
    pub fn label_full(&self) -> &'static str {
        match self {
            Priority::Critical => "Critical",
            Priority::High => "High Priority",
            Priority::Medium => "Medium Priority",
            Priority::Low => "Low Priority",
            Priority::Other(_) => "Unspecified",
        }
    }
}

impl From<String> for Priority {
    fn from(s: String) -> Self {
        match s.as_str() {
            "critical" => Priority::Critical,
            "high" => Priority::High,
            "medium" => Priority::Medium,
            "low" => Priority::Low,
            _ => Priority::Other(s),
        }
    }
}

impl From<&str> for Priority {
    fn from(s: &str) -> Self {
        Priority::from(s.to_string())
    }
}

impl From<Priority> for String {
    fn from(priority: Priority) -> Self {
        match priority {
            Priority::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Sort rank for an optional priority: 1-4 for the known levels, 5 otherwise
pub fn priority_order(priority: Option<&Priority>) -> u8 {
    priority.map_or(5, Priority::rank)
}

/// Concise label for an optional priority (`-` when unset)
pub fn priority_label(priority: Option<&Priority>) -> &'static str {
    priority.map_or("-", Priority::label)
}

/// Full label for an optional priority (`Unspecified` when unset)
pub fn priority_label_full(priority: Option<&Priority>) -> &'static str {
    priority.map_or("Unspecified", Priority::label_full)
}

/// The kind of a content block
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ContentType {
    Text,
    Code,
    Diagram,
    Table,
    List,
    Blockquote,
    Other(String),
}

impl ContentType {
    pub fn as_str(&self) -> &str {
        match self {
            ContentType::Text => "text",
            ContentType::Code => "code",
            ContentType::Diagram => "diagram",
            ContentType::Table => "table",
            ContentType::List => "list",
            ContentType::Blockquote => "blockquote",
            ContentType::Other(s) => s,
        }
    }
}

impl Default for ContentType {
    fn default() -> Self {
        ContentType::Other(String::new())
    }
}

impl From<String> for ContentType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "text" => ContentType::Text,
            "code" => ContentType::Code,
            "diagram" => ContentType::Diagram,
            "table" => ContentType::Table,
            "list" => ContentType::List,
            "blockquote" => ContentType::Blockquote,
            _ => ContentType::Other(s),
        }
    }
}

impl From<&str> for ContentType {
    fn from(s: &str) -> Self {
        ContentType::from(s.to_string())
    }
}

impl From<ContentType> for String {
    fn from(content_type: ContentType) -> Self {
        match content_type {
            ContentType::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Emoji and description shown for a status
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendEntry {
    #[serde(default, deserialize_with = "null_as_default")]
    pub emoji: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
}

impl LegendEntry {
    pub fn new(emoji: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            emoji: emoji.into(),
            description: description.into(),
        }
    }
}

/// Top-level IR structure for a project roadmap
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Roadmap {
    #[serde(default, deserialize_with = "null_as_default")]
    pub ir_version: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub project: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,

    /// Document overrides for the status legend, merged over the defaults
    #[serde(
        default,
        skip_serializing_if = "BTreeMap::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub legend: BTreeMap<Status, LegendEntry>,

    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub areas: Vec<Area>,

    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub phases: Vec<Phase>,

    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub items: Vec<Item>,

    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub sections: Vec<Section>,

    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub version_history: Vec<VersionEntry>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Dependencies>,
}

impl Roadmap {
    /// Creates an empty roadmap for `project` at the supported IR version
    pub fn new(project: impl Into<String>) -> Self {
        Self {
            ir_version: SCHEMA_VERSION.to_string(),
            project: project.into(),
            ..Default::default()
        }
    }

    pub fn get_item(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }
}

/// A project area/component used to group items
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    /// Secondary sort weight (unrelated to item priority)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
}

/// A development phase
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    #[serde(
        default,
        skip_serializing_if = "is_unset",
        deserialize_with = "empty_as_none"
    )]
    pub status: Option<Status>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A roadmap item (feature, task, improvement)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub status: Status,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_date: Option<String>,

    /// Expected shape is `Q<1-4> <year>`, e.g. "Q2 2026"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_quarter: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_version: Option<String>,

    /// Project area/component (user-defined)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,

    /// Change type, aligned with the changelog taxonomy
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub change_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,

    #[serde(
        default,
        skip_serializing_if = "is_unset",
        deserialize_with = "empty_as_none"
    )]
    pub priority: Option<Priority>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,

    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub depends_on: Vec<String>,

    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub tasks: Vec<Task>,

    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub content: Vec<ContentBlock>,
}

impl Item {
    pub fn new(id: impl Into<String>, title: impl Into<String>, status: Status) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            status,
            ..Default::default()
        }
    }

    pub fn area(&self) -> Option<&str> {
        non_empty(&self.area)
    }

    pub fn change_type(&self) -> Option<&str> {
        non_empty(&self.change_type)
    }

    pub fn phase(&self) -> Option<&str> {
        non_empty(&self.phase)
    }

    pub fn target_quarter(&self) -> Option<&str> {
        non_empty(&self.target_quarter)
    }
}

/// A sub-task with completion status
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub completed: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
}

/// A rich content block within an item or section
///
/// Kept flat rather than as a Rust enum so that a block with a missing or
/// unknown `type` still decodes and can be reported by the validator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub content_type: ContentType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub headers: Vec<String>,

    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub rows: Vec<Vec<String>>,

    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub items: Vec<String>,
}

impl ContentBlock {
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            content_type: ContentType::Text,
            value: Some(value.into()),
            ..Default::default()
        }
    }

    pub fn code(language: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            content_type: ContentType::Code,
            value: Some(value.into()),
            language: Some(language.into()),
            ..Default::default()
        }
    }

    pub fn table(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            content_type: ContentType::Table,
            headers,
            rows,
            ..Default::default()
        }
    }

    pub fn list(items: Vec<String>) -> Self {
        Self {
            content_type: ContentType::List,
            items,
            ..Default::default()
        }
    }

    pub fn value(&self) -> Option<&str> {
        non_empty(&self.value)
    }
}

/// A freeform content section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,

    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub content: Vec<ContentBlock>,
}

/// A version milestone
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionEntry {
    #[serde(default, deserialize_with = "null_as_default")]
    pub version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    #[serde(
        default,
        skip_serializing_if = "is_unset",
        deserialize_with = "empty_as_none"
    )]
    pub status: Option<Status>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// External and internal dependencies of the project
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependencies {
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub external: Vec<ExternalDependency>,

    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub internal: Vec<InternalDependency>,
}

/// An external SDK dependency
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalDependency {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// An internal package dependency
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternalDependency {
    #[serde(default, deserialize_with = "null_as_default")]
    pub package: String,

    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub depends_on: Vec<String>,
}

/// Treats `Some("")` the same as an absent value
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

// Empty strings and nulls both decode to `None`.
fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<String>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.is_empty()).map(T::from))
}

// An explicit null decodes the same as an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Values that encode as an empty string
trait EmptyText {
    fn is_empty_text(&self) -> bool;
}

impl EmptyText for Status {
    fn is_empty_text(&self) -> bool {
        self.is_empty()
    }
}

impl EmptyText for Priority {
    fn is_empty_text(&self) -> bool {
        self.is_empty()
    }
}

// `Some(Other(""))` is written the same as `None`, so it reads back as `None`.
fn is_unset<T: EmptyText>(value: &Option<T>) -> bool {
    value.as_ref().map_or(true, EmptyText::is_empty_text)
}
