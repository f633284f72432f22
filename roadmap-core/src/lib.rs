pub mod changelog;
pub mod codec;
pub mod config;
pub mod legend;
pub mod models;
pub mod validate;
pub mod views;

// Re-export commonly used types
pub use changelog::{ChangeTypeRegistry, ChangeTypes, DEFAULT_CHANGE_TYPES};
pub use codec::{
    decode, decode_as, decode_file, encode, encode_as, encode_to_file, CodecError,
    CodecErrorKind, Format,
};
pub use config::{get_config_path, RoadmapConfig, DEFAULT_ROADMAP_FILE};
pub use legend::default_legend;
pub use models::{
    priority_label, priority_label_full, priority_order, Area, ContentBlock, ContentType,
    Dependencies, ExternalDependency, InternalDependency, Item, LegendEntry, Phase, Priority,
    Roadmap, Section, Status, Task, VersionEntry, SCHEMA_VERSION,
};
pub use validate::{
    check_content_block, validate, validate_with, FieldError, FieldErrorKind, ValidationResult,
};
pub use views::{Stats, UNPHASED, UNSCHEDULED, UNSPECIFIED};
