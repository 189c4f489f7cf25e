//! schema-miner-core: JSON template loader, three-stage interface model, and the
//! `SchemaSession` capability that the demo's controls are declared against.
//!
//! No schema mining happens here. The crate loads the example template, describes the
//! panels, and makes the unwired controls explicit.

mod config;
mod error;
pub mod interface;
pub mod session;
pub mod template;

pub use config::{MinerConfig, CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_PORT, DEFAULT_TEMPLATE_PATH};
pub use error::{ConfigError, SessionError, TemplateError, TemplateErrorKind, TemplateResult};
pub use interface::{
    ChatMessage, Panel, Role, Stage, TabbedInterface, UploadAction,
    ACCEPTED_DOCUMENT_TYPES,
};
pub use session::{ApiKey, DocumentUpload, SchemaSession, UnwiredSession};
pub use template::{
    read_json_file, read_json_file_or_report, to_pretty_json, TemplatePlaceholder, TemplateSource,
    TextEncoding,
};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
