//! Schema session: the capability behind each panel's buttons and inputs.
//!
//! The demo ships [`UnwiredSession`], which answers every call with
//! [`SessionError::NotWired`]. Input validation happens in the value constructors
//! ([`ApiKey::new`], [`DocumentUpload::new`]) so a real backend receives only well-formed input.

use crate::error::SessionError;
use crate::interface::{ChatMessage, Stage, ACCEPTED_DOCUMENT_TYPES};
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

/// An LLM provider key. Never printed: `Debug` and `Display` are redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(raw: impl Into<String>) -> Result<Self, SessionError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SessionError::EmptyApiKey);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

/// A single uploaded document of an accepted type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl DocumentUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, SessionError> {
        let file_name = file_name.into();
        let lower = file_name.to_ascii_lowercase();
        if !ACCEPTED_DOCUMENT_TYPES.iter().any(|ext| lower.ends_with(ext)) {
            return Err(SessionError::UnsupportedDocument {
                file_name,
                accepted: ACCEPTED_DOCUMENT_TYPES.join(", "),
            });
        }
        if bytes.is_empty() {
            return Err(SessionError::EmptyDocument { file_name });
        }
        Ok(Self { file_name, bytes })
    }
}

/// Operations a panel can trigger. One implementation serves all three stages.
#[async_trait]
pub trait SchemaSession: Send + Sync {
    async fn submit_api_key(&self, stage: Stage, key: ApiKey) -> Result<(), SessionError>;

    async fn upload_document(
        &self,
        stage: Stage,
        document: DocumentUpload,
    ) -> Result<(), SessionError>;

    /// Produce the schema for the stage's output area.
    async fn generate_schema(&self, stage: Stage) -> Result<Value, SessionError>;

    /// Send a chat message; returns the assistant's reply.
    async fn send_message(&self, stage: Stage, message: String)
        -> Result<ChatMessage, SessionError>;
}

/// The shipped session: every control is declared, none is connected.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnwiredSession;

#[async_trait]
impl SchemaSession for UnwiredSession {
    async fn submit_api_key(&self, stage: Stage, _key: ApiKey) -> Result<(), SessionError> {
        tracing::debug!(stage = stage.number(), "submit_api_key on unwired session");
        Err(SessionError::NotWired {
            operation: "submit_api_key",
        })
    }

    async fn upload_document(
        &self,
        stage: Stage,
        document: DocumentUpload,
    ) -> Result<(), SessionError> {
        tracing::debug!(
            stage = stage.number(),
            file_name = %document.file_name,
            bytes = document.bytes.len(),
            "upload_document on unwired session"
        );
        Err(SessionError::NotWired {
            operation: "upload_document",
        })
    }

    async fn generate_schema(&self, stage: Stage) -> Result<Value, SessionError> {
        tracing::debug!(stage = stage.number(), "generate_schema on unwired session");
        Err(SessionError::NotWired {
            operation: "generate_schema",
        })
    }

    async fn send_message(
        &self,
        stage: Stage,
        message: String,
    ) -> Result<ChatMessage, SessionError> {
        tracing::debug!(
            stage = stage.number(),
            chars = message.chars().count(),
            "send_message on unwired session"
        );
        Err(SessionError::NotWired {
            operation: "send_message",
        })
    }
}
