//! Three-stage tabbed interface: static panel composition for each Schema Miner stage.
//!
//! Nothing here is built at load time; the entry point calls [`TabbedInterface::build`].

use crate::error::SessionError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

const API_KEY_LABEL: &str = "OpenAI API Key";
const API_KEY_INFO: &str = "Please input your OpenAI API Key here. Please note that the key will only be used for this demo and will not be uploaded or used anywhere else.";
const API_KEY_BUTTON: &str = "Submit API Key";
const CHAT_PLACEHOLDER: &str =
    "Please type your message here and press Enter to interact with the chatbot!";

/// Accepted upload extensions. One document per upload.
pub const ACCEPTED_DOCUMENT_TYPES: &[&str] = &[".pdf"];
const UPLOAD_HEIGHT: u32 = 420;
const REFINEMENT_OUTPUT_LINES: u32 = 13;

const STAGE1_INTRO: &str = r#"# Schema Miner - Initial Schema Mining
**Welcome to Schema Miner** — a Human-in-the-Loop framework for Scientific Schema Mining using Large Language Models (LLMs). This tool is designed to assist you in extracting structured schema representations for scientific processes by leveraging scientific literature and continuous human feedback.
This interactive demo will guide you step-by-step, starting from unstructured textual information and culminating in a well-defined, structured schema. Each tab above corresponds to a distinct stage in the Schema Miner workflow, progressively refining and enriching the extracted schema with domain knowledge.
In this first stage, the LLM generates an initial JSON schema that captures essential properties, data types, and associated constraints relevant to the target scientific domain. This foundational schema acts as the basis for subsequent stages, where it is iteratively improved using expert input and ontological alignment.
To get started, simply enter your OpenAI API key, provide a brief description of the target process, and upload a process specification document. Once submitted, the system will automatically generate an initial schema representation, marking the beginning of your schema discovery journey."#;

const STAGE2_INTRO: &str = r#"# Schema-Miner - Preliminary Schema Refinement
You have now entered the second stage of the Schema Miner workflow. In this phase, the initial schema is systematically improved by analyzing a curated collection of scientific literature and incorporating feedback from domain experts. This human-in-the-loop approach ensures the schema evolves to become both domain-specific and generalizable, capturing structural and semantic consistency across varied research workflows. At each iteration, experts review the schema to identify gaps, correct inaccuracies, and enrich it with deeper contextual understanding. Please follow the instructions below to begin refining your initial schema."#;

const STAGE3_INTRO: &str = r#"# Schema Miner - Finalize Schema Refinement
You have now reached the third stage of the Schema Miner workflow. In this phase, the schema is further refined and validated using a larger, uncurated corpus of scientific papers, enhancing its structural completeness, semantic richness, and generalizability. The LLM analyzes this broader dataset to incorporate new properties, address omissions, and ensure appropriate data types and constraints, all while avoiding redundancy and irrelevant additions. Throughout this process, domain-expert feedback remains essential, guiding iterative updates to maintain accuracy, semantic consistency, and alignment with real-world scientific discourse. Please follow the instructions below to begin refining your schema."#;

const STAGE1_OUTPUT: &str = r#"# Extracted JSON Schema
Below is the initial schema representation automatically generated from your **Process Specification Document**. Please review the extracted schema carefully and proceed to the next stage for further refinement and validation with domain-specific knowledge."#;

const STAGE2_OUTPUT: &str = r#"# Extracted JSON Schema
Below is the refined schema representation, enhanced using the scientific literature you provided and iterative human feedback. Please review the updated schema carefully, and when ready, proceed to the next stage for further refinement and validation."#;

const STAGE3_OUTPUT: &str = r#"# Extracted JSON Schema
Below is the refined schema representation, enhanced using the scientific literature you provided and iterative human feedback. Please review the updated schema carefully, and when ready, proceed to the next stage for ontology grounding."#;

const STAGE1_GREETING: &str = "Hello! I am Schema Miner, your assistant for extracting an initial schema from a scientific process specification. To begin, could you please provide the name of the scientific process you are working with?";
const STAGE2_GREETING: &str = "Hello! I am Schema Miner, your assistant for refining the initial schema. To begin, please upload a scientific paper that will be used to enhance and enrich your existing schema representation.";
const STAGE3_GREETING: &str = "Hello! I am Schema Miner, your assistant for refining the schema. To begin, please upload a scientific paper that will be used to enhance and enrich your existing schema representation.";

/// One step of the Schema Miner workflow (one tab).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Initial,
    Preliminary,
    Finalize,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::Initial, Stage::Preliminary, Stage::Finalize];

    /// 1-based position in the tab bar.
    pub fn number(self) -> u8 {
        match self {
            Stage::Initial => 1,
            Stage::Preliminary => 2,
            Stage::Finalize => 3,
        }
    }

    pub fn from_number(n: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.number() == n)
    }

    pub fn title(self) -> &'static str {
        match self {
            Stage::Initial => "Stage-1: Initial Schema Mining",
            Stage::Preliminary => "Stage-2: Preliminary Schema Refinement",
            Stage::Finalize => "Stage-3: Finalize Schema Refinement",
        }
    }
}

impl FromStr for Stage {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1" => Ok(Stage::Initial),
            "2" => Ok(Stage::Preliminary),
            "3" => Ok(Stage::Finalize),
            _ => Err(SessionError::UnknownStage(s.to_string())),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Assistant,
    User,
}

/// A chat transcript entry in the `{role, content}` message shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiKeyInput {
    pub label: &'static str,
    pub info: &'static str,
    pub button: &'static str,
}

/// What the upload group's button triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadAction {
    /// Generate a schema from the already-selected document.
    Generate,
    /// Send the selected document to the session.
    Document,
}

impl UploadAction {
    /// Path segment of the stage endpoint the button posts to.
    pub fn endpoint(self) -> &'static str {
        match self {
            UploadAction::Generate => "generate",
            UploadAction::Document => "document",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentUploadControl {
    pub label: &'static str,
    pub accepted_types: &'static [&'static str],
    pub single_file: bool,
    pub height: u32,
    pub button: &'static str,
    pub action: UploadAction,
}

/// Read-only area showing the (eventually generated) schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaOutput {
    pub description_markdown: &'static str,
    /// Visible rows; `None` leaves the renderer's default.
    pub lines: Option<u32>,
}

/// The complete composition of one tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Panel {
    pub stage: Stage,
    pub title: &'static str,
    pub intro_markdown: &'static str,
    pub api_key: ApiKeyInput,
    pub transcript: Vec<ChatMessage>,
    pub chat_placeholder: &'static str,
    pub upload: DocumentUploadControl,
    pub output: SchemaOutput,
}

impl Panel {
    pub fn for_stage(stage: Stage) -> Self {
        let (intro, greeting, upload_label, (button, action), output, lines) = match stage {
            Stage::Initial => (
                STAGE1_INTRO,
                STAGE1_GREETING,
                "Upload Process Specification Document",
                ("Generate Schema", UploadAction::Generate),
                STAGE1_OUTPUT,
                None,
            ),
            Stage::Preliminary => (
                STAGE2_INTRO,
                STAGE2_GREETING,
                "Upload Scientific Paper",
                ("Upload", UploadAction::Document),
                STAGE2_OUTPUT,
                Some(REFINEMENT_OUTPUT_LINES),
            ),
            Stage::Finalize => (
                STAGE3_INTRO,
                STAGE3_GREETING,
                "Upload Scientific Paper",
                ("Upload", UploadAction::Document),
                STAGE3_OUTPUT,
                Some(REFINEMENT_OUTPUT_LINES),
            ),
        };

        Self {
            stage,
            title: stage.title(),
            intro_markdown: intro,
            api_key: ApiKeyInput {
                label: API_KEY_LABEL,
                info: API_KEY_INFO,
                button: API_KEY_BUTTON,
            },
            transcript: vec![ChatMessage::assistant(greeting)],
            chat_placeholder: CHAT_PLACEHOLDER,
            upload: DocumentUploadControl {
                label: upload_label,
                accepted_types: ACCEPTED_DOCUMENT_TYPES,
                single_file: true,
                height: UPLOAD_HEIGHT,
                button,
                action,
            },
            output: SchemaOutput {
                description_markdown: output,
                lines,
            },
        }
    }

    pub fn greeting(&self) -> &str {
        self.transcript
            .first()
            .map(|m| m.content.as_str())
            .unwrap_or_default()
    }

}

/// The three stage panels in tab order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TabbedInterface {
    pub panels: Vec<Panel>,
}

impl TabbedInterface {
    pub fn build() -> Self {
        Self {
            panels: Stage::ALL.into_iter().map(Panel::for_stage).collect(),
        }
    }

    pub fn titles(&self) -> Vec<&'static str> {
        self.panels.iter().map(|p| p.title).collect()
    }

    pub fn panel(&self, stage: Stage) -> Option<&Panel> {
        self.panels.iter().find(|p| p.stage == stage)
    }
}
