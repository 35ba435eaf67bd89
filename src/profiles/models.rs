// src/profiles/models.rs
use serde::Deserialize;

/// Raw shape of the profile configuration file, as written by users.
/// Validated into [`crate::profiles::ReportConfig`] by `load_config`.
#[derive(Debug, Deserialize)]
pub struct RawConfig {
    pub general: RawGeneral,
    #[serde(default)]
    pub docs: Vec<RawProfile>,
}

#[derive(Debug, Deserialize)]
pub struct RawGeneral {
    pub title: String,
    #[serde(default)]
    pub scope: Vec<RawScope>,
}

#[derive(Debug, Deserialize)]
pub struct RawScope {
    pub heading: String,
    #[serde(default)]
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub struct RawProfile {
    pub identifier: String,
    pub heading: String,
    #[serde(default)]
    pub message_if_identifier_found: String,
    #[serde(default)]
    pub questions: Vec<RawQuestion>,
}

/// A question node. Exactly one of `question` / `address` carries the label.
#[derive(Debug, Deserialize)]
pub struct RawQuestion {
    pub question: Option<String>,
    pub address: Option<String>,
    pub search_pattern: String,
    #[serde(default)]
    pub extract_text: bool,
    pub extract_pattern: Option<String>,
    pub message_template: Option<String>,
    #[serde(default)]
    pub message_if_not_found: String,
    pub message_if_found: Option<String>,
    #[serde(default)]
    pub questions: Vec<RawQuestion>,
}
