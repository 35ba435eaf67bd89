// src/profiles/mod.rs
pub mod matcher;
pub mod models;

use crate::utils::error::ConfigError;
use models::{RawConfig, RawProfile, RawQuestion};
use regex::{Regex, RegexBuilder};
use std::path::Path;

pub use matcher::match_profile;

/// Deepest question nesting accepted from configuration.
pub const MAX_QUESTION_DEPTH: usize = 32;

// --- Domain Types ---

/// Report-level text, rendered once at the top of the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportMeta {
    pub title: String,
    pub scope_heading: String,
    pub scope_body: String,
}

#[derive(Debug, Clone)]
pub struct Profile {
    /// Literal, case-sensitive marker text identifying documents of this kind.
    pub identifier: String,
    pub heading: String,
    pub found_message: String,
    pub questions: Vec<QuestionNode>,
}

#[derive(Debug, Clone)]
pub enum QuestionNode {
    Question(QuestionDef),
    Address(QuestionDef),
}

impl QuestionNode {
    pub fn def(&self) -> &QuestionDef {
        match self {
            Self::Question(def) | Self::Address(def) => def,
        }
    }
}

#[derive(Debug, Clone)]
pub struct QuestionDef {
    pub label: String,
    /// Checked as a literal substring; also the prefix of the extraction regex.
    pub search_pattern: String,
    pub extraction: Option<Extraction>,
    pub not_found_message: String,
    pub found_message: Option<String>,
    pub children: Vec<QuestionNode>,
}

/// Compiled `search_pattern + extract_pattern`, case-insensitive, `.` matching newlines.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub pattern: Regex,
    pub template: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub meta: ReportMeta,
    pub profiles: Vec<Profile>,
}

// --- Loading ---

/// Reads and validates the profile configuration. Any problem is fatal for the run.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ReportConfig, ConfigError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let config = parse_config(&raw)?;
    tracing::info!("Loaded {} document profiles from {}", config.profiles.len(), path.display());
    Ok(config)
}

pub fn parse_config(json: &str) -> Result<ReportConfig, ConfigError> {
    let raw: RawConfig = serde_json::from_str(json)?;

    let scope = raw.general.scope.into_iter().next().ok_or(ConfigError::MissingScope)?;
    let meta = ReportMeta {
        title: raw.general.title,
        scope_heading: scope.heading,
        scope_body: scope.body,
    };

    let profiles = raw
        .docs
        .into_iter()
        .enumerate()
        .map(|(i, doc)| build_profile(doc, &format!("docs[{}]", i)))
        .collect::<Result<Vec<_>, _>>()?;

    for profile in profiles.iter().filter(|p| p.identifier.is_empty()) {
        tracing::warn!(
            "Profile '{}' has an empty identifier and will never match",
            profile.heading
        );
    }

    Ok(ReportConfig { meta, profiles })
}

fn build_profile(raw: RawProfile, path: &str) -> Result<Profile, ConfigError> {
    Ok(Profile {
        identifier: raw.identifier,
        heading: raw.heading,
        found_message: raw.message_if_identifier_found,
        questions: build_questions(raw.questions, path, 1)?,
    })
}

fn build_questions(
    raw: Vec<RawQuestion>,
    parent: &str,
    depth: usize,
) -> Result<Vec<QuestionNode>, ConfigError> {
    raw.into_iter()
        .enumerate()
        .map(|(i, q)| build_question(q, &format!("{}.questions[{}]", parent, i), depth))
        .collect()
}

fn build_question(raw: RawQuestion, path: &str, depth: usize) -> Result<QuestionNode, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidQuestion {
        path: path.to_string(),
        reason: reason.to_string(),
    };

    if depth > MAX_QUESTION_DEPTH {
        return Err(invalid(&format!("nested deeper than {} levels", MAX_QUESTION_DEPTH)));
    }

    let extraction = if raw.extract_text {
        let extract_pattern = raw
            .extract_pattern
            .as_deref()
            .ok_or_else(|| invalid("extract_text is set but extract_pattern is missing"))?;
        // Concatenated as text: the extract pattern continues the search pattern.
        let combined = format!("{}{}", raw.search_pattern, extract_pattern);
        let pattern = RegexBuilder::new(&combined)
            .case_insensitive(true)
            .dot_matches_new_line(true)
            .build()
            .map_err(|source| ConfigError::InvalidPattern { path: path.to_string(), source })?;
        Some(Extraction { pattern, template: raw.message_template })
    } else {
        None
    };

    let children = build_questions(raw.questions, path, depth + 1)?;

    let make_def = |label: String| QuestionDef {
        label,
        search_pattern: raw.search_pattern,
        extraction,
        not_found_message: raw.message_if_not_found,
        found_message: raw.message_if_found,
        children,
    };

    match (raw.question, raw.address) {
        (Some(label), None) => Ok(QuestionNode::Question(make_def(label))),
        (None, Some(label)) => Ok(QuestionNode::Address(make_def(label))),
        (Some(_), Some(_)) => Err(invalid("has both 'question' and 'address'")),
        (None, None) => Err(invalid("needs a 'question' or 'address' label")),
    }
}
